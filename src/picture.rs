//! Art-directed `picture` assembly.
//!
//! Serves a different crop per viewport: the mobile image becomes a
//! conditional `source` gated on `max-width: <breakpoint>`, the desktop
//! image is the fallback `img` carrying its own srcset. With only one
//! reference supplied, the result degrades to a plain responsive image and
//! no `source`/`picture` wrapping is emitted.
//!
//! ## Width Derivation
//!
//! When a viewport's width list is empty, widths are derived from that
//! viewport's own `w` parameter: 50%, 100%, 150%, and 200% of it, truncated
//! to integers — enough steps to cover small screens and high-DPR displays.
//! Without a `w` parameter either, the fixed default sequence
//! [`DEFAULT_WIDTHS`](crate::srcset::DEFAULT_WIDTHS) applies.

use crate::markup::Attributes;
use crate::media::{ImageRef, MediaStore};
use crate::params::{ParamValue, ParameterSet};
use crate::srcset::{self, ResponsiveImageDescriptor, DEFAULT_WIDTHS};
use crate::url::UrlConfig;

/// Default media-query breakpoint separating mobile from desktop.
pub const DEFAULT_BREAKPOINT: &str = "640px";

/// Default srcset widths for the mobile viewport.
pub const DEFAULT_MOBILE_WIDTHS: [u32; 2] = [375, 750];

/// Default srcset widths for the desktop viewport.
pub const DEFAULT_DESKTOP_WIDTHS: [u32; 3] = [1100, 1500, 2200];

/// Class applied to the fallback `img` unless the caller overrides it.
const DEFAULT_IMG_CLASS: &str = "w-full h-full object-cover";

/// An assembled art-directed picture.
///
/// At least one of `mobile`/`desktop` is present. With exactly one present
/// the picture renders as a plain `img` — no `source` element.
#[derive(Debug, Clone, PartialEq)]
pub struct PictureDescriptor {
    pub mobile: Option<ResponsiveImageDescriptor>,
    pub desktop: Option<ResponsiveImageDescriptor>,
    /// Breakpoint for the mobile `source` media query, e.g. `640px`.
    pub breakpoint: String,
    /// Alt text: desktop's, else mobile's, else empty.
    pub alt: String,
    /// Attributes on the `picture` element itself.
    pub attributes: Attributes,
}

impl PictureDescriptor {
    /// True when the picture degrades to a plain image.
    pub fn is_degenerate(&self) -> bool {
        self.mobile.is_none() || self.desktop.is_none()
    }
}

/// Assemble an art-directed picture from per-viewport references.
///
/// Returns `None` when both references are absent.
#[allow(clippy::too_many_arguments)]
pub fn assemble<M: MediaStore>(
    media: &M,
    urls: &UrlConfig,
    mobile: Option<&ImageRef>,
    desktop: Option<&ImageRef>,
    breakpoint: &str,
    mobile_widths: &[u32],
    desktop_widths: &[u32],
    attributes: Attributes,
    mobile_params: &ParameterSet,
    desktop_params: &ParameterSet,
    picture_attributes: Attributes,
) -> Option<PictureDescriptor> {
    let (mobile, desktop) = match (mobile, desktop) {
        (None, None) => return None,
        // One viewport only: a plain responsive image, no art direction.
        (Some(image), None) => {
            return Some(degenerate(
                srcset::build(media, urls, image, mobile_widths, mobile_params, "100vw", attributes),
                false,
                breakpoint,
                picture_attributes,
            ));
        }
        (None, Some(image)) => {
            return Some(degenerate(
                srcset::build(media, urls, image, desktop_widths, desktop_params, "100vw", attributes),
                true,
                breakpoint,
                picture_attributes,
            ));
        }
        (Some(m), Some(d)) => (m, d),
    };

    let mobile_widths = derive_widths(mobile_widths, mobile_params);
    let desktop_widths = derive_widths(desktop_widths, desktop_params);

    let mobile_descriptor = srcset::build(
        media,
        urls,
        mobile,
        &mobile_widths,
        mobile_params,
        "",
        Attributes::new(),
    );

    // Fallback img defaults, overridable by the caller's attributes.
    let mut img_attributes = Attributes::from_pairs([("class", DEFAULT_IMG_CLASS)]);
    img_attributes.apply(&attributes);
    let desktop_descriptor = srcset::build(
        media,
        urls,
        desktop,
        &desktop_widths,
        desktop_params,
        "",
        img_attributes,
    );

    let alt = if !desktop_descriptor.alt.is_empty() {
        desktop_descriptor.alt.clone()
    } else {
        mobile_descriptor.alt.clone()
    };

    Some(PictureDescriptor {
        mobile: Some(mobile_descriptor),
        desktop: Some(desktop_descriptor),
        breakpoint: breakpoint.to_string(),
        alt,
        attributes: picture_attributes,
    })
}

/// Wrap a single-viewport descriptor as a degenerate picture.
fn degenerate(
    descriptor: ResponsiveImageDescriptor,
    is_desktop: bool,
    breakpoint: &str,
    picture_attributes: Attributes,
) -> PictureDescriptor {
    let alt = descriptor.alt.clone();
    PictureDescriptor {
        mobile: (!is_desktop).then(|| descriptor.clone()),
        desktop: is_desktop.then_some(descriptor),
        breakpoint: breakpoint.to_string(),
        alt,
        attributes: picture_attributes,
    }
}

/// Widths for one viewport: the explicit list, else 50%/100%/150%/200% of
/// the viewport's `w` parameter, else the fixed default sequence.
pub fn derive_widths(widths: &[u32], params: &ParameterSet) -> Vec<u32> {
    if !widths.is_empty() {
        return widths.to_vec();
    }

    if let Some(base) = params.get("w").and_then(ParamValue::as_int) {
        // A `w` outside u32 range is nonsense input; clamp rather than
        // truncate or overflow.
        let base = u32::try_from(base).unwrap_or(0);
        return vec![
            base / 2,
            base,
            base.saturating_mul(3) / 2,
            base.saturating_mul(2),
        ];
    }

    DEFAULT_WIDTHS.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::StaticMediaStore;

    fn store() -> StaticMediaStore {
        StaticMediaStore::new()
            .with_url(1, "https://site/uploads/mobile.jpg")
            .with_dimensions(1, 800, 1200)
            .with_alt(1, "Mobile crop")
            .with_url(2, "https://site/uploads/desktop.jpg")
            .with_dimensions(2, 2400, 1350)
            .with_alt(2, "Desktop crop")
    }

    fn urls() -> UrlConfig {
        UrlConfig::new("https://site", "https://site/uploads")
    }

    fn assemble_both() -> PictureDescriptor {
        assemble(
            &store(),
            &urls(),
            Some(&ImageRef::from(1)),
            Some(&ImageRef::from(2)),
            DEFAULT_BREAKPOINT,
            &DEFAULT_MOBILE_WIDTHS,
            &DEFAULT_DESKTOP_WIDTHS,
            Attributes::new(),
            &ParameterSet::new(),
            &ParameterSet::new(),
            Attributes::new(),
        )
        .unwrap()
    }

    #[test]
    fn both_absent_yields_none() {
        let result = assemble(
            &store(),
            &urls(),
            None,
            None,
            DEFAULT_BREAKPOINT,
            &DEFAULT_MOBILE_WIDTHS,
            &DEFAULT_DESKTOP_WIDTHS,
            Attributes::new(),
            &ParameterSet::new(),
            &ParameterSet::new(),
            Attributes::new(),
        );
        assert_eq!(result, None);
    }

    #[test]
    fn single_reference_degenerates() {
        let picture = assemble(
            &store(),
            &urls(),
            None,
            Some(&ImageRef::from(2)),
            DEFAULT_BREAKPOINT,
            &DEFAULT_MOBILE_WIDTHS,
            &DEFAULT_DESKTOP_WIDTHS,
            Attributes::new(),
            &ParameterSet::new(),
            &ParameterSet::new(),
            Attributes::new(),
        )
        .unwrap();
        assert!(picture.is_degenerate());
        assert_eq!(picture.mobile, None);
        let desktop = picture.desktop.unwrap();
        assert_eq!(desktop.sizes, "100vw");
        assert_eq!(desktop.alt, "Desktop crop");
    }

    #[test]
    fn mobile_only_uses_mobile_widths_and_params() {
        let params = ParameterSet::from_pairs([("fit", "crop")]);
        let picture = assemble(
            &store(),
            &urls(),
            Some(&ImageRef::from(1)),
            None,
            DEFAULT_BREAKPOINT,
            &[375],
            &DEFAULT_DESKTOP_WIDTHS,
            Attributes::new(),
            &params,
            &ParameterSet::new(),
            Attributes::new(),
        )
        .unwrap();
        let mobile = picture.mobile.unwrap();
        assert_eq!(
            mobile.entries[0].url,
            "https://site/img/mobile.jpg?fit=crop&w=375"
        );
        assert_eq!(picture.desktop, None);
    }

    #[test]
    fn both_present_builds_both_viewports() {
        let picture = assemble_both();
        assert!(!picture.is_degenerate());
        let mobile = picture.mobile.as_ref().unwrap();
        let desktop = picture.desktop.as_ref().unwrap();
        assert_eq!(
            mobile.entries.iter().map(|e| e.width).collect::<Vec<_>>(),
            [375, 375, 750, 750]
        );
        assert_eq!(
            desktop.entries.iter().map(|e| e.width).collect::<Vec<_>>(),
            [1100, 1100, 1500, 1500, 2200, 2200]
        );
    }

    #[test]
    fn alt_prefers_desktop_falls_back_to_mobile() {
        let picture = assemble_both();
        assert_eq!(picture.alt, "Desktop crop");

        let no_desktop_alt = StaticMediaStore::new()
            .with_url(1, "https://site/uploads/mobile.jpg")
            .with_alt(1, "Mobile crop")
            .with_url(2, "https://site/uploads/desktop.jpg");
        let picture = assemble(
            &no_desktop_alt,
            &urls(),
            Some(&ImageRef::from(1)),
            Some(&ImageRef::from(2)),
            DEFAULT_BREAKPOINT,
            &DEFAULT_MOBILE_WIDTHS,
            &DEFAULT_DESKTOP_WIDTHS,
            Attributes::new(),
            &ParameterSet::new(),
            &ParameterSet::new(),
            Attributes::new(),
        )
        .unwrap();
        assert_eq!(picture.alt, "Mobile crop");
    }

    #[test]
    fn fallback_img_gets_default_class() {
        let picture = assemble_both();
        assert_eq!(
            picture.desktop.unwrap().attributes.get("class"),
            Some("w-full h-full object-cover")
        );
    }

    #[test]
    fn caller_attributes_override_default_class() {
        let picture = assemble(
            &store(),
            &urls(),
            Some(&ImageRef::from(1)),
            Some(&ImageRef::from(2)),
            DEFAULT_BREAKPOINT,
            &DEFAULT_MOBILE_WIDTHS,
            &DEFAULT_DESKTOP_WIDTHS,
            Attributes::from_pairs([("class", "hero-image")]),
            &ParameterSet::new(),
            &ParameterSet::new(),
            Attributes::new(),
        )
        .unwrap();
        assert_eq!(
            picture.desktop.unwrap().attributes.get("class"),
            Some("hero-image")
        );
    }

    #[test]
    fn derive_widths_keeps_explicit_list() {
        assert_eq!(
            derive_widths(&[375, 750], &ParameterSet::from_pairs([("w", 600)])),
            [375, 750]
        );
    }

    #[test]
    fn derive_widths_scales_the_w_parameter() {
        assert_eq!(
            derive_widths(&[], &ParameterSet::from_pairs([("w", 601)])),
            [300, 601, 901, 1202]
        );
    }

    #[test]
    fn derive_widths_falls_back_to_default_sequence() {
        assert_eq!(derive_widths(&[], &ParameterSet::new()), DEFAULT_WIDTHS);
    }

    #[test]
    fn derive_widths_clamps_out_of_range_base() {
        let negative = ParameterSet::from_pairs([("w", -100)]);
        assert_eq!(derive_widths(&[], &negative), [0, 0, 0, 0]);

        let oversized = ParameterSet::from_pairs([("w", i64::MAX)]);
        assert_eq!(derive_widths(&[], &oversized), [0, 0, 0, 0]);

        // At the top of u32 range the multiples saturate instead of
        // wrapping or panicking.
        let huge = ParameterSet::from_pairs([("w", i64::from(u32::MAX))]);
        let widths = derive_widths(&[], &huge);
        assert_eq!(widths[1], u32::MAX);
        assert_eq!(widths[2], u32::MAX / 2);
        assert_eq!(widths[3], u32::MAX);
    }
}
