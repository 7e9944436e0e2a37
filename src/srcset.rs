//! Responsive source-set construction.
//!
//! Builds a [`ResponsiveImageDescriptor`] for one image: an ordered list of
//! srcset candidates (a native-format and a webp entry per width), a default
//! source, and intrinsic dimensions for layout stability.
//!
//! ## Rules
//!
//! - Widths are taken **in the given order**; a width larger than the
//!   source's intrinsic width is skipped — derivatives never upscale past
//!   the original.
//! - Each kept width emits two entries: native format first, then webp
//!   (`fm=webp`), so browsers that understand webp pick it and the rest
//!   fall back.
//! - The default `src` uses the width at index `len/2` of the *original,
//!   unfiltered* width list (1100 when the list is empty). The index is
//!   computed before filtering on purpose: the default stays stable even
//!   when large widths get filtered for a small source.
//! - SVG sources get a plain descriptor: the resolved URL as `src`, no
//!   srcset entries, no intrinsic size.
//! - An unresolvable reference yields an empty descriptor, never an error —
//!   templates render partial pages instead of failing.

use crate::markup::Attributes;
use crate::media::{ImageRef, MediaStore};
use crate::params::ParameterSet;
use crate::url::UrlConfig;

/// Widths used when a caller supplies no width list at all.
pub const DEFAULT_WIDTHS: [u32; 5] = [375, 750, 1100, 1500, 2200];

/// Default-source width when the width list is empty.
const FALLBACK_DEFAULT_WIDTH: u32 = 1100;

/// Intrinsic-width ceiling assumed when the store has a URL but no
/// dimensions for an asset.
const FALLBACK_MAX_WIDTH: u32 = 3000;

/// Format variant of a srcset candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// The source's own format, untouched.
    Native,
    /// `fm=webp` derivative.
    Webp,
}

/// One srcset candidate: URL, width descriptor, format variant.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSetEntry {
    pub url: String,
    pub width: u32,
    pub format: Format,
}

/// Everything needed to emit a responsive `img` element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponsiveImageDescriptor {
    /// Default source URL for the plain `src` attribute.
    pub src: String,
    /// Ordered srcset candidates, native/webp pairs per width.
    pub entries: Vec<SourceSetEntry>,
    /// Value of the `sizes` attribute. Empty means no attribute.
    pub sizes: String,
    /// Intrinsic width, unless the caller supplied a `width` attribute.
    pub width: Option<u32>,
    /// Intrinsic height, unless the caller supplied a `height` attribute.
    pub height: Option<u32>,
    /// Alt text from the media store. Empty when absent.
    pub alt: String,
    /// Caller-supplied attributes; they override computed defaults.
    pub attributes: Attributes,
}

impl ResponsiveImageDescriptor {
    /// The empty descriptor produced for unresolvable references.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.src.is_empty() && self.entries.is_empty()
    }

    /// The `srcset` attribute value: `url 375w, url 375w, ...`.
    pub fn srcset_attr(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("{} {}w", e.url, e.width))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Build the responsive descriptor for one image.
pub fn build<M: MediaStore>(
    media: &M,
    urls: &UrlConfig,
    image: &ImageRef,
    widths: &[u32],
    params: &ParameterSet,
    sizes: &str,
    attributes: Attributes,
) -> ResponsiveImageDescriptor {
    let Some(source) = media.source_url(image) else {
        return ResponsiveImageDescriptor::empty();
    };

    let alt = media.alt_of(image);

    // Vector assets carry no raster size and are never transformed.
    if crate::url::is_svg(&source) {
        return ResponsiveImageDescriptor {
            src: source,
            sizes: sizes.to_string(),
            alt,
            attributes,
            ..Default::default()
        };
    }

    let meta = media.meta_of(image);
    let max_width = meta.map_or(FALLBACK_MAX_WIDTH, |m| m.width);

    let mut entries = Vec::with_capacity(widths.len() * 2);
    for &width in widths {
        if width > max_width {
            continue;
        }
        let sized = params.with("w", width);
        entries.push(SourceSetEntry {
            url: urls.transform_url(&source, &sized),
            width,
            format: Format::Native,
        });
        entries.push(SourceSetEntry {
            url: urls.transform_url(&source, &sized.with("fm", "webp")),
            width,
            format: Format::Webp,
        });
    }

    // Default source index is taken on the unfiltered list.
    let default_width = widths
        .get(widths.len() / 2)
        .copied()
        .unwrap_or(FALLBACK_DEFAULT_WIDTH);
    let src = urls.transform_url(&source, &params.with("w", default_width));

    // Caller-supplied width/height attributes beat intrinsic metadata.
    let width = match attributes.get("width") {
        Some(_) => None,
        None => meta.map(|m| m.width),
    };
    let height = match attributes.get("height") {
        Some(_) => None,
        None => meta.map(|m| m.height),
    };

    ResponsiveImageDescriptor {
        src,
        entries,
        sizes: sizes.to_string(),
        width,
        height,
        alt,
        attributes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::StaticMediaStore;

    fn store() -> StaticMediaStore {
        StaticMediaStore::new()
            .with_url(1, "https://site/uploads/photo.jpg")
            .with_dimensions(1, 1000, 750)
            .with_alt(1, "A photo")
    }

    fn urls() -> UrlConfig {
        UrlConfig::new("https://site", "https://site/uploads")
    }

    #[test]
    fn filters_widths_beyond_intrinsic_width() {
        let d = build(
            &store(),
            &urls(),
            &ImageRef::from(1),
            &DEFAULT_WIDTHS,
            &ParameterSet::new(),
            "100vw",
            Attributes::new(),
        );
        // Intrinsic width 1000: only 375 and 750 survive, each as a
        // native/webp pair.
        let widths: Vec<u32> = d.entries.iter().map(|e| e.width).collect();
        assert_eq!(widths, [375, 375, 750, 750]);
        assert_eq!(d.entries[0].format, Format::Native);
        assert_eq!(d.entries[1].format, Format::Webp);
    }

    #[test]
    fn default_src_uses_middle_of_unfiltered_list() {
        let d = build(
            &store(),
            &urls(),
            &ImageRef::from(1),
            &DEFAULT_WIDTHS,
            &ParameterSet::new(),
            "100vw",
            Attributes::new(),
        );
        // Index 2 of the original list is 1100, even though 1100 itself is
        // filtered from the srcset.
        assert_eq!(d.src, "https://site/img/photo.jpg?w=1100");
    }

    #[test]
    fn empty_width_list_falls_back_to_1100() {
        let d = build(
            &store(),
            &urls(),
            &ImageRef::from(1),
            &[],
            &ParameterSet::new(),
            "100vw",
            Attributes::new(),
        );
        assert!(d.entries.is_empty());
        assert_eq!(d.src, "https://site/img/photo.jpg?w=1100");
    }

    #[test]
    fn entries_pair_native_then_webp_per_width() {
        let d = build(
            &store(),
            &urls(),
            &ImageRef::from(1),
            &[375],
            &ParameterSet::new(),
            "100vw",
            Attributes::new(),
        );
        assert_eq!(d.entries[0].url, "https://site/img/photo.jpg?w=375");
        assert_eq!(d.entries[1].url, "https://site/img/photo.jpg?w=375&fm=webp");
    }

    #[test]
    fn override_params_precede_width() {
        let params = ParameterSet::from_pairs([("q", 80)]);
        let d = build(
            &store(),
            &urls(),
            &ImageRef::from(1),
            &[375],
            &params,
            "100vw",
            Attributes::new(),
        );
        assert_eq!(d.entries[0].url, "https://site/img/photo.jpg?q=80&w=375");
    }

    #[test]
    fn unresolvable_reference_yields_empty_descriptor() {
        let d = build(
            &StaticMediaStore::new(),
            &urls(),
            &ImageRef::from(99),
            &DEFAULT_WIDTHS,
            &ParameterSet::new(),
            "100vw",
            Attributes::new(),
        );
        assert!(d.is_empty());
        assert_eq!(d, ResponsiveImageDescriptor::empty());
    }

    #[test]
    fn svg_source_has_plain_src_and_no_entries() {
        let store = StaticMediaStore::new().with_url(2, "https://site/uploads/logo.svg");
        let d = build(
            &store,
            &urls(),
            &ImageRef::from(2),
            &DEFAULT_WIDTHS,
            &ParameterSet::new(),
            "100vw",
            Attributes::new(),
        );
        assert_eq!(d.src, "https://site/uploads/logo.svg");
        assert!(d.entries.is_empty());
        assert_eq!(d.width, None);
        assert_eq!(d.height, None);
    }

    #[test]
    fn intrinsic_dimensions_come_from_metadata() {
        let d = build(
            &store(),
            &urls(),
            &ImageRef::from(1),
            &[375],
            &ParameterSet::new(),
            "100vw",
            Attributes::new(),
        );
        assert_eq!(d.width, Some(1000));
        assert_eq!(d.height, Some(750));
        assert_eq!(d.alt, "A photo");
    }

    #[test]
    fn caller_dimension_attributes_win_over_metadata() {
        let attrs = Attributes::from_pairs([("width", "640"), ("height", "480")]);
        let d = build(
            &store(),
            &urls(),
            &ImageRef::from(1),
            &[375],
            &ParameterSet::new(),
            "100vw",
            attrs,
        );
        assert_eq!(d.width, None);
        assert_eq!(d.height, None);
        assert_eq!(d.attributes.get("width"), Some("640"));
    }

    #[test]
    fn missing_metadata_assumes_wide_source() {
        let store = StaticMediaStore::new().with_url(3, "https://site/uploads/wide.jpg");
        let d = build(
            &store,
            &urls(),
            &ImageRef::from(3),
            &DEFAULT_WIDTHS,
            &ParameterSet::new(),
            "100vw",
            Attributes::new(),
        );
        // No recorded dimensions: all widths under the 3000 ceiling emit.
        assert_eq!(d.entries.len(), DEFAULT_WIDTHS.len() * 2);
    }

    #[test]
    fn srcset_attr_joins_entries() {
        let d = build(
            &store(),
            &urls(),
            &ImageRef::from(1),
            &[375],
            &ParameterSet::new(),
            "100vw",
            Attributes::new(),
        );
        assert_eq!(
            d.srcset_attr(),
            "https://site/img/photo.jpg?w=375 375w, https://site/img/photo.jpg?w=375&fm=webp 375w"
        );
    }
}
