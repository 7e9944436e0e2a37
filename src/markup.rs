//! Markup rendering for responsive images.
//!
//! Descriptors from [`srcset`](crate::srcset) and
//! [`picture`](crate::picture) are turned into ready-to-emit `img` and
//! `picture` elements here. Attribute values are escaped through
//! [`maud::Escaper`], so interpolated alt text, URLs, and caller-supplied
//! attributes can never break out of their attribute.
//!
//! ## Attribute Precedence
//!
//! Computed defaults come first (`src`, `srcset`, `sizes`, `alt`,
//! `loading=lazy`, `decoding=async`, intrinsic `width`/`height`), then the
//! descriptor's caller-supplied [`Attributes`] are applied on top. An
//! override keeps the default's position; new attributes append. Attributes
//! with empty values are dropped from the output entirely — an image without
//! alt text emits no `alt` attribute.
//!
//! ## Degenerate Pictures
//!
//! A [`PictureDescriptor`] with a single viewport renders as a plain `img`:
//! no `picture` wrapper, no `source` element. An art-directed picture emits
//! the mobile viewport as `<source media="(max-width: …)">` and the desktop
//! viewport as the fallback `img`.

use crate::picture::PictureDescriptor;
use crate::srcset::ResponsiveImageDescriptor;
use maud::{Escaper, Markup, PreEscaped};
use std::fmt::Write;

/// An insertion-ordered attribute map.
///
/// [`set`](Attributes::set) replaces an existing attribute in place or
/// appends a new one, mirroring [`ParameterSet`](crate::params::ParameterSet)
/// merge semantics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from name/value pairs, preserving their order.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut attrs = Self::new();
        for (k, v) in pairs {
            attrs.set(k, v);
        }
        attrs
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute: replaces an existing one in place, else appends.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Apply every attribute from `other` on top of this map.
    pub fn apply(&mut self, other: &Attributes) {
        for (name, value) in &other.entries {
            self.set(name.clone(), value.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Write ` name="value"` pairs, escaped, skipping empty values.
fn push_attrs(out: &mut String, attrs: &Attributes) {
    for (name, value) in attrs.iter() {
        if value.is_empty() {
            continue;
        }
        out.push(' ');
        let _ = Escaper::new(out).write_str(name);
        out.push_str("=\"");
        let _ = Escaper::new(out).write_str(value);
        out.push('"');
    }
}

/// Render a responsive `img` element.
pub fn render_img(descriptor: &ResponsiveImageDescriptor) -> Markup {
    if descriptor.is_empty() {
        return PreEscaped(String::new());
    }
    let mut attrs = Attributes::new();
    attrs.set("src", descriptor.src.clone());
    attrs.set("srcset", descriptor.srcset_attr());
    attrs.set("sizes", descriptor.sizes.clone());
    attrs.set("alt", descriptor.alt.clone());
    attrs.set("loading", "lazy");
    attrs.set("decoding", "async");
    if let Some(width) = descriptor.width {
        attrs.set("width", width.to_string());
    }
    if let Some(height) = descriptor.height {
        attrs.set("height", height.to_string());
    }
    attrs.apply(&descriptor.attributes);

    let mut out = String::from("<img");
    push_attrs(&mut out, &attrs);
    out.push('>');
    PreEscaped(out)
}

/// Render a `picture` element, degrading to a plain `img` when only one
/// viewport is present.
pub fn render_picture(picture: &PictureDescriptor) -> Markup {
    let (mobile, desktop) = match (&picture.mobile, &picture.desktop) {
        (None, None) => return PreEscaped(String::new()),
        (Some(single), None) | (None, Some(single)) => return render_img(single),
        (Some(mobile), Some(desktop)) => (mobile, desktop),
    };

    let mut out = String::from("<picture");
    push_attrs(&mut out, &picture.attributes);
    out.push('>');

    if !mobile.entries.is_empty() {
        let mut source = Attributes::new();
        source.set("media", format!("(max-width: {})", picture.breakpoint));
        source.set("srcset", mobile.srcset_attr());
        out.push_str("<source");
        push_attrs(&mut out, &source);
        out.push('>');
    }

    // The fallback img carries the picture-level alt.
    let mut img = desktop.clone();
    img.alt = picture.alt.clone();
    out.push_str(&render_img(&img).into_string());

    out.push_str("</picture>");
    PreEscaped(out)
}
