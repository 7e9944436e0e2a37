//! Media store boundary.
//!
//! Image references come in two forms: an opaque numeric id that an external
//! media store resolves to a source URL plus intrinsic metadata, or a literal
//! URL used verbatim. The [`MediaStore`] trait is the seam to that external
//! store — production code implements it against the CMS attachment tables,
//! tests and demos use the in-memory [`StaticMediaStore`].
//!
//! Resolution never fails hard: an id the store doesn't know yields `None`,
//! and callers degrade to empty URLs or empty descriptors so templates can
//! still render partial pages.

use serde::Deserialize;
use std::collections::BTreeMap;

/// A logical reference to an image: a media-store id or a literal URL.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ImageRef {
    Id(i64),
    Url(String),
}

impl From<i64> for ImageRef {
    fn from(id: i64) -> Self {
        ImageRef::Id(id)
    }
}

impl From<i32> for ImageRef {
    fn from(id: i32) -> Self {
        ImageRef::Id(id as i64)
    }
}

impl From<&str> for ImageRef {
    fn from(url: &str) -> Self {
        ImageRef::Url(url.to_string())
    }
}

impl From<String> for ImageRef {
    fn from(url: String) -> Self {
        ImageRef::Url(url)
    }
}

/// Intrinsic raster dimensions reported by the media store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageMeta {
    pub width: u32,
    pub height: u32,
}

/// External media-asset store: id → URL, dimensions, alt text.
pub trait MediaStore {
    /// Absolute source URL for an attachment id, if the id is known.
    fn resolve_url(&self, id: i64) -> Option<String>;

    /// Intrinsic width/height for an attachment id, if recorded.
    fn metadata(&self, id: i64) -> Option<ImageMeta>;

    /// Alt text for an attachment id. Empty string when absent.
    fn alt_text(&self, id: i64) -> String;

    /// Resolve a reference to its source URL.
    ///
    /// Literal URLs pass through verbatim (an empty literal yields `None`);
    /// ids go through [`resolve_url`](Self::resolve_url).
    fn source_url(&self, image: &ImageRef) -> Option<String> {
        match image {
            ImageRef::Id(id) => self.resolve_url(*id).filter(|u| !u.is_empty()),
            ImageRef::Url(url) if url.is_empty() => None,
            ImageRef::Url(url) => Some(url.clone()),
        }
    }

    /// Metadata for a reference. Literal URLs carry none.
    fn meta_of(&self, image: &ImageRef) -> Option<ImageMeta> {
        match image {
            ImageRef::Id(id) => self.metadata(*id),
            ImageRef::Url(_) => None,
        }
    }

    /// Alt text for a reference. Literal URLs have none.
    fn alt_of(&self, image: &ImageRef) -> String {
        match image {
            ImageRef::Id(id) => self.alt_text(*id),
            ImageRef::Url(_) => String::new(),
        }
    }
}

/// One asset in a [`StaticMediaStore`].
#[derive(Debug, Clone, Default)]
pub struct StaticAsset {
    pub url: String,
    pub meta: Option<ImageMeta>,
    pub alt: Option<String>,
}

/// In-memory media store for tests, demos, and static pipelines.
#[derive(Debug, Clone, Default)]
pub struct StaticMediaStore {
    assets: BTreeMap<i64, StaticAsset>,
}

impl StaticMediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an asset URL. Returns `self` for chaining.
    pub fn with_url(mut self, id: i64, url: impl Into<String>) -> Self {
        self.assets.entry(id).or_default().url = url.into();
        self
    }

    /// Register intrinsic dimensions for an asset.
    pub fn with_dimensions(mut self, id: i64, width: u32, height: u32) -> Self {
        self.assets.entry(id).or_default().meta = Some(ImageMeta { width, height });
        self
    }

    /// Register alt text for an asset.
    pub fn with_alt(mut self, id: i64, alt: impl Into<String>) -> Self {
        self.assets.entry(id).or_default().alt = Some(alt.into());
        self
    }
}

impl MediaStore for StaticMediaStore {
    fn resolve_url(&self, id: i64) -> Option<String> {
        self.assets
            .get(&id)
            .map(|a| a.url.clone())
            .filter(|u| !u.is_empty())
    }

    fn metadata(&self, id: i64) -> Option<ImageMeta> {
        self.assets.get(&id).and_then(|a| a.meta)
    }

    fn alt_text(&self, id: i64) -> String {
        self.assets
            .get(&id)
            .and_then(|a| a.alt.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_urls_pass_through() {
        let store = StaticMediaStore::new();
        let image = ImageRef::from("https://site/uploads/x.jpg");
        assert_eq!(
            store.source_url(&image).as_deref(),
            Some("https://site/uploads/x.jpg")
        );
        assert_eq!(store.meta_of(&image), None);
        assert_eq!(store.alt_of(&image), "");
    }

    #[test]
    fn empty_literal_is_unresolved() {
        let store = StaticMediaStore::new();
        assert_eq!(store.source_url(&ImageRef::from("")), None);
    }

    #[test]
    fn unknown_id_is_unresolved() {
        let store = StaticMediaStore::new();
        assert_eq!(store.source_url(&ImageRef::from(7)), None);
        assert_eq!(store.alt_of(&ImageRef::from(7)), "");
    }

    #[test]
    fn registered_asset_resolves() {
        let store = StaticMediaStore::new()
            .with_url(42, "https://site/uploads/x.jpg")
            .with_dimensions(42, 1600, 900)
            .with_alt(42, "A skyline");
        let image = ImageRef::from(42);
        assert_eq!(
            store.source_url(&image).as_deref(),
            Some("https://site/uploads/x.jpg")
        );
        assert_eq!(
            store.meta_of(&image),
            Some(ImageMeta {
                width: 1600,
                height: 900
            })
        );
        assert_eq!(store.alt_of(&image), "A skyline");
    }

    #[test]
    fn image_ref_deserializes_from_id_or_url() {
        let by_id: ImageRef = serde_json::from_str("42").unwrap();
        let by_url: ImageRef = serde_json::from_str(r#""https://site/a.png""#).unwrap();
        assert_eq!(by_id, ImageRef::Id(42));
        assert_eq!(by_url, ImageRef::Url("https://site/a.png".to_string()));
    }
}
