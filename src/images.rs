//! The image service facade.
//!
//! [`Images`] ties the three collaborators together — a [`MediaStore`]
//! implementation, the [`UrlConfig`] URL layout, and a [`SizeTable`] — and
//! exposes the operations templates actually call: transformation URLs,
//! responsive image descriptors, and art-directed pictures.
//!
//! The service is explicitly constructed and passed around; there is no
//! global instance. Reconfiguration is a merge call on `&mut self`
//! ([`Images::merge_sizes`], [`Images::set_urls`]), intended for startup.
//! Steady-state request handling only reads, so a shared `Images` value is
//! safe to use from many requests at once.

use crate::compat::Legacy;
use crate::config::{SizeConfig, SizeTable};
use crate::markup::Attributes;
use crate::media::{ImageRef, MediaStore};
use crate::params::ParameterSet;
use crate::picture::{self, PictureDescriptor};
use crate::srcset::{self, ResponsiveImageDescriptor};
use crate::url::UrlConfig;

/// Image URL and markup service over a media store.
#[derive(Debug, Clone)]
pub struct Images<M> {
    media: M,
    urls: UrlConfig,
    sizes: SizeTable,
}

impl<M: MediaStore> Images<M> {
    /// Construct a service with an explicit size table.
    pub fn new(media: M, urls: UrlConfig, sizes: SizeTable) -> Self {
        Self { media, urls, sizes }
    }

    /// Construct a service seeded with the built-in size presets.
    pub fn with_defaults(media: M, urls: UrlConfig) -> Self {
        Self::new(media, urls, SizeTable::builtin())
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn urls(&self) -> &UrlConfig {
        &self.urls
    }

    pub fn sizes(&self) -> &SizeTable {
        &self.sizes
    }

    /// Merge additional size configurations, last writer wins per name.
    pub fn merge_sizes(&mut self, table: SizeTable) {
        self.sizes.merge(table);
    }

    /// Replace the URL layout.
    pub fn set_urls(&mut self, urls: UrlConfig) {
        self.urls = urls;
    }

    /// Resolve a symbolic size key. Missing keys yield the empty config.
    pub fn resolve_size(&self, key: &str) -> SizeConfig {
        self.sizes.resolve(key)
    }

    /// Transformation URL for an image reference.
    ///
    /// Unresolvable references yield an empty string; SVG sources come back
    /// unchanged.
    pub fn url(&self, image: &ImageRef, params: &ParameterSet) -> String {
        let Some(source) = self.media.source_url(image) else {
            return String::new();
        };
        self.urls.transform_url(&source, params)
    }

    /// Transformation URL for a named size. Per-viewport configurations use
    /// their desktop parameter set.
    pub fn url_for_size(&self, image: &ImageRef, size_key: &str) -> String {
        let params = match self.resolve_size(size_key) {
            SizeConfig::Single(params) => params,
            SizeConfig::PerViewport { desktop, .. } => desktop,
        };
        self.url(image, &params)
    }

    /// Responsive image descriptor with a srcset over `widths`.
    pub fn image_tag(
        &self,
        image: &ImageRef,
        sizes: &str,
        widths: &[u32],
        attributes: Attributes,
        params: &ParameterSet,
    ) -> ResponsiveImageDescriptor {
        srcset::build(&self.media, &self.urls, image, widths, params, sizes, attributes)
    }

    /// Art-directed picture from per-viewport references. `None` when
    /// both references are absent.
    #[allow(clippy::too_many_arguments)]
    pub fn picture(
        &self,
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
        picture::assemble(
            &self.media,
            &self.urls,
            mobile,
            desktop,
            breakpoint,
            mobile_widths,
            desktop_widths,
            attributes,
            mobile_params,
            desktop_params,
            picture_attributes,
        )
    }

    /// The legacy call-shape adapter over this service.
    pub fn legacy(&self) -> Legacy<'_, M> {
        Legacy::new(self)
    }
}
