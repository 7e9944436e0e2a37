//! Transformation URL construction.
//!
//! Turns a resolved source URL and a [`ParameterSet`] into the public URL
//! the transformation engine answers under:
//!
//! ```text
//! <public_base>/<base_path><path relative to source_root>?<query>
//! ```
//!
//! With `public_base = "https://site"`, `base_path = "img"`, and
//! `source_root = "https://site/uploads"`, the source
//! `https://site/uploads/x.jpg` with `{w: 300}` becomes
//! `https://site/img/x.jpg?w=300`.
//!
//! Two special cases:
//! - an empty source URL produces an empty string (callers skip rendering);
//! - SVG sources pass through unchanged — vector assets are never transformed.
//!
//! The query string follows the parameter set's insertion order, so the same
//! request always produces a byte-identical URL. Anything caching derivatives
//! by URL depends on this.

use crate::params::ParameterSet;
use serde::Deserialize;

fn default_base_path() -> String {
    "img".to_string()
}

/// URL layout for the transformation endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UrlConfig {
    /// Public origin the engine is served from, e.g. `https://site`.
    pub public_base: String,
    /// Path segment the engine listens under. Requests below this segment
    /// are intercepted by the dispatcher.
    pub base_path: String,
    /// Root of the source assets, stripped from source URLs to obtain the
    /// engine-relative path, e.g. `https://site/uploads`.
    pub source_root: String,
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            public_base: String::new(),
            base_path: default_base_path(),
            source_root: String::new(),
        }
    }
}

impl UrlConfig {
    pub fn new(
        public_base: impl Into<String>,
        source_root: impl Into<String>,
    ) -> Self {
        Self {
            public_base: public_base.into(),
            base_path: default_base_path(),
            source_root: source_root.into(),
        }
    }

    /// Build the transformation URL for a resolved source URL.
    ///
    /// Empty source → empty string. SVG source → returned unchanged,
    /// parameters ignored.
    pub fn transform_url(&self, source_url: &str, params: &ParameterSet) -> String {
        if source_url.is_empty() {
            return String::new();
        }

        if is_svg(source_url) {
            return source_url.to_string();
        }

        let relative = self.relative_path(source_url);
        let query = params.to_query();
        if query.is_empty() {
            format!("{}/{}{}", self.public_base, self.base_path, relative)
        } else {
            format!("{}/{}{}?{}", self.public_base, self.base_path, relative, query)
        }
    }

    /// Path of a source URL relative to the configured source root.
    ///
    /// Removes the first occurrence of `source_root`; a URL outside the root
    /// is left as-is.
    pub fn relative_path(&self, source_url: &str) -> String {
        if self.source_root.is_empty() {
            return source_url.to_string();
        }
        source_url.replacen(&self.source_root, "", 1)
    }
}

/// Whether a source URL points at a vector asset.
pub(crate) fn is_svg(url: &str) -> bool {
    extension(url) == Some("svg")
}

/// File extension of the path portion of a URL, query/fragment excluded.
fn extension(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let file = path.rsplit('/').next()?;
    match file.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> UrlConfig {
        UrlConfig::new("https://site", "https://site/uploads")
    }

    #[test]
    fn builds_engine_url_with_query() {
        let params = ParameterSet::from_pairs([("w", 300)]);
        assert_eq!(
            config().transform_url("https://site/uploads/x.jpg", &params),
            "https://site/img/x.jpg?w=300"
        );
    }

    #[test]
    fn nested_upload_paths_are_preserved() {
        let params = ParameterSet::from_pairs([("w", 300), ("h", 200)]);
        assert_eq!(
            config().transform_url("https://site/uploads/2024/06/x.jpg", &params),
            "https://site/img/2024/06/x.jpg?w=300&h=200"
        );
    }

    #[test]
    fn empty_source_yields_empty_string() {
        assert_eq!(config().transform_url("", &ParameterSet::new()), "");
    }

    #[test]
    fn svg_passes_through_unchanged() {
        let params = ParameterSet::new().with("w", 300).with("fit", "crop");
        assert_eq!(
            config().transform_url("https://site/uploads/logo.svg", &params),
            "https://site/uploads/logo.svg"
        );
    }

    #[test]
    fn empty_params_omit_query_separator() {
        assert_eq!(
            config().transform_url("https://site/uploads/x.jpg", &ParameterSet::new()),
            "https://site/img/x.jpg"
        );
    }

    #[test]
    fn source_outside_root_is_kept_verbatim() {
        let params = ParameterSet::from_pairs([("w", 100)]);
        assert_eq!(
            config().transform_url("https://cdn.example/pic.jpg", &params),
            "https://site/imghttps://cdn.example/pic.jpg?w=100"
        );
    }

    #[test]
    fn extension_ignores_query_and_fragment() {
        assert_eq!(extension("https://site/a/logo.svg?v=2"), Some("svg"));
        assert_eq!(extension("https://site/a/logo.svg#frag"), Some("svg"));
        assert_eq!(extension("https://site/a/noext"), None);
    }

    #[test]
    fn identical_inputs_build_identical_urls() {
        let params = ParameterSet::from_pairs([("w", 750), ("q", 80)]);
        let a = config().transform_url("https://site/uploads/x.jpg", &params);
        let b = config().transform_url("https://site/uploads/x.jpg", &params);
        assert_eq!(a, b);
    }
}
