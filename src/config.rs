//! Named size configurations.
//!
//! Templates refer to image sizes by symbolic name (`"thumbnail"`,
//! `"hero"`) rather than repeating transformation parameters at every call
//! site. A [`SizeTable`] maps those names to a [`SizeConfig`], which is
//! either one uniform [`ParameterSet`] or a per-viewport shape with
//! `desktop`/`mobile`/`tablet` sets.
//!
//! ## Config File Shape
//!
//! ```toml
//! # Uniform: one parameter set for every viewport
//! [card]
//! w = 400
//! h = 300
//! fit = "crop"
//!
//! # Per-viewport: the presence of a `desktop` table selects this shape
//! [hero.desktop]
//! w = 1920
//! h = 1080
//! fit = "crop"
//!
//! [hero.mobile]
//! w = 768
//! h = 432
//! fit = "crop"
//! ```
//!
//! The shape is decided once at load time: a table containing a `desktop`
//! key becomes [`SizeConfig::PerViewport`], anything else
//! [`SizeConfig::Single`]. Resolution never re-sniffs shapes.
//!
//! ## Built-in Presets
//!
//! A fresh table is seeded with four presets (`thumbnail`, `medium`,
//! `large`, `hero`), each per-viewport with center-crop fits. Caller config
//! merges into this table, last writer wins per top-level name.
//!
//! ## Missing Keys
//!
//! An unresolvable size key is not an error: it logs a warning and yields an
//! empty parameter set, which callers treat as "no transformation applied"
//! so templates still render.

use crate::params::{ParamValue, ParameterSet};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// A named size configuration: uniform or per-viewport.
#[derive(Debug, Clone, PartialEq)]
pub enum SizeConfig {
    /// One parameter set applied to every viewport.
    Single(ParameterSet),
    /// Distinct parameter sets per viewport. `desktop` is required by the
    /// shape; `mobile` and `tablet` are optional.
    PerViewport {
        desktop: ParameterSet,
        mobile: Option<ParameterSet>,
        tablet: Option<ParameterSet>,
    },
}

impl SizeConfig {
    /// The empty uniform config — "no transformation applied".
    pub fn empty() -> Self {
        SizeConfig::Single(ParameterSet::new())
    }

    /// True when the config carries no parameters at all.
    pub fn is_empty(&self) -> bool {
        match self {
            SizeConfig::Single(p) => p.is_empty(),
            SizeConfig::PerViewport {
                desktop,
                mobile,
                tablet,
            } => {
                desktop.is_empty()
                    && mobile.as_ref().is_none_or(ParameterSet::is_empty)
                    && tablet.as_ref().is_none_or(ParameterSet::is_empty)
            }
        }
    }
}

/// Raw map entry during [`SizeConfig`] deserialization: either a nested
/// viewport table or a scalar parameter value.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Params(ParameterSet),
    Value(ParamValue),
}

impl<'de> Deserialize<'de> for SizeConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ConfigVisitor;

        impl<'de> Visitor<'de> for ConfigVisitor {
            type Value = SizeConfig;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a parameter map or a desktop/mobile/tablet map")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<SizeConfig, A::Error> {
                let mut entries: Vec<(String, RawEntry)> = Vec::new();
                while let Some(entry) = map.next_entry::<String, RawEntry>()? {
                    entries.push(entry);
                }

                // Shape detection happens here, exactly once: a `desktop`
                // table selects the per-viewport shape.
                let per_viewport = entries
                    .iter()
                    .any(|(k, v)| k == "desktop" && matches!(v, RawEntry::Params(_)));

                if per_viewport {
                    let mut desktop = None;
                    let mut mobile = None;
                    let mut tablet = None;
                    for (key, value) in entries {
                        let RawEntry::Params(params) = value else {
                            return Err(serde::de::Error::custom(format!(
                                "viewport entry `{key}` must be a parameter table"
                            )));
                        };
                        match key.as_str() {
                            "desktop" => desktop = Some(params),
                            "mobile" => mobile = Some(params),
                            "tablet" => tablet = Some(params),
                            other => {
                                return Err(serde::de::Error::custom(format!(
                                    "unknown viewport `{other}` (expected desktop, mobile, or tablet)"
                                )));
                            }
                        }
                    }
                    Ok(SizeConfig::PerViewport {
                        desktop: desktop.unwrap_or_default(),
                        mobile,
                        tablet,
                    })
                } else {
                    let mut params = ParameterSet::new();
                    for (key, value) in entries {
                        let RawEntry::Value(value) = value else {
                            return Err(serde::de::Error::custom(format!(
                                "parameter `{key}` must be a scalar value"
                            )));
                        };
                        params.set(key, value);
                    }
                    Ok(SizeConfig::Single(params))
                }
            }
        }

        deserializer.deserialize_map(ConfigVisitor)
    }
}

/// Table of named size configurations.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct SizeTable {
    sizes: BTreeMap<String, SizeConfig>,
}

fn crop_set(w: u32, h: u32) -> ParameterSet {
    let mut params = ParameterSet::from_pairs([("w", w), ("h", h)]);
    params.set("fit", "crop");
    params
}

fn preset(desktop: (u32, u32), mobile: (u32, u32), tablet: (u32, u32)) -> SizeConfig {
    SizeConfig::PerViewport {
        desktop: crop_set(desktop.0, desktop.1),
        mobile: Some(crop_set(mobile.0, mobile.1)),
        tablet: Some(crop_set(tablet.0, tablet.1)),
    }
}

impl Default for SizeTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SizeTable {
    /// An empty table with no presets.
    pub fn empty() -> Self {
        Self {
            sizes: BTreeMap::new(),
        }
    }

    /// The built-in preset table: `thumbnail`, `medium`, `large`, `hero`,
    /// each a per-viewport center-crop configuration.
    pub fn builtin() -> Self {
        let mut sizes = BTreeMap::new();
        sizes.insert(
            "thumbnail".to_string(),
            preset((300, 300), (150, 150), (225, 225)),
        );
        sizes.insert(
            "medium".to_string(),
            preset((600, 400), (300, 200), (450, 300)),
        );
        sizes.insert(
            "large".to_string(),
            preset((1200, 800), (600, 400), (900, 600)),
        );
        sizes.insert(
            "hero".to_string(),
            preset((1920, 1080), (768, 432), (1024, 576)),
        );
        Self { sizes }
    }

    /// Parse a table from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a table from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// Merge `other` into this table, last writer wins per name.
    pub fn merge(&mut self, other: SizeTable) {
        self.sizes.extend(other.sizes);
    }

    /// Insert or replace a single named configuration.
    pub fn insert(&mut self, name: impl Into<String>, config: SizeConfig) {
        self.sizes.insert(name.into(), config);
    }

    pub fn get(&self, name: &str) -> Option<&SizeConfig> {
        self.sizes.get(name)
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Resolve a size key to its configuration.
    ///
    /// A dotted two-segment key (`"hero.mobile"`) addresses one viewport's
    /// parameter set directly inside a per-viewport configuration and comes
    /// back as [`SizeConfig::Single`]. A missing key is non-fatal: it logs a
    /// warning and yields the empty config.
    pub fn resolve(&self, key: &str) -> SizeConfig {
        if let Some((group, viewport)) = key.split_once('.') {
            return self.resolve_viewport(group, viewport);
        }

        match self.sizes.get(key) {
            Some(config) => config.clone(),
            None => {
                tracing::warn!(size = key, "image size not found in config");
                SizeConfig::empty()
            }
        }
    }

    /// Direct nested lookup for the dotted form, bypassing shape detection.
    fn resolve_viewport(&self, group: &str, viewport: &str) -> SizeConfig {
        let Some(config) = self.sizes.get(group) else {
            tracing::warn!(size = group, "image size not found in config");
            return SizeConfig::empty();
        };

        let params = match (config, viewport) {
            (SizeConfig::PerViewport { desktop, .. }, "desktop") => Some(desktop.clone()),
            (SizeConfig::PerViewport { mobile, .. }, "mobile") => mobile.clone(),
            (SizeConfig::PerViewport { tablet, .. }, "tablet") => tablet.clone(),
            _ => None,
        };

        match params {
            Some(params) => SizeConfig::Single(params),
            None => {
                tracing::warn!(size = group, viewport, "viewport not present in size config");
                SizeConfig::empty()
            }
        }
    }
}
