//! Legacy call-shape adapter.
//!
//! Older templates call this library through a handful of historical
//! method shapes: `get`, `getImage`, `getImages`, `getImageUrlForSize`,
//! and the original URL helper `getGlideImageUrl`. [`Legacy`] maps those
//! shapes onto the modern resolver/builder pair while reproducing the old
//! output structure exactly: a mapping with `desktop`/`mobile`/`tablet`
//! keys, each either an empty string or a `{url, webp, alt, width?,
//! height?}` record.
//!
//! The typed methods are the supported surface — an unknown operation is a
//! compile error, not a runtime lookup. For callers that still dispatch by
//! method name (template engines, config-driven render pipelines),
//! [`Legacy::call`] covers exactly the enumerated methods over JSON
//! arguments and reports [`CompatError::UnsupportedOperation`] for anything
//! else.
//!
//! ## Sentinels
//!
//! The historical `get` signature used `-1` for "no separate mobile/tablet
//! image". The typed method takes `Option<&ImageRef>` instead;
//! [`Legacy::call`] translates negative ids to `None` at the boundary.

use crate::config::SizeConfig;
use crate::images::Images;
use crate::media::{ImageRef, MediaStore};
use crate::params::{ParamValue, ParameterSet};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompatError {
    #[error("unknown legacy method `{0}`")]
    UnsupportedOperation(String),
    #[error("invalid arguments for legacy method `{0}`")]
    InvalidArguments(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One viewport's record in the legacy output shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyImage {
    pub url: String,
    pub webp: String,
    /// Present on `get` records, absent on `getImage`/`getImages` records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    /// Echo of the `w` parameter, when supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<ParamValue>,
    /// Echo of the `h` parameter, when supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<ParamValue>,
}

/// A viewport slot: an image record, or the empty string.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LegacySlot {
    #[default]
    Empty,
    Image(LegacyImage),
}

impl LegacySlot {
    pub fn is_empty(&self) -> bool {
        matches!(self, LegacySlot::Empty)
    }

    pub fn as_image(&self) -> Option<&LegacyImage> {
        match self {
            LegacySlot::Empty => None,
            LegacySlot::Image(image) => Some(image),
        }
    }
}

impl Serialize for LegacySlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            // The legacy shape uses an empty string, not null or a missing
            // key, for an absent viewport.
            LegacySlot::Empty => serializer.serialize_str(""),
            LegacySlot::Image(image) => image.serialize(serializer),
        }
    }
}

/// The legacy multi-viewport output: always exactly these three keys.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct LegacyImageSet {
    pub desktop: LegacySlot,
    pub mobile: LegacySlot,
    pub tablet: LegacySlot,
}

/// One viewport's input to `getImages`: an image plus its parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacySpec {
    #[serde(alias = "id")]
    pub image: ImageRef,
    #[serde(default)]
    pub params: ParameterSet,
}

/// Argument that may be a full spec or a bare image reference.
#[derive(Deserialize)]
#[serde(untagged)]
enum SpecArg {
    Spec(LegacySpec),
    Image(ImageRef),
}

impl From<SpecArg> for LegacySpec {
    fn from(arg: SpecArg) -> Self {
        match arg {
            SpecArg::Spec(spec) => spec,
            SpecArg::Image(image) => LegacySpec {
                image,
                params: ParameterSet::new(),
            },
        }
    }
}

/// Adapter exposing the pre-v3 call shapes over a modern [`Images`] service.
pub struct Legacy<'a, M> {
    images: &'a Images<M>,
}

impl<'a, M: MediaStore> Legacy<'a, M> {
    pub fn new(images: &'a Images<M>) -> Self {
        Self { images }
    }

    /// The historical `get`: size-key driven, multi-viewport output.
    ///
    /// A single-set size config produces a desktop-only result. A
    /// per-viewport config fills each configured viewport, with
    /// `mobile_image`/`tablet_image` falling back to the primary `image`.
    /// A viewport whose resolved parameter set is empty stays an empty
    /// string.
    pub fn get(
        &self,
        image: &ImageRef,
        size_key: &str,
        mobile_image: Option<&ImageRef>,
        tablet_image: Option<&ImageRef>,
    ) -> LegacyImageSet {
        let mut set = LegacyImageSet::default();

        match self.images.resolve_size(size_key) {
            SizeConfig::Single(params) => {
                if !params.is_empty() {
                    set.desktop = LegacySlot::Image(self.record(image, &params, true));
                }
            }
            SizeConfig::PerViewport {
                desktop,
                mobile,
                tablet,
            } => {
                if !desktop.is_empty() {
                    set.desktop = LegacySlot::Image(self.record(image, &desktop, true));
                }
                if let Some(params) = mobile.filter(|p| !p.is_empty()) {
                    let target = mobile_image.unwrap_or(image);
                    set.mobile = LegacySlot::Image(self.record(target, &params, true));
                }
                if let Some(params) = tablet.filter(|p| !p.is_empty()) {
                    let target = tablet_image.unwrap_or(image);
                    set.tablet = LegacySlot::Image(self.record(target, &params, true));
                }
            }
        }

        set
    }

    /// The historical single-image call. `None` parameters apply the old
    /// default of a 500×500 crop.
    pub fn get_image(&self, image: &ImageRef, params: Option<ParameterSet>) -> LegacyImage {
        let params = params.unwrap_or_else(default_image_params);
        self.record(image, &params, false)
    }

    /// The historical multi-viewport call with explicit per-viewport specs.
    pub fn get_images(
        &self,
        desktop: &LegacySpec,
        mobile: Option<&LegacySpec>,
        tablet: Option<&LegacySpec>,
    ) -> LegacyImageSet {
        let mut set = LegacyImageSet::default();
        set.desktop = LegacySlot::Image(self.record(&desktop.image, &desktop.params, false));
        if let Some(spec) = mobile {
            set.mobile = LegacySlot::Image(self.record(&spec.image, &spec.params, false));
        }
        if let Some(spec) = tablet {
            set.tablet = LegacySlot::Image(self.record(&spec.image, &spec.params, false));
        }
        set
    }

    /// URL for a named size: the desktop set of a per-viewport config, the
    /// whole set of a single config.
    pub fn get_image_url_for_size(&self, image: &ImageRef, size_key: &str) -> String {
        self.images.url_for_size(image, size_key)
    }

    /// Dispatch one of the enumerated legacy methods by name over JSON
    /// arguments.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, CompatError> {
        match name {
            "get" => {
                let image: ImageRef = required_arg(args, 0, name)?;
                let size_key: String = required_arg(args, 1, name)?;
                let mobile = sentinel_ref(optional_arg(args, 2, name)?);
                let tablet = sentinel_ref(optional_arg(args, 3, name)?);
                let set = self.get(&image, &size_key, mobile.as_ref(), tablet.as_ref());
                Ok(serde_json::to_value(set)?)
            }
            "getImage" => {
                let image: ImageRef = required_arg(args, 0, name)?;
                let params: Option<ParameterSet> = optional_arg(args, 1, name)?;
                Ok(serde_json::to_value(self.get_image(&image, params))?)
            }
            "getImages" => {
                let desktop: LegacySpec = required_arg::<SpecArg>(args, 0, name)?.into();
                let mobile: Option<LegacySpec> =
                    optional_arg::<SpecArg>(args, 1, name)?.map(Into::into);
                let tablet: Option<LegacySpec> =
                    optional_arg::<SpecArg>(args, 2, name)?.map(Into::into);
                let set = self.get_images(&desktop, mobile.as_ref(), tablet.as_ref());
                Ok(serde_json::to_value(set)?)
            }
            "getImageUrlForSize" => {
                let spec: LegacySpec = required_arg::<SpecArg>(args, 0, name)?.into();
                let size_key: String = required_arg(args, 1, name)?;
                Ok(Value::String(
                    self.get_image_url_for_size(&spec.image, &size_key),
                ))
            }
            "getGlideImageUrl" | "getUrl" => {
                let image: ImageRef = required_arg(args, 0, name)?;
                let params: Option<ParameterSet> = optional_arg(args, 1, name)?;
                Ok(Value::String(
                    self.images.url(&image, &params.unwrap_or_default()),
                ))
            }
            _ => Err(CompatError::UnsupportedOperation(name.to_string())),
        }
    }

    /// Build one viewport record: native URL, webp variant, optional alt,
    /// and the `w`/`h` parameters echoed back.
    fn record(&self, image: &ImageRef, params: &ParameterSet, with_alt: bool) -> LegacyImage {
        LegacyImage {
            url: self.images.url(image, params),
            webp: self.images.url(image, &params.with("fm", "webp")),
            alt: with_alt.then(|| self.images.media().alt_of(image)),
            width: params.get("w").cloned(),
            height: params.get("h").cloned(),
        }
    }
}

/// The historical `getImage` default parameters.
fn default_image_params() -> ParameterSet {
    let mut params = ParameterSet::from_pairs([("w", 500), ("h", 500)]);
    params.set("fit", "crop");
    params
}

/// Translate the legacy `-1` id sentinel into absence.
fn sentinel_ref(image: Option<ImageRef>) -> Option<ImageRef> {
    image.filter(|r| !matches!(r, ImageRef::Id(id) if *id < 0))
}

fn required_arg<T: DeserializeOwned>(
    args: &[Value],
    index: usize,
    method: &str,
) -> Result<T, CompatError> {
    let value = args
        .get(index)
        .cloned()
        .ok_or_else(|| CompatError::InvalidArguments(method.to_string()))?;
    serde_json::from_value(value).map_err(|_| CompatError::InvalidArguments(method.to_string()))
}

fn optional_arg<T: DeserializeOwned>(
    args: &[Value],
    index: usize,
    method: &str,
) -> Result<Option<T>, CompatError> {
    match args.get(index) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|_| CompatError::InvalidArguments(method.to_string())),
    }
}
