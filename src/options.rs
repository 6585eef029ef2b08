//! Widget configuration.
//!
//! [`CoverOptions`] is an immutable value: reconfiguring a controller replaces
//! it wholesale. [`OptionsPatch`] carries partially specified options (element
//! data attributes, caller overrides) that are layered over the defaults.
//!
//! ```
//! use safecover::{CoverOptions, OptionsPatch, SafeAreaSpec};
//!
//! let data = OptionsPatch::from_attributes([("safearea", "10%,0%,90%,100%"), ("foo", "bar")])?;
//! let explicit = OptionsPatch::default().image("hero.jpg");
//!
//! let options = CoverOptions::layered(data, explicit)?;
//! assert_eq!(options.image.as_deref(), Some("hero.jpg"));
//! assert_eq!(options.safe_area, SafeAreaSpec::percent(10.0, 0.0, 90.0, 100.0));
//! # Ok::<(), safecover::ConfigurationError>(())
//! ```

use alloc::string::String;
use core::time::Duration;

use crate::cover::{ClampPolicy, FitPolicy};
use crate::resize::DEFAULT_RESIZE_INTERVAL;
use crate::safe_area::{SafeAreaError, SafeAreaSpec};

/// Configuration error, returned synchronously where the offending value is
/// assigned.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    /// No explicit image and no `background-image` to derive one from.
    #[error("no background image available")]
    MissingImage,
    /// A `background-image` value exists but holds no `url(...)`.
    #[error("background image could not be retrieved from {value:?}")]
    UnparsableImage { value: String },
    /// The safe-area spec could not be parsed.
    #[error("invalid safe area: {0}")]
    SafeArea(#[from] SafeAreaError),
    /// The resize interval is zero or not a whole number of milliseconds.
    #[error("resize interval must be a positive number of milliseconds")]
    ResizeInterval,
    /// A recognized attribute carried a value of the wrong kind.
    #[error("invalid value {value:?} for option {key}")]
    InvalidAttribute { key: &'static str, value: String },
}

/// Complete, validated widget configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct CoverOptions {
    /// Image URL. `None` derives it from the host's `background-image`.
    pub image: Option<String>,
    /// Region of the image that must stay visible.
    #[cfg_attr(feature = "serde", serde(rename = "safearea"))]
    pub safe_area: SafeAreaSpec,
    /// Poll interval for hosts without native resize observation.
    #[cfg_attr(feature = "serde", serde(with = "millis"))]
    pub resize_interval: Duration,
    pub fit_policy: FitPolicy,
    pub clamp_policy: ClampPolicy,
}

impl Default for CoverOptions {
    fn default() -> Self {
        Self {
            image: None,
            safe_area: SafeAreaSpec::WHOLE_IMAGE,
            resize_interval: DEFAULT_RESIZE_INTERVAL,
            fit_policy: FitPolicy::default(),
            clamp_policy: ClampPolicy::default(),
        }
    }
}

impl CoverOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an explicit image URL.
    pub fn image(mut self, url: impl Into<String>) -> Self {
        self.image = Some(url.into());
        self
    }

    pub fn safe_area(mut self, spec: SafeAreaSpec) -> Self {
        self.safe_area = spec;
        self
    }

    pub fn resize_interval(mut self, interval: Duration) -> Self {
        self.resize_interval = interval;
        self
    }

    pub fn fit_policy(mut self, fit: FitPolicy) -> Self {
        self.fit_policy = fit;
        self
    }

    pub fn clamp_policy(mut self, clamp: ClampPolicy) -> Self {
        self.clamp_policy = clamp;
        self
    }

    /// Check invariants that the type does not enforce.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let interval = self.resize_interval;
        if interval.is_zero() || interval.subsec_nanos() % 1_000_000 != 0 {
            return Err(ConfigurationError::ResizeInterval);
        }
        Ok(())
    }

    /// Build options from defaults, then element data attributes, then
    /// explicit caller options. Later layers win field by field.
    pub fn layered(data: OptionsPatch, explicit: OptionsPatch) -> Result<Self, ConfigurationError> {
        data.merge(explicit).into_options()
    }
}

/// Partially specified options. Unset fields fall through to the layer below.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OptionsPatch {
    pub image: Option<String>,
    /// Raw safe-area text, parsed when the patch is turned into options.
    pub safe_area: Option<String>,
    pub resize_interval: Option<Duration>,
    pub fit_policy: Option<FitPolicy>,
    pub clamp_policy: Option<ClampPolicy>,
}

impl OptionsPatch {
    pub fn image(mut self, url: impl Into<String>) -> Self {
        self.image = Some(url.into());
        self
    }

    pub fn safe_area(mut self, spec: impl Into<String>) -> Self {
        self.safe_area = Some(spec.into());
        self
    }

    pub fn resize_interval(mut self, interval: Duration) -> Self {
        self.resize_interval = Some(interval);
        self
    }

    /// Read options from element data attributes.
    ///
    /// Keys are matched case-insensitively with `-`/`_` ignored, so
    /// `resizeInterval`, `resize-interval` and `data-resize-interval` all
    /// name the same option. Unknown keys are ignored; they belong to other
    /// consumers of the element's data.
    pub fn from_attributes<'a, I>(attributes: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut patch = Self::default();
        for (key, value) in attributes {
            let key = normalize_key(key);
            match key.as_str() {
                "image" => patch.image = Some(String::from(value.trim())),
                "safearea" => patch.safe_area = Some(String::from(value)),
                "resizeinterval" => {
                    let ms = value
                        .trim()
                        .parse::<u64>()
                        .map_err(|_| invalid("resizeInterval", value))?;
                    patch.resize_interval = Some(Duration::from_millis(ms));
                }
                "fitpolicy" => {
                    patch.fit_policy = Some(match value.trim().to_ascii_lowercase().as_str() {
                        "cover" => FitPolicy::Cover,
                        "containsafearea" | "contain" => FitPolicy::ContainSafeArea,
                        _ => return Err(invalid("fitPolicy", value)),
                    });
                }
                "clamppolicy" => {
                    patch.clamp_policy = Some(match value.trim().to_ascii_lowercase().as_str() {
                        "centered" | "center" => ClampPolicy::Centered,
                        "legacy" => ClampPolicy::Legacy,
                        _ => return Err(invalid("clampPolicy", value)),
                    });
                }
                _ => {}
            }
        }
        Ok(patch)
    }

    /// Overlay `over` on top of `self`; fields set in `over` win.
    pub fn merge(self, over: OptionsPatch) -> Self {
        Self {
            image: over.image.or(self.image),
            safe_area: over.safe_area.or(self.safe_area),
            resize_interval: over.resize_interval.or(self.resize_interval),
            fit_policy: over.fit_policy.or(self.fit_policy),
            clamp_policy: over.clamp_policy.or(self.clamp_policy),
        }
    }

    /// Fill unset fields from defaults and validate.
    ///
    /// An empty image string counts as unset.
    pub fn into_options(self) -> Result<CoverOptions, ConfigurationError> {
        let defaults = CoverOptions::default();
        let safe_area = match &self.safe_area {
            Some(text) => SafeAreaSpec::parse(text)?,
            None => defaults.safe_area,
        };
        let options = CoverOptions {
            image: self.image.filter(|url| !url.is_empty()),
            safe_area,
            resize_interval: self.resize_interval.unwrap_or(defaults.resize_interval),
            fit_policy: self.fit_policy.unwrap_or(defaults.fit_policy),
            clamp_policy: self.clamp_policy.unwrap_or(defaults.clamp_policy),
        };
        options.validate()?;
        Ok(options)
    }
}

fn invalid(key: &'static str, value: &str) -> ConfigurationError {
    ConfigurationError::InvalidAttribute {
        key,
        value: String::from(value),
    }
}

fn normalize_key(key: &str) -> String {
    let key = key.strip_prefix("data-").unwrap_or(key);
    key.chars()
        .filter(|c| *c != '-' && *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(feature = "serde")]
mod millis {
    use core::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
