//! Safe-area specs and their resolution to image pixels.
//!
//! A spec is four comma-separated [`Dimension`]s, `x1,y1,x2,y2`, naming the
//! top-left and bottom-right corners of the safe rectangle. X values resolve
//! against the image width, y values against the image height.
//!
//! ```
//! use safecover::{ImageSize, SafeAreaSpec};
//!
//! let spec: SafeAreaSpec = "25%, 10, 75%, 100%".parse().unwrap();
//! let rect = spec.resolve(ImageSize::new(1000, 500).unwrap());
//! assert_eq!((rect.x1, rect.y1, rect.x2, rect.y2), (250.0, 10.0, 750.0, 500.0));
//! ```

use core::fmt;
use core::str::FromStr;

use crate::cover::{ImageRect, ImageSize};
use crate::dimension::Dimension;

/// A safe area resolved to absolute image pixels.
pub type SafeAreaRect = ImageRect;

/// Safe-area spec parse error.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SafeAreaError {
    /// The spec did not have exactly four comma-separated values.
    #[error("safe area needs 4 comma-separated values, found {found}")]
    ComponentCount { found: usize },
    /// A value had no leading number. `index` is 0-based (`x1,y1,x2,y2`).
    #[error("safe area value #{index} is not a number or percentage")]
    Malformed { index: usize },
}

/// Unresolved safe area: corners as pixel or percentage values.
///
/// Corners are not required to be ordered. An inverted spec resolves to a
/// rectangle with negative extent, which the layout treats as never
/// overflowing.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "SpecRepr", into = "SpecRepr")
)]
pub struct SafeAreaSpec {
    pub x1: Dimension,
    pub y1: Dimension,
    pub x2: Dimension,
    pub y2: Dimension,
}

impl Default for SafeAreaSpec {
    fn default() -> Self {
        Self::WHOLE_IMAGE
    }
}

impl SafeAreaSpec {
    /// `0%,0%,100%,100%`: the entire image must stay visible.
    pub const WHOLE_IMAGE: Self = Self::percent(0.0, 0.0, 100.0, 100.0);

    pub const fn new(x1: Dimension, y1: Dimension, x2: Dimension, y2: Dimension) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// All four corners in image pixels.
    pub const fn pixels(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(
            Dimension::Pixels(x1),
            Dimension::Pixels(y1),
            Dimension::Pixels(x2),
            Dimension::Pixels(y2),
        )
    }

    /// All four corners as percentages of the image axes.
    pub const fn percent(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(
            Dimension::Percent(x1),
            Dimension::Percent(y1),
            Dimension::Percent(x2),
            Dimension::Percent(y2),
        )
    }

    /// Parse `"x1,y1,x2,y2"`.
    ///
    /// Exactly four values are required; each may carry surrounding
    /// whitespace and a `%` suffix.
    pub fn parse(s: &str) -> Result<Self, SafeAreaError> {
        let found = s.split(',').count();
        if found != 4 {
            return Err(SafeAreaError::ComponentCount { found });
        }
        let mut parts = [Dimension::Pixels(0.0); 4];
        for (index, (slot, text)) in parts.iter_mut().zip(s.split(',')).enumerate() {
            *slot = Dimension::parse(text).map_err(|_| SafeAreaError::Malformed { index })?;
        }
        let [x1, y1, x2, y2] = parts;
        Ok(Self::new(x1, y1, x2, y2))
    }

    /// Resolve to image pixels for the given image.
    pub fn resolve(&self, image: ImageSize) -> SafeAreaRect {
        let w = image.width() as f64;
        let h = image.height() as f64;
        ImageRect::new(
            self.x1.resolve(w),
            self.y1.resolve(h),
            self.x2.resolve(w),
            self.y2.resolve(h),
        )
    }

    /// Whether this spec resolves to the entire image for any image size.
    pub fn is_whole_image(&self) -> bool {
        let zero = |d: Dimension| matches!(d, Dimension::Pixels(v) | Dimension::Percent(v) if v == 0.0);
        zero(self.x1)
            && zero(self.y1)
            && self.x2 == Dimension::Percent(100.0)
            && self.y2 == Dimension::Percent(100.0)
    }
}

impl FromStr for SafeAreaSpec {
    type Err = SafeAreaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SafeAreaSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.x1, self.y1, self.x2, self.y2)
    }
}

#[cfg(feature = "alloc")]
impl TryFrom<alloc::string::String> for SafeAreaSpec {
    type Error = SafeAreaError;

    fn try_from(s: alloc::string::String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

#[cfg(feature = "alloc")]
impl From<SafeAreaSpec> for alloc::string::String {
    fn from(spec: SafeAreaSpec) -> Self {
        alloc::string::ToString::to_string(&spec)
    }
}

/// Serialized form of a [`SafeAreaSpec`].
///
/// The usual form is the `"x1,y1,x2,y2"` string. Pixel values read from text
/// are rounded, so a spec holding fractional pixels is written as a list
/// instead, with pixels as numbers and percentages as `"N%"` strings.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
enum SpecRepr {
    Text(alloc::string::String),
    Corners([DimensionRepr; 4]),
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
enum DimensionRepr {
    Number(f64),
    Text(alloc::string::String),
}

#[cfg(feature = "serde")]
impl From<SafeAreaSpec> for SpecRepr {
    fn from(spec: SafeAreaSpec) -> Self {
        let corners = [spec.x1, spec.y1, spec.x2, spec.y2];
        let survives_text = corners
            .iter()
            .all(|d| matches!(d, Dimension::Percent(_)) || matches!(d, Dimension::Pixels(px) if px.fract() == 0.0));
        if survives_text {
            return Self::Text(spec.into());
        }
        Self::Corners(corners.map(|d| match d {
            Dimension::Pixels(px) => DimensionRepr::Number(px),
            Dimension::Percent(_) => DimensionRepr::Text(alloc::string::ToString::to_string(&d)),
        }))
    }
}

#[cfg(feature = "serde")]
impl TryFrom<SpecRepr> for SafeAreaSpec {
    type Error = SafeAreaError;

    fn try_from(repr: SpecRepr) -> Result<Self, Self::Error> {
        let corners = match repr {
            SpecRepr::Text(text) => return Self::parse(&text),
            SpecRepr::Corners(corners) => corners,
        };
        let mut parts = [Dimension::Pixels(0.0); 4];
        for (index, (slot, corner)) in parts.iter_mut().zip(corners).enumerate() {
            *slot = match corner {
                DimensionRepr::Number(px) => Dimension::Pixels(px),
                DimensionRepr::Text(text) => {
                    Dimension::parse(&text).map_err(|_| SafeAreaError::Malformed { index })?
                }
            };
        }
        let [x1, y1, x2, y2] = parts;
        Ok(Self::new(x1, y1, x2, y2))
    }
}
