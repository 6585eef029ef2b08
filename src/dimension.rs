//! Pixel and percentage values, resolved against one axis of an image.
//!
//! A dimension is written either as a plain number of image pixels
//! (`"120"`, `" 120px "`) or as a percentage of the image axis (`"25%"`).
//! Parsing accepts the leading numeric portion of the text, so unit suffixes
//! and trailing garbage are ignored; text with no leading number is rejected.
//!
//! ```
//! use safecover::Dimension;
//!
//! assert_eq!(Dimension::parse("50%").unwrap().resolve(200.0), 100.0);
//! assert_eq!(Dimension::parse("10").unwrap().resolve(200.0), 10.0);
//! assert_eq!(Dimension::from(5.0).resolve(200.0), 5.0);
//! ```

use core::fmt;
use core::str::FromStr;

use crate::math::round_half_up;

/// One component of a safe-area spec.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Dimension {
    /// Absolute image pixels. Resolved unchanged.
    Pixels(f64),
    /// Percentage of the image axis (`50.0` = half).
    Percent(f64),
}

/// Text that has no leading numeric value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("dimension has no leading numeric value")]
pub struct ParseDimensionError;

impl Dimension {
    /// Parse a pixel or percentage value.
    ///
    /// Surrounding whitespace is ignored. A trailing `%` selects
    /// [`Percent`](Self::Percent); anything else is a pixel count, rounded to
    /// a whole pixel.
    pub fn parse(s: &str) -> Result<Self, ParseDimensionError> {
        let s = s.trim();
        let value = parse_leading_f64(s).ok_or(ParseDimensionError)?;
        if s.ends_with('%') {
            Ok(Self::Percent(value))
        } else {
            Ok(Self::Pixels(round_half_up(value)))
        }
    }

    /// Resolve to absolute pixels along an image axis of length `base`.
    ///
    /// Percentages are rounded to whole pixels; pixel values pass through.
    pub fn resolve(self, base: f64) -> f64 {
        match self {
            Self::Pixels(px) => px,
            Self::Percent(pct) => round_half_up(pct / 100.0 * base),
        }
    }
}

impl From<f64> for Dimension {
    fn from(px: f64) -> Self {
        Self::Pixels(px)
    }
}

impl From<u32> for Dimension {
    fn from(px: u32) -> Self {
        Self::Pixels(px as f64)
    }
}

impl FromStr for Dimension {
    type Err = ParseDimensionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pixels(px) => write!(f, "{px}"),
            Self::Percent(pct) => write!(f, "{pct}%"),
        }
    }
}

/// Parse the longest numeric prefix of `s`: optional sign, digits with an
/// optional fraction, optional exponent, or `Infinity`.
fn parse_leading_f64(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    if s[end..].starts_with("Infinity") {
        end += "Infinity".len();
        return s[..end].parse().ok();
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse().ok()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
