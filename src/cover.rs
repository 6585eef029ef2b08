//! Cover-fit layout with safe-area clamping.
//!
//! Scales an image so it covers a container while preserving aspect ratio,
//! then positions it so that a safe area of the image stays inside the
//! visible viewport. Pure geometry with no allocation, `no_std` compatible.
//!
//! # Example
//!
//! ```
//! use safecover::{ClampPolicy, ContainerSize, FitPolicy, ImageSize, SafeAreaSpec, compute_cover};
//!
//! let image = ImageSize::new(1000, 500).unwrap();
//! let safe = SafeAreaSpec::parse("0%,0%,30%,100%").unwrap().resolve(image);
//!
//! let layout = compute_cover(
//!     image,
//!     &safe,
//!     ContainerSize::new(400.0, 400.0),
//!     FitPolicy::Cover,
//!     ClampPolicy::Centered,
//! );
//!
//! // Scaled to cover 400×400, shifted left so the left 30% stays visible.
//! assert_eq!((layout.width, layout.height), (800.0, 400.0));
//! assert_eq!((layout.offset_x, layout.offset_y), (0.0, 0.0));
//! ```

use crate::math::round_half_up;

/// Natural pixel dimensions of a source image. Both axes are non-zero.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImageSize {
    width: u32,
    height: u32,
}

impl ImageSize {
    /// Create an image size. Returns `None` if either axis is zero.
    pub const fn new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            None
        } else {
            Some(Self { width, height })
        }
    }

    /// Width in pixels.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Width divided by height.
    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

/// Current rendered size of the container hosting the image.
///
/// Not validated: a zero or negative size is representable and produces a
/// non-finite [`CoverLayout`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ContainerSize {
    pub width: f64,
    pub height: f64,
}

impl ContainerSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Rectangle in image pixel coordinates, given by its corners.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ImageRect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl ImageRect {
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// The whole image.
    pub fn full(image: ImageSize) -> Self {
        Self::new(0.0, 0.0, image.width as f64, image.height as f64)
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Non-finite corners or a non-positive extent on either axis.
    pub fn is_degenerate(&self) -> bool {
        !(self.x1.is_finite() && self.y1.is_finite() && self.x2.is_finite() && self.y2.is_finite())
            || self.width() <= 0.0
            || self.height() <= 0.0
    }

    /// Whether `other` lies inside this rect, allowing `tolerance` pixels of slack.
    pub fn contains(&self, other: &ImageRect, tolerance: f64) -> bool {
        other.x1 >= self.x1 - tolerance
            && other.y1 >= self.y1 - tolerance
            && other.x2 <= self.x2 + tolerance
            && other.y2 <= self.y2 + tolerance
    }
}

/// What to give up when the safe area cannot fit at cover scale.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum FitPolicy {
    /// Always cover the container. When the safe area is larger than the
    /// viewport at cover scale, it is cropped and positioned by the
    /// [`ClampPolicy`].
    #[default]
    Cover,
    /// Shrink the image until the safe area fits the viewport on the cropped
    /// axis, even if the container is no longer fully covered.
    ContainSafeArea,
}

/// How to position the image when the safe area overflows both edges of an axis.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum ClampPolicy {
    /// Center the safe area in the viewport.
    #[default]
    Centered,
    /// Align the leading (top/left) edge of the safe area with the viewport.
    Legacy,
}

/// Computed size and offset of the scaled image.
///
/// All fields hold whole numbers when the inputs are valid. A degenerate
/// container yields non-finite fields; check [`is_finite`](Self::is_finite)
/// or use [`to_placement`](Self::to_placement) before rendering.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CoverLayout {
    /// Scaled image width.
    pub width: f64,
    /// Scaled image height.
    pub height: f64,
    /// Horizontal position of the image's left edge relative to the container.
    pub offset_x: f64,
    /// Vertical position of the image's top edge relative to the container.
    pub offset_y: f64,
    /// Whether the safe area fits the viewport on both axes.
    pub safe_area_visible: bool,
}

impl CoverLayout {
    /// Result for a container with no visible area.
    pub const DEGENERATE: Self = Self {
        width: f64::NAN,
        height: f64::NAN,
        offset_x: f64::NAN,
        offset_y: f64::NAN,
        safe_area_visible: false,
    };

    pub fn is_finite(&self) -> bool {
        self.width.is_finite()
            && self.height.is_finite()
            && self.offset_x.is_finite()
            && self.offset_y.is_finite()
    }

    /// Scale factor from natural to rendered pixels.
    pub fn scale(&self, image: ImageSize) -> f64 {
        self.width / image.width as f64
    }

    /// Region of the image, in natural pixels, visible through the container.
    ///
    /// May extend past the image bounds when the container is not covered.
    pub fn visible_region(&self, image: ImageSize, container: ContainerSize) -> ImageRect {
        let scale = self.scale(image);
        let x1 = -self.offset_x / scale;
        let y1 = -self.offset_y / scale;
        ImageRect::new(
            x1,
            y1,
            x1 + container.width / scale,
            y1 + container.height / scale,
        )
    }

    /// Integer placement, or `None` if any field is non-finite or out of range.
    ///
    /// Fractional fields are rounded half up, never truncated.
    pub fn to_placement(&self) -> Option<Placement> {
        if !self.is_finite() {
            return None;
        }
        let width = round_half_up(self.width);
        let height = round_half_up(self.height);
        let offset_x = round_half_up(self.offset_x);
        let offset_y = round_half_up(self.offset_y);
        let fits_u32 = |v: f64| (0.0..=u32::MAX as f64).contains(&v);
        let fits_i32 = |v: f64| (i32::MIN as f64..=i32::MAX as f64).contains(&v);
        if !(fits_u32(width) && fits_u32(height) && fits_i32(offset_x) && fits_i32(offset_y)) {
            return None;
        }
        Some(Placement {
            width: width as u32,
            height: height as u32,
            x: offset_x as i32,
            y: offset_y as i32,
        })
    }
}

/// Integer size and position ready to hand to a rendering surface.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Placement {
    pub width: u32,
    pub height: u32,
    /// Left edge relative to the container (usually ≤ 0).
    pub x: i32,
    /// Top edge relative to the container (usually ≤ 0).
    pub y: i32,
}

/// Compute the cover layout of `image` in `container`, keeping `safe_area`
/// visible when possible.
///
/// Never panics: a container without positive finite extent yields
/// [`CoverLayout::DEGENERATE`], and a degenerate safe area propagates as
/// non-finite or nonsensical values.
pub fn compute_cover(
    image: ImageSize,
    safe_area: &ImageRect,
    container: ContainerSize,
    fit: FitPolicy,
    clamp: ClampPolicy,
) -> CoverLayout {
    let (node_w, node_h) = (container.width, container.height);
    if !(node_w > 0.0 && node_h > 0.0 && node_w.is_finite() && node_h.is_finite()) {
        return CoverLayout::DEGENERATE;
    }
    let (w, h) = (image.width as f64, image.height as f64);
    let node_aspect = node_w / node_h;
    let aspect = w / h;

    let safe_w = safe_area.width();
    let safe_h = safe_area.height();

    // Step 1: cover fit on the axis where the container is relatively larger.
    // The other axis overflows and gets cropped.
    let crop_vertical = node_aspect > aspect;
    // Both sides are whole pixels, including the one taken from the container.
    let (mut scaled_w, mut scaled_h) = if crop_vertical {
        let scaled_w = round_half_up(node_w);
        (scaled_w, round_half_up(scaled_w / aspect))
    } else {
        let scaled_h = round_half_up(node_h);
        (round_half_up(scaled_h * aspect), scaled_h)
    };
    let mut scale = scaled_w / w;

    // Step 2: on the cropped axis, the safe area may not fit the viewport.
    let overflows = if crop_vertical {
        safe_h * scale > node_h
    } else {
        safe_w * scale > node_w
    };
    if overflows && fit == FitPolicy::ContainSafeArea {
        if crop_vertical {
            scaled_h = round_half_up(node_h / (safe_h / h));
            scaled_w = round_half_up(scaled_h * aspect);
        } else {
            scaled_w = round_half_up(node_w / (safe_w / w));
            scaled_h = round_half_up(scaled_w / aspect);
        }
        scale = scaled_w / w;
    }

    // Step 3: center, then pull the safe area back into view per axis.
    let offset_y = clamp_axis(
        (scaled_h - node_h) / 2.0,
        scaled_h,
        node_h,
        safe_area.y1 * scale,
        safe_area.y2 * scale,
        clamp,
    );
    let offset_x = clamp_axis(
        (scaled_w - node_w) / 2.0,
        scaled_w,
        node_w,
        safe_area.x1 * scale,
        safe_area.x2 * scale,
        clamp,
    );

    let tolerance = 0.5;
    let safe_area_visible = safe_w * scale <= node_w + tolerance && safe_h * scale <= node_h + tolerance;

    CoverLayout {
        width: scaled_w,
        height: scaled_h,
        offset_x: round_half_up(-offset_x),
        offset_y: round_half_up(-offset_y),
        safe_area_visible,
    }
}

/// Adjust a crop offset along one axis so `[near, far]` (scaled image
/// coordinates) falls inside `[offset, offset + viewport]`.
///
/// `offset` is how far the viewport starts into the scaled image.
fn clamp_axis(
    offset: f64,
    scaled: f64,
    viewport: f64,
    near: f64,
    far: f64,
    clamp: ClampPolicy,
) -> f64 {
    if clamp == ClampPolicy::Centered && far - near > viewport {
        return (near + far) / 2.0 - viewport / 2.0;
    }
    let over_near = near - offset;
    let over_far = scaled - far - offset;
    if over_near < 0.0 {
        offset + over_near
    } else if over_far < 0.0 {
        offset - over_far
    } else {
        offset
    }
}
