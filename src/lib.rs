//! Cover-fit image layout that keeps a safe area of the image visible.
//!
//! Pure geometry at the core, `no_std` compatible. The host (a browser
//! binding, a UI toolkit, a test harness) supplies container sizes and natural
//! image sizes and receives a size + offset to apply to its rendering surface.
//!
//! # Modules
//!
//! - [`dimension`]: pixel/percentage values and their resolution against an image axis
//! - [`safe_area`]: safe-area specs (`"x1,y1,x2,y2"`) and their resolved rectangles
//! - [`cover`]: the cover-fit layout computation with safe-area clamping
//! - [`engine`]: [`CoverLayoutEngine`], the per-image layout state
//! - [`resize`]: container resize observation (event-driven or polled)
//! - [`options`]: immutable configuration and layered option patches (`alloc`)
//! - [`render`]: render modes and style declarations (`alloc`)
//! - [`controller`]: trigger sequencing against a [`Host`] (`alloc`)
//! - `svg`: SVG visualization of a computed layout (`svg` feature)
//!
//! # Example
//!
//! ```
//! use safecover::{ContainerSize, CoverLayoutEngine, ImageSize, SafeAreaSpec};
//!
//! let image = ImageSize::new(1000, 500).unwrap();
//! let engine = CoverLayoutEngine::new(image, SafeAreaSpec::parse("25%,0%,75%,100%").unwrap());
//!
//! let layout = engine.layout(ContainerSize::new(400.0, 400.0));
//! assert_eq!((layout.width, layout.height), (800.0, 400.0));
//! assert_eq!((layout.offset_x, layout.offset_y), (-200.0, 0.0));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod cover;
pub mod dimension;
pub mod engine;
mod math;
pub mod resize;
pub mod safe_area;

#[cfg(feature = "alloc")]
pub mod controller;
#[cfg(feature = "alloc")]
pub mod options;
#[cfg(feature = "alloc")]
pub mod render;

#[cfg(feature = "svg")]
pub mod svg;

// Re-exports: core geometry types
pub use cover::{
    ClampPolicy, ContainerSize, CoverLayout, FitPolicy, ImageRect, ImageSize, Placement,
    compute_cover,
};
pub use dimension::{Dimension, ParseDimensionError};
pub use engine::CoverLayoutEngine;
pub use resize::{PollSchedule, ResizeSource, SizeWatcher};
pub use safe_area::{SafeAreaError, SafeAreaRect, SafeAreaSpec};

#[cfg(feature = "alloc")]
pub use controller::{Attachments, Controller, Host, extract_css_url};
#[cfg(feature = "alloc")]
pub use options::{ConfigurationError, CoverOptions, OptionsPatch};
#[cfg(feature = "alloc")]
pub use render::{RenderMode, RenderSurface, StyleDeclaration, StyleSurface, StyleTarget, StyleWriter};
