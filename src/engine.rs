//! Per-image layout state.

use crate::cover::{ClampPolicy, ContainerSize, CoverLayout, FitPolicy, ImageSize, compute_cover};
use crate::safe_area::{SafeAreaRect, SafeAreaSpec};

/// Layout engine for one image.
///
/// Holds the image's natural size, the safe-area spec and its resolved
/// rectangle. The resolved rectangle is recomputed whenever the image or the
/// spec changes; [`layout`](Self::layout) only reads it. Container sizes and
/// layout results are never stored.
#[derive(Clone, Debug, PartialEq)]
pub struct CoverLayoutEngine {
    image: ImageSize,
    spec: SafeAreaSpec,
    safe_area: SafeAreaRect,
    fit: FitPolicy,
    clamp: ClampPolicy,
}

impl CoverLayoutEngine {
    /// Create an engine with default fit and clamp policies.
    pub fn new(image: ImageSize, spec: SafeAreaSpec) -> Self {
        Self {
            image,
            spec,
            safe_area: spec.resolve(image),
            fit: FitPolicy::default(),
            clamp: ClampPolicy::default(),
        }
    }

    /// Set the fit policy.
    pub fn fit_policy(mut self, fit: FitPolicy) -> Self {
        self.fit = fit;
        self
    }

    /// Set the clamp policy.
    pub fn clamp_policy(mut self, clamp: ClampPolicy) -> Self {
        self.clamp = clamp;
        self
    }

    pub fn image(&self) -> ImageSize {
        self.image
    }

    pub fn spec(&self) -> &SafeAreaSpec {
        &self.spec
    }

    /// The safe area in image pixels.
    pub fn safe_area(&self) -> &SafeAreaRect {
        &self.safe_area
    }

    pub fn policies(&self) -> (FitPolicy, ClampPolicy) {
        (self.fit, self.clamp)
    }

    /// Replace the image and re-resolve the safe area against it.
    pub fn set_image(&mut self, image: ImageSize) {
        self.image = image;
        self.resolve();
    }

    /// Replace the safe-area spec and re-resolve it.
    pub fn set_safe_area(&mut self, spec: SafeAreaSpec) {
        self.spec = spec;
        self.resolve();
    }

    /// Replace both policies.
    pub fn set_policies(&mut self, fit: FitPolicy, clamp: ClampPolicy) {
        self.fit = fit;
        self.clamp = clamp;
    }

    /// Compute the layout for the current container size.
    pub fn layout(&self, container: ContainerSize) -> CoverLayout {
        compute_cover(self.image, &self.safe_area, container, self.fit, self.clamp)
    }

    fn resolve(&mut self) {
        self.safe_area = self.spec.resolve(self.image);
        tracing::trace!(
            spec = ?self.spec,
            safe_area = ?self.safe_area,
            width = self.image.width(),
            height = self.image.height(),
            "resolved safe area"
        );
    }
}
