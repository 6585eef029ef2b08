//! Applying a layout to the host's rendering surface.
//!
//! Two modes, chosen once when a controller is initialized:
//!
//! - [`RenderMode::Native`]: the host supports sizing and positioning
//!   background images directly (`background-size`/`background-position`).
//! - [`RenderMode::Fallback`]: an absolutely positioned overlay image inside
//!   the host element is sized and moved instead.
//!
//! Both are expressed as [`StyleDeclaration`]s written through a
//! [`StyleWriter`], so the layout code never touches host styling itself.

#[cfg(not(feature = "std"))]
use alloc::format;
use alloc::string::String;
#[cfg(not(feature = "std"))]
use alloc::vec;
use alloc::vec::Vec;

use crate::cover::Placement;

/// Element a style declaration applies to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StyleTarget {
    /// The host element the widget is attached to.
    Element,
    /// The overlay image created in fallback mode.
    Overlay,
}

/// One CSS property assignment.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StyleDeclaration {
    pub target: StyleTarget,
    pub property: &'static str,
    pub value: String,
}

impl StyleDeclaration {
    fn new(target: StyleTarget, property: &'static str, value: impl Into<String>) -> Self {
        Self {
            target,
            property,
            value: value.into(),
        }
    }
}

/// Sink for style declarations, implemented by the host.
pub trait StyleWriter {
    fn set_style(&mut self, target: StyleTarget, property: &str, value: &str);

    /// Write each declaration in order.
    fn apply_all(&mut self, declarations: &[StyleDeclaration]) {
        for d in declarations {
            self.set_style(d.target, d.property, &d.value);
        }
    }
}

/// Anything that can show the image at a given size and offset.
pub trait RenderSurface {
    fn apply(&mut self, placement: &Placement);
}

/// How the scaled image is put on screen.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RenderMode {
    /// Size and position the element's background image.
    Native,
    /// Size and position an overlay image element.
    Fallback,
}

impl RenderMode {
    pub fn detect(supports_background_size: bool) -> Self {
        if supports_background_size {
            Self::Native
        } else {
            Self::Fallback
        }
    }

    /// One-time setup of the host element when the widget is attached.
    ///
    /// Fallback mode hides the element's own background, clips the overlay
    /// and, for statically positioned elements, establishes a containing
    /// block for it.
    pub fn prepare(self, position_is_static: bool) -> Vec<StyleDeclaration> {
        match self {
            Self::Native => Vec::new(),
            Self::Fallback => {
                let mut out = vec![
                    StyleDeclaration::new(StyleTarget::Overlay, "position", "absolute"),
                    StyleDeclaration::new(StyleTarget::Element, "background-image", "none"),
                    StyleDeclaration::new(StyleTarget::Element, "overflow", "hidden"),
                ];
                if position_is_static {
                    out.push(StyleDeclaration::new(
                        StyleTarget::Element,
                        "position",
                        "relative",
                    ));
                }
                out
            }
        }
    }

    /// Declarations that make `url` the displayed image.
    ///
    /// Fallback mode returns nothing: the overlay's source is set by the host.
    pub fn image_declarations(self, url: &str) -> Vec<StyleDeclaration> {
        match self {
            Self::Native => vec![StyleDeclaration::new(
                StyleTarget::Element,
                "background-image",
                format!("url({url})"),
            )],
            Self::Fallback => Vec::new(),
        }
    }

    /// Declarations that size and position the image per `placement`.
    pub fn placement_declarations(self, p: &Placement) -> Vec<StyleDeclaration> {
        match self {
            Self::Native => vec![
                StyleDeclaration::new(
                    StyleTarget::Element,
                    "background-position",
                    format!("{}px {}px", p.x, p.y),
                ),
                StyleDeclaration::new(
                    StyleTarget::Element,
                    "background-size",
                    format!("{}px {}px", p.width, p.height),
                ),
            ],
            Self::Fallback => vec![
                StyleDeclaration::new(StyleTarget::Overlay, "width", format!("{}px", p.width)),
                StyleDeclaration::new(StyleTarget::Overlay, "height", format!("{}px", p.height)),
                StyleDeclaration::new(StyleTarget::Overlay, "top", format!("{}px", p.y)),
                StyleDeclaration::new(StyleTarget::Overlay, "left", format!("{}px", p.x)),
            ],
        }
    }
}

/// [`RenderSurface`] that writes placement styles through a [`StyleWriter`].
pub struct StyleSurface<'a, W: ?Sized> {
    mode: RenderMode,
    writer: &'a mut W,
}

impl<'a, W: StyleWriter + ?Sized> StyleSurface<'a, W> {
    pub fn new(mode: RenderMode, writer: &'a mut W) -> Self {
        Self { mode, writer }
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }
}

impl<W: StyleWriter + ?Sized> RenderSurface for StyleSurface<'_, W> {
    fn apply(&mut self, placement: &Placement) {
        let declarations = self.mode.placement_declarations(placement);
        self.writer.apply_all(&declarations);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<(StyleTarget, String, String)>);

    impl StyleWriter for Recorder {
        fn set_style(&mut self, target: StyleTarget, property: &str, value: &str) {
            self.0.push((target, String::from(property), String::from(value)));
        }
    }

    impl Recorder {
        fn get(&self, target: StyleTarget, property: &str) -> Option<&str> {
            self.0
                .iter()
                .rev()
                .find(|(t, p, _)| *t == target && p == property)
                .map(|(_, _, v)| v.as_str())
        }
    }

    const PLACEMENT: Placement = Placement {
        width: 800,
        height: 400,
        x: -200,
        y: 0,
    };

    #[test]
    fn detect_mode() {
        assert_eq!(RenderMode::detect(true), RenderMode::Native);
        assert_eq!(RenderMode::detect(false), RenderMode::Fallback);
    }

    #[test]
    fn native_placement() {
        let mut rec = Recorder::default();
        StyleSurface::new(RenderMode::Native, &mut rec).apply(&PLACEMENT);
        assert_eq!(rec.get(StyleTarget::Element, "background-size"), Some("800px 400px"));
        assert_eq!(rec.get(StyleTarget::Element, "background-position"), Some("-200px 0px"));
        assert!(rec.0.iter().all(|(t, _, _)| *t == StyleTarget::Element));
    }

    #[test]
    fn fallback_placement() {
        let mut rec = Recorder::default();
        let mut surface = StyleSurface::new(RenderMode::Fallback, &mut rec);
        assert_eq!(surface.mode(), RenderMode::Fallback);
        surface.apply(&PLACEMENT);
        assert_eq!(rec.get(StyleTarget::Overlay, "width"), Some("800px"));
        assert_eq!(rec.get(StyleTarget::Overlay, "height"), Some("400px"));
        assert_eq!(rec.get(StyleTarget::Overlay, "top"), Some("0px"));
        assert_eq!(rec.get(StyleTarget::Overlay, "left"), Some("-200px"));
        assert_eq!(rec.0.len(), 4);
    }

    #[test]
    fn native_prepare_is_empty() {
        assert!(RenderMode::Native.prepare(true).is_empty());
    }

    #[test]
    fn fallback_prepare_static_element() {
        let decls = RenderMode::Fallback.prepare(true);
        let mut rec = Recorder::default();
        rec.apply_all(&decls);
        assert_eq!(rec.get(StyleTarget::Overlay, "position"), Some("absolute"));
        assert_eq!(rec.get(StyleTarget::Element, "background-image"), Some("none"));
        assert_eq!(rec.get(StyleTarget::Element, "overflow"), Some("hidden"));
        assert_eq!(rec.get(StyleTarget::Element, "position"), Some("relative"));
    }

    #[test]
    fn fallback_prepare_positioned_element_keeps_position() {
        let decls = RenderMode::Fallback.prepare(false);
        assert!(
            !decls
                .iter()
                .any(|d| d.target == StyleTarget::Element && d.property == "position")
        );
    }

    #[test]
    fn image_declarations_per_mode() {
        assert_eq!(
            RenderMode::Native.image_declarations("a.jpg"),
            vec![StyleDeclaration::new(
                StyleTarget::Element,
                "background-image",
                "url(a.jpg)"
            )]
        );
        assert!(RenderMode::Fallback.image_declarations("a.jpg").is_empty());
    }
}
