//! SVG visualization of a cover layout.
//!
//! Generates a vertical sequence of annotated panels: the source image with
//! its safe area, the scaled image positioned against the container, and the
//! part of the image the container actually shows.
//!
//! # Example
//!
//! ```
//! use safecover::{ContainerSize, CoverLayoutEngine, ImageSize, SafeAreaSpec};
//! use safecover::svg::render_cover_svg;
//!
//! let engine = CoverLayoutEngine::new(
//!     ImageSize::new(1600, 900).unwrap(),
//!     SafeAreaSpec::parse("60%,10%,90%,90%").unwrap(),
//! );
//! let container = ContainerSize::new(400.0, 600.0);
//! let layout = engine.layout(container);
//!
//! let svg = render_cover_svg(&engine, container, &layout);
//! assert!(svg.starts_with("<svg"));
//! ```

use crate::cover::{ContainerSize, CoverLayout, ImageRect};
use crate::engine::CoverLayoutEngine;

/// Maximum pixel width for any panel in the SVG output.
const MAX_PANEL_W: f64 = 300.0;
/// Maximum pixel height for any panel in the SVG output.
const MAX_PANEL_H: f64 = 200.0;
/// Vertical gap between panels.
const PANEL_GAP: f64 = 50.0;
/// Horizontal margin.
const MARGIN_X: f64 = 50.0;
/// Top margin for first panel.
const MARGIN_TOP: f64 = 30.0;
/// Height of label text area above each panel.
const LABEL_H: f64 = 22.0;

/// A single panel of the visualization.
struct Step {
    label: String,
    /// Size of the panel's coordinate space.
    outer: (f64, f64),
    /// Rectangles drawn in the panel's coordinate space, in order.
    shapes: Vec<Shape>,
    annotation: String,
}

/// A rectangle with a CSS class.
struct Shape {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    class: &'static str,
}

impl Shape {
    fn from_rect(r: &ImageRect, scale: f64, dx: f64, dy: f64, class: &'static str) -> Self {
        Self {
            x: r.x1 * scale + dx,
            y: r.y1 * scale + dy,
            w: r.width().max(0.0) * scale,
            h: r.height().max(0.0) * scale,
            class,
        }
    }
}

/// Render a complete SVG document showing how `engine` lays out its image in
/// `container`.
///
/// `layout` is normally `engine.layout(container)`. A non-finite layout is
/// shown as the source panel plus a note.
pub fn render_cover_svg(
    engine: &CoverLayoutEngine,
    container: ContainerSize,
    layout: &CoverLayout,
) -> String {
    let steps = build_steps(engine, container, layout);
    render_steps(&steps)
}

fn build_steps(
    engine: &CoverLayoutEngine,
    container: ContainerSize,
    layout: &CoverLayout,
) -> Vec<Step> {
    let image = engine.image();
    let safe = engine.safe_area();
    let (iw, ih) = (image.width() as f64, image.height() as f64);
    let mut steps = Vec::new();

    // Step 1: Source with safe area
    steps.push(Step {
        label: format!("Image  {}×{}", image.width(), image.height()),
        outer: (iw, ih),
        shapes: vec![
            Shape::from_rect(&ImageRect::full(image), 1.0, 0.0, 0.0, "image"),
            Shape::from_rect(safe, 1.0, 0.0, 0.0, "safe"),
        ],
        annotation: format!("safe area {}", engine.spec()),
    });

    if !layout.is_finite() {
        steps.push(Step {
            label: format!("Container  {}×{}", container.width, container.height),
            outer: (container.width.max(1.0), container.height.max(1.0)),
            shapes: Vec::new(),
            annotation: String::from("no renderable layout"),
        });
        return steps;
    }

    // Step 2: Scaled image placed against the container
    let scale = layout.scale(image);
    let min_x = layout.offset_x.min(0.0);
    let min_y = layout.offset_y.min(0.0);
    let max_x = (layout.offset_x + layout.width).max(container.width);
    let max_y = (layout.offset_y + layout.height).max(container.height);
    let (dx, dy) = (layout.offset_x - min_x, layout.offset_y - min_y);
    steps.push(Step {
        label: format!("Scale  {}×{}", layout.width, layout.height),
        outer: (max_x - min_x, max_y - min_y),
        shapes: vec![
            Shape::from_rect(&ImageRect::full(image), scale, dx, dy, "image"),
            Shape::from_rect(safe, scale, dx, dy, "safe"),
            Shape {
                x: -min_x,
                y: -min_y,
                w: container.width,
                h: container.height,
                class: "viewport",
            },
        ],
        annotation: format!(
            "scale {:.3}, offset ({}, {})",
            scale, layout.offset_x, layout.offset_y
        ),
    });

    // Step 3: What the container shows
    let visible = layout.visible_region(image, container);
    let clipped = ImageRect::new(
        safe.x1.max(visible.x1),
        safe.y1.max(visible.y1),
        safe.x2.min(visible.x2),
        safe.y2.min(visible.y2),
    );
    let (vx, vy) = (-visible.x1 * scale, -visible.y1 * scale);
    steps.push(Step {
        label: format!("Container  {}×{}", container.width, container.height),
        outer: (container.width, container.height),
        shapes: vec![
            Shape::from_rect(&ImageRect::full(image), scale, vx, vy, "image"),
            Shape::from_rect(&clipped, scale, vx, vy, "safe"),
        ],
        annotation: if layout.safe_area_visible {
            String::from("safe area fully visible")
        } else {
            String::from("safe area cropped")
        },
    });

    steps
}

/// Scale panel dimensions to fit within MAX_PANEL_W × MAX_PANEL_H, preserving aspect ratio.
fn scale_to_fit(w: f64, h: f64) -> (f64, f64, f64) {
    if w <= 0.0 || h <= 0.0 {
        return (1.0, 1.0, 1.0);
    }
    let scale = (MAX_PANEL_W / w).min(MAX_PANEL_H / h);
    (w * scale, h * scale, scale)
}

/// Render panels into a complete SVG document.
fn render_steps(steps: &[Step]) -> String {
    if steps.is_empty() {
        return String::from(r#"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1"/>"#);
    }

    let count = steps.len() as f64;
    let total_h = 2.0 * MARGIN_TOP + count * (LABEL_H + MAX_PANEL_H) + (count - 1.0) * PANEL_GAP;
    let total_w = MAX_PANEL_W + 2.0 * MARGIN_X;

    let mut svg = String::with_capacity(4096);

    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        total_w as u32, total_h as u32, total_w, total_h
    ));
    svg.push('\n');

    // Light/dark mode via prefers-color-scheme
    svg.push_str(
        r##"<style>
  text { font-family: "Consolas", "DejaVu Sans Mono", "Courier New", monospace; }
  .label { font-size: 13px; font-weight: bold; fill: #333; }
  .annotation { font-size: 11px; fill: #666; }
  .outer { fill: #f4f4f4; stroke: #ccc; stroke-width: 1; }
  .image { fill: #6ba3d6; stroke: #2c6faa; stroke-width: 1; }
  .safe { fill: #7bc47f; fill-opacity: 0.7; stroke: #2f7d33; stroke-width: 1.5; }
  .viewport { fill: none; stroke: #d9534f; stroke-width: 2; stroke-dasharray: 5,3; }
  .arrow { stroke: #666; stroke-width: 1.5; fill: none; marker-end: url(#arrowhead); }
  .arrowhead { fill: #666; }
  @media (prefers-color-scheme: dark) {
    .label { fill: #e0e0e0; }
    .annotation { fill: #aaa; }
    .outer { fill: #232323; stroke: #444; }
    .image { fill: #3a72a4; stroke: #5a9fd4; }
    .safe { fill: #3f8a43; stroke: #7bc47f; }
    .arrow { stroke: #888; }
    .arrowhead { fill: #888; }
  }
</style>
"##,
    );

    svg.push_str(
        r##"<defs>
  <marker id="arrowhead" markerWidth="8" markerHeight="6" refX="8" refY="3" orient="auto">
    <polygon points="0 0, 8 3, 0 6" class="arrowhead"/>
  </marker>
</defs>
"##,
    );

    let mut y = MARGIN_TOP;
    let center_x = total_w / 2.0;

    for (i, step) in steps.iter().enumerate() {
        svg.push_str(&format!(
            r#"<text x="{}" y="{}" class="label" text-anchor="middle">{}</text>"#,
            center_x,
            y + 14.0,
            escape_xml(&step.label)
        ));
        svg.push('\n');
        y += LABEL_H;

        let (pw, ph, scale) = scale_to_fit(step.outer.0, step.outer.1);
        let panel_x = center_x - pw / 2.0;
        let panel_y = y;

        svg.push_str(&format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" class="outer" rx="2"/>"#,
            panel_x, panel_y, pw, ph
        ));
        svg.push('\n');

        for shape in &step.shapes {
            svg.push_str(&format!(
                r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" class="{}"/>"#,
                panel_x + shape.x * scale,
                panel_y + shape.y * scale,
                shape.w * scale,
                shape.h * scale,
                shape.class
            ));
            svg.push('\n');
        }

        if !step.annotation.is_empty() {
            svg.push_str(&format!(
                r#"<text x="{}" y="{:.1}" class="annotation" text-anchor="middle">{}</text>"#,
                center_x,
                panel_y + ph + 14.0,
                escape_xml(&step.annotation)
            ));
            svg.push('\n');
        }

        y += MAX_PANEL_H;

        if i < steps.len() - 1 {
            svg.push_str(&format!(
                r#"<line x1="{}" y1="{:.1}" x2="{}" y2="{:.1}" class="arrow"/>"#,
                center_x,
                y + 8.0,
                center_x,
                y + PANEL_GAP - 8.0
            ));
            svg.push('\n');
            y += PANEL_GAP;
        }
    }

    svg.push_str("</svg>\n");
    svg
}

/// Escape special characters for XML text content.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
