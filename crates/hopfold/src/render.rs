//! SVG snapshots of a layout.
//!
//! The layout lives in a box centered on the origin with `y` pointing up;
//! the image has its origin top-left with `y` pointing down.
//!

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use hf_layout::LayoutEngine;
use hf_layout::Rgba;

use crate::error::CliError;
use crate::error::Result;

const NODE_RADIUS: i32 = 3;

fn to_pixel(layout: &LayoutEngine, (x, y): (f64, f64)) -> (i32, i32) {
    let bounds = layout.bounds();
    (
        (x + bounds.half_width()).round() as i32,
        (bounds.half_height() - y).round() as i32,
    )
}

fn to_color(c: Rgba) -> RGBAColor {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    RGBAColor(channel(c.r), channel(c.g), channel(c.b), c.a.clamp(0.0, 1.0) as f64)
}

/// Edges colored by layer, then the nodes on top; the pinned node in red.
pub fn draw_layout<DB: DrawingBackend>(
    layout: &LayoutEngine,
    area: &DrawingArea<DB, Shift>,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    area.fill(&BLACK)?;

    for (segment, &color) in layout.segments().iter().zip(layout.edge_colors()) {
        let from = to_pixel(layout, segment.from);
        let to = to_pixel(layout, segment.to);
        area.draw(&PathElement::new(vec![from, to], to_color(color).stroke_width(1)))?;
    }

    for (k, node) in layout.nodes().iter().enumerate() {
        let center = to_pixel(layout, node.position());
        let style = if layout.pinned() == Some(k) { RED.filled() } else { WHITE.filled() };
        area.draw(&Circle::new(center, NODE_RADIUS, style))?;
    }
    Ok(())
}

/// Write the current state of `layout` as an SVG image of the layout box.
pub fn render_svg(layout: &LayoutEngine, path: &Path) -> Result<()> {
    let bounds = layout.bounds();
    let size = (
        ((2.0 * bounds.half_width()).ceil() as u32).max(1),
        ((2.0 * bounds.half_height()).ceil() as u32).max(1),
    );
    let fail = |message: String| CliError::Render { path: path.to_path_buf(), message };

    let root = SVGBackend::new(path, size).into_drawing_area();
    draw_layout(layout, &root).map_err(|e| fail(e.to_string()))?;
    root.present().map_err(|e| fail(e.to_string()))?;
    Ok(())
}
