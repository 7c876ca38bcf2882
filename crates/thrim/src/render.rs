//! Rasterized comparison rendering via tiny-skia.
//!
//! Draws the same three panels as the SVG comparison (original,
//! processed, processed with deviation markers) as anti-aliased
//! strokes on a sand-colored plate, returning an `RgbaImage` for the
//! CLI to save as PNG.

use image::{Rgba, RgbaImage};
use thrim_core::{Deviation, Track, TrackPoint};
use tiny_skia::{
    Color, FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform,
};

/// Sand-colored plate background, matching the SVG plots.
const PLATE_RGB: (u8, u8, u8) = (0xc9, 0xb1, 0x7f);
/// Radius of a deviation marker in pixels.
const MARKER_RADIUS_PX: f32 = 3.0;

/// Render a three-panel comparison image, `3 * panel_px` wide and
/// `panel_px` tall.
///
/// `deviations` carries indices into `original`; `diameter` sets the
/// plate scale. Degenerate sizes (zero `panel_px`) produce a 1x1
/// blank image rather than failing.
#[must_use]
pub fn render_comparison(
    original: &Track,
    processed: &Track,
    deviations: &[Deviation],
    diameter: f64,
    panel_px: u32,
) -> RgbaImage {
    let width = panel_px.saturating_mul(3);
    let height = panel_px;

    let Some(mut pixmap) = Pixmap::new(width, height) else {
        return RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 0]));
    };

    let (r, g, b) = PLATE_RGB;
    pixmap.fill(Color::from_rgba8(r, g, b, 255));

    // Data millimeters -> pixels, with a small margin inside each panel.
    let panel = f64::from(panel_px);
    let scale = if diameter > 0.0 {
        panel * 0.95 / diameter
    } else {
        1.0
    };
    let cy = panel / 2.0;

    let mut white = Paint::default();
    white.set_color_rgba8(255, 255, 255, 255);
    white.anti_alias = true;

    let stroke = Stroke {
        width: 1.0,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    };

    for (slot, track) in [(0.0, original), (1.0, processed), (2.0, processed)] {
        let cx = panel.mul_add(slot, panel / 2.0);
        if let Some(path) = track_path(track, cx, cy, scale) {
            pixmap.stroke_path(&path, &white, &stroke, Transform::identity(), None);
        }
    }

    // Deviation markers on the third panel, at the original positions.
    let mut red = Paint::default();
    red.set_color_rgba8(0xff, 0x33, 0x33, 255);
    red.anti_alias = true;

    let marker_cx_base = panel.mul_add(2.0, panel / 2.0);
    for deviation in deviations {
        if let Some(p) = original.points().get(deviation.index) {
            let mut pb = PathBuilder::new();
            #[allow(clippy::cast_possible_truncation)]
            pb.push_circle(
                scale.mul_add(p.x, marker_cx_base) as f32,
                scale.mul_add(-p.y, cy) as f32,
                MARKER_RADIUS_PX,
            );
            if let Some(circle) = pb.finish() {
                pixmap.fill_path(&circle, &red, FillRule::Winding, Transform::identity(), None);
            }
        }
    }

    unpremultiply(&pixmap, width, height)
}

/// Build a tiny-skia path from a track's projected points.
///
/// Returns `None` for tracks with fewer than 2 points. The Y axis is
/// flipped here: track space is +Y-up, raster space is +Y-down.
#[allow(clippy::cast_possible_truncation)]
fn track_path(track: &Track, cx: f64, cy: f64, scale: f64) -> Option<tiny_skia::Path> {
    let points = track.points();
    if points.len() < 2 {
        return None;
    }

    let tx = |p: &TrackPoint| {
        (
            scale.mul_add(p.x, cx) as f32,
            scale.mul_add(-p.y, cy) as f32,
        )
    };

    let mut pb = PathBuilder::new();
    let (x0, y0) = tx(&points[0]);
    pb.move_to(x0, y0);
    for p in &points[1..] {
        let (x, y) = tx(p);
        pb.line_to(x, y);
    }
    pb.finish()
}

/// Convert a pixmap (premultiplied RGBA) to an `RgbaImage` (straight
/// RGBA).
#[allow(clippy::cast_possible_truncation)]
fn unpremultiply(pixmap: &Pixmap, width: u32, height: u32) -> RgbaImage {
    let data = pixmap.data();
    let mut img = RgbaImage::new(width, height);
    for (i, pixel) in img.pixels_mut().enumerate() {
        let off = i * 4;
        let a = data[off + 3];
        if a == 0 {
            *pixel = Rgba([0, 0, 0, 0]);
        } else {
            let channel = |c: u8| (u16::from(c) * 255 / u16::from(a)) as u8;
            *pixel = Rgba([
                channel(data[off]),
                channel(data[off + 1]),
                channel(data[off + 2]),
                a,
            ]);
        }
    }
    img
}
