use std::io::Cursor;

use anyhow::Context;

use crate::{
    foundation::core::{Point, Rect},
    foundation::error::{InkformError, InkformResult},
    signature::snapshot::SignatureSnapshot,
};

/// Transparent border added around the ink bounding box, in canvas units.
pub const SIGNATURE_MARGIN: f64 = 12.0;
/// Ink width before compensating for downscaling into the field box.
pub const BASE_STROKE_WIDTH: f64 = 3.0;
/// Lower clamp on the compensated stroke width.
pub const MIN_STROKE_WIDTH: f64 = 2.0;
/// Upper clamp on the compensated stroke width.
pub const MAX_STROKE_WIDTH: f64 = 12.0;

/// Rasterize `snapshot` into PNG bytes (RGBA8, transparent background, black ink).
///
/// The raster is cropped to the ink bounding box plus [`SIGNATURE_MARGIN`] on every side. When
/// `target_height` is given, the stroke width is scaled by `raster_height / target_height` so the
/// ink keeps a consistent visual weight once the image is fitted into a field of that height.
///
/// Returns empty bytes when there is nothing to draw: no strokes, a non-positive capture canvas,
/// or no finite points.
pub fn render_signature_png(
    snapshot: &SignatureSnapshot,
    target_height: Option<f64>,
) -> InkformResult<Vec<u8>> {
    let canvas = snapshot.canvas();
    if snapshot.strokes().is_empty() || !(canvas.width > 0.0) || !(canvas.height > 0.0) {
        return Ok(Vec::new());
    }
    let Some(bbox) = ink_bounds(snapshot) else {
        return Ok(Vec::new());
    };

    let width = raster_extent(bbox.width())?;
    let height = raster_extent(bbox.height())?;

    let ratio = match target_height {
        Some(t) if t.is_finite() && t > 0.0 => f64::from(height) / t,
        _ => 1.0,
    };
    let stroke_width = (BASE_STROKE_WIDTH * ratio).clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH);

    let mut ctx = vello_cpu::RenderContext::new(width, height);
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((
        SIGNATURE_MARGIN - bbox.x0,
        SIGNATURE_MARGIN - bbox.y0,
    )));
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(0, 0, 0, 255));
    ctx.set_stroke(
        vello_cpu::kurbo::Stroke::new(stroke_width)
            .with_caps(vello_cpu::kurbo::Cap::Round)
            .with_join(vello_cpu::kurbo::Join::Round),
    );
    for stroke in snapshot.strokes() {
        if let Some(path) = polyline(stroke) {
            ctx.stroke_path(&path);
        }
    }

    let mut pixmap = vello_cpu::Pixmap::new(width, height);
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);

    let mut rgba = pixmap.data_as_u8_slice().to_vec();
    unpremultiply_rgba8_in_place(&mut rgba);
    encode_png(rgba, u32::from(width), u32::from(height))
}

fn ink_bounds(snapshot: &SignatureSnapshot) -> Option<Rect> {
    let mut points = snapshot
        .strokes()
        .iter()
        .flatten()
        .filter(|p| p.x.is_finite() && p.y.is_finite());
    let first = points.next()?;
    let mut bbox = Rect::from_points(*first, *first);
    for p in points {
        bbox = bbox.union_pt(*p);
    }
    Some(bbox)
}

fn raster_extent(ink_extent: f64) -> InkformResult<u16> {
    let px = (ink_extent.ceil() + 2.0 * SIGNATURE_MARGIN).max(1.0);
    if px > f64::from(u16::MAX) {
        return Err(InkformError::validation(format!(
            "signature raster extent {px} exceeds {}",
            u16::MAX
        )));
    }
    Ok(px as u16)
}

fn polyline(stroke: &[Point]) -> Option<vello_cpu::kurbo::BezPath> {
    if stroke.len() < 2 {
        return None;
    }
    let mut path = vello_cpu::kurbo::BezPath::new();
    let mut started = false;
    for p in stroke.iter().filter(|p| p.x.is_finite() && p.y.is_finite()) {
        let p = vello_cpu::kurbo::Point::new(p.x, p.y);
        if started {
            path.line_to(p);
        } else {
            path.move_to(p);
            started = true;
        }
    }
    started.then_some(path)
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

fn encode_png(rgba: Vec<u8>, width: u32, height: u32) -> InkformResult<Vec<u8>> {
    let img = image::RgbaImage::from_raw(width, height, rgba)
        .ok_or_else(|| InkformError::validation("signature raster byte length mismatch"))?;
    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .context("encode signature png")?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/signature/raster.rs"]
mod tests;
