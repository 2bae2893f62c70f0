pub use kurbo::{Point, Rect, Size};

/// PDF user-space units per inch.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Page size used when a page declares no size and has no rasterized background (A4).
pub const DEFAULT_PAGE_SIZE: Size = Size::new(595.28, 841.89);

/// Physical size in points of a raster that is `width_px` x `height_px` at `dpi`.
///
/// Returns `None` for a zero DPI and for empty rasters.
pub fn raster_size_points(width_px: u32, height_px: u32, dpi: u32) -> Option<Size> {
    if dpi == 0 || width_px == 0 || height_px == 0 {
        return None;
    }
    let dpi = f64::from(dpi);
    Some(Size::new(
        f64::from(width_px) / dpi * POINTS_PER_INCH,
        f64::from(height_px) / dpi * POINTS_PER_INCH,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
