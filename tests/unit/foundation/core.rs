use super::*;

#[test]
fn raster_size_converts_pixels_at_dpi_to_points() {
    let s = raster_size_points(1700, 2200, 200).unwrap();
    assert!((s.width - 612.0).abs() < 1e-9);
    assert!((s.height - 792.0).abs() < 1e-9);
}

#[test]
fn raster_size_rejects_degenerate_inputs() {
    assert!(raster_size_points(0, 10, 72).is_none());
    assert!(raster_size_points(10, 0, 72).is_none());
    assert!(raster_size_points(10, 10, 0).is_none());
}
