use super::*;

fn raster(page_index: u32) -> PageRaster {
    PageRaster {
        page_index,
        image: Arc::new(vec![1, 2, 3]),
        pixel_width: 1700,
        pixel_height: 2200,
        dpi: 200,
    }
}

#[test]
fn page_numbers_parse_from_pdftoppm_names() {
    assert_eq!(parse_page_number("page-1.png"), Some(1));
    assert_eq!(parse_page_number("page-07.png"), Some(7));
    assert_eq!(parse_page_number("page-100.png"), Some(100));
    assert_eq!(parse_page_number("page-0.png"), None);
    assert_eq!(parse_page_number("source.pdf"), None);
    assert_eq!(parse_page_number("page-x.png"), None);
}

#[test]
fn raster_size_in_points_uses_dpi() {
    let s = raster(0).size_points().unwrap();
    assert!((s.width - 612.0).abs() < 1e-9);
    assert!((s.height - 792.0).abs() < 1e-9);
}

#[test]
fn outcome_keeps_failure_distinct_from_empty() {
    let empty = RasterOutcome::from_result(Ok(Vec::new()));
    assert_eq!(empty, RasterOutcome::Rendered(Vec::new()));
    assert!(empty.is_empty());

    let failed = RasterOutcome::from_result(Err(InkformError::raster("corrupt")));
    assert!(matches!(failed, RasterOutcome::Failed(ref m) if m.contains("corrupt")));
    assert!(failed.page(0).is_none());
}

#[test]
fn outcome_looks_up_pages_by_index() {
    let outcome = RasterOutcome::Rendered(vec![raster(0), raster(2)]);
    assert_eq!(outcome.len(), 2);
    assert!(outcome.page(0).is_some());
    assert!(outcome.page(1).is_none());
    assert_eq!(outcome.page(2).unwrap().page_index, 2);
}

#[test]
fn null_rasterizer_returns_no_pages() {
    assert!(NullRasterizer.rasterize(b"%PDF", 144).unwrap().is_empty());
}

#[test]
fn missing_program_is_a_raster_error() {
    let r = PdftoppmRasterizer::with_program("/nonexistent/inkform-pdftoppm");
    let err = r.rasterize(b"%PDF-1.7", 72).unwrap_err();
    assert!(matches!(err, InkformError::Raster(_)));
}

#[test]
fn zero_dpi_is_rejected_before_spawning() {
    let r = PdftoppmRasterizer::with_program("/nonexistent/inkform-pdftoppm");
    assert!(matches!(r.rasterize(b"", 0), Err(InkformError::Raster(_))));
}

#[test]
fn availability_checks_the_configured_program() {
    let r = PdftoppmRasterizer::with_program("/nonexistent/inkform-pdftoppm");
    assert!(!r.is_available());
    assert_eq!(r.program(), Path::new("/nonexistent/inkform-pdftoppm"));
}
