use std::sync::Arc;

use super::*;
use crate::{foundation::core::DEFAULT_PAGE_SIZE, model::binding::FieldBinding};

fn text(name: &str, page: u32) -> FieldConfig {
    FieldConfig::text(FieldBinding::new(name).unwrap(), page, 10.0, 10.0)
}

fn raster(page_index: u32) -> PageRaster {
    PageRaster {
        page_index,
        image: Arc::new(vec![0]),
        pixel_width: 144,
        pixel_height: 288,
        dpi: 144,
    }
}

#[test]
fn pages_sorted_and_sized_by_fallback_order() {
    let layouts = vec![
        PageLayout::new(2),
        PageLayout::new(0).with_size(300.0, 400.0),
        PageLayout::new(1),
    ];
    let outcome = RasterOutcome::Rendered(vec![raster(0), raster(1)]);
    let t = RuntimeTemplate::resolve("src", "Form", 144, &layouts, &outcome, DEFAULT_PAGE_SIZE);

    let idx: Vec<u32> = t.pages().iter().map(|p| p.index).collect();
    assert_eq!(idx, vec![0, 1, 2]);
    assert_eq!(t.pages()[0].size, Size::new(300.0, 400.0));
    assert_eq!(t.pages()[1].size, Size::new(72.0, 144.0));
    assert_eq!(t.pages()[2].size, DEFAULT_PAGE_SIZE);

    assert!(matches!(t.pages()[0].background, PageBackground::Raster(_)));
    assert_eq!(t.pages()[2].background, PageBackground::Missing);
}

#[test]
fn fields_are_filtered_by_their_own_page_index() {
    let layouts = vec![
        PageLayout::new(0)
            .with_field(text("a", 0))
            .with_field(text("b", 1))
            .with_field(text("ghost", 9)),
        PageLayout::new(1).with_field(text("c", 1)),
    ];
    let t = RuntimeTemplate::resolve(
        "src",
        "Form",
        72,
        &layouts,
        &RasterOutcome::Rendered(Vec::new()),
        DEFAULT_PAGE_SIZE,
    );
    let names = |i: usize| -> Vec<&str> {
        t.pages()[i].fields.iter().map(|f| f.binding().as_str()).collect()
    };
    assert_eq!(names(0), vec!["a"]);
    assert_eq!(names(1), vec!["b", "c"]);
    assert_eq!(t.fields().count(), 3);
}

#[test]
fn duplicate_page_declarations_merge_into_one_page() {
    let layouts = vec![
        PageLayout::new(0).with_field(text("a", 0)),
        PageLayout::new(0).with_size(100.0, 100.0).with_field(text("b", 0)),
    ];
    let t = RuntimeTemplate::resolve(
        "src",
        "Form",
        72,
        &layouts,
        &RasterOutcome::Rendered(Vec::new()),
        DEFAULT_PAGE_SIZE,
    );
    assert_eq!(t.pages().len(), 1);
    assert_eq!(t.pages()[0].fields.len(), 2);
    assert_eq!(t.pages()[0].size, Size::new(100.0, 100.0));
}

#[test]
fn failed_rasterization_marks_pages_unavailable() {
    let layouts = vec![PageLayout::new(0)];
    let t = RuntimeTemplate::resolve(
        "src",
        "Form",
        72,
        &layouts,
        &RasterOutcome::Failed("boom".to_string()),
        DEFAULT_PAGE_SIZE,
    );
    assert_eq!(
        t.pages()[0].background,
        PageBackground::Unavailable("boom".to_string())
    );
    assert_eq!(t.pages()[0].size, DEFAULT_PAGE_SIZE);
    assert_eq!(t.source(), "src");
    assert_eq!(t.name(), "Form");
    assert_eq!(t.dpi(), 72);
}
