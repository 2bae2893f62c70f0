//! Conversion of PDF form-inspector output into page layouts.
//!
//! Inspector records describe each AcroForm widget in PDF user space (bottom-left origin).
//! Layout fields use a top-left origin, so `y = page_height - top_left.y`.

use std::collections::BTreeMap;

use crate::{
    foundation::core::Size,
    foundation::error::InkformResult,
    model::{
        binding::FieldBinding,
        field::{FieldConfig, TextAlign},
        page::PageLayout,
    },
};

#[derive(Clone, Copy, Debug, Default, serde::Deserialize)]
struct RecordPoint {
    x: Option<f64>,
    y: Option<f64>,
}

#[derive(Clone, Copy, Debug, Default, serde::Deserialize)]
struct RecordSize {
    width: Option<f64>,
    height: Option<f64>,
}

#[derive(Clone, Copy, Debug, Default, serde::Deserialize)]
struct RecordBox {
    top_left: Option<RecordPoint>,
    bottom_left: Option<RecordPoint>,
    width: Option<f64>,
    height: Option<f64>,
}

/// One widget record as emitted by a form inspector.
#[derive(Clone, Debug, serde::Deserialize)]
pub struct FieldRecord {
    name: String,
    #[serde(default)]
    field_type: Option<String>,
    /// One-based page number.
    #[serde(default)]
    page: Option<u32>,
    #[serde(default)]
    page_size: Option<RecordSize>,
    #[serde(default)]
    bounding_box: Option<RecordBox>,
    #[serde(default)]
    size: Option<RecordSize>,
}

impl FieldRecord {
    fn to_field(&self) -> Option<FieldConfig> {
        let binding = match FieldBinding::new(&self.name) {
            Ok(b) => b,
            Err(_) => {
                tracing::warn!("skipping inspector record with blank name");
                return None;
            }
        };
        let page_index = self.page?.checked_sub(1)?;
        let page_height = self.page_size.and_then(|s| s.height)?;
        let bbox = self.bounding_box?;
        let left = bbox
            .top_left
            .and_then(|p| p.x)
            .or_else(|| bbox.bottom_left.and_then(|p| p.x))?;
        let top = bbox.top_left.and_then(|p| p.y)?;
        let width = self.size.and_then(|s| s.width).or(bbox.width)?;
        let height = self.size.and_then(|s| s.height).or(bbox.height)?;
        let y = page_height - top;

        let field = match self.field_type.as_deref() {
            Some("signature") | Some("Sig") => FieldConfig::signature(binding, page_index, left, y),
            Some("check") | Some("Btn") => FieldConfig::text(binding, page_index, left, y)
                .with_align(TextAlign::Center)
                .with_shrink_to_fit(true),
            _ => FieldConfig::text(binding, page_index, left, y).with_shrink_to_fit(true),
        };
        Some(field.with_size(width.abs(), height.abs()))
    }

    fn page_size(&self) -> Option<Size> {
        let s = self.page_size?;
        Some(Size::new(s.width?, s.height?))
    }
}

/// Convert inspector records into page layouts sorted by page index.
///
/// Records without a page, page size or bounding box are skipped.
pub fn layouts_from_records(records: &[FieldRecord]) -> Vec<PageLayout> {
    let mut pages = BTreeMap::<u32, PageLayout>::new();
    for record in records {
        let Some(field) = record.to_field() else {
            tracing::debug!(name = %record.name, "inspector record has no usable geometry");
            continue;
        };
        let page = pages
            .entry(field.page_index())
            .or_insert_with(|| PageLayout::new(field.page_index()));
        if page.size.is_none() {
            page.size = record.page_size();
        }
        page.fields.push(field);
    }
    pages.into_values().collect()
}

/// Parse inspector JSON (an array of records) into page layouts.
pub fn layouts_from_records_json(json: &str) -> InkformResult<Vec<PageLayout>> {
    let records: Vec<FieldRecord> = serde_json::from_str(json)?;
    Ok(layouts_from_records(&records))
}

#[cfg(test)]
#[path = "../../tests/unit/model/import.rs"]
mod tests;
