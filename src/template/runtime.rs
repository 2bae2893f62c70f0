use std::collections::BTreeSet;

use crate::{
    foundation::core::Size,
    model::{field::FieldConfig, page::PageLayout},
    raster::page::{PageRaster, RasterOutcome},
};

/// Background state of one resolved page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageBackground {
    /// The rasterizer produced an image for this page.
    Raster(PageRaster),
    /// The rasterizer ran but produced no image for this page.
    Missing,
    /// The rasterizer failed; the reason is kept for diagnostics.
    Unavailable(String),
}

impl PageBackground {
    /// Image for this page, if any.
    pub fn raster(&self) -> Option<&PageRaster> {
        match self {
            Self::Raster(r) => Some(r),
            Self::Missing | Self::Unavailable(_) => None,
        }
    }
}

/// A page of a resolved template.
#[derive(Clone, Debug, PartialEq)]
pub struct TemplatePage {
    /// Zero-based page index.
    pub index: u32,
    /// Final page size in points.
    pub size: Size,
    /// Fields declared for this page, in declaration order.
    pub fields: Vec<FieldConfig>,
    /// Background image state.
    pub background: PageBackground,
}

/// Resolved, immutable page structure of a template.
#[derive(Clone, Debug, PartialEq)]
pub struct RuntimeTemplate {
    source: String,
    name: String,
    dpi: u32,
    pages: Vec<TemplatePage>,
}

impl RuntimeTemplate {
    /// Merge declared layouts with rasterized backgrounds.
    ///
    /// One page is produced for every distinct declared index, ascending. Each page collects
    /// every declared field whose `page_index` matches it. Page size falls back from the explicit
    /// layout size to the background's physical size to `default_size`.
    pub fn resolve(
        source: impl Into<String>,
        name: impl Into<String>,
        dpi: u32,
        layouts: &[PageLayout],
        backgrounds: &RasterOutcome,
        default_size: Size,
    ) -> Self {
        let indices: BTreeSet<u32> = layouts.iter().map(|l| l.index).collect();
        let all_fields = layouts.iter().flat_map(|l| l.fields.iter());

        for field in all_fields.clone() {
            if !indices.contains(&field.page_index()) {
                tracing::warn!(
                    binding = %field.binding(),
                    page = field.page_index(),
                    "field targets an undeclared page and is dropped"
                );
            }
        }

        let pages = indices
            .into_iter()
            .map(|index| {
                let explicit = layouts
                    .iter()
                    .filter(|l| l.index == index)
                    .filter_map(|l| l.size)
                    .last();
                let background = match backgrounds {
                    RasterOutcome::Rendered(_) => match backgrounds.page(index) {
                        Some(r) => PageBackground::Raster(r.clone()),
                        None => PageBackground::Missing,
                    },
                    RasterOutcome::Failed(reason) => PageBackground::Unavailable(reason.clone()),
                };
                let size = explicit
                    .or_else(|| background.raster().and_then(PageRaster::size_points))
                    .unwrap_or(default_size);
                let fields = all_fields
                    .clone()
                    .filter(|f| f.page_index() == index)
                    .cloned()
                    .collect();
                TemplatePage {
                    index,
                    size,
                    fields,
                    background,
                }
            })
            .collect();

        Self {
            source: source.into(),
            name: name.into(),
            dpi,
            pages,
        }
    }

    /// Source identity the template was loaded from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Background rasterization resolution.
    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    /// Resolved pages, ascending by index.
    pub fn pages(&self) -> &[TemplatePage] {
        &self.pages
    }

    /// Page with the given index.
    pub fn page(&self, index: u32) -> Option<&TemplatePage> {
        self.pages.iter().find(|p| p.index == index)
    }

    /// All fields across all pages.
    pub fn fields(&self) -> impl Iterator<Item = &FieldConfig> {
        self.pages.iter().flat_map(|p| p.fields.iter())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/template/runtime.rs"]
mod tests;
