use std::{collections::BTreeMap, sync::Arc};

use crate::{
    compose::compositor::{ComposeOpts, Compositor},
    document::doc::Document,
    encode::pdf::{DocumentEncoder, PdfEncoder},
    foundation::core::Size,
    foundation::error::{InkformError, InkformResult},
    model::{field::FieldConfig, page::LayoutFile, page::PageLayout},
    template::resolver::TemplateResolver,
};

const DEFAULT_DPI: u32 = 144;

/// Builder for template-backed [`Document`] values.
///
/// Fields added with [`Self::field`] are grouped by their page index; whole layouts can be added
/// with [`Self::layout`]. Several fields may share a binding: each one renders the same value.
pub struct DocumentBuilder {
    resolver: Arc<TemplateResolver>,
    source: String,
    name: Option<String>,
    dpi: u32,
    page_sizes: BTreeMap<u32, Size>,
    fields: Vec<FieldConfig>,
    layouts: Vec<PageLayout>,
    encoder: Option<Arc<dyn DocumentEncoder>>,
    compose: ComposeOpts,
}

impl DocumentBuilder {
    /// Start a document over the template at `source`.
    pub fn new(resolver: Arc<TemplateResolver>, source: impl Into<String>) -> Self {
        Self {
            resolver,
            source: source.into(),
            name: None,
            dpi: DEFAULT_DPI,
            page_sizes: BTreeMap::new(),
            fields: Vec::new(),
            layouts: Vec::new(),
            encoder: None,
            compose: ComposeOpts::default(),
        }
    }

    /// Seed a builder from a parsed layout file.
    pub fn from_layout_file(resolver: Arc<TemplateResolver>, file: &LayoutFile) -> Self {
        let mut builder = Self::new(resolver, file.source.clone()).dpi(file.dpi);
        if let Some(name) = &file.name {
            builder = builder.name(name.clone());
        }
        file.pages
            .iter()
            .cloned()
            .fold(builder, |b, page| b.layout(page))
    }

    /// Display name; defaults to the source identity.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Background rasterization resolution.
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Explicit size of page `index`, in points.
    pub fn page_size(mut self, index: u32, size: Size) -> Self {
        self.page_sizes.insert(index, size);
        self
    }

    /// Declare a field on the page named by its `page_index`.
    pub fn field(mut self, field: FieldConfig) -> Self {
        self.fields.push(field);
        self
    }

    /// Declare a whole page layout.
    pub fn layout(mut self, layout: PageLayout) -> Self {
        self.layouts.push(layout);
        self
    }

    /// Replace the default [`PdfEncoder`].
    pub fn encoder(mut self, encoder: Arc<dyn DocumentEncoder>) -> Self {
        self.encoder = Some(encoder);
        self
    }

    /// Compositor options.
    pub fn compose_opts(mut self, opts: ComposeOpts) -> Self {
        self.compose = opts;
        self
    }

    /// Validate the declaration and resolve the template.
    pub fn build(self) -> InkformResult<Document> {
        if self.source.trim().is_empty() {
            return Err(InkformError::validation("template source must be non-empty"));
        }
        if self.dpi == 0 {
            return Err(InkformError::validation("dpi must be > 0"));
        }

        let mut layouts = self.layouts;
        let mut loose = BTreeMap::<u32, PageLayout>::new();
        for (index, size) in self.page_sizes {
            loose.insert(
                index,
                PageLayout::new(index).with_size(size.width, size.height),
            );
        }
        for field in self.fields {
            loose
                .entry(field.page_index())
                .or_insert_with(|| PageLayout::new(field.page_index()))
                .fields
                .push(field);
        }
        layouts.extend(loose.into_values());

        if layouts.is_empty() {
            return Err(InkformError::validation("template declares no pages"));
        }
        for layout in &layouts {
            layout.validate()?;
        }

        let name = self.name.unwrap_or_else(|| self.source.clone());
        let template = self
            .resolver
            .load(&self.source, &name, &layouts, self.dpi)?;
        let encoder = self
            .encoder
            .unwrap_or_else(|| Arc::new(PdfEncoder::default()));
        Ok(Document::from_template(
            template,
            layouts,
            Compositor::new(self.compose),
            encoder,
        ))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/builder.rs"]
mod tests;
