use std::{fs::File, io::BufReader, path::Path};

use crate::{
    foundation::core::Size,
    foundation::error::{InkformError, InkformResult},
    model::field::FieldConfig,
};

/// Fields declared for one page of a template, plus an optional explicit page size.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PageLayout {
    /// Zero-based page index.
    pub index: u32,
    /// Declared fields, in drawing order.
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
    /// Explicit page size in points; overrides the rasterized background size.
    #[serde(default)]
    pub size: Option<Size>,
}

impl PageLayout {
    /// Empty layout for page `index`.
    pub fn new(index: u32) -> Self {
        Self {
            index,
            fields: Vec::new(),
            size: None,
        }
    }

    /// Set an explicit page size.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = Some(Size::new(width, height));
        self
    }

    /// Append a field.
    pub fn with_field(mut self, field: FieldConfig) -> Self {
        self.fields.push(field);
        self
    }

    /// Check the explicit size and every field.
    pub fn validate(&self) -> InkformResult<()> {
        if let Some(size) = self.size {
            if !size.width.is_finite()
                || !size.height.is_finite()
                || size.width <= 0.0
                || size.height <= 0.0
            {
                return Err(InkformError::validation(format!(
                    "page {}: explicit size must be finite and > 0",
                    self.index
                )));
            }
        }
        for field in &self.fields {
            field.validate()?;
        }
        Ok(())
    }
}

fn default_dpi() -> u32 {
    144
}

/// JSON description of a template: source identity, rasterization DPI and page layouts.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayoutFile {
    /// Source document identity passed to the asset source.
    pub source: String,
    /// Display name; defaults to the source identity.
    #[serde(default)]
    pub name: Option<String>,
    /// Background rasterization resolution.
    #[serde(default = "default_dpi")]
    pub dpi: u32,
    /// Declared pages.
    #[serde(default)]
    pub pages: Vec<PageLayout>,
}

impl LayoutFile {
    /// Parse a layout file from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> InkformResult<Self> {
        let file: Self = serde_json::from_reader(r)
            .map_err(|e| InkformError::serde(format!("parse layout JSON: {e}")))?;
        file.validate()?;
        Ok(file)
    }

    /// Parse a layout file from disk.
    pub fn from_path(path: impl AsRef<Path>) -> InkformResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            InkformError::validation(format!("open layout JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check DPI, pages and fields.
    pub fn validate(&self) -> InkformResult<()> {
        if self.source.trim().is_empty() {
            return Err(InkformError::validation("layout source must be non-empty"));
        }
        if self.dpi == 0 {
            return Err(InkformError::validation("layout dpi must be > 0"));
        }
        for page in &self.pages {
            page.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/page.rs"]
mod tests;
