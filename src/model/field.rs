use crate::{
    foundation::core::{Point, Size},
    foundation::error::{InkformError, InkformResult},
    model::binding::FieldBinding,
};

/// What a field renders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Display string derived from the bound runtime value.
    Text,
    /// Rasterized freehand signature.
    Signature,
}

/// Coordinate unit shared by both axes of a position or size pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    /// Fraction in `[0, 1]` of the page axis (width for x, height for y).
    Fraction,
    /// Absolute PDF points, top-left origin.
    #[default]
    Points,
}

/// Horizontal alignment of text inside its box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    /// Left edge.
    #[default]
    Start,
    /// Centred.
    Center,
    /// Right edge.
    End,
}

/// Text-only field attributes. Ignored for signature fields.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextOptions {
    /// Horizontal alignment.
    pub align: TextAlign,
    /// Font size in points.
    pub font_size: f64,
    /// Upper bound on rendered lines; `None` means one line without wrapping, unlimited with.
    pub max_lines: Option<u32>,
    /// Allow word wrapping at the box width.
    pub allow_wrap: bool,
    /// Scale the text down uniformly so it fits the declared box.
    pub shrink_to_fit: bool,
    /// Upper-case the display string.
    pub uppercase: bool,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            align: TextAlign::Start,
            font_size: 12.0,
            max_lines: None,
            allow_wrap: false,
            shrink_to_fit: false,
            uppercase: false,
        }
    }
}

/// Declared placement and behavior of one field on one page.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FieldConfig {
    binding: FieldBinding,
    kind: FieldKind,
    page_index: u32,
    position: Point,
    #[serde(default)]
    size: Option<Size>,
    #[serde(default)]
    position_unit: Unit,
    #[serde(default)]
    size_unit: Unit,
    #[serde(default)]
    text: TextOptions,
    #[serde(default)]
    required: bool,
}

impl FieldConfig {
    /// Text field at `(x, y)` on page `page_index`, positioned in points.
    pub fn text(binding: FieldBinding, page_index: u32, x: f64, y: f64) -> Self {
        Self::new(binding, FieldKind::Text, page_index, x, y)
    }

    /// Signature field at `(x, y)` on page `page_index`, positioned in points.
    pub fn signature(binding: FieldBinding, page_index: u32, x: f64, y: f64) -> Self {
        Self::new(binding, FieldKind::Signature, page_index, x, y)
    }

    fn new(binding: FieldBinding, kind: FieldKind, page_index: u32, x: f64, y: f64) -> Self {
        Self {
            binding,
            kind,
            page_index,
            position: Point::new(x, y),
            size: None,
            position_unit: Unit::Points,
            size_unit: Unit::Points,
            text: TextOptions::default(),
            required: false,
        }
    }

    /// Set an explicit box size.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = Some(Size::new(width, height));
        self
    }

    /// Set the units of the position pair and the size pair.
    pub fn with_units(mut self, position_unit: Unit, size_unit: Unit) -> Self {
        self.position_unit = position_unit;
        self.size_unit = size_unit;
        self
    }

    /// Replace all text attributes.
    pub fn with_text_options(mut self, text: TextOptions) -> Self {
        self.text = text;
        self
    }

    /// Set horizontal alignment.
    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.text.align = align;
        self
    }

    /// Set font size in points.
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.text.font_size = font_size;
        self
    }

    /// Allow wrapping up to `max_lines` (unlimited when `None`).
    pub fn with_wrap(mut self, max_lines: Option<u32>) -> Self {
        self.text.allow_wrap = true;
        self.text.max_lines = max_lines;
        self
    }

    /// Scale text down to fit the declared box.
    pub fn with_shrink_to_fit(mut self, shrink: bool) -> Self {
        self.text.shrink_to_fit = shrink;
        self
    }

    /// Upper-case the display string.
    pub fn with_uppercase(mut self, uppercase: bool) -> Self {
        self.text.uppercase = uppercase;
        self
    }

    /// Mark the field as required.
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Binding that supplies this field's value.
    pub fn binding(&self) -> &FieldBinding {
        &self.binding
    }

    /// Field kind.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Owning page index.
    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    /// Declared position in `position_unit`.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Declared size in `size_unit`, if any.
    pub fn size(&self) -> Option<Size> {
        self.size
    }

    /// Unit of the position pair.
    pub fn position_unit(&self) -> Unit {
        self.position_unit
    }

    /// Unit of the size pair.
    pub fn size_unit(&self) -> Unit {
        self.size_unit
    }

    /// Text attributes.
    pub fn text_options(&self) -> &TextOptions {
        &self.text
    }

    /// Whether a blank value is rendered as missing rather than omitted.
    pub fn required(&self) -> bool {
        self.required
    }

    /// Check geometry and text attributes.
    pub fn validate(&self) -> InkformResult<()> {
        let name = self.binding.as_str();
        check_pair(name, "position", self.position.x, self.position.y, self.position_unit)?;
        if let Some(size) = self.size {
            check_pair(name, "size", size.width, size.height, self.size_unit)?;
        }
        if self.kind == FieldKind::Text {
            let fs = self.text.font_size;
            if !fs.is_finite() || fs <= 0.0 {
                return Err(InkformError::validation(format!(
                    "field '{name}': font_size must be finite and > 0"
                )));
            }
            if self.text.max_lines == Some(0) {
                return Err(InkformError::validation(format!(
                    "field '{name}': max_lines must be >= 1"
                )));
            }
        }
        Ok(())
    }
}

fn check_pair(name: &str, what: &str, a: f64, b: f64, unit: Unit) -> InkformResult<()> {
    if !a.is_finite() || !b.is_finite() {
        return Err(InkformError::validation(format!(
            "field '{name}': {what} must be finite"
        )));
    }
    match unit {
        Unit::Fraction if !(0.0..=1.0).contains(&a) || !(0.0..=1.0).contains(&b) => {
            Err(InkformError::validation(format!(
                "field '{name}': fractional {what} must be within [0, 1]"
            )))
        }
        Unit::Points if what == "size" && (a < 0.0 || b < 0.0) => Err(InkformError::validation(
            format!("field '{name}': size must be >= 0"),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/field.rs"]
mod tests;
