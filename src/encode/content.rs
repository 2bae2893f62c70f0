use std::sync::Arc;

use crate::foundation::core::{Point, Rect, Size};

/// One line of positioned text.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLine {
    /// Characters to draw.
    pub text: String,
    /// Left end of the baseline, top-left origin, in points.
    pub origin: Point,
}

/// Block of text lines sharing one font size.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    /// Lines in drawing order. May be empty for required fields without a value.
    pub lines: Vec<TextLine>,
    /// Font size in points after shrink-to-fit.
    pub font_size: f64,
    /// Clip rectangle, when the text must not leave its box.
    pub clip: Option<Rect>,
}

/// Drawing primitive in page space (points, top-left origin).
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    /// Encoded image (PNG or JPEG) stretched into `rect`.
    Image {
        /// Destination rectangle.
        rect: Rect,
        /// Encoded image bytes.
        image: Arc<Vec<u8>>,
    },
    /// Text block.
    Text(TextRun),
    /// Reserved field area with nothing drawn.
    EmptyBox {
        /// Field area.
        rect: Rect,
    },
    /// Bordered box with a label marking a required signature that was never captured.
    MissingSignature {
        /// Field area.
        rect: Rect,
        /// Label drawn centred in the box.
        label: String,
    },
}

/// Ordered drawing primitives for one output page.
#[derive(Clone, Debug, PartialEq)]
pub struct PageContent {
    /// Page size in points.
    pub size: Size,
    /// Primitives in drawing order; the background, if any, comes first.
    pub primitives: Vec<Primitive>,
}

impl PageContent {
    /// Empty page of the given size.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            primitives: Vec::new(),
        }
    }

    /// Images referenced on this page, in drawing order.
    pub fn images(&self) -> impl Iterator<Item = &Arc<Vec<u8>>> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Image { image, .. } => Some(image),
            _ => None,
        })
    }
}
