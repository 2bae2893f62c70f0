//! inkform overlays runtime values and freehand signatures onto PDF templates.
//!
//! A template is a source document plus declared field geometry. inkform rasterizes the source
//! pages into background images once, caches the resolved structure, and on every
//! [`Document::generate`] composites the current values on top and encodes a new PDF.
//!
//! # Pipeline overview
//!
//! 1. **Declare**: [`DocumentBuilder`] collects [`FieldConfig`]s and [`PageLayout`]s
//! 2. **Resolve**: [`TemplateResolver`] loads bytes via an [`AssetSource`], rasterizes them via a
//!    [`PageRasterizer`] and caches the [`RuntimeTemplate`]
//! 3. **Compose**: [`Compositor`] turns the template plus a [`RuntimeValueStore`] into
//!    [`PageContent`] primitives
//! 4. **Encode**: a [`DocumentEncoder`] (by default [`PdfEncoder`]) writes the output bytes
//!
//! Rasterization failures never fail a document: pages degrade to
//! [`PageBackground::Unavailable`] and render without a background.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod compose;
mod document;
mod encode;
mod foundation;
mod model;
mod raster;
mod signature;
mod template;

pub use assets::decode::{DecodedImage, decode_image, image_dimensions};
pub use assets::source::{AssetSource, FsAssetSource, MemoryAssetSource, normalize_rel_path};
pub use compose::compositor::{ComposeOpts, Compositor};
pub use compose::geometry::{resolve_position, resolve_rect, resolve_size};
pub use compose::text::{
    HELVETICA_ASCENT, LINE_HEIGHT, TextBlock, char_advance, layout_text, text_width, wrap_words,
};
pub use document::builder::DocumentBuilder;
pub use document::doc::Document;
pub use document::values::{DATE_FORMAT, RuntimeValue, RuntimeValueStore, display_string};
pub use encode::content::{PageContent, Primitive, TextLine, TextRun};
pub use encode::pdf::{DocumentEncoder, PdfEncoder, PdfEncoderOpts};
pub use foundation::core::{
    DEFAULT_PAGE_SIZE, POINTS_PER_INCH, Point, Rect, Size, raster_size_points,
};
pub use foundation::error::{InkformError, InkformResult};
pub use model::binding::FieldBinding;
pub use model::field::{FieldConfig, FieldKind, TextAlign, TextOptions, Unit};
pub use model::import::{FieldRecord, layouts_from_records, layouts_from_records_json};
pub use model::page::{LayoutFile, PageLayout};
pub use raster::page::{
    NullRasterizer, PDFTOPPM_ENV, PageRaster, PageRasterizer, PdftoppmRasterizer, RasterOutcome,
};
pub use signature::capture::{StrokeEvent, StrokeRecorder};
pub use signature::raster::{
    BASE_STROKE_WIDTH, MAX_STROKE_WIDTH, MIN_STROKE_WIDTH, SIGNATURE_MARGIN, render_signature_png,
};
pub use signature::snapshot::SignatureSnapshot;
pub use template::resolver::{CachePolicy, ResolverOpts, TemplateResolver};
pub use template::runtime::{PageBackground, RuntimeTemplate, TemplatePage};
