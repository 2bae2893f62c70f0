use std::sync::Arc;

use crate::{
    assets::decode::image_dimensions,
    compose::{
        geometry::{resolve_position, resolve_size},
        text::{HELVETICA_ASCENT, LINE_HEIGHT, layout_text, text_width},
    },
    document::values::{RuntimeValueStore, display_string},
    encode::content::{PageContent, Primitive, TextLine, TextRun},
    encode::pdf::DocumentEncoder,
    foundation::core::{Point, Rect, Size},
    foundation::error::InkformResult,
    foundation::math::{approx_eq, fit_contain},
    model::binding::FieldBinding,
    model::field::{FieldConfig, FieldKind, TextAlign},
    signature::raster::render_signature_png,
    template::runtime::{RuntimeTemplate, TemplatePage},
};

/// Compositor configuration.
#[derive(Clone, Debug)]
pub struct ComposeOpts {
    /// Inset between a signature field's box and the fitted signature image, in points.
    pub signature_padding: f64,
    /// Label drawn in required signature fields that have no signature.
    pub missing_signature_label: String,
    /// Signature height as a fraction of page height when the field declares none.
    pub default_signature_height: f64,
    /// Width-to-height ratio of signature boxes without a declared size or image.
    pub signature_box_aspect: f64,
}

impl Default for ComposeOpts {
    fn default() -> Self {
        Self {
            signature_padding: 4.0,
            missing_signature_label: "Signature not captured".to_owned(),
            default_signature_height: 0.15,
            signature_box_aspect: 3.0,
        }
    }
}

/// Turns a resolved template plus runtime values into page content and encoded bytes.
#[derive(Clone, Debug, Default)]
pub struct Compositor {
    opts: ComposeOpts,
}

impl Compositor {
    /// Compositor with the given options.
    pub fn new(opts: ComposeOpts) -> Self {
        Self { opts }
    }

    /// Active options.
    pub fn opts(&self) -> &ComposeOpts {
        &self.opts
    }

    /// Build drawing primitives for every template page, ascending by index.
    pub fn compose(
        &self,
        template: &RuntimeTemplate,
        values: &RuntimeValueStore,
    ) -> InkformResult<Vec<PageContent>> {
        let mut signatures = SignatureCache::default();
        template
            .pages()
            .iter()
            .map(|page| self.compose_page(page, values, &mut signatures))
            .collect()
    }

    /// Compose every page and hand them to `encoder` in a single call.
    pub fn generate(
        &self,
        template: &RuntimeTemplate,
        values: &RuntimeValueStore,
        encoder: &dyn DocumentEncoder,
    ) -> InkformResult<Vec<u8>> {
        let pages = self.compose(template, values)?;
        encoder.encode(&pages)
    }

    fn compose_page(
        &self,
        page: &TemplatePage,
        values: &RuntimeValueStore,
        signatures: &mut SignatureCache,
    ) -> InkformResult<PageContent> {
        let mut content = PageContent::new(page.size);
        if let Some(raster) = page.background.raster() {
            content.primitives.push(Primitive::Image {
                rect: page.size.to_rect(),
                image: raster.image.clone(),
            });
        }
        for field in &page.fields {
            let primitive = match field.kind() {
                FieldKind::Text => self.text_primitive(field, page.size, values),
                FieldKind::Signature => {
                    self.signature_primitive(field, page.size, values, signatures)?
                }
            };
            content.primitives.push(primitive);
        }
        Ok(content)
    }

    fn text_primitive(
        &self,
        field: &FieldConfig,
        page: Size,
        values: &RuntimeValueStore,
    ) -> Primitive {
        let origin = resolve_position(field, page);
        let size = resolve_size(field, page);
        let rect = Rect::from_origin_size(origin, size.unwrap_or(Size::ZERO));

        let opts = field.text_options();
        let mut display = display_string(values.value(field.binding()));
        if opts.uppercase {
            display = display.to_uppercase();
        }
        if display.is_empty() && !field.required() {
            return Primitive::EmptyBox { rect };
        }

        let block = layout_text(&display, opts, size);
        let fs = block.font_size;
        let box_width = size.map(|s| s.width);
        let lines = block
            .lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let w = text_width(line, fs);
                let x = match (opts.align, box_width) {
                    (TextAlign::Start, _) => origin.x,
                    (TextAlign::Center, Some(bw)) => origin.x + (bw - w) / 2.0,
                    (TextAlign::Center, None) => origin.x - w / 2.0,
                    (TextAlign::End, Some(bw)) => origin.x + bw - w,
                    (TextAlign::End, None) => origin.x - w,
                };
                let baseline = origin.y + HELVETICA_ASCENT * fs + i as f64 * LINE_HEIGHT * fs;
                TextLine {
                    text: line.clone(),
                    origin: Point::new(x, baseline),
                }
            })
            .collect();

        let clip = match size {
            Some(s) if !opts.shrink_to_fit && s.width > 0.0 && s.height > 0.0 => Some(rect),
            _ => None,
        };
        Primitive::Text(TextRun {
            lines,
            font_size: fs,
            clip,
        })
    }

    fn signature_primitive(
        &self,
        field: &FieldConfig,
        page: Size,
        values: &RuntimeValueStore,
        signatures: &mut SignatureCache,
    ) -> InkformResult<Primitive> {
        let origin = resolve_position(field, page);
        let declared = resolve_size(field, page);
        let target_height = declared
            .map(|s| s.height)
            .filter(|h| *h > 0.0)
            .unwrap_or(page.height * self.opts.default_signature_height);

        let image = signatures.get_or_render(field.binding(), target_height, values)?;
        let Some(image) = image else {
            let size = declared.unwrap_or_else(|| {
                Size::new(target_height * self.opts.signature_box_aspect, target_height)
            });
            let rect = Rect::from_origin_size(origin, size);
            return Ok(if field.required() {
                Primitive::MissingSignature {
                    rect,
                    label: self.opts.missing_signature_label.clone(),
                }
            } else {
                Primitive::EmptyBox { rect }
            });
        };

        let (px_w, px_h) = image_dimensions(&image)?;
        let ink = Size::new(f64::from(px_w), f64::from(px_h));
        let size = declared.unwrap_or_else(|| {
            let aspect = if ink.height > 0.0 {
                ink.width / ink.height
            } else {
                self.opts.signature_box_aspect
            };
            Size::new(target_height * aspect, target_height)
        });
        // Padding never takes more than half of either box dimension.
        let padding = self
            .opts
            .signature_padding
            .min(size.width.abs() / 4.0)
            .min(size.height.abs() / 4.0)
            .max(0.0);
        let frame = Rect::from_origin_size(origin, size).inset(-padding);
        Ok(Primitive::Image {
            rect: fit_contain(ink, frame),
            image,
        })
    }
}

/// Rendered signatures for one compose call, keyed by binding and target height.
#[derive(Default)]
struct SignatureCache {
    entries: Vec<(FieldBinding, f64, Option<Arc<Vec<u8>>>)>,
}

impl SignatureCache {
    fn get_or_render(
        &mut self,
        binding: &FieldBinding,
        height: f64,
        values: &RuntimeValueStore,
    ) -> InkformResult<Option<Arc<Vec<u8>>>> {
        if let Some((_, _, image)) = self
            .entries
            .iter()
            .find(|(b, h, _)| b == binding && approx_eq(*h, height))
        {
            return Ok(image.clone());
        }
        let image = match values.signature(binding) {
            Some(snapshot) => {
                let png = render_signature_png(snapshot, Some(height))?;
                (!png.is_empty()).then(|| Arc::new(png))
            }
            None => None,
        };
        self.entries.push((binding.clone(), height, image.clone()));
        Ok(image)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;
