use std::{collections::HashMap, sync::Arc};

use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect as PdfRect, Ref, Str};
use rayon::prelude::*;

use crate::{
    assets::decode::decode_image,
    compose::text::text_width,
    encode::content::{PageContent, Primitive, TextRun},
    foundation::core::Rect,
    foundation::error::{InkformError, InkformResult},
};

const FONT_NAME: Name<'static> = Name(b"F1");
const DEFLATE_LEVEL: u8 = 6;

/// Serializes composed pages into an output document.
pub trait DocumentEncoder: Send + Sync {
    /// Encode every page, in order, into one document.
    fn encode(&self, pages: &[PageContent]) -> InkformResult<Vec<u8>>;
}

/// Options for [`PdfEncoder`].
#[derive(Clone, Debug)]
pub struct PdfEncoderOpts {
    /// Font size of the missing-signature label, capped by the box height.
    pub label_font_size: f64,
    /// Border width of missing-signature boxes, in points.
    pub border_width: f64,
    /// Border and label gray level in `[0, 1]`.
    pub border_gray: f32,
}

impl Default for PdfEncoderOpts {
    fn default() -> Self {
        Self {
            label_font_size: 9.0,
            border_width: 1.0,
            border_gray: 0.45,
        }
    }
}

/// PDF encoder backed by `pdf-writer`.
///
/// Text is set in the standard Helvetica font with WinAnsi encoding. Images become Flate RGB
/// XObjects with an optional soft mask for transparency; identical image buffers are embedded
/// once per document.
#[derive(Clone, Debug, Default)]
pub struct PdfEncoder {
    opts: PdfEncoderOpts,
}

impl PdfEncoder {
    /// Encoder with the given options.
    pub fn new(opts: PdfEncoderOpts) -> Self {
        Self { opts }
    }
}

struct PreparedImage {
    width: i32,
    height: i32,
    rgb: Vec<u8>,
    alpha: Option<Vec<u8>>,
}

fn prepare_image(bytes: &[u8]) -> InkformResult<PreparedImage> {
    let decoded = decode_image(bytes)?;
    let width = i32::try_from(decoded.width)
        .map_err(|_| InkformError::encode("image width exceeds PDF limits"))?;
    let height = i32::try_from(decoded.height)
        .map_err(|_| InkformError::encode("image height exceeds PDF limits"))?;
    Ok(PreparedImage {
        width,
        height,
        rgb: miniz_oxide::deflate::compress_to_vec_zlib(&decoded.rgb8, DEFLATE_LEVEL),
        alpha: decoded
            .alpha8
            .map(|a| miniz_oxide::deflate::compress_to_vec_zlib(&a, DEFLATE_LEVEL)),
    })
}

impl DocumentEncoder for PdfEncoder {
    #[tracing::instrument(skip(self, pages), fields(pages = pages.len()))]
    fn encode(&self, pages: &[PageContent]) -> InkformResult<Vec<u8>> {
        if pages.is_empty() {
            return Err(InkformError::encode("document has no pages"));
        }

        // Unique images by buffer identity, in first-use order.
        let mut image_index = HashMap::<*const Vec<u8>, usize>::new();
        let mut unique = Vec::<&Arc<Vec<u8>>>::new();
        for image in pages.iter().flat_map(PageContent::images) {
            image_index.entry(Arc::as_ptr(image)).or_insert_with(|| {
                unique.push(image);
                unique.len() - 1
            });
        }
        let prepared = unique
            .par_iter()
            .map(|bytes| prepare_image(bytes))
            .collect::<InkformResult<Vec<_>>>()?;
        tracing::debug!(images = prepared.len(), "prepared image xobjects");

        let mut next = 1;
        let mut alloc = || {
            let r = Ref::new(next);
            next += 1;
            r
        };
        let catalog_id = alloc();
        let pages_id = alloc();
        let font_id = alloc();

        let mut pdf = Pdf::new();
        pdf.type1_font(font_id)
            .base_font(Name(b"Helvetica"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));

        let mut image_refs = Vec::with_capacity(prepared.len());
        for img in &prepared {
            let xobj_ref = alloc();
            let mask_ref = img.alpha.as_ref().map(|alpha| {
                let mask_ref = alloc();
                let mut mask = pdf.image_xobject(mask_ref, alpha);
                mask.filter(Filter::FlateDecode);
                mask.width(img.width);
                mask.height(img.height);
                mask.color_space().device_gray();
                mask.bits_per_component(8);
                mask.finish();
                mask_ref
            });
            let mut xobj = pdf.image_xobject(xobj_ref, &img.rgb);
            xobj.filter(Filter::FlateDecode);
            xobj.width(img.width);
            xobj.height(img.height);
            xobj.color_space().device_rgb();
            xobj.bits_per_component(8);
            if let Some(mask_ref) = mask_ref {
                xobj.s_mask(mask_ref);
            }
            xobj.finish();
            image_refs.push(xobj_ref);
        }
        let image_name = |i: usize| format!("Im{}", i + 1);

        let mut page_ids = Vec::with_capacity(pages.len());
        for page in pages {
            let page_id = alloc();
            let content_id = alloc();
            page_ids.push(page_id);

            let raw = self.page_content(page, &image_index, &image_name);
            let compressed = miniz_oxide::deflate::compress_to_vec_zlib(&raw, DEFLATE_LEVEL);
            pdf.stream(content_id, &compressed)
                .filter(Filter::FlateDecode);

            let mut used: Vec<usize> = page
                .images()
                .filter_map(|img| image_index.get(&Arc::as_ptr(img)).copied())
                .collect();
            used.sort_unstable();
            used.dedup();

            let mut pdf_page = pdf.page(page_id);
            pdf_page
                .media_box(PdfRect::new(
                    0.0,
                    0.0,
                    page.size.width as f32,
                    page.size.height as f32,
                ))
                .parent(pages_id)
                .contents(content_id);
            {
                let mut resources = pdf_page.resources();
                resources.fonts().pair(FONT_NAME, font_id);
                if !used.is_empty() {
                    let names: Vec<String> = used.iter().map(|i| image_name(*i)).collect();
                    let mut xobjects = resources.x_objects();
                    for (i, name) in used.iter().zip(&names) {
                        xobjects.pair(Name(name.as_bytes()), image_refs[*i]);
                    }
                }
            }
            pdf_page.finish();
        }

        pdf.catalog(catalog_id).pages(pages_id);
        pdf.pages(pages_id)
            .kids(page_ids.iter().copied())
            .count(page_ids.len() as i32);

        Ok(pdf.finish())
    }
}

impl PdfEncoder {
    fn page_content(
        &self,
        page: &PageContent,
        image_index: &HashMap<*const Vec<u8>, usize>,
        image_name: &dyn Fn(usize) -> String,
    ) -> Vec<u8> {
        let h = page.size.height;
        let mut content = Content::new();
        for primitive in &page.primitives {
            match primitive {
                Primitive::Image { rect, image } => {
                    let Some(i) = image_index.get(&Arc::as_ptr(image)) else {
                        continue;
                    };
                    if rect.width() <= 0.0 || rect.height() <= 0.0 {
                        continue;
                    }
                    let name = image_name(*i);
                    content.save_state();
                    content.transform([
                        rect.width() as f32,
                        0.0,
                        0.0,
                        rect.height() as f32,
                        rect.x0 as f32,
                        (h - rect.y1) as f32,
                    ]);
                    content.x_object(Name(name.as_bytes()));
                    content.restore_state();
                }
                Primitive::Text(run) => write_text(&mut content, run, h),
                Primitive::EmptyBox { .. } => {}
                Primitive::MissingSignature { rect, label } => {
                    self.write_missing_signature(&mut content, *rect, label, h);
                }
            }
        }
        content.finish().to_vec()
    }

    fn write_missing_signature(&self, content: &mut Content, rect: Rect, label: &str, h: f64) {
        let gray = self.opts.border_gray;
        content.save_state();
        content.set_line_width(self.opts.border_width as f32);
        content.set_stroke_rgb(gray, gray, gray);
        content.rect(
            rect.x0 as f32,
            (h - rect.y1) as f32,
            rect.width() as f32,
            rect.height() as f32,
        );
        content.stroke();

        let fs = self.opts.label_font_size.min(rect.height() * 0.6);
        if fs > 0.0 && !label.is_empty() {
            let w = text_width(label, fs);
            let x = rect.x0 + (rect.width() - w) / 2.0;
            let baseline = rect.center().y + fs * 0.35;
            let bytes = win_ansi(label);
            content.set_fill_rgb(gray, gray, gray);
            content.begin_text();
            content.set_font(FONT_NAME, fs as f32);
            content.next_line(x as f32, (h - baseline) as f32);
            content.show(Str(&bytes));
            content.end_text();
        }
        content.restore_state();
    }
}

fn write_text(content: &mut Content, run: &TextRun, h: f64) {
    if run.lines.is_empty() || run.font_size <= 0.0 {
        return;
    }
    content.save_state();
    if let Some(clip) = run.clip {
        content.rect(
            clip.x0 as f32,
            (h - clip.y1) as f32,
            clip.width() as f32,
            clip.height() as f32,
        );
        content.clip_nonzero();
        content.end_path();
    }
    content.set_fill_rgb(0.0, 0.0, 0.0);
    for line in &run.lines {
        let bytes = win_ansi(&line.text);
        content.begin_text();
        content.set_font(FONT_NAME, run.font_size as f32);
        content.next_line(line.origin.x as f32, (h - line.origin.y) as f32);
        content.show(Str(&bytes));
        content.end_text();
    }
    content.restore_state();
}

/// Encode `text` for a WinAnsi simple font. Characters outside Latin-1 become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match u32::from(c) {
            n @ 0x20..=0x7e | n @ 0xa0..=0xff => n as u8,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/encode/pdf.rs"]
mod tests;
