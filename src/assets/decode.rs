use std::io::Cursor;

use anyhow::Context;

use crate::foundation::error::InkformResult;

/// Decoded raster split into the planes a PDF image XObject needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Straight (non-premultiplied) RGB8, row-major, tightly packed.
    pub rgb8: Vec<u8>,
    /// Per-pixel alpha, present only when some pixel is not fully opaque.
    pub alpha8: Option<Vec<u8>>,
}

/// Decode encoded image bytes (PNG, JPEG, ...) into RGB and optional alpha planes.
pub fn decode_image(bytes: &[u8]) -> InkformResult<DecodedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let pixels = rgba.as_raw();
    let has_alpha = pixels.chunks_exact(4).any(|px| px[3] < 255);
    let rgb8 = pixels
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();
    let alpha8 = has_alpha.then(|| pixels.chunks_exact(4).map(|px| px[3]).collect());

    Ok(DecodedImage {
        width,
        height,
        rgb8,
        alpha8,
    })
}

/// Read pixel dimensions from an encoded image header without decoding pixels.
pub fn image_dimensions(bytes: &[u8]) -> InkformResult<(u32, u32)> {
    let dims = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .context("guess image format")?
        .into_dimensions()
        .context("read image dimensions")?;
    Ok(dims)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
