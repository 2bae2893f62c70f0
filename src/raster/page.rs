use std::{
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use crate::{
    assets::decode::image_dimensions,
    foundation::core::{Size, raster_size_points},
    foundation::error::{InkformError, InkformResult},
};

/// Environment variable overriding the `pdftoppm` executable.
pub const PDFTOPPM_ENV: &str = "INKFORM_PDFTOPPM";

/// Background image of one source page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRaster {
    /// Zero-based page index in the source document.
    pub page_index: u32,
    /// Encoded image bytes (PNG or JPEG).
    pub image: Arc<Vec<u8>>,
    /// Width in pixels.
    pub pixel_width: u32,
    /// Height in pixels.
    pub pixel_height: u32,
    /// Resolution the page was rendered at.
    pub dpi: u32,
}

impl PageRaster {
    /// Physical size of the raster in points.
    pub fn size_points(&self) -> Option<Size> {
        raster_size_points(self.pixel_width, self.pixel_height, self.dpi)
    }
}

/// Converts source document pages into background images.
///
/// Returning an empty list is valid (unsupported or corrupt sources); callers render those
/// pages without a background.
pub trait PageRasterizer: Send + Sync {
    /// Rasterize every page of `document` at `dpi`, ordered by page index.
    fn rasterize(&self, document: &[u8], dpi: u32) -> InkformResult<Vec<PageRaster>>;
}

/// Result of asking the rasterizer for backgrounds, with failures kept as data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RasterOutcome {
    /// The rasterizer ran; the list may be empty.
    Rendered(Vec<PageRaster>),
    /// The rasterizer failed; pages render without backgrounds.
    Failed(String),
}

impl RasterOutcome {
    /// Fold a rasterizer result into an outcome.
    pub fn from_result(result: InkformResult<Vec<PageRaster>>) -> Self {
        match result {
            Ok(pages) => Self::Rendered(pages),
            Err(e) => Self::Failed(e.to_string()),
        }
    }

    /// Raster for `page_index`, if the rasterizer produced one.
    pub fn page(&self, page_index: u32) -> Option<&PageRaster> {
        match self {
            Self::Rendered(pages) => pages.iter().find(|p| p.page_index == page_index),
            Self::Failed(_) => None,
        }
    }

    /// Number of rasterized pages.
    pub fn len(&self) -> usize {
        match self {
            Self::Rendered(pages) => pages.len(),
            Self::Failed(_) => 0,
        }
    }

    /// `true` when no page was rasterized.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Rasterizer that never produces backgrounds.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullRasterizer;

impl PageRasterizer for NullRasterizer {
    fn rasterize(&self, _document: &[u8], _dpi: u32) -> InkformResult<Vec<PageRaster>> {
        Ok(Vec::new())
    }
}

/// Rasterizer backed by poppler's `pdftoppm` executable.
#[derive(Clone, Debug)]
pub struct PdftoppmRasterizer {
    program: PathBuf,
}

impl Default for PdftoppmRasterizer {
    fn default() -> Self {
        let program = std::env::var_os(PDFTOPPM_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("pdftoppm"));
        Self { program }
    }
}

impl PdftoppmRasterizer {
    /// Use an explicit executable path.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Executable that will be spawned.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Return `true` when the configured executable can be invoked.
    pub fn is_available(&self) -> bool {
        std::process::Command::new(&self.program)
            .arg("-v")
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

impl PageRasterizer for PdftoppmRasterizer {
    fn rasterize(&self, document: &[u8], dpi: u32) -> InkformResult<Vec<PageRaster>> {
        if dpi == 0 {
            return Err(InkformError::raster("dpi must be > 0"));
        }
        let work = ScratchDir::create()?;
        let input = work.path().join("source.pdf");
        std::fs::write(&input, document)
            .map_err(|e| InkformError::raster(format!("write scratch pdf: {e}")))?;

        let prefix = work.path().join("page");
        let out = std::process::Command::new(&self.program)
            .args(["-r", &dpi.to_string(), "-png"])
            .arg(&input)
            .arg(&prefix)
            .output()
            .map_err(|e| {
                InkformError::raster(format!(
                    "failed to run '{}': {e}",
                    self.program.display()
                ))
            })?;
        if !out.status.success() {
            return Err(InkformError::raster(format!(
                "pdftoppm failed: {}",
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }

        let mut numbered = Vec::<(u32, PathBuf)>::new();
        let entries = std::fs::read_dir(work.path())
            .map_err(|e| InkformError::raster(format!("list pdftoppm output: {e}")))?;
        for entry in entries.flatten() {
            let path = entry.path();
            if let Some(n) = path
                .file_name()
                .and_then(|s| s.to_str())
                .and_then(parse_page_number)
            {
                numbered.push((n, path));
            }
        }
        numbered.sort_by_key(|(n, _)| *n);

        let mut pages = Vec::with_capacity(numbered.len());
        for (n, path) in numbered {
            let bytes = std::fs::read(&path)
                .map_err(|e| InkformError::raster(format!("read '{}': {e}", path.display())))?;
            let (pixel_width, pixel_height) = image_dimensions(&bytes)?;
            pages.push(PageRaster {
                page_index: n - 1,
                image: Arc::new(bytes),
                pixel_width,
                pixel_height,
                dpi,
            });
        }
        Ok(pages)
    }
}

/// Page number from a `pdftoppm` output name such as `page-07.png` (one-based).
fn parse_page_number(file_name: &str) -> Option<u32> {
    let stem = file_name.strip_prefix("page-")?.strip_suffix(".png")?;
    let n: u32 = stem.parse().ok()?;
    (n > 0).then_some(n)
}

struct ScratchDir(PathBuf);

impl ScratchDir {
    fn create() -> InkformResult<Self> {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        let dir = std::env::temp_dir().join(format!(
            "inkform_raster_{}_{}",
            std::process::id(),
            NEXT.fetch_add(1, Ordering::Relaxed)
        ));
        std::fs::create_dir_all(&dir)
            .map_err(|e| InkformError::raster(format!("create scratch dir: {e}")))?;
        Ok(Self(dir))
    }

    fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/page.rs"]
mod tests;
