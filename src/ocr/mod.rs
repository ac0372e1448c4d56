//! OCR fallback for scanned pages.
//!
//! OCR is split into two collaborators: a [`PageRasterizer`] that renders a
//! single page to an image, and an [`OcrEngine`] that turns the image into
//! text lines. [`OcrFallback`] pairs them, checks once whether both are
//! usable, and is what the requirements assembler calls for pages that have
//! no extractable text.
//!
//! Only one page image exists at a time; it is deleted when the
//! [`PageImage`] is dropped.

mod poppler;
mod tesseract;

pub use poppler::PdftoppmRasterizer;
pub use tesseract::TesseractEngine;

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tempfile::TempDir;

use crate::error::{Error, Result};
use crate::parser::OcrOptions;

/// Default rasterization resolution.
pub const DEFAULT_DPI: u32 = 300;

/// A rasterized page on disk.
#[derive(Debug)]
pub struct PageImage {
    path: PathBuf,
    page: u32,
    dpi: u32,
    // Keeps the scratch directory alive for as long as the image is used.
    _scratch: Option<TempDir>,
}

impl PageImage {
    /// Wrap an existing image file.
    pub fn from_path(path: impl Into<PathBuf>, page: u32, dpi: u32) -> Self {
        Self {
            path: path.into(),
            page,
            dpi,
            _scratch: None,
        }
    }

    pub(crate) fn in_scratch(scratch: TempDir, path: PathBuf, page: u32, dpi: u32) -> Self {
        Self {
            path,
            page,
            dpi,
            _scratch: Some(scratch),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }
}

/// Renders a document page to an image.
pub trait PageRasterizer {
    /// Whether the rasterizer can run at all (e.g. its binary is installed).
    fn is_available(&self) -> bool;

    /// Render one page at the given resolution.
    fn rasterize(&self, page: u32, dpi: u32) -> Result<PageImage>;
}

/// Converts a page image into text lines.
pub trait OcrEngine {
    /// Whether the engine can run at all.
    fn is_available(&self) -> bool;

    /// Recognize text lines in reading order.
    fn recognize(&self, image: &PageImage) -> Result<Vec<String>>;
}

/// Rasterizer + engine pair with a one-time capability check.
pub struct OcrFallback {
    rasterizer: Box<dyn PageRasterizer>,
    engine: Box<dyn OcrEngine>,
    dpi: u32,
    available: bool,
}

impl OcrFallback {
    /// Pair a rasterizer with an engine. Availability is probed here, once.
    pub fn new(
        rasterizer: Box<dyn PageRasterizer>,
        engine: Box<dyn OcrEngine>,
        dpi: u32,
    ) -> Self {
        let available = rasterizer.is_available() && engine.is_available();
        if !available {
            log::warn!("OCR tools not available; scanned pages will yield no content");
        }
        Self {
            rasterizer,
            engine,
            dpi,
            available,
        }
    }

    /// pdftoppm + tesseract over a PDF file.
    pub fn for_pdf_file(path: impl Into<PathBuf>, options: &OcrOptions) -> Self {
        Self::new(
            Box::new(PdftoppmRasterizer::new(path)),
            Box::new(TesseractEngine::new(options.language.clone())),
            options.dpi,
        )
    }

    /// pdftoppm + tesseract over an in-memory PDF, spooled to a temporary file.
    pub fn for_pdf_bytes(data: &[u8], options: &OcrOptions) -> Result<Self> {
        Ok(Self::new(
            Box::new(PdftoppmRasterizer::from_bytes(data)?),
            Box::new(TesseractEngine::new(options.language.clone())),
            options.dpi,
        ))
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    /// Rasterize and recognize one page.
    pub fn recognize_page(&self, page: u32) -> Result<Vec<String>> {
        if !self.available {
            return Err(Error::OcrUnavailable(
                "rasterizer or OCR engine not installed".to_string(),
            ));
        }
        let image = self.rasterizer.rasterize(page, self.dpi)?;
        log::debug!(
            "Rasterized page {} at {} dpi to {}",
            image.page(),
            image.dpi(),
            image.path().display()
        );
        self.engine.recognize(&image)
    }
}

/// Probe whether an external command runs.
pub(crate) fn command_available(program: &str, probe_arg: &str) -> bool {
    let found = Command::new(program)
        .arg(probe_arg)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok();
    if !found {
        log::debug!("{} not found on PATH", program);
    }
    found
}
