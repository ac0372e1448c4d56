//! Page rasterization with poppler's `pdftoppm`.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::NamedTempFile;

use super::{command_available, PageImage, PageRasterizer};
use crate::error::{Error, Result};

enum PdfFile {
    Path(PathBuf),
    Spooled(NamedTempFile),
}

/// Renders single pages to PNG by invoking `pdftoppm`.
pub struct PdftoppmRasterizer {
    pdf: PdfFile,
    program: String,
}

impl PdftoppmRasterizer {
    /// Rasterize pages of a PDF file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            pdf: PdfFile::Path(path.into()),
            program: "pdftoppm".to_string(),
        }
    }

    /// Rasterize pages of an in-memory PDF.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut spool = tempfile::Builder::new().suffix(".pdf").tempfile()?;
        spool.write_all(data)?;
        spool.flush()?;
        Ok(Self {
            pdf: PdfFile::Spooled(spool),
            program: "pdftoppm".to_string(),
        })
    }

    /// Use a different `pdftoppm` binary.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn pdf_path(&self) -> &Path {
        match &self.pdf {
            PdfFile::Path(p) => p,
            PdfFile::Spooled(f) => f.path(),
        }
    }
}

impl PageRasterizer for PdftoppmRasterizer {
    fn is_available(&self) -> bool {
        command_available(&self.program, "-v")
    }

    fn rasterize(&self, page: u32, dpi: u32) -> Result<PageImage> {
        let scratch = tempfile::tempdir()?;
        let prefix = scratch.path().join("page");
        let page_arg = page.to_string();

        let output = Command::new(&self.program)
            .arg("-png")
            .arg("-singlefile")
            .arg("-r")
            .arg(dpi.to_string())
            .arg("-f")
            .arg(&page_arg)
            .arg("-l")
            .arg(&page_arg)
            .arg(self.pdf_path())
            .arg(&prefix)
            .output()
            .map_err(|e| Error::OcrUnavailable(format!("failed to run {}: {}", self.program, e)))?;

        if !output.status.success() {
            return Err(Error::OcrUnavailable(format!(
                "{} failed on page {}: {}",
                self.program,
                page,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let image = prefix.with_extension("png");
        if !image.exists() {
            return Err(Error::OcrUnavailable(format!(
                "{} produced no image for page {}",
                self.program, page
            )));
        }

        Ok(PageImage::in_scratch(scratch, image, page, dpi))
    }
}
