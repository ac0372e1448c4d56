//! Text recognition with the `tesseract` command-line tool.

use std::process::Command;

use super::{command_available, OcrEngine, PageImage};
use crate::error::{Error, Result};

/// OCR engine that shells out to `tesseract`.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    language: String,
    /// Page segmentation mode (1 = automatic with orientation detection)
    psm: u8,
    program: String,
}

impl TesseractEngine {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            psm: 1,
            program: "tesseract".to_string(),
        }
    }

    pub fn with_psm(mut self, psm: u8) -> Self {
        self.psm = psm;
        self
    }

    /// Use a different `tesseract` binary.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn language(&self) -> &str {
        &self.language
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new("eng")
    }
}

impl OcrEngine for TesseractEngine {
    fn is_available(&self) -> bool {
        command_available(&self.program, "--version")
    }

    fn recognize(&self, image: &PageImage) -> Result<Vec<String>> {
        let output = Command::new(&self.program)
            .arg(image.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .arg("--psm")
            .arg(self.psm.to_string())
            .output()
            .map_err(|e| Error::OcrUnavailable(format!("failed to run {}: {}", self.program, e)))?;

        if !output.status.success() {
            return Err(Error::OcrUnavailable(format!(
                "{} failed on page {}: {}",
                self.program,
                image.page(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(split_recognized(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Split OCR output into lines, dropping the trailing form feed tesseract
/// appends to each page.
fn split_recognized(text: &str) -> Vec<String> {
    text.trim_end_matches(['\u{c}', '\n', '\r', ' '])
        .lines()
        .map(|l| l.trim_end().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_recognized_keeps_blank_separators() {
        let lines = split_recognized("HEADER\nbody line\n\nnext para\n\u{c}");
        assert_eq!(lines, vec!["HEADER", "body line", "", "next para"]);
    }

    #[test]
    fn test_missing_program_is_unavailable() {
        let engine = TesseractEngine::default().with_program("pdfreq-no-such-binary");
        assert!(!engine.is_available());
        let image = PageImage::from_path("page.png", 1, 300);
        assert!(matches!(
            engine.recognize(&image),
            Err(Error::OcrUnavailable(_))
        ));
    }

    #[test]
    fn test_builder() {
        let engine = TesseractEngine::new("deu").with_psm(6);
        assert_eq!(engine.language(), "deu");
        assert_eq!(engine.psm, 6);
    }
}
