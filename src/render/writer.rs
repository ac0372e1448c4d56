//! Persisting extraction results to an output directory.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::model::{AnnotationRecord, ContentBlock, DocumentInfo, PageMap};
use crate::parser::ParseResult;

use super::json::{to_json, JsonFormat};
use super::markdown::to_report;

/// File name of the requirement blocks.
pub const REQUIREMENTS_FILE: &str = "requirements.json";
/// File name of the annotation records.
pub const COMMENTS_FILE: &str = "comments.json";
/// File name of the Markdown report.
pub const REPORT_FILE: &str = "parsed_document.md";

/// Paths written for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFiles {
    pub requirements: PathBuf,
    pub comments: PathBuf,
    pub report: Option<PathBuf>,
}

/// Writes `requirements.json`, `comments.json` and optionally the report.
///
/// Every file is rendered in memory before anything touches the disk, then
/// each is written to a temporary file in the target directory and renamed
/// into place. A failure never leaves a truncated output file behind.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    format: JsonFormat,
    markdown: bool,
}

impl OutputWriter {
    pub fn new() -> Self {
        Self {
            format: JsonFormat::Pretty,
            markdown: true,
        }
    }

    pub fn with_format(mut self, format: JsonFormat) -> Self {
        self.format = format;
        self
    }

    /// Write `parsed_document.md` alongside the JSON files (on by default).
    pub fn with_markdown(mut self, markdown: bool) -> Self {
        self.markdown = markdown;
        self
    }

    /// Write both JSON files. The directory must already exist.
    pub fn write(
        &self,
        requirements: &PageMap<ContentBlock>,
        comments: &PageMap<AnnotationRecord>,
        dir: &Path,
    ) -> Result<(PathBuf, PathBuf)> {
        let rendered = [
            (REQUIREMENTS_FILE, to_json(requirements, self.format)?),
            (COMMENTS_FILE, to_json(comments, self.format)?),
        ];
        let [requirements_path, comments_path] = self.persist_all(dir, rendered)?;
        Ok((requirements_path, comments_path))
    }

    /// Write the JSON files and, if enabled, the Markdown report.
    pub fn write_result(&self, result: &ParseResult, dir: &Path) -> Result<WrittenFiles> {
        if !self.markdown {
            let (requirements, comments) = self.write(&result.requirements, &result.comments, dir)?;
            return Ok(WrittenFiles {
                requirements,
                comments,
                report: None,
            });
        }

        let rendered = [
            (REQUIREMENTS_FILE, to_json(&result.requirements, self.format)?),
            (COMMENTS_FILE, to_json(&result.comments, self.format)?),
            (
                REPORT_FILE,
                to_report(&result.info, &result.requirements, &result.comments),
            ),
        ];
        let [requirements, comments, report] = self.persist_all(dir, rendered)?;
        Ok(WrittenFiles {
            requirements,
            comments,
            report: Some(report),
        })
    }

    /// Write only the Markdown report.
    pub fn write_report(
        &self,
        info: &DocumentInfo,
        requirements: &PageMap<ContentBlock>,
        comments: &PageMap<AnnotationRecord>,
        dir: &Path,
    ) -> Result<PathBuf> {
        let [path] = self.persist_all(dir, [(REPORT_FILE, to_report(info, requirements, comments))])?;
        Ok(path)
    }

    fn persist_all<const N: usize>(
        &self,
        dir: &Path,
        files: [(&str, String); N],
    ) -> Result<[PathBuf; N]> {
        if !dir.is_dir() {
            return Err(Error::OutputWrite {
                path: dir.to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotFound, "output directory does not exist"),
            });
        }

        let mut written: [PathBuf; N] = std::array::from_fn(|_| PathBuf::new());
        for (slot, (name, contents)) in written.iter_mut().zip(files) {
            let path = dir.join(name);
            write_atomic(&path, contents.as_bytes())?;
            log::info!("Wrote {}", path.display());
            *slot = path;
        }
        Ok(written)
    }
}

impl Default for OutputWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let output_err = |source: io::Error| Error::OutputWrite {
        path: path.to_path_buf(),
        source,
    };
    let dir = path.parent().unwrap_or_else(|| Path::new("."));

    let mut tmp = NamedTempFile::new_in(dir).map_err(output_err)?;
    tmp.write_all(contents).map_err(output_err)?;
    tmp.flush().map_err(output_err)?;
    tmp.persist(path).map_err(|e| output_err(e.error))?;
    Ok(())
}
