//! Rendering module for persisting extraction results.

mod json;
mod markdown;
mod writer;

pub use json::{to_json, JsonFormat};
pub use markdown::to_report;
pub use writer::{OutputWriter, WrittenFiles, COMMENTS_FILE, REPORT_FILE, REQUIREMENTS_FILE};
