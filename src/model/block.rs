//! Classified content blocks.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Paged;

/// Type tag assigned to every content block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    /// Short all-caps line or a line ending with a colon
    Heading,
    /// Running text (default)
    Paragraph,
    /// Bulleted or numbered line
    ListItem,
    /// Tab- or pipe-delimited row
    Table,
}

impl BlockType {
    /// Wire name used in `requirements.json`.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Heading => "heading",
            BlockType::Paragraph => "paragraph",
            BlockType::ListItem => "list_item",
            BlockType::Table => "table",
        }
    }

    /// Human-readable label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            BlockType::Heading => "Heading",
            BlockType::Paragraph => "Paragraph",
            BlockType::ListItem => "List Item",
            BlockType::Table => "Table",
        }
    }

    /// Whether consecutive lines of this type coalesce into one block.
    pub fn merges(&self) -> bool {
        matches!(self, BlockType::Paragraph)
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified unit of primary document text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Document-wide sequential id (starts at 1)
    pub id: u32,

    /// Page the block was found on (1-indexed). Carried by the page key on disk.
    #[serde(skip)]
    pub page: u32,

    /// Block type tag
    #[serde(rename = "type")]
    pub block_type: BlockType,

    /// Line content, joined with `\n` for merged paragraphs
    pub text: String,

    /// Number of source lines in the block
    pub line_count: u32,
}

impl ContentBlock {
    /// Create a single-line block.
    pub fn new(id: u32, page: u32, block_type: BlockType, text: impl Into<String>) -> Self {
        Self {
            id,
            page,
            block_type,
            text: text.into(),
            line_count: 1,
        }
    }

    /// Create a block from one or more source lines.
    pub fn from_lines<S: AsRef<str>>(id: u32, page: u32, block_type: BlockType, lines: &[S]) -> Self {
        let text = lines
            .iter()
            .map(|l| l.as_ref().trim())
            .collect::<Vec<_>>()
            .join("\n");
        Self {
            id,
            page,
            block_type,
            text,
            line_count: lines.len() as u32,
        }
    }
}

impl Paged for ContentBlock {
    fn page(&self) -> u32 {
        self.page
    }

    fn set_page(&mut self, page: u32) {
        self.page = page;
    }
}
