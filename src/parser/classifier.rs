//! Line classification and paragraph grouping.
//!
//! Each non-blank line is tagged by the first matching rule in a fixed
//! priority table (table, list item, heading); anything unmatched is a
//! paragraph line. Consecutive paragraph lines with no blank line between
//! them are grouped into one block. Headings, list items and table rows
//! always form single-line blocks.

use crate::model::BlockType;

/// Headings must be at most this many characters long.
pub const HEADING_MAX_CHARS: usize = 60;

const BULLETS: &[char] = &['•', '-', '*', '◦', '▪'];

/// A single classification rule.
#[derive(Clone, Copy)]
pub struct ClassifierRule {
    /// Name used in logs and tests
    pub name: &'static str,
    /// Tag assigned when the rule matches
    pub block_type: BlockType,
    /// Predicate over the raw line
    pub matches: fn(&str) -> bool,
}

impl std::fmt::Debug for ClassifierRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierRule")
            .field("name", &self.name)
            .field("block_type", &self.block_type)
            .finish()
    }
}

/// Default rule table, in priority order.
pub const DEFAULT_RULES: &[ClassifierRule] = &[
    ClassifierRule {
        name: "delimited-row",
        block_type: BlockType::Table,
        matches: is_table_row,
    },
    ClassifierRule {
        name: "list-marker",
        block_type: BlockType::ListItem,
        matches: is_list_item,
    },
    ClassifierRule {
        name: "short-caps-or-colon",
        block_type: BlockType::Heading,
        matches: is_heading,
    },
];

/// Classify one line with the default rule table.
pub fn classify(line: &str) -> BlockType {
    classify_with(DEFAULT_RULES, line)
}

fn classify_with(rules: &[ClassifierRule], line: &str) -> BlockType {
    rules
        .iter()
        .find(|rule| (rule.matches)(line))
        .map(|rule| rule.block_type)
        .unwrap_or(BlockType::Paragraph)
}

/// Line contains a tab or a pipe.
pub fn is_table_row(line: &str) -> bool {
    line.contains('\t') || line.contains('|')
}

/// Line starts with a bullet or an ordinal marker such as `1.` or `12)`.
pub fn is_list_item(line: &str) -> bool {
    let trimmed = line.trim_start();
    if trimmed.starts_with(BULLETS) {
        return true;
    }

    let rest = trimmed.trim_start_matches(|c: char| c.is_ascii_digit());
    rest.len() < trimmed.len() && (rest.starts_with('.') || rest.starts_with(')'))
}

/// Short line that is all caps or ends with a colon.
pub fn is_heading(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.chars().count() > HEADING_MAX_CHARS {
        return false;
    }
    trimmed.ends_with(':') || is_all_caps(trimmed)
}

fn is_all_caps(text: &str) -> bool {
    text.chars().any(char::is_alphabetic) && !text.chars().any(char::is_lowercase)
}

/// A run of lines that becomes one content block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineGroup<'a> {
    pub block_type: BlockType,
    pub lines: Vec<&'a str>,
}

/// Ordered-rule classifier with paragraph merging.
#[derive(Debug, Clone)]
pub struct ContentClassifier {
    rules: Vec<ClassifierRule>,
}

impl ContentClassifier {
    /// Create a classifier with the default rule table.
    pub fn new() -> Self {
        Self::with_rules(DEFAULT_RULES.to_vec())
    }

    /// Create a classifier with a custom rule table, evaluated in order.
    pub fn with_rules(rules: Vec<ClassifierRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[ClassifierRule] {
        &self.rules
    }

    /// Classify a single line.
    pub fn classify(&self, line: &str) -> BlockType {
        classify_with(&self.rules, line)
    }

    /// Classify lines and group them into blocks.
    ///
    /// Blank lines are dropped and end the current paragraph.
    pub fn group<'a, S: AsRef<str>>(&self, lines: &'a [S]) -> Vec<LineGroup<'a>> {
        let mut groups = Vec::new();
        let mut paragraph: Vec<&'a str> = Vec::new();

        for line in lines {
            let line = line.as_ref();
            if line.trim().is_empty() {
                flush_paragraph(&mut paragraph, &mut groups);
                continue;
            }

            let block_type = self.classify(line);
            if block_type.merges() {
                paragraph.push(line);
            } else {
                flush_paragraph(&mut paragraph, &mut groups);
                groups.push(LineGroup {
                    block_type,
                    lines: vec![line],
                });
            }
        }

        flush_paragraph(&mut paragraph, &mut groups);
        groups
    }
}

impl Default for ContentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

fn flush_paragraph<'a>(paragraph: &mut Vec<&'a str>, groups: &mut Vec<LineGroup<'a>>) {
    if !paragraph.is_empty() {
        groups.push(LineGroup {
            block_type: BlockType::Paragraph,
            lines: std::mem::take(paragraph),
        });
    }
}
