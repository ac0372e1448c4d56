//! Recovery of inline review comments.
//!
//! Word documents exported to PDF render review comments into the page body
//! as `Commented [AK1]: text`. The tagged part of such a line is lifted out
//! of the requirement text and returned as a comment. Lines that follow a
//! tag are ordinary page text and stay where they are.

use std::sync::OnceLock;

use regex::Regex;

/// Comments shorter than this (after whitespace collapse) are discarded.
pub const MIN_COMMENT_CHARS: usize = 10;

fn tag_regex() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"Commented \[([^\]]+)\]:?").unwrap())
}

/// A comment recovered from page text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineComment {
    /// Reviewer tag inside the brackets (e.g. "AK1")
    pub author: String,
    /// Comment text, whitespace collapsed
    pub text: String,
}

/// Page lines split into requirement text and inline comments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitLines {
    pub lines: Vec<String>,
    pub comments: Vec<InlineComment>,
}

/// Separate inline comments from the rest of the page text.
///
/// Text before the first tag on a line stays in the requirement text. Each
/// comment runs from its tag to the next tag or the end of the line, so one
/// line can carry several comments.
pub fn split_inline_comments<S: AsRef<str>>(lines: &[S]) -> SplitLines {
    let re = tag_regex();
    let mut out = SplitLines::default();

    for line in lines {
        let line = line.as_ref();
        let tags: Vec<_> = re.captures_iter(line).collect();
        let Some(first) = tags.first() else {
            out.lines.push(line.to_string());
            continue;
        };

        // Group 0 always participates in a match.
        let first_start = first.get(0).map_or(0, |m| m.start());
        let prefix = line[..first_start].trim_end();
        if !prefix.is_empty() {
            out.lines.push(prefix.to_string());
        }

        for (n, caps) in tags.iter().enumerate() {
            let body_start = caps.get(0).map_or(0, |m| m.end());
            let body_end = tags
                .get(n + 1)
                .and_then(|next| next.get(0))
                .map_or(line.len(), |m| m.start());
            push_comment(&mut out.comments, &caps[1], &line[body_start..body_end]);
        }
    }

    out
}

fn push_comment(comments: &mut Vec<InlineComment>, author: &str, body: &str) {
    let author = author.trim().to_string();
    let text = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.chars().count() >= MIN_COMMENT_CHARS {
        comments.push(InlineComment { author, text });
    } else {
        log::debug!("Dropping short inline comment from [{}]", author);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_comments_passthrough() {
        let lines = ["SCOPE", "Plain text."];
        let split = split_inline_comments(&lines);
        assert_eq!(split.lines, vec!["SCOPE", "Plain text."]);
        assert!(split.comments.is_empty());
    }

    #[test]
    fn test_lines_after_comment_stay_requirements() {
        let lines = [
            "SECURITY",
            "Commented [AK1]: Please confirm with legal",
            "The system shall encrypt all data at rest.",
            "The system shall rotate keys every 90 days.",
        ];
        let split = split_inline_comments(&lines);

        assert_eq!(
            split.lines,
            vec![
                "SECURITY",
                "The system shall encrypt all data at rest.",
                "The system shall rotate keys every 90 days.",
            ]
        );
        assert_eq!(
            split.comments,
            vec![InlineComment {
                author: "AK1".to_string(),
                text: "Please confirm with legal".to_string(),
            }]
        );
    }

    #[test]
    fn test_two_tags_on_one_line() {
        let lines = [
            "Retention is seven years. Commented [A1]: first reviewer note here \
             Commented [B2]: second reviewer note here",
        ];
        let split = split_inline_comments(&lines);

        assert_eq!(split.lines, vec!["Retention is seven years."]);
        assert_eq!(
            split.comments,
            vec![
                InlineComment {
                    author: "A1".to_string(),
                    text: "first reviewer note here".to_string(),
                },
                InlineComment {
                    author: "B2".to_string(),
                    text: "second reviewer note here".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_prefix_text_is_kept() {
        let lines = ["The field is optional. Commented [JD2]: Should it be mandatory?"];
        let split = split_inline_comments(&lines);
        assert_eq!(split.lines, vec!["The field is optional."]);
        assert_eq!(split.comments[0].author, "JD2");
    }

    #[test]
    fn test_consecutive_tags_and_short_comments() {
        let lines = [
            "Commented [A1]: ok",
            "Commented [B2]: This needs a second review pass",
            "",
            "Next paragraph.",
        ];
        let split = split_inline_comments(&lines);
        assert_eq!(split.comments.len(), 1);
        assert_eq!(split.comments[0].author, "B2");
        assert_eq!(split.lines, vec!["", "Next paragraph."]);
    }
}
