//! Markdown report rendering.

use crate::model::{AnnotationRecord, BlockType, ContentBlock, DocumentInfo, PageMap};

/// Bullets that already mark a list item in the rendered report.
const LIST_BULLETS: &[&str] = &["•", "-", "*", "o "];

/// Render the human-readable report for one document.
///
/// Pages without blocks are left out of the requirements section. The
/// comments section is omitted entirely when there are no comments.
pub fn to_report(
    info: &DocumentInfo,
    requirements: &PageMap<ContentBlock>,
    comments: &PageMap<AnnotationRecord>,
) -> String {
    let mut output = String::new();

    output.push_str("# PDF Requirements Document\n\n");
    output.push_str(&format!(
        "**Source:** {}\n\n",
        info.source.as_deref().unwrap_or("(in-memory document)")
    ));
    output.push_str(&format!("**Total Pages:** {}\n\n", requirements.page_count()));
    output.push_str("---\n\n");

    output.push_str("## Requirements\n\n");
    for (page, blocks) in requirements.iter() {
        if blocks.is_empty() {
            continue;
        }
        output.push_str(&format!("### Page {}\n\n", page));
        for block in blocks {
            render_block(&mut output, block);
        }
        output.push_str("---\n\n");
    }

    if comments.total_items() > 0 {
        output.push_str("## Comments & Annotations\n\n");
        for (page, records) in comments.iter() {
            if records.is_empty() {
                continue;
            }
            output.push_str(&format!("### Page {} Comments\n\n", page));
            for record in records {
                render_comment(&mut output, record);
            }
            output.push_str("---\n\n");
        }
    }

    output
}

fn render_block(output: &mut String, block: &ContentBlock) {
    output.push_str(&format!("**[{} {}]**\n\n", block.block_type.label(), block.id));

    match block.block_type {
        BlockType::ListItem => {
            for line in block.text.lines().map(str::trim).filter(|l| !l.is_empty()) {
                if LIST_BULLETS.iter().any(|b| line.starts_with(b)) {
                    output.push_str(line);
                    output.push('\n');
                } else {
                    output.push_str(&format!("- {}\n", line));
                }
            }
        }
        BlockType::Heading => output.push_str(&format!("**{}**\n", block.text)),
        BlockType::Table => output.push_str(&format!("```text\n{}\n```\n", block.text)),
        BlockType::Paragraph => {
            output.push_str(&block.text);
            output.push('\n');
        }
    }

    output.push('\n');
}

fn render_comment(output: &mut String, record: &AnnotationRecord) {
    output.push_str(&format!("**[{}]** ({})\n\n", record.author, record.kind));
    if record.text.is_empty() {
        output.push_str(">\n\n");
        return;
    }
    for line in record.text.lines() {
        output.push_str(&format!("> {}\n", line));
    }
    output.push('\n');
}
