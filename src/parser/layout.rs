//! Line reconstruction from page content streams.
//!
//! Text-showing operators are turned into positioned [`TextSpan`]s by
//! tracking the text matrix. Spans sharing a baseline form a [`TextLine`],
//! and lines are emitted top to bottom with a blank line wherever the
//! vertical gap is wide enough to separate paragraphs.

use lopdf::content::Operation;
use lopdf::Object;

/// Font size assumed before the first `Tf`.
const DEFAULT_FONT_SIZE: f32 = 12.0;

/// TJ adjustment (thousandths of text space) treated as a word break.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Baseline gap, relative to the usual line pitch, that starts a new paragraph.
const PARAGRAPH_GAP_RATIO: f32 = 1.6;

/// A run of text at one position.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline)
    pub y: f32,
    /// Effective font size in points
    pub font_size: f32,
}

impl TextSpan {
    pub fn new(text: impl Into<String>, x: f32, y: f32, font_size: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font_size,
        }
    }

    /// Rough right edge, assuming half an em per character.
    fn approx_end(&self) -> f32 {
        self.x + self.text.chars().count() as f32 * self.font_size * 0.5
    }
}

/// Spans on the same baseline, sorted left to right.
#[derive(Debug, Clone)]
pub struct TextLine {
    pub spans: Vec<TextSpan>,
    /// Y position (baseline)
    pub y: f32,
    /// Largest font size on the line
    pub font_size: f32,
}

impl TextLine {
    /// Create a line from spans.
    pub fn from_spans(mut spans: Vec<TextSpan>) -> Self {
        spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
        let y = spans.first().map(|s| s.y).unwrap_or(0.0);
        let font_size = spans.iter().map(|s| s.font_size).fold(0.0, f32::max);
        Self {
            spans,
            y,
            font_size,
        }
    }

    /// Combined text, with a space wherever spans are visibly apart.
    pub fn text(&self) -> String {
        let mut result = String::new();
        let mut prev: Option<&TextSpan> = None;
        for span in &self.spans {
            if let Some(prev) = prev {
                let gap = span.x - prev.approx_end();
                let spaced = result.ends_with(char::is_whitespace)
                    || span.text.starts_with(char::is_whitespace);
                if gap > span.font_size * 0.1 && !spaced {
                    result.push(' ');
                }
            }
            result.push_str(&span.text);
            prev = Some(span);
        }
        result.trim_end().to_string()
    }
}

/// Text matrix plus the line matrix it restarts from.
#[derive(Debug, Clone, Copy)]
struct TextMatrix {
    m: [f32; 6],
    line: [f32; 6],
    leading: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        const IDENTITY: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];
        Self {
            m: IDENTITY,
            line: IDENTITY,
            leading: 0.0,
        }
    }
}

impl TextMatrix {
    fn begin(&mut self) {
        *self = Self {
            leading: self.leading,
            ..Self::default()
        };
    }

    fn set(&mut self, m: [f32; 6]) {
        self.m = m;
        self.line = m;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        let [a, b, c, d, e, f] = self.line;
        self.line = [a, b, c, d, e + tx * a + ty * c, f + tx * b + ty * d];
        self.m = self.line;
    }

    fn next_line(&mut self) {
        self.translate(0.0, -self.leading);
    }

    fn position(&self) -> (f32, f32) {
        (self.m[4], self.m[5])
    }

    fn scale(&self) -> f32 {
        (self.m[1] * self.m[1] + self.m[3] * self.m[3]).sqrt()
    }
}

fn number(obj: Option<&Object>) -> Option<f32> {
    obj.and_then(|o| o.as_float().ok())
}

/// Collect positioned spans from content operations.
///
/// `decode` receives the current font resource name and the raw string bytes.
pub fn collect_spans<F>(operations: &[Operation], decode: F) -> Vec<TextSpan>
where
    F: Fn(&[u8], &[u8]) -> String,
{
    let mut spans = Vec::new();
    let mut matrix = TextMatrix::default();
    let mut font: Vec<u8> = Vec::new();
    let mut font_size = DEFAULT_FONT_SIZE;
    let mut in_text = false;

    for op in operations {
        let operands = &op.operands;
        match op.operator.as_str() {
            "BT" => {
                in_text = true;
                matrix.begin();
            }
            "ET" => in_text = false,
            "Tf" => {
                if let Some(Object::Name(name)) = operands.first() {
                    font = name.clone();
                }
                font_size = number(operands.get(1)).unwrap_or(DEFAULT_FONT_SIZE);
            }
            "TL" => matrix.leading = number(operands.first()).unwrap_or(0.0),
            "Td" | "TD" => {
                let tx = number(operands.first()).unwrap_or(0.0);
                let ty = number(operands.get(1)).unwrap_or(0.0);
                if op.operator == "TD" {
                    matrix.leading = -ty;
                }
                matrix.translate(tx, ty);
            }
            "Tm" => {
                let values: Vec<f32> = operands.iter().filter_map(|o| o.as_float().ok()).collect();
                if let Ok(m) = <[f32; 6]>::try_from(values) {
                    matrix.set(m);
                }
            }
            "T*" => matrix.next_line(),
            "Tj" | "'" | "\"" | "TJ" => {
                if op.operator == "'" || op.operator == "\"" {
                    matrix.next_line();
                }
                if !in_text {
                    continue;
                }
                let text = match op.operator.as_str() {
                    "TJ" => match operands.first() {
                        Some(Object::Array(items)) => show_array(items, &font, &decode),
                        _ => String::new(),
                    },
                    "\"" => string_operand(operands.get(2), &font, &decode),
                    _ => string_operand(operands.first(), &font, &decode),
                };
                if !text.trim().is_empty() {
                    let (x, y) = matrix.position();
                    spans.push(TextSpan::new(text, x, y, font_size * matrix.scale()));
                }
            }
            _ => {}
        }
    }

    spans
}

fn string_operand<F>(obj: Option<&Object>, font: &[u8], decode: &F) -> String
where
    F: Fn(&[u8], &[u8]) -> String,
{
    match obj {
        Some(Object::String(bytes, _)) => decode(font, bytes),
        _ => String::new(),
    }
}

fn show_array<F>(items: &[Object], font: &[u8], decode: &F) -> String
where
    F: Fn(&[u8], &[u8]) -> String,
{
    let mut combined = String::new();
    for item in items {
        match item {
            Object::String(bytes, _) => combined.push_str(&decode(font, bytes)),
            other => {
                let adjustment = -other.as_float().unwrap_or(0.0);
                if adjustment > TJ_SPACE_THRESHOLD
                    && !combined.is_empty()
                    && !combined.ends_with(char::is_whitespace)
                {
                    combined.push(' ');
                }
            }
        }
    }
    combined
}

/// Group spans into lines by baseline, top of the page first.
pub fn group_spans_into_lines(mut spans: Vec<TextSpan>) -> Vec<TextLine> {
    spans.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut lines = Vec::new();
    let mut current: Vec<TextSpan> = Vec::new();
    for span in spans {
        let same_line = current
            .first()
            .is_some_and(|first| (span.y - first.y).abs() <= span.font_size.max(1.0) * 0.3);
        if !same_line && !current.is_empty() {
            lines.push(TextLine::from_spans(std::mem::take(&mut current)));
        }
        current.push(span);
    }
    if !current.is_empty() {
        lines.push(TextLine::from_spans(current));
    }
    lines
}

/// Flatten lines to text, inserting an empty line at paragraph gaps.
///
/// The usual pitch is the smallest baseline distance on the page, floored
/// at the font size so a page of single-spaced lines has no breaks.
pub fn lines_to_text(lines: &[TextLine]) -> Vec<String> {
    let pitch = lines
        .windows(2)
        .map(|w| w[0].y - w[1].y)
        .filter(|gap| *gap > 0.1)
        .fold(f32::INFINITY, f32::min);

    let mut output = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            let gap = lines[i - 1].y - line.y;
            let usual = pitch.max(line.font_size).max(lines[i - 1].font_size);
            if gap > usual * PARAGRAPH_GAP_RATIO {
                output.push(String::new());
            }
        }
        output.push(line.text());
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::StringFormat;

    fn op(operator: &str, operands: Vec<Object>) -> Operation {
        Operation::new(operator, operands)
    }

    fn text(s: &str) -> Object {
        Object::String(s.as_bytes().to_vec(), StringFormat::Literal)
    }

    fn latin(_font: &[u8], bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).to_string()
    }

    fn page_lines(operations: &[Operation]) -> Vec<String> {
        lines_to_text(&group_spans_into_lines(collect_spans(operations, latin)))
    }

    #[test]
    fn test_td_moves_start_new_lines() {
        let ops = vec![
            op("BT", vec![]),
            op("Tf", vec![Object::Name(b"F1".to_vec()), 12.into()]),
            op("Td", vec![72.into(), 700.into()]),
            op("Tj", vec![text("SECURITY")]),
            op("Td", vec![0.into(), (-20).into()]),
            op("Tj", vec![text("The system shall encrypt data.")]),
            op("Td", vec![0.into(), (-20).into()]),
            op("Tj", vec![text("- first item")]),
            op("ET", vec![]),
        ];
        assert_eq!(
            page_lines(&ops),
            vec!["SECURITY", "The system shall encrypt data.", "- first item"]
        );
    }

    #[test]
    fn test_split_runs_on_one_baseline_join() {
        let ops = vec![
            op("BT", vec![]),
            op("Tf", vec![Object::Name(b"F1".to_vec()), 10.into()]),
            op("Tm", vec![1.into(), 0.into(), 0.into(), 1.into(), 300.into(), 500.into()]),
            op("Tj", vec![text("export")]),
            op("Tm", vec![1.into(), 0.into(), 0.into(), 1.into(), 72.into(), 500.into()]),
            op("Tj", vec![text("The portal shall")]),
            op("ET", vec![]),
        ];
        assert_eq!(page_lines(&ops), vec!["The portal shall export"]);
    }

    #[test]
    fn test_tj_kerning_and_leading_operators() {
        let ops = vec![
            op("BT", vec![]),
            op("Tf", vec![Object::Name(b"F1".to_vec()), 12.into()]),
            op("TL", vec![14.into()]),
            op("Td", vec![72.into(), 700.into()]),
            op(
                "TJ",
                vec![Object::Array(vec![text("Data"), (-250).into(), text("retention")])],
            ),
            op("'", vec![text("• nightly")]),
            op("T*", vec![]),
            op("Tj", vec![text("• weekly")]),
            op("ET", vec![]),
        ];
        assert_eq!(page_lines(&ops), vec!["Data retention", "• nightly", "• weekly"]);
    }

    #[test]
    fn test_wide_gap_inserts_blank_line() {
        let ops = vec![
            op("BT", vec![]),
            op("Tf", vec![Object::Name(b"F1".to_vec()), 12.into()]),
            op("TD", vec![72.into(), 700.into()]),
            op("Tj", vec![text("The portal shall export")]),
            op("Td", vec![0.into(), (-14).into()]),
            op("Tj", vec![text("reports as CSV.")]),
            op("Td", vec![0.into(), (-40).into()]),
            op("Tj", vec![text("Users shall sign in.")]),
            op("ET", vec![]),
        ];
        assert_eq!(
            page_lines(&ops),
            vec!["The portal shall export", "reports as CSV.", "", "Users shall sign in."]
        );
    }

    #[test]
    fn test_text_outside_bt_is_ignored() {
        let ops = vec![op("Tj", vec![text("stray")])];
        assert!(collect_spans(&ops, latin).is_empty());
        assert!(page_lines(&ops).is_empty());
    }
}
