//! Renderer-agnostic snapshot of a session.
//!
//! Frontends draw a `Screen` however they like; every redraw is a full
//! re-render built from scratch, so drawing the same screen twice is safe.

use crate::labels::LabelDef;
use crate::model::{Label, Span, TextRange};
use crate::navigator::Mode;

/// How a run of text is highlighted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Highlight {
    Plain,
    Label(Label),
    /// The synthetic "current word" highlight
    Current,
}

/// A run of text with one highlight
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub highlight: Highlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    Annotate,
    Flag,
}

/// Position of the current text within its batch, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub index: usize,
    pub total: usize,
}

impl Progress {
    pub fn new(index: usize, total: usize) -> Self {
        Self { index, total }
    }
}

/// Everything a frontend needs to draw one frame
#[derive(Debug, Clone)]
pub struct Screen<'a> {
    pub kind: SessionKind,
    pub segments: Vec<Segment>,
    /// Text under the working range
    pub word: String,
    pub mode: Mode,
    pub help: bool,
    /// Labels available in this session; empty when flagging
    pub labels: &'a [LabelDef],
    pub span_count: usize,
    pub progress: Progress,
}

/// Cut `text` into highlighted segments.
///
/// Spans are drawn in start order. Where spans overlap, the earlier one keeps
/// the shared characters, so no character is emitted twice. `current` is
/// drawn like a span when given; empty and inverted ranges draw nothing.
pub fn segments(text: &str, spans: &[Span], current: Option<TextRange>) -> Vec<Segment> {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();

    let mut tags: Vec<(TextRange, Highlight)> = spans
        .iter()
        .map(|s| (s.range(), Highlight::Label(s.label.clone())))
        .collect();
    if let Some(range) = current {
        tags.push((range, Highlight::Current));
    }
    tags.sort_by_key(|(range, _)| range.start);

    let mut out = Vec::new();
    let mut cursor = 0;
    for (range, highlight) in tags {
        let start = range.start.max(cursor).min(len);
        let end = range.end.min(len);
        if end <= start {
            continue;
        }
        if start > cursor {
            out.push(segment(&chars[cursor..start], Highlight::Plain));
        }
        out.push(segment(&chars[start..end], highlight));
        cursor = end;
    }
    if cursor < len {
        out.push(segment(&chars[cursor..], Highlight::Plain));
    }

    out
}

fn segment(chars: &[char], highlight: Highlight) -> Segment {
    Segment {
        text: chars.iter().collect(),
        highlight,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(segments: &[Segment]) -> String {
        segments
            .iter()
            .map(|s| match &s.highlight {
                Highlight::Plain => s.text.clone(),
                Highlight::Label(label) => format!("[{}:{}]", label, s.text),
                Highlight::Current => format!("<{}>", s.text),
            })
            .collect()
    }

    #[test]
    fn test_current_word_only() {
        let segs = segments("Hello, world!", &[], Some(TextRange::new(7, 12)));
        assert_eq!(render(&segs), "Hello, <world>!");
    }

    #[test]
    fn test_spans_and_current() {
        let spans = [Span::new(0, 5, "KEYWORD")];
        let segs = segments("Hello, world!", &spans, Some(TextRange::new(7, 12)));
        assert_eq!(render(&segs), "[KEYWORD:Hello], <world>!");
    }

    #[test]
    fn test_overlapping_spans_do_not_repeat_text() {
        let spans = [Span::new(0, 8, "SOFTWARE"), Span::new(5, 12, "VERSION")];
        let segs = segments("Rust 1.80 is out", &spans, None);
        assert_eq!(render(&segs), "[SOFTWARE:Rust 1.8][VERSION:0 is] out");

        let text: String = segs.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(text, "Rust 1.80 is out");
    }

    #[test]
    fn test_inverted_current_draws_nothing() {
        let segs = segments("abc def", &[], Some(TextRange::new(6, 4)));
        assert_eq!(render(&segs), "abc def");
    }

    #[test]
    fn test_out_of_range_span_is_clamped() {
        let spans = [Span::new(4, 40, "KEYWORD")];
        let segs = segments("abc def", &spans, None);
        assert_eq!(render(&segs), "abc [KEYWORD:def]");
    }
}
