use tracing::debug;

use crate::model::{Label, Span, TextRange};

/// The labeled spans of one text, kept ordered by `start`.
///
/// Spans may overlap each other; nothing enforces disjointness. Spans that
/// share a start keep their insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpanStore {
    spans: Vec<Span>,
}

impl SpanStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from previously recorded spans
    pub fn from_spans(mut spans: Vec<Span>) -> Self {
        spans.sort_by_key(|s| s.start);
        Self { spans }
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn into_spans(self) -> Vec<Span> {
        self.spans
    }

    /// Spans that contain `range`, or whose start or end falls inside it
    pub fn overlapping(&self, range: TextRange) -> Vec<&Span> {
        self.spans
            .iter()
            .filter(|s| s.range().overlaps(range))
            .collect()
    }

    /// Add a span unless an identical one is already stored.
    ///
    /// Returns `false` for a duplicate; that is not an error.
    pub fn add(&mut self, start: usize, end: usize, label: Label) -> bool {
        if self
            .spans
            .iter()
            .any(|s| s.start == start && s.end == end && s.label == label)
        {
            debug!(start, end, %label, "span already labeled");
            return false;
        }

        let at = self.spans.partition_point(|s| s.start <= start);
        self.spans.insert(at, Span::new(start, end, label));
        true
    }

    /// Remove the first span that starts at `range.start`, ends at
    /// `range.end`, or sits strictly inside `range`.
    ///
    /// At most one span is removed even when several match; repeated unlabel
    /// presses peel them off one at a time.
    pub fn remove_matching(&mut self, range: TextRange) -> Option<Span> {
        let idx = self.spans.iter().position(|s| {
            s.start == range.start || s.end == range.end || (s.start > range.start && s.end < range.end)
        })?;
        Some(self.spans.remove(idx))
    }
}
