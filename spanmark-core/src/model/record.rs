use serde::{Deserialize, Serialize};

use super::Span;
use crate::tokenizer::char_slice;

/// One text and its labeled spans, the unit stored in a dataset.
///
/// Serialized as `[text, {"entities": [[start, end, label], ...]}]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RecordRepr", into = "RecordRepr")]
pub struct AnnotationRecord {
    pub text: String,
    pub spans: Vec<Span>,
}

impl AnnotationRecord {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            spans: Vec::new(),
        }
    }

    /// Create a record from previously recorded spans, ordered by start
    pub fn with_spans(text: impl Into<String>, mut spans: Vec<Span>) -> Self {
        spans.sort_by_key(|s| s.start);
        Self {
            text: text.into(),
            spans,
        }
    }

    /// The text covered by a span
    pub fn surface(&self, span: &Span) -> &str {
        char_slice(&self.text, span.start, span.end)
    }

    /// Surface strings of all non-empty spans
    pub fn surfaces(&self) -> impl Iterator<Item = &str> + '_ {
        self.spans
            .iter()
            .map(|s| self.surface(s))
            .filter(|s| !s.is_empty())
    }
}

#[derive(Serialize, Deserialize)]
struct Entities {
    entities: Vec<Span>,
}

#[derive(Serialize, Deserialize)]
struct RecordRepr(String, Entities);

impl From<RecordRepr> for AnnotationRecord {
    fn from(RecordRepr(text, Entities { entities }): RecordRepr) -> Self {
        Self::with_spans(text, entities)
    }
}

impl From<AnnotationRecord> for RecordRepr {
    fn from(record: AnnotationRecord) -> Self {
        RecordRepr(
            record.text,
            Entities {
                entities: record.spans,
            },
        )
    }
}
