use std::fmt;

use serde::{Deserialize, Serialize};

use super::TextRange;

/// Name of an entity class, e.g. `KEYWORD` or `SOFTWARE`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Label {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A labeled character range over one text.
///
/// Serialized as the `[start, end, label]` triple used by spaCy-style
/// training data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SpanRepr", into = "SpanRepr")]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub label: Label,
}

impl Span {
    pub fn new(start: usize, end: usize, label: impl Into<Label>) -> Self {
        Self {
            start,
            end,
            label: label.into(),
        }
    }

    pub fn range(&self) -> TextRange {
        TextRange::new(self.start, self.end)
    }
}

#[derive(Serialize, Deserialize)]
struct SpanRepr(usize, usize, Label);

impl From<SpanRepr> for Span {
    fn from(SpanRepr(start, end, label): SpanRepr) -> Self {
        Self { start, end, label }
    }
}

impl From<Span> for SpanRepr {
    fn from(span: Span) -> Self {
        SpanRepr(span.start, span.end, span.label)
    }
}
