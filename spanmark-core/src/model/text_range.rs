/// Represents a half-open range of text by character offsets.
///
/// Bounds are kept exactly as given: a range that was narrowed past itself
/// keeps `start > end` and is treated as empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// True when narrowing pushed `start` beyond `end`.
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    /// Check whether `other` touches this range: it lies inside it, or it
    /// reaches over this range's start, or it reaches over this range's end.
    pub fn overlaps(&self, other: TextRange) -> bool {
        (self.start <= other.start && other.end <= self.end)
            || (other.start < self.start && self.start <= other.end)
            || (other.start < self.end && self.end <= other.end)
    }
}
