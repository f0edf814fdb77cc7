//! Word segmentation with character offsets.
//!
//! A token is one maximal run of non-whitespace characters, with quoting and
//! sentence punctuation trimmed off its edges. Offsets count `char`s, not
//! bytes, so they line up with the dataset's entity offsets.

use crate::model::TextRange;

/// Stripped one at a time from the end of a word. Sentence-final `!`/`?` and a
/// closing `)` go too, so `(hello),` and `world!` yield the bare word.
///
/// Those three are not trimmed by the older Python annotator, so a word like
/// `world!` gets a shorter range here than in datasets it produced.
const TRAILING: &[char] = &[',', '.', ':', ';', '"', '`', '\'', ')', '!', '?'];

/// Stripped one at a time from the start of a word.
const LEADING: &[char] = &['"', '(', '`', '\''];

/// A trimmed word and its `[start, end)` character range in the source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub start: usize,
    pub end: usize,
    pub word: String,
}

impl Token {
    pub fn range(&self) -> TextRange {
        TextRange::new(self.start, self.end)
    }

    /// A run made only of punctuation trims down to nothing but is still
    /// emitted, as a zero-length token.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Split `text` into tokens ordered by `start`.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut run: Option<(usize, String)> = None;

    for (idx, ch) in text.chars().enumerate() {
        if ch.is_whitespace() {
            if let Some((start, word)) = run.take() {
                tokens.push(trim(start, word));
            }
        } else {
            run.get_or_insert_with(|| (idx, String::new())).1.push(ch);
        }
    }
    if let Some((start, word)) = run {
        tokens.push(trim(start, word));
    }

    tokens
}

fn trim(mut start: usize, mut word: String) -> Token {
    while word.ends_with(TRAILING) {
        word.pop();
    }
    while word.starts_with(LEADING) {
        word.remove(0);
        start += 1;
    }

    let end = start + word.chars().count();
    Token { start, end, word }
}

/// Slice `text` by character offsets, clamping to its length.
///
/// Empty and inverted ranges yield `""`.
pub fn char_slice(text: &str, start: usize, end: usize) -> &str {
    if start >= end {
        return "";
    }

    let mut bounds = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()));
    let Some(from) = bounds.nth(start) else {
        return "";
    };
    let to = bounds.nth(end - start - 1).unwrap_or(text.len());
    &text[from..to]
}
