use crate::model::TextRange;
use crate::tokenizer::Token;

/// Whether the working range follows the hovered token or has been
/// adjusted by hand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browsing,
    Editing,
}

/// Word cursor over a tokenized text
///
/// Boundary tokens block movement and edge adjustment: on the first token
/// nothing moves left or touches `start`, on the last token nothing moves
/// right or touches `end`. There is no wraparound.
#[derive(Debug, Clone)]
pub struct Navigator {
    tokens: Vec<TextRange>,
    text_len: usize,
    position: usize,
    mode: Mode,
    working: TextRange,
}

impl Navigator {
    /// Start Browsing on the first token; `None` when there are no tokens.
    pub fn new(tokens: &[Token], text_len: usize) -> Option<Self> {
        let first = tokens.first()?.range();
        Some(Self {
            tokens: tokens.iter().map(Token::range).collect(),
            text_len,
            position: 0,
            mode: Mode::Browsing,
            working: first,
        })
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The range labels and unlabels apply to
    pub fn working(&self) -> TextRange {
        self.working
    }

    pub fn is_first(&self) -> bool {
        self.position == 0
    }

    pub fn is_last(&self) -> bool {
        self.position + 1 == self.tokens.len()
    }

    pub fn current_token(&self) -> TextRange {
        self.tokens[self.position]
    }

    // Word movement; the working range snaps to the new token on `reset`.

    pub fn move_left(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.position -= 1;
        true
    }

    pub fn move_right(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.position += 1;
        true
    }

    // Edge adjustment. Each returns whether it entered Editing.

    pub fn widen_start(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.working.start = self.working.start.saturating_sub(1);
        self.mode = Mode::Editing;
        true
    }

    pub fn widen_end(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.working.end = (self.working.end + 1).min(self.text_len);
        self.mode = Mode::Editing;
        true
    }

    /// Not clamped against `end`: the range may invert.
    pub fn narrow_start(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.working.start += 1;
        self.mode = Mode::Editing;
        true
    }

    /// Not clamped against `start`: the range may invert.
    pub fn narrow_end(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.working.end = self.working.end.saturating_sub(1);
        self.mode = Mode::Editing;
        true
    }

    /// Leave Editing and snap the working range to the hovered token
    pub fn reset(&mut self) {
        self.mode = Mode::Browsing;
        self.working = self.current_token();
    }
}
