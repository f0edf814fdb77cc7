use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::keymap::{Command, Key, Keymap};
use crate::labels::LabelSet;
use crate::model::{AnnotationRecord, Span};
use crate::navigator::{Mode, Navigator};
use crate::screen::{segments, Progress, Screen, SessionKind};
use crate::store::SpanStore;
use crate::tokenizer::{char_slice, tokenize, Token};

/// A display plus a key source.
///
/// The blocking session loops draw, then wait for one key. Device failures
/// are returned as errors and end the batch.
pub trait Frontend {
    fn draw(&mut self, screen: &Screen<'_>) -> Result<()>;
    fn read_key(&mut self) -> Result<Key>;
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// Enter: the text is done
    Completed,
    /// Quit: stop the whole batch
    Aborted,
}

/// Result of an annotation session; both variants carry the spans as they
/// stand, so the caller can persist progress either way
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Completed(Vec<Span>),
    Aborted(Vec<Span>),
}

impl SessionOutcome {
    pub fn spans(&self) -> &[Span] {
        match self {
            SessionOutcome::Completed(spans) | SessionOutcome::Aborted(spans) => spans,
        }
    }

    pub fn into_spans(self) -> Vec<Span> {
        match self {
            SessionOutcome::Completed(spans) | SessionOutcome::Aborted(spans) => spans,
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, SessionOutcome::Aborted(_))
    }
}

/// Result of a flag session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagOutcome {
    /// `true` for interesting
    Decided(bool),
    Aborted,
}

/// Labels spans of one text, word by word
pub struct AnnotationSession {
    text: String,
    tokens: Vec<Token>,
    store: SpanStore,
    nav: Option<Navigator>,
    labels: Arc<LabelSet>,
    help: bool,
}

impl AnnotationSession {
    pub fn new(text: impl Into<String>, spans: Vec<Span>, labels: Arc<LabelSet>) -> Self {
        let text = text.into();
        let tokens = tokenize(&text);
        let nav = Navigator::new(&tokens, text.chars().count());
        Self {
            text,
            tokens,
            store: SpanStore::from_spans(spans),
            nav,
            labels,
            help: false,
        }
    }

    pub fn from_record(record: &AnnotationRecord, labels: Arc<LabelSet>) -> Self {
        Self::new(record.text.clone(), record.spans.clone(), labels)
    }

    pub fn spans(&self) -> &[Span] {
        self.store.spans()
    }

    /// A text without tokens has nothing to visit
    pub fn is_exhausted(&self) -> bool {
        self.nav.is_none()
    }

    /// Feed one key. Returns how the session ended, if it did.
    ///
    /// While help is shown the key only dismisses it.
    pub fn handle_key(&mut self, key: Key) -> Option<Exit> {
        if self.help {
            self.help = false;
            return None;
        }
        let command = Keymap::new(&self.labels).command(key);
        self.handle(command)
    }

    /// Apply one decoded command; `None` stands for an unbound key.
    pub fn handle(&mut self, command: Option<Command>) -> Option<Exit> {
        let nav = match self.nav.as_mut() {
            Some(nav) => nav,
            None => return Some(Exit::Completed),
        };

        let editing = match command {
            Some(Command::MoveLeft) => {
                nav.move_left();
                false
            }
            Some(Command::MoveRight) => {
                nav.move_right();
                false
            }
            Some(Command::WidenStart) => nav.widen_start(),
            Some(Command::WidenEnd) => nav.widen_end(),
            Some(Command::NarrowStart) => nav.narrow_start(),
            Some(Command::NarrowEnd) => nav.narrow_end(),
            Some(Command::Confirm) => return Some(Exit::Completed),
            Some(Command::Quit) => return Some(Exit::Aborted),
            Some(Command::Help) => {
                self.help = true;
                return None;
            }
            Some(Command::Unlabel) => {
                let range = nav.working();
                if let Some(span) = self.store.remove_matching(range) {
                    debug!(start = span.start, end = span.end, label = %span.label, "span removed");
                }
                false
            }
            Some(Command::Assign(label)) => {
                let range = nav.working();
                if range.is_empty() {
                    warn!(start = range.start, end = range.end, %label, "labeling an empty range");
                }
                if self.store.add(range.start, range.end, label.clone()) {
                    debug!(start = range.start, end = range.end, %label, "span added");
                }
                false
            }
            Some(Command::Decline) | None => false,
        };

        if !editing {
            nav.reset();
        }
        None
    }

    /// Snapshot for drawing. The current-word highlight is only injected
    /// when no stored span overlaps the working range.
    pub fn screen(&self, progress: Progress) -> Screen<'_> {
        let (current, word, mode) = match &self.nav {
            Some(nav) => {
                let range = nav.working();
                let covered = !self.store.overlapping(range).is_empty();
                (
                    (!covered).then_some(range),
                    char_slice(&self.text, range.start, range.end).to_string(),
                    nav.mode(),
                )
            }
            None => (None, String::new(), Mode::Browsing),
        };

        Screen {
            kind: SessionKind::Annotate,
            segments: segments(&self.text, self.store.spans(), current),
            word,
            mode,
            help: self.help,
            labels: self.labels.labels(),
            span_count: self.store.len(),
            progress,
        }
    }

    /// Spans as they stand, tagged with how the session ended
    pub fn outcome(&self, exit: Exit) -> SessionOutcome {
        let spans = self.store.spans().to_vec();
        match exit {
            Exit::Completed => SessionOutcome::Completed(spans),
            Exit::Aborted => SessionOutcome::Aborted(spans),
        }
    }

    /// Draw and read keys until the text is confirmed or the user quits.
    ///
    /// On a device error the spans labeled so far stay readable through
    /// [`AnnotationSession::spans`].
    pub fn run<F: Frontend + ?Sized>(&mut self, frontend: &mut F, progress: Progress) -> Result<SessionOutcome> {
        info!(
            index = progress.index,
            tokens = self.tokens.len(),
            spans = self.store.len(),
            "annotation session started"
        );

        let exit = loop {
            if self.is_exhausted() {
                break Exit::Completed;
            }
            frontend.draw(&self.screen(progress))?;
            let key = frontend.read_key()?;
            if let Some(exit) = self.handle_key(key) {
                break exit;
            }
        };

        info!(index = progress.index, ?exit, spans = self.store.len(), "annotation session finished");
        Ok(self.outcome(exit))
    }
}

/// Decides whether one text is interesting, word cursor only
pub struct FlagSession {
    text: String,
    nav: Option<Navigator>,
}

impl FlagSession {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let nav = Navigator::new(&tokenize(&text), text.chars().count());
        Self { text, nav }
    }

    /// Enter means interesting, Space means not. Editing, labeling and help
    /// are not available here.
    pub fn handle_key(&mut self, key: Key) -> Option<FlagOutcome> {
        let command = Keymap::unlabeled().command(key);
        match command {
            Some(Command::Confirm) => return Some(FlagOutcome::Decided(true)),
            Some(Command::Decline) => return Some(FlagOutcome::Decided(false)),
            Some(Command::Quit) => return Some(FlagOutcome::Aborted),
            _ => {}
        }

        if let Some(nav) = self.nav.as_mut() {
            match command {
                Some(Command::MoveLeft) => {
                    nav.move_left();
                }
                Some(Command::MoveRight) => {
                    nav.move_right();
                }
                _ => {}
            }
            nav.reset();
        }
        None
    }

    pub fn screen(&self, progress: Progress) -> Screen<'static> {
        let (current, word) = match &self.nav {
            Some(nav) => {
                let range = nav.working();
                (Some(range), char_slice(&self.text, range.start, range.end).to_string())
            }
            None => (None, String::new()),
        };

        Screen {
            kind: SessionKind::Flag,
            segments: segments(&self.text, &[], current),
            word,
            mode: Mode::Browsing,
            help: false,
            labels: &[],
            span_count: 0,
            progress,
        }
    }

    pub fn run<F: Frontend + ?Sized>(&mut self, frontend: &mut F, progress: Progress) -> Result<FlagOutcome> {
        loop {
            frontend.draw(&self.screen(progress))?;
            let key = frontend.read_key()?;
            if let Some(outcome) = self.handle_key(key) {
                debug!(index = progress.index, ?outcome, "flag session finished");
                return Ok(outcome);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::TextRange;
    use crate::screen::Highlight;
    use crate::testing::ScriptedFrontend;

    fn keyword() -> Arc<LabelSet> {
        Arc::new(LabelSet::keyword())
    }

    fn run(text: &str, spans: Vec<Span>, keys: Vec<Key>) -> SessionOutcome {
        let mut session = AnnotationSession::new(text, spans, keyword());
        let mut frontend = ScriptedFrontend::new(keys);
        session.run(&mut frontend, Progress::new(1, 1)).unwrap()
    }

    #[test]
    fn test_label_two_words() {
        let outcome = run(
            "Hello, world!",
            Vec::new(),
            vec![Key::Char('k'), Key::Right, Key::Char('k'), Key::Enter],
        );
        assert_eq!(
            outcome,
            SessionOutcome::Completed(vec![Span::new(0, 5, "KEYWORD"), Span::new(7, 12, "KEYWORD")])
        );
    }

    #[test]
    fn test_unlabel_resumed_span() {
        let outcome = run(
            "Hello, world!",
            vec![Span::new(0, 5, "KEYWORD")],
            vec![Key::Char('u'), Key::Enter],
        );
        assert_eq!(outcome, SessionOutcome::Completed(Vec::new()));
    }

    #[test]
    fn test_quit_keeps_partial_spans() {
        let outcome = run(
            "one two three",
            Vec::new(),
            vec![Key::Right, Key::Char('k'), Key::Char('q')],
        );
        assert_eq!(outcome, SessionOutcome::Aborted(vec![Span::new(4, 7, "KEYWORD")]));
    }

    #[test]
    fn test_widened_label_then_reset() {
        let mut session = AnnotationSession::new("a bc d", Vec::new(), keyword());
        session.handle_key(Key::Right);
        session.handle_key(Key::Up);
        session.handle_key(Key::Down);

        let nav = session.nav.as_ref().unwrap();
        assert_eq!(nav.mode(), Mode::Editing);
        assert_eq!(nav.working(), TextRange::new(1, 5));

        session.handle_key(Key::Char('k'));
        assert_eq!(session.spans(), &[Span::new(1, 5, "KEYWORD")]);

        let nav = session.nav.as_ref().unwrap();
        assert_eq!(nav.mode(), Mode::Browsing);
        assert_eq!(nav.working(), TextRange::new(2, 4));
    }

    #[test]
    fn test_unbound_key_discards_edit() {
        let mut session = AnnotationSession::new("a bc d", Vec::new(), keyword());
        session.handle_key(Key::Right);
        session.handle_key(Key::Up);
        session.handle_key(Key::Char('z'));

        let nav = session.nav.as_ref().unwrap();
        assert_eq!(nav.mode(), Mode::Browsing);
        assert_eq!(nav.working(), TextRange::new(2, 4));
    }

    #[test]
    fn test_narrowed_past_itself_is_labeled_as_is() {
        let mut session = AnnotationSession::new("a bc d", Vec::new(), keyword());
        session.handle_key(Key::Right);
        for _ in 0..3 {
            session.handle_key(Key::Char('-'));
        }
        session.handle_key(Key::Char('k'));
        assert_eq!(session.spans(), &[Span::new(5, 4, "KEYWORD")]);
    }

    #[test]
    fn test_help_swallows_one_key() {
        let mut session = AnnotationSession::new("Hello, world!", Vec::new(), keyword());
        session.handle_key(Key::Right);
        session.handle_key(Key::Up);
        assert_eq!(session.handle_key(Key::Char('h')), None);
        assert!(session.help);

        // the acknowledgment is not interpreted as a label
        assert_eq!(session.handle_key(Key::Char('k')), None);
        assert!(!session.help);
        assert!(session.spans().is_empty());

        // and the edit in progress survives
        let nav = session.nav.as_ref().unwrap();
        assert_eq!(nav.mode(), Mode::Editing);
        assert_eq!(nav.working(), TextRange::new(6, 12));
    }

    #[test]
    fn test_current_highlight_only_when_uncovered() {
        let mut session = AnnotationSession::new("Hello, world!", Vec::new(), keyword());
        let screen = session.screen(Progress::default());
        assert!(screen.segments.iter().any(|s| s.highlight == Highlight::Current));
        assert_eq!(screen.word, "Hello");

        session.handle_key(Key::Char('k'));
        let screen = session.screen(Progress::default());
        assert!(!screen.segments.iter().any(|s| s.highlight == Highlight::Current));
        assert_eq!(screen.segments[0].highlight, Highlight::Label("KEYWORD".into()));
    }

    #[test]
    fn test_empty_text_completes_without_drawing() {
        let mut session = AnnotationSession::new("   ", vec![Span::new(0, 1, "KEYWORD")], keyword());
        let mut frontend = ScriptedFrontend::new(Vec::new());
        let outcome = session.run(&mut frontend, Progress::new(1, 1)).unwrap();

        assert_eq!(outcome, SessionOutcome::Completed(vec![Span::new(0, 1, "KEYWORD")]));
        assert!(frontend.frames.is_empty());
    }

    #[test]
    fn test_device_error_keeps_spans_readable() {
        let mut session = AnnotationSession::new("Hello, world!", Vec::new(), keyword());
        let mut frontend = ScriptedFrontend::new(vec![Key::Char('k')]);
        let err = session.run(&mut frontend, Progress::new(1, 1)).unwrap_err();

        assert!(matches!(err, Error::Device(_)));
        assert_eq!(session.spans(), &[Span::new(0, 5, "KEYWORD")]);
    }

    #[test]
    fn test_frames_follow_the_cursor() {
        let mut session = AnnotationSession::new("Hello, world!", Vec::new(), keyword());
        let mut frontend = ScriptedFrontend::new(vec![Key::Right, Key::Right, Key::Enter]);
        session.run(&mut frontend, Progress::new(2, 3)).unwrap();

        let words: Vec<_> = frontend.frames.iter().map(|f| f.word.as_str()).collect();
        assert_eq!(words, vec!["Hello", "world", "world"]);
        assert!(frontend.frames.iter().all(|f| f.mode == Mode::Browsing && !f.help));
        assert_eq!(frontend.last_frame().text, "Hello, world!");
        assert_eq!(frontend.last_frame().progress, Progress::new(2, 3));
    }

    #[test]
    fn test_flag_confirm_and_decline() {
        let mut frontend = ScriptedFrontend::new(vec![Key::Enter]);
        let outcome = FlagSession::new("sample tweet").run(&mut frontend, Progress::new(1, 1));
        assert_eq!(outcome.unwrap(), FlagOutcome::Decided(true));

        let mut frontend = ScriptedFrontend::new(vec![Key::Char(' ')]);
        let outcome = FlagSession::new("sample tweet").run(&mut frontend, Progress::new(1, 1));
        assert_eq!(outcome.unwrap(), FlagOutcome::Decided(false));
    }

    #[test]
    fn test_flag_ignores_labeling_keys() {
        let mut session = FlagSession::new("sample tweet");
        assert_eq!(session.handle_key(Key::Right), None);
        assert_eq!(session.handle_key(Key::Up), None);
        assert_eq!(session.handle_key(Key::Char('k')), None);
        assert_eq!(session.handle_key(Key::Char('h')), None);
        assert_eq!(session.screen(Progress::default()).word, "tweet");
        assert_eq!(session.handle_key(Key::Char('q')), Some(FlagOutcome::Aborted));
    }
}
