use crate::labels::LabelSet;
use crate::model::Label;

/// Platform-agnostic key press; frontends translate their native events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Enter,
    Esc,
    /// Ctrl-C
    Interrupt,
    Char(char),
    Other,
}

/// Session command decoded from a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    WidenStart,
    WidenEnd,
    NarrowStart,
    NarrowEnd,
    Confirm,
    Decline,
    Unlabel,
    Help,
    Quit,
    Assign(Label),
}

/// Decodes keys into commands for a label set
#[derive(Debug, Clone, Copy)]
pub struct Keymap<'a> {
    labels: Option<&'a LabelSet>,
}

impl<'a> Keymap<'a> {
    pub fn new(labels: &'a LabelSet) -> Self {
        Self {
            labels: Some(labels),
        }
    }

    /// Navigation and decision keys only; no key assigns a label
    pub fn unlabeled() -> Self {
        Self { labels: None }
    }

    pub fn command(&self, key: Key) -> Option<Command> {
        let command = match key {
            Key::Left => Command::MoveLeft,
            Key::Right => Command::MoveRight,
            Key::Up => Command::WidenStart,
            Key::Down => Command::WidenEnd,
            Key::Enter | Key::Char('\n') | Key::Char('\r') => Command::Confirm,
            Key::Interrupt => Command::Quit,
            Key::Char('-') => Command::NarrowStart,
            Key::Char('=') => Command::NarrowEnd,
            Key::Char(' ') => Command::Decline,
            Key::Char('u') => Command::Unlabel,
            Key::Char('h') => Command::Help,
            Key::Char('q') => Command::Quit,
            Key::Char(c) => Command::Assign(self.labels?.by_key(c)?.name.clone()),
            Key::Esc | Key::Other => return None,
        };
        Some(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_vocabulary() {
        let labels = LabelSet::tech();
        let keymap = Keymap::new(&labels);

        assert_eq!(keymap.command(Key::Left), Some(Command::MoveLeft));
        assert_eq!(keymap.command(Key::Up), Some(Command::WidenStart));
        assert_eq!(keymap.command(Key::Down), Some(Command::WidenEnd));
        assert_eq!(keymap.command(Key::Char('-')), Some(Command::NarrowStart));
        assert_eq!(keymap.command(Key::Char('=')), Some(Command::NarrowEnd));
        assert_eq!(keymap.command(Key::Enter), Some(Command::Confirm));
        assert_eq!(keymap.command(Key::Char(' ')), Some(Command::Decline));
        assert_eq!(keymap.command(Key::Interrupt), Some(Command::Quit));
        assert_eq!(
            keymap.command(Key::Char('v')),
            Some(Command::Assign(Label::new("VERSION")))
        );
    }

    #[test]
    fn test_unbound_keys() {
        let labels = LabelSet::keyword();
        let keymap = Keymap::new(&labels);

        assert_eq!(keymap.command(Key::Char('v')), None);
        assert_eq!(keymap.command(Key::Esc), None);
        assert_eq!(keymap.command(Key::Other), None);
        assert_eq!(Keymap::unlabeled().command(Key::Char('k')), None);
        assert_eq!(Keymap::unlabeled().command(Key::Char('q')), Some(Command::Quit));
    }
}
