//! Crossterm frontend for annotation sessions.

use std::io::{self, Stdout};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use spanmark_core::{Error, Frontend, Key, Screen};

use crate::ui;

/// Owns the terminal in raw mode on the alternate screen.
///
/// The terminal is restored when this is dropped, whichever way the batch
/// ends.
pub struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    pub fn new() -> io::Result<Self> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, EnterAlternateScreen) {
            restore_terminal();
            return Err(err);
        }

        match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(err) => {
                restore_terminal();
                Err(err)
            }
        }
    }
}

impl Frontend for TerminalSession {
    fn draw(&mut self, screen: &Screen<'_>) -> spanmark_core::Result<()> {
        self.terminal
            .draw(|f| ui::draw(f, screen))
            .map_err(device_error)?;
        Ok(())
    }

    fn read_key(&mut self) -> spanmark_core::Result<Key> {
        loop {
            if let Event::Key(key) = event::read().map_err(device_error)? {
                // Windows reports releases too
                if key.kind == KeyEventKind::Press {
                    return Ok(to_key(key));
                }
            }
        }
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        restore_terminal();
    }
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

fn device_error(err: io::Error) -> Error {
    Error::device(err.to_string())
}

fn to_key(key: KeyEvent) -> Key {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Key::Interrupt,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Char(c) => Key::Char(c),
        _ => Key::Other,
    }
}
