//! In-memory frontend for driving sessions from tests.

use std::collections::VecDeque;

use crate::error::{Error, Result};
use crate::keymap::Key;
use crate::navigator::Mode;
use crate::screen::{Progress, Screen};
use crate::session::Frontend;

/// What one `draw` call received
#[derive(Debug, Clone)]
pub(crate) struct Frame {
    pub text: String,
    pub word: String,
    pub mode: Mode,
    pub help: bool,
    pub progress: Progress,
}

/// Replays a fixed key script and records every frame.
///
/// Running out of keys is reported as a device error.
#[derive(Debug, Default)]
pub(crate) struct ScriptedFrontend {
    keys: VecDeque<Key>,
    pub frames: Vec<Frame>,
}

impl ScriptedFrontend {
    pub fn new(keys: impl IntoIterator<Item = Key>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
            frames: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.keys.len()
    }

    pub fn last_frame(&self) -> &Frame {
        self.frames.last().expect("nothing was drawn")
    }
}

impl Frontend for ScriptedFrontend {
    fn draw(&mut self, screen: &Screen<'_>) -> Result<()> {
        self.frames.push(Frame {
            text: screen.segments.iter().map(|s| s.text.as_str()).collect(),
            word: screen.word.clone(),
            mode: screen.mode,
            help: screen.help,
            progress: screen.progress,
        });
        Ok(())
    }

    fn read_key(&mut self) -> Result<Key> {
        self.keys
            .pop_front()
            .ok_or_else(|| Error::device("key script exhausted"))
    }
}
