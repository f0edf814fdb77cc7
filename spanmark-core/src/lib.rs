//! spanmark core - platform-agnostic span annotation library
//!
//! This crate holds the annotation engine: word tokenization, the per-text
//! span store, the keyboard-driven word cursor, and the session drivers that
//! tie them together. Rendering and key input are left to a [`Frontend`],
//! so the same sessions run in a terminal and in the browser.

pub mod batch;
pub mod corpus;
pub mod dataset;
pub mod error;
pub mod keymap;
pub mod labels;
pub mod model;
pub mod navigator;
pub mod screen;
pub mod session;
pub mod store;
pub mod tokenizer;

#[cfg(test)]
mod testing;

pub use batch::{annotate_dataset, annotate_record, annotate_texts, flag_texts, BatchReport, Window};
pub use dataset::{Dataset, Entry};
pub use error::{Error, Result};
pub use keymap::{Command, Key, Keymap};
pub use labels::{LabelDef, LabelSet, Palette};
pub use model::{AnnotationRecord, Label, Span, TextRange};
pub use navigator::{Mode, Navigator};
pub use screen::{Highlight, Progress, Screen, Segment, SessionKind};
pub use session::{AnnotationSession, Exit, FlagOutcome, FlagSession, Frontend, SessionOutcome};
pub use store::SpanStore;
pub use tokenizer::{tokenize, Token};
