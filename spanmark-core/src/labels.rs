//! Label set configuration.
//!
//! A `LabelSet` is fixed for one annotation campaign and handed to every
//! session; sessions only read it.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::Label;

/// Keys bound to session commands; a label may not claim them.
pub const RESERVED_KEYS: &[char] = &['-', '=', 'u', 'h', 'q', ' '];

/// Display color of a label, resolved to a concrete color by each frontend
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    Red,
    Peach,
    Yellow,
    Green,
    Teal,
    Blue,
    Mauve,
}

impl Palette {
    /// Style of the synthetic "current word" highlight
    pub const CURRENT: Palette = Palette::Mauve;
}

/// One label: the key that assigns it, its name, and its color
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LabelDef {
    pub key: char,
    pub name: Label,
    pub color: Palette,
}

impl LabelDef {
    pub fn new(key: char, name: &str, color: Palette) -> Self {
        Self {
            key,
            name: Label::new(name),
            color,
        }
    }
}

/// On-disk shape of a label configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelConfig {
    pub labels: Vec<LabelDef>,
}

/// The validated, read-only set of labels for a campaign
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet {
    labels: Vec<LabelDef>,
}

impl LabelSet {
    /// Validate and build a label set
    pub fn new(labels: Vec<LabelDef>) -> Result<Self> {
        if labels.is_empty() {
            return Err(Error::invalid_labels("at least one label is required"));
        }

        let mut keys = HashSet::new();
        let mut names = HashSet::new();
        for def in &labels {
            if def.name.as_str().trim().is_empty() {
                return Err(Error::invalid_labels(format!("label bound to '{}' has no name", def.key)));
            }
            if RESERVED_KEYS.contains(&def.key) {
                return Err(Error::invalid_labels(format!(
                    "key '{}' of {} is reserved",
                    def.key, def.name
                )));
            }
            if !keys.insert(def.key) {
                return Err(Error::invalid_labels(format!("key '{}' is bound twice", def.key)));
            }
            if !names.insert(def.name.clone()) {
                return Err(Error::invalid_labels(format!("label {} is defined twice", def.name)));
            }
        }

        Ok(Self { labels })
    }

    /// Single generic label: `k` → KEYWORD
    pub fn keyword() -> Self {
        Self {
            labels: vec![LabelDef::new('k', "KEYWORD", Palette::Red)],
        }
    }

    /// Software release tagging: `s` → SOFTWARE, `v` → VERSION, `t` → TECHNOLOGY
    pub fn tech() -> Self {
        Self {
            labels: vec![
                LabelDef::new('s', "SOFTWARE", Palette::Red),
                LabelDef::new('v', "VERSION", Palette::Yellow),
                LabelDef::new('t', "TECHNOLOGY", Palette::Teal),
            ],
        }
    }

    /// Look up a built-in preset by name
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "keyword" => Some(Self::keyword()),
            "tech" => Some(Self::tech()),
            _ => None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: LabelConfig = serde_json::from_str(json)?;
        Self::new(config.labels)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn labels(&self) -> &[LabelDef] {
        &self.labels
    }

    pub fn by_key(&self, key: char) -> Option<&LabelDef> {
        self.labels.iter().find(|d| d.key == key)
    }

    pub fn by_name(&self, name: &Label) -> Option<&LabelDef> {
        self.labels.iter().find(|d| &d.name == name)
    }

    /// Color of a label; spans resumed from a dataset may carry labels
    /// outside this set, which have none.
    pub fn color_of(&self, name: &Label) -> Option<Palette> {
        self.by_name(name).map(|d| d.color)
    }
}

impl Default for LabelSet {
    fn default() -> Self {
        Self::keyword()
    }
}
