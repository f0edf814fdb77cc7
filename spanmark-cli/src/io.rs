//! File I/O for native CLI

use anyhow::{Context, Result};
use chrono::Local;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use spanmark_core::{Dataset, LabelSet};
use tracing_subscriber::EnvFilter;

/// Load a dataset file
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    Dataset::load(path).with_context(|| format!("Failed to read dataset: {}", path.display()))
}

/// Load a dataset, or start an empty one if the file does not exist yet
pub fn load_or_create_dataset(path: &Path) -> Result<Dataset> {
    if path.exists() {
        load_dataset(path)
    } else {
        Ok(Dataset::new())
    }
}

pub fn save_dataset(dataset: &Dataset, path: &Path) -> Result<()> {
    dataset
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Get the ~/.spanmark directory path
pub fn spanmark_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not find home directory")?;
    Ok(home.join(".spanmark"))
}

/// Pick the label set: an explicit config file, then an explicit preset,
/// then ~/.spanmark/config.json, then the keyword preset.
pub fn resolve_labels(config: Option<&Path>, preset: Option<&str>) -> Result<LabelSet> {
    let home_config = spanmark_dir().ok().map(|dir| dir.join("config.json"));
    choose_labels(config, preset, home_config.as_deref())
}

fn choose_labels(config: Option<&Path>, preset: Option<&str>, home_config: Option<&Path>) -> Result<LabelSet> {
    if let Some(path) = config {
        return load_labels(path);
    }

    if let Some(name) = preset {
        return LabelSet::preset(name).with_context(|| format!("Unknown label preset: {name}"));
    }

    match home_config {
        Some(path) if path.exists() => load_labels(path),
        _ => Ok(LabelSet::keyword()),
    }
}

fn load_labels(path: &Path) -> Result<LabelSet> {
    LabelSet::load(path).with_context(|| format!("Failed to load label config: {}", path.display()))
}

/// Send tracing output to a fresh timestamped file under `dir`.
///
/// The terminal belongs to the UI while a session runs, so nothing is
/// logged to stderr. `RUST_LOG` overrides the default `info` level.
pub fn init_logging(dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let path = dir.join(format!("{}.log", Local::now().format("%Y-%m-%dT%H-%M-%S")));
    let file = File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(path)
}
