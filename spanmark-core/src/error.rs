//! Error types for spanmark.

use thiserror::Error;

/// Result type for spanmark operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for spanmark operations.
///
/// A user-initiated quit is not represented here: sessions report it as an
/// outcome, so the caller can still persist whatever was labeled.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A dataset entry is not a `[text, {"entities": [...]}]` pair.
    #[error("Malformed record {index}: {reason}")]
    MalformedRecord { index: usize, reason: String },

    /// The label configuration is unusable.
    #[error("Invalid label set: {0}")]
    InvalidLabels(String),

    /// The display or input device failed.
    #[error("Device error: {0}")]
    Device(String),
}

impl Error {
    /// Create a malformed record error.
    pub fn malformed(index: usize, reason: impl Into<String>) -> Self {
        Error::MalformedRecord {
            index,
            reason: reason.into(),
        }
    }

    /// Create an invalid label set error.
    pub fn invalid_labels(msg: impl Into<String>) -> Self {
        Error::InvalidLabels(msg.into())
    }

    /// Create a device error.
    pub fn device(msg: impl Into<String>) -> Self {
        Error::Device(msg.into())
    }
}
