//! Error type for input validation, configuration and decoding failures

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapError {
    #[error("{kind} file not found: {}", path.display())]
    FileNotFound { kind: &'static str, path: PathBuf },

    #[error("Invalid points line {line} (expected 'lat,lon'): {text:?}: {reason}")]
    InvalidPointsLine {
        line: usize,
        text: String,
        reason: String,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    #[error("Invalid theme: {0}")]
    Config(String),

    #[error("{capability} is not available: {hint}")]
    MissingCapability {
        capability: &'static str,
        hint: &'static str,
    },

    #[error("Failed to read feature layer {}", path.display())]
    Features {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to decode badge image: {0}")]
    Badge(String),

    #[error("I/O error")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON")]
    Json(#[from] serde_json::Error),
}

impl MapError {
    /// Build a not-found error for a file of the given kind
    pub fn not_found(kind: &'static str, path: impl Into<PathBuf>) -> Self {
        MapError::FileNotFound {
            kind,
            path: path.into(),
        }
    }
}
