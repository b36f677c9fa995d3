//! Error types for voxline

use std::io;
use thiserror::Error;

/// Main error type for voxline
#[derive(Error, Debug)]
pub enum VoxlineError {
    /// Malformed markup (unclosed tags, bad entities, ...)
    #[error("Markup parse error at byte {offset}: {message}")]
    Parse { offset: usize, message: String },

    /// Unsupported pause unit, malformed acronym override, unspellable acronym
    #[error("Format error: {0}")]
    Format(String),

    /// Engine output disagrees with the parsed document
    #[error("Consistency error: {0}")]
    Consistency(String),

    /// Opaque failure from the synthesis engine
    #[error("Synthesis engine error: {0}")]
    Engine(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
}

/// Result type alias for voxline operations
pub type Result<T> = std::result::Result<T, VoxlineError>;

impl VoxlineError {
    pub(crate) fn parse(offset: usize, message: impl Into<String>) -> Self {
        VoxlineError::Parse {
            offset,
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for VoxlineError {
    fn from(e: serde_json::Error) -> Self {
        VoxlineError::Format(format!("JSON error: {}", e))
    }
}
