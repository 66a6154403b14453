//! Error types for the voxmorph engine

use thiserror::Error;

/// Main error type for the engine
#[derive(Debug, Error)]
pub enum Error {
    /// A shape payload entry could not be turned into a target
    #[error("invalid target at index {index}: {reason}")]
    Validation { index: usize, reason: String },

    /// The payload as a whole has the wrong shape (e.g. not a JSON array)
    #[error("Payload error: {0}")]
    Payload(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Build a validation error for the payload entry at `index`
    pub fn validation(index: usize, reason: impl Into<String>) -> Self {
        Self::Validation {
            index,
            reason: reason.into(),
        }
    }
}
