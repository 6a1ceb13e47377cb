//! Error types for suggestion sources.

use thiserror::Error;

/// Errors that can occur when fetching suggestions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The source could not produce results.
    #[error("Suggestion source unavailable: {0}")]
    Unavailable(String),

    /// The fetch task ended before producing a result.
    #[error("Suggestion fetch was cancelled")]
    Cancelled,
}

/// Result type for suggestion fetches.
pub type Result<T> = std::result::Result<T, FetchError>;

impl FetchError {
    /// Create an unavailable error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        FetchError::Unavailable(msg.into())
    }
}
