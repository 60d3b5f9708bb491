//! Error types for jetcal

use thiserror::Error;

/// jetcal error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Lookup error
    #[error("Lookup error: {0}")]
    Lookup(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
