//! Error types for the stock-rnn library

use thiserror::Error;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed search grid or task description; detected before any
    /// training starts and aborts the sweep
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A task or partition has too few samples to train on; the offending
    /// configuration is skipped, the sweep continues
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// A CSV cell could not be read as a number
    #[error("failed to parse value: {0}")]
    Parse(String),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
