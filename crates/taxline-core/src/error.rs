//! Error types for the taxline-core library.
//!
//! Only the I/O-adjacent edges (configuration and catalog files) produce
//! hard errors. The engine itself reports business mismatches as data:
//! correction flags on resolutions and issue lists from the validator.

use thiserror::Error;

/// Main error type for the taxline library.
#[derive(Error, Debug)]
pub enum TaxlineError {
    /// Configuration file could not be loaded or is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Tax catalog document could not be loaded or is malformed.
    #[error("catalog error: {0}")]
    Catalog(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for the taxline library.
pub type Result<T> = std::result::Result<T, TaxlineError>;
