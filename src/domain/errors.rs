//! Domain error types
//!
//! This module defines the error hierarchy for ZOE. Errors are domain-specific and
//! don't expose third-party driver types.

use thiserror::Error;

/// Main ZOE error type
///
/// This is the primary error type used throughout the application.
/// Source failures are absorbed by the extraction coordinator; the rest end the run.
#[derive(Debug, Error)]
pub enum ZoeError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Data source errors (connections, queries, fetches)
    #[error("Data source error: {0}")]
    Source(#[from] SourceError),

    /// Invalid report mode selector
    #[error("Invalid MODE '{0}'. Must be 'NEW' or 'DELTA'")]
    InvalidMode(String),

    /// A mandatory trailer input was not supplied
    #[error("Trailer error: {0} argument is undefined")]
    MissingTrailerInput(&'static str),

    /// Report file assembly errors
    #[error("Report error: {0}")]
    Report(String),
}

/// Data source errors
///
/// Errors that occur when talking to the primary or secondary database.
/// These errors don't expose driver types.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Failed to open a connection
    #[error("Failed to connect to {source_name} source: {message}")]
    ConnectionFailed {
        source_name: String,
        message: String,
    },

    /// Connection pool could not be created or exhausted
    #[error("Connection pool error: {0}")]
    Pool(String),

    /// Statement preparation or execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Paged fetch failed part way through a result set
    #[error("Fetch failed after {rows} rows: {message}")]
    FetchFailed { rows: usize, message: String },

    /// A column value could not be decoded
    #[error("Invalid column value: {0}")]
    InvalidValue(String),
}

// Conversion from toml parse errors
impl From<toml::de::Error> for ZoeError {
    fn from(err: toml::de::Error) -> Self {
        ZoeError::Configuration(format!("TOML parse error: {err}"))
    }
}
