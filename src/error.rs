//! Error types for CSV reading and writing

use thiserror::Error;

/// Errors that can occur during CSV operations
#[derive(Error, Debug)]
pub enum CsvError {
    /// Error reading from the underlying stream
    #[error("Read error: {0}")]
    Read(String),

    /// Error writing to the underlying stream
    #[error("Write error: {0}")]
    Write(String),

    /// Invalid configuration detected at the point of the offending call
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for CSV operations
pub type Result<T> = std::result::Result<T, CsvError>;
