//! Error types for Opsbot.
//!
//! This module defines a unified error enum covering the failure categories
//! that can reach the application boundary: configuration, I/O and document
//! extraction errors.
//!
//! Parsing, indexing, search and intent actions are total and do not return
//! errors. Only I/O-facing operations do.

use thiserror::Error;

/// Unified error type for Opsbot.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A file whose format no available extractor can decode
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// An extractor failed to produce text for a supported file
    #[error("Extraction failed: {0}")]
    Extraction(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Whether this error means a single file was skipped rather than the
    /// whole operation failing.
    pub fn is_skippable(&self) -> bool {
        matches!(self, AppError::UnsupportedFormat(_) | AppError::Extraction(_))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
