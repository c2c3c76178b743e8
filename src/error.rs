//! Error types for Journeyscope
//!
//! This module defines the error taxonomy used by the data-access layer and
//! the views, using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Journeyscope operations
///
/// Service calls fail with [`JourneyError::DataUnavailable`] for any
/// transport, HTTP, parse or `success: false` failure, and with
/// [`JourneyError::NotFound`] when the service answers well-formed but
/// reports that nothing exists (for example a missing recording).
#[derive(Error, Debug)]
pub enum JourneyError {
    /// Network, HTTP status, body parsing or `success: false` failures
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    /// Well-formed response indicating absence
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Session state file errors
    #[error("Session error: {0}")]
    Session(String),

    /// Navigation path could not be mapped to a view
    #[error("Invalid route: {0}")]
    Route(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl JourneyError {
    /// Returns true when the error is the well-formed "nothing here" answer
    pub fn is_not_found(&self) -> bool {
        matches!(self, JourneyError::NotFound(_))
    }
}

/// Result type alias for Journeyscope operations
///
/// Uses `anyhow::Error` so callers can attach context; typed variants are
/// recovered with [`error_kind`].
pub type Result<T> = anyhow::Result<T>;

/// Look up the [`JourneyError`] carried by an `anyhow::Error`, if any
pub fn error_kind(err: &anyhow::Error) -> Option<&JourneyError> {
    err.downcast_ref::<JourneyError>()
}
