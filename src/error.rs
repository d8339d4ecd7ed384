//! Error types for the collaborators and the CLI
//!
//! The generator, parser and classifier are total and never return these.

use thiserror::Error;

/// Result type alias for fallible readmegen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur outside the pure generation pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// Reading or writing a file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A descriptor or API payload was not valid JSON
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The profile lookup request failed
    #[error("Network error: {0}")]
    NetworkError(String),

    /// A configured URL could not be parsed or joined
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::NetworkError(err.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::InvalidUrl(err.to_string())
    }
}
