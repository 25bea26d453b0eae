//! Error types for the scheduling board client

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),
}

/// Local preference storage errors
#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("Preference store IO error: {0}")]
    IoError(String),

    #[error("Preference data corrupted: {0}")]
    Corrupted(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Preference error: {0}")]
    Preference(#[from] PreferenceError),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Server responded with {code}: {body}")]
    Status { code: u16, body: String },

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("No schedule data uploaded yet")]
    NoData,
}

impl Error {
    /// Server-provided text for inline status lines, falling back to the error message
    pub fn server_text(&self) -> String {
        match self {
            Error::Status { body, .. } if !body.trim().is_empty() => body.trim().to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
