// src/error.rs

//! Unified error handling for the recall watcher.

use thiserror::Error;

/// Result type alias for watcher operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Transport failure (timeout, DNS, connection reset)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("Remote API returned HTTP {status}")]
    Remote { status: u16 },

    /// The body could not be parsed into the expected envelope
    #[error("Malformed API response: {0}")]
    MalformedResponse(String),

    /// A search was requested without any criteria
    #[error("At least one search criterion (product name, brand, category or keyword) is required")]
    NoCriteria,

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a malformed response error.
    pub fn malformed(message: impl std::fmt::Display) -> Self {
        Self::MalformedResponse(message.to_string())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Classify a failure raised while reading a response.
    ///
    /// A body that cannot be decoded arrived intact from a reachable server,
    /// so it is malformed rather than a transport failure.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::malformed(err)
        } else {
            Self::Network(err)
        }
    }

    /// Whether retrying the same request later could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}
