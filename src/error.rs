// src/error.rs

//! Unified error handling for the search service.

use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error (bad board URL, bad config value)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Query validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Provider answered with a non-2xx status
    #[error("{context} responded {status}")]
    Fetch { context: String, status: u16 },

    /// Unexpected failure inside the pipeline
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a fetch error carrying the upstream HTTP status.
    pub fn fetch(context: impl Into<String>, status: u16) -> Self {
        Self::Fetch {
            context: context.into(),
            status,
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Whether the error was caused by caller input and should surface as a 4xx.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Validation(_))
    }

    /// HTTP status code for the search interface.
    pub fn status_code(&self) -> u16 {
        if self.is_client_error() { 400 } else { 500 }
    }

    /// Message safe to return to the caller.
    ///
    /// Client errors carry their own message; everything else is generic.
    pub fn public_message(&self) -> String {
        match self {
            Self::Config(message) | Self::Validation(message) => message.clone(),
            _ => "Internal error".to_string(),
        }
    }
}
