// src/error.rs

//! Unified error handling for the crawler application.

use std::fmt;

use thiserror::Error;

/// Result type alias for crawler operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Network/HTTP failure that survived the transport layer's retries
    #[error("transport error for {url}: {message}")]
    Transport { url: String, message: String },

    /// HTTP client construction or protocol error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Expected page structure (header label, date or number format) not
    /// found or not parseable; continuing would ingest corrupted data
    #[error("layout error in {context}: {message}")]
    Layout { context: String, message: String },

    /// Database failure during upsert, reap or swap
    #[error("persistence error: {0}")]
    Persistence(#[from] sqlx::Error),

    /// Proxy acquisition failure; callers degrade to a direct connection
    #[error("proxy acquisition failed: {0}")]
    Proxy(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Preflight validation error
    #[error("validation error: {0}")]
    Validation(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

impl AppError {
    /// Create a transport error with the request URL as context.
    pub fn transport(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create a layout error with context.
    pub fn layout(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Layout {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a proxy error.
    pub fn proxy(message: impl fmt::Display) -> Self {
        Self::Proxy(message.to_string())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
