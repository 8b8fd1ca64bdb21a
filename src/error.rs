// src/error.rs

//! Unified error handling for the lookup pipeline.

use std::fmt;

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Required configuration missing or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input blob is not a readable table
    #[error("Parse error: {0}")]
    Parse(String),

    /// Storage backend read/write failed
    #[error("Storage error for {blob}: {message}")]
    Storage { blob: String, message: String },

    /// A single lookup failed. Never escapes the enrichment client.
    #[error("Lookup failed for '{query}': {message}")]
    Lookup { query: String, message: String },

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV reading/writing failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

/// Failure taxonomy used when reporting a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ConfigError,
    ParseError,
    StorageError,
    LookupDegradation,
    UnhandledError,
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a parse error.
    pub fn parse(message: impl fmt::Display) -> Self {
        Self::Parse(message.to_string())
    }

    /// Create a storage error for the given blob.
    pub fn storage(blob: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Storage {
            blob: blob.into(),
            message: message.to_string(),
        }
    }

    /// Create a lookup error for the given query.
    pub fn lookup(query: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Lookup {
            query: query.into(),
            message: message.to_string(),
        }
    }

    /// Classify this error into the reporting taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) | Self::Toml(_) | Self::Url(_) => ErrorKind::ConfigError,
            Self::Parse(_) => ErrorKind::ParseError,
            Self::Storage { .. } => ErrorKind::StorageError,
            Self::Lookup { .. } => ErrorKind::LookupDegradation,
            Self::Io(_) | Self::Http(_) | Self::Json(_) | Self::Csv(_) => {
                ErrorKind::UnhandledError
            }
        }
    }
}
