use core::result::Result as CoreResult;
use std::io::Error as IoError;

use reqwest::Error as ReqwestError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;
use toml::de::Error as TomlError;

/// Result type for core operations.
pub type Result<T> = CoreResult<T, Error>;

/// Errors that can occur in the docjury workspace.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// An HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] ReqwestError),

    /// JSON serialization or deserialization failed.
    #[error("JSON serialization error: {0}")]
    Json(#[from] SerdeJsonError),

    /// TOML deserialization failed.
    #[error("TOML deserialization error: {0}")]
    Toml(#[from] TomlError),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A model backend encountered an error.
    #[error("Backend error: {0}")]
    Backend(String),

    /// Required API key was not found.
    #[error("API key not found: {0}")]
    MissingApiKey(String),

    /// Model backend returned a response that could not be interpreted.
    #[error("Invalid response from backend: {0}")]
    InvalidResponse(String),

    /// The uploaded document has an extension outside the allow-list.
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// Text extraction from the document failed.
    #[error("Extraction failed: {0}")]
    Extraction(String),

    /// A general error not covered by other variants.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Determines whether this error may succeed if retried.
    ///
    /// Returns `true` for transient errors like network failures or backend errors.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Backend(_))
    }
}
