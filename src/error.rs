// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ResolverError>;

#[derive(Error, Debug)]
pub enum ResolverError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Lookup failed for keyword '{keyword}': {message}")]
    Lookup { keyword: String, message: String },

    #[error("Catalog error in {path}: {message}")]
    Catalog { path: PathBuf, message: String },

    #[error("Text recognition failed: {0}")]
    Recognition(String),

    #[error("Playback failed: {0}")]
    Playback(String),

    #[error("Malformed video URL '{url}': {reason}")]
    MalformedUrl { url: String, reason: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ResolverError {
    pub fn lookup(keyword: &str, message: impl Into<String>) -> Self {
        Self::Lookup {
            keyword: keyword.to_string(),
            message: message.into(),
        }
    }
}
