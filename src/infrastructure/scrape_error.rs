//! Error types for fetching, decoding, parsing and storing listing data
//!
//! None of these abort a run on their own: callers log them and skip the
//! affected unit (one year, one entry, one block, one brand file).

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Failed to build HTTP client: {message}")]
    ClientBuild { message: String },

    #[error("HTTP request failed: {url} - {message}")]
    Transport {
        url: String,
        message: String,
        /// Connect/timeout failures are worth another attempt, builder errors are not
        retryable: bool,
    },

    #[error("HTTP request failed with status {status}: {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Failed to decode JSON from {url}: {message}")]
    JsonDecode { url: String, message: String },

    #[error("Required field '{field}' not found in HTML")]
    RequiredFieldMissing {
        field: String,
        context: Option<String>,
    },

    #[error("Invalid CSS selector: {selector} - {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("URL resolution failed: {url} - {reason}")]
    UrlResolution { url: String, reason: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize data: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ScrapeError {
    pub fn required_field_missing(field: &str, context: Option<&str>) -> Self {
        Self::RequiredFieldMissing {
            field: field.to_string(),
            context: context.map(ToString::to_string),
        }
    }

    pub fn invalid_selector(selector: &str, reason: impl ToString) -> Self {
        Self::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether another attempt of the same request could succeed
    pub fn is_retryable(&self, retry_statuses: &[u16]) -> bool {
        match self {
            Self::Transport { retryable, .. } => *retryable,
            Self::HttpStatus { status, .. } => retry_statuses.contains(status),
            _ => false,
        }
    }
}

pub type ScrapeResult<T> = Result<T, ScrapeError>;
