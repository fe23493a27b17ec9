//! Error types for the data layer.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for repository and client operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Error type for backend requests and repository operations.
#[derive(Debug, Error)]
pub enum DataError {
    /// The request could not be sent or the response body not read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A row or response body did not have the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A request path could not be joined onto the backend URL.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// The API key cannot be sent as a header.
    #[error("invalid header value: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),

    /// The backend answered with a non-2xx status.
    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },

    /// No visible row matched the id.
    #[error("no row with id '{id}' in '{table}'")]
    NotFound { table: &'static str, id: String },

    /// An upload file could not be read from disk.
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DataError {
    /// Returns true for `NotFound` and for 404 answers.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DataError::NotFound { .. } | DataError::Status { status: 404, .. }
        )
    }
}

/// Error type for loading `BackendConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// An environment override could not be parsed.
    #[error("invalid value '{value}' for {key}")]
    InvalidOverride { key: &'static str, value: String },

    #[error("missing required setting '{0}'")]
    Missing(&'static str),
}
