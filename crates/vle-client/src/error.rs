//! Error types for the client layer
//!
//! - `ApiError`: a request to the learning API failed
//! - `StorageError`: the local token store could not be read or written

use std::path::PathBuf;

/// Learning API request failure
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Connection, timeout or body transfer failure
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("{path} returned status {status}")]
    Status {
        /// Endpoint path
        path: String,
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// Response body did not match the expected shape
    #[error("invalid response from {path}: {source}")]
    Decode {
        /// Endpoint path
        path: String,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// Non-success status error with an empty body
    #[must_use]
    pub fn status(path: impl Into<String>, status: u16) -> Self {
        Self::Status {
            path: path.into(),
            status,
            body: String::new(),
        }
    }

    /// HTTP status, when the server answered
    #[inline]
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|s| s.as_u16()),
            Self::Decode { .. } => None,
        }
    }

    /// Check if a manual retry may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(err) => err.is_timeout() || err.is_connect(),
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Decode { .. } => false,
        }
    }
}

/// Token store failure
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// File system failure
    #[error("storage I/O error at {path}: {source}")]
    Io {
        /// Store file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Store file is not a JSON object
    #[error("corrupt storage file {path}: {source}")]
    Corrupt {
        /// Store file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },
}
