//! Error types for VLE Core
//!
//! Errors never escape the view-model's async boundaries: fetch and enroll
//! failures are reported to the diagnostic sink and folded into outcome
//! enums. These types cover the outer surfaces:
//! - Configuration loading and validation
//! - Telemetry setup
//! - Client and token store failures surfaced by the CLI

use std::path::PathBuf;
use vle_client::{ApiError, StorageError};

/// Main VLE error type
#[derive(Debug, thiserror::Error)]
pub enum VleError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Learning API error
    #[error("api error: {0}")]
    Api(#[from] ApiError),

    /// Token store error
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Subscriber installation failed
    #[error("telemetry error: {0}")]
    Telemetry(String),
}

impl VleError {
    /// Check if error is retryable
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Api(err) if err.is_retryable())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("cannot read {path}: {source}")]
    Io {
        /// Config file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("invalid value for {field}: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

impl ConfigError {
    /// Create an invalid-value error
    #[inline]
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
