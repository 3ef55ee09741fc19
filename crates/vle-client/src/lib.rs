//! VLE Client - the learning API contract and auth presence
//!
//! Provides:
//! - The `LearningApi` trait the view-model calls through
//! - `HttpLearningApi`, its `reqwest` implementation
//! - `AuthProvider` and the file-backed `TokenStore`

#![warn(unreachable_pub)]

pub mod api;
pub mod auth;
pub mod error;
pub mod http;

pub use api::{EnrollRequest, LearningApi, ENROLL_ENDPOINT, PATHS_ENDPOINT, ROADMAPS_ENDPOINT};
pub use auth::{AuthProvider, StaticToken, TokenStore, DEFAULT_TOKEN_KEY};
pub use error::{ApiError, StorageError};
pub use http::{ApiConfig, HttpLearningApi, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
