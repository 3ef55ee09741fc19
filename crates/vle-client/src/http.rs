//! `reqwest` implementation of [`LearningApi`]

use crate::api::{EnrollRequest, LearningApi, ENROLL_ENDPOINT, PATHS_ENDPOINT, ROADMAPS_ENDPOINT};
use crate::auth::AuthProvider;
use crate::error::ApiError;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use vle_catalog::{LearningPath, PathId, Roadmap, RoadmapsResponse};

/// Default API origin
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
/// Default per-request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the learning API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Origin the endpoint paths are appended to
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// With base URL
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Request timeout
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// HTTP client for the learning API
///
/// Sends `Authorization: Bearer <token>` whenever the auth provider holds a
/// token.
#[derive(Clone)]
pub struct HttpLearningApi {
    client: Client,
    base_url: String,
    auth: Option<Arc<dyn AuthProvider>>,
}

impl HttpLearningApi {
    /// Build a client from config
    ///
    /// # Errors
    /// Returns `ApiError::Transport` if the underlying client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth: None,
        })
    }

    /// Attach an auth provider
    #[must_use]
    pub fn with_auth(mut self, auth: Arc<dyn AuthProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Origin requests go to
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.auth.as_ref().and_then(|auth| auth.token()) {
            Some(token) if !token.is_empty() => request.bearer_auth(token),
            _ => request,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        tracing::debug!(path, "GET");
        let response = self.authorize(self.client.get(self.url(path))).send().await?;
        let response = ensure_success(path, response).await?;
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| ApiError::Decode {
            path: path.to_string(),
            source,
        })
    }
}

impl std::fmt::Debug for HttpLearningApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpLearningApi")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.auth.is_some())
            .finish_non_exhaustive()
    }
}

async fn ensure_success(path: &str, response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        path: path.to_string(),
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl LearningApi for HttpLearningApi {
    async fn learning_paths(&self) -> Result<Vec<LearningPath>, ApiError> {
        self.get_json(PATHS_ENDPOINT).await
    }

    async fn roadmaps(&self) -> Result<Vec<Roadmap>, ApiError> {
        let envelope: RoadmapsResponse = self.get_json(ROADMAPS_ENDPOINT).await?;
        Ok(envelope.roadmaps)
    }

    async fn enroll(&self, path_id: PathId) -> Result<(), ApiError> {
        tracing::debug!(path = ENROLL_ENDPOINT, %path_id, "POST");
        let request = self
            .client
            .post(self.url(ENROLL_ENDPOINT))
            .json(&EnrollRequest { path_id });
        let response = self.authorize(request).send().await?;
        ensure_success(ENROLL_ENDPOINT, response).await?;
        Ok(())
    }
}
