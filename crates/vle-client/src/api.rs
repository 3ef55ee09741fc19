//! Learning API contract
//!
//! The shape the front-end core depends on, nothing more:
//! - `GET /learning/paths` returns the learning paths
//! - `GET /roadmaps` returns `{ roadmaps: [...] }`
//! - `POST /learning/enroll` with `{ pathId }` succeeds or fails

use crate::error::ApiError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use vle_catalog::{LearningPath, PathId, Roadmap};

/// Learning paths endpoint
pub const PATHS_ENDPOINT: &str = "/learning/paths";
/// Roadmaps endpoint
pub const ROADMAPS_ENDPOINT: &str = "/roadmaps";
/// Enrollment endpoint
pub const ENROLL_ENDPOINT: &str = "/learning/enroll";

/// Body of `POST /learning/enroll`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollRequest {
    /// Path to enroll in
    #[serde(rename = "pathId")]
    pub path_id: PathId,
}

/// Remote learning service
#[async_trait]
pub trait LearningApi: Send + Sync {
    /// Fetch all learning paths in server order
    async fn learning_paths(&self) -> Result<Vec<LearningPath>, ApiError>;

    /// Fetch all roadmaps in server order
    async fn roadmaps(&self) -> Result<Vec<Roadmap>, ApiError>;

    /// Enroll the current user in a path
    async fn enroll(&self, path_id: PathId) -> Result<(), ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enroll_request_uses_camel_case_key() {
        let body = serde_json::to_value(EnrollRequest { path_id: PathId(7) }).unwrap();
        assert_eq!(body, serde_json::json!({ "pathId": 7 }));
    }
}
