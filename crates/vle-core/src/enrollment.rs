//! Enrollment gate
//!
//! Auth presence is checked synchronously before anything else. An
//! anonymous caller is sent to the login page and no request is made.
//! The gate does not check that the path is listed; callers only expose
//! enroll actions for listed entries.
//!
//! A gate bound to a page lifecycle with [`EnrollmentGate::with_liveness`]
//! performs no side effect once that page is gone, including after an
//! enroll request that was in flight at teardown.

use crate::diagnostics::DiagnosticSink;
use crate::navigation::{Navigator, Route};
use std::sync::Arc;
use vle_catalog::PathId;
use vle_client::{ApiError, AuthProvider, LearningApi};

/// Diagnostic context of a failed enrollment
pub const ENROLL_FAILURE_CONTEXT: &str = "Failed to enroll";

/// Result of an enroll attempt
#[derive(Debug)]
pub enum EnrollOutcome {
    /// No auth marker; sent to the login page
    RedirectedToLogin,
    /// Enrolled and sent to the learning view
    Enrolled {
        /// Enrolled path
        path_id: PathId,
    },
    /// The request failed; no navigation happened
    Failed {
        /// Requested path
        path_id: PathId,
        /// Why the request failed
        error: ApiError,
    },
    /// The owning page was torn down; no navigation happened
    Cancelled {
        /// Requested path
        path_id: PathId,
    },
}

impl EnrollOutcome {
    /// Whether enrollment went through
    #[inline]
    #[must_use]
    pub fn is_enrolled(&self) -> bool {
        matches!(self, Self::Enrolled { .. })
    }

    /// Whether the request failed
    #[inline]
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Whether the attempt was dropped by teardown
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// Auth-gated enrollment
#[derive(Clone)]
pub struct EnrollmentGate {
    api: Arc<dyn LearningApi>,
    auth: Arc<dyn AuthProvider>,
    navigator: Arc<dyn Navigator>,
    sink: Arc<dyn DiagnosticSink>,
    liveness: Option<Arc<dyn Fn() -> bool + Send + Sync>>,
}

impl EnrollmentGate {
    /// Create a gate over the given capabilities
    #[must_use]
    pub fn new(
        api: Arc<dyn LearningApi>,
        auth: Arc<dyn AuthProvider>,
        navigator: Arc<dyn Navigator>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            api,
            auth,
            navigator,
            sink,
            liveness: None,
        }
    }

    /// Skip every side effect once `alive` returns `false`
    #[must_use]
    pub fn with_liveness(mut self, alive: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.liveness = Some(Arc::new(alive));
        self
    }

    fn is_live(&self) -> bool {
        self.liveness.as_ref().map_or(true, |alive| alive())
    }

    /// Enroll in `path_id`, or redirect to login when signed out
    pub async fn enroll(&self, path_id: PathId) -> EnrollOutcome {
        if !self.is_live() {
            tracing::debug!(%path_id, "enroll requested after teardown; ignoring");
            return EnrollOutcome::Cancelled { path_id };
        }
        if !self.auth.is_authenticated() {
            tracing::info!(%path_id, "enroll requested while signed out; redirecting to login");
            self.navigator.navigate(Route::Login);
            return EnrollOutcome::RedirectedToLogin;
        }

        let result = self.api.enroll(path_id).await;
        if !self.is_live() {
            tracing::debug!(%path_id, "torn down during enroll; dropping response");
            return EnrollOutcome::Cancelled { path_id };
        }

        match result {
            Ok(()) => {
                tracing::info!(%path_id, "enrolled");
                self.navigator.navigate(Route::Learning { path_id });
                EnrollOutcome::Enrolled { path_id }
            }
            Err(error) => {
                self.sink.report(ENROLL_FAILURE_CONTEXT, &error);
                EnrollOutcome::Failed { path_id, error }
            }
        }
    }
}

impl std::fmt::Debug for EnrollmentGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnrollmentGate")
            .field("authenticated", &self.auth.is_authenticated())
            .finish_non_exhaustive()
    }
}
