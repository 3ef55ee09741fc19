//! Test doubles for unit tests

use crate::diagnostics::DiagnosticSink;
use crate::navigation::{Navigator, Route};
use parking_lot::Mutex;
use vle_catalog::{Difficulty, LearningPath, PathId, Roadmap};
use vle_client::{ApiError, LearningApi};

mockall::mock! {
    pub Api {}

    #[async_trait::async_trait]
    impl LearningApi for Api {
        async fn learning_paths(&self) -> Result<Vec<LearningPath>, ApiError>;
        async fn roadmaps(&self) -> Result<Vec<Roadmap>, ApiError>;
        async fn enroll(&self, path_id: PathId) -> Result<(), ApiError>;
    }
}

pub(crate) fn path(id: i64, category: &str) -> LearningPath {
    LearningPath::new(
        id,
        format!("Path {id}"),
        format!("Track number {id}"),
        category,
        Difficulty::Beginner,
        10.0,
    )
}

#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    reports: Mutex<Vec<(String, String)>>,
}

impl RecordingSink {
    pub(crate) fn reports(&self) -> Vec<(String, String)> {
        self.reports.lock().clone()
    }
}

impl DiagnosticSink for RecordingSink {
    fn report(&self, context: &str, error: &(dyn std::error::Error + 'static)) {
        self.reports
            .lock()
            .push((context.to_string(), error.to_string()));
    }
}

#[derive(Debug, Default)]
pub(crate) struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub(crate) fn routes(&self) -> Vec<Route> {
        self.routes.lock().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().push(route);
    }
}
