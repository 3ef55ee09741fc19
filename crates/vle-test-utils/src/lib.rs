//! Testing utilities for VLE workspace
//!
//! Shared fakes, fixtures and recorders for integration tests.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use vle_catalog::{Difficulty, LearningPath, PathId, Roadmap};
use vle_client::{
    ApiError, LearningApi, StaticToken, ENROLL_ENDPOINT, PATHS_ENDPOINT, ROADMAPS_ENDPOINT,
};
use vle_core::{DiagnosticSink, Navigator, PageContext, Route};

/// Scripted reply of one fetch
#[derive(Debug, Clone)]
pub enum Reply {
    Items(Vec<LearningPath>),
    /// Fail with this HTTP status
    Fail(u16),
}

#[derive(Debug)]
struct Scripted {
    delay: Duration,
    reply: Reply,
}

/// In-memory `LearningApi` with call counters and scripted replies
#[derive(Debug, Default)]
pub struct FakeApi {
    paths: Mutex<Vec<LearningPath>>,
    roadmaps: Mutex<Vec<Roadmap>>,
    paths_script: Mutex<VecDeque<Scripted>>,
    roadmaps_script: Mutex<VecDeque<Scripted>>,
    path_calls: AtomicUsize,
    roadmap_calls: AtomicUsize,
    enroll_status: Mutex<Option<u16>>,
    enroll_delay: Mutex<Duration>,
    enrolled: Mutex<Vec<PathId>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Learning paths returned when nothing is scripted
    pub fn with_paths(self, items: Vec<LearningPath>) -> Self {
        *self.paths.lock() = items;
        self
    }

    /// Roadmaps returned when nothing is scripted
    pub fn with_roadmaps(self, items: Vec<Roadmap>) -> Self {
        *self.roadmaps.lock() = items;
        self
    }

    /// Queue the reply of an upcoming learning paths call
    pub fn script_paths(&self, delay: Duration, reply: Reply) {
        self.paths_script
            .lock()
            .push_back(Scripted { delay, reply });
    }

    /// Queue the reply of an upcoming roadmaps call
    pub fn script_roadmaps(&self, delay: Duration, reply: Reply) {
        self.roadmaps_script
            .lock()
            .push_back(Scripted { delay, reply });
    }

    /// Make every enroll call fail with `status`
    pub fn fail_enroll(&self, status: u16) {
        *self.enroll_status.lock() = Some(status);
    }

    /// Delay every enroll call
    pub fn delay_enroll(&self, delay: Duration) {
        *self.enroll_delay.lock() = delay;
    }

    pub fn path_calls(&self) -> usize {
        self.path_calls.load(Ordering::SeqCst)
    }

    pub fn roadmap_calls(&self) -> usize {
        self.roadmap_calls.load(Ordering::SeqCst)
    }

    pub fn enroll_calls(&self) -> usize {
        self.enrolled.lock().len()
    }

    /// Path ids passed to `enroll`, in call order
    pub fn enrolled(&self) -> Vec<PathId> {
        self.enrolled.lock().clone()
    }

    async fn fetch(
        calls: &AtomicUsize,
        script: &Mutex<VecDeque<Scripted>>,
        default: &Mutex<Vec<LearningPath>>,
        endpoint: &str,
    ) -> Result<Vec<LearningPath>, ApiError> {
        calls.fetch_add(1, Ordering::SeqCst);
        // Popped before sleeping so concurrent calls take replies in call order
        let next = script.lock().pop_front();
        let (delay, reply) = match next {
            Some(Scripted { delay, reply }) => (delay, reply),
            None => (Duration::ZERO, Reply::Items(default.lock().clone())),
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match reply {
            Reply::Items(items) => Ok(items),
            Reply::Fail(status) => Err(ApiError::status(endpoint, status)),
        }
    }
}

#[async_trait]
impl LearningApi for FakeApi {
    async fn learning_paths(&self) -> Result<Vec<LearningPath>, ApiError> {
        Self::fetch(&self.path_calls, &self.paths_script, &self.paths, PATHS_ENDPOINT).await
    }

    async fn roadmaps(&self) -> Result<Vec<Roadmap>, ApiError> {
        Self::fetch(
            &self.roadmap_calls,
            &self.roadmaps_script,
            &self.roadmaps,
            ROADMAPS_ENDPOINT,
        )
        .await
    }

    async fn enroll(&self, path_id: PathId) -> Result<(), ApiError> {
        self.enrolled.lock().push(path_id);
        let delay = *self.enroll_delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let status = *self.enroll_status.lock();
        match status {
            Some(status) => Err(ApiError::status(ENROLL_ENDPOINT, status)),
            None => Ok(()),
        }
    }
}

/// Navigator recording every route
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().push(route);
    }
}

/// Sink recording `(context, message)` pairs
#[derive(Debug, Default)]
pub struct RecordingSink {
    reports: Mutex<Vec<(String, String)>>,
}

impl RecordingSink {
    pub fn reports(&self) -> Vec<(String, String)> {
        self.reports.lock().clone()
    }

    pub fn contexts(&self) -> Vec<String> {
        self.reports.lock().iter().map(|(c, _)| c.clone()).collect()
    }
}

impl DiagnosticSink for RecordingSink {
    fn report(&self, context: &str, error: &(dyn std::error::Error + 'static)) {
        self.reports
            .lock()
            .push((context.to_string(), error.to_string()));
    }
}

/// Page capabilities wired to recorders
pub struct Harness {
    pub api: Arc<FakeApi>,
    pub navigator: Arc<RecordingNavigator>,
    pub sink: Arc<RecordingSink>,
    pub ctx: PageContext,
}

/// Build a [`Harness`] around `api`, signed in when `token` is given
pub fn harness(api: FakeApi, token: Option<&str>) -> Harness {
    let api = Arc::new(api);
    let navigator = Arc::new(RecordingNavigator::default());
    let sink = Arc::new(RecordingSink::default());
    let auth = match token {
        Some(token) => StaticToken::new(token),
        None => StaticToken::anonymous(),
    };
    let ctx = PageContext::new(
        Arc::clone(&api) as Arc<dyn LearningApi>,
        Arc::new(auth),
        Arc::clone(&navigator) as Arc<dyn Navigator>,
        Arc::clone(&sink) as Arc<dyn DiagnosticSink>,
    );
    Harness {
        api,
        navigator,
        sink,
        ctx,
    }
}

/// Learning path fixture
pub fn learning_path(id: i64, name: &str, description: &str, category: &str) -> LearningPath {
    LearningPath::new(id, name, description, category, Difficulty::Beginner, 20.0)
}

/// Three paths across two categories
pub fn sample_paths() -> Vec<LearningPath> {
    vec![
        LearningPath::new(
            1,
            "React Basics",
            "Components, props and state",
            "Web Development",
            Difficulty::Beginner,
            12.0,
        ),
        LearningPath::new(
            2,
            "Intro to ML",
            "Regression and classification",
            "AI & Data",
            Difficulty::Intermediate,
            30.0,
        )
        .with_icon("🤖"),
        LearningPath::new(
            3,
            "Advanced CSS",
            "Layouts and animations",
            "Web Development",
            Difficulty::Advanced,
            8.5,
        ),
    ]
}

/// Roadmaps across three categories
pub fn sample_roadmaps() -> Vec<Roadmap> {
    vec![
        learning_path(10, "Frontend", "Browser engineering", "Web Development"),
        learning_path(11, "Data Scientist", "From statistics to models", "AI & Data"),
        learning_path(12, "DevOps", "Pipelines and clusters", "Infrastructure"),
        learning_path(13, "Backend", "APIs and databases", "Web Development"),
    ]
}
