//! Catalog page view-model
//!
//! One `CatalogPage` per page activation. It owns the catalog store, the
//! enrollment gate and the notification host, and ties their lifetimes
//! together: `unmount` (or dropping the page) stops fetch results from
//! being applied, aborts spawned work and cancels every toast timer.

use crate::diagnostics::DiagnosticSink;
use crate::enrollment::{EnrollOutcome, EnrollmentGate};
use crate::navigation::{Navigator, Route};
use crate::store::{CatalogSource, CatalogStore, LoadOutcome};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use tokio::task::{AbortHandle, JoinHandle};
use vle_catalog::{derive_chips, explore_presets, CatalogFilter, CategoryChip, LearningPath, PathId};
use vle_client::{AuthProvider, LearningApi};
use vle_notify::{NotificationManager, NotificationTimings};

/// Message shown when an enroll request fails
pub const ENROLL_FAILED_MESSAGE: &str = "Failed to enroll. Please try again.";
/// Label of the catch-all chip on the roadmaps page
pub const ALL_ROADMAPS_LABEL: &str = "All Roadmaps";

/// Capabilities a page is built from
#[derive(Clone)]
pub struct PageContext {
    /// Learning API
    pub api: Arc<dyn LearningApi>,
    /// Auth presence
    pub auth: Arc<dyn AuthProvider>,
    /// Navigation side effects
    pub navigator: Arc<dyn Navigator>,
    /// Where absorbed failures go
    pub sink: Arc<dyn DiagnosticSink>,
}

impl PageContext {
    /// Bundle capabilities
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
        }
    }
}

impl std::fmt::Debug for PageContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageContext").finish_non_exhaustive()
    }
}

/// What a renderer needs to draw the catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogView {
    /// Show placeholders instead of entries
    pub loading: bool,
    /// Entries passing the filter, in server order
    pub entries: Vec<LearningPath>,
    /// Category chips
    pub categories: Vec<CategoryChip>,
    /// Active filter controls
    pub filter: CatalogFilter,
    /// Loaded and nothing matches
    pub is_empty: bool,
}

/// View-model of a catalog page
pub struct CatalogPage {
    store: CatalogStore,
    gate: EnrollmentGate,
    navigator: Arc<dyn Navigator>,
    notifications: Arc<NotificationManager>,
    tasks: Mutex<Vec<AbortHandle>>,
}

impl CatalogPage {
    /// Create a page over `source`
    #[must_use]
    pub fn new(source: CatalogSource, ctx: PageContext, timings: NotificationTimings) -> Self {
        let store = CatalogStore::new(source, Arc::clone(&ctx.api), Arc::clone(&ctx.sink));
        let live = store.clone();
        let gate = EnrollmentGate::new(
            ctx.api,
            ctx.auth,
            Arc::clone(&ctx.navigator),
            ctx.sink,
        )
        .with_liveness(move || !live.is_torn_down());
        Self {
            store,
            gate,
            navigator: ctx.navigator,
            notifications: Arc::new(NotificationManager::new(timings)),
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Explore page: learning paths with the preset category chips
    #[must_use]
    pub fn explore(ctx: PageContext, timings: NotificationTimings) -> Self {
        Self::new(CatalogSource::LearningPaths, ctx, timings)
    }

    /// Roadmaps page: roadmaps with chips derived from the data
    #[must_use]
    pub fn roadmaps(ctx: PageContext, timings: NotificationTimings) -> Self {
        Self::new(CatalogSource::Roadmaps, ctx, timings)
    }

    /// Start the one catalog load of this activation
    ///
    /// # Panics
    /// Panics when called outside a Tokio runtime.
    pub fn mount(&self) -> JoinHandle<LoadOutcome> {
        self.store.spawn_load()
    }

    /// Select the active category
    pub fn set_category(&self, category: &str) {
        self.store.set_category(category);
    }

    /// Replace the search text
    pub fn set_search(&self, search: impl Into<String>) {
        self.store.set_search(search);
    }

    /// Category chips for this page
    #[must_use]
    pub fn categories(&self) -> Vec<CategoryChip> {
        match self.store.source() {
            CatalogSource::LearningPaths => explore_presets(),
            CatalogSource::Roadmaps => derive_chips(&self.store.items(), ALL_ROADMAPS_LABEL),
        }
    }

    /// Current render snapshot
    #[must_use]
    pub fn view(&self) -> CatalogView {
        let state = self.store.snapshot();
        let entries = state.visible();
        CatalogView {
            loading: state.loading,
            is_empty: !state.loading && entries.is_empty(),
            entries,
            categories: self.categories(),
            filter: state.filter,
        }
    }

    /// Enroll in `path_id`; failures surface as an error notification
    ///
    /// After [`unmount`](Self::unmount) this returns
    /// [`EnrollOutcome::Cancelled`] without a request, and a response that
    /// lands after teardown neither navigates nor notifies.
    pub async fn enroll(&self, path_id: PathId) -> EnrollOutcome {
        enroll_and_notify(&self.gate, &self.notifications, path_id).await
    }

    /// Run [`enroll`](Self::enroll) as a task that [`unmount`](Self::unmount) aborts
    ///
    /// # Panics
    /// Panics when called outside a Tokio runtime.
    pub fn spawn_enroll(&self, path_id: PathId) -> JoinHandle<EnrollOutcome> {
        let gate = self.gate.clone();
        let notifications = Arc::clone(&self.notifications);
        let task =
            tokio::spawn(async move { enroll_and_notify(&gate, &notifications, path_id).await });

        // unmount flags teardown before draining, so the check is stable under this lock
        let mut tasks = self.tasks.lock();
        if self.store.is_torn_down() {
            task.abort();
        } else {
            tasks.retain(|handle| !handle.is_finished());
            tasks.push(task.abort_handle());
        }
        drop(tasks);
        task
    }

    /// Open a roadmap's detail page
    pub fn open_roadmap(&self, id: PathId) {
        self.navigator.navigate(Route::Roadmap { id });
    }

    /// Catalog store of this page
    #[inline]
    #[must_use]
    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    /// Notification host of this page
    #[inline]
    #[must_use]
    pub fn notifications(&self) -> &NotificationManager {
        &self.notifications
    }

    /// Tear the page down; idempotent
    pub fn unmount(&self) {
        if !self.store.is_torn_down() {
            tracing::debug!(source = ?self.store.source(), "unmounting catalog page");
        }
        self.store.teardown();
        for task in self.tasks.lock().drain(..) {
            task.abort();
        }
        self.notifications.shutdown();
    }
}

impl Drop for CatalogPage {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl std::fmt::Debug for CatalogPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogPage")
            .field("store", &self.store)
            .field("notifications", &self.notifications.len())
            .finish_non_exhaustive()
    }
}

async fn enroll_and_notify(
    gate: &EnrollmentGate,
    notifications: &NotificationManager,
    path_id: PathId,
) -> EnrollOutcome {
    let outcome = gate.enroll(path_id).await;
    if outcome.is_failed() {
        notifications.error(ENROLL_FAILED_MESSAGE);
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{path, MockApi, RecordingNavigator, RecordingSink};
    use vle_catalog::Category;
    use vle_client::{ApiError, StaticToken};
    use vle_notify::NotificationKind;

    fn build(
        source: CatalogSource,
        api: MockApi,
        auth: StaticToken,
    ) -> (CatalogPage, Arc<RecordingNavigator>) {
        let navigator = Arc::new(RecordingNavigator::default());
        let ctx = PageContext::new(
            Arc::new(api),
            Arc::new(auth),
            Arc::clone(&navigator) as Arc<dyn Navigator>,
            Arc::new(RecordingSink::default()),
        );
        (
            CatalogPage::new(source, ctx, NotificationTimings::default()),
            navigator,
        )
    }

    #[tokio::test]
    async fn mount_loads_once_and_view_reflects_it() {
        let mut api = MockApi::new();
        api.expect_learning_paths()
            .times(1)
            .returning(|| Ok(vec![path(1, "Web Development"), path(2, "AI & Data")]));
        let (page, _) = build(CatalogSource::LearningPaths, api, StaticToken::anonymous());

        assert!(page.view().loading);
        assert_eq!(page.mount().await.unwrap(), LoadOutcome::Loaded { count: 2 });
        assert_eq!(page.mount().await.unwrap(), LoadOutcome::Skipped);

        let view = page.view();
        assert!(!view.loading);
        assert_eq!(view.entries.len(), 2);
        assert_eq!(view.categories, explore_presets());
        assert!(!view.is_empty);
    }

    #[tokio::test]
    async fn empty_match_is_flagged_only_after_load() {
        let mut api = MockApi::new();
        api.expect_roadmaps()
            .returning(|| Ok(vec![path(1, "Web Development")]));
        let (page, _) = build(CatalogSource::Roadmaps, api, StaticToken::anonymous());

        page.set_category("Infrastructure");
        assert!(!page.view().is_empty);

        page.mount().await.unwrap();
        let view = page.view();
        assert!(view.is_empty);
        assert_eq!(view.filter.category, Category::from("Infrastructure"));
    }

    #[tokio::test]
    async fn roadmap_chips_are_derived() {
        let mut api = MockApi::new();
        api.expect_roadmaps().returning(|| {
            Ok(vec![
                path(1, "Web Development"),
                path(2, "AI & Data"),
                path(3, "Web Development"),
            ])
        });
        let (page, navigator) = build(CatalogSource::Roadmaps, api, StaticToken::anonymous());
        page.mount().await.unwrap();

        let labels: Vec<String> = page.categories().into_iter().map(|c| c.label).collect();
        assert_eq!(labels, ["All Roadmaps", "Web Development", "AI & Data"]);

        page.open_roadmap(PathId(2));
        assert_eq!(navigator.routes(), vec![Route::Roadmap { id: PathId(2) }]);
    }

    #[tokio::test(start_paused = true)]
    async fn enroll_failure_shows_error_toast() {
        let mut api = MockApi::new();
        api.expect_enroll()
            .returning(|_| Err(ApiError::status("/learning/enroll", 500)));
        let (page, navigator) = build(CatalogSource::LearningPaths, api, StaticToken::new("t"));

        let outcome = page.enroll(PathId(1)).await;
        assert!(outcome.is_failed());
        assert!(navigator.routes().is_empty());

        let active = page.notifications().active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].kind, NotificationKind::Error);
        assert_eq!(active[0].message, ENROLL_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn redirect_is_not_a_failure() {
        let mut api = MockApi::new();
        api.expect_enroll().times(0);
        let (page, navigator) = build(CatalogSource::LearningPaths, api, StaticToken::anonymous());

        let outcome = page.enroll(PathId(1)).await;
        assert!(matches!(outcome, EnrollOutcome::RedirectedToLogin));
        assert_eq!(navigator.routes(), vec![Route::Login]);
        assert!(page.notifications().is_empty());
    }

    #[tokio::test]
    async fn finished_enroll_tasks_are_pruned() {
        let mut api = MockApi::new();
        api.expect_enroll().times(3).returning(|_| Ok(()));
        let (page, _) = build(CatalogSource::LearningPaths, api, StaticToken::new("t"));

        for id in 1..=2 {
            assert!(page.spawn_enroll(PathId(id)).await.unwrap().is_enrolled());
        }
        let last = page.spawn_enroll(PathId(3));
        assert_eq!(page.tasks.lock().len(), 1);
        assert!(last.await.unwrap().is_enrolled());
    }

    #[tokio::test]
    async fn enroll_after_unmount_is_cancelled() {
        let mut api = MockApi::new();
        api.expect_enroll().times(0);
        let (page, navigator) = build(CatalogSource::LearningPaths, api, StaticToken::new("t"));

        page.unmount();
        let outcome = page.enroll(PathId(1)).await;
        assert!(outcome.is_cancelled());
        assert!(navigator.routes().is_empty());
        assert!(page.notifications().is_empty());
    }

    #[tokio::test]
    async fn unmount_shuts_everything_down() {
        let mut api = MockApi::new();
        api.expect_learning_paths().times(0);
        api.expect_enroll().times(0);
        let (page, _) = build(CatalogSource::LearningPaths, api, StaticToken::new("t"));

        page.unmount();
        page.unmount();

        assert!(page.mount().await.unwrap_err().is_cancelled());
        assert!(page.spawn_enroll(PathId(1)).await.unwrap_err().is_cancelled());
        page.notifications().success("ignored");
        assert!(page.notifications().is_empty());
    }
}
