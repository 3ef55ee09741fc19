//! Catalog store
//!
//! Holds the fetched catalog, the loading flag and the filter controls for
//! one page activation.
//!
//! # Loading
//! - `load` fetches at most once per store; later calls are skipped
//! - `reload` always fetches; only the most recently initiated fetch may
//!   apply its result, older responses are discarded as stale
//! - a successful fetch replaces `items` wholesale
//! - a failed fetch leaves `items` untouched and goes to the diagnostic sink
//! - after `teardown` no fetch result is applied
//! - dropping a `load` future mid-fetch clears `loading` and lets the next
//!   `load` fetch again, unless a newer fetch has started meanwhile

use crate::diagnostics::DiagnosticSink;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::{AbortHandle, JoinHandle};
use vle_catalog::{visible, CatalogFilter, Category, LearningPath, PathId};
use vle_client::{ApiError, LearningApi};

/// Which catalog a store fetches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogSource {
    /// `GET /learning/paths`
    LearningPaths,
    /// `GET /roadmaps`
    Roadmaps,
}

impl CatalogSource {
    /// Fetch the full catalog from `api`
    ///
    /// # Errors
    /// Propagates the API failure unchanged.
    pub async fn fetch(self, api: &dyn LearningApi) -> Result<Vec<LearningPath>, ApiError> {
        match self {
            Self::LearningPaths => api.learning_paths().await,
            Self::Roadmaps => api.roadmaps().await,
        }
    }

    /// Diagnostic context of a failed fetch
    #[inline]
    #[must_use]
    pub fn failure_context(self) -> &'static str {
        match self {
            Self::LearningPaths => "Failed to fetch learning paths",
            Self::Roadmaps => "Failed to fetch roadmaps",
        }
    }
}

/// Catalog contents and filter controls
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogState {
    /// Entries in server order
    pub items: Vec<LearningPath>,
    /// While true, `items` is not authoritative
    pub loading: bool,
    /// Active category and search text
    pub filter: CatalogFilter,
}

impl CatalogState {
    /// Entries passing the filter, in server order
    #[must_use]
    pub fn visible(&self) -> Vec<LearningPath> {
        visible(&self.items, &self.filter)
    }
}

impl Default for CatalogState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: true,
            filter: CatalogFilter::default(),
        }
    }
}

/// Result of a load attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Items replaced
    Loaded {
        /// Number of entries received
        count: usize,
    },
    /// Fetch failed; items unchanged
    Failed,
    /// A load already ran for this store
    Skipped,
    /// A newer load was initiated meanwhile; result discarded
    Stale,
    /// Store torn down; result discarded
    Cancelled,
}

#[derive(Debug, Default)]
struct Guarded {
    state: CatalogState,
    generation: u64,
    started: bool,
    torn_down: bool,
    tasks: Vec<AbortHandle>,
}

struct StoreInner {
    api: Arc<dyn LearningApi>,
    sink: Arc<dyn DiagnosticSink>,
    source: CatalogSource,
    guarded: Mutex<Guarded>,
}

/// Catalog store for one page activation
///
/// Cloning shares the same state.
#[derive(Clone)]
pub struct CatalogStore {
    inner: Arc<StoreInner>,
}

impl CatalogStore {
    /// Create an empty store in the loading state
    #[must_use]
    pub fn new(
        source: CatalogSource,
        api: Arc<dyn LearningApi>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                api,
                sink,
                source,
                guarded: Mutex::new(Guarded::default()),
            }),
        }
    }

    /// Catalog this store fetches
    #[inline]
    #[must_use]
    pub fn source(&self) -> CatalogSource {
        self.inner.source
    }

    /// Fetch the catalog unless a load already ran
    pub async fn load(&self) -> LoadOutcome {
        self.run(true).await
    }

    /// Fetch the catalog again, superseding any load in flight
    pub async fn reload(&self) -> LoadOutcome {
        self.run(false).await
    }

    /// Run [`load`](Self::load) as a task that [`teardown`](Self::teardown) aborts
    ///
    /// # Panics
    /// Panics when called outside a Tokio runtime.
    pub fn spawn_load(&self) -> JoinHandle<LoadOutcome> {
        let store = self.clone();
        let task = tokio::spawn(async move { store.load().await });

        let mut guarded = self.inner.guarded.lock();
        if guarded.torn_down {
            task.abort();
        } else {
            guarded.tasks.retain(|handle| !handle.is_finished());
            guarded.tasks.push(task.abort_handle());
        }
        task
    }

    async fn run(&self, once: bool) -> LoadOutcome {
        let source = self.inner.source;
        let generation = {
            let mut guarded = self.inner.guarded.lock();
            if guarded.torn_down {
                return LoadOutcome::Cancelled;
            }
            if once && guarded.started {
                return LoadOutcome::Skipped;
            }
            guarded.started = true;
            guarded.state.loading = true;
            guarded.generation += 1;
            guarded.generation
        };

        let mut pending = PendingLoad {
            inner: &*self.inner,
            generation,
            settled: false,
        };
        tracing::debug!(?source, generation, "catalog fetch started");
        let result = source.fetch(self.inner.api.as_ref()).await;
        pending.settled = true;

        let mut guarded = self.inner.guarded.lock();
        if guarded.torn_down {
            tracing::debug!(?source, generation, "store torn down; dropping response");
            return LoadOutcome::Cancelled;
        }
        if guarded.generation != generation {
            tracing::debug!(?source, generation, latest = guarded.generation, "stale response");
            return LoadOutcome::Stale;
        }

        guarded.state.loading = false;
        match result {
            Ok(items) => {
                let count = items.len();
                guarded.state.items = items;
                tracing::info!(?source, count, "catalog loaded");
                LoadOutcome::Loaded { count }
            }
            Err(err) => {
                drop(guarded);
                self.inner.sink.report(source.failure_context(), &err);
                LoadOutcome::Failed
            }
        }
    }

    /// Stop applying fetch results and abort spawned loads
    pub fn teardown(&self) {
        let mut guarded = self.inner.guarded.lock();
        guarded.torn_down = true;
        for task in guarded.tasks.drain(..) {
            task.abort();
        }
    }

    /// Whether [`teardown`](Self::teardown) ran
    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.inner.guarded.lock().torn_down
    }

    /// Select the active category
    pub fn set_category(&self, category: impl Into<Category>) {
        self.inner.guarded.lock().state.filter.category = category.into();
    }

    /// Replace the search text
    pub fn set_search(&self, search: impl Into<String>) {
        self.inner.guarded.lock().state.filter.search = search.into();
    }

    /// Current filter controls
    #[must_use]
    pub fn filter(&self) -> CatalogFilter {
        self.inner.guarded.lock().state.filter.clone()
    }

    /// Whether a fetch is outstanding or none completed yet
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.inner.guarded.lock().state.loading
    }

    /// All resident entries in server order
    #[must_use]
    pub fn items(&self) -> Vec<LearningPath> {
        self.inner.guarded.lock().state.items.clone()
    }

    /// Whether `id` is currently listed
    #[must_use]
    pub fn contains(&self, id: PathId) -> bool {
        self.inner
            .guarded
            .lock()
            .state
            .items
            .iter()
            .any(|path| path.id == id)
    }

    /// Resident entries passing the filter
    #[must_use]
    pub fn visible(&self) -> Vec<LearningPath> {
        self.inner.guarded.lock().state.visible()
    }

    /// Copy of the whole state
    #[must_use]
    pub fn snapshot(&self) -> CatalogState {
        self.inner.guarded.lock().state.clone()
    }
}

/// Rolls back the loading state of a fetch whose future was dropped
struct PendingLoad<'a> {
    inner: &'a StoreInner,
    generation: u64,
    settled: bool,
}

impl Drop for PendingLoad<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut guarded = self.inner.guarded.lock();
        if guarded.torn_down || guarded.generation != self.generation {
            return;
        }
        guarded.state.loading = false;
        guarded.started = false;
        tracing::debug!(generation = self.generation, "catalog fetch dropped before completion");
    }
}

impl std::fmt::Debug for CatalogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let guarded = self.inner.guarded.lock();
        f.debug_struct("CatalogStore")
            .field("source", &self.inner.source)
            .field("items", &guarded.state.items.len())
            .field("loading", &guarded.state.loading)
            .field("torn_down", &guarded.torn_down)
            .finish_non_exhaustive()
    }
}
