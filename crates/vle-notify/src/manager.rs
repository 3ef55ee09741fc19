//! Notification manager
//!
//! Owns the active set of notifications and drives each one through
//! `visible -> fading -> removed`:
//! - `show` inserts a visible notification and arms its dwell timer
//! - the dwell timer, or an explicit `dismiss`, starts the fade
//! - the exit timer removes the notification from the active set
//!
//! Every notification owns its own timers. Dismissal cancels the dwell
//! timer, and each transition is guarded on the current phase, so removal
//! happens exactly once.

use crate::timer::TimerHandle;
use crate::types::{
    Notification, NotificationId, NotificationKind, NotificationPhase, NotificationStats,
    NotificationTimings,
};
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

#[derive(Debug)]
struct Entry {
    notification: Notification,
    phase: NotificationPhase,
    dwell: Option<TimerHandle>,
    exit: Option<TimerHandle>,
}

impl Entry {
    fn cancel_timers(&mut self) {
        if let Some(timer) = self.dwell.take() {
            timer.cancel();
        }
        if let Some(timer) = self.exit.take() {
            timer.cancel();
        }
    }
}

#[derive(Debug)]
struct Shared {
    entries: IndexMap<NotificationId, Entry>,
    stats: NotificationStats,
    updates: watch::Sender<Vec<Notification>>,
    closed: bool,
}

impl Shared {
    fn snapshot(&self) -> Vec<Notification> {
        self.entries
            .values()
            .map(|entry| entry.notification.clone())
            .collect()
    }

    fn publish(&self) {
        self.updates.send_replace(self.snapshot());
    }
}

#[derive(Debug, Clone, Copy)]
enum FadeCause {
    Expired,
    Dismissed,
}

/// Owner of the active notification set
///
/// Dropping the manager cancels every outstanding timer.
#[derive(Debug)]
pub struct NotificationManager {
    shared: Arc<Mutex<Shared>>,
    timings: NotificationTimings,
}

impl NotificationManager {
    /// Create a manager with the given dwell and exit delays
    #[must_use]
    pub fn new(timings: NotificationTimings) -> Self {
        let (updates, _) = watch::channel(Vec::new());
        Self {
            shared: Arc::new(Mutex::new(Shared {
                entries: IndexMap::new(),
                stats: NotificationStats::default(),
                updates,
                closed: false,
            })),
            timings,
        }
    }

    /// Show a new notification
    ///
    /// Every call yields an independent notification with its own timers.
    /// After [`shutdown`](Self::shutdown) the id is still returned but
    /// nothing is shown.
    ///
    /// # Panics
    /// Panics when called outside a Tokio runtime.
    pub fn show(&self, message: impl Into<String>, kind: NotificationKind) -> NotificationId {
        let notification = Notification::new(message, kind);
        let id = notification.id;

        let mut shared = self.shared.lock();
        if shared.closed {
            tracing::warn!(%id, "notification host shut down; dropping notification");
            return id;
        }

        let weak = Arc::downgrade(&self.shared);
        let exit = self.timings.exit();
        let dwell = TimerHandle::after(self.timings.dwell(), move || {
            if let Some(shared) = weak.upgrade() {
                on_dwell_elapsed(&shared, id, exit);
            }
        });

        shared.entries.insert(
            id,
            Entry {
                notification,
                phase: NotificationPhase::Visible,
                dwell: Some(dwell),
                exit: None,
            },
        );
        shared.stats.shown += 1;
        shared.publish();

        tracing::debug!(%id, ?kind, "notification shown");
        id
    }

    /// Show a success notification
    #[inline]
    pub fn success(&self, message: impl Into<String>) -> NotificationId {
        self.show(message, NotificationKind::Success)
    }

    /// Show an error notification
    #[inline]
    pub fn error(&self, message: impl Into<String>) -> NotificationId {
        self.show(message, NotificationKind::Error)
    }

    /// Dismiss a visible notification
    ///
    /// Starts the fade immediately and cancels the dwell timer. Returns
    /// `false` when the notification is unknown or already fading.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        let mut shared = self.shared.lock();
        let faded = begin_fade(
            &self.shared,
            &mut shared,
            id,
            FadeCause::Dismissed,
            self.timings.exit(),
        );
        if faded {
            tracing::debug!(%id, "notification dismissed");
        }
        faded
    }

    /// Cancel every timer and clear the active set
    ///
    /// Idempotent. Later `show` calls are ignored.
    pub fn shutdown(&self) {
        let mut shared = self.shared.lock();
        if shared.closed {
            return;
        }
        shared.closed = true;
        for entry in shared.entries.values_mut() {
            entry.cancel_timers();
        }
        shared.entries.clear();
        shared.publish();
    }

    /// Active notifications in creation order
    #[must_use]
    pub fn active(&self) -> Vec<Notification> {
        self.shared.lock().snapshot()
    }

    /// Look up an active notification
    #[must_use]
    pub fn get(&self, id: NotificationId) -> Option<Notification> {
        self.shared
            .lock()
            .entries
            .get(&id)
            .map(|entry| entry.notification.clone())
    }

    /// Phase of an active notification, `None` once removed
    #[must_use]
    pub fn phase(&self, id: NotificationId) -> Option<NotificationPhase> {
        self.shared.lock().entries.get(&id).map(|entry| entry.phase)
    }

    /// Number of active notifications
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.lock().entries.len()
    }

    /// Whether no notification is active
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lifetime counters
    #[must_use]
    pub fn stats(&self) -> NotificationStats {
        self.shared.lock().stats
    }

    /// Receive a snapshot of the active set after every change
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<Notification>> {
        self.shared.lock().updates.subscribe()
    }

    /// Configured delays
    #[inline]
    #[must_use]
    pub fn timings(&self) -> NotificationTimings {
        self.timings
    }
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new(NotificationTimings::default())
    }
}

impl Drop for NotificationManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn on_dwell_elapsed(handle: &Arc<Mutex<Shared>>, id: NotificationId, exit: Duration) {
    let mut shared = handle.lock();
    shared.stats.dwell_fired += 1;
    if begin_fade(handle, &mut shared, id, FadeCause::Expired, exit) {
        tracing::debug!(%id, "notification expired");
    }
}

fn on_exit_elapsed(handle: &Arc<Mutex<Shared>>, id: NotificationId) {
    let mut shared = handle.lock();
    let fading = shared
        .entries
        .get(&id)
        .is_some_and(|entry| entry.phase == NotificationPhase::Fading);
    if !fading {
        return;
    }
    shared.entries.shift_remove(&id);
    shared.stats.removed += 1;
    shared.publish();
    tracing::debug!(%id, "notification removed");
}

/// Move a visible notification to `Fading` and arm its exit timer
fn begin_fade(
    handle: &Arc<Mutex<Shared>>,
    shared: &mut Shared,
    id: NotificationId,
    cause: FadeCause,
    exit: Duration,
) -> bool {
    let Some(entry) = shared.entries.get_mut(&id) else {
        return false;
    };
    if entry.phase != NotificationPhase::Visible {
        return false;
    }

    entry.phase = NotificationPhase::Fading;
    entry.notification.visible = false;
    if let Some(dwell) = entry.dwell.take() {
        if matches!(cause, FadeCause::Dismissed) {
            dwell.cancel();
        }
    }

    let weak = Arc::downgrade(handle);
    entry.exit = Some(TimerHandle::after(exit, move || {
        if let Some(shared) = weak.upgrade() {
            on_exit_elapsed(&shared, id);
        }
    }));

    match cause {
        FadeCause::Expired => shared.stats.expired += 1,
        FadeCause::Dismissed => shared.stats.dismissed += 1,
    }
    shared.publish();
    true
}
