//! Notification records, phases and timings

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Default time a notification stays visible
pub const DEFAULT_DWELL_MS: u64 = 3000;
/// Default exit transition before removal
pub const DEFAULT_EXIT_MS: u64 = 300;

/// Opaque unique notification identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationId(pub Uuid);

impl NotificationId {
    /// Generate new notification ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NotificationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome a notification reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Action succeeded
    Success,
    /// Action failed
    Error,
}

/// Lifecycle phase of an active notification
///
/// A removed notification has no phase: it is no longer in the active set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPhase {
    /// Shown, dwell timer running
    Visible,
    /// Exit transition running, removal scheduled
    Fading,
}

/// A transient feedback message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique id
    pub id: NotificationId,
    /// Message text
    pub message: String,
    /// Success or error
    pub kind: NotificationKind,
    /// False once the exit transition started
    pub visible: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub(crate) fn new(message: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            id: NotificationId::new(),
            message: message.into(),
            kind,
            visible: true,
            created_at: Utc::now(),
        }
    }
}

/// Dwell and exit delays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationTimings {
    /// Milliseconds a notification stays visible before fading
    pub dwell_ms: u64,
    /// Milliseconds between fading and removal
    pub exit_ms: u64,
}

impl NotificationTimings {
    /// Create timings from millisecond values
    #[inline]
    #[must_use]
    pub fn new(dwell_ms: u64, exit_ms: u64) -> Self {
        Self { dwell_ms, exit_ms }
    }

    /// Dwell interval
    #[inline]
    #[must_use]
    pub fn dwell(&self) -> Duration {
        Duration::from_millis(self.dwell_ms)
    }

    /// Exit delay
    #[inline]
    #[must_use]
    pub fn exit(&self) -> Duration {
        Duration::from_millis(self.exit_ms)
    }
}

impl Default for NotificationTimings {
    fn default() -> Self {
        Self {
            dwell_ms: DEFAULT_DWELL_MS,
            exit_ms: DEFAULT_EXIT_MS,
        }
    }
}

/// Lifetime counters of a manager
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotificationStats {
    /// Notifications created
    pub shown: u64,
    /// Fades started by the dwell timer
    pub expired: u64,
    /// Fades started by explicit dismissal
    pub dismissed: u64,
    /// Notifications dropped from the active set
    pub removed: u64,
    /// Dwell timer callbacks that ran, whether or not they caused a fade
    pub dwell_fired: u64,
}
