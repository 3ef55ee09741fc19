//! VLE Notify - transient feedback messages
//!
//! A notification is shown, stays visible for a dwell interval (or until the
//! user dismisses it), fades for a short exit delay and is then removed.
//!
//! # Example
//!
//! ```rust,ignore
//! use vle_notify::{NotificationKind, NotificationManager};
//!
//! let toasts = NotificationManager::default();
//! let id = toasts.show("Saved", NotificationKind::Success);
//! toasts.dismiss(id);
//! ```

#![warn(unreachable_pub)]

pub mod manager;
pub mod timer;
pub mod types;

pub use manager::NotificationManager;
pub use timer::TimerHandle;
pub use types::{
    Notification, NotificationId, NotificationKind, NotificationPhase, NotificationStats,
    NotificationTimings, DEFAULT_DWELL_MS, DEFAULT_EXIT_MS,
};
