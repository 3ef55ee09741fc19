//! Diagnostic sink
//!
//! Fire-and-forget reporting of absorbed failures.

use std::error::Error;

/// Receiver of `(context, error)` reports
pub trait DiagnosticSink: Send + Sync {
    /// Report an absorbed failure
    fn report(&self, context: &str, error: &(dyn Error + 'static));
}

/// Sink emitting `tracing` error events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, context: &str, error: &(dyn Error + 'static)) {
        match error.source() {
            Some(cause) => {
                tracing::error!(context, error = %error, cause = %cause, "operation failed");
            }
            None => tracing::error!(context, error = %error, "operation failed"),
        }
    }
}
