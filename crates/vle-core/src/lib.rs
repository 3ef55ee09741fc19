//! VLE Core - catalog view-model for the learning front-end
//!
//! Ties the catalog, client and notification crates into page-level
//! behavior:
//! - Loads a catalog once per page activation and filters it locally
//! - Gates enrollment on auth presence and redirects to login
//! - Surfaces enroll failures as timed error notifications
//! - Tears everything down when the page goes away
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vle_core::{CatalogPage, PageContext, TracingSink, VleConfig};
//! use vle_client::HttpLearningApi;
//!
//! # async fn example(navigator: Arc<dyn vle_core::Navigator>) -> anyhow::Result<()> {
//! let config = VleConfig::load(None)?;
//! let auth = Arc::new(config.token_store());
//! let api = HttpLearningApi::new(&config.api)?.with_auth(auth.clone());
//! let ctx = PageContext::new(Arc::new(api), auth, navigator, Arc::new(TracingSink));
//!
//! let page = CatalogPage::explore(ctx, config.notifications);
//! page.mount().await?;
//! page.set_category("Web Development");
//! println!("{} entries", page.view().entries.len());
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod config;
pub mod diagnostics;
pub mod enrollment;
pub mod error;
pub mod navigation;
pub mod page;
pub mod store;
pub mod telemetry;

#[cfg(test)]
mod mocks;

// Re-exports for convenience
pub use config::{AuthConfig, LoggingConfig, Profile, VleConfig};
pub use diagnostics::{DiagnosticSink, TracingSink};
pub use enrollment::{EnrollOutcome, EnrollmentGate, ENROLL_FAILURE_CONTEXT};
pub use error::{ConfigError, VleError};
pub use navigation::{Navigator, Route};
pub use page::{CatalogPage, CatalogView, PageContext, ALL_ROADMAPS_LABEL, ENROLL_FAILED_MESSAGE};
pub use store::{CatalogSource, CatalogState, CatalogStore, LoadOutcome};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
