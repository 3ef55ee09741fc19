//! Outbound navigation side effects

use vle_catalog::PathId;

/// Destination of a navigation side effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Sign-in page
    Login,
    /// Learning view scoped to a path
    Learning {
        /// Path being learned
        path_id: PathId,
    },
    /// Detail page of a roadmap
    Roadmap {
        /// Roadmap to open
        id: PathId,
    },
}

impl Route {
    /// Location string of the destination
    #[must_use]
    pub fn href(&self) -> String {
        match self {
            Self::Login => "/login".to_string(),
            Self::Learning { path_id } => format!("/learning?path={path_id}"),
            Self::Roadmap { id } => format!("/roadmaps/{id}"),
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.href())
    }
}

/// Performs navigation
pub trait Navigator: Send + Sync {
    /// Navigate to `route`
    fn navigate(&self, route: Route);
}
