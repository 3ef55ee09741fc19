//! Catalog records as served by the learning API
//!
//! Records are read-only on the client: they are deserialized from the
//! server response, filtered and displayed, never mutated.

use serde::{Deserialize, Serialize};

/// Glyph shown for entries that carry no icon of their own
pub const DEFAULT_ICON: &str = "🎓";

/// Stable identifier of a learning path or roadmap
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathId(pub i64);

impl PathId {
    /// Raw integer value
    #[inline]
    #[must_use]
    pub fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for PathId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for PathId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PathId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Difficulty tier of a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Entry level
    Beginner,
    /// Some prior experience expected
    Intermediate,
    /// Deep prior experience expected
    Advanced,
    /// Any tier the client does not know about
    #[serde(other)]
    Unspecified,
}

impl Difficulty {
    /// Wire name of the tier
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Unspecified => "unspecified",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A career-oriented learning path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningPath {
    /// Unique, stable id
    pub id: PathId,
    /// Display name
    pub name: String,
    /// Free-text description
    pub description: String,
    /// Category label, matched exactly by the category filter
    pub category: String,
    /// Difficulty tier
    pub difficulty: Difficulty,
    /// Estimated effort in hours
    pub estimated_hours: f64,
    /// Optional icon glyph
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl LearningPath {
    /// Create a path with no icon
    #[must_use]
    pub fn new(
        id: impl Into<PathId>,
        name: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        difficulty: Difficulty,
        estimated_hours: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            category: category.into(),
            difficulty,
            estimated_hours,
            icon: None,
        }
    }

    /// With icon
    #[inline]
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Icon to display, falling back to [`DEFAULT_ICON`]
    #[inline]
    #[must_use]
    pub fn display_icon(&self) -> &str {
        self.icon.as_deref().unwrap_or(DEFAULT_ICON)
    }
}

/// Roadmaps share the learning path record shape
pub type Roadmap = LearningPath;

/// Envelope of `GET /roadmaps`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapsResponse {
    /// Roadmaps in server order
    pub roadmaps: Vec<Roadmap>,
}
