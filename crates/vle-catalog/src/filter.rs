//! Filter engine
//!
//! Derives the visible subset of the catalog from the active category and
//! the search text. Pure and deterministic: identical inputs always yield
//! the same ordered output, and the output preserves the order of `items`.

use crate::category::Category;
use crate::model::LearningPath;
use serde::{Deserialize, Serialize};

/// Category and search predicates applied to the catalog
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CatalogFilter {
    /// Active category
    pub category: Category,
    /// Free-text search, matched case-insensitively against name and description
    pub search: String,
}

impl CatalogFilter {
    /// Filter that admits everything
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With category
    #[inline]
    #[must_use]
    pub fn with_category(mut self, category: impl Into<Category>) -> Self {
        self.category = category.into();
        self
    }

    /// With search text
    #[inline]
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Whether this filter admits every item
    #[inline]
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.category == Category::All && self.search.is_empty()
    }

    /// Check a single path against both predicates
    #[must_use]
    pub fn matches(&self, path: &LearningPath) -> bool {
        self.category.admits(path) && matches_search(path, &self.search.to_lowercase())
    }

    /// Apply the filter, preserving the order of `items`
    #[must_use]
    pub fn apply<'a>(&self, items: &'a [LearningPath]) -> Vec<&'a LearningPath> {
        let needle = self.search.to_lowercase();
        items
            .iter()
            .filter(|path| self.category.admits(path) && matches_search(path, &needle))
            .collect()
    }
}

fn matches_search(path: &LearningPath, needle: &str) -> bool {
    needle.is_empty()
        || path.name.to_lowercase().contains(needle)
        || path.description.to_lowercase().contains(needle)
}

/// Apply `filter` to `items` and clone the visible entries
#[must_use]
pub fn visible(items: &[LearningPath], filter: &CatalogFilter) -> Vec<LearningPath> {
    filter.apply(items).into_iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Difficulty, PathId};
    use pretty_assertions::assert_eq;

    fn catalog() -> Vec<LearningPath> {
        vec![
            LearningPath::new(
                1,
                "Frontend Engineer",
                "Build interfaces with React",
                "Web Development",
                Difficulty::Beginner,
                120.0,
            ),
            LearningPath::new(
                2,
                "Machine Learning Engineer",
                "Models, data pipelines and evaluation",
                "AI & Data",
                Difficulty::Advanced,
                300.0,
            ),
            LearningPath::new(
                3,
                "Backend Engineer",
                "APIs, databases and caching",
                "Web Development",
                Difficulty::Intermediate,
                200.0,
            ),
        ]
    }

    fn ids(paths: &[&LearningPath]) -> Vec<PathId> {
        paths.iter().map(|p| p.id).collect()
    }

    #[test]
    fn identity_filter_returns_everything() {
        let items = catalog();
        let filter = CatalogFilter::new();
        assert!(filter.is_identity());
        assert_eq!(ids(&filter.apply(&items)), vec![PathId(1), PathId(2), PathId(3)]);
    }

    #[test]
    fn category_keeps_original_order() {
        let items = catalog();
        let filter = CatalogFilter::new().with_category("Web Development");
        assert_eq!(ids(&filter.apply(&items)), vec![PathId(1), PathId(3)]);
    }

    #[test]
    fn search_is_case_insensitive() {
        let items = catalog();
        let filter = CatalogFilter::new().with_search("MACHINE");
        assert_eq!(ids(&filter.apply(&items)), vec![PathId(2)]);
    }

    #[test]
    fn search_matches_description() {
        let items = catalog();
        let filter = CatalogFilter::new().with_search("databases");
        assert_eq!(ids(&filter.apply(&items)), vec![PathId(3)]);
    }

    #[test]
    fn predicates_intersect() {
        let items = catalog();
        let filter = CatalogFilter::new()
            .with_category("Web Development")
            .with_search("machine");
        assert!(filter.apply(&items).is_empty());

        let filter = CatalogFilter::new()
            .with_category("AI & Data")
            .with_search("engineer");
        assert_eq!(ids(&filter.apply(&items)), vec![PathId(2)]);
    }

    #[test]
    fn unknown_category_yields_nothing() {
        let items = catalog();
        let filter = CatalogFilter::new().with_category("Infrastructure");
        assert!(filter.apply(&items).is_empty());
        assert!(!filter.matches(&items[0]));
    }

    #[test]
    fn visible_clones_entries() {
        let items = catalog();
        let filter = CatalogFilter::new().with_search("backend");
        let out = visible(&items, &filter);
        assert_eq!(out, vec![items[2].clone()]);
    }
}
