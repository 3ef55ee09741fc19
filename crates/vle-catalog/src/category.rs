//! Category selection for the catalog filter

use crate::model::LearningPath;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Wire value of the catch-all category
pub const ALL: &str = "all";

/// Active category of the catalog filter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    /// Every category passes
    #[default]
    All,
    /// Only entries whose category equals this label pass
    Named(String),
}

impl Category {
    /// Wire value of the category
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL,
            Self::Named(name) => name,
        }
    }

    /// Check whether a path belongs to this category
    #[inline]
    #[must_use]
    pub fn admits(&self, path: &LearningPath) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => path.category == *name,
        }
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        if value == ALL {
            Self::All
        } else {
            Self::Named(value.to_string())
        }
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        if value == ALL {
            Self::All
        } else {
            Self::Named(value)
        }
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        match value {
            Category::All => ALL.to_string(),
            Category::Named(name) => name,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A selectable category chip
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryChip {
    /// Category the chip selects
    pub category: Category,
    /// Label shown on the chip
    pub label: String,
}

impl CategoryChip {
    fn new(category: Category, label: impl Into<String>) -> Self {
        Self {
            category,
            label: label.into(),
        }
    }
}

/// Fixed chips offered on the explore page
#[must_use]
pub fn explore_presets() -> Vec<CategoryChip> {
    vec![
        CategoryChip::new(Category::All, "All"),
        CategoryChip::new(Category::from("Web Development"), "Web Development"),
        CategoryChip::new(Category::from("AI & Data"), "AI & Data"),
        CategoryChip::new(Category::from("Infrastructure"), "Infrastructure"),
    ]
}

/// Chips derived from the loaded data: `All` first, then each category in
/// first-seen order
#[must_use]
pub fn derive_chips(items: &[LearningPath], all_label: &str) -> Vec<CategoryChip> {
    let seen: IndexSet<&str> = items.iter().map(|p| p.category.as_str()).collect();

    std::iter::once(CategoryChip::new(Category::All, all_label))
        .chain(
            seen.into_iter()
                .map(|name| CategoryChip::new(Category::from(name), name)),
        )
        .collect()
}
