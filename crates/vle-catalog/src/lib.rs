//! VLE Catalog - learning path records and the filter engine
//!
//! Provides:
//! - The read-only catalog records (`LearningPath`, `Roadmap`)
//! - Category selection and category chips
//! - The pure filter engine deriving the visible subset

#![warn(unreachable_pub)]

pub mod category;
pub mod filter;
pub mod model;

pub use category::{derive_chips, explore_presets, Category, CategoryChip, ALL};
pub use filter::{visible, CatalogFilter};
pub use model::{Difficulty, LearningPath, PathId, Roadmap, RoadmapsResponse, DEFAULT_ICON};
