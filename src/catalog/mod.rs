//! Catalog pipeline module
//!
//! Turns free-text channel posts into categorized catalog entries and
//! keeps the catalog within its retention window.

pub mod classifier;
pub mod parser;
pub mod pruner;

pub use classifier::CategoryClassifier;
pub use parser::{ParsedPost, PostParser};
pub use pruner::CatalogPruner;
