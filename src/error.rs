//! Error types for caller misuse.
//!
//! Matching itself never fails: empty queries, empty candidates and
//! degenerate thresholds all have defined outcomes. The only failure is a
//! key selector that cannot produce a key for an item.

use thiserror::Error;

/// Errors returned when building or growing a [`crate::Searcher`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FuzzyError {
    /// The key selector produced no key shape for an item.
    ///
    /// `item_index` is the position of the offending item within the batch
    /// handed to the constructor or to `add`.
    #[error("key selector returned no key for item at index {item_index}")]
    InvalidKey { item_index: usize },
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, FuzzyError>;
