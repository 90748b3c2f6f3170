//! Thread-safe wrapper for a persistent searcher.
//!
//! [`Searcher`] does no locking of its own. This wrapper puts it behind a
//! `parking_lot::RwLock` so one index can be shared between threads.
//!
//! # Usage
//!
//! ```
//! use fastfuzzy::{MatchOptions, SharedSearcher};
//!
//! let searcher = SharedSearcher::new(["hello", "help"], MatchOptions::default());
//!
//! let writer = searcher.clone();
//! std::thread::spawn(move || writer.add(["goodbye"])).join().unwrap();
//!
//! assert_eq!(searcher.search("goodbye").into_items(), vec!["goodbye"]);
//! ```
//!
//! # Performance Notes
//!
//! - `search` acquires a shared read lock; searches proceed concurrently
//! - `add` acquires an exclusive write lock and blocks all other access
//!
//! Matching itself stays single-threaded per call.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::error::Result;
use crate::search::options::{KeySet, MatchOptions, SearchOverrides};
use crate::search::{SearchOutput, Searcher, StrKeys};

/// Shared handle to a [`Searcher`] behind a read-write lock.
///
/// Clones share the same index.
pub struct SharedSearcher<T, F = StrKeys<T>> {
    inner: Arc<RwLock<Searcher<T, F>>>,
}

impl<T, F> Clone for SharedSearcher<T, F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: AsRef<str>> SharedSearcher<T> {
    /// Create a shared searcher over string-like items.
    pub fn new<I>(items: I, options: MatchOptions) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self::from_searcher(Searcher::new(items, options))
    }

    /// Add string-like items.
    ///
    /// Acquires an exclusive write lock.
    pub fn add<I>(&self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.inner.write().add(items);
    }
}

impl<T, F> SharedSearcher<T, F>
where
    F: Fn(&T) -> Option<KeySet>,
{
    /// Wrap an existing searcher.
    pub fn from_searcher(searcher: Searcher<T, F>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(searcher)),
        }
    }

    /// Add items through the key selector.
    ///
    /// Acquires an exclusive write lock.
    pub fn try_add<I>(&self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        self.inner.write().try_add(items)
    }

    /// Acquires a shared read lock.
    pub fn search(&self, term: &str) -> SearchOutput<T>
    where
        T: Clone,
    {
        self.inner.read().search(term)
    }

    /// Acquires a shared read lock.
    pub fn search_with(&self, term: &str, overrides: &SearchOverrides) -> SearchOutput<T>
    where
        T: Clone,
    {
        self.inner.read().search_with(term, overrides)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}
