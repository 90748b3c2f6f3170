//! Indexing structures for batch fuzzy search
//!
//! - Trie: arena of normalized key prefixes, so DP columns are computed once per prefix
//! - Thread-safe wrapper: concurrent access to a persistent searcher

pub mod threadsafe;
pub mod trie;

pub use threadsafe::SharedSearcher;
pub use trie::{NodeId, Trie, TrieNode, ROOT};
