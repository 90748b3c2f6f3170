//! Persistent searcher and result types
//!
//! A [`Searcher`] normalizes its candidates and builds the trie once, then
//! answers any number of queries against it. `add` grows the index in
//! place; nothing is ever removed.
//!
//! `Searcher` has no internal locking. `add` takes `&mut self`, so within
//! one owner the borrow checker already serializes growth and search; to
//! share one index across threads use
//! [`SharedSearcher`](crate::indexing::threadsafe::SharedSearcher) or an
//! equivalent external lock.

pub mod engine;
pub mod options;

use crate::algorithms::normalize::normalize_units;
use crate::algorithms::MatchSpan;
use crate::error::{FuzzyError, Result};
use crate::indexing::trie::Trie;
use engine::Candidate;
use options::{KeySet, MatchOptions, SearchOverrides};
use serde::Serialize;

/// Key selector used for string-like items: the item's own text
pub type StrKeys<T> = fn(&T) -> Option<KeySet>;

fn own_text<T: AsRef<str>>(item: &T) -> Option<KeySet> {
    Some(KeySet::Single(item.as_ref().to_owned()))
}

/// A match with its score and where it was found
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchRecord<T> {
    pub item: T,
    /// The raw key text that matched
    pub original: String,
    /// The normalized key, joined
    pub key: String,
    pub score: f64,
    /// Byte span of the match within `original`
    #[serde(rename = "match")]
    pub span: MatchSpan,
}

/// Search results: bare items, or match records when `return_match_data` is set
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SearchOutput<T> {
    Items(Vec<T>),
    Matches(Vec<MatchRecord<T>>),
}

impl<T> SearchOutput<T> {
    pub fn len(&self) -> usize {
        match self {
            SearchOutput::Items(items) => items.len(),
            SearchOutput::Matches(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The matched items in result order, dropping any match data
    pub fn into_items(self) -> Vec<T> {
        match self {
            SearchOutput::Items(items) => items,
            SearchOutput::Matches(records) => records.into_iter().map(|r| r.item).collect(),
        }
    }

    /// The match records, if match data was requested
    pub fn into_matches(self) -> Option<Vec<MatchRecord<T>>> {
        match self {
            SearchOutput::Items(_) => None,
            SearchOutput::Matches(records) => Some(records),
        }
    }
}

/// Reusable fuzzy searcher over a growing candidate set.
///
/// # Example
///
/// ```rust
/// use fastfuzzy::{MatchOptions, Searcher};
///
/// let mut searcher = Searcher::new(["aaa", "aab", "abb"], MatchOptions::default());
/// searcher.add(["bbb"]);
///
/// assert_eq!(searcher.search("aaa").into_items(), vec!["aaa", "aab"]);
/// assert_eq!(searcher.search("bbb").into_items(), vec!["bbb", "abb"]);
/// assert!(searcher.search("ccc").is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Searcher<T, F = StrKeys<T>> {
    items: Vec<T>,
    candidates: Vec<Candidate>,
    trie: Trie,
    options: MatchOptions,
    key_selector: F,
}

impl<T: AsRef<str>> Searcher<T> {
    /// Build a searcher over string-like items, keyed by their own text.
    pub fn new<I>(items: I, options: MatchOptions) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut searcher = Self::empty(options, own_text::<T> as StrKeys<T>);
        searcher.add(items);
        searcher
    }

    /// Add more string-like items.
    pub fn add<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        let items: Vec<T> = items.into_iter().collect();
        let keys = items
            .iter()
            .map(|item| KeySet::Single(item.as_ref().to_owned()))
            .collect();
        self.index(items, keys);
    }
}

impl<T, F> Searcher<T, F>
where
    F: Fn(&T) -> Option<KeySet>,
{
    /// Build a searcher whose keys come from `key_selector`.
    ///
    /// Fails with [`FuzzyError::InvalidKey`] if the selector returns `None`
    /// for any item.
    pub fn with_key_selector<I>(items: I, options: MatchOptions, key_selector: F) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let mut searcher = Self::empty(options, key_selector);
        searcher.try_add(items)?;
        Ok(searcher)
    }

    fn empty(options: MatchOptions, key_selector: F) -> Self {
        Self {
            items: Vec::new(),
            candidates: Vec::new(),
            trie: Trie::new(),
            options,
            key_selector,
        }
    }

    /// Add more items through the key selector.
    ///
    /// The batch is all-or-nothing: on error nothing from it is indexed and
    /// `item_index` is the offender's position within `items`.
    pub fn try_add<I>(&mut self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        let items: Vec<T> = items.into_iter().collect();
        let keys = items
            .iter()
            .enumerate()
            .map(|(item_index, item)| {
                (self.key_selector)(item).ok_or(FuzzyError::InvalidKey { item_index })
            })
            .collect::<Result<Vec<_>>>()?;
        self.index(items, keys);
        Ok(())
    }

    fn index(&mut self, items: Vec<T>, keys: Vec<KeySet>) {
        let first_item = self.items.len();
        let first_candidate = self.candidates.len();
        let added =
            engine::build_candidates(keys, first_item, self.options.normalization());

        for (offset, candidate) in added.iter().enumerate() {
            self.trie
                .insert(&candidate.normalized.units, first_candidate + offset);
        }
        tracing::debug!(
            items = items.len(),
            keys = added.len(),
            trie_depth = self.trie.depth(),
            "indexed search candidates"
        );
        self.items.extend(items);
        self.candidates.extend(added);
    }

    /// Search with the constructor-level options.
    pub fn search(&self, term: &str) -> SearchOutput<T>
    where
        T: Clone,
    {
        self.search_with(term, &SearchOverrides::default())
    }

    /// Search with per-call overrides merged over the constructor options.
    pub fn search_with(&self, term: &str, overrides: &SearchOverrides) -> SearchOutput<T>
    where
        T: Clone,
    {
        let options = self.options.merged(overrides);
        let query = normalize_units(term, self.options.normalization());
        let hits = engine::search_trie(&query, &self.trie, &self.candidates, &options);
        engine::assemble(hits, &self.candidates, &self.items, options.return_match_data)
    }

    /// Number of items added so far
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of keys indexed (an item may contribute several)
    pub fn key_count(&self) -> usize {
        self.candidates.len()
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use options::SortBy;

    #[derive(Debug, Clone, PartialEq)]
    struct Person {
        name: &'static str,
        aliases: Vec<&'static str>,
    }

    fn people() -> Vec<Person> {
        vec![
            Person {
                name: "Robert",
                aliases: vec!["Bob", "Bobby"],
            },
            Person {
                name: "Elizabeth",
                aliases: vec!["Liz", "Beth"],
            },
        ]
    }

    fn person_keys(person: &Person) -> Option<KeySet> {
        let mut keys = vec![person.name.to_owned()];
        keys.extend(person.aliases.iter().map(|a| (*a).to_owned()));
        Some(KeySet::Multiple(keys))
    }

    #[test]
    fn test_searcher_repeated_queries() {
        let searcher = Searcher::new(["aaa", "aab", "abb", "bbb"], MatchOptions::default());
        assert_eq!(searcher.search("aaa").into_items(), vec!["aaa", "aab"]);
        assert_eq!(searcher.search("bbb").into_items(), vec!["bbb", "abb"]);
        assert!(searcher.search("ccc").is_empty());
        assert_eq!(searcher.len(), 4);
    }

    #[test]
    fn test_threshold_override() {
        let searcher = Searcher::new(
            ["aaa", "aab", "abb", "bbb"],
            MatchOptions::default().with_threshold(0.3),
        );
        let loose = searcher.search("aaa").len();
        let strict = searcher
            .search_with("aaa", &SearchOverrides::new().threshold(0.7))
            .len();
        assert!(loose > strict);
    }

    #[test]
    fn test_add_grows_index() {
        let mut searcher = Searcher::new(Vec::<String>::new(), MatchOptions::default());
        assert!(searcher.search("hello").is_empty());
        searcher.add(vec!["hello".to_string(), "world".to_string()]);
        assert_eq!(searcher.search("hello").into_items(), vec!["hello".to_string()]);
        assert_eq!(searcher.key_count(), 2);
    }

    #[test]
    fn test_key_selector_with_aliases() {
        let searcher =
            Searcher::with_key_selector(people(), MatchOptions::default(), person_keys).unwrap();
        assert_eq!(searcher.key_count(), 6);

        let found = searcher.search("liz").into_items();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Elizabeth");

        let records = searcher
            .search_with("bob", &SearchOverrides::new().match_data(true))
            .into_matches()
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].item.name, "Robert");
        assert_eq!(records[0].original, "Bob");
        assert_eq!(records[0].key, "bob");
    }

    #[test]
    fn test_missing_key_is_rejected_atomically() {
        let selector = |item: &&str| -> Option<KeySet> {
            if item.is_empty() {
                None
            } else {
                Some(KeySet::from(*item))
            }
        };
        let mut searcher =
            Searcher::with_key_selector(["first"], MatchOptions::default(), selector).unwrap();

        let err = searcher.try_add(["second", "", "third"]).unwrap_err();
        assert_eq!(err, FuzzyError::InvalidKey { item_index: 1 });
        assert_eq!(searcher.len(), 1);
        assert!(searcher.search("second").is_empty());
    }

    #[test]
    fn test_insert_order_override() {
        let searcher = Searcher::new(["itemize", "items", "item"], MatchOptions::default());
        assert_eq!(
            searcher.search("item").into_items(),
            vec!["item", "items", "itemize"]
        );
        assert_eq!(
            searcher
                .search_with("item", &SearchOverrides::new().sort_by(SortBy::InsertOrder))
                .into_items(),
            vec!["itemize", "items", "item"]
        );
    }

    #[test]
    fn test_long_candidate_builds_searches_and_drops() {
        let long = "x".repeat(200_000);
        let searcher = Searcher::new(
            vec![long.clone(), "y".to_string()],
            MatchOptions::default().with_threshold(0.0),
        );
        let found = searcher.search("x").into_items();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0], long);

        let copy = searcher.clone();
        drop(searcher);
        assert_eq!(copy.search("x").len(), 2);
    }
}
