//! FastFuzzy - substring-aware fuzzy string matching
//!
//! Scores a query against candidate strings with Sellers' variant of the
//! (Damerau-)Levenshtein distance, which measures the query against the
//! best-matching *substring* of each candidate. Batch searches run over a
//! trie of normalized keys that shares DP columns between keys with common
//! prefixes and prunes subtrees that cannot reach the score threshold.
//!
//! # Features
//! - Grapheme-aware normalization with exact byte offsets back into the raw text
//! - Plain or transposition-aware edit costs; substring or whole-string alignment
//! - One-shot [`fuzzy()`] / [`search()`] and a persistent, growable [`Searcher`]
//! - Multi-key items through a typed key selector
//!
//! # Example
//! ```
//! use fastfuzzy::{fuzzy_score, search, MatchOptions};
//!
//! let options = MatchOptions::default();
//! assert_eq!(fuzzy_score("hello", "well, hello there", &options), 1.0);
//!
//! let found = search("item", &["items", "iterator", "itemize", "item", "temperature"], &options);
//! assert_eq!(found.into_items(), vec!["item", "items", "itemize", "iterator", "temperature"]);
//! ```

pub mod algorithms;
pub mod error;
pub mod indexing;
pub mod search;

pub use algorithms::normalize::{NormalizeOptions, NormalizedText};
pub use algorithms::sellers::{Alignment, CostModel, ScoreResult};
pub use algorithms::MatchSpan;
pub use error::{FuzzyError, Result};
pub use indexing::threadsafe::SharedSearcher;
pub use search::options::{KeySet, MatchOptions, SearchOverrides, SortBy};
pub use search::{MatchRecord, SearchOutput, Searcher};

use algorithms::normalize::{normalize, normalize_units};
use algorithms::sellers::{score_only, score_units};
use search::engine;

/// Result of [`fuzzy`]: a bare score, or a full record when
/// `return_match_data` is set.
#[derive(Debug, Clone, PartialEq)]
pub enum FuzzyOutput {
    Score(f64),
    Match(MatchRecord<String>),
}

impl FuzzyOutput {
    /// The score, whichever shape was returned
    pub fn score(&self) -> f64 {
        match self {
            FuzzyOutput::Score(score) => *score,
            FuzzyOutput::Match(record) => record.score,
        }
    }
}

/// Score `term` against a single `candidate`.
///
/// With `return_match_data` the result also carries the normalized key and
/// the byte span of the best match within `candidate`. Without it only a few
/// DP columns are kept, whatever the candidate length.
pub fn fuzzy(term: &str, candidate: &str, options: &MatchOptions) -> FuzzyOutput {
    let normalization = options.normalization();
    let (model, alignment) = (options.cost_model(), options.alignment());
    let query = normalize_units(term, normalization);

    if !options.return_match_data {
        let units = normalize_units(candidate, normalization);
        return FuzzyOutput::Score(score_only(&query, &units, model, alignment));
    }
    let text = normalize(candidate, normalization);
    let result = score_units(&query, &text.units, model, alignment);
    let key = text.key();
    let span = text.denormalize(result.span);
    FuzzyOutput::Match(MatchRecord {
        item: candidate.to_owned(),
        original: text.original,
        key,
        score: result.score,
        span,
    })
}

/// Score `term` against `candidate`, ignoring `return_match_data`.
#[inline]
pub fn fuzzy_score(term: &str, candidate: &str, options: &MatchOptions) -> f64 {
    fuzzy(term, candidate, &options.with_match_data(false)).score()
}

/// One-shot search over string-like candidates.
///
/// Nothing is cached; use a [`Searcher`] to query the same candidates
/// repeatedly.
pub fn search<S>(term: &str, candidates: &[S], options: &MatchOptions) -> SearchOutput<S>
where
    S: AsRef<str> + Clone,
{
    let keys = candidates
        .iter()
        .map(|candidate| KeySet::Single(candidate.as_ref().to_owned()))
        .collect();
    engine::search_once(term, candidates, keys, options)
}

/// One-shot search over arbitrary items keyed by `key_selector`.
///
/// Fails with [`FuzzyError::InvalidKey`] if the selector returns `None` for
/// any item.
pub fn search_by<T, F>(
    term: &str,
    candidates: &[T],
    options: &MatchOptions,
    key_selector: F,
) -> Result<SearchOutput<T>>
where
    T: Clone,
    F: Fn(&T) -> Option<KeySet>,
{
    let keys = candidates
        .iter()
        .enumerate()
        .map(|(item_index, item)| key_selector(item).ok_or(FuzzyError::InvalidKey { item_index }))
        .collect::<Result<Vec<_>>>()?;
    Ok(engine::search_once(term, candidates, keys, options))
}
