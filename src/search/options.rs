//! Search configuration
//!
//! [`MatchOptions`] carries every knob with documented defaults and
//! deserializes from partial documents. [`SearchOverrides`] holds the subset
//! a single `Searcher::search` call may change; it is merged field by field
//! over the constructor-level options.

use crate::algorithms::normalize::NormalizeOptions;
use crate::algorithms::sellers::{Alignment, CostModel};
use serde::{Deserialize, Serialize};

/// Default minimum score for a candidate to be returned
pub const DEFAULT_THRESHOLD: f64 = 0.6;

/// Result ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    /// Descending score, then closest key length, then insertion order
    #[default]
    BestMatch,
    /// Insertion order of the surviving items
    InsertOrder,
}

/// Keys produced for one item by a key selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySet {
    Single(String),
    /// Alternate keys; earlier keys win score ties
    Multiple(Vec<String>),
}

impl KeySet {
    /// Iterate the keys in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let keys: &[String] = match self {
            KeySet::Single(key) => std::slice::from_ref(key),
            KeySet::Multiple(keys) => keys,
        };
        keys.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        match self {
            KeySet::Single(_) => 1,
            KeySet::Multiple(keys) => keys.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<String> for KeySet {
    fn from(key: String) -> Self {
        KeySet::Single(key)
    }
}

impl From<&str> for KeySet {
    fn from(key: &str) -> Self {
        KeySet::Single(key.to_owned())
    }
}

impl From<Vec<String>> for KeySet {
    fn from(keys: Vec<String>) -> Self {
        KeySet::Multiple(keys)
    }
}

impl From<Vec<&str>> for KeySet {
    fn from(keys: Vec<&str>) -> Self {
        KeySet::Multiple(keys.into_iter().map(str::to_owned).collect())
    }
}

/// Full matching configuration.
///
/// # Example
///
/// ```rust
/// use fastfuzzy::{MatchOptions, SortBy};
///
/// let options = MatchOptions::default()
///     .with_threshold(0.8)
///     .with_ignore_case(false)
///     .with_sort_by(SortBy::InsertOrder);
/// assert_eq!(options.threshold, 0.8);
/// assert!(options.use_damerau);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    /// Minimum score in `[0, 1]`; values outside the range are accepted
    pub threshold: f64,
    pub ignore_case: bool,
    pub ignore_symbols: bool,
    pub normalize_whitespace: bool,
    /// Count adjacent transpositions as a single edit
    pub use_damerau: bool,
    /// Match against the best substring instead of the whole candidate
    pub use_sellers: bool,
    /// Compare code points rather than grapheme clusters
    pub use_separated_unicode: bool,
    pub return_match_data: bool,
    pub sort_by: SortBy,
    /// Deepest trie level the batch search will visit
    pub max_recursions: Option<usize>,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            ignore_case: true,
            ignore_symbols: true,
            normalize_whitespace: true,
            use_damerau: true,
            use_sellers: true,
            use_separated_unicode: false,
            return_match_data: false,
            sort_by: SortBy::BestMatch,
            max_recursions: None,
        }
    }
}

impl MatchOptions {
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    #[must_use]
    pub fn with_ignore_symbols(mut self, ignore_symbols: bool) -> Self {
        self.ignore_symbols = ignore_symbols;
        self
    }

    #[must_use]
    pub fn with_normalize_whitespace(mut self, normalize_whitespace: bool) -> Self {
        self.normalize_whitespace = normalize_whitespace;
        self
    }

    #[must_use]
    pub fn with_damerau(mut self, use_damerau: bool) -> Self {
        self.use_damerau = use_damerau;
        self
    }

    #[must_use]
    pub fn with_sellers(mut self, use_sellers: bool) -> Self {
        self.use_sellers = use_sellers;
        self
    }

    #[must_use]
    pub fn with_separated_unicode(mut self, use_separated_unicode: bool) -> Self {
        self.use_separated_unicode = use_separated_unicode;
        self
    }

    #[must_use]
    pub fn with_match_data(mut self, return_match_data: bool) -> Self {
        self.return_match_data = return_match_data;
        self
    }

    #[must_use]
    pub fn with_sort_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    #[must_use]
    pub fn with_max_recursions(mut self, max_recursions: usize) -> Self {
        self.max_recursions = Some(max_recursions);
        self
    }

    /// The folding switches used to build keys and queries
    #[inline]
    pub fn normalization(&self) -> NormalizeOptions {
        NormalizeOptions {
            ignore_case: self.ignore_case,
            ignore_symbols: self.ignore_symbols,
            normalize_whitespace: self.normalize_whitespace,
            use_separated_unicode: self.use_separated_unicode,
        }
    }

    #[inline]
    pub fn cost_model(&self) -> CostModel {
        CostModel::from_damerau(self.use_damerau)
    }

    #[inline]
    pub fn alignment(&self) -> Alignment {
        Alignment::from_sellers(self.use_sellers)
    }

    /// Apply per-call overrides; set fields in `overrides` win.
    #[must_use]
    pub fn merged(&self, overrides: &SearchOverrides) -> Self {
        Self {
            threshold: overrides.threshold.unwrap_or(self.threshold),
            use_damerau: overrides.use_damerau.unwrap_or(self.use_damerau),
            use_sellers: overrides.use_sellers.unwrap_or(self.use_sellers),
            return_match_data: overrides
                .return_match_data
                .unwrap_or(self.return_match_data),
            sort_by: overrides.sort_by.unwrap_or(self.sort_by),
            max_recursions: overrides.max_recursions.or(self.max_recursions),
            ..*self
        }
    }
}

/// Per-call overrides for a persistent searcher.
///
/// Normalization switches are absent: the index was built with the
/// constructor-level ones and the query must be folded the same way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOverrides {
    pub threshold: Option<f64>,
    pub use_damerau: Option<bool>,
    pub use_sellers: Option<bool>,
    pub return_match_data: Option<bool>,
    pub sort_by: Option<SortBy>,
    pub max_recursions: Option<usize>,
}

impl SearchOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    #[must_use]
    pub fn damerau(mut self, use_damerau: bool) -> Self {
        self.use_damerau = Some(use_damerau);
        self
    }

    #[must_use]
    pub fn sellers(mut self, use_sellers: bool) -> Self {
        self.use_sellers = Some(use_sellers);
        self
    }

    #[must_use]
    pub fn match_data(mut self, return_match_data: bool) -> Self {
        self.return_match_data = Some(return_match_data);
        self
    }

    #[must_use]
    pub fn sort_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = Some(sort_by);
        self
    }

    #[must_use]
    pub fn max_recursions(mut self, max_recursions: usize) -> Self {
        self.max_recursions = Some(max_recursions);
        self
    }
}
