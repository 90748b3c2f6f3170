//! Core matching algorithms
//!
//! - `normalize`: folding raw text into comparison units with an offset map
//! - `sellers`: substring-seeking Levenshtein / Damerau-Levenshtein scoring

pub mod normalize;
pub mod sellers;

pub use normalize::{normalize, normalize_units, NormalizeOptions, NormalizedText, Unit};
pub use sellers::{score_only, score_units, Alignment, CostModel, EditMatrix, ScoreResult};

use serde::{Deserialize, Serialize};

/// A `[index, index + length)` span, in normalized units or raw bytes
/// depending on where it came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchSpan {
    pub index: usize,
    pub length: usize,
}

/// Convert an edit distance into a similarity score.
///
/// A zero denominator (empty query and candidate) counts as a perfect match.
#[inline]
#[must_use]
pub fn score_from_distance(distance: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        1.0
    } else {
        1.0 - (distance as f64 / denominator as f64)
    }
}
