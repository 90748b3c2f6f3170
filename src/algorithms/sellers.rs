//! Substring-seeking edit distance (Sellers' algorithm)
//!
//! Classic Levenshtein seeds the first DP row with `0..=n`, charging for
//! every candidate unit the query does not cover. Sellers' variant seeds it
//! with zeros instead, so the alignment may start anywhere in the candidate
//! and the minimum of the last row is the distance from the query to the
//! best-matching *substring*. A short query therefore scores perfectly
//! against any candidate containing it verbatim.
//!
//! [`EditMatrix`] stores the matrix column-wise (one column per candidate
//! unit) so that the trie search can extend it one edge at a time and share
//! every prefix column between keys. [`score_only`] runs the same recurrence
//! over three rolling columns when no span is wanted.

use super::normalize::Unit;
use super::{score_from_distance, MatchSpan};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A rolling DP column: `query.len() + 1` cells
type Column = SmallVec<[usize; 32]>;

/// Edit operations that cost one unit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CostModel {
    /// Insert, delete, substitute
    Levenshtein,
    /// Levenshtein plus adjacent transposition (optimal string alignment)
    #[default]
    DamerauLevenshtein,
}

impl CostModel {
    #[inline]
    #[must_use]
    pub fn from_damerau(use_damerau: bool) -> Self {
        if use_damerau {
            Self::DamerauLevenshtein
        } else {
            Self::Levenshtein
        }
    }
}

/// Which part of the candidate the query is aligned against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alignment {
    /// Best contiguous substring; score denominator is the query length
    #[default]
    Substring,
    /// The whole candidate; denominator is the longer of the two lengths
    Whole,
}

impl Alignment {
    #[inline]
    #[must_use]
    pub fn from_sellers(use_sellers: bool) -> Self {
        if use_sellers {
            Self::Substring
        } else {
            Self::Whole
        }
    }
}

/// Score in `[0, 1]` and best span in normalized-unit coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: f64,
    pub span: MatchSpan,
}

impl ScoreResult {
    /// Result for an empty query, which trivially matches anything
    #[inline]
    pub fn trivial() -> Self {
        Self {
            score: 1.0,
            span: MatchSpan::default(),
        }
    }
}

/// The DP recurrence shared by the full matrix and the rolling scorer
#[derive(Debug, Clone, Copy)]
struct Recurrence<'q> {
    query: &'q [Unit],
    model: CostModel,
    alignment: Alignment,
}

impl Recurrence<'_> {
    /// Fill `column` (candidate prefix of length `j`) from the column before
    /// it and, for transpositions, the one before that.
    fn fill(
        &self,
        j: usize,
        unit: &str,
        prev_unit: Option<&str>,
        left: &[usize],
        two_back: Option<&[usize]>,
        column: &mut [usize],
    ) {
        column[0] = match self.alignment {
            Alignment::Substring => 0,
            Alignment::Whole => j,
        };
        for i in 1..column.len() {
            let q = &*self.query[i - 1];
            let cost = usize::from(q != unit);
            let mut cell = (column[i - 1] + 1) // insertion
                .min(left[i] + 1) // deletion
                .min(left[i - 1] + cost); // substitution

            if self.model == CostModel::DamerauLevenshtein && i > 1 {
                if let (Some(prev), Some(two_back)) = (prev_unit, two_back) {
                    if q == prev && &*self.query[i - 2] == unit {
                        cell = cell.min(two_back[i - 2] + 1);
                    }
                }
            }
            column[i] = cell;
        }
    }
}

/// Lowest last-row value seen so far and the first column holding it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Best {
    distance: usize,
    column: usize,
}

/// Column-wise edit matrix for one query.
///
/// Column `j` describes the candidate prefix of length `j`. Columns are
/// packed back to back in one buffer, `query.len() + 1` cells each, and can
/// be overwritten from any `j` up to the number already filled. That is how
/// the trie search reuses the matrix for every root-to-node path.
#[derive(Debug, Clone)]
pub struct EditMatrix<'q> {
    recurrence: Recurrence<'q>,
    cells: Vec<usize>,
    best: Vec<Best>,
}

impl<'q> EditMatrix<'q> {
    #[must_use]
    pub fn new(query: &'q [Unit], model: CostModel, alignment: Alignment) -> Self {
        let m = query.len();
        Self {
            recurrence: Recurrence {
                query,
                model,
                alignment,
            },
            cells: (0..=m).collect(),
            best: vec![Best {
                distance: m,
                column: 0,
            }],
        }
    }

    #[inline]
    pub fn query_len(&self) -> usize {
        self.recurrence.query.len()
    }

    #[inline]
    pub fn alignment(&self) -> Alignment {
        self.recurrence.alignment
    }

    #[inline]
    fn stride(&self) -> usize {
        self.query_len() + 1
    }

    /// Cells of column `j`
    #[inline]
    pub fn column(&self, j: usize) -> &[usize] {
        let stride = self.stride();
        &self.cells[j * stride..(j + 1) * stride]
    }

    /// Compute column `j` for candidate unit `unit` (the `j`-th unit).
    ///
    /// `prev_unit` is the candidate unit before it, needed for transpositions.
    /// Columns after `j` are dropped.
    pub fn set_column(&mut self, j: usize, unit: &str, prev_unit: Option<&str>) {
        let stride = self.stride();
        debug_assert!(
            j >= 1 && j * stride <= self.cells.len(),
            "column {j} out of order"
        );
        self.cells.truncate(j * stride);
        self.cells.resize((j + 1) * stride, 0);

        let (done, column) = self.cells.split_at_mut(j * stride);
        let left = &done[(j - 1) * stride..];
        let two_back = j.checked_sub(2).map(|k| &done[k * stride..(k + 1) * stride]);
        self.recurrence.fill(j, unit, prev_unit, left, two_back, column);

        let last = column[stride - 1];
        let carried = self.best[j - 1];
        // Strict comparison keeps the leftmost minimal column.
        let best = if last < carried.distance {
            Best {
                distance: last,
                column: j,
            }
        } else {
            carried
        };
        self.best.truncate(j);
        self.best.push(best);
    }

    /// Score of the query against the candidate prefix of length `n`.
    #[must_use]
    pub fn score(&self, n: usize) -> ScoreResult {
        let m = self.query_len();
        if m == 0 {
            return ScoreResult::trivial();
        }
        match self.alignment() {
            Alignment::Substring => {
                let best = self.best[n];
                ScoreResult {
                    score: score_from_distance(best.distance, m),
                    span: self.walk_back(best.column),
                }
            }
            Alignment::Whole => ScoreResult {
                score: score_from_distance(self.column(n)[m], m.max(n)),
                span: MatchSpan {
                    index: 0,
                    length: n,
                },
            },
        }
    }

    /// Distance and score denominator no key extending column `j` by
    /// `1..=extra` more units can beat.
    #[must_use]
    pub fn lower_bound(&self, j: usize, extra: usize) -> (usize, usize) {
        let mut bound = reachable_distance(self.column(j), extra);
        // A transposition can step from column j - 1 straight to j + 1.
        if self.recurrence.model == CostModel::DamerauLevenshtein && j >= 1 {
            bound = bound.min(reachable_distance(self.column(j - 1), extra + 1));
        }

        let m = self.query_len();
        match self.alignment() {
            Alignment::Substring => (bound.min(self.best[j].distance), m),
            Alignment::Whole => (bound, m.max(j + extra)),
        }
    }

    /// Walk from the best end column back to where its alignment started.
    fn walk_back(&self, end: usize) -> MatchSpan {
        if end == 0 {
            return MatchSpan::default();
        }
        let mut start = end;
        for i in (1..self.query_len()).rev() {
            if start <= 1 {
                break;
            }
            if self.column(start)[i] >= self.column(start - 1)[i] {
                start -= 1;
            }
        }
        MatchSpan {
            index: start - 1,
            length: end - start + 1,
        }
    }
}

/// Lowest final distance reachable from `column` within `extra` more
/// candidate units: each query unit not yet consumed past `extra` costs one.
#[inline]
#[must_use]
pub fn reachable_distance(column: &[usize], extra: usize) -> usize {
    let m = column.len().saturating_sub(1);
    column
        .iter()
        .enumerate()
        .map(|(i, &cell)| cell + (m - i).saturating_sub(extra))
        .min()
        .unwrap_or(0)
}

/// Whether a subtree whose keys can at best reach `best_distance` may still
/// score at or above `threshold`.
#[inline]
#[must_use]
pub fn subtree_may_match(best_distance: usize, denominator: usize, threshold: f64) -> bool {
    score_from_distance(best_distance, denominator) >= threshold
}

/// Score `query` against a whole candidate sequence, recovering the span.
///
/// Keeps every column for the walk-back; use [`score_only`] when the span
/// is not needed.
///
/// # Example
/// ```
/// use fastfuzzy::algorithms::normalize::Unit;
/// use fastfuzzy::algorithms::sellers::{score_units, Alignment, CostModel};
///
/// let units = |s: &str| s.chars().map(|c| Unit::from(c.to_string())).collect::<Vec<_>>();
/// let result = score_units(&units("abcd"), &units("acbd"), CostModel::DamerauLevenshtein, Alignment::Substring);
/// assert_eq!(result.score, 0.75);
/// ```
#[must_use]
pub fn score_units(
    query: &[Unit],
    candidate: &[Unit],
    model: CostModel,
    alignment: Alignment,
) -> ScoreResult {
    if query.is_empty() {
        return ScoreResult::trivial();
    }
    let mut matrix = EditMatrix::new(query, model, alignment);
    for (j, unit) in candidate.iter().enumerate() {
        let prev = j.checked_sub(1).map(|p| &*candidate[p]);
        matrix.set_column(j + 1, unit, prev);
    }
    matrix.score(candidate.len())
}

/// Score `query` against a whole candidate sequence, without a span.
///
/// Only three columns are alive at a time, so memory stays proportional to
/// the query however long the candidate is.
#[must_use]
pub fn score_only(
    query: &[Unit],
    candidate: &[Unit],
    model: CostModel,
    alignment: Alignment,
) -> f64 {
    let m = query.len();
    if m == 0 {
        return 1.0;
    }
    let recurrence = Recurrence {
        query,
        model,
        alignment,
    };
    let mut two_back = Column::new();
    let mut left: Column = (0..=m).collect();
    let mut column = Column::from_elem(0, m + 1);
    let mut best = m;

    for (index, unit) in candidate.iter().enumerate() {
        let j = index + 1;
        let prev = index.checked_sub(1).map(|p| &*candidate[p]);
        let older = (j >= 2).then_some(&two_back[..]);
        recurrence.fill(j, unit, prev, &left, older, &mut column);
        best = best.min(column[m]);

        // two_back <- left <- column; the stale buffer is reused next round
        std::mem::swap(&mut two_back, &mut left);
        std::mem::swap(&mut left, &mut column);
        column.resize(m + 1, 0);
    }

    match alignment {
        Alignment::Substring => score_from_distance(best, m),
        Alignment::Whole => score_from_distance(left[m], m.max(candidate.len())),
    }
}
