//! Batch scoring: trie traversal, per-item dedup, filtering and ordering
//!
//! Two paths produce identical hits, spans included once match data is
//! requested. [`search_trie`] walks the persistent index, extending one DP
//! column per edge and skipping subtrees whose best reachable score is under
//! the threshold. [`search_list`] scores a plain candidate list pair by
//! pair, which is cheaper for one-shot searches that would otherwise build a
//! trie only to throw it away.

use super::options::{KeySet, MatchOptions, SortBy};
use super::{MatchRecord, SearchOutput};
use crate::algorithms::normalize::{
    normalize, normalize_units, NormalizeOptions, NormalizedText, Unit,
};
use crate::algorithms::sellers::{
    score_only, score_units, subtree_may_match, EditMatrix, ScoreResult,
};
use crate::algorithms::MatchSpan;
use crate::indexing::trie::{NodeId, Trie, ROOT};
use ahash::AHashMap;
use std::cmp::Ordering;
use std::collections::hash_map::Entry;

/// One normalized key of one item
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Position of the owning item in insertion order
    pub item_index: usize,
    /// Position of this key among the item's keys
    pub key_index: usize,
    pub normalized: NormalizedText,
}

/// Normalize every key of every item, numbering items from `first_item`.
pub(crate) fn build_candidates(
    keys: Vec<KeySet>,
    first_item: usize,
    normalization: NormalizeOptions,
) -> Vec<Candidate> {
    let mut candidates = Vec::with_capacity(keys.len());
    for (offset, key_set) in keys.iter().enumerate() {
        for (key_index, key) in key_set.iter().enumerate() {
            candidates.push(Candidate {
                item_index: first_item + offset,
                key_index,
                normalized: normalize(key, normalization),
            });
        }
    }
    candidates
}

/// A scored candidate that passed the threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Hit {
    pub candidate: usize,
    pub item_index: usize,
    pub key_index: usize,
    pub key_len: usize,
    pub score: f64,
    /// Span in normalized units
    pub span: MatchSpan,
}

/// Best hit per item
struct BestHits {
    query_len: usize,
    by_item: AHashMap<usize, Hit>,
}

impl BestHits {
    fn new(query_len: usize) -> Self {
        Self {
            query_len,
            by_item: AHashMap::new(),
        }
    }

    fn offer(&mut self, id: usize, candidate: &Candidate, result: ScoreResult) {
        let hit = Hit {
            candidate: id,
            item_index: candidate.item_index,
            key_index: candidate.key_index,
            key_len: candidate.normalized.len(),
            score: result.score,
            span: result.span,
        };
        match self.by_item.entry(hit.item_index) {
            Entry::Vacant(entry) => {
                entry.insert(hit);
            }
            Entry::Occupied(mut entry) => {
                if key_preference(&hit, entry.get(), self.query_len) == Ordering::Less {
                    entry.insert(hit);
                }
            }
        }
    }

    fn into_sorted(self, sort_by: SortBy) -> Vec<Hit> {
        let query_len = self.query_len;
        let mut hits: Vec<Hit> = self.by_item.into_values().collect();
        match sort_by {
            SortBy::BestMatch => hits.sort_by(|a, b| {
                b.score
                    .total_cmp(&a.score)
                    .then_with(|| {
                        a.key_len
                            .abs_diff(query_len)
                            .cmp(&b.key_len.abs_diff(query_len))
                    })
                    .then_with(|| a.item_index.cmp(&b.item_index))
            }),
            SortBy::InsertOrder => hits.sort_by_key(|hit| hit.item_index),
        }
        hits
    }
}

/// Which of two keys of the same item represents it; `Less` means `a`.
fn key_preference(a: &Hit, b: &Hit, query_len: usize) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.key_index.cmp(&b.key_index))
        .then_with(|| {
            a.key_len
                .abs_diff(query_len)
                .cmp(&b.key_len.abs_diff(query_len))
        })
        .then_with(|| a.candidate.cmp(&b.candidate))
}

/// Counters reported once per trie search
#[derive(Debug, Default, Clone, Copy)]
struct TraversalStats {
    visited: usize,
    pruned: usize,
    truncated: bool,
}

/// A trie node waiting to be visited, with the unit on its incoming edge
/// and the one before it
#[derive(Debug, Clone, Copy)]
struct Frame<'a> {
    node: NodeId,
    depth: usize,
    unit: Option<&'a str>,
    prev_unit: Option<&'a str>,
}

/// Depth-first walk over the trie with an explicit stack.
///
/// A frame's column is computed when it is popped. Everything popped after
/// a node and before its next sibling lies in its subtree, so the columns
/// for the frame's ancestors are still in place at that point.
struct Traversal<'a, 'q> {
    trie: &'a Trie,
    candidates: &'a [Candidate],
    matrix: EditMatrix<'q>,
    threshold: f64,
    max_depth: usize,
    hits: BestHits,
    stats: TraversalStats,
}

impl<'a, 'q> Traversal<'a, 'q> {
    fn new(
        query: &'q [Unit],
        trie: &'a Trie,
        candidates: &'a [Candidate],
        options: &MatchOptions,
    ) -> Self {
        Self {
            trie,
            candidates,
            matrix: EditMatrix::new(query, options.cost_model(), options.alignment()),
            threshold: options.threshold,
            max_depth: options.max_recursions.unwrap_or(usize::MAX),
            hits: BestHits::new(query.len()),
            stats: TraversalStats::default(),
        }
    }

    fn run(&mut self) {
        let trie = self.trie;
        let prune = self.matrix.query_len() > 0;
        let mut stack = vec![Frame {
            node: ROOT,
            depth: 0,
            unit: None,
            prev_unit: None,
        }];

        while let Some(frame) = stack.pop() {
            self.stats.visited += 1;
            if let Some(unit) = frame.unit {
                self.matrix.set_column(frame.depth, unit, frame.prev_unit);
            }

            let node = trie.node(frame.node);
            if !node.candidates().is_empty() {
                let result = self.matrix.score(frame.depth);
                if result.score >= self.threshold {
                    for &id in node.candidates() {
                        self.hits.offer(id, &self.candidates[id], result);
                    }
                }
            }

            if frame.depth >= self.max_depth {
                self.stats.truncated |= node.depth() > 0;
                continue;
            }

            for (child_unit, child) in node.children() {
                if prune {
                    let extra = trie.node(child).depth() + 1;
                    let (bound, denominator) = self.matrix.lower_bound(frame.depth, extra);
                    if !subtree_may_match(bound, denominator, self.threshold) {
                        self.stats.pruned += 1;
                        continue;
                    }
                }
                stack.push(Frame {
                    node: child,
                    depth: frame.depth + 1,
                    unit: Some(&**child_unit),
                    prev_unit: frame.unit,
                });
            }
        }
    }
}

/// Score every key in `trie` against `query`.
pub(crate) fn search_trie(
    query: &[Unit],
    trie: &Trie,
    candidates: &[Candidate],
    options: &MatchOptions,
) -> Vec<Hit> {
    let mut traversal = Traversal::new(query, trie, candidates, options);
    traversal.run();

    let stats = traversal.stats;
    if stats.truncated {
        tracing::warn!(
            max_recursions = traversal.max_depth,
            "trie search stopped at max_recursions; longer keys were not scored"
        );
    }
    let hits = traversal.hits.into_sorted(options.sort_by);
    tracing::debug!(
        visited = stats.visited,
        pruned = stats.pruned,
        matches = hits.len(),
        "trie search finished"
    );
    hits
}

/// Score a flat candidate list against `query`.
///
/// Spans are only recovered when match data was asked for.
pub(crate) fn search_list(
    query: &[Unit],
    candidates: &[Candidate],
    options: &MatchOptions,
) -> Vec<Hit> {
    let max_len = options.max_recursions.unwrap_or(usize::MAX);
    let model = options.cost_model();
    let alignment = options.alignment();
    let mut hits = BestHits::new(query.len());

    for (id, candidate) in candidates.iter().enumerate() {
        if candidate.normalized.len() > max_len {
            continue;
        }
        let units = &candidate.normalized.units;
        let result = if options.return_match_data {
            score_units(query, units, model, alignment)
        } else {
            ScoreResult {
                score: score_only(query, units, model, alignment),
                span: MatchSpan::default(),
            }
        };
        if result.score >= options.threshold {
            hits.offer(id, candidate, result);
        }
    }
    hits.into_sorted(options.sort_by)
}

/// One-shot search over `items` keyed by `keys`, without building a trie.
pub(crate) fn search_once<T: Clone>(
    term: &str,
    items: &[T],
    keys: Vec<KeySet>,
    options: &MatchOptions,
) -> SearchOutput<T> {
    let normalization = options.normalization();
    let candidates = build_candidates(keys, 0, normalization);
    let query = normalize_units(term, normalization);
    let hits = search_list(&query, &candidates, options);
    assemble(hits, &candidates, items, options.return_match_data)
}

/// Turn hits into bare items or match records.
pub(crate) fn assemble<T: Clone>(
    hits: Vec<Hit>,
    candidates: &[Candidate],
    items: &[T],
    return_match_data: bool,
) -> SearchOutput<T> {
    if !return_match_data {
        return SearchOutput::Items(
            hits.iter()
                .map(|hit| items[hit.item_index].clone())
                .collect(),
        );
    }

    let records = hits
        .into_iter()
        .map(|hit| {
            let normalized = &candidates[hit.candidate].normalized;
            MatchRecord {
                item: items[hit.item_index].clone(),
                original: normalized.original.clone(),
                key: normalized.key(),
                score: hit.score,
                span: normalized.denormalize(hit.span),
            }
        })
        .collect();
    SearchOutput::Matches(records)
}
