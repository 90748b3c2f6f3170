//! Text normalization with reversible position tracking
//!
//! Raw text is split into user-perceived characters (grapheme clusters, or
//! bare code points in separated mode), folded according to
//! [`NormalizeOptions`], and recorded together with the byte offset each
//! surviving unit started at. The offset map lets a span found in the
//! normalized sequence be translated back onto the raw text.

use super::MatchSpan;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

/// One comparison unit: a folded grapheme cluster or code point.
pub type Unit = Box<str>;

/// Characters dropped entirely when `ignore_symbols` is set.
///
/// They are stripped before segmentation, so a combining mark that followed
/// one attaches to the preceding character instead.
const SYMBOL_CHARS: &str = "`~!@#$%^&*()-=_+{}[]|\\;':\",./<>?";

/// Switches controlling how text is folded before comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeOptions {
    /// Lowercase every unit
    pub ignore_case: bool,
    /// Drop ASCII punctuation and symbol characters
    pub ignore_symbols: bool,
    /// Collapse whitespace runs to one space and trim both ends
    pub normalize_whitespace: bool,
    /// Treat every code point as its own unit instead of grapheme clusters
    pub use_separated_unicode: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            ignore_case: true,
            ignore_symbols: true,
            normalize_whitespace: true,
            use_separated_unicode: false,
        }
    }
}

/// Normalized form of a raw string plus the map back to it.
///
/// `offsets` holds one byte offset into `original` per unit, followed by a
/// sentinel equal to `original.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    pub original: String,
    pub units: Vec<Unit>,
    pub offsets: Vec<usize>,
}

impl NormalizedText {
    /// Number of units in the normalized sequence
    #[inline]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// The normalized sequence joined back into a string
    pub fn key(&self) -> String {
        self.units.concat()
    }

    /// Translate a span over `units` into a byte span over `original`.
    ///
    /// Positions past the end clamp to the sentinel.
    pub fn denormalize(&self, span: MatchSpan) -> MatchSpan {
        let sentinel = self.original.len();
        let start = self.offsets.get(span.index).copied().unwrap_or(sentinel);
        let end = self
            .offsets
            .get(span.index + span.length)
            .copied()
            .unwrap_or(sentinel);
        MatchSpan {
            index: start,
            length: end.saturating_sub(start),
        }
    }
}

/// Normalize `raw`, keeping the offset map.
#[must_use]
pub fn normalize(raw: &str, options: NormalizeOptions) -> NormalizedText {
    let mut units = Vec::new();
    let mut offsets = Vec::new();
    fold_units(raw, options, &mut units, Some(&mut offsets));
    offsets.push(raw.len());
    NormalizedText {
        original: raw.to_owned(),
        units,
        offsets,
    }
}

/// Normalize `raw` without tracking offsets.
///
/// Used for query terms, which are never mapped back.
#[must_use]
pub fn normalize_units(raw: &str, options: NormalizeOptions) -> Vec<Unit> {
    let mut units = Vec::new();
    fold_units(raw, options, &mut units, None);
    units
}

/// Whether `c` belongs to the symbol class
#[inline]
pub fn is_symbol_char(c: char) -> bool {
    SYMBOL_CHARS.contains(c)
}

/// Whether `unit` consists only of whitespace
#[inline]
pub fn is_whitespace_unit(unit: &str) -> bool {
    !unit.is_empty() && unit.chars().all(char::is_whitespace)
}

/// Split text into (byte offset, unit) pairs.
fn segments(raw: &str, separated: bool) -> Vec<(usize, &str)> {
    if separated {
        raw.char_indices()
            .map(|(i, c)| (i, &raw[i..i + c.len_utf8()]))
            .collect()
    } else {
        raw.grapheme_indices(true).collect()
    }
}

/// Remove symbol characters ahead of segmentation.
///
/// When anything is removed, also returns the raw byte offset behind every
/// byte of the stripped text.
fn strip_symbols(
    raw: &str,
    options: NormalizeOptions,
) -> (Cow<'_, str>, Option<Vec<usize>>) {
    if !options.ignore_symbols || !raw.chars().any(is_symbol_char) {
        return (Cow::Borrowed(raw), None);
    }
    let mut text = String::with_capacity(raw.len());
    let mut origin = Vec::with_capacity(raw.len());
    for (offset, c) in raw.char_indices().filter(|&(_, c)| !is_symbol_char(c)) {
        text.push(c);
        origin.extend(std::iter::repeat(offset).take(c.len_utf8()));
    }
    (Cow::Owned(text), Some(origin))
}

fn fold_unit(segment: &str, options: NormalizeOptions) -> Unit {
    let folded: Cow<'_, str> = if options.ignore_case {
        Cow::Owned(segment.to_lowercase())
    } else {
        Cow::Borrowed(segment)
    };
    if options.use_separated_unicode {
        folded.into()
    } else {
        folded.nfc().collect::<String>().into_boxed_str()
    }
}

fn fold_units(
    raw: &str,
    options: NormalizeOptions,
    units: &mut Vec<Unit>,
    mut offsets: Option<&mut Vec<usize>>,
) {
    let (text, origin) = strip_symbols(raw, options);
    // Starting "after whitespace" drops leading runs.
    let mut last_was_space = true;

    for (position, segment) in segments(&text, options.use_separated_unicode) {
        let offset = origin.as_ref().map_or(position, |origin| origin[position]);
        if options.normalize_whitespace && is_whitespace_unit(segment) {
            if !last_was_space {
                units.push(Box::from(" "));
                if let Some(offsets) = offsets.as_deref_mut() {
                    offsets.push(offset);
                }
                last_was_space = true;
            }
            continue;
        }
        units.push(fold_unit(segment, options));
        if let Some(offsets) = offsets.as_deref_mut() {
            offsets.push(offset);
        }
        last_was_space = false;
    }

    if options.normalize_whitespace {
        while units.last().is_some_and(|u| &**u == " ") {
            units.pop();
            if let Some(offsets) = offsets.as_deref_mut() {
                offsets.pop();
            }
        }
    }
}
