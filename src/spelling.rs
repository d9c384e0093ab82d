//! Spell checking by approximate edit distance.
//!
//! With match = 2, mismatch = 1 and gap = 0, the global alignment score of
//! `a` and `b` equals `|a| + |b| - d(a, b)`, where `d` is the Levenshtein
//! distance: a match adds 2 to the score, a substitution 1 and an indel 0,
//! and each loses exactly that much from `|a| + |b|` relative to a perfect
//! match. Any other choice of the three constants breaks this relation.

use crate::aligners::{global_alignment, AlignmentMatrix, AlignmentMode};
use crate::error::Result;
use crate::scoring::{Alphabet, Score, ScoringMatrix};
use rustc_hash::FxHashSet;
use tracing::debug;

const DIAG: Score = 2;
const OFF_DIAG: Score = 1;
const GAP: Score = 0;

/// The scoring matrix for which `|a| + |b| - score` is the edit distance.
pub fn edit_distance_scoring() -> ScoringMatrix {
    ScoringMatrix::build(Alphabet::lowercase().symbols(), DIAG, OFF_DIAG, GAP)
}

/// `|a| + |b| - score` of the global alignment of `a` and `b` under `sm`.
/// This is the edit distance when `sm` is `edit_distance_scoring()`.
fn approximate_distance(a: &[u8], b: &[u8], sm: &ScoringMatrix) -> Result<usize> {
    let am = AlignmentMatrix::build(a, b, sm, AlignmentMode::Global)?;
    let score = global_alignment(a, b, sm, &am)?.score;
    let total = (a.len() + b.len()) as Score;
    // Holds when no column scores more than 2.
    debug_assert!(score <= total, "score {score} exceeds |a| + |b| = {total}");
    Ok((total - score) as usize)
}

/// Edit distance between two lowercase words.
pub fn approximate_edit_distance(a: &str, b: &str) -> Result<usize> {
    approximate_distance(a.as_bytes(), b.as_bytes(), &edit_distance_scoring())
}

/// All words in `words` within edit distance `max_dist` of `word`.
///
/// Every candidate is aligned in full; there is no index or pruning. Words
/// must consist of lowercase ASCII letters, anything else is an
/// `UnknownSymbol` error.
pub fn check_spelling<'a>(
    word: &str,
    max_dist: usize,
    words: impl IntoIterator<Item = &'a str>,
) -> Result<FxHashSet<String>> {
    let sm = edit_distance_scoring();
    let mut similar = FxHashSet::default();
    let mut checked = 0;
    for candidate in words {
        checked += 1;
        if approximate_distance(word.as_bytes(), candidate.as_bytes(), &sm)? <= max_dist {
            similar.insert(candidate.to_string());
        }
    }
    debug!(word, max_dist, checked, found = similar.len(), "spell check");
    Ok(similar)
}
