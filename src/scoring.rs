//! This module contains the `Alphabet` and `ScoringMatrix` types.
//!
//! A scoring matrix is a dense `(k+1) x (k+1)` table over an alphabet of `k`
//! symbols plus the gap symbol. Symbols are mapped to table indices once, so
//! that lookups in the DP inner loop are plain array accesses.
use crate::error::{AlignError, Result};

/// Type for storing scores. Signed, since global scores may be negative.
pub type Score = i32;

pub type Symbol = u8;

/// The reserved gap symbol. Only ever present in output alignments.
pub const GAP: Symbol = b'-';

const ABSENT: u16 = u16::MAX;

/// An ordered set of non-gap symbols, with a byte -> index lookup table.
///
/// The gap symbol always has index `len()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<u8>,
    index: [u16; 256],
}

impl Alphabet {
    /// Duplicates and the gap symbol are skipped; order of first occurrence is kept.
    pub fn new(symbols: &[u8]) -> Self {
        let mut alphabet = Alphabet {
            symbols: vec![],
            index: [ABSENT; 256],
        };
        for &c in symbols {
            if c != GAP && alphabet.index[c as usize] == ABSENT {
                alphabet.index[c as usize] = alphabet.symbols.len() as u16;
                alphabet.symbols.push(c);
            }
        }
        alphabet.index[GAP as usize] = alphabet.symbols.len() as u16;
        alphabet
    }

    /// The 26 lowercase ASCII letters.
    pub fn lowercase() -> Self {
        Self::new(&(b'a'..=b'z').collect::<Vec<_>>())
    }

    /// Number of non-gap symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    /// Index of the gap symbol.
    pub fn gap(&self) -> usize {
        self.symbols.len()
    }

    /// The index of `c`, or `None` when `c` is neither in the alphabet nor the gap.
    #[inline]
    pub fn rank(&self, c: u8) -> Option<usize> {
        match self.index[c as usize] {
            ABSENT => None,
            i => Some(i as usize),
        }
    }

    fn rank_or_err(&self, c: u8) -> Result<usize> {
        self.rank(c).ok_or(AlignError::UnknownSymbol(c as char))
    }

    /// Map an input sequence to alphabet indices.
    /// Fails on the first symbol that is not part of the alphabet, or on a gap.
    pub fn encode(&self, seq: &[u8]) -> Result<Vec<usize>> {
        seq.iter()
            .map(|&c| match c {
                GAP => Err(AlignError::GapInInput),
                c => self.rank_or_err(c),
            })
            .collect()
    }
}

/// A total substitution/gap score table over `alphabet ∪ {gap}`.
///
/// Tables made by `ScoringMatrix::build` are symmetric and give the same
/// score to every pair involving the gap. Tables read from a file (see
/// `ScoringMatrix::from_entries`) need not be.
///
/// No sanity checks are done on the scores themselves: a gap score larger
/// than the match score is accepted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoringMatrix {
    alphabet: Alphabet,
    /// `alphabet.len() + 1`, the side length of the table.
    width: usize,
    scores: Vec<Score>,
}

impl ScoringMatrix {
    /// `score(a,b)` is `gap` when either symbol is the gap,
    /// `diag` when `a == b`, and `off_diag` otherwise.
    pub fn build(alphabet: &[u8], diag: Score, off_diag: Score, gap: Score) -> Self {
        let alphabet = Alphabet::new(alphabet);
        let width = alphabet.len() + 1;
        let g = alphabet.gap();
        let mut scores = vec![0; width * width];
        for i in 0..width {
            for j in 0..width {
                scores[i * width + j] = if i == g || j == g {
                    gap
                } else if i == j {
                    diag
                } else {
                    off_diag
                };
            }
        }
        ScoringMatrix {
            alphabet,
            width,
            scores,
        }
    }

    /// Build a table from explicit `((row, col), score)` entries, e.g. a PAM
    /// or BLOSUM table read from disk.
    ///
    /// The alphabet is every non-gap symbol that occurs, in order of first
    /// occurrence. The table must be total over `alphabet ∪ {gap}`; a missing
    /// entry is an error. Later duplicates overwrite earlier ones.
    pub fn from_entries(entries: impl IntoIterator<Item = ((u8, u8), Score)>) -> Result<Self> {
        let entries: Vec<_> = entries.into_iter().collect();
        let symbols: Vec<u8> = entries.iter().flat_map(|&((a, b), _)| [a, b]).collect();
        let alphabet = Alphabet::new(&symbols);
        let width = alphabet.len() + 1;
        let mut scores: Vec<Option<Score>> = vec![None; width * width];
        for ((a, b), s) in entries {
            // Every symbol was added to the alphabet above.
            let i = alphabet.rank_or_err(a)?;
            let j = alphabet.rank_or_err(b)?;
            scores[i * width + j] = Some(s);
        }
        let all = alphabet
            .symbols()
            .iter()
            .copied()
            .chain(std::iter::once(GAP))
            .collect::<Vec<_>>();
        let mut table = Vec::with_capacity(width * width);
        for &a in &all {
            for &b in &all {
                let idx = alphabet.rank_or_err(a)? * width + alphabet.rank_or_err(b)?;
                table.push(scores[idx].ok_or_else(|| {
                    AlignError::ScoringTable(format!(
                        "missing entry for ({}, {})",
                        a as char, b as char
                    ))
                })?);
            }
        }
        Ok(ScoringMatrix {
            alphabet,
            width,
            scores: table,
        })
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Score of aligning symbol `a` against symbol `b`. Either may be the gap.
    pub fn score(&self, a: u8, b: u8) -> Result<Score> {
        Ok(self.score_idx(
            self.alphabet.rank_or_err(a)?,
            self.alphabet.rank_or_err(b)?,
        ))
    }

    /// Score of two symbols given by their alphabet indices.
    #[inline]
    pub fn score_idx(&self, i: usize, j: usize) -> Score {
        self.scores[i * self.width + j]
    }

    /// Whether `score(a,b) == score(b,a)` for all pairs.
    pub fn is_symmetric(&self) -> bool {
        (0..self.width).all(|i| (0..i).all(|j| self.score_idx(i, j) == self.score_idx(j, i)))
    }
}
