//! Dynamic programming pairwise alignment with a linear gap score.
//!
//! An alignment runs in two phases:
//! 1. `AlignmentMatrix::build` fills the full `(|x|+1) x (|y|+1)` score grid,
//! 2. `global_alignment` or `local_alignment` walks the grid backwards to
//!    recover one optimal alignment.
//!
//! The traceback always prefers a diagonal step, then a step up (gap in `y`),
//! then a step left (gap in `x`). Other orders give different, equally
//! optimal alignments.

use crate::error::Result;
use crate::scoring::{Score, ScoringMatrix, GAP};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod cigar;
pub mod matrix;
pub mod traceback;

pub use cigar::Cigar;
pub use matrix::AlignmentMatrix;
pub use traceback::{global_alignment, local_alignment};

/// An owned sequence.
pub type Sequence = Vec<u8>;
/// A sequence slice.
pub type Seq<'a> = &'a [u8];

/// Whether to align the full sequences or the best scoring substrings.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize, ValueEnum)]
pub enum AlignmentMode {
    /// Needleman-Wunsch: both sequences are consumed end to end.
    #[default]
    Global,
    /// Smith-Waterman: negative prefixes are cut off by clamping at 0.
    Local,
}

impl AlignmentMode {
    pub fn is_global(&self) -> bool {
        *self == AlignmentMode::Global
    }

    /// The aligner for this mode.
    pub fn aligner(self, sm: ScoringMatrix) -> Box<dyn Aligner> {
        match self {
            AlignmentMode::Global => Box::new(GlobalAligner { sm }),
            AlignmentMode::Local => Box::new(LocalAligner { sm }),
        }
    }
}

/// The result of a traceback: the score along the path and the two aligned
/// rows, which contain `GAP` where the other row has a symbol.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Alignment {
    pub score: Score,
    pub x: Sequence,
    pub y: Sequence,
}

impl Alignment {
    /// Fraction of columns in which both rows carry the same symbol.
    pub fn identity(&self) -> f64 {
        if self.x.is_empty() {
            return 0.0;
        }
        let same = self.x.iter().zip(&self.y).filter(|(a, b)| a == b).count();
        same as f64 / self.x.len() as f64
    }

    /// The aligned part of `x`, without gaps.
    pub fn ungapped_x(&self) -> Sequence {
        self.x.iter().copied().filter(|&c| c != GAP).collect()
    }

    /// The aligned part of `y`, without gaps.
    pub fn ungapped_y(&self) -> Sequence {
        self.y.iter().copied().filter(|&c| c != GAP).collect()
    }

    pub fn cigar(&self) -> Cigar {
        Cigar::from_rows(&self.x, &self.y)
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "score {}", self.score)?;
        writeln!(f, "{}", String::from_utf8_lossy(&self.x))?;
        write!(f, "{}", String::from_utf8_lossy(&self.y))
    }
}

/// An aligner fills an alignment matrix for two sequences and traces back one
/// optimal alignment, using the scoring matrix it owns.
pub trait Aligner {
    fn scoring_matrix(&self) -> &ScoringMatrix;

    fn mode(&self) -> AlignmentMode;

    /// Finds an optimal alignment of `a` and `b`.
    fn align(&self, a: Seq, b: Seq) -> Result<Alignment>;

    /// The score of the alignment returned by `align`.
    fn score(&self, a: Seq, b: Seq) -> Result<Score> {
        Ok(self.align(a, b)?.score)
    }
}

/// Needleman-Wunsch.
#[derive(Clone, Debug)]
pub struct GlobalAligner {
    pub sm: ScoringMatrix,
}

/// Smith-Waterman.
#[derive(Clone, Debug)]
pub struct LocalAligner {
    pub sm: ScoringMatrix,
}

impl Aligner for GlobalAligner {
    fn scoring_matrix(&self) -> &ScoringMatrix {
        &self.sm
    }

    fn mode(&self) -> AlignmentMode {
        AlignmentMode::Global
    }

    fn align(&self, a: Seq, b: Seq) -> Result<Alignment> {
        let am = AlignmentMatrix::build(a, b, &self.sm, AlignmentMode::Global)?;
        global_alignment(a, b, &self.sm, &am)
    }
}

impl Aligner for LocalAligner {
    fn scoring_matrix(&self) -> &ScoringMatrix {
        &self.sm
    }

    fn mode(&self) -> AlignmentMode {
        AlignmentMode::Local
    }

    fn align(&self, a: Seq, b: Seq) -> Result<Alignment> {
        let am = AlignmentMatrix::build(a, b, &self.sm, AlignmentMode::Local)?;
        local_alignment(a, b, &self.sm, &am)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity() {
        let a = Alignment {
            score: 0,
            x: b"AC-GT".to_vec(),
            y: b"ACTG-".to_vec(),
        };
        assert_eq!(a.identity(), 3.0 / 5.0);
        assert_eq!(a.ungapped_x(), b"ACGT");
        assert_eq!(a.ungapped_y(), b"ACTG");
        assert_eq!(a.cigar().to_string(), "2M1I1M1D");
    }

    #[test]
    fn empty_identity() {
        let a = Alignment {
            score: 0,
            x: vec![],
            y: vec![],
        };
        assert_eq!(a.identity(), 0.0);
    }

    #[test]
    fn aligner_modes() {
        let sm = ScoringMatrix::build(b"ACGT", 2, -1, -2);
        let g = GlobalAligner { sm: sm.clone() }
            .align(b"TTACGTT", b"ACG")
            .unwrap();
        assert_eq!(g.x.len(), g.y.len());
        assert_eq!(g.ungapped_x(), b"TTACGTT");
        let l = AlignmentMode::Local.aligner(sm.clone());
        assert_eq!(l.mode(), AlignmentMode::Local);
        assert!(!l.mode().is_global());
        assert_eq!(l.scoring_matrix(), &sm);
        assert_eq!(l.score(b"TTACGTT", b"ACG").unwrap(), 6);
        let l = l.align(b"TTACGTT", b"ACG").unwrap();
        assert_eq!(l.score, 6);
        assert_eq!(l.x, b"ACG");
        assert_eq!(l.y, b"ACG");
    }
}
