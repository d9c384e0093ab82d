//! Pairwise sequence alignment by dynamic programming.
//!
//! Global (Needleman-Wunsch) and local (Smith-Waterman) alignment under a
//! substitution scoring matrix with a linear gap score, an empirical null
//! distribution of local scores, and a spell checker built on global
//! alignment.

pub mod aligners;
pub mod cli;
pub mod error;
pub mod input;
pub mod null_distribution;
pub mod scoring;
pub mod spelling;

pub mod prelude {
    pub use crate::aligners::{
        global_alignment, local_alignment, Aligner, Alignment, AlignmentMatrix, AlignmentMode,
        Cigar, GlobalAligner, LocalAligner, Seq, Sequence,
    };
    pub use crate::error::{AlignError, Result};
    pub use crate::null_distribution::NullDistribution;
    pub use crate::scoring::{Alphabet, Score, ScoringMatrix, Symbol, GAP};
    pub use crate::spelling::{approximate_edit_distance, check_spelling};
}
