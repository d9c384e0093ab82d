//! Error kinds shared by the scoring, alignment and input modules.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlignError {
    /// A sequence contains a symbol that the scoring matrix has no entry for.
    #[error("symbol {0:?} is not in the scoring matrix alphabet")]
    UnknownSymbol(char),

    /// Input sequences may never contain the gap symbol.
    #[error("input sequence contains the gap symbol '-'")]
    GapInInput,

    /// An alignment matrix was passed together with sequences it was not built from.
    #[error("alignment matrix is {found:?} but the sequences need {expected:?}")]
    MatrixShape {
        expected: (usize, usize),
        found: (usize, usize),
    },

    /// A cell or path score does not fit in a `Score`.
    #[error("alignment score does not fit in 32 bits")]
    ScoreOverflow,

    #[error("invalid scoring table: {0}")]
    ScoringTable(String),

    #[error("fasta error: {0}")]
    Fasta(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AlignError>;
