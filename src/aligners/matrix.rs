use super::{AlignmentMode, Seq};
use crate::error::{AlignError, Result};
use crate::scoring::{Score, ScoringMatrix};
use std::cmp::max;
use std::ops::Index;

/// The full DP grid of a pairwise alignment.
///
/// Cell `(i, j)` holds the best score of aligning `x[..i]` and `y[..j]`. In
/// local mode no cell is negative: any negative running score is clamped to 0,
/// which marks the start of a fresh alignment.
///
/// The whole grid is kept, since the traceback needs every row.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct AlignmentMatrix {
    mode: AlignmentMode,
    rows: usize,
    cols: usize,
    /// Row-major cells.
    cells: Vec<Score>,
}

/// Checked score addition. Scores are not bounded, so large entries in the
/// scoring matrix can push a cell past `Score::MAX`.
pub(super) fn add(a: Score, b: Score) -> Result<Score> {
    a.checked_add(b).ok_or(AlignError::ScoreOverflow)
}

impl AlignmentMatrix {
    /// Fill the `(|x|+1) x (|y|+1)` grid for `x` and `y`.
    ///
    /// Both sequences are mapped to scoring matrix indices first, so a symbol
    /// missing from the scoring matrix fails here, before any cell is computed.
    pub fn build(x: Seq, y: Seq, sm: &ScoringMatrix, mode: AlignmentMode) -> Result<Self> {
        let x = sm.alphabet().encode(x)?;
        let y = sm.alphabet().encode(y)?;
        let gap = sm.alphabet().gap();
        let rows = x.len() + 1;
        let cols = y.len() + 1;

        let clamp = |s: Score| if mode.is_global() { s } else { max(s, 0) };
        let mut cells = vec![0; rows * cols];

        // First column: only gaps in `y`.
        for i in 1..rows {
            cells[i * cols] = clamp(add(cells[(i - 1) * cols], sm.score_idx(x[i - 1], gap))?);
        }
        // First row: only gaps in `x`.
        for j in 1..cols {
            cells[j] = clamp(add(cells[j - 1], sm.score_idx(gap, y[j - 1]))?);
        }

        for (i0, &ca) in x.iter().enumerate() {
            // Change from 0-based to 1-based indexing.
            let i = i0 + 1;
            let (prev, next) = cells[(i - 1) * cols..(i + 1) * cols].split_at_mut(cols);
            let del = sm.score_idx(ca, gap);
            for (j0, &cb) in y.iter().enumerate() {
                let j = j0 + 1;
                let f = max(
                    add(prev[j - 1], sm.score_idx(ca, cb))?,
                    max(add(prev[j], del)?, add(next[j - 1], sm.score_idx(gap, cb))?),
                );
                next[j] = clamp(f);
            }
        }

        Ok(AlignmentMatrix {
            mode,
            rows,
            cols,
            cells,
        })
    }

    /// The mode the grid was filled in.
    pub fn mode(&self) -> AlignmentMode {
        self.mode
    }

    /// `|x| + 1`.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// `|y| + 1`.
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn row(&self, i: usize) -> &[Score] {
        &self.cells[i * self.cols..(i + 1) * self.cols]
    }

    pub fn cells(&self) -> &[Score] {
        &self.cells
    }

    /// Position of the largest cell. Ties go to the first one in row-major order.
    pub fn max_cell(&self) -> (usize, usize) {
        let mut best = 0;
        for (idx, &s) in self.cells.iter().enumerate() {
            if s > self.cells[best] {
                best = idx;
            }
        }
        (best / self.cols, best % self.cols)
    }
}

impl Index<(usize, usize)> for AlignmentMatrix {
    type Output = Score;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &Score {
        &self.cells[i * self.cols + j]
    }
}
