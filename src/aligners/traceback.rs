use super::matrix::add;
use super::{Alignment, AlignmentMatrix, Seq};
use crate::error::{AlignError, Result};
use crate::scoring::{Score, ScoringMatrix, GAP};

/// A step backwards through the grid.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Move {
    /// `x[i-1]` aligned to `y[j-1]`.
    Diagonal,
    /// `x[i-1]` aligned to a gap.
    Up,
    /// A gap aligned to `y[j-1]`.
    Left,
}

/// State of a walk from some end cell back towards `(0, 0)`.
/// The aligned rows are built back to front and reversed at the end.
struct Traceback<'a> {
    seq_x: Seq<'a>,
    seq_y: Seq<'a>,
    x: Vec<usize>,
    y: Vec<usize>,
    gap: usize,
    sm: &'a ScoringMatrix,
    am: &'a AlignmentMatrix,
    i: usize,
    j: usize,
    score: Score,
    row_x: Vec<u8>,
    row_y: Vec<u8>,
}

impl<'a> Traceback<'a> {
    fn new(
        seq_x: Seq<'a>,
        seq_y: Seq<'a>,
        sm: &'a ScoringMatrix,
        am: &'a AlignmentMatrix,
    ) -> Result<Self> {
        let x = sm.alphabet().encode(seq_x)?;
        let y = sm.alphabet().encode(seq_y)?;
        let expected = (x.len() + 1, y.len() + 1);
        let found = (am.rows(), am.cols());
        if expected != found {
            return Err(AlignError::MatrixShape { expected, found });
        }
        Ok(Traceback {
            seq_x,
            seq_y,
            x,
            y,
            gap: sm.alphabet().gap(),
            sm,
            am,
            i: 0,
            j: 0,
            score: 0,
            row_x: vec![],
            row_y: vec![],
        })
    }

    /// The first of diagonal, up and left that explains the current cell.
    /// Requires `i > 0` and `j > 0`. Left is taken when nothing else matches.
    fn choose(&self) -> Result<Move> {
        let (i, j) = (self.i, self.j);
        let cur = self.am[(i, j)];
        let diagonal = add(self.am[(i - 1, j - 1)], self.sm.score_idx(self.x[i - 1], self.y[j - 1]))?;
        let up = add(self.am[(i - 1, j)], self.sm.score_idx(self.x[i - 1], self.gap))?;
        Ok(if cur == diagonal {
            Move::Diagonal
        } else if cur == up {
            Move::Up
        } else {
            Move::Left
        })
    }

    fn apply(&mut self, m: Move) -> Result<()> {
        let (i, j) = (self.i, self.j);
        match m {
            Move::Diagonal => {
                self.score = add(self.score, self.sm.score_idx(self.x[i - 1], self.y[j - 1]))?;
                self.row_x.push(self.seq_x[i - 1]);
                self.row_y.push(self.seq_y[j - 1]);
                self.i -= 1;
                self.j -= 1;
            }
            Move::Up => {
                self.score = add(self.score, self.sm.score_idx(self.x[i - 1], self.gap))?;
                self.row_x.push(self.seq_x[i - 1]);
                self.row_y.push(GAP);
                self.i -= 1;
            }
            Move::Left => {
                self.score = add(self.score, self.sm.score_idx(self.gap, self.y[j - 1]))?;
                self.row_x.push(GAP);
                self.row_y.push(self.seq_y[j - 1]);
                self.j -= 1;
            }
        }
        Ok(())
    }

    fn finish(mut self) -> Alignment {
        self.row_x.reverse();
        self.row_y.reverse();
        Alignment {
            score: self.score,
            x: self.row_x,
            y: self.row_y,
        }
    }
}

/// The trivial result for an empty input: score 0 and both inputs verbatim.
/// This is not a gap-filled alignment.
fn trivial(seq_x: Seq, seq_y: Seq) -> Alignment {
    Alignment {
        score: 0,
        x: seq_x.to_vec(),
        y: seq_y.to_vec(),
    }
}

/// Trace back an optimal global alignment from `(|x|, |y|)` in a matrix
/// filled in global mode.
///
/// Once one sequence is exhausted, the remaining prefix of the other is
/// aligned against gaps. The returned score is summed along the path.
///
/// When either sequence is empty, returns `(0, x, y)` verbatim.
pub fn global_alignment(
    seq_x: Seq,
    seq_y: Seq,
    sm: &ScoringMatrix,
    am: &AlignmentMatrix,
) -> Result<Alignment> {
    if seq_x.is_empty() || seq_y.is_empty() {
        return Ok(trivial(seq_x, seq_y));
    }
    let mut tb = Traceback::new(seq_x, seq_y, sm, am)?;
    tb.i = seq_x.len();
    tb.j = seq_y.len();
    while tb.i > 0 && tb.j > 0 {
        let m = tb.choose()?;
        tb.apply(m)?;
    }
    while tb.i > 0 {
        tb.apply(Move::Up)?;
    }
    while tb.j > 0 {
        tb.apply(Move::Left)?;
    }
    Ok(tb.finish())
}

/// Trace back an optimal local alignment in a matrix filled in local mode.
///
/// The walk starts at the largest cell (first in row-major order on ties).
/// After each step, it stops when an index hit 0 or when the cell it moved to
/// is 0. That 0 cell marks the start of the local alignment; the step into it
/// is still part of the alignment.
///
/// When either sequence is empty, returns `(0, x, y)` verbatim.
pub fn local_alignment(
    seq_x: Seq,
    seq_y: Seq,
    sm: &ScoringMatrix,
    am: &AlignmentMatrix,
) -> Result<Alignment> {
    if seq_x.is_empty() || seq_y.is_empty() {
        return Ok(trivial(seq_x, seq_y));
    }
    let mut tb = Traceback::new(seq_x, seq_y, sm, am)?;
    (tb.i, tb.j) = am.max_cell();
    while tb.i > 0 && tb.j > 0 {
        let m = tb.choose()?;
        tb.apply(m)?;
        if am[(tb.i, tb.j)] == 0 {
            break;
        }
    }
    Ok(tb.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aligners::AlignmentMode::{self, *};
    use crate::aligners::{Aligner, GlobalAligner};
    use pretty_assertions::assert_eq;

    fn run(
        x: &[u8],
        y: &[u8],
        sm: &ScoringMatrix,
        mode: AlignmentMode,
    ) -> (Score, String, String) {
        let am = AlignmentMatrix::build(x, y, sm, mode).unwrap();
        let a = match mode {
            Global => global_alignment(x, y, sm, &am),
            Local => local_alignment(x, y, sm, &am),
        }
        .unwrap();
        (
            a.score,
            String::from_utf8(a.x).unwrap(),
            String::from_utf8(a.y).unwrap(),
        )
    }

    fn s(score: Score, x: &str, y: &str) -> (Score, String, String) {
        (score, x.to_string(), y.to_string())
    }

    #[test]
    fn global_with_gap() {
        let sm = ScoringMatrix::build(b"ACGT", 1, -1, -2);
        assert_eq!(run(b"AC", b"ATC", &sm, Global), s(0, "A-C", "ATC"));
    }

    #[test]
    fn global_mismatch_beats_two_gaps() {
        let sm = ScoringMatrix::build(b"ACGT", 1, -1, -2);
        assert_eq!(run(b"A", b"T", &sm, Global), s(-1, "A", "T"));
    }

    #[test]
    fn global_flushes_remaining_prefix() {
        let sm = ScoringMatrix::build(b"ACGT", 2, -1, -1);
        // After matching the shared suffix, the rest of `x` goes against gaps.
        assert_eq!(run(b"GGAC", b"AC", &sm, Global), s(2, "GGAC", "--AC"));
        assert_eq!(run(b"AC", b"TTAC", &sm, Global), s(2, "--AC", "TTAC"));
    }

    #[test]
    fn diagonal_wins_ties() {
        // Aligning A to T or deleting A and inserting T both score -2.
        let sm = ScoringMatrix::build(b"AT", 1, -2, -1);
        assert_eq!(run(b"A", b"T", &sm, Global), s(-2, "A", "T"));
    }

    #[test]
    fn up_wins_over_left() {
        // The end cell is explained by both a gap in `y` and a gap in `x`;
        // the gap in `y` is taken.
        let sm = ScoringMatrix::build(b"AC", 1, -5, -1);
        assert_eq!(run(b"AC", b"CA", &sm, Global), s(-1, "-AC", "CA-"));
    }

    #[test]
    fn global_empty_inputs_are_returned_verbatim() {
        let sm = ScoringMatrix::build(b"ACGT", 1, -1, -2);
        assert_eq!(run(b"", b"ACGT", &sm, Global), s(0, "", "ACGT"));
        assert_eq!(run(b"ACGT", b"", &sm, Global), s(0, "ACGT", ""));
        assert_eq!(run(b"", b"", &sm, Global), s(0, "", ""));
    }

    #[test]
    fn local_empty_inputs_are_returned_verbatim() {
        let sm = ScoringMatrix::build(b"ACGT", 1, -1, -2);
        assert_eq!(run(b"", b"ACGT", &sm, Local), s(0, "", "ACGT"));
        assert_eq!(run(b"ACGT", b"", &sm, Local), s(0, "ACGT", ""));
    }

    #[test]
    fn local_substring() {
        let sm = ScoringMatrix::build(b"ACGT", 2, -1, -2);
        assert_eq!(run(b"TTACGTT", b"GACGA", &sm, Local), s(6, "ACG", "ACG"));
    }

    #[test]
    fn local_with_internal_gap() {
        let sm = ScoringMatrix::build(b"ACGT", 3, -3, -1);
        assert_eq!(
            run(b"GGACGTAA", b"CCACTAC", &sm, Local),
            s(11, "ACGTA", "AC-TA")
        );
    }

    #[test]
    fn local_without_positive_cell_is_empty() {
        let sm = ScoringMatrix::build(b"ACGT", 1, -1, -2);
        assert_eq!(run(b"AAA", b"TTT", &sm, Local), s(0, "", ""));
    }

    /// The walk checks for a 0 cell only after taking a step: the step that
    /// lands on the 0 cell is part of the alignment, the 0 cell ends it.
    #[test]
    fn local_stops_after_stepping_onto_zero_cell() {
        let sm = ScoringMatrix::build(b"ACGT", 1, -1, -1);
        // Grid row for x=A, y=CA: [0, 0, 1]. From (1,2) the diagonal step
        // reaches (0,1) and stops, keeping only the A/A column.
        assert_eq!(run(b"A", b"CA", &sm, Local), s(1, "A", "A"));
        // A zero-score mismatch leaves cell (1,1) at 0, so the T/G column
        // is not part of the alignment.
        let sm = ScoringMatrix::build(b"ACGT", 2, 0, -3);
        assert_eq!(run(b"TAC", b"GAC", &sm, Local), s(4, "AC", "AC"));
    }

    #[test]
    fn local_stops_on_border_with_positive_gap_score() {
        // A positive gap score makes the borders positive; the walk then ends
        // because an index reached 0, not because of a 0 cell.
        let sm = ScoringMatrix::build(b"AC", 1, -1, 1);
        let am = AlignmentMatrix::build(b"A", b"A", &sm, Local).unwrap();
        assert_eq!(am[(1, 1)], 2);
        // (1,1) = 2 comes from the gap step out of (0,1) = 1, not from the match.
        assert_eq!(run(b"A", b"A", &sm, Local), s(1, "A", "-"));
    }

    #[test]
    fn scores_past_the_matrix_overflow() {
        // The grid fits, but tracing it back under larger scores does not.
        let small = ScoringMatrix::build(b"A", 1_000_000_000, 0, 0);
        let am = AlignmentMatrix::build(b"AA", b"AA", &small, Global).unwrap();
        assert_eq!(am[(2, 2)], 2_000_000_000);
        let large = ScoringMatrix::build(b"A", 2_000_000_000, 0, 0);
        assert!(matches!(
            global_alignment(b"AA", b"AA", &large, &am),
            Err(AlignError::ScoreOverflow)
        ));
        assert!(matches!(
            GlobalAligner { sm: large }.align(b"AA", b"AA"),
            Err(AlignError::ScoreOverflow)
        ));
    }

    #[test]
    fn matrix_of_other_sequences_is_rejected() {
        let sm = ScoringMatrix::build(b"ACGT", 1, -1, -2);
        let am = AlignmentMatrix::build(b"AC", b"A", &sm, Global).unwrap();
        assert!(matches!(
            global_alignment(b"ACG", b"A", &sm, &am),
            Err(AlignError::MatrixShape {
                expected: (4, 2),
                found: (3, 2)
            })
        ));
    }
}
