use std::fmt::{self, Write};

use crate::scoring::GAP;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum CigarOp {
    Match,
    Mismatch,
    /// A symbol of `y` aligned to a gap in `x`.
    Insertion,
    /// A symbol of `x` aligned to a gap in `y`.
    Deletion,
}

impl CigarOp {
    fn get_char(&self) -> char {
        match self {
            CigarOp::Match => 'M',
            CigarOp::Mismatch => 'X',
            CigarOp::Insertion => 'I',
            CigarOp::Deletion => 'D',
        }
    }

    /// The operation for one aligned column.
    fn of_column(x: u8, y: u8) -> CigarOp {
        if x == GAP {
            CigarOp::Insertion
        } else if y == GAP {
            CigarOp::Deletion
        } else if x == y {
            CigarOp::Match
        } else {
            CigarOp::Mismatch
        }
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct CigarElement {
    pub command: CigarOp,
    pub length: usize,
}

/// A run-length encoded alignment.
#[derive(PartialEq, Eq, Clone, Debug, Default)]
pub struct Cigar(Vec<CigarElement>);

impl Cigar {
    /// Build the cigar of two aligned rows of equal length.
    pub fn from_rows(x: &[u8], y: &[u8]) -> Cigar {
        debug_assert_eq!(x.len(), y.len());
        let mut cigar = Cigar::default();
        for (&cx, &cy) in x.iter().zip(y) {
            cigar.push(CigarOp::of_column(cx, cy));
        }
        cigar
    }

    pub fn push(&mut self, command: CigarOp) {
        if let Some(s) = self.0.last_mut() {
            if s.command == command {
                s.length += 1;
                return;
            }
        }
        self.0.push(CigarElement { command, length: 1 });
    }

    pub fn elements(&self) -> &[CigarElement] {
        &self.0
    }
}

impl fmt::Display for Cigar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for e in &self.0 {
            write!(f, "{}", e.length)?;
            f.write_char(e.command.get_char())?;
        }
        Ok(())
    }
}
