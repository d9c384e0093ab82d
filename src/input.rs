//! Reading sequences, word lists and scoring tables from disk.
use crate::aligners::Sequence;
use crate::error::{AlignError, Result};
use crate::scoring::{Score, ScoringMatrix, GAP};
use bio::io::fasta;
use std::{fs::File, path::Path};
use tracing::info;

/// Read a single sequence.
///
/// `.fa`, `.fasta` and `.fna` files are parsed as Fasta and the first record
/// is returned. Any other file is taken verbatim, minus trailing whitespace.
pub fn read_sequence(path: &Path) -> Result<Sequence> {
    let seq = match path.extension().and_then(|e| e.to_str()) {
        Some("fa" | "fasta" | "fna") => {
            let record = fasta::Reader::new(File::open(path)?)
                .records()
                .next()
                .ok_or_else(|| {
                    AlignError::Fasta(format!("no records in {}", path.display()))
                })??;
            record
                .check()
                .map_err(|e| AlignError::Fasta(e.to_string()))?;
            record.seq().to_vec()
        }
        _ => {
            let mut data = std::fs::read(path)?;
            while matches!(data.last(), Some(c) if c.is_ascii_whitespace()) {
                data.pop();
            }
            data
        }
    };
    if seq.contains(&GAP) {
        return Err(AlignError::GapInInput);
    }
    info!("read sequence of length {} from {}", seq.len(), path.display());
    Ok(seq)
}

/// Read a newline separated word list. Empty lines are skipped.
pub fn read_words(path: &Path) -> Result<Vec<String>> {
    let words: Vec<String> = std::fs::read_to_string(path)?
        .lines()
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(String::from)
        .collect();
    info!("loaded a dictionary with {} words", words.len());
    Ok(words)
}

/// Read a scoring table, see `parse_scoring_matrix`.
pub fn read_scoring_matrix(path: &Path) -> Result<ScoringMatrix> {
    parse_scoring_matrix(&std::fs::read_to_string(path)?)
}

/// Parse a whitespace separated scoring table in the PAM/BLOSUM text layout:
///
/// ```text
///    A  C  -
/// A  2 -1 -4
/// C -1  2 -4
/// - -4 -4 -4
/// ```
///
/// The first line holds the column symbols, every other line a row symbol
/// followed by one score per column. The table must be total over its
/// symbols and the gap.
pub fn parse_scoring_matrix(text: &str) -> Result<ScoringMatrix> {
    let err = |line: usize, msg: String| AlignError::ScoringTable(format!("line {line}: {msg}"));
    let symbol = |line: usize, token: &str| match token.as_bytes() {
        &[c] => Ok(c),
        _ => Err(err(line, format!("expected a single symbol, found {token:?}"))),
    };

    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l))
        .filter(|(_, l)| !l.trim().is_empty());
    let (header_line, header) = lines
        .next()
        .ok_or_else(|| AlignError::ScoringTable("empty table".into()))?;
    let columns = header
        .split_whitespace()
        .map(|t| symbol(header_line, t))
        .collect::<Result<Vec<_>>>()?;

    let mut entries = vec![];
    for (line, l) in lines {
        let mut tokens = l.split_whitespace();
        // Lines are non-empty, so there is a first token.
        let row = symbol(line, tokens.next().unwrap_or_default())?;
        let values = tokens
            .map(|t| {
                t.parse::<Score>()
                    .map_err(|_| err(line, format!("invalid score {t:?}")))
            })
            .collect::<Result<Vec<_>>>()?;
        if values.len() != columns.len() {
            return Err(err(
                line,
                format!("expected {} scores, found {}", columns.len(), values.len()),
            ));
        }
        entries.extend(columns.iter().zip(values).map(|(&col, v)| ((row, col), v)));
    }
    ScoringMatrix::from_entries(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TABLE: &str = "   A  C  -\nA  2 -1 -4\nC -1  2 -4\n- -4 -4 -4\n";

    fn file(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn parse_table() {
        let sm = parse_scoring_matrix(TABLE).unwrap();
        assert_eq!(sm.alphabet().symbols(), b"AC");
        assert_eq!(sm.score(b'A', b'C').unwrap(), -1);
        assert_eq!(sm.score(b'C', b'C').unwrap(), 2);
        assert_eq!(sm.score(GAP, b'A').unwrap(), -4);
    }

    #[test]
    fn parse_table_errors() {
        assert!(parse_scoring_matrix("").is_err());
        assert!(parse_scoring_matrix("A -\nA 1\n- 1 1\n").is_err());
        assert!(parse_scoring_matrix("A -\nA 1 x\n- 1 1\n").is_err());
        assert!(parse_scoring_matrix("AB -\nA 1 1\n- 1 1\n").is_err());
        // Missing gap row.
        assert!(parse_scoring_matrix("A -\nA 1 1\n").is_err());
    }

    #[test]
    fn plain_sequence_is_trimmed() {
        let f = file(".txt", "HSGVNQLGG\n\n");
        assert_eq!(read_sequence(f.path()).unwrap(), b"HSGVNQLGG");
    }

    #[test]
    fn fasta_sequence() {
        let f = file(".fasta", ">a first\nACGT\nTT\n>b\nGG\n");
        assert_eq!(read_sequence(f.path()).unwrap(), b"ACGTTT");
    }

    #[test]
    fn gap_in_sequence() {
        let f = file(".txt", "AC-GT");
        assert!(matches!(
            read_sequence(f.path()),
            Err(AlignError::GapInInput)
        ));
    }

    #[test]
    fn words() {
        let f = file(".txt", "cat\r\nbat\n\ndog\n");
        assert_eq!(read_words(f.path()).unwrap(), vec!["cat", "bat", "dog"]);
    }

    #[test]
    fn table_file() {
        let f = file(".txt", TABLE);
        assert_eq!(
            read_scoring_matrix(f.path()).unwrap(),
            parse_scoring_matrix(TABLE).unwrap()
        );
    }
}
