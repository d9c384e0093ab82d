//! Command line interface: reads the inputs, runs the alignment pipelines,
//! and writes the results.
use crate::aligners::{Aligner, AlignmentMode, GlobalAligner, LocalAligner};
use crate::input::{read_scoring_matrix, read_sequence, read_words};
use crate::null_distribution::NullDistribution;
use crate::scoring::{Score, ScoringMatrix};
use crate::spelling::check_spelling;
use anyhow::Context;
use clap::{value_parser, Args, Parser, Subcommand};
use itertools::Itertools;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::{io::Write, path::PathBuf};
use tracing::{debug, info};

#[derive(Parser)]
#[clap(author, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Print the scoring parameters as JSON before running.
    #[arg(long, global = true)]
    pub print_config: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Align two sequences.
    Align(AlignArgs),
    /// Score the local alignment of two sequences against shuffles of the second.
    NullDist(NullDistArgs),
    /// Compare the local alignment of two sequences to a consensus sequence.
    Compare(CompareArgs),
    /// List dictionary words close to the given words.
    Spell(SpellArgs),
}

/// The scoring scheme: either a table file, or an alphabet with three scores.
#[derive(Args, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[clap(next_help_heading = "Scoring")]
pub struct ScoringArgs {
    /// Scoring table in PAM/BLOSUM text layout, including a `-` row and column.
    /// When given, the other scoring options are ignored.
    #[arg(long, value_parser = value_parser!(PathBuf))]
    pub table: Option<PathBuf>,

    /// Symbols of the alphabet.
    #[arg(long, default_value = "ACGT")]
    pub alphabet: String,

    /// Score of a match.
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub diag: Score,

    /// Score of a mismatch.
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    pub off_diag: Score,

    /// Score of aligning a symbol to a gap.
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    pub gap: Score,
}

impl ScoringArgs {
    pub fn scoring_matrix(&self) -> anyhow::Result<ScoringMatrix> {
        Ok(match &self.table {
            Some(table) => read_scoring_matrix(table)
                .with_context(|| format!("reading scoring table {}", table.display()))?,
            None => ScoringMatrix::build(self.alphabet.as_bytes(), self.diag, self.off_diag, self.gap),
        })
    }
}

#[derive(Args)]
#[clap(next_help_heading = "Input")]
pub struct PairArgs {
    /// File with the first sequence. Plain text or Fasta.
    #[arg(short = 'x', long, value_parser = value_parser!(PathBuf))]
    pub x: PathBuf,

    /// File with the second sequence. Plain text or Fasta.
    #[arg(short = 'y', long, value_parser = value_parser!(PathBuf))]
    pub y: PathBuf,
}

impl PairArgs {
    fn read(&self) -> anyhow::Result<(Vec<u8>, Vec<u8>)> {
        let x = read_sequence(&self.x).with_context(|| format!("reading {}", self.x.display()))?;
        let y = read_sequence(&self.y).with_context(|| format!("reading {}", self.y.display()))?;
        Ok((x, y))
    }
}

#[derive(Args)]
pub struct AlignArgs {
    #[clap(flatten)]
    pub pair: PairArgs,

    #[arg(long, value_enum, default_value_t)]
    pub mode: AlignmentMode,

    /// Also print the CIGAR string of the alignment.
    #[arg(long)]
    pub cigar: bool,

    #[clap(flatten)]
    pub scoring: ScoringArgs,
}

#[derive(Args)]
pub struct NullDistArgs {
    #[clap(flatten)]
    pub pair: PairArgs,

    /// Number of shuffles of the second sequence.
    #[arg(short = 'n', long, default_value_t = 100)]
    pub trials: usize,

    /// Seed to initialize RNG for reproducability
    #[arg(long)]
    pub seed: Option<u64>,

    /// Run the trials on all cores.
    #[arg(long)]
    pub par: bool,

    /// Where to write the score distribution as JSON.
    #[arg(short, long, value_parser = value_parser!(PathBuf))]
    pub output: Option<PathBuf>,

    #[clap(flatten)]
    pub scoring: ScoringArgs,
}

#[derive(Args)]
pub struct CompareArgs {
    #[clap(flatten)]
    pub pair: PairArgs,

    /// File with the consensus sequence.
    #[arg(long, value_parser = value_parser!(PathBuf))]
    pub consensus: PathBuf,

    #[clap(flatten)]
    pub scoring: ScoringArgs,
}

#[derive(Args)]
pub struct SpellArgs {
    /// Newline separated dictionary of lowercase words.
    #[arg(short, long, value_parser = value_parser!(PathBuf))]
    pub words: PathBuf,

    /// Maximal edit distance.
    #[arg(short = 'd', long, default_value_t = 1)]
    pub max_dist: usize,

    /// Words to look up.
    #[arg(required = true)]
    pub queries: Vec<String>,
}

impl Command {
    fn scoring(&self) -> Option<&ScoringArgs> {
        match self {
            Command::Align(args) => Some(&args.scoring),
            Command::NullDist(args) => Some(&args.scoring),
            Command::Compare(args) => Some(&args.scoring),
            Command::Spell(_) => None,
        }
    }
}

impl Cli {
    /// Run the selected command, writing results to `out`.
    pub fn run(&self, out: &mut impl Write) -> anyhow::Result<()> {
        if self.print_config {
            if let Some(scoring) = self.command.scoring() {
                writeln!(out, "{}", serde_json::to_string(scoring)?)?;
            }
        }
        match &self.command {
            Command::Align(args) => args.run(out),
            Command::NullDist(args) => args.run(out),
            Command::Compare(args) => args.run(out),
            Command::Spell(args) => args.run(out),
        }
    }
}

impl AlignArgs {
    fn run(&self, out: &mut impl Write) -> anyhow::Result<()> {
        let (x, y) = self.pair.read()?;
        let aligner = self.mode.aligner(self.scoring.scoring_matrix()?);
        debug!(
            mode = ?aligner.mode(),
            alphabet = %String::from_utf8_lossy(aligner.scoring_matrix().alphabet().symbols()),
            "aligning"
        );
        let alignment = aligner.align(&x, &y)?;
        writeln!(out, "{alignment}")?;
        if self.cigar {
            writeln!(out, "cigar {}", alignment.cigar())?;
        }
        Ok(())
    }
}

impl NullDistArgs {
    fn run(&self, out: &mut impl Write) -> anyhow::Result<()> {
        let (x, y) = self.pair.read()?;
        let sm = self.scoring.scoring_matrix()?;
        let observed = LocalAligner { sm: sm.clone() }.score(&x, &y)?;

        let seed = self.seed.unwrap_or_else(|| {
            let seed = ChaCha8Rng::from_entropy().gen_range(0..u64::MAX);
            info!("seed {seed}");
            seed
        });
        let dist = if self.par {
            NullDistribution::sample_par(&x, &y, &sm, self.trials, seed)?
        } else {
            let rng = &mut ChaCha8Rng::seed_from_u64(seed);
            NullDistribution::sample(&x, &y, &sm, self.trials, rng)?
        };

        let show = |v: Option<f64>| v.map_or("undefined".to_string(), |v| format!("{v:.4}"));
        writeln!(out, "observed {observed}")?;
        writeln!(out, "mean {}", show(dist.mean()))?;
        writeln!(out, "std-dev {}", show(dist.std_dev()))?;
        writeln!(out, "z-score {}", show(dist.z_score(observed)))?;
        for (score, count) in dist.counts() {
            writeln!(out, "{score}\t{count}")?;
        }

        if let Some(output) = &self.output {
            std::fs::write(output, serde_json::to_string_pretty(&dist)?)
                .with_context(|| format!("writing {}", output.display()))?;
        }
        Ok(())
    }
}

impl CompareArgs {
    fn run(&self, out: &mut impl Write) -> anyhow::Result<()> {
        let (x, y) = self.pair.read()?;
        let consensus = read_sequence(&self.consensus)
            .with_context(|| format!("reading {}", self.consensus.display()))?;
        let sm = self.scoring.scoring_matrix()?;

        let local = LocalAligner { sm: sm.clone() }.align(&x, &y)?;
        writeln!(out, "local {local}")?;

        let global = GlobalAligner { sm };
        for (name, part) in [("x", local.ungapped_x()), ("y", local.ungapped_y())] {
            let a = global.align(&part, &consensus)?;
            writeln!(out, "{name} vs consensus identity {:.2}%", a.identity() * 100.)?;
        }
        Ok(())
    }
}

impl SpellArgs {
    fn run(&self, out: &mut impl Write) -> anyhow::Result<()> {
        let words = read_words(&self.words)
            .with_context(|| format!("reading {}", self.words.display()))?;
        for query in &self.queries {
            let similar = check_spelling(query, self.max_dist, words.iter().map(String::as_str))?;
            writeln!(out, "{query}\t{}", similar.iter().sorted().join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    #[test]
    fn cli_test() {
        <super::Cli as clap::CommandFactory>::command().debug_assert();
    }
}
