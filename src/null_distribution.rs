//! Empirical null distribution of local alignment scores.
//!
//! To judge whether the local alignment score of `x` and `y` is significant,
//! `y` is shuffled many times and each shuffle is aligned against `x`. The
//! resulting scores approximate the distribution of scores between unrelated
//! sequences with the same composition.

use crate::aligners::{local_alignment, AlignmentMatrix, AlignmentMode, Seq};
use crate::error::Result;
use crate::scoring::{Score, ScoringMatrix};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Unnormalized score histogram: local alignment score -> number of trials.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NullDistribution {
    trials: usize,
    counts: BTreeMap<Score, usize>,
}

/// Score of the local alignment of `x` and `y`, as found by the traceback.
fn local_score(x: Seq, y: Seq, sm: &ScoringMatrix) -> Result<Score> {
    let am = AlignmentMatrix::build(x, y, sm, AlignmentMode::Local)?;
    Ok(local_alignment(x, y, sm, &am)?.score)
}

impl NullDistribution {
    /// Run `trials` trials, each aligning `seq_x` against a uniformly random
    /// permutation of `seq_y`.
    ///
    /// Permutations are drawn one after the other from `rng`, so a seeded rng
    /// gives a reproducible distribution.
    pub fn sample(
        seq_x: Seq,
        seq_y: Seq,
        sm: &ScoringMatrix,
        trials: usize,
        rng: &mut impl Rng,
    ) -> Result<Self> {
        debug!(trials, len_x = seq_x.len(), len_y = seq_y.len(), "sampling null distribution");
        let mut y = seq_y.to_vec();
        let mut dist = NullDistribution::default();
        for _ in 0..trials {
            y.shuffle(rng);
            dist.add(local_score(seq_x, &y, sm)?);
        }
        Ok(dist)
    }

    /// As `sample`, but trials run in parallel.
    ///
    /// Trial `t` shuffles with its own `ChaCha8Rng` seeded by `seed` on
    /// stream `t`, so the result only depends on `seed` and not on how the
    /// trials are scheduled. It differs from `sample` with the same seed.
    pub fn sample_par(
        seq_x: Seq,
        seq_y: Seq,
        sm: &ScoringMatrix,
        trials: usize,
        seed: u64,
    ) -> Result<Self> {
        debug!(trials, seed, "sampling null distribution in parallel");
        let scores = (0..trials)
            .into_par_iter()
            .map(|t| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                rng.set_stream(t as u64);
                let mut y = seq_y.to_vec();
                y.shuffle(&mut rng);
                local_score(seq_x, &y, sm)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(scores.into_iter().collect())
    }

    /// Record one trial.
    pub fn add(&mut self, score: Score) {
        self.trials += 1;
        *self.counts.entry(score).or_default() += 1;
    }

    /// Total number of trials. Always equal to the sum of all counts.
    pub fn trials(&self) -> usize {
        self.trials
    }

    /// Counts per score, in increasing score order.
    pub fn counts(&self) -> &BTreeMap<Score, usize> {
        &self.counts
    }

    /// Number of trials that ended with `score`.
    pub fn count(&self, score: Score) -> usize {
        self.counts.get(&score).copied().unwrap_or(0)
    }

    /// Mean score, or `None` without trials.
    pub fn mean(&self) -> Option<f64> {
        if self.trials == 0 {
            return None;
        }
        let sum: f64 = self
            .counts
            .iter()
            .map(|(&s, &c)| s as f64 * c as f64)
            .sum();
        Some(sum / self.trials as f64)
    }

    /// Population variance of the scores.
    pub fn variance(&self) -> Option<f64> {
        let mean = self.mean()?;
        let sum: f64 = self
            .counts
            .iter()
            .map(|(&s, &c)| c as f64 * (s as f64 - mean).powi(2))
            .sum();
        Some(sum / self.trials as f64)
    }

    pub fn std_dev(&self) -> Option<f64> {
        self.variance().map(f64::sqrt)
    }

    /// Number of standard deviations `observed` lies above the mean.
    ///
    /// `None` when there are no trials or all trials gave the same score, in
    /// which case the standard deviation is 0 and the z-score is undefined.
    pub fn z_score(&self, observed: Score) -> Option<f64> {
        let sd = self.std_dev()?;
        if sd == 0.0 {
            return None;
        }
        Some((observed as f64 - self.mean()?) / sd)
    }
}

impl FromIterator<Score> for NullDistribution {
    fn from_iter<T: IntoIterator<Item = Score>>(iter: T) -> Self {
        let mut dist = NullDistribution::default();
        for s in iter {
            dist.add(s);
        }
        dist
    }
}
