//! Per-trial results and the queries the reporting layer runs over them.
//!
//! Results are stored as two parallel sequences (`mcc` and `tp_count`) in draw order,
//! which is the shape histogram and threshold consumers expect.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};
use crate::stats::{wilson_ci, DistributionSummary, Histogram, Z_95};

/// Statistics derived from a single observation vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrialResult {
    /// Matthews correlation between prediction and observation.
    pub mcc: f64,
    /// Indices where prediction and observation are both zero.
    pub tp_count: usize,
}

/// Empirical tail probability for one `(min_true_positives, observed_mcc)` query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailEstimate {
    /// Minimum true-positive count a trial needs to qualify.
    pub min_true_positives: usize,
    /// Observed MCC the trials are compared against.
    pub observed_mcc: f64,
    /// Qualifying trials with MCC strictly above the observed value.
    pub exceeding: usize,
    /// Trials that passed the conditioning filter.
    pub qualifying: usize,
    /// `exceeding / qualifying`.
    pub fraction: f64,
    /// Wilson score interval (95%) on the fraction.
    pub confidence_interval: (f64, f64),
}

impl TailEstimate {
    /// Returns true if the observed MCC is significant at `alpha`.
    #[must_use]
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.fraction < alpha
    }
}

/// Ordered collection of trial results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrialResults {
    mcc: Vec<f64>,
    tp_count: Vec<usize>,
}

impl TrialResults {
    /// Creates an empty collection with room for `capacity` trials.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            mcc: Vec::with_capacity(capacity),
            tp_count: Vec::with_capacity(capacity),
        }
    }

    /// Appends one trial.
    pub fn push(&mut self, result: TrialResult) {
        self.mcc.push(result.mcc);
        self.tp_count.push(result.tp_count);
    }

    /// Number of trials.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mcc.len()
    }

    /// True when no trials were run.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mcc.is_empty()
    }

    /// MCC values in draw order.
    #[must_use]
    pub fn mcc_values(&self) -> &[f64] {
        &self.mcc
    }

    /// True-positive counts in draw order.
    #[must_use]
    pub fn tp_counts(&self) -> &[usize] {
        &self.tp_count
    }

    /// Iterates trials in draw order.
    pub fn iter(&self) -> impl Iterator<Item = TrialResult> + '_ {
        self.mcc
            .iter()
            .zip(self.tp_count.iter())
            .map(|(&mcc, &tp_count)| TrialResult { mcc, tp_count })
    }

    /// Concatenates partial collections, preserving the order they are given in.
    #[must_use]
    pub fn merge<I: IntoIterator<Item = TrialResults>>(parts: I) -> Self {
        let mut merged = Self::default();
        for part in parts {
            merged.mcc.extend(part.mcc);
            merged.tp_count.extend(part.tp_count);
        }
        merged
    }

    /// MCC values of trials with at least `min_tp` true positives.
    fn conditioned_mcc(&self, min_tp: usize) -> impl Iterator<Item = f64> + '_ {
        self.iter()
            .filter(move |t| t.tp_count >= min_tp)
            .map(|t| t.mcc)
    }

    /// Largest MCC among trials with at least `min_tp` true positives.
    #[must_use]
    pub fn max_mcc(&self, min_tp: usize) -> Option<f64> {
        self.conditioned_mcc(min_tp).reduce(f64::max)
    }

    /// Empirical one-sided tail probability of exceeding `observed_mcc`.
    ///
    /// Only trials with `tp_count >= min_tp` and `mcc > -1` count toward either side of
    /// the ratio. Perfectly anticorrelated trials (`mcc == -1`) are dropped from both.
    ///
    /// # Errors
    /// Returns [`SimulationError::EmptySample`] if no trial qualifies.
    pub fn exceedance_fraction(&self, min_tp: usize, observed_mcc: f64) -> Result<f64> {
        self.tail_estimate(min_tp, observed_mcc)
            .map(|estimate| estimate.fraction)
    }

    /// Same as [`exceedance_fraction`](Self::exceedance_fraction), with counts and a
    /// Wilson interval attached.
    ///
    /// # Errors
    /// Returns [`SimulationError::EmptySample`] if no trial qualifies.
    pub fn tail_estimate(&self, min_tp: usize, observed_mcc: f64) -> Result<TailEstimate> {
        let (exceeding, qualifying) = self
            .conditioned_mcc(min_tp)
            .filter(|&mcc| mcc > -1.0)
            .fold((0usize, 0usize), |(above, total), mcc| {
                (above + usize::from(mcc > observed_mcc), total + 1)
            });

        if qualifying == 0 {
            return Err(SimulationError::EmptySample {
                min_true_positives: min_tp,
            });
        }

        Ok(TailEstimate {
            min_true_positives: min_tp,
            observed_mcc,
            exceeding,
            qualifying,
            fraction: exceeding as f64 / qualifying as f64,
            confidence_interval: wilson_ci(exceeding, qualifying, Z_95),
        })
    }

    /// Mean true-positive count over all trials, `None` when empty.
    #[must_use]
    pub fn mean_tp_count(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        Some(self.tp_count.iter().sum::<usize>() as f64 / self.len() as f64)
    }

    /// Number of trials per true-positive count; index `i` holds the count for `tp == i`.
    #[must_use]
    pub fn tp_count_frequencies(&self) -> Vec<usize> {
        let max = self.tp_count.iter().copied().max().unwrap_or(0);
        let mut freq = vec![0; if self.is_empty() { 0 } else { max + 1 }];
        for &tp in &self.tp_count {
            freq[tp] += 1;
        }
        freq
    }

    /// Histogram of MCC values over `[-1, 1]` for trials with at least `min_tp` true
    /// positives.
    #[must_use]
    pub fn mcc_histogram(&self, bins: usize, min_tp: usize) -> Histogram {
        let values: Vec<f64> = self.conditioned_mcc(min_tp).collect();
        Histogram::from_values(&values, bins, -1.0, 1.0)
    }

    /// Distribution summary of MCC values for trials with at least `min_tp` true
    /// positives.
    #[must_use]
    pub fn mcc_summary(&self, min_tp: usize) -> DistributionSummary {
        let values: Vec<f64> = self.conditioned_mcc(min_tp).collect();
        DistributionSummary::from_values(&values)
    }
}

impl FromIterator<TrialResult> for TrialResults {
    fn from_iter<I: IntoIterator<Item = TrialResult>>(iter: I) -> Self {
        let mut results = Self::default();
        results.extend(iter);
        results
    }
}

impl Extend<TrialResult> for TrialResults {
    fn extend<I: IntoIterator<Item = TrialResult>>(&mut self, iter: I) {
        for result in iter {
            self.push(result);
        }
    }
}
