//! Descriptive statistics used to summarize Monte Carlo trial results.
//!
//! Provides the Wilson score interval for empirical tail fractions, a distribution
//! summary for MCC values, and fixed-width histogram binning.

use serde::{Deserialize, Serialize};

/// Z-score for a two-sided 95% interval.
pub const Z_95: f64 = 1.96;

/// Calculates the Wilson score confidence interval for a proportion.
///
/// Preferred over the normal approximation because Monte Carlo tail fractions are
/// frequently close to 0 or 1.
///
/// # Formula
/// ```text
/// CI = (p + z^2/(2n) +/- z * sqrt(p(1-p)/n + z^2/(4n^2))) / (1 + z^2/n)
/// ```
///
/// # Examples
/// ```
/// use quake_mcc_core::stats::wilson_ci;
///
/// let (lower, upper) = wilson_ci(50, 100, 1.96);
/// assert!(lower > 0.39 && lower < 0.41);
/// assert!(upper > 0.59 && upper < 0.61);
/// ```
#[must_use]
pub fn wilson_ci(successes: usize, n: usize, z: f64) -> (f64, f64) {
    if n == 0 {
        return (0.0, 0.0);
    }

    let n_f = n as f64;
    let p = successes as f64 / n_f;
    let z_sq = z * z;

    let denominator = 1.0 + z_sq / n_f;
    let center = p + z_sq / (2.0 * n_f);

    let variance_term = p * (1.0 - p) / n_f;
    let correction_term = z_sq / (4.0 * n_f * n_f);
    let spread = z * (variance_term + correction_term).sqrt();

    let lower = (center - spread) / denominator;
    let upper = (center + spread) / denominator;

    (lower.max(0.0), upper.min(1.0))
}

/// Nearest-rank percentile over an already sorted slice.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let n = sorted.len();
    let idx = (p * (n - 1) as f64).round() as usize;
    sorted[idx.min(n - 1)]
}

/// Summary statistics for a distribution of values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionSummary {
    /// Number of values summarized.
    pub count: usize,
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
    /// Mean value.
    pub mean: f64,
    /// Median value (50th percentile).
    pub median: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    /// Key percentiles (5th, 10th, 25th, 50th, 75th, 90th, 95th).
    pub percentiles: Vec<(f64, f64)>,
}

impl DistributionSummary {
    /// Creates a summary from a slice of values.
    #[must_use]
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::empty();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len();
        let mean = sorted.iter().sum::<f64>() / n as f64;
        let variance = sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
        let median = percentile(&sorted, 0.50);

        let percentiles = [0.05, 0.10, 0.25, 0.50, 0.75, 0.90, 0.95]
            .iter()
            .map(|&p| (p, percentile(&sorted, p)))
            .collect();

        Self {
            count: n,
            min: sorted[0],
            max: sorted[n - 1],
            mean,
            median,
            std_dev: variance.sqrt(),
            percentiles,
        }
    }

    /// Returns an empty summary.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            count: 0,
            min: 0.0,
            max: 0.0,
            mean: 0.0,
            median: 0.0,
            std_dev: 0.0,
            percentiles: vec![],
        }
    }

    /// Looks up a stored percentile, falling back to the median.
    #[must_use]
    pub fn percentile(&self, p: f64) -> f64 {
        self.percentiles
            .iter()
            .find(|(pct, _)| (pct - p).abs() < 0.001)
            .map_or(self.median, |&(_, value)| value)
    }
}

/// Fixed-width histogram over a closed range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// Bin edges, `counts.len() + 1` entries.
    pub edges: Vec<f64>,
    /// Number of values per bin.
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bins `values` into `bins` equal-width bins spanning `[lower, upper]`.
    ///
    /// The last bin is closed on the right so `upper` itself is counted. Values outside
    /// the range are dropped.
    #[must_use]
    pub fn from_values(values: &[f64], bins: usize, lower: f64, upper: f64) -> Self {
        let bins = bins.max(1);
        let width = (upper - lower) / bins as f64;
        let edges = (0..=bins).map(|i| lower + width * i as f64).collect();
        let mut counts = vec![0; bins];

        for &value in values {
            if !(lower..=upper).contains(&value) {
                continue;
            }
            let idx = ((value - lower) / width).floor() as usize;
            counts[idx.min(bins - 1)] += 1;
        }

        Self { edges, counts }
    }

    /// Total number of binned values.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============================================
    // wilson_ci Tests
    // ============================================

    #[test]
    fn wilson_ci_zero_samples() {
        assert_eq!(wilson_ci(0, 0, Z_95), (0.0, 0.0));
    }

    #[test]
    fn wilson_ci_small_sample_is_wide() {
        let (lower, upper) = wilson_ci(3, 5, Z_95);
        assert!(lower < 0.3, "lower was {lower}");
        assert!(upper > 0.8, "upper was {upper}");
    }

    #[test]
    fn wilson_ci_zero_successes_has_positive_upper_bound() {
        let (lower, upper) = wilson_ci(0, 1000, Z_95);
        assert!(lower < 1e-12, "lower was {lower}");
        assert!(upper > 0.0 && upper < 0.01, "upper was {upper}");
    }

    // ============================================
    // DistributionSummary Tests
    // ============================================

    #[test]
    fn summary_of_empty_values_is_empty() {
        let summary = DistributionSummary::from_values(&[]);
        assert_eq!(summary.count, 0);
        assert!(summary.percentiles.is_empty());
    }

    #[test]
    fn summary_has_expected_moments() {
        let summary = DistributionSummary::from_values(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(summary.count, 5);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 5.0);
        assert!((summary.mean - 3.0).abs() < 1e-12);
        assert_eq!(summary.median, 3.0);
        assert!((summary.std_dev - 2.0_f64.sqrt()).abs() < 1e-12);
        assert_eq!(summary.percentile(0.95), 5.0);
        assert_eq!(summary.percentile(0.05), 1.0);
    }

    #[test]
    fn summary_sorts_negative_values() {
        let summary = DistributionSummary::from_values(&[0.3, -0.5, 0.1]);
        assert_eq!(summary.min, -0.5);
        assert_eq!(summary.max, 0.3);
        assert_eq!(summary.median, 0.1);
    }

    // ============================================
    // Histogram Tests
    // ============================================

    #[test]
    fn histogram_includes_upper_edge() {
        let hist = Histogram::from_values(&[-1.0, 0.0, 1.0], 4, -1.0, 1.0);
        assert_eq!(hist.edges.len(), 5);
        assert_eq!(hist.counts, vec![1, 0, 1, 1]);
    }

    #[test]
    fn histogram_drops_out_of_range_values() {
        let hist = Histogram::from_values(&[-2.0, 0.5, 3.0], 2, 0.0, 1.0);
        assert_eq!(hist.total(), 1);
    }
}
