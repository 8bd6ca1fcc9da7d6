//! Significance report assembled from a finished simulation.
//!
//! The report bundles what the plotting and narrative layer needs: the scenario, the MCC
//! distribution, a histogram, and one tail estimate per requested threshold pair. A
//! threshold whose conditioning filter matches no trial is kept as `Undefined` rather than
//! being reported as 0 or 1.

#![allow(clippy::format_push_string)]

use serde::{Deserialize, Serialize};

use crate::config::ThresholdConfig;
use crate::results::{TailEstimate, TrialResults};
use crate::scenario::Scenario;
use crate::stats::{DistributionSummary, Histogram};

/// Outcome of one tail query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TailOutcome {
    /// At least one trial qualified.
    Estimated(TailEstimate),
    /// No trial passed the conditioning filter.
    Undefined {
        min_true_positives: usize,
        observed_mcc: f64,
    },
}

/// Scenario facts echoed in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub n: usize,
    pub p_true: f64,
    pub zero_predictions: usize,
    pub expected_true_positives: f64,
}

/// Everything a consumer needs to present the significance analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignificanceReport {
    pub scenario: ScenarioSummary,
    pub n_trials: usize,
    pub seed: u64,
    pub mean_tp_count: Option<f64>,
    pub tp_count_frequencies: Vec<usize>,
    pub mcc_distribution: DistributionSummary,
    pub mcc_histogram: Histogram,
    pub tails: Vec<TailOutcome>,
}

impl SignificanceReport {
    /// Builds a report from simulation results.
    ///
    /// Tail queries qualifying fewer than `min_reliable_samples` trials are kept but
    /// logged as unreliable.
    #[must_use]
    pub fn build(
        scenario: &Scenario,
        results: &TrialResults,
        seed: u64,
        thresholds: &[ThresholdConfig],
        histogram_bins: usize,
        min_reliable_samples: usize,
    ) -> Self {
        let tails = thresholds
            .iter()
            .map(|threshold| {
                match results.tail_estimate(threshold.min_true_positives, threshold.observed_mcc) {
                    Ok(estimate) => {
                        if estimate.qualifying < min_reliable_samples {
                            tracing::warn!(
                                min_true_positives = threshold.min_true_positives,
                                qualifying = estimate.qualifying,
                                min_reliable_samples,
                                "tail estimate rests on few trials"
                            );
                        }
                        TailOutcome::Estimated(estimate)
                    }
                    Err(err) => {
                        tracing::warn!(%err, "tail estimate undefined");
                        TailOutcome::Undefined {
                            min_true_positives: threshold.min_true_positives,
                            observed_mcc: threshold.observed_mcc,
                        }
                    }
                }
            })
            .collect();

        Self {
            scenario: ScenarioSummary {
                n: scenario.n(),
                p_true: scenario.p_true(),
                zero_predictions: scenario.zero_prediction_count(),
                expected_true_positives: scenario.expected_true_positives(),
            },
            n_trials: results.len(),
            seed,
            mean_tp_count: results.mean_tp_count(),
            tp_count_frequencies: results.tp_count_frequencies(),
            mcc_distribution: results.mcc_summary(0),
            mcc_histogram: results.mcc_histogram(histogram_bins, 0),
            tails,
        }
    }

    /// Formats a boxed text report.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str("╔══════════════════════════════════════════════════════════════╗\n");
        output.push_str("║               MCC SIGNIFICANCE (MONTE CARLO)                 ║\n");
        output.push_str("╠══════════════════════════════════════════════════════════════╣\n");
        output.push_str(&format!("║  Events (n):                {:>32} ║\n", self.scenario.n));
        output.push_str(&format!(
            "║  True event probability:    {:>32.3} ║\n",
            self.scenario.p_true
        ));
        output.push_str(&format!(
            "║  Zero predictions:          {:>32} ║\n",
            self.scenario.zero_predictions
        ));
        output.push_str(&format!("║  Trials:                    {:>32} ║\n", self.n_trials));
        output.push_str(&format!("║  Seed:                      {:>32} ║\n", self.seed));
        output.push_str("╠══════════════════════════════════════════════════════════════╣\n");

        let mean_tp = self
            .mean_tp_count
            .map_or_else(|| "n/a".to_string(), |m| format!("{m:.4}"));
        output.push_str(&format!("║  Mean tp_count:             {mean_tp:>32} ║\n"));
        output.push_str(&format!(
            "║  Expected tp_count:         {:>32.4} ║\n",
            self.scenario.expected_true_positives
        ));
        let dist = &self.mcc_distribution;
        output.push_str(&format!("║  MCC mean:                  {:>32.4} ║\n", dist.mean));
        output.push_str(&format!("║  MCC std dev:               {:>32.4} ║\n", dist.std_dev));
        output.push_str(&format!("║  MCC max:                   {:>32.4} ║\n", dist.max));
        output.push_str(&format!(
            "║  MCC 95th percentile:       {:>32.4} ║\n",
            dist.percentile(0.95)
        ));
        output.push_str("╚══════════════════════════════════════════════════════════════╝\n");

        if !self.tails.is_empty() {
            output.push_str("\nTail probabilities P(MCC > t | tp_count >= k):\n");
            output.push_str("──────────────────────────────────────────────\n");
            for tail in &self.tails {
                match tail {
                    TailOutcome::Estimated(e) => output.push_str(&format!(
                        "  k={:<3} t={:<8.4} p={:.5}  [{:.5}, {:.5}]  ({}/{})\n",
                        e.min_true_positives,
                        e.observed_mcc,
                        e.fraction,
                        e.confidence_interval.0,
                        e.confidence_interval.1,
                        e.exceeding,
                        e.qualifying
                    )),
                    TailOutcome::Undefined {
                        min_true_positives,
                        observed_mcc,
                    } => output.push_str(&format!(
                        "  k={min_true_positives:<3} t={observed_mcc:<8.4} p=undefined (no qualifying trials)\n"
                    )),
                }
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::TrialResult;

    fn results() -> TrialResults {
        vec![
            TrialResult { mcc: 0.4, tp_count: 1 },
            TrialResult { mcc: -0.2, tp_count: 0 },
            TrialResult { mcc: 0.1, tp_count: 1 },
        ]
        .into_iter()
        .collect()
    }

    fn thresholds() -> Vec<ThresholdConfig> {
        vec![
            ThresholdConfig {
                min_true_positives: 1,
                observed_mcc: 0.2,
            },
            ThresholdConfig {
                min_true_positives: 5,
                observed_mcc: 0.2,
            },
        ]
    }

    #[test]
    fn report_marks_empty_filters_undefined() {
        let scenario = Scenario::new(vec![0.0, 1.0, 0.9], 0.9);
        let report = SignificanceReport::build(&scenario, &results(), 1, &thresholds(), 10, 100);

        assert_eq!(report.n_trials, 3);
        assert_eq!(report.tails.len(), 2);
        match &report.tails[0] {
            TailOutcome::Estimated(e) => {
                assert_eq!(e.qualifying, 2);
                assert_eq!(e.exceeding, 1);
            }
            other => panic!("Expected estimate, got {other:?}"),
        }
        assert!(matches!(
            report.tails[1],
            TailOutcome::Undefined {
                min_true_positives: 5,
                ..
            }
        ));
    }

    #[test]
    fn text_report_mentions_undefined_tail() {
        let scenario = Scenario::new(vec![0.0, 1.0, 0.9], 0.9);
        let text =
            SignificanceReport::build(&scenario, &results(), 1, &thresholds(), 10, 100).to_text();

        assert!(text.contains("MCC SIGNIFICANCE"));
        assert!(text.contains("p=0.50000"));
        assert!(text.contains("p=undefined"));
    }

    #[test]
    fn json_report_tags_tail_status() {
        let scenario = Scenario::new(vec![0.0, 1.0, 0.9], 0.9);
        let report = SignificanceReport::build(&scenario, &results(), 1, &thresholds(), 10, 100);

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains(r#""status":"estimated""#), "json was {json}");
        assert!(json.contains(r#""status":"undefined""#), "json was {json}");
    }
}
