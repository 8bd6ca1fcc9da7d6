//! Forecast scenarios: a fixed prediction vector and the true event probability.
//!
//! A scenario is built once per analysis and is immutable afterwards. Predictions are
//! assembled from category blocks, each block holding a constant probability:
//!
//! | Category             | Probability           |
//! |----------------------|-----------------------|
//! | insufficient data    | `default_probability` |
//! | confirmed negative   | `0.0`                 |
//! | confirmed positive   | `1.0`                 |
//! | neutral              | `default_probability` |

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::mcc::{matthews_correlation, true_positive_count};
use crate::results::TrialResult;

/// Number of events in each forecast category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBlocks {
    /// Events lacking data for a confident forecast.
    pub insufficient_data: usize,
    /// Events confidently forecast as "no larger event".
    pub confirmed_negative: usize,
    /// Events confidently forecast as "larger event".
    pub confirmed_positive: usize,
    /// Events with no directional signal.
    pub neutral: usize,
}

impl CategoryBlocks {
    /// Total number of events across all blocks.
    #[must_use]
    pub fn total(&self) -> usize {
        self.insufficient_data + self.confirmed_negative + self.confirmed_positive + self.neutral
    }
}

impl Default for CategoryBlocks {
    fn default() -> Self {
        Self {
            insufficient_data: 10,
            confirmed_negative: 3,
            confirmed_positive: 2,
            neutral: 8,
        }
    }
}

/// Fixed prediction vector paired with the probability used to draw observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    prediction: Vec<f64>,
    p_true: f64,
}

impl Scenario {
    /// Creates a scenario from an explicit prediction vector.
    #[must_use]
    pub fn new(prediction: Vec<f64>, p_true: f64) -> Self {
        Self { prediction, p_true }
    }

    /// Builds the prediction vector by concatenating category blocks in the order
    /// insufficient data, confirmed negative, confirmed positive, neutral.
    #[must_use]
    pub fn from_blocks(blocks: CategoryBlocks, default_probability: f64, p_true: f64) -> Self {
        let mut prediction = Vec::with_capacity(blocks.total());
        prediction.extend(std::iter::repeat(default_probability).take(blocks.insufficient_data));
        prediction.extend(std::iter::repeat(0.0).take(blocks.confirmed_negative));
        prediction.extend(std::iter::repeat(1.0).take(blocks.confirmed_positive));
        prediction.extend(std::iter::repeat(default_probability).take(blocks.neutral));
        Self::new(prediction, p_true)
    }

    /// Number of events.
    #[must_use]
    pub fn n(&self) -> usize {
        self.prediction.len()
    }

    /// The fixed prediction vector.
    #[must_use]
    pub fn prediction(&self) -> &[f64] {
        &self.prediction
    }

    /// Probability that any single event occurs in a synthetic observation.
    #[must_use]
    pub fn p_true(&self) -> f64 {
        self.p_true
    }

    /// Number of events predicted with probability exactly zero.
    #[must_use]
    pub fn zero_prediction_count(&self) -> usize {
        self.prediction.iter().filter(|&&p| p == 0.0).count()
    }

    /// Expected true-positive count of a single trial: `zeros * (1 - p_true)`.
    #[must_use]
    pub fn expected_true_positives(&self) -> f64 {
        self.zero_prediction_count() as f64 * (1.0 - self.p_true)
    }

    /// Draws one synthetic observation vector.
    ///
    /// Each entry is `1.0` iff a uniform draw in `[0, 1)` falls below `p_true`.
    pub fn draw_observation<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f64> {
        (0..self.n())
            .map(|_| if rng.gen::<f64>() < self.p_true { 1.0 } else { 0.0 })
            .collect()
    }

    /// Scores an observation vector against the prediction.
    ///
    /// Used both for synthetic draws and for the real observed outcomes whose MCC
    /// becomes the tail threshold.
    ///
    /// # Errors
    /// Returns `ShapeMismatch` if `observation` is not `n` entries long.
    pub fn evaluate(&self, observation: &[f64]) -> Result<TrialResult> {
        let mcc = matthews_correlation(&self.prediction, observation)?;
        let tp_count = true_positive_count(&self.prediction, observation)?;
        Ok(TrialResult { mcc, tp_count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimulationError;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn default_blocks_describe_23_events() {
        assert_eq!(CategoryBlocks::default().total(), 23);
    }

    #[test]
    fn from_blocks_concatenates_in_category_order() {
        let blocks = CategoryBlocks {
            insufficient_data: 2,
            confirmed_negative: 1,
            confirmed_positive: 1,
            neutral: 1,
        };
        let scenario = Scenario::from_blocks(blocks, 0.9, 0.8);

        assert_eq!(scenario.prediction(), &[0.9, 0.9, 0.0, 1.0, 0.9]);
        assert_eq!(scenario.n(), 5);
        assert_eq!(scenario.p_true(), 0.8);
    }

    #[test]
    fn zero_prediction_count_matches_confirmed_negatives() {
        let scenario = Scenario::from_blocks(CategoryBlocks::default(), 0.9, 0.9);
        assert_eq!(scenario.zero_prediction_count(), 3);
        let expected = scenario.expected_true_positives();
        assert!((expected - 0.3).abs() < 1e-12, "expected was {expected}");
    }

    #[test]
    fn draw_observation_is_binary_and_sized() {
        let scenario = Scenario::from_blocks(CategoryBlocks::default(), 0.9, 0.5);
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let s = scenario.draw_observation(&mut rng);

        assert_eq!(s.len(), 23);
        assert!(s.iter().all(|&v| v == 0.0 || v == 1.0));
    }

    #[test]
    fn draw_observation_respects_certain_probabilities() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let always = Scenario::new(vec![0.5; 10], 1.0).draw_observation(&mut rng);
        assert!(always.iter().all(|&v| v == 1.0));

        let never = Scenario::new(vec![0.5; 10], 0.0).draw_observation(&mut rng);
        assert!(never.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn evaluate_scores_observed_outcomes() {
        let scenario = Scenario::new(vec![0.0, 1.0, 0.9], 0.9);
        let result = scenario.evaluate(&[0.0, 0.0, 1.0]).unwrap();
        assert_eq!(result.tp_count, 1);
        assert!((-1.0..=1.0).contains(&result.mcc));
    }

    #[test]
    fn evaluate_rejects_wrong_length() {
        let scenario = Scenario::new(vec![0.0, 1.0], 0.9);
        assert!(matches!(
            scenario.evaluate(&[0.0]),
            Err(SimulationError::ShapeMismatch { .. })
        ));
    }
}
