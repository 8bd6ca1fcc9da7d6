use serde::{Deserialize, Serialize};

use crate::monte_carlo::MonteCarloConfig;
use crate::scenario::{CategoryBlocks, Scenario};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scenario: ScenarioConfig,
    pub simulation: SimulationConfig,
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub insufficient_data: usize,
    pub confirmed_negative: usize,
    pub confirmed_positive: usize,
    pub neutral: usize,
    /// Probability assigned to insufficient-data and neutral events.
    pub default_probability: f64,
    /// Probability of an event in each synthetic observation.
    pub p_true: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub n_trials: usize,
    pub seed: Option<u64>,
    pub workers: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub thresholds: Vec<ThresholdConfig>,
    pub histogram_bins: usize,
    /// Tail queries with fewer qualifying trials than this are logged as unreliable.
    pub min_reliable_samples: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    pub min_true_positives: usize,
    pub observed_mcc: f64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        let blocks = CategoryBlocks::default();
        Self {
            insufficient_data: blocks.insufficient_data,
            confirmed_negative: blocks.confirmed_negative,
            confirmed_positive: blocks.confirmed_positive,
            neutral: blocks.neutral,
            default_probability: 0.90,
            p_true: 0.9,
        }
    }
}

impl ScenarioConfig {
    #[must_use]
    pub fn blocks(&self) -> CategoryBlocks {
        CategoryBlocks {
            insufficient_data: self.insufficient_data,
            confirmed_negative: self.confirmed_negative,
            confirmed_positive: self.confirmed_positive,
            neutral: self.neutral,
        }
    }

    #[must_use]
    pub fn build(&self) -> Scenario {
        Scenario::from_blocks(self.blocks(), self.default_probability, self.p_true)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let monte_carlo = MonteCarloConfig::default();
        Self {
            n_trials: monte_carlo.n_trials,
            seed: monte_carlo.seed,
            workers: 1,
        }
    }
}

impl SimulationConfig {
    #[must_use]
    pub fn monte_carlo(&self) -> MonteCarloConfig {
        MonteCarloConfig {
            n_trials: self.n_trials,
            seed: self.seed,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            thresholds: vec![
                ThresholdConfig {
                    min_true_positives: 0,
                    observed_mcc: 0.3,
                },
                ThresholdConfig {
                    min_true_positives: 1,
                    observed_mcc: 0.3,
                },
                ThresholdConfig {
                    min_true_positives: 2,
                    observed_mcc: 0.3,
                },
            ],
            histogram_bins: 40,
            min_reliable_samples: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scenario_has_23_events() {
        let scenario = AppConfig::default().scenario.build();
        assert_eq!(scenario.n(), 23);
        assert_eq!(scenario.zero_prediction_count(), 3);
        assert_eq!(scenario.p_true(), 0.9);
    }

    #[test]
    fn simulation_config_maps_to_monte_carlo() {
        let sim = SimulationConfig {
            n_trials: 10,
            seed: Some(3),
            workers: 2,
        };
        assert_eq!(sim.monte_carlo(), MonteCarloConfig::new(10).with_seed(3));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"simulation": {"n_trials": 5}}"#).unwrap();
        assert_eq!(config.simulation.n_trials, 5);
        assert_eq!(config.simulation.workers, 1);
        assert_eq!(config.scenario, ScenarioConfig::default());
        assert_eq!(config.analysis.histogram_bins, 40);
    }
}
