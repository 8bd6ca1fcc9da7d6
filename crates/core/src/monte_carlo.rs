//! Monte Carlo driver for MCC significance testing.
//!
//! Each trial draws a synthetic observation vector from i.i.d. Bernoulli(`p_true`)
//! outcomes, scores it against the scenario's fixed prediction, and records the MCC and
//! true-positive count. Every run is a self-contained call returning its own
//! [`TrialResults`]; nothing is accumulated across runs.
//!
//! # Example
//!
//! ```
//! use quake_mcc_core::monte_carlo::{MonteCarloConfig, MonteCarloSimulator};
//! use quake_mcc_core::scenario::{CategoryBlocks, Scenario};
//!
//! let scenario = Scenario::from_blocks(CategoryBlocks::default(), 0.90, 0.9);
//! let simulator = MonteCarloSimulator::new(MonteCarloConfig::new(1_000).with_seed(42));
//!
//! let results = simulator.run(&scenario).unwrap();
//! assert_eq!(results.len(), 1_000);
//! ```
//!
//! # Partitioned runs
//!
//! [`MonteCarloSimulator::run_partition`] splits the trials into `workers` slices. Every
//! slice uses the same seed on its own ChaCha stream, so slices never share random
//! numbers and the merged result is reproducible for a fixed `(seed, workers)` pair.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::results::{TrialResult, TrialResults};
use crate::scenario::Scenario;

/// Configuration for a Monte Carlo run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonteCarloConfig {
    /// Number of trials (`nreal`).
    pub n_trials: usize,
    /// Optional seed for reproducible results.
    pub seed: Option<u64>,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            n_trials: 100_000,
            seed: None,
        }
    }
}

impl MonteCarloConfig {
    /// Creates a configuration running `n_trials` trials.
    #[must_use]
    pub fn new(n_trials: usize) -> Self {
        Self {
            n_trials,
            ..Default::default()
        }
    }

    /// Sets a seed for reproducible simulations.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Runs trials against a fixed scenario.
pub struct MonteCarloSimulator {
    config: MonteCarloConfig,
    /// Resolved once so every partition of an unseeded run shares one base seed.
    base_seed: u64,
}

impl MonteCarloSimulator {
    /// Creates a new simulator with the given configuration.
    #[must_use]
    pub fn new(config: MonteCarloConfig) -> Self {
        let base_seed = config.seed.unwrap_or_else(rand::random);
        Self { config, base_seed }
    }

    /// Creates a simulator with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(MonteCarloConfig::default())
    }

    /// Returns a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &MonteCarloConfig {
        &self.config
    }

    /// Seed actually used for the random streams.
    #[must_use]
    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }

    /// Runs a single trial.
    ///
    /// # Errors
    /// Propagates `ShapeMismatch` from the estimator; cannot occur for draws produced by
    /// the scenario itself.
    pub fn run_trial<R: Rng + ?Sized>(scenario: &Scenario, rng: &mut R) -> Result<TrialResult> {
        let observation = scenario.draw_observation(rng);
        scenario.evaluate(&observation)
    }

    /// Runs `n_trials` trials with a caller-supplied random source.
    ///
    /// # Errors
    /// Propagates estimator errors.
    pub fn run_with_rng<R: Rng + ?Sized>(
        scenario: &Scenario,
        n_trials: usize,
        rng: &mut R,
    ) -> Result<TrialResults> {
        let mut results = TrialResults::with_capacity(n_trials);
        for _ in 0..n_trials {
            results.push(Self::run_trial(scenario, rng)?);
        }
        Ok(results)
    }

    /// Runs all configured trials on a single stream.
    ///
    /// # Errors
    /// Propagates estimator errors.
    pub fn run(&self, scenario: &Scenario) -> Result<TrialResults> {
        tracing::debug!(
            n = scenario.n(),
            p_true = scenario.p_true(),
            n_trials = self.config.n_trials,
            seed = self.base_seed,
            "starting monte carlo run"
        );

        let mut rng = ChaCha8Rng::seed_from_u64(self.base_seed);
        let results = Self::run_with_rng(scenario, self.config.n_trials, &mut rng)?;

        tracing::info!(
            n_trials = results.len(),
            mean_tp_count = results.mean_tp_count().unwrap_or(0.0),
            max_mcc = results.max_mcc(0).unwrap_or(0.0),
            "monte carlo run complete"
        );

        Ok(results)
    }

    /// Number of trials handled by partition `worker` out of `workers`.
    ///
    /// Trials are split as evenly as possible; the first `n_trials % workers`
    /// partitions take one extra trial.
    #[must_use]
    pub fn partition_size(&self, worker: usize, workers: usize) -> usize {
        let workers = workers.max(1);
        let base = self.config.n_trials / workers;
        let extra = self.config.n_trials % workers;
        if worker >= workers {
            0
        } else {
            base + usize::from(worker < extra)
        }
    }

    /// Runs one partition of the configured trials on its own random stream.
    ///
    /// Merging partitions `0..workers` with [`TrialResults::merge`] yields exactly
    /// `n_trials` results.
    ///
    /// # Errors
    /// Propagates estimator errors.
    pub fn run_partition(
        &self,
        scenario: &Scenario,
        worker: usize,
        workers: usize,
    ) -> Result<TrialResults> {
        let n_trials = self.partition_size(worker, workers);
        tracing::debug!(worker, workers, n_trials, "running partition");

        let mut rng = ChaCha8Rng::seed_from_u64(self.base_seed);
        rng.set_stream(worker as u64);
        Self::run_with_rng(scenario, n_trials, &mut rng)
    }
}
