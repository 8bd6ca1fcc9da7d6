//! Monte Carlo significance testing of the Matthews correlation between an earthquake
//! forecast and Bernoulli-simulated outcomes.

pub mod config;
pub mod config_loader;
pub mod error;
pub mod mcc;
pub mod monte_carlo;
pub mod report;
pub mod results;
pub mod scenario;
pub mod stats;

pub use config::{AnalysisConfig, AppConfig, ScenarioConfig, SimulationConfig, ThresholdConfig};
pub use config_loader::ConfigLoader;
pub use error::{Result, SimulationError};
pub use mcc::{matthews_correlation, true_positive_count};
pub use monte_carlo::{MonteCarloConfig, MonteCarloSimulator};
pub use report::{SignificanceReport, TailOutcome};
pub use results::{TailEstimate, TrialResult, TrialResults};
pub use scenario::{CategoryBlocks, Scenario};
