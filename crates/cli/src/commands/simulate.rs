//! Simulate CLI command.
//!
//! Runs the Monte Carlo significance test for the configured scenario and prints a
//! report of tail probabilities for each requested threshold pair.

use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Args;
use serde::Serialize;

use quake_mcc_core::{
    AppConfig, ConfigLoader, MonteCarloSimulator, Scenario, SignificanceReport, ThresholdConfig,
    TrialResults,
};

use super::{parse_observation, OutputFormat};

/// Arguments for the simulate command.
#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Config file path
    #[arg(short, long, default_value = "config/Config.toml")]
    pub config: String,

    /// Config profile overlay (loads Config.<profile>.toml next to the config file)
    #[arg(long)]
    pub profile: Option<String>,

    /// Number of trials (overrides config)
    #[arg(long)]
    pub trials: Option<usize>,

    /// Random seed (overrides config)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of worker partitions (overrides config)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Threshold pair as K:T (minimum true positives : observed MCC). Repeatable;
    /// replaces the configured thresholds.
    #[arg(long = "threshold")]
    pub thresholds: Vec<String>,

    /// Observed outcome vector (comma-separated 0/1); adds its MCC and true-positive
    /// count as a threshold pair
    #[arg(long)]
    pub observation: Option<String>,

    /// Output format: text, json (default: text)
    #[arg(long, default_value = "text")]
    pub format: String,

    /// Write per-trial results to this CSV file
    #[arg(long)]
    pub export: Option<String>,
}

/// One exported CSV row.
#[derive(Debug, Serialize)]
struct TrialRow {
    trial: usize,
    mcc: f64,
    tp_count: usize,
}

/// Parses a `K:T` threshold pair.
pub fn parse_threshold(s: &str) -> Result<ThresholdConfig> {
    let (k, t) = s
        .split_once(':')
        .ok_or_else(|| anyhow!("Invalid threshold '{}'. Expected K:T, e.g. 2:0.35", s))?;

    let min_true_positives = k
        .trim()
        .parse()
        .with_context(|| format!("Invalid minimum true positives in '{s}'"))?;
    let observed_mcc = t
        .trim()
        .parse()
        .with_context(|| format!("Invalid observed MCC in '{s}'"))?;

    Ok(ThresholdConfig {
        min_true_positives,
        observed_mcc,
    })
}

/// Applies command-line overrides on top of the loaded configuration.
fn apply_overrides(mut config: AppConfig, args: &SimulateArgs) -> Result<AppConfig> {
    if let Some(trials) = args.trials {
        config.simulation.n_trials = trials;
    }
    if let Some(seed) = args.seed {
        config.simulation.seed = Some(seed);
    }
    if let Some(workers) = args.workers {
        config.simulation.workers = workers;
    }
    if !args.thresholds.is_empty() {
        config.analysis.thresholds = args
            .thresholds
            .iter()
            .map(|s| parse_threshold(s))
            .collect::<Result<_>>()?;
    }
    Ok(config)
}

/// Runs all partitions on blocking tasks and merges them in partition order.
async fn run_partitioned(
    simulator: Arc<MonteCarloSimulator>,
    scenario: Arc<Scenario>,
    workers: usize,
) -> Result<TrialResults> {
    let handles: Vec<_> = (0..workers)
        .map(|worker| {
            let simulator = Arc::clone(&simulator);
            let scenario = Arc::clone(&scenario);
            tokio::task::spawn_blocking(move || {
                simulator.run_partition(&scenario, worker, workers)
            })
        })
        .collect();

    let mut parts = Vec::with_capacity(workers);
    for handle in handles {
        let part = handle.await.context("Simulation worker panicked")??;
        parts.push(part);
    }

    Ok(TrialResults::merge(parts))
}

/// Writes the two parallel sequences as `trial,mcc,tp_count` rows.
pub fn export_csv(path: impl AsRef<Path>, results: &TrialResults) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;

    for (trial, result) in results.iter().enumerate() {
        writer.serialize(TrialRow {
            trial,
            mcc: result.mcc,
            tp_count: result.tp_count,
        })?;
    }
    writer.flush()?;

    tracing::info!("Exported {} trials to {}", results.len(), path.display());
    Ok(())
}

/// Runs the simulate command.
///
/// # Errors
/// Returns an error if configuration, arguments, simulation, or export fail.
pub async fn run_simulate(args: SimulateArgs) -> Result<()> {
    let format = OutputFormat::parse(&args.format)?;

    let loaded = match &args.profile {
        Some(profile) => ConfigLoader::load_with_profile(&args.config, profile)?,
        None => ConfigLoader::load(&args.config)?,
    };
    let mut config = apply_overrides(loaded, &args)?;

    let scenario = Arc::new(config.scenario.build());

    if let Some(observation) = &args.observation {
        let observed = scenario.evaluate(&parse_observation(observation)?)?;
        tracing::info!(
            "Observed MCC {:.4} with {} true positives",
            observed.mcc,
            observed.tp_count
        );
        config.analysis.thresholds.push(ThresholdConfig {
            min_true_positives: observed.tp_count,
            observed_mcc: observed.mcc,
        });
    }

    let workers = config.simulation.workers.max(1);
    let simulator = Arc::new(MonteCarloSimulator::new(config.simulation.monte_carlo()));

    tracing::info!(
        "Simulating {} trials over {} events (p_true = {}, seed = {}, workers = {})",
        config.simulation.n_trials,
        scenario.n(),
        scenario.p_true(),
        simulator.base_seed(),
        workers
    );

    let results = if workers == 1 {
        simulator.run(&scenario)?
    } else {
        run_partitioned(Arc::clone(&simulator), Arc::clone(&scenario), workers).await?
    };

    if let Some(path) = &args.export {
        export_csv(path, &results)?;
    }

    let report = SignificanceReport::build(
        &scenario,
        &results,
        simulator.base_seed(),
        &config.analysis.thresholds,
        config.analysis.histogram_bins,
        config.analysis.min_reliable_samples,
    );

    match format {
        OutputFormat::Text => println!("{}", report.to_text()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quake_mcc_core::MonteCarloConfig;

    fn args() -> SimulateArgs {
        SimulateArgs {
            config: "does-not-exist.toml".to_string(),
            profile: None,
            trials: None,
            seed: None,
            workers: None,
            thresholds: vec![],
            observation: None,
            format: "text".to_string(),
            export: None,
        }
    }

    #[test]
    fn parse_threshold_accepts_pair() {
        let threshold = parse_threshold("2:0.35").unwrap();
        assert_eq!(threshold.min_true_positives, 2);
        assert!((threshold.observed_mcc - 0.35).abs() < f64::EPSILON);
    }

    #[test]
    fn parse_threshold_accepts_negative_mcc() {
        let threshold = parse_threshold(" 0 : -0.2 ").unwrap();
        assert_eq!(threshold.min_true_positives, 0);
        assert!((threshold.observed_mcc + 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn parse_threshold_rejects_malformed_input() {
        assert!(parse_threshold("2").is_err());
        assert!(parse_threshold("x:0.3").is_err());
        assert!(parse_threshold("2:abc").is_err());
    }

    #[test]
    fn overrides_replace_config_values() {
        let mut a = args();
        a.trials = Some(10);
        a.seed = Some(5);
        a.workers = Some(3);
        a.thresholds = vec!["1:0.2".to_string()];

        let config = apply_overrides(AppConfig::default(), &a).unwrap();

        assert_eq!(config.simulation.n_trials, 10);
        assert_eq!(config.simulation.seed, Some(5));
        assert_eq!(config.simulation.workers, 3);
        assert_eq!(config.analysis.thresholds.len(), 1);
    }

    #[test]
    fn no_overrides_keep_config() {
        let config = apply_overrides(AppConfig::default(), &args()).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn partitioned_run_is_reproducible_and_complete() {
        let scenario = Arc::new(AppConfig::default().scenario.build());
        let config = MonteCarloConfig::new(999).with_seed(17);

        let first = run_partitioned(
            Arc::new(MonteCarloSimulator::new(config.clone())),
            Arc::clone(&scenario),
            3,
        )
        .await
        .unwrap();
        let second = run_partitioned(
            Arc::new(MonteCarloSimulator::new(config)),
            Arc::clone(&scenario),
            3,
        )
        .await
        .unwrap();

        assert_eq!(first.len(), 999);
        assert_eq!(first, second);
    }

    #[test]
    fn export_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trials.csv");
        let scenario = AppConfig::default().scenario.build();
        let results = MonteCarloSimulator::new(MonteCarloConfig::new(5).with_seed(1))
            .run(&scenario)
            .unwrap();

        export_csv(&path, &results).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "trial,mcc,tp_count");
        assert_eq!(lines.len(), 6);
        assert!(lines[1].starts_with("0,"));
    }
}
