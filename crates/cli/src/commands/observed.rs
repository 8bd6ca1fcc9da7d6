//! Observed CLI command.
//!
//! Scores a real observation vector against the configured forecast, giving the MCC and
//! true-positive count to use as a tail threshold.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use quake_mcc_core::{ConfigLoader, Scenario, TrialResult};

use super::{parse_observation, OutputFormat};

/// Arguments for the observed command.
#[derive(Args, Debug, Clone)]
pub struct ObservedArgs {
    /// Observed outcomes, comma-separated (e.g. 1,1,0,1)
    #[arg(long)]
    pub observation: String,

    /// Config file path
    #[arg(short, long, default_value = "config/Config.toml")]
    pub config: String,

    /// Output format: text, json (default: text)
    #[arg(long, default_value = "text")]
    pub format: String,
}

#[derive(Debug, Serialize)]
struct ObservedSummary {
    n: usize,
    mcc: f64,
    tp_count: usize,
    threshold: String,
}

fn summarize(scenario: &Scenario, observed: TrialResult) -> ObservedSummary {
    ObservedSummary {
        n: scenario.n(),
        mcc: observed.mcc,
        tp_count: observed.tp_count,
        threshold: format!("{}:{}", observed.tp_count, observed.mcc),
    }
}

/// Runs the observed command.
///
/// # Errors
/// Returns an error if the config cannot be loaded, the observation cannot be parsed,
/// or its length differs from the scenario.
pub fn run_observed(args: ObservedArgs) -> Result<()> {
    let format = OutputFormat::parse(&args.format)?;
    let config = ConfigLoader::load(&args.config)?;
    let scenario = config.scenario.build();

    let observation = parse_observation(&args.observation)?;
    let summary = summarize(&scenario, scenario.evaluate(&observation)?);

    match format {
        OutputFormat::Text => {
            println!("Events:          {}", summary.n);
            println!("Observed MCC:    {:.6}", summary.mcc);
            println!("True positives:  {}", summary.tp_count);
            println!("Threshold pair:  --threshold {}", summary.threshold);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }

    Ok(())
}
