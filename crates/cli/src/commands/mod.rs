//! CLI commands for the MCC significance engine.

use anyhow::{anyhow, Context, Result};

pub mod observed;
pub mod simulate;

pub use observed::{run_observed, ObservedArgs};
pub use simulate::{run_simulate, SimulateArgs};

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    /// Parses an output format from string.
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!(
                "Unknown format: '{}'. Valid formats: text, json",
                s
            )),
        }
    }
}

/// Parses a comma-separated outcome vector such as `1,0,1,1`.
pub fn parse_observation(s: &str) -> Result<Vec<f64>> {
    s.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| {
            v.parse::<f64>()
                .with_context(|| format!("Invalid observation value '{v}'"))
        })
        .collect()
}
