use clap::{Parser, Subcommand};

mod commands;

use commands::{ObservedArgs, SimulateArgs};

#[derive(Parser)]
#[command(name = "quake-mcc")]
#[command(
    about = "Monte Carlo significance of the Matthews correlation for earthquake forecasts",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the Monte Carlo simulation and report tail probabilities
    Simulate(SimulateArgs),
    /// Score a real observation vector against the configured forecast
    Observed(ObservedArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only the report
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Simulate(args) => {
            commands::run_simulate(args).await?;
        }
        Commands::Observed(args) => {
            commands::run_observed(args)?;
        }
    }

    Ok(())
}
