//! Test Triage CLI - Main Entry Point

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use test_triage::commands::{
    self, AnalyzeArgs, DashboardArgs, ProvidersCommand, RecordArgs, SummaryArgs, TriageArgs,
};
use test_triage::models::settings::DEFAULT_CONFIG_PATH;
use test_triage::ConfigService;

/// Test Triage - log-driven UI test analysis
#[derive(Parser)]
#[command(name = "test-triage")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Config file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH, global = true)]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a root-cause or flakiness analysis over a record store
    Analyze(AnalyzeArgs),

    /// Aggregate failure statistics without calling a model
    Summary(SummaryArgs),

    /// Print dashboard data for a date window
    Dashboard(DashboardArgs),

    /// Ask the model about one failing test
    Triage(TriageArgs),

    /// Append one test record
    Record(RecordArgs),

    /// Inspect the configured model providers
    #[command(subcommand)]
    Providers(ProvidersCommand),
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout carries the JSON output
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = ConfigService::load(&cli.config)?;
    tracing::debug!(path = %config.config_path().display(), "Configuration ready");

    match cli.command {
        Commands::Analyze(args) => print_json(&commands::analysis::analyze(args, &config).await?)?,
        Commands::Summary(args) => print_json(&commands::analysis::summary(args, &config)?)?,
        Commands::Dashboard(args) => print_json(&commands::dashboard::dashboard(args, &config)?)?,
        Commands::Triage(args) => print_json(&commands::analysis::triage(args, &config).await?)?,
        Commands::Record(args) => print_json(&commands::record::record(args, &config)?)?,
        Commands::Providers(command) => {
            let status = commands::providers::providers(command, &config).await?;
            print_json(&status)?;
            if !status.healthy {
                anyhow::bail!("provider '{}' is not reachable", status.provider);
            }
        }
    }

    Ok(())
}
