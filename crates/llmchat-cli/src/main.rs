// Binary entry point for llmchat-cli

mod args;
mod commands;
mod config;
mod constants;
mod output;
mod provider;
mod spinner;

use anyhow::Result;
use args::{Cli, CliConfig};
use clap::Parser;
use commands::Commands;
use output::OutputLevel;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let output_level = OutputLevel::from_flags(cli.quiet, cli.verbose);
    init_logging(output_level);

    if let Err(err) = run(cli, output_level).await {
        output::error(&format!("{err:#}"), output_level);
        std::process::exit(1);
    }
}

/// Logs go to stderr; `RUST_LOG` wins over the `--verbose`/`--quiet` default
fn init_logging(output_level: OutputLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(output_level.log_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Load configuration and dispatch to the requested sub-command.
async fn run(cli: Cli, output_level: OutputLevel) -> Result<()> {
    let cli_config = CliConfig::load()?;

    match &cli.command {
        Commands::Chat(args) => args.run(output_level, &cli_config).await,
        Commands::Models(args) => args.run(output_level, &cli_config).await,
        Commands::Keys(args) => args.run(output_level, &cli_config).await,
        Commands::History(args) => args.run(output_level, &cli_config).await,
        Commands::Info(args) => args.run(output_level, &cli_config).await,
    }
}
