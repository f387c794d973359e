//! Trend scoring CLI application.

mod cli;
mod logging;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use logging::setup_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.log_level {
        cli::LogLevel::Trace => "trace",
        cli::LogLevel::Debug => "debug",
        cli::LogLevel::Info => "info",
        cli::LogLevel::Warn => "warn",
        cli::LogLevel::Error => "error",
    };
    let log_dir = cli.log_dir.clone().or_else(|| {
        trend_config::load_config(&cli.config)
            .ok()
            .and_then(|c| c.logging.file)
    });
    let _guard = setup_logging(log_level, cli.json_logs, log_dir.as_deref());

    // Execute command
    match cli.command {
        Commands::Evaluate(args) => cli::commands::evaluate::run(args, &cli.config).await,
        Commands::Screen(args) => cli::commands::screen::run(args, &cli.config).await,
        Commands::Indicators(args) => cli::commands::indicators::run(args).await,
        Commands::Strategies => cli::commands::strategies::run().await,
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config).await,
    }
}
