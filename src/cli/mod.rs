//! CLI definitions.

pub mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use trend_config::AppConfig;

#[derive(Parser)]
#[command(name = "trendscore")]
#[command(author, version, about = "Trend scoring, strategy backtesting and ticker screening")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level
    #[arg(short, long, default_value = "info")]
    pub log_level: LogLevel,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    /// Also write rolling log files to this directory
    #[arg(long, env = "TRENDSCORE_LOG_DIR")]
    pub log_dir: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score one ticker and backtest every strategy on it
    Evaluate(EvaluateArgs),
    /// Score a ticker list and print the candidates that pass the filter
    Screen(ScreenArgs),
    /// List indicators, or show their latest signals for a data file
    Indicators(IndicatorsArgs),
    /// List available strategies
    Strategies,
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct EvaluateArgs {
    /// K-line CSV file
    #[arg(short, long)]
    pub data: PathBuf,

    /// Ticker code used in the report
    #[arg(short, long, default_value = "DATA")]
    pub ticker: String,

    /// Ticker id stamped on score records
    #[arg(long, default_value = "0")]
    pub ticker_id: i64,

    /// Backtest a single registered strategy instead of the default set
    #[arg(short, long)]
    pub strategy: Option<String>,

    /// Strategy configuration file (JSON)
    #[arg(long, requires = "strategy")]
    pub strategy_config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Save the full evaluation as JSON
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Export trade records as CSV
    #[arg(long)]
    pub trades_csv: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct ScreenArgs {
    /// Ticker metadata CSV (overrides config)
    #[arg(long)]
    pub tickers: Option<PathBuf>,

    /// K-line directory with one `<code>.csv` per ticker (overrides config)
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Use the valuation rule set instead of the configured filter
    #[arg(long)]
    pub valuation: bool,

    /// Use the nine-turn rule set instead of the configured filter
    #[arg(long, conflicts_with = "valuation")]
    pub nine_turn: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Save passing candidates as JSON
    #[arg(long)]
    pub save: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct IndicatorsArgs {
    /// K-line CSV file; lists the indicator set when omitted
    #[arg(short, long)]
    pub data: Option<PathBuf>,
}

/// Load and validate the configuration file.
pub fn load_app_config(path: &Path) -> Result<AppConfig> {
    let config = trend_config::load_config(path)
        .with_context(|| format!("Failed to load configuration {}", path.display()))?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}
