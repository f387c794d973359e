//! Validate configuration command.

use anyhow::Result;
use std::path::Path;
use trend_config::load_config;

pub async fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    };
    if let Err(e) = config.validate() {
        println!("Configuration error: {}", e);
        return Err(e.into());
    }

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!("K-line directory: {}", config.data.kline_dir);
    println!("Notional per trade: {:.2}", config.backtest.notional);
    println!(
        "Score: {:?} model, trend window {}, decay {} over {} bars, z-score above {} points",
        config.score.model,
        config.score.trend_window,
        config.score.time_decay_factor,
        config.score.time_decay_window,
        config.score.min_data_points
    );
    println!(
        "Filter: min turnover {:.0}, valuation {}, nine-turn {}",
        config.filter.min_turnover,
        if config.filter.valuation.is_some() { "on" } else { "off" },
        if config.filter.nine_turn.is_some() { "on" } else { "off" }
    );

    Ok(())
}
