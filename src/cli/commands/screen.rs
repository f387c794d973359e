//! Screen command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use trend_core::types::Ticker;
use trend_screen::{FilterConfig, FilterEngine};
use trend_score::TickerEvaluator;

use crate::cli::{load_app_config, OutputFormat, ScreenArgs};

/// A ticker that passed the filter.
#[derive(Debug, Serialize)]
struct Candidate {
    id: i64,
    code: String,
    name: String,
    score: f64,
    close: f64,
}

pub async fn run(args: ScreenArgs, config_path: &Path) -> Result<()> {
    let config = load_app_config(config_path)?;

    let tickers_path = args
        .tickers
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.data.tickers_file));
    let kline_dir = args
        .data
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.data.kline_dir));

    let tickers = trend_data::load_tickers(&tickers_path)
        .with_context(|| format!("Failed to load tickers from {}", tickers_path.display()))?;
    info!(tickers = tickers.len(), dir = %kline_dir.display(), "Starting screen");

    let filter_config = if args.valuation {
        FilterConfig::valuation()
    } else if args.nine_turn {
        FilterConfig::nine_turn()
    } else {
        config.filter.clone()
    };
    let evaluator = Arc::new(TickerEvaluator::with_defaults(
        config.score.clone(),
        config.backtest.notional,
    )?);
    let filter = Arc::new(FilterEngine::new(filter_config));

    let mut set = JoinSet::new();
    for ticker in tickers {
        let evaluator = Arc::clone(&evaluator);
        let filter = Arc::clone(&filter);
        let path = trend_data::kline_path(&kline_dir, &ticker.code);
        set.spawn_blocking(move || screen_ticker(&evaluator, &filter, ticker, &path));
    }

    let mut candidates = Vec::new();
    let mut failed = 0usize;
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(Ok(Some(candidate))) => candidates.push(candidate),
            Ok(Ok(None)) => {}
            Ok(Err(e)) => {
                failed += 1;
                warn!("Skipping ticker: {:#}", e);
            }
            Err(e) => {
                failed += 1;
                warn!("Screen task failed: {}", e);
            }
        }
    }

    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    info!(passed = candidates.len(), failed = failed, "Screen finished");

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&candidates)?),
        OutputFormat::Text => {
            println!("Candidates ({})", candidates.len());
            println!("═══════════════════════════════════════════════════════════");
            for c in &candidates {
                println!("  {:<12} {:<20} {:>7.2} {:>10.2}", c.code, c.name, c.score, c.close);
            }
        }
    }

    if let Some(save_path) = &args.save {
        std::fs::write(save_path, serde_json::to_string_pretty(&candidates)?)?;
        info!("Candidates saved to {:?}", save_path);
    }

    Ok(())
}

fn screen_ticker(
    evaluator: &TickerEvaluator,
    filter: &FilterEngine,
    ticker: Ticker,
    path: &Path,
) -> Result<Option<Candidate>> {
    let bars = trend_data::load_csv(path)
        .with_context(|| format!("{}: failed to load {}", ticker.code, path.display()))?;
    let evaluation = evaluator
        .evaluate(ticker.id, &bars)
        .with_context(|| format!("{}: evaluation failed", ticker.code))?;

    let decision = filter.evaluate(&ticker, &bars, &evaluation.score_history());
    let Some(reason) = decision.reason() else {
        let score = evaluation.latest_score().map(|r| r.score).unwrap_or_default();
        let close = bars.last().map(|b| b.close).unwrap_or_default();
        return Ok(Some(Candidate {
            id: ticker.id,
            code: ticker.code,
            name: ticker.name,
            score,
            close,
        }));
    };

    debug!(code = %ticker.code, reason = %reason, "Rejected");
    Ok(None)
}
