//! Evaluate command implementation.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;
use trend_backtest::{BacktestReport, StrategyEvaluator};
use trend_indicators::IndicatorAggregator;
use trend_score::{TickerEvaluation, TickerEvaluator, TrendScoreAggregator};
use trend_strategies::StrategyRegistry;

use crate::cli::{load_app_config, EvaluateArgs, OutputFormat};

pub async fn run(args: EvaluateArgs, config_path: &Path) -> Result<()> {
    let config = load_app_config(config_path)?;
    info!(ticker = %args.ticker, data = %args.data.display(), "Starting evaluation");

    let bars = trend_data::load_csv(&args.data)
        .with_context(|| format!("Failed to load {}", args.data.display()))?;

    let strategies = match &args.strategy {
        Some(name) => {
            let registry = StrategyRegistry::new();
            let strategy = match &args.strategy_config {
                Some(path) => {
                    let text = std::fs::read_to_string(path)
                        .with_context(|| format!("Failed to read {}", path.display()))?;
                    let value: serde_json::Value =
                        serde_json::from_str(&text).context("Strategy config is not valid JSON")?;
                    registry.create(name, value)
                }
                None => registry.create_default(name),
            }
            .context("Failed to create strategy")?;
            StrategyEvaluator::new(config.backtest.notional, vec![strategy])?
        }
        None => StrategyEvaluator::with_defaults(config.backtest.notional)?,
    };

    let evaluator = TickerEvaluator::new(
        IndicatorAggregator::with_defaults(),
        strategies,
        TrendScoreAggregator::new(config.score.clone()),
    );
    let evaluation = evaluator.evaluate(args.ticker_id, &bars)?;
    let report = BacktestReport::new(&args.ticker, bars.len(), evaluation.strategies.clone());

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&evaluation)?),
        OutputFormat::Text => {
            println!("{}", report.summary());
            println!("{}", score_summary(&evaluation));
        }
    }

    if let Some(save_path) = &args.save {
        std::fs::write(save_path, serde_json::to_string_pretty(&evaluation)?)?;
        info!("Results saved to {:?}", save_path);
    }
    if let Some(csv_path) = &args.trades_csv {
        std::fs::write(csv_path, report.trades_to_csv())?;
        info!("Trades exported to {:?}", csv_path);
    }

    Ok(())
}

fn score_summary(evaluation: &TickerEvaluation) -> String {
    let mut s = String::new();
    s.push_str("═══════════════════════════════════════════════════════════\n");
    s.push_str("                       TREND SCORE                          \n");
    s.push_str("═══════════════════════════════════════════════════════════\n");

    let Some(latest) = evaluation.latest_score() else {
        s.push_str("  No data\n");
        return s;
    };

    s.push_str(&format!("  Date:                {}\n", latest.time_key));
    s.push_str(&format!("  Score:               {:.2}\n", latest.score));
    s.push_str(&format!("  Raw Score:           {:.4}\n", latest.raw_score));
    if let Some(z) = latest.z_score {
        s.push_str(&format!("  Z-Score:             {:.3}\n", z));
    }
    s.push_str(&format!(
        "  MA / IN / Strategy:  {:.1} / {:.1} / {:.1}\n",
        latest.ma_score, latest.in_score, latest.strategy_score
    ));
    s.push_str(&format!(
        "  Strategies:          {} long / {} short\n",
        latest.strategy_buy, latest.strategy_sell
    ));
    s.push_str(&format!("  Trend Strength:      {:.4}\n", latest.trend_strength));
    s.push_str(&format!("  Persistence:         {:.2}\n", latest.trend_persistence));
    s.push_str(&format!("  Volume/Price:        {:.2}\n", latest.volume_price_confirm));
    s.push_str("───────────────────────────────────────────────────────────\n");

    for result in &evaluation.indicators {
        s.push_str(&format!(
            "  {:<28} {:>6} {:>4} days\n",
            result.key,
            format!("{:?}", result.status),
            result.days
        ));
    }
    s
}
