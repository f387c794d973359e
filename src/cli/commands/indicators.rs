//! Indicators command implementation.

use anyhow::{Context, Result};
use trend_core::traits::Indicator;
use trend_indicators::IndicatorAggregator;

use crate::cli::IndicatorsArgs;

pub async fn run(args: IndicatorsArgs) -> Result<()> {
    let aggregator = IndicatorAggregator::with_defaults();

    let Some(path) = &args.data else {
        println!("Available Indicators");
        println!("═══════════════════════════════════════════════════════════");
        println!("  {:<28} {:>6} {:>7} {:>7}", "Key", "Group", "Weight", "Warmup");
        for indicator in aggregator.indicators() {
            println!(
                "  {:<28} {:>6} {:>7.2} {:>7}",
                indicator.key(),
                format!("{:?}", indicator.group()),
                indicator.weight(),
                indicator.warmup_period()
            );
        }
        return Ok(());
    };

    let bars = trend_data::load_csv(path)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    let results = aggregator.evaluate(&bars)?;

    println!("Indicator Signals ({} bars)", bars.len());
    println!("═══════════════════════════════════════════════════════════");
    for result in &results {
        println!(
            "  {:<28} {:>8} {:>4} days  {:>12.4}",
            result.key,
            format!("{:?}", result.status),
            result.days,
            result.value
        );
    }
    Ok(())
}
