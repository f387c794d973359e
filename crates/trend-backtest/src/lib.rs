//! Strategy backtesting.
//!
//! Replays strategy positions against bar opens with a fixed notional per
//! trade and aggregates the completed trades into [`StrategyTradeStat`].

mod evaluator;
mod report;
mod simulator;
mod statistics;

pub use evaluator::StrategyEvaluator;
pub use report::BacktestReport;
pub use simulator::{BacktestSimulator, Leg, PositionState, DEFAULT_NOTIONAL};
pub use statistics::{round2, OpenPosition, StrategyTradeStat, TradeRecord};

#[cfg(test)]
pub(crate) fn test_bars_from_opens(opens: &[f64]) -> Vec<trend_core::PriceBar> {
    let start = chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    opens
        .iter()
        .enumerate()
        .map(|(i, &o)| {
            let day = start + chrono::Duration::days(i as i64);
            trend_core::PriceBar::new(day, o, o + 1.0, o - 1.0, o, 1000.0)
        })
        .collect()
}
