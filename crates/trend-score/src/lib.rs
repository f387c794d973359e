//! Composite trend score.
//!
//! Combines indicator signal histories and strategy positions into one
//! 0-100 score per bar:
//! - time-decayed, importance-weighted indicator families (BASE / POWER)
//! - trend strength, persistence and volume-price confirmation factors
//! - strategy consensus
//! - z-score / CDF normalization, with min-max scaling for short batches
//!
//! [`ScoreModel::Normal`] swaps the composite for plain vote counts.

mod aggregator;
mod config;
pub mod decay;
pub mod factors;
pub mod normal;
pub mod normalize;
mod pipeline;
mod record;

pub use aggregator::TrendScoreAggregator;
pub use config::{ScoreConfig, ScoreModel};
pub use normalize::{normal_cdf, Normalized};
pub use pipeline::{TickerEvaluation, TickerEvaluator};
pub use record::{ScoreBatch, TrendScoreRecord};

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{Duration, NaiveDate};
    use trend_backtest::StrategyTradeStat;
    use trend_core::types::{IndicatorGroup, PriceBar, Signal};
    use trend_indicators::IndicatorResult;

    pub fn bars(closes: &[f64]) -> Vec<PriceBar> {
        let start = NaiveDate::from_ymd_opt(2021, 6, 1).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PriceBar::new(start + Duration::days(i as i64), c, c + 1.0, c - 1.0, c, 1000.0))
            .collect()
    }

    pub fn indicator(key: &str, group: IndicatorGroup, weight: f64, signals: Vec<Signal>) -> IndicatorResult {
        IndicatorResult {
            key: key.to_string(),
            group,
            weight,
            status: signals.last().copied().unwrap_or_default(),
            days: trend_core::types::trailing_run(&signals),
            signals,
            value: 0.0,
        }
    }

    pub fn strategy(key: &str, positions: Vec<Signal>) -> StrategyTradeStat {
        let mut stat = StrategyTradeStat::empty(key, 100_000.0);
        stat.positions = positions;
        stat
    }
}
