//! Technical indicators for trend scoring.
//!
//! This crate provides:
//! - Series math (shrinking-window moving averages, rolling extremes,
//!   dispersion, true range, CCI)
//! - Signal indicators (MA crossovers, MACD, KDJ, RSI, Williams %R, CCI,
//!   bull/bear power, neural-smoothed RSI, Volume SuperTrend AI)
//! - The [`IndicatorAggregator`] that evaluates a configured set

pub mod aggregator;
pub mod momentum;
pub mod moving_average;
pub mod neural;
pub mod supertrend;
pub mod volatility;

pub use aggregator::{IndicatorAggregator, IndicatorResult};
pub use momentum::{cci, CciCross, Kdj, KdjLines, Macd, Rsi, WilliamsR};
pub use moving_average::{
    ema, hma, rma, rolling_sum, sma, sma_weighted, wma, MaKind, MovingAverageCross,
};
pub use neural::{NnRsiLines, NnSignalMode, NnTransformedRsi};
pub use supertrend::{SuperTrendLines, VolumeSuperTrendAi};
pub use volatility::{avedev, highest, lowest, ratr, stddev, true_range, BullBearPower};

use trend_core::traits::Indicator;

/// The default indicator set, in evaluation order.
pub fn default_indicators() -> Vec<Box<dyn Indicator>> {
    let mut indicators: Vec<Box<dyn Indicator>> = Vec::new();
    for kind in [MaKind::Sma, MaKind::Ema] {
        for period in [5, 10, 20, 50, 100, 200] {
            indicators.push(Box::new(MovingAverageCross::new(kind, period)));
        }
    }
    indicators.push(Box::new(CciCross::new(14)));
    indicators.push(Box::new(Macd::new(13, 34, 9)));
    indicators.push(Box::new(Kdj::default()));
    indicators.push(Box::new(Rsi::default()));
    indicators.push(Box::new(WilliamsR::new(14)));
    indicators.push(Box::new(BullBearPower::default()));
    indicators.push(Box::new(VolumeSuperTrendAi::default()));
    indicators.push(Box::new(NnTransformedRsi::default()));
    indicators
}

#[cfg(test)]
pub(crate) fn test_bars(closes: &[f64]) -> Vec<trend_core::PriceBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            trend_core::PriceBar::new(test_day(i), c, c + 1.0, c - 1.0, c, 1000.0)
        })
        .collect()
}

#[cfg(test)]
pub(crate) fn test_ohlc_bars(ohlc: &[(f64, f64, f64, f64)]) -> Vec<trend_core::PriceBar> {
    ohlc.iter()
        .enumerate()
        .map(|(i, &(o, h, l, c))| trend_core::PriceBar::new(test_day(i), o, h, l, c, 1000.0))
        .collect()
}

#[cfg(test)]
fn test_day(i: usize) -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + chrono::Duration::days(i as i64)
}
