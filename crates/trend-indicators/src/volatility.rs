//! Rolling extremes, dispersion, true range and the bull/bear power indicator.

use trend_core::traits::{neutralize_warmup, Indicator, IndicatorOutput};
use trend_core::types::{BarSeriesExt, IndicatorGroup, PriceBar, Signal};

use crate::moving_average::{rma, sma};

/// Rolling maximum over `min(i + 1, period)` points.
pub fn highest(data: &[f64], period: usize) -> Vec<f64> {
    rolling_extreme(data, period, f64::max)
}

/// Rolling minimum over `min(i + 1, period)` points.
pub fn lowest(data: &[f64], period: usize) -> Vec<f64> {
    rolling_extreme(data, period, f64::min)
}

fn rolling_extreme(data: &[f64], period: usize, pick: fn(f64, f64) -> f64) -> Vec<f64> {
    let period = period.max(1);
    (0..data.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(period);
            data[start..=i]
                .iter()
                .copied()
                .fold(data[i], pick)
        })
        .collect()
}

/// Population standard deviation around the shrinking-window SMA.
pub fn stddev(data: &[f64], period: usize) -> Vec<f64> {
    dispersion(data, period, |d| d * d).into_iter().map(f64::sqrt).collect()
}

/// Mean absolute deviation around the shrinking-window SMA.
pub fn avedev(data: &[f64], period: usize) -> Vec<f64> {
    dispersion(data, period, f64::abs)
}

fn dispersion(data: &[f64], period: usize, measure: fn(f64) -> f64) -> Vec<f64> {
    let period = period.max(1);
    let mean = sma(data, period);

    (0..data.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(period);
            let window = &data[start..=i];
            window.iter().map(|x| measure(x - mean[i])).sum::<f64>() / window.len() as f64
        })
        .collect()
}

/// True range per bar; the first bar uses its own high-low range.
pub fn true_range(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            let prev_close = if i > 0 { Some(bars[i - 1].close) } else { None };
            bar.true_range(prev_close)
        })
        .collect()
}

/// Wilder-smoothed average true range.
pub fn ratr(bars: &[PriceBar], period: usize) -> Vec<f64> {
    rma(&true_range(bars), period)
}

/// Bull/bear power: distance of the close from the rolling low minus its
/// distance from the rolling high, both in ATR units.
#[derive(Debug, Clone)]
pub struct BullBearPower {
    period: usize,
    atr_period: usize,
}

impl BullBearPower {
    pub fn new(period: usize, atr_period: usize) -> Self {
        assert!(period > 0 && atr_period > 0, "Periods must be greater than 0");
        Self { period, atr_period }
    }

    /// Per-bar power values.
    pub fn power(&self, bars: &[PriceBar]) -> Vec<f64> {
        let atr = ratr(bars, self.atr_period);
        let lows = lowest(&bars.lows(), self.period);
        let highs = highest(&bars.highs(), self.period);

        bars.iter()
            .enumerate()
            .map(|(i, bar)| {
                if atr[i] > 0.0 {
                    (bar.close - lows[i]) / atr[i] - (highs[i] - bar.close) / atr[i]
                } else {
                    0.0
                }
            })
            .collect()
    }
}

impl Default for BullBearPower {
    fn default() -> Self {
        Self::new(50, 5)
    }
}

impl Indicator for BullBearPower {
    fn key(&self) -> String {
        format!("BULL_BEAR_POWER({},{})_indicator", self.period, self.atr_period)
    }

    fn group(&self) -> IndicatorGroup {
        IndicatorGroup::Power
    }

    fn warmup_period(&self) -> usize {
        self.period.max(self.atr_period) - 1
    }

    fn calculate(&self, bars: &[PriceBar]) -> IndicatorOutput {
        let power = self.power(bars);
        let mut signals: Vec<Signal> = power.iter().map(|p| Signal::from_sign(*p)).collect();
        neutralize_warmup(&mut signals, self.warmup_period());

        IndicatorOutput::new(signals, power.last().copied().unwrap_or(0.0))
    }
}
