//! Moving averages and the price/MA crossover indicator.
//!
//! Every average here is defined from the first bar: before `period` points
//! exist the window shrinks to the points seen so far, and recursive
//! averages are seeded with the first data point.

use serde::{Deserialize, Serialize};
use std::fmt;
use trend_core::traits::{neutralize_warmup, Indicator, IndicatorOutput};
use trend_core::types::{BarSeriesExt, IndicatorGroup, PriceBar, Signal};

/// Simple moving average over `min(i + 1, period)` points.
pub fn sma(data: &[f64], period: usize) -> Vec<f64> {
    let period = period.max(1);
    let mut result = Vec::with_capacity(data.len());
    let mut sum = 0.0;

    for (i, &x) in data.iter().enumerate() {
        sum += x;
        if i >= period {
            sum -= data[i - period];
        }
        let window = (i + 1).min(period);
        result.push(sum / window as f64);
    }

    result
}

/// Exponential moving average, `(2x + (d - 1) prev) / (d + 1)` with `d = min(i + 1, period)`.
pub fn ema(data: &[f64], period: usize) -> Vec<f64> {
    let period = period.max(1);
    let mut result: Vec<f64> = Vec::with_capacity(data.len());

    for (i, &x) in data.iter().enumerate() {
        match result.last() {
            None => result.push(x),
            Some(&prev) => {
                let d = (i + 1).min(period) as f64;
                result.push((2.0 * x + (d - 1.0) * prev) / (d + 1.0));
            }
        }
    }

    result
}

/// Linearly weighted moving average; the newest point has weight `d`.
pub fn wma(data: &[f64], period: usize) -> Vec<f64> {
    let period = period.max(1);
    let mut result = Vec::with_capacity(data.len());

    for i in 0..data.len() {
        let d = (i + 1).min(period);
        let mut weighted = 0.0;
        for j in 0..d {
            weighted += data[i - j] * (d - j) as f64;
        }
        let norm = (d * (d + 1)) as f64 / 2.0;
        result.push(weighted / norm);
    }

    result
}

/// Weighted smoothing `(m x + (d - m) prev) / d`, the `SMA(X, N, M)` of
/// Chinese charting packages.
pub fn sma_weighted(data: &[f64], period: usize, weight: f64) -> Vec<f64> {
    let period = period.max(1);
    let mut result: Vec<f64> = Vec::with_capacity(data.len());

    for (i, &x) in data.iter().enumerate() {
        match result.last() {
            None => result.push(x),
            Some(&prev) => {
                let d = (i + 1).min(period) as f64;
                result.push((weight * x + (d - weight) * prev) / d);
            }
        }
    }

    result
}

/// Wilder's running moving average, seeded with the first point.
pub fn rma(data: &[f64], period: usize) -> Vec<f64> {
    let n = period.max(1) as f64;
    let mut result: Vec<f64> = Vec::with_capacity(data.len());

    for &x in data {
        match result.last() {
            None => result.push(x),
            Some(&prev) => result.push((x + (n - 1.0) * prev) / n),
        }
    }

    result
}

/// Hull moving average: `WMA(2 WMA(round(n/2)) - WMA(n), round(sqrt n))`.
///
/// `n/2` rounds half to even, so 5 gives 2 and 7 gives 4.
pub fn hma(data: &[f64], period: usize) -> Vec<f64> {
    let period = period.max(1);
    let half = wma(data, half_period(period));
    let full = wma(data, period);
    let diff: Vec<f64> = half
        .iter()
        .zip(full.iter())
        .map(|(h, f)| 2.0 * h - f)
        .collect();
    let sqrt_len = ((period as f64).sqrt().round() as usize).max(1);
    wma(&diff, sqrt_len)
}

fn half_period(period: usize) -> usize {
    let half = period / 2;
    if period % 2 == 1 && half % 2 == 1 {
        half + 1
    } else {
        half.max(1)
    }
}

/// Rolling sum over `min(i + 1, period)` points.
pub fn rolling_sum(data: &[f64], period: usize) -> Vec<f64> {
    let period = period.max(1);
    let mut result = Vec::with_capacity(data.len());
    let mut sum = 0.0;

    for (i, &x) in data.iter().enumerate() {
        sum += x;
        if i >= period {
            sum -= data[i - period];
        }
        result.push(sum);
    }

    result
}

/// Moving average flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MaKind {
    Sma,
    Ema,
    Wma,
    Rma,
}

impl MaKind {
    pub fn apply(self, data: &[f64], period: usize) -> Vec<f64> {
        match self {
            MaKind::Sma => sma(data, period),
            MaKind::Ema => ema(data, period),
            MaKind::Wma => wma(data, period),
            MaKind::Rma => rma(data, period),
        }
    }
}

impl fmt::Display for MaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MaKind::Sma => "SMA",
            MaKind::Ema => "EMA",
            MaKind::Wma => "WMA",
            MaKind::Rma => "RMA",
        };
        f.write_str(s)
    }
}

/// Price versus moving average.
///
/// Long while the close is above the average, short while below.
#[derive(Debug, Clone)]
pub struct MovingAverageCross {
    kind: MaKind,
    period: usize,
}

impl MovingAverageCross {
    /// Create a new crossover indicator with the specified period.
    pub fn new(kind: MaKind, period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { kind, period }
    }

    pub fn sma(period: usize) -> Self {
        Self::new(MaKind::Sma, period)
    }

    pub fn ema(period: usize) -> Self {
        Self::new(MaKind::Ema, period)
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for MovingAverageCross {
    fn key(&self) -> String {
        format!("{}{}_indicator", self.kind, self.period)
    }

    fn group(&self) -> IndicatorGroup {
        IndicatorGroup::Base
    }

    fn weight(&self) -> f64 {
        match self.kind {
            MaKind::Sma | MaKind::Ema => 0.9,
            MaKind::Wma | MaKind::Rma => 1.0,
        }
    }

    fn warmup_period(&self) -> usize {
        (self.period - 1).max(2)
    }

    fn calculate(&self, bars: &[PriceBar]) -> IndicatorOutput {
        let closes = bars.closes();
        let ma = self.kind.apply(&closes, self.period);

        let mut signals: Vec<Signal> = closes
            .iter()
            .zip(ma.iter())
            .map(|(c, m)| Signal::from_sign(c - m))
            .collect();
        neutralize_warmup(&mut signals, self.warmup_period());

        IndicatorOutput::new(signals, ma.last().copied().unwrap_or(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_bars;

    #[test]
    fn test_sma_shrinking_window() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = sma(&data, 3);

        assert_eq!(result.len(), 5);
        assert!((result[0] - 1.0).abs() < 1e-10);
        assert!((result[1] - 1.5).abs() < 1e-10);
        assert!((result[2] - 2.0).abs() < 1e-10);
        assert!((result[3] - 3.0).abs() < 1e-10);
        assert!((result[4] - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_ema_seeded_by_first_point() {
        let data = vec![10.0, 20.0, 30.0];
        let result = ema(&data, 3);

        assert!((result[0] - 10.0).abs() < 1e-10);
        // d = 2: (2 * 20 + 1 * 10) / 3
        assert!((result[1] - 50.0 / 3.0).abs() < 1e-10);
        // d = 3: (2 * 30 + 2 * prev) / 4
        assert!((result[2] - (60.0 + 2.0 * 50.0 / 3.0) / 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_ema_constant_series() {
        let data = vec![7.0; 50];
        assert!(ema(&data, 20).iter().all(|v| (v - 7.0).abs() < 1e-10));
    }

    #[test]
    fn test_wma() {
        let data = vec![1.0, 2.0, 3.0, 4.0];
        let result = wma(&data, 3);

        assert!((result[0] - 1.0).abs() < 1e-10);
        // (2 * 2 + 1 * 1) / 3
        assert!((result[1] - 5.0 / 3.0).abs() < 1e-10);
        // (3 * 3 + 2 * 2 + 1 * 1) / 6
        assert!((result[2] - 14.0 / 6.0).abs() < 1e-10);
        // (3 * 4 + 2 * 3 + 1 * 2) / 6
        assert!((result[3] - 20.0 / 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_sma_weighted() {
        let data = vec![0.0, 30.0, 60.0];
        let result = sma_weighted(&data, 3, 1.0);

        assert!((result[0] - 0.0).abs() < 1e-10);
        assert!((result[1] - 15.0).abs() < 1e-10);
        // (60 + 2 * 15) / 3
        assert!((result[2] - 30.0).abs() < 1e-10);
    }

    #[test]
    fn test_rma() {
        let data = vec![4.0, 8.0, 8.0];
        let result = rma(&data, 2);

        assert!((result[0] - 4.0).abs() < 1e-10);
        assert!((result[1] - 6.0).abs() < 1e-10);
        assert!((result[2] - 7.0).abs() < 1e-10);
    }

    #[test]
    fn test_hma_half_period_rounding() {
        assert_eq!(half_period(1), 1);
        assert_eq!(half_period(5), 2);
        assert_eq!(half_period(7), 4);
        assert_eq!(half_period(16), 8);

        let data: Vec<f64> = (0..30).map(|i| (i as f64 * 0.5).sin() * 10.0 + i as f64).collect();
        let diff: Vec<f64> = wma(&data, 4)
            .iter()
            .zip(wma(&data, 7).iter())
            .map(|(h, f)| 2.0 * h - f)
            .collect();
        let expected = wma(&diff, 3);
        let result = hma(&data, 7);
        for (r, e) in result.iter().zip(expected.iter()) {
            assert!((r - e).abs() < 1e-10);
        }
    }

    #[test]
    fn test_hma_tracks_linear_trend() {
        let data: Vec<f64> = (0..60).map(|i| i as f64).collect();
        let result = hma(&data, 16);
        // lag of WMA(n) on a line is (n - 1) / 3: 2 * 7/3 - 15/3 = -1/3, then 1 more from WMA(4)
        assert!((result[59] - (59.0 - 2.0 / 3.0)).abs() < 1e-6);
    }

    #[test]
    fn test_rolling_sum() {
        let data = vec![1.0, 2.0, 3.0, 4.0];
        assert_eq!(rolling_sum(&data, 2), vec![1.0, 3.0, 5.0, 7.0]);
    }

    #[test]
    fn test_empty_input() {
        assert!(sma(&[], 5).is_empty());
        assert!(ema(&[], 5).is_empty());
        assert!(wma(&[], 5).is_empty());
        assert!(rma(&[], 5).is_empty());
        assert!(hma(&[], 5).is_empty());
    }

    #[test]
    fn test_cross_indicator() {
        let indicator = MovingAverageCross::sma(5);
        assert_eq!(indicator.key(), "SMA5_indicator");
        assert_eq!(indicator.group(), IndicatorGroup::Base);
        assert!((indicator.weight() - 0.9).abs() < 1e-10);

        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let bars = test_bars(&closes);
        let out = indicator.calculate(&bars);

        assert_eq!(out.signals.len(), 30);
        assert!(out.signals[..4].iter().all(|s| s.is_neutral()));
        assert!(out.signals[4..].iter().all(|s| s.is_long()));
        // mean of 125..=129
        assert!((out.value - 127.0).abs() < 1e-10);
    }

    #[test]
    fn test_cross_indicator_downtrend() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 - i as f64).collect();
        let bars = test_bars(&closes);
        let out = MovingAverageCross::ema(10).calculate(&bars);

        assert!(out.signals[..9].iter().all(|s| s.is_neutral()));
        assert!(out.signals[9..].iter().all(|s| s.is_short()));
    }
}
