//! Neural-network smoothed RSI with adaptive standard deviation bands.

use serde::{Deserialize, Serialize};
use trend_core::traits::{neutralize_warmup, Indicator, IndicatorOutput};
use trend_core::types::{BarSeriesExt, IndicatorGroup, PriceBar, Signal};

use crate::moving_average::sma;

/// How smoothed RSI values map to signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NnSignalMode {
    /// Long above the center line, short below it.
    TrendFollowing,
    /// Long above the upper band, short below the lower band, neutral inside.
    Extremities,
}

/// Smoothed RSI with its band set.
#[derive(Debug, Clone, Default)]
pub struct NnRsiLines {
    pub value: Vec<f64>,
    pub center: Vec<f64>,
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
}

/// Simple neural-network transformed RSI.
///
/// An RSI over simple averages is passed through a single fixed-weight
/// layer (an equal-weight sum of the last `nn_length` values). Bands sit
/// `sd_mult` deviations from a rolling mean, or a rolling median when
/// `use_median` is set.
#[derive(Debug, Clone)]
pub struct NnTransformedRsi {
    rsi_length: usize,
    nn_length: usize,
    sd_lookback: usize,
    sd_mult: f64,
    use_median: bool,
    mode: NnSignalMode,
}

impl NnTransformedRsi {
    pub fn new(rsi_length: usize, nn_length: usize, sd_lookback: usize, sd_mult: f64) -> Self {
        assert!(
            rsi_length > 0 && nn_length > 0 && sd_lookback > 0,
            "Lengths must be greater than 0"
        );
        Self {
            rsi_length,
            nn_length,
            sd_lookback,
            sd_mult,
            use_median: false,
            mode: NnSignalMode::TrendFollowing,
        }
    }

    pub fn with_median(mut self, use_median: bool) -> Self {
        self.use_median = use_median;
        self
    }

    pub fn with_mode(mut self, mode: NnSignalMode) -> Self {
        self.mode = mode;
        self
    }

    fn rsi(&self, closes: &[f64]) -> Vec<f64> {
        let mut up = Vec::with_capacity(closes.len());
        let mut down = Vec::with_capacity(closes.len());
        for i in 0..closes.len() {
            let diff = if i == 0 { 0.0 } else { closes[i] - closes[i - 1] };
            up.push(diff.max(0.0));
            down.push((-diff).max(0.0));
        }

        let avg_up = sma(&up, self.rsi_length);
        let avg_down = sma(&down, self.rsi_length);

        (0..closes.len())
            .map(|i| {
                if i == 0 {
                    50.0
                } else if avg_down[i] > 0.0 {
                    100.0 - 100.0 / (1.0 + avg_up[i] / avg_down[i])
                } else {
                    100.0
                }
            })
            .collect()
    }

    fn smooth(&self, rsi: &[f64]) -> Vec<f64> {
        let w = 1.0 / self.nn_length as f64;
        (0..rsi.len())
            .map(|i| {
                let lookback = (i + 1).min(self.nn_length);
                (0..lookback).map(|j| rsi[i - j] * w).sum()
            })
            .collect()
    }

    fn rolling_median(&self, data: &[f64]) -> Vec<f64> {
        (0..data.len())
            .map(|i| {
                let start = (i + 1).saturating_sub(self.sd_lookback);
                let mut window = data[start..=i].to_vec();
                window.sort_by(|a, b| a.total_cmp(b));
                let mid = window.len() / 2;
                if window.len() % 2 == 0 {
                    (window[mid - 1] + window[mid]) / 2.0
                } else {
                    window[mid]
                }
            })
            .collect()
    }

    pub fn lines(&self, bars: &[PriceBar]) -> NnRsiLines {
        let value = self.smooth(&self.rsi(&bars.closes()));
        let center = if self.use_median {
            self.rolling_median(&value)
        } else {
            sma(&value, self.sd_lookback)
        };

        let mut upper = Vec::with_capacity(value.len());
        let mut lower = Vec::with_capacity(value.len());
        for i in 0..value.len() {
            let start = (i + 1).saturating_sub(self.sd_lookback);
            let window = &value[start..=i];
            let var = window.iter().map(|v| (v - center[i]).powi(2)).sum::<f64>()
                / window.len() as f64;
            let dev = self.sd_mult * var.sqrt();
            upper.push(center[i] + dev);
            lower.push(center[i] - dev);
        }

        NnRsiLines {
            value,
            center,
            upper,
            lower,
        }
    }
}

impl Default for NnTransformedRsi {
    fn default() -> Self {
        Self::new(14, 5, 365, 2.0)
    }
}

impl Indicator for NnTransformedRsi {
    fn key(&self) -> String {
        format!("NNTRSI({},{})_indicator", self.rsi_length, self.nn_length)
    }

    fn group(&self) -> IndicatorGroup {
        IndicatorGroup::Power
    }

    fn weight(&self) -> f64 {
        1.1
    }

    fn warmup_period(&self) -> usize {
        self.rsi_length.max(self.nn_length)
    }

    fn calculate(&self, bars: &[PriceBar]) -> IndicatorOutput {
        let lines = self.lines(bars);

        let mut signals: Vec<Signal> = (0..lines.value.len())
            .map(|i| {
                let v = lines.value[i];
                match self.mode {
                    NnSignalMode::TrendFollowing => {
                        let mid = if self.use_median { lines.center[i] } else { 50.0 };
                        if v > mid {
                            Signal::Long
                        } else {
                            Signal::Short
                        }
                    }
                    NnSignalMode::Extremities => {
                        if v > lines.upper[i] {
                            Signal::Long
                        } else if v < lines.lower[i] {
                            Signal::Short
                        } else {
                            Signal::Neutral
                        }
                    }
                }
            })
            .collect();
        neutralize_warmup(&mut signals, self.warmup_period());

        IndicatorOutput::new(signals, lines.value.last().copied().unwrap_or(0.0))
    }
}
