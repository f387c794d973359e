//! Volume-weighted SuperTrend with a k-nearest-neighbour trend classifier.

use trend_core::traits::{neutralize_warmup, Indicator, IndicatorOutput};
use trend_core::types::{BarSeriesExt, IndicatorGroup, PriceBar, Signal};

use crate::moving_average::{rma, wma, MaKind};
use crate::volatility::true_range;

/// SuperTrend line and direction per bar.
#[derive(Debug, Clone, Default)]
pub struct SuperTrendLines {
    pub line: Vec<f64>,
    pub direction: Vec<Signal>,
}

/// Volume SuperTrend AI.
///
/// The SuperTrend bands are built around a volume-weighted moving average.
/// A weighted kNN over the last `n` SuperTrend values, labelled by whether
/// the price average sits above the SuperTrend average, classifies the
/// current trend and overrides contradicting directions on the last `n` bars.
#[derive(Debug, Clone)]
pub struct VolumeSuperTrendAi {
    length: usize,
    factor: f64,
    ma_kind: MaKind,
    k: usize,
    n: usize,
    price_length: usize,
    trend_length: usize,
}

impl VolumeSuperTrendAi {
    pub fn new(length: usize, factor: f64, ma_kind: MaKind, k: usize, n: usize) -> Self {
        assert!(length > 0 && k > 0, "Length and k must be greater than 0");
        Self {
            length,
            factor,
            ma_kind,
            k,
            n: n.max(k),
            price_length: 20,
            trend_length: 100,
        }
    }

    /// Override the WMA lengths used to label kNN samples.
    pub fn with_knn_lengths(mut self, price_length: usize, trend_length: usize) -> Self {
        self.price_length = price_length.max(1);
        self.trend_length = trend_length.max(1);
        self
    }

    /// Bars needed before any signal is produced.
    pub fn min_bars(&self) -> usize {
        self.length.max(self.price_length).max(self.trend_length) + self.n
    }

    fn vwma(&self, bars: &[PriceBar]) -> Vec<f64> {
        let closes = bars.closes();
        let volumes = bars.volumes();
        let value: Vec<f64> = closes.iter().zip(volumes.iter()).map(|(c, v)| c * v).collect();

        let num = self.ma_kind.apply(&value, self.length);
        let den = self.ma_kind.apply(&volumes, self.length);

        (0..closes.len())
            .map(|i| if den[i] > 0.0 { num[i] / den[i] } else { closes[i] })
            .collect()
    }

    pub fn supertrend(&self, bars: &[PriceBar]) -> SuperTrendLines {
        let len = bars.len();
        let center = self.vwma(bars);
        let atr = rma(&true_range(bars), self.length);

        let mut upper: Vec<f64> = (0..len).map(|i| center[i] + self.factor * atr[i]).collect();
        let mut lower: Vec<f64> = (0..len).map(|i| center[i] - self.factor * atr[i]).collect();
        let mut line = vec![0.0; len];
        let mut direction = vec![Signal::Neutral; len];

        for i in 1..len {
            let prev_close = bars[i - 1].close;
            if !(lower[i] > lower[i - 1] || prev_close < lower[i - 1]) {
                lower[i] = lower[i - 1];
            }
            if !(upper[i] < upper[i - 1] || prev_close > upper[i - 1]) {
                upper[i] = upper[i - 1];
            }

            let close = bars[i].close;
            direction[i] = if direction[i - 1].is_short() {
                // riding the upper band
                if close > upper[i] {
                    Signal::Long
                } else {
                    Signal::Short
                }
            } else if close < lower[i] {
                Signal::Short
            } else {
                Signal::Long
            };
            line[i] = if direction[i].is_long() { lower[i] } else { upper[i] };
        }

        SuperTrendLines { line, direction }
    }

    /// Weighted kNN vote; returns true for a bullish label.
    fn classify(&self, samples: &[f64], labels: &[bool], target: f64) -> bool {
        let mut order: Vec<(f64, bool)> = samples
            .iter()
            .zip(labels.iter())
            .map(|(s, l)| ((target - s).abs(), *l))
            .collect();
        order.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut weighted = 0.0;
        let mut total = 0.0;
        for (dist, label) in order.iter().take(self.k) {
            let w = 1.0 / (dist + 1e-6);
            if *label {
                weighted += w;
            }
            total += w;
        }

        total > 0.0 && weighted / total > 0.5
    }
}

impl Default for VolumeSuperTrendAi {
    fn default() -> Self {
        Self::new(10, 3.0, MaKind::Wma, 3, 10)
    }
}

impl Indicator for VolumeSuperTrendAi {
    fn key(&self) -> String {
        format!(
            "VOLUME_SUPERTREND_AI({},{},{},{},{})_indicator",
            self.length, self.factor, self.ma_kind, self.k, self.n
        )
    }

    fn group(&self) -> IndicatorGroup {
        IndicatorGroup::Power
    }

    fn warmup_period(&self) -> usize {
        self.length
    }

    fn calculate(&self, bars: &[PriceBar]) -> IndicatorOutput {
        let len = bars.len();
        if len < self.min_bars() {
            return IndicatorOutput::neutral(len);
        }

        let SuperTrendLines { line, direction } = self.supertrend(bars);
        let price_avg = wma(&bars.closes(), self.price_length);
        let trend_avg = wma(&line, self.trend_length);

        let tail = len - self.n;
        let labels: Vec<bool> = (tail..len).map(|i| price_avg[i] > trend_avg[i]).collect();
        let bullish = self.classify(&line[tail..], &labels, line[len - 1]);

        let mut signals: Vec<Signal> = (0..len)
            .map(|i| {
                let dir = direction[i];
                if i < tail {
                    dir
                } else if bullish && dir.is_short() {
                    Signal::Long
                } else if !bullish && dir.is_long() {
                    Signal::Short
                } else {
                    dir
                }
            })
            .collect();
        neutralize_warmup(&mut signals, self.warmup_period());

        IndicatorOutput::new(signals, line[len - 1])
    }
}
