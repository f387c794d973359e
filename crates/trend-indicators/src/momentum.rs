//! Momentum and oscillator indicators.

use trend_core::traits::{neutralize_warmup, Indicator, IndicatorOutput};
use trend_core::types::{BarSeriesExt, IndicatorGroup, PriceBar, Signal};

use crate::moving_average::{ema, sma, sma_weighted};
use crate::volatility::{avedev, highest, lowest};

/// Commodity Channel Index over the typical price.
pub fn cci(bars: &[PriceBar], period: usize) -> Vec<f64> {
    let typical = bars.typical_prices();
    let mean = sma(&typical, period);
    let dev = avedev(&typical, period);

    typical
        .iter()
        .enumerate()
        .map(|(i, tp)| {
            if dev[i] > 0.0 {
                (tp - mean[i]) / (0.015 * dev[i])
            } else {
                0.0
            }
        })
        .collect()
}

/// Moving Average Convergence Divergence.
///
/// Long while the histogram `2 (DIF - DEA)` is positive.
#[derive(Debug, Clone)]
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Macd {
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Self {
        assert!(fast_period > 0, "Fast period must be greater than 0");
        assert!(slow_period > fast_period, "Slow period must be greater than fast");
        assert!(signal_period > 0, "Signal period must be greater than 0");
        Self {
            fast_period,
            slow_period,
            signal_period,
        }
    }

    /// Histogram values `2 (DIF - DEA)`.
    pub fn histogram(&self, closes: &[f64]) -> Vec<f64> {
        let fast = ema(closes, self.fast_period);
        let slow = ema(closes, self.slow_period);
        let dif: Vec<f64> = fast.iter().zip(slow.iter()).map(|(f, s)| f - s).collect();
        let dea = ema(&dif, self.signal_period);

        dif.iter().zip(dea.iter()).map(|(d, e)| (d - e) * 2.0).collect()
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new(13, 34, 9)
    }
}

impl Indicator for Macd {
    fn key(&self) -> String {
        format!(
            "MACD({},{},{})_indicator",
            self.fast_period, self.slow_period, self.signal_period
        )
    }

    fn group(&self) -> IndicatorGroup {
        IndicatorGroup::Power
    }

    fn weight(&self) -> f64 {
        1.2
    }

    fn warmup_period(&self) -> usize {
        self.slow_period - 1
    }

    fn calculate(&self, bars: &[PriceBar]) -> IndicatorOutput {
        let hist = self.histogram(&bars.closes());
        let mut signals: Vec<Signal> = hist.iter().map(|h| Signal::from_sign(*h)).collect();
        neutralize_warmup(&mut signals, self.warmup_period());

        IndicatorOutput::new(signals, hist.last().copied().unwrap_or(0.0))
    }
}

/// KDJ stochastic oscillator.
#[derive(Debug, Clone)]
pub struct Kdj {
    period: usize,
    k_smooth: usize,
    d_smooth: usize,
}

/// K, D and J lines.
#[derive(Debug, Clone, Default)]
pub struct KdjLines {
    pub k: Vec<f64>,
    pub d: Vec<f64>,
    pub j: Vec<f64>,
}

impl Kdj {
    pub fn new(period: usize, k_smooth: usize, d_smooth: usize) -> Self {
        assert!(
            period > 0 && k_smooth > 0 && d_smooth > 0,
            "Periods must be greater than 0"
        );
        Self {
            period,
            k_smooth,
            d_smooth,
        }
    }

    pub fn lines(&self, bars: &[PriceBar]) -> KdjLines {
        let lows = lowest(&bars.lows(), self.period);
        let highs = highest(&bars.highs(), self.period);

        let rsv: Vec<f64> = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| {
                let range = highs[i] - lows[i];
                if range > 0.0 {
                    (bar.close - lows[i]) / range * 100.0
                } else {
                    0.0
                }
            })
            .collect();

        let k = sma_weighted(&rsv, self.k_smooth, 1.0);
        let d = sma_weighted(&k, self.d_smooth, 1.0);
        let j = k.iter().zip(d.iter()).map(|(k, d)| 3.0 * k - 2.0 * d).collect();

        KdjLines { k, d, j }
    }
}

impl Default for Kdj {
    fn default() -> Self {
        Self::new(9, 3, 3)
    }
}

impl Indicator for Kdj {
    fn key(&self) -> String {
        format!(
            "KDJ({},{},{})_indicator",
            self.period, self.k_smooth, self.d_smooth
        )
    }

    fn group(&self) -> IndicatorGroup {
        IndicatorGroup::Power
    }

    fn warmup_period(&self) -> usize {
        (self.period - 1).max(2)
    }

    fn calculate(&self, bars: &[PriceBar]) -> IndicatorOutput {
        let KdjLines { k, d, j } = self.lines(bars);

        let mut signals: Vec<Signal> = (0..bars.len())
            .map(|i| {
                if j[i] > 100.0 && k[i] > 90.0 && d[i] > 80.0 {
                    Signal::Short
                } else if j[i] < 0.0 && k[i] < 10.0 && d[i] < 20.0 {
                    Signal::Long
                } else {
                    Signal::from_sign(j[i] - k[i])
                }
            })
            .collect();
        neutralize_warmup(&mut signals, self.warmup_period());

        IndicatorOutput::new(signals, j.last().copied().unwrap_or(0.0))
    }
}

/// Relative Strength Index with overbought/oversold banding.
///
/// Above 80 is overbought (short), 50..80 bullish, 20..50 bearish and
/// below 20 oversold (long).
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    /// RSI values; a window without movement reads 100.
    pub fn values(&self, closes: &[f64]) -> Vec<f64> {
        let mut up = Vec::with_capacity(closes.len());
        let mut moves = Vec::with_capacity(closes.len());
        for i in 0..closes.len() {
            let diff = if i == 0 { 0.0 } else { closes[i] - closes[i - 1] };
            up.push(diff.max(0.0));
            moves.push(diff.abs());
        }

        let avg_up = sma_weighted(&up, self.period, 1.0);
        let avg_move = sma_weighted(&moves, self.period, 1.0);

        avg_up
            .iter()
            .zip(avg_move.iter())
            .map(|(u, m)| if *m > 0.0 { u / m * 100.0 } else { 100.0 })
            .collect()
    }

    fn band(rsi: f64) -> Signal {
        if rsi > 80.0 {
            Signal::Short
        } else if rsi > 50.0 {
            Signal::Long
        } else if rsi > 20.0 {
            Signal::Short
        } else {
            Signal::Long
        }
    }
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(14)
    }
}

impl Indicator for Rsi {
    fn key(&self) -> String {
        format!("RSI{}_indicator", self.period)
    }

    fn group(&self) -> IndicatorGroup {
        IndicatorGroup::Power
    }

    fn weight(&self) -> f64 {
        1.1
    }

    fn warmup_period(&self) -> usize {
        self.period
    }

    fn calculate(&self, bars: &[PriceBar]) -> IndicatorOutput {
        let rsi = self.values(&bars.closes());
        let mut signals: Vec<Signal> = rsi.iter().map(|r| Self::band(*r)).collect();
        neutralize_warmup(&mut signals, self.warmup_period());

        IndicatorOutput::new(signals, rsi.last().copied().unwrap_or(0.0))
    }
}

/// Williams %R.
#[derive(Debug, Clone)]
pub struct WilliamsR {
    period: usize,
}

impl WilliamsR {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    /// %R values in [-100, 0]; a flat window reads -100.
    pub fn values(&self, bars: &[PriceBar]) -> Vec<f64> {
        let lows = lowest(&bars.lows(), self.period);
        let highs = highest(&bars.highs(), self.period);

        bars.iter()
            .enumerate()
            .map(|(i, bar)| {
                let range = highs[i] - lows[i];
                if range > 0.0 {
                    -100.0 * (highs[i] - bar.close) / range
                } else {
                    -100.0
                }
            })
            .collect()
    }
}

impl Default for WilliamsR {
    fn default() -> Self {
        Self::new(14)
    }
}

impl Indicator for WilliamsR {
    fn key(&self) -> String {
        format!("WMSR{}_indicator", self.period)
    }

    fn group(&self) -> IndicatorGroup {
        IndicatorGroup::Power
    }

    fn warmup_period(&self) -> usize {
        self.period - 1
    }

    fn calculate(&self, bars: &[PriceBar]) -> IndicatorOutput {
        let wr = self.values(bars);
        let mut signals: Vec<Signal> = wr.iter().map(|w| Signal::from_sign(w + 50.0)).collect();
        neutralize_warmup(&mut signals, self.warmup_period());

        IndicatorOutput::new(signals, wr.last().copied().unwrap_or(0.0))
    }
}

/// CCI level crossings.
///
/// Crossing -100, 0 or +100 upward turns long, the matching downward
/// crossings turn short, and the state holds in between.
#[derive(Debug, Clone)]
pub struct CciCross {
    period: usize,
}

impl CciCross {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    fn crossing(prev: f64, curr: f64) -> Option<Signal> {
        const LEVELS: [f64; 3] = [-100.0, 0.0, 100.0];

        if LEVELS.iter().any(|&l| prev < l && curr >= l) {
            Some(Signal::Long)
        } else if LEVELS.iter().any(|&l| prev > l && curr <= l) {
            Some(Signal::Short)
        } else {
            None
        }
    }
}

impl Default for CciCross {
    fn default() -> Self {
        Self::new(14)
    }
}

impl Indicator for CciCross {
    fn key(&self) -> String {
        format!("CCI{}_indicator", self.period)
    }

    fn group(&self) -> IndicatorGroup {
        IndicatorGroup::Power
    }

    fn warmup_period(&self) -> usize {
        (self.period - 1).max(2)
    }

    fn calculate(&self, bars: &[PriceBar]) -> IndicatorOutput {
        let values = cci(bars, self.period);
        let warmup = self.warmup_period();

        let mut signals = Vec::with_capacity(values.len());
        let mut state = Signal::Neutral;
        for i in 0..values.len() {
            if i >= warmup {
                if let Some(next) = Self::crossing(values[i - 1], values[i]) {
                    state = next;
                }
            }
            signals.push(if i < warmup { Signal::Neutral } else { state });
        }

        IndicatorOutput::new(signals, values.last().copied().unwrap_or(0.0))
    }
}
