//! CCI momentum strategy confirmed by the MACD histogram.

use serde::{Deserialize, Serialize};
use trend_core::{
    error::StrategyError,
    traits::{Strategy, StrategyConfig},
    types::{BarSeriesExt, PriceBar, Signal},
};
use trend_indicators::{cci, ema, Macd};

/// Configuration for the CCI-MACD strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CciMacdConfig {
    pub fast_period: usize,
    pub slow_period: usize,
    pub signal_period: usize,
    /// Steps the CCI sum must rise (or fall) in a row
    pub day_wait: usize,
}

impl Default for CciMacdConfig {
    fn default() -> Self {
        Self {
            fast_period: 13,
            slow_period: 34,
            signal_period: 9,
            day_wait: 2,
        }
    }
}

impl StrategyConfig for CciMacdConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.fast_period == 0 || self.fast_period >= self.slow_period {
            return Err(StrategyError::InvalidConfig(
                "Fast period must be positive and less than slow period".into(),
            ));
        }
        if self.signal_period == 0 || self.day_wait == 0 {
            return Err(StrategyError::InvalidConfig(
                "Signal period and day wait must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// CCI-MACD strategy.
///
/// The fast and slow CCIs are summed and smoothed with an EMA of the
/// signal period. Long when the smoothed sum and the MACD histogram both
/// rose on the bar and the raw sum rose on each of the last `day_wait`
/// steps; short on the mirror. Anything else is neutral.
pub struct CciMacdStrategy {
    config: CciMacdConfig,
}

impl CciMacdStrategy {
    pub fn new(config: CciMacdConfig) -> Self {
        Self { config }
    }
}

fn strictly_rising(data: &[f64], day: usize, steps: usize) -> bool {
    (day + 1 - steps..=day).all(|j| data[j] > data[j - 1])
}

fn strictly_falling(data: &[f64], day: usize, steps: usize) -> bool {
    (day + 1 - steps..=day).all(|j| data[j] < data[j - 1])
}

impl Strategy for CciMacdStrategy {
    fn key(&self) -> String {
        "CCI_MACD_strategy".to_string()
    }

    fn calculate(&self, bars: &[PriceBar]) -> Vec<Signal> {
        let cfg = &self.config;
        let fast = cci(bars, cfg.fast_period);
        let slow = cci(bars, cfg.slow_period);
        let sum: Vec<f64> = fast.iter().zip(slow.iter()).map(|(f, s)| f + s).collect();
        let smoothed = ema(&sum, cfg.signal_period);
        let hist = Macd::new(cfg.fast_period, cfg.slow_period, cfg.signal_period)
            .histogram(&bars.closes());

        (0..bars.len())
            .map(|i| {
                if i < cfg.day_wait {
                    return Signal::Neutral;
                }
                let smoothed_up = smoothed[i] > smoothed[i - 1];
                let smoothed_down = smoothed[i] < smoothed[i - 1];
                let hist_up = hist[i] > hist[i - 1];
                let hist_down = hist[i] < hist[i - 1];

                if smoothed_up && hist_up && strictly_rising(&sum, i, cfg.day_wait) {
                    Signal::Long
                } else if smoothed_down && hist_down && strictly_falling(&sum, i, cfg.day_wait) {
                    Signal::Short
                } else {
                    Signal::Neutral
                }
            })
            .collect()
    }

    fn params(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or_default()
    }

    fn description(&self) -> &str {
        "Rising CCI sum confirmed by a rising MACD histogram"
    }
}
