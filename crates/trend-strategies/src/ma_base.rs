//! Moving-average base strategy.
//!
//! Goes long when the mid EMA is rising, the long EMA is not falling and
//! price is above its level `lookback` bars ago; goes short on the mirror
//! condition. The position holds between triggers.

use serde::{Deserialize, Serialize};
use trend_core::{
    error::StrategyError,
    traits::{Strategy, StrategyConfig},
    types::{BarSeriesExt, PriceBar, Signal},
};
use trend_indicators::ema;

/// Slope tolerance for the long EMA, as a fraction of its level.
const SLOPE_TOLERANCE: f64 = 0.001;

/// Configuration for the MA base strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MaBaseConfig {
    /// Bars back for the price comparison
    pub lookback: usize,
    /// Mid EMA period
    pub mid_period: usize,
    /// Long EMA period
    pub long_period: usize,
}

impl Default for MaBaseConfig {
    fn default() -> Self {
        Self {
            lookback: 13,
            mid_period: 21,
            long_period: 55,
        }
    }
}

impl StrategyConfig for MaBaseConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.lookback == 0 {
            return Err(StrategyError::InvalidConfig(
                "Lookback must be greater than 0".into(),
            ));
        }
        if self.mid_period == 0 || self.mid_period >= self.long_period {
            return Err(StrategyError::InvalidConfig(
                "Mid period must be positive and less than long period".into(),
            ));
        }
        Ok(())
    }
}

/// Moving-average base strategy.
pub struct MaBaseStrategy {
    config: MaBaseConfig,
}

impl MaBaseStrategy {
    pub fn new(config: MaBaseConfig) -> Self {
        Self { config }
    }
}

impl Strategy for MaBaseStrategy {
    fn key(&self) -> String {
        "MA_Base_strategy".to_string()
    }

    fn calculate(&self, bars: &[PriceBar]) -> Vec<Signal> {
        let closes = bars.closes();
        let mid = ema(&closes, self.config.mid_period);
        let long = ema(&closes, self.config.long_period);

        let mut positions = Vec::with_capacity(closes.len());
        let mut status = Signal::Neutral;
        for i in 0..closes.len() {
            if i < 2 {
                positions.push(Signal::Neutral);
                continue;
            }

            let close = closes[i];
            let base = if i > self.config.lookback {
                closes[i - self.config.lookback]
            } else {
                closes[0]
            };
            let slope = if long[i] > 0.0 {
                (long[i] - long[i - 1]) / long[i]
            } else {
                0.0
            };

            if slope > -SLOPE_TOLERANCE && mid[i - 1] < mid[i] && close > base {
                status = Signal::Long;
            }
            if slope < SLOPE_TOLERANCE && mid[i - 1] > mid[i] && close <= base {
                status = Signal::Short;
            }
            positions.push(status);
        }

        positions
    }

    fn params(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or_default()
    }

    fn description(&self) -> &str {
        "Follows the mid EMA direction filtered by the long EMA slope"
    }
}
