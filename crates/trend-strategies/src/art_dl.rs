//! ATR double-line strategy.

use serde::{Deserialize, Serialize};
use trend_core::{
    error::StrategyError,
    traits::{Strategy, StrategyConfig},
    types::{BarSeriesExt, PriceBar, Signal},
};
use trend_indicators::ratr;

use crate::channel::double_line_pos;

/// Configuration for the ATR double-line strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtDlConfig {
    /// ATR smoothing period
    pub period: usize,
    /// ATR multiples between price and stop
    pub multiplier: f64,
}

impl Default for ArtDlConfig {
    fn default() -> Self {
        Self {
            period: 21,
            multiplier: 6.3,
        }
    }
}

impl StrategyConfig for ArtDlConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.period == 0 {
            return Err(StrategyError::InvalidConfig(
                "Period must be greater than 0".into(),
            ));
        }
        if !(self.multiplier > 0.0) {
            return Err(StrategyError::InvalidConfig(
                "Multiplier must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Chandelier-style stop channel `multiplier` ATRs from the close.
pub struct ArtDlStrategy {
    config: ArtDlConfig,
}

impl ArtDlStrategy {
    pub fn new(config: ArtDlConfig) -> Self {
        Self { config }
    }
}

impl Strategy for ArtDlStrategy {
    fn key(&self) -> String {
        "ART_DL_strategy".to_string()
    }

    fn calculate(&self, bars: &[PriceBar]) -> Vec<Signal> {
        let closes = bars.closes();
        let loss: Vec<f64> = ratr(bars, self.config.period)
            .into_iter()
            .map(|a| a * self.config.multiplier)
            .collect();

        double_line_pos(&closes, &closes, &loss)
    }

    fn params(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or_default()
    }

    fn description(&self) -> &str {
        "Trailing stop channel a multiple of ATR away from the close"
    }
}
