//! Bollinger double-line strategy.
//!
//! A trailing stop channel around the Bollinger mid band, `multiplier`
//! standard deviations wide.

use serde::{Deserialize, Serialize};
use tracing::trace;
use trend_core::{
    error::StrategyError,
    traits::{Strategy, StrategyConfig},
    types::{BarSeriesExt, PriceBar, Signal},
};
use trend_indicators::{sma, stddev};

use crate::channel::double_line_pos;

/// Configuration for the Bollinger double-line strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BollDlConfig {
    /// Mid band and deviation period
    pub period: usize,
    /// Standard deviations from the mid band
    pub multiplier: f64,
}

impl Default for BollDlConfig {
    fn default() -> Self {
        Self {
            period: 21,
            multiplier: 2.0,
        }
    }
}

impl StrategyConfig for BollDlConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.period < 2 {
            return Err(StrategyError::InvalidConfig(
                "Period must be at least 2".into(),
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

/// Bollinger double-line strategy.
pub struct BollDlStrategy {
    config: BollDlConfig,
}

impl BollDlStrategy {
    pub fn new(config: BollDlConfig) -> Self {
        Self { config }
    }
}

impl Strategy for BollDlStrategy {
    fn key(&self) -> String {
        "BOLL_DL_strategy".to_string()
    }

    fn calculate(&self, bars: &[PriceBar]) -> Vec<Signal> {
        let closes = bars.closes();
        let mid = sma(&closes, self.config.period);
        let width: Vec<f64> = stddev(&closes, self.config.period)
            .into_iter()
            .map(|d| d * self.config.multiplier)
            .collect();

        let positions = double_line_pos(&closes, &mid, &width);
        trace!(
            period = self.config.period,
            multiplier = self.config.multiplier,
            bars = positions.len(),
            "BOLL_DL positions computed"
        );
        positions
    }

    fn params(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or_default()
    }

    fn description(&self) -> &str {
        "Trailing stop channel around the Bollinger mid band"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_bars;

    #[test]
    fn test_config_validation() {
        assert!(BollDlConfig::default().validate().is_ok());
        assert!(BollDlConfig {
            period: 1,
            ..Default::default()
        }
        .validate()
        .is_err());
        assert!(BollDlConfig {
            multiplier: 0.0,
            ..Default::default()
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_trend_reversal() {
        // decline, rally, collapse
        let mut closes: Vec<f64> = (0..30).map(|i| 160.0 - i as f64 * 2.0).collect();
        closes.extend((0..30).map(|i| 100.0 + i as f64 * 3.0));
        closes.extend((0..30).map(|i| 190.0 - i as f64 * 5.0));

        let strategy = BollDlStrategy::new(BollDlConfig::default());
        let pos = strategy.calculate(&test_bars(&closes));

        assert_eq!(pos.len(), closes.len());
        assert_eq!(pos[0], Signal::Neutral);
        assert_eq!(pos[59], Signal::Long);
        assert_eq!(pos[89], Signal::Short);
    }

    #[test]
    fn test_multiplier_scales_band() {
        let closes: Vec<f64> = (0..80)
            .map(|i| 100.0 + (i as f64 * 0.3).sin() * 8.0 + i as f64 * 0.2)
            .collect();
        let bars = test_bars(&closes);
        let config = BollDlConfig {
            multiplier: 3.0,
            ..Default::default()
        };
        let width: Vec<f64> = stddev(&closes, config.period).iter().map(|d| d * 3.0).collect();
        let expected = double_line_pos(&closes, &sma(&closes, config.period), &width);

        assert_eq!(BollDlStrategy::new(config).calculate(&bars), expected);
    }

    #[test]
    fn test_params() {
        let strategy = BollDlStrategy::new(BollDlConfig::default());
        assert_eq!(strategy.params()["period"], 21);
        assert_eq!(strategy.key(), "BOLL_DL_strategy");
    }
}
