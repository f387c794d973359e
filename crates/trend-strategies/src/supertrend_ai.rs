//! Volume SuperTrend AI as a standalone strategy.

use serde::{Deserialize, Serialize};
use trend_core::{
    error::StrategyError,
    traits::{Indicator, Strategy, StrategyConfig},
    types::{PriceBar, Signal},
};
use trend_indicators::{MaKind, VolumeSuperTrendAi};

/// Configuration for the Volume SuperTrend AI strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuperTrendAiConfig {
    pub length: usize,
    pub factor: f64,
    pub ma_kind: MaKind,
    /// Neighbours consulted by the classifier
    pub k: usize,
    /// Trailing SuperTrend samples the classifier draws from
    pub n: usize,
    /// Leading bars forced neutral
    pub confirm_days: usize,
}

impl Default for SuperTrendAiConfig {
    fn default() -> Self {
        Self {
            length: 10,
            factor: 3.0,
            ma_kind: MaKind::Wma,
            k: 3,
            n: 10,
            confirm_days: 2,
        }
    }
}

impl StrategyConfig for SuperTrendAiConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.length == 0 || self.k == 0 {
            return Err(StrategyError::InvalidConfig(
                "Length and k must be greater than 0".into(),
            ));
        }
        if !(self.factor > 0.0) {
            return Err(StrategyError::InvalidConfig(
                "Factor must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Volume SuperTrend AI strategy.
pub struct SuperTrendAiStrategy {
    config: SuperTrendAiConfig,
    indicator: VolumeSuperTrendAi,
}

impl SuperTrendAiStrategy {
    pub fn new(config: SuperTrendAiConfig) -> Self {
        let indicator =
            VolumeSuperTrendAi::new(config.length, config.factor, config.ma_kind, config.k, config.n);
        Self { config, indicator }
    }
}

impl Strategy for SuperTrendAiStrategy {
    fn key(&self) -> String {
        "VOLUME_SUPERTREND_AI_strategy".to_string()
    }

    fn calculate(&self, bars: &[PriceBar]) -> Vec<Signal> {
        if bars.len() < self.indicator.min_bars() {
            return vec![Signal::Neutral; bars.len()];
        }

        let mut signals = self.indicator.calculate(bars).signals;
        for s in signals.iter_mut().take(self.config.confirm_days) {
            *s = Signal::Neutral;
        }
        signals
    }

    fn params(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or_default()
    }

    fn description(&self) -> &str {
        "Volume-weighted SuperTrend with kNN trend classification"
    }
}
