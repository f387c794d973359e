//! Trend score tuning constants.

use serde::{Deserialize, Serialize};
use trend_core::error::EngineError;

/// Which raw score rule the aggregator applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreModel {
    /// Decayed, weighted families plus price and volume factors
    #[default]
    Trend,
    /// Unweighted vote counts, z-scored above five bars
    Normal,
}

/// Trend score configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    pub model: ScoreModel,
    /// Lookback for the trend strength ratio
    pub trend_window: usize,
    /// Per-bar decay applied to older signals in the decay window
    pub time_decay_factor: f64,
    /// Trailing bars reweighted by time decay
    pub time_decay_window: usize,
    /// Batches longer than this use z-score normalization
    pub min_data_points: usize,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            model: ScoreModel::Trend,
            trend_window: 20,
            time_decay_factor: 0.95,
            time_decay_window: 10,
            min_data_points: 30,
        }
    }
}

impl ScoreConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.trend_window == 0 {
            return Err(EngineError::Validation(
                "score.trend_window must be greater than 0".into(),
            ));
        }
        if !(self.time_decay_factor > 0.0 && self.time_decay_factor <= 1.0) {
            return Err(EngineError::Validation(format!(
                "score.time_decay_factor must be in (0, 1], got {}",
                self.time_decay_factor
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_valid() {
        assert!(ScoreConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_decay() {
        let config = ScoreConfig {
            time_decay_factor: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_model_from_toml() {
        let config: ScoreConfig = toml::from_str("model = \"normal\"").unwrap();
        assert_eq!(config.model, ScoreModel::Normal);
        assert_eq!(config.trend_window, 20);
        assert_eq!(ScoreConfig::default().model, ScoreModel::Trend);
    }
}
