//! Screening rule configuration.

use serde::{Deserialize, Serialize};
use trend_core::error::EngineError;

/// Valuation limits applied by the valuation screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuationBounds {
    /// Exclusive lower bound on trailing P/E
    pub pe_min: f64,
    /// Exclusive upper bound on trailing P/E
    pub pe_max: f64,
    /// Inclusive upper bound on P/B
    pub pb_max: f64,
    /// Inclusive upper bound on `close * total_share`
    pub market_cap_max: f64,
}

impl Default for ValuationBounds {
    fn default() -> Self {
        Self {
            pe_min: 0.0,
            pe_max: 25.0,
            pb_max: 25.0,
            market_cap_max: 50e9,
        }
    }
}

/// Nine-turn reversal rule. Replaces the channel and weekly checks.
///
/// The up run counts trailing closes above the close `lookback` bars
/// earlier; the down run counts trailing closes below it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NineTurnRule {
    /// Shorter histories never pass
    pub min_bars: usize,
    pub lookback: usize,
    /// Inclusive lower bound on the up run
    pub up_min: usize,
    /// Exclusive upper bound on the up run
    pub up_max: usize,
    /// A down run of exactly this length also passes
    pub down_exact: usize,
}

impl Default for NineTurnRule {
    fn default() -> Self {
        Self {
            min_bars: 9,
            lookback: 4,
            up_min: 2,
            up_max: 5,
            down_exact: 9,
        }
    }
}

/// Filter engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Ticker code prefixes that never pass
    pub excluded_prefixes: Vec<String>,
    /// Valuation limits; `None` skips the valuation check
    pub valuation: Option<ValuationBounds>,
    /// SMA window over daily turnover
    pub turnover_window: usize,
    /// Minimum average turnover
    pub min_turnover: f64,
    /// Consecutive down closes that waive the turnover floor
    pub capitulation_bars: usize,
    pub score_short: usize,
    pub score_mid: usize,
    pub score_long: usize,
    /// Short score WMA above this passes outright
    pub score_threshold: f64,
    /// Last score must exceed this when the WMAs are aligned
    pub last_score_threshold: f64,
    /// The last close must exceed the close this many bars back
    pub channel_lookbacks: Vec<usize>,
    pub weekly_ema_period: usize,
    /// Maximum relative distance from the weekly EMA
    pub weekly_max_deviation: f64,
    pub nine_turn: Option<NineTurnRule>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self::normal()
    }
}

impl FilterConfig {
    /// Trend, liquidity and price structure checks.
    pub fn normal() -> Self {
        Self {
            excluded_prefixes: Vec::new(),
            valuation: None,
            turnover_window: 13,
            min_turnover: 10_000_000.0,
            capitulation_bars: 4,
            score_short: 7,
            score_mid: 13,
            score_long: 21,
            score_threshold: 60.0,
            last_score_threshold: 60.0,
            channel_lookbacks: vec![144, 169, 21],
            weekly_ema_period: 13,
            weekly_max_deviation: 0.10,
            nine_turn: None,
        }
    }

    /// The normal checks plus valuation limits, excluding the STAR market.
    pub fn valuation() -> Self {
        Self {
            excluded_prefixes: vec!["SH.688".to_string()],
            valuation: Some(ValuationBounds::default()),
            ..Self::normal()
        }
    }

    /// Liquidity and score trend checks followed by the nine-turn rule,
    /// excluding the STAR market.
    pub fn nine_turn() -> Self {
        Self {
            excluded_prefixes: vec!["SH.688".to_string()],
            last_score_threshold: 50.0,
            nine_turn: Some(NineTurnRule::default()),
            ..Self::normal()
        }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.turnover_window == 0 || self.weekly_ema_period == 0 {
            return Err(EngineError::Validation(
                "filter windows must be greater than 0".into(),
            ));
        }
        if self.score_short == 0 || self.score_mid == 0 || self.score_long == 0 {
            return Err(EngineError::Validation(
                "filter score windows must be greater than 0".into(),
            ));
        }
        if self.min_turnover < 0.0 {
            return Err(EngineError::Validation(format!(
                "filter.min_turnover must be non-negative, got {}",
                self.min_turnover
            )));
        }
        if self.weekly_max_deviation <= 0.0 {
            return Err(EngineError::Validation(format!(
                "filter.weekly_max_deviation must be positive, got {}",
                self.weekly_max_deviation
            )));
        }
        if let Some(rule) = &self.nine_turn {
            if rule.lookback == 0 || rule.up_min >= rule.up_max {
                return Err(EngineError::Validation(format!(
                    "filter.nine_turn needs lookback > 0 and up_min < up_max, got {:?}",
                    rule
                )));
            }
        }
        if let Some(bounds) = &self.valuation {
            if bounds.pe_min >= bounds.pe_max {
                return Err(EngineError::Validation(format!(
                    "filter.valuation P/E range is empty: ({}, {})",
                    bounds.pe_min, bounds.pe_max
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variants() {
        let normal = FilterConfig::normal();
        assert!(normal.valuation.is_none());
        assert!(normal.excluded_prefixes.is_empty());

        let valuation = FilterConfig::valuation();
        assert_eq!(valuation.excluded_prefixes, vec!["SH.688".to_string()]);
        let bounds = valuation.valuation.as_ref().unwrap();
        assert_eq!(bounds.pe_max, 25.0);
        assert_eq!(bounds.market_cap_max, 50e9);
        assert_eq!(valuation.channel_lookbacks, normal.channel_lookbacks);

        assert!(normal.validate().is_ok());
        assert!(valuation.validate().is_ok());

        let nine = FilterConfig::nine_turn();
        assert!(normal.nine_turn.is_none());
        assert_eq!(nine.nine_turn, Some(NineTurnRule::default()));
        assert_eq!(nine.excluded_prefixes, vec!["SH.688".to_string()]);
        assert_eq!(nine.last_score_threshold, 50.0);
        assert_eq!(nine.score_threshold, 60.0);
        assert!(nine.valuation.is_none());
        assert!(nine.validate().is_ok());
    }

    #[test]
    fn test_invalid() {
        let config = FilterConfig {
            weekly_ema_period: 0,
            ..FilterConfig::normal()
        };
        assert!(config.validate().is_err());

        let mut config = FilterConfig::valuation();
        if let Some(bounds) = config.valuation.as_mut() {
            bounds.pe_min = 30.0;
        }
        assert!(config.validate().is_err());

        let mut config = FilterConfig::nine_turn();
        if let Some(rule) = config.nine_turn.as_mut() {
            rule.up_max = 2;
        }
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml() {
        let config: FilterConfig = toml::from_str("min_turnover = 5000000.0").unwrap();
        assert_eq!(config.min_turnover, 5_000_000.0);
        assert_eq!(config.capitulation_bars, 4);
        assert!(config.nine_turn.is_none());

        let config: FilterConfig = toml::from_str("[nine_turn]\ndown_exact = 8").unwrap();
        let rule = config.nine_turn.unwrap();
        assert_eq!(rule.down_exact, 8);
        assert_eq!(rule.min_bars, 9);
    }
}
