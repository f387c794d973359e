//! CCI strategy gated by a WMA crossover stop state.

use serde::{Deserialize, Serialize};
use trend_core::{
    error::StrategyError,
    traits::{Strategy, StrategyConfig},
    types::{BarSeriesExt, PriceBar, Signal},
};
use trend_indicators::{cci, wma};

use crate::channel::{keeps_above, keeps_below};

/// Configuration for the CCI-WMA strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CciWmaConfig {
    pub short_period: usize,
    pub mid_period: usize,
    pub long_period: usize,
    /// Bars each CCI must hold its threshold
    pub day_wait: usize,
}

impl Default for CciWmaConfig {
    fn default() -> Self {
        Self {
            short_period: 13,
            mid_period: 21,
            long_period: 55,
            day_wait: 2,
        }
    }
}

impl StrategyConfig for CciWmaConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.short_period == 0
            || self.short_period >= self.mid_period
            || self.mid_period >= self.long_period
        {
            return Err(StrategyError::InvalidConfig(
                "Periods must satisfy 0 < short < mid < long".into(),
            ));
        }
        if self.day_wait == 0 {
            return Err(StrategyError::InvalidConfig(
                "Day wait must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// CCI-WMA strategy.
///
/// A stop state flips to -1 when the mid WMA crosses below the long WMA
/// and to +1 when the short WMA crosses above the mid WMA, both judged on
/// the two previous bars. Longs additionally need the short CCI at or
/// above 100 and the mid and long CCIs at or above -100 over the waiting
/// window; shorts need the mirrored thresholds.
pub struct CciWmaStrategy {
    config: CciWmaConfig,
}

impl CciWmaStrategy {
    pub fn new(config: CciWmaConfig) -> Self {
        Self { config }
    }

    /// Crossover stop state per bar: 1, -1 or 0.
    pub fn stop_state(&self, closes: &[f64]) -> Vec<i8> {
        let ma_s = wma(closes, self.config.short_period);
        let ma_m = wma(closes, self.config.mid_period);
        let ma_l = wma(closes, self.config.long_period);

        let mut stop = vec![0i8; closes.len()];
        for i in 2..closes.len() {
            let is_short = if ma_m[i - 2] > ma_l[i - 2] && ma_m[i - 1] <= ma_l[i - 1] {
                -1
            } else {
                stop[i - 1]
            };
            stop[i] = if ma_s[i - 2] < ma_m[i - 2] && ma_s[i - 1] >= ma_m[i - 1] {
                1
            } else {
                is_short
            };
        }
        stop
    }
}

impl Strategy for CciWmaStrategy {
    fn key(&self) -> String {
        "CCI_WMA_strategy".to_string()
    }

    fn calculate(&self, bars: &[PriceBar]) -> Vec<Signal> {
        let cfg = &self.config;
        let cci_s = cci(bars, cfg.short_period);
        let cci_m = cci(bars, cfg.mid_period);
        let cci_l = cci(bars, cfg.long_period);
        let stop = self.stop_state(&bars.closes());
        let wait = cfg.day_wait;

        (0..bars.len())
            .map(|i| {
                let long = keeps_above(&cci_s, 100.0, i, wait)
                    && keeps_above(&cci_m, -100.0, i, wait)
                    && keeps_above(&cci_l, -100.0, i, wait);
                let short = keeps_below(&cci_s, -100.0, i, wait)
                    && keeps_below(&cci_m, 100.0, i, wait)
                    && keeps_below(&cci_l, 100.0, i, wait);

                if long && stop[i] == 1 {
                    Signal::Long
                } else if short && stop[i] == -1 {
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
        "CCI thresholds gated by WMA crossover state"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_bars;

    fn dip_then_rally() -> Vec<f64> {
        let mut closes: Vec<f64> = (0..40).map(|i| 200.0 - i as f64 * 2.0).collect();
        closes.extend((0..40).map(|i| 122.0 + i as f64 * 3.0));
        closes
    }

    #[test]
    fn test_config_validation() {
        assert!(CciWmaConfig::default().validate().is_ok());
        assert!(CciWmaConfig {
            mid_period: 60,
            ..Default::default()
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_stop_state_flips_on_rally() {
        let strategy = CciWmaStrategy::new(CciWmaConfig::default());
        let stop = strategy.stop_state(&dip_then_rally());

        assert_eq!(stop[0], 0);
        assert_eq!(stop[1], 0);
        assert_eq!(stop[79], 1);
    }

    #[test]
    fn test_rally_goes_long() {
        let bars = test_bars(&dip_then_rally());
        let pos = CciWmaStrategy::new(CciWmaConfig::default()).calculate(&bars);

        assert_eq!(pos.len(), 80);
        assert_eq!(pos[79], Signal::Long);
        assert!(pos[..40].iter().all(|p| !p.is_long()));
    }

    #[test]
    fn test_flat_is_neutral() {
        let bars = test_bars(&vec![50.0; 60]);
        let pos = CciWmaStrategy::new(CciWmaConfig::default()).calculate(&bars);
        assert!(pos.iter().all(|p| p.is_neutral()));
    }
}
