//! CCI trend strategy with a Hull MA filter and volume confirmation.

use serde::{Deserialize, Serialize};
use trend_core::{
    error::StrategyError,
    traits::{Strategy, StrategyConfig},
    types::{BarSeriesExt, PriceBar, Signal},
};
use trend_indicators::{cci, hma, sma};

use crate::channel::{keeps_above, keeps_below};

/// Maximum tolerated decline of the Hull MA over the long period.
const MAX_HMA_DECLINE: f64 = -0.03;

/// Configuration for the CCI-MA strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CciMaConfig {
    pub short_period: usize,
    pub mid_period: usize,
    pub long_period: usize,
    /// Bars the composite CCI must hold before acting
    pub day_wait: usize,
    /// Volume average period
    pub volume_period: usize,
    /// Required volume relative to its average
    pub volume_ratio: f64,
}

impl Default for CciMaConfig {
    fn default() -> Self {
        Self {
            short_period: 13,
            mid_period: 21,
            long_period: 34,
            day_wait: 2,
            volume_period: 20,
            volume_ratio: 1.2,
        }
    }
}

impl StrategyConfig for CciMaConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.short_period == 0
            || self.short_period > self.mid_period
            || self.mid_period > self.long_period
        {
            return Err(StrategyError::InvalidConfig(
                "CCI periods must satisfy 0 < short <= mid <= long".into(),
            ));
        }
        if self.day_wait == 0 || self.volume_period == 0 {
            return Err(StrategyError::InvalidConfig(
                "Day wait and volume period must be greater than 0".into(),
            ));
        }
        if self.volume_ratio < 0.0 {
            return Err(StrategyError::InvalidConfig(
                "Volume ratio must not be negative".into(),
            ));
        }
        Ok(())
    }
}

/// CCI-MA strategy.
///
/// Short, mid and long CCIs are folded into one composite value: the
/// longest CCI that has held above zero for two bars, or the short CCI
/// shifted down by 100 when none has. Longs need the composite to hold
/// above zero, price at or above its level `short_period` bars ago, a Hull
/// MA that has not dropped more than 3% and a volume surge. Shorts need
/// the composite to hold at or below -100 and price below that level.
pub struct CciMaStrategy {
    config: CciMaConfig,
}

impl CciMaStrategy {
    pub fn new(config: CciMaConfig) -> Self {
        Self { config }
    }

    fn composite(&self, bars: &[PriceBar]) -> Vec<f64> {
        let cci_s = cci(bars, self.config.short_period);
        let cci_m = cci(bars, self.config.mid_period);
        let cci_l = cci(bars, self.config.long_period);

        (0..bars.len())
            .map(|i| {
                let v1 = if keeps_above(&cci_s, 0.0, i, 2) {
                    cci_s[i]
                } else {
                    cci_s[i] - 100.0
                };
                let v2 = if keeps_above(&cci_m, 0.0, i, 2) { cci_m[i] } else { v1 };
                if keeps_above(&cci_l, 0.0, i, 2) {
                    cci_l[i]
                } else {
                    v2
                }
            })
            .collect()
    }
}

impl Strategy for CciMaStrategy {
    fn key(&self) -> String {
        "CCI_MA_strategy".to_string()
    }

    fn calculate(&self, bars: &[PriceBar]) -> Vec<Signal> {
        let cfg = &self.config;
        let closes = bars.closes();
        let volumes = bars.volumes();
        let composite = self.composite(bars);
        let hull = hma(&closes, cfg.long_period);
        let volume_avg = sma(&volumes, cfg.volume_period);

        let mut positions = Vec::with_capacity(bars.len());
        let mut status = Signal::Neutral;
        for i in 0..bars.len() {
            if i < cfg.short_period {
                positions.push(Signal::Neutral);
                continue;
            }

            let buy = keeps_above(&composite, 0.0, i, cfg.day_wait);
            let sell = keeps_below(&composite, -100.0, i, cfg.day_wait);

            let hull_base = if i > cfg.long_period {
                hull[i - cfg.long_period]
            } else {
                hull[0]
            };
            let hull_ok = if hull[i] > 0.0 {
                (hull[i] - hull_base) / hull[i] > MAX_HMA_DECLINE
            } else {
                true
            };

            let volume_ok =
                volumes[i] > volume_avg[i] * cfg.volume_ratio && volumes[i] > volumes[i - 1];
            let reference = closes[i - cfg.short_period];

            if buy && closes[i] >= reference && hull_ok && volume_ok {
                status = Signal::Long;
            }
            if sell && closes[i] < reference {
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
        "Composite CCI trend with Hull MA filter and volume confirmation"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_bars;

    fn with_volumes(closes: &[f64], volumes: &[f64]) -> Vec<PriceBar> {
        let mut bars = test_bars(closes);
        for (bar, v) in bars.iter_mut().zip(volumes.iter()) {
            bar.volume = *v;
        }
        bars
    }

    #[test]
    fn test_config_validation() {
        assert!(CciMaConfig::default().validate().is_ok());
        assert!(CciMaConfig {
            short_period: 30,
            ..Default::default()
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_no_volume_surge_no_long() {
        let closes: Vec<f64> = (0..80).map(|i| 100.0 + i as f64).collect();
        let bars = with_volumes(&closes, &vec![1000.0; 80]);
        let pos = CciMaStrategy::new(CciMaConfig::default()).calculate(&bars);

        assert_eq!(pos.len(), 80);
        assert!(pos.iter().all(|p| !p.is_long()));
    }

    #[test]
    fn test_volume_surge_goes_long() {
        let closes: Vec<f64> = (0..80).map(|i| 100.0 + i as f64).collect();
        let volumes: Vec<f64> = (0..80)
            .map(|i| if i == 60 { 5000.0 } else { 1000.0 })
            .collect();
        let bars = with_volumes(&closes, &volumes);
        let pos = CciMaStrategy::new(CciMaConfig::default()).calculate(&bars);

        assert!(pos[..60].iter().all(|p| p.is_neutral()));
        assert_eq!(pos[60], Signal::Long);
        assert_eq!(pos[79], Signal::Long);
    }

    #[test]
    fn test_collapse_goes_short() {
        let mut closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64 * 0.2).collect();
        closes.extend((0..40).map(|i| 108.0 - i as f64 * 2.0));
        let bars = with_volumes(&closes, &vec![1000.0; 80]);
        let pos = CciMaStrategy::new(CciMaConfig::default()).calculate(&bars);

        assert_eq!(pos[79], Signal::Short);
    }
}
