//! Position strategies for trend scoring.
//!
//! Each strategy maps a bar series to a per-bar position:
//! - Bollinger and ATR double-line stop channels
//! - CCI strategies gated by WMA crossovers, a Hull MA or the MACD histogram
//! - The EMA base trend follower
//! - Volume SuperTrend AI

mod art_dl;
mod boll_dl;
mod cci_ma;
mod cci_macd;
mod cci_wma;
pub mod channel;
mod ma_base;
mod registry;
mod supertrend_ai;

pub use art_dl::{ArtDlConfig, ArtDlStrategy};
pub use boll_dl::{BollDlConfig, BollDlStrategy};
pub use cci_ma::{CciMaConfig, CciMaStrategy};
pub use cci_macd::{CciMacdConfig, CciMacdStrategy};
pub use cci_wma::{CciWmaConfig, CciWmaStrategy};
pub use ma_base::{MaBaseConfig, MaBaseStrategy};
pub use registry::{StrategyInfo, StrategyRegistry};
pub use supertrend_ai::{SuperTrendAiConfig, SuperTrendAiStrategy};

use trend_core::traits::Strategy;

/// The strategies evaluated for every ticker by default.
pub fn default_strategies() -> Vec<Box<dyn Strategy>> {
    vec![
        Box::new(BollDlStrategy::new(BollDlConfig::default())),
        Box::new(CciWmaStrategy::new(CciWmaConfig::default())),
        Box::new(CciMaStrategy::new(CciMaConfig::default())),
        Box::new(ArtDlStrategy::new(ArtDlConfig::default())),
        Box::new(MaBaseStrategy::new(MaBaseConfig::default())),
    ]
}

#[cfg(test)]
pub(crate) fn test_bars(closes: &[f64]) -> Vec<trend_core::PriceBar> {
    let start = chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let day = start + chrono::Duration::days(i as i64);
            trend_core::PriceBar::new(day, c, c + 1.0, c - 1.0, c, 1000.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_strategies_unique_keys() {
        let strategies = default_strategies();
        let mut keys: Vec<String> = strategies.iter().map(|s| s.key()).collect();
        assert_eq!(keys[0], "BOLL_DL_strategy");

        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 5);
    }

    #[test]
    fn test_positions_match_input_length() {
        let closes: Vec<f64> = (0..130)
            .map(|i| 100.0 + (i as f64 * 0.3).sin() * 10.0)
            .collect();
        let bars = test_bars(&closes);
        let registry = StrategyRegistry::new();

        for name in registry.names() {
            let strategy = registry.create_default(name).unwrap();
            assert_eq!(strategy.calculate(&bars).len(), bars.len(), "{}", name);
            assert!(strategy.calculate(&[]).is_empty(), "{}", name);
        }
    }
}
