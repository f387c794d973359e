//! Strategy registry for dynamic strategy loading.

use crate::{
    ArtDlConfig, ArtDlStrategy, BollDlConfig, BollDlStrategy, CciMaConfig, CciMaStrategy,
    CciMacdConfig, CciMacdStrategy, CciWmaConfig, CciWmaStrategy, MaBaseConfig, MaBaseStrategy,
    SuperTrendAiConfig, SuperTrendAiStrategy,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;
use trend_core::{error::StrategyError, traits::Strategy, traits::StrategyConfig};

/// Information about a registered strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyInfo {
    /// Strategy name
    pub name: String,
    /// Strategy description
    pub description: String,
    /// Default configuration as JSON
    pub default_config: serde_json::Value,
}

/// Registry for available strategies.
pub struct StrategyRegistry {
    strategies: BTreeMap<String, StrategyInfo>,
}

fn info<C: Serialize>(name: &str, description: &str, config: C) -> StrategyInfo {
    StrategyInfo {
        name: name.to_string(),
        description: description.to_string(),
        default_config: serde_json::to_value(config).unwrap_or_default(),
    }
}

fn parse<C: StrategyConfig + DeserializeOwned>(
    config: serde_json::Value,
) -> Result<C, StrategyError> {
    let config: C = serde_json::from_value(config)
        .map_err(|e| StrategyError::InvalidConfig(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

impl StrategyRegistry {
    /// Create a new strategy registry with all built-in strategies.
    pub fn new() -> Self {
        let mut strategies = BTreeMap::new();

        strategies.insert(
            "boll_dl".to_string(),
            info(
                "BOLL_DL",
                "Trailing stop channel around the Bollinger mid band",
                BollDlConfig::default(),
            ),
        );
        strategies.insert(
            "cci_wma".to_string(),
            info(
                "CCI_WMA",
                "CCI thresholds gated by WMA crossover state",
                CciWmaConfig::default(),
            ),
        );
        strategies.insert(
            "cci_ma".to_string(),
            info(
                "CCI_MA",
                "Composite CCI trend with Hull MA filter and volume confirmation",
                CciMaConfig::default(),
            ),
        );
        strategies.insert(
            "art_dl".to_string(),
            info(
                "ART_DL",
                "Trailing stop channel a multiple of ATR away from the close",
                ArtDlConfig::default(),
            ),
        );
        strategies.insert(
            "ma_base".to_string(),
            info(
                "MA_Base",
                "Follows the mid EMA direction filtered by the long EMA slope",
                MaBaseConfig::default(),
            ),
        );
        strategies.insert(
            "cci_macd".to_string(),
            info(
                "CCI_MACD",
                "Rising CCI sum confirmed by a rising MACD histogram",
                CciMacdConfig::default(),
            ),
        );
        strategies.insert(
            "volume_supertrend_ai".to_string(),
            info(
                "VOLUME_SUPERTREND_AI",
                "Volume-weighted SuperTrend with kNN trend classification",
                SuperTrendAiConfig::default(),
            ),
        );

        Self { strategies }
    }

    /// List all available strategies, ordered by registry name.
    pub fn list(&self) -> Vec<&StrategyInfo> {
        self.strategies.values().collect()
    }

    /// Get strategy info by name.
    pub fn get(&self, name: &str) -> Option<&StrategyInfo> {
        self.strategies.get(name)
    }

    /// Check if a strategy exists.
    pub fn exists(&self, name: &str) -> bool {
        self.strategies.contains_key(name)
    }

    /// Get all strategy names.
    pub fn names(&self) -> Vec<&String> {
        self.strategies.keys().collect()
    }

    /// Create a strategy instance from configuration.
    ///
    /// Missing fields fall back to the strategy defaults.
    pub fn create(
        &self,
        name: &str,
        config: serde_json::Value,
    ) -> Result<Box<dyn Strategy>, StrategyError> {
        let config = if config.is_null() {
            serde_json::json!({})
        } else {
            config
        };

        let strategy: Box<dyn Strategy> = match name {
            "boll_dl" => Box::new(BollDlStrategy::new(parse(config)?)),
            "cci_wma" => Box::new(CciWmaStrategy::new(parse(config)?)),
            "cci_ma" => Box::new(CciMaStrategy::new(parse(config)?)),
            "art_dl" => Box::new(ArtDlStrategy::new(parse(config)?)),
            "ma_base" => Box::new(MaBaseStrategy::new(parse(config)?)),
            "cci_macd" => Box::new(CciMacdStrategy::new(parse(config)?)),
            "volume_supertrend_ai" => Box::new(SuperTrendAiStrategy::new(parse(config)?)),
            _ => return Err(StrategyError::NotFound(name.to_string())),
        };

        debug!(name = name, key = %strategy.key(), "Strategy created");
        Ok(strategy)
    }

    pub fn create_default(&self, name: &str) -> Result<Box<dyn Strategy>, StrategyError> {
        let info = self
            .get(name)
            .ok_or_else(|| StrategyError::NotFound(name.to_string()))?;
        self.create(name, info.default_config.clone())
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}
