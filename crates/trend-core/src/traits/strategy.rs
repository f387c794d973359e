//! Strategy trait definitions.

use crate::error::StrategyError;
use crate::types::{PriceBar, Signal};

/// Configuration trait for strategies.
pub trait StrategyConfig: Send + Sync + Clone + 'static {
    /// Validate the configuration.
    fn validate(&self) -> Result<(), StrategyError>;
}

/// Core strategy trait.
///
/// A strategy maps a full bar history to a per-bar position sequence
/// (`Long`, `Neutral` or `Short`). The backtest simulator acts on position
/// changes; strategies themselves hold no mutable state.
pub trait Strategy: Send + Sync {
    /// Unique key of this strategy, e.g. `BOLL_DL_strategy`.
    fn key(&self) -> String;

    /// Compute one position per bar.
    fn calculate(&self, bars: &[PriceBar]) -> Vec<Signal>;

    /// Current parameters as JSON.
    fn params(&self) -> serde_json::Value {
        serde_json::Value::Null
    }

    /// Get a description of the strategy.
    fn description(&self) -> &str {
        ""
    }
}
