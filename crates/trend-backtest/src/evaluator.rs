//! Runs a configured strategy set through the simulator.

use std::collections::HashSet;

use tracing::debug;
use trend_core::error::StrategyError;
use trend_core::traits::Strategy;
use trend_core::types::PriceBar;
use trend_strategies::default_strategies;

use crate::simulator::{BacktestSimulator, DEFAULT_NOTIONAL};
use crate::statistics::StrategyTradeStat;

/// Strategy evaluator.
///
/// Holds the strategies and the notional; stateless across calls.
pub struct StrategyEvaluator {
    simulator: BacktestSimulator,
    strategies: Vec<Box<dyn Strategy>>,
}

impl StrategyEvaluator {
    /// Create an evaluator; strategy keys must be unique.
    pub fn new(notional: f64, strategies: Vec<Box<dyn Strategy>>) -> Result<Self, StrategyError> {
        let mut seen = HashSet::new();
        for strategy in &strategies {
            let key = strategy.key();
            if !seen.insert(key.clone()) {
                return Err(StrategyError::DuplicateKey(key));
            }
        }
        if !(notional > 0.0) {
            return Err(StrategyError::InvalidConfig(format!(
                "Notional must be positive, got {}",
                notional
            )));
        }

        Ok(Self {
            simulator: BacktestSimulator::new(notional),
            strategies,
        })
    }

    /// Evaluator over the default strategy set.
    pub fn with_defaults(notional: f64) -> Result<Self, StrategyError> {
        Self::new(notional, default_strategies())
    }

    pub fn notional(&self) -> f64 {
        self.simulator.notional()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Strategy keys in configuration order.
    pub fn keys(&self) -> Vec<String> {
        self.strategies.iter().map(|s| s.key()).collect()
    }

    /// Evaluate every strategy, in configuration order.
    ///
    /// An empty series yields an empty result.
    pub fn evaluate(&self, bars: &[PriceBar]) -> Result<Vec<StrategyTradeStat>, StrategyError> {
        if bars.is_empty() {
            return Ok(Vec::new());
        }

        let stats = self
            .strategies
            .iter()
            .map(|s| self.run(s.as_ref(), bars))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            strategies = stats.len(),
            bars = bars.len(),
            trades = stats.iter().map(|s| s.trades).sum::<usize>(),
            "Strategies evaluated"
        );
        Ok(stats)
    }

    /// Evaluate a single strategy by key.
    pub fn evaluate_key(
        &self,
        key: &str,
        bars: &[PriceBar],
    ) -> Result<StrategyTradeStat, StrategyError> {
        let strategy = self
            .strategies
            .iter()
            .find(|s| s.key() == key)
            .ok_or_else(|| StrategyError::NotFound(key.to_string()))?;

        self.run(strategy.as_ref(), bars)
    }

    fn run(&self, strategy: &dyn Strategy, bars: &[PriceBar]) -> Result<StrategyTradeStat, StrategyError> {
        let key = strategy.key();
        if bars.is_empty() {
            return Ok(StrategyTradeStat::empty(key, self.notional()));
        }
        let positions = strategy.calculate(bars);
        self.simulator.run(&key, bars, positions)
    }
}

impl std::fmt::Debug for StrategyEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyEvaluator")
            .field("notional", &self.notional())
            .field("strategies", &self.keys())
            .finish()
    }
}

impl Default for StrategyEvaluator {
    fn default() -> Self {
        Self {
            simulator: BacktestSimulator::new(DEFAULT_NOTIONAL),
            strategies: default_strategies(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_bars_from_opens;
    use trend_core::types::Signal;

    struct Fixed {
        key: &'static str,
        positions: Vec<Signal>,
    }

    impl Strategy for Fixed {
        fn key(&self) -> String {
            self.key.to_string()
        }

        fn calculate(&self, _bars: &[PriceBar]) -> Vec<Signal> {
            self.positions.clone()
        }
    }

    fn fixed(key: &'static str, positions: Vec<Signal>) -> Box<dyn Strategy> {
        Box::new(Fixed { key, positions })
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let result = StrategyEvaluator::new(
            DEFAULT_NOTIONAL,
            vec![fixed("A_strategy", vec![]), fixed("A_strategy", vec![])],
        );
        assert!(matches!(result, Err(StrategyError::DuplicateKey(_))));
    }

    #[test]
    fn test_invalid_notional() {
        let result = StrategyEvaluator::new(0.0, vec![]);
        assert!(matches!(result, Err(StrategyError::InvalidConfig(_))));
    }

    #[test]
    fn test_evaluate_in_order() {
        use Signal::*;
        let evaluator = StrategyEvaluator::new(
            DEFAULT_NOTIONAL,
            vec![
                fixed("B_strategy", vec![Neutral, Long, Long, Neutral, Neutral]),
                fixed("A_strategy", vec![Neutral; 5]),
            ],
        )
        .unwrap();

        let bars = test_bars_from_opens(&[10.0, 10.0, 12.0, 12.0, 10.0]);
        let stats = evaluator.evaluate(&bars).unwrap();

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].key, "B_strategy");
        assert_eq!(stats[0].trades, 1);
        assert_eq!(stats[1].key, "A_strategy");
        assert_eq!(stats[1].trades, 0);
        assert!(stats.iter().all(|s| s.is_consistent()));
    }

    #[test]
    fn test_length_mismatch_is_data_error() {
        let evaluator =
            StrategyEvaluator::new(DEFAULT_NOTIONAL, vec![fixed("A_strategy", vec![Signal::Long])])
                .unwrap();
        let bars = test_bars_from_opens(&[10.0, 11.0, 12.0]);

        let err = evaluator.evaluate(&bars).unwrap_err();
        assert!(!err.is_config());
    }

    #[test]
    fn test_evaluate_key() {
        let evaluator = StrategyEvaluator::default();
        let bars = test_bars_from_opens(&[10.0, 10.5, 11.0, 10.0, 9.5]);

        let stat = evaluator.evaluate_key("BOLL_DL_strategy", &bars).unwrap();
        assert_eq!(stat.positions.len(), 5);

        let err = evaluator.evaluate_key("NOPE_strategy", &bars).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_empty_input() {
        let evaluator = StrategyEvaluator::default();
        assert!(evaluator.evaluate(&[]).unwrap().is_empty());

        let stat = evaluator.evaluate_key("MA_Base_strategy", &[]).unwrap();
        assert_eq!(stat.trades, 0);
        assert!(stat.positions.is_empty());
    }

    #[test]
    fn test_default_set_deterministic() {
        let opens: Vec<f64> = (0..120)
            .map(|i| 50.0 + (i as f64 * 0.2).sin() * 8.0 + i as f64 * 0.1)
            .collect();
        let bars = test_bars_from_opens(&opens);
        let evaluator = StrategyEvaluator::default();

        let first = evaluator.evaluate(&bars).unwrap();
        let second = evaluator.evaluate(&bars).unwrap();
        assert_eq!(first, second);
        assert_eq!(evaluator.keys().len(), 5);
        assert!(first.iter().all(|s| s.is_consistent()));
    }
}
