//! End-to-end evaluation of one ticker.

use serde::{Deserialize, Serialize};
use tracing::debug;
use trend_backtest::{StrategyEvaluator, StrategyTradeStat};
use trend_core::error::EngineResult;
use trend_core::types::{validate_series, PriceBar};
use trend_indicators::{IndicatorAggregator, IndicatorResult};

use crate::aggregator::TrendScoreAggregator;
use crate::config::ScoreConfig;
use crate::record::{ScoreBatch, TrendScoreRecord};

/// Everything computed for one ticker in one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerEvaluation {
    pub ticker_id: i64,
    pub indicators: Vec<IndicatorResult>,
    pub strategies: Vec<StrategyTradeStat>,
    pub scores: ScoreBatch,
}

impl TickerEvaluation {
    /// The record to persist.
    pub fn latest_score(&self) -> Option<&TrendScoreRecord> {
        self.scores.latest()
    }

    /// Final scores in time order, as consumed by the screen.
    pub fn score_history(&self) -> Vec<f64> {
        self.scores.scores()
    }
}

/// Runs indicators, strategies and the trend score for a ticker.
///
/// The three stages are injected; the evaluator holds no per-ticker state
/// and can be shared across threads.
pub struct TickerEvaluator {
    indicators: IndicatorAggregator,
    strategies: StrategyEvaluator,
    scorer: TrendScoreAggregator,
}

impl TickerEvaluator {
    pub fn new(
        indicators: IndicatorAggregator,
        strategies: StrategyEvaluator,
        scorer: TrendScoreAggregator,
    ) -> Self {
        Self {
            indicators,
            strategies,
            scorer,
        }
    }

    /// Default indicator and strategy sets with the given tuning.
    pub fn with_defaults(config: ScoreConfig, notional: f64) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self::new(
            IndicatorAggregator::with_defaults(),
            StrategyEvaluator::with_defaults(notional)?,
            TrendScoreAggregator::new(config),
        ))
    }

    pub fn indicators(&self) -> &IndicatorAggregator {
        &self.indicators
    }

    pub fn strategies(&self) -> &StrategyEvaluator {
        &self.strategies
    }

    pub fn scorer(&self) -> &TrendScoreAggregator {
        &self.scorer
    }

    /// Evaluate one ticker's bars.
    ///
    /// Malformed or unordered bars fail before any stage runs.
    pub fn evaluate(&self, ticker_id: i64, bars: &[PriceBar]) -> EngineResult<TickerEvaluation> {
        validate_series(bars)?;

        let indicators = self.indicators.evaluate(bars)?;
        let strategies = self.strategies.evaluate(bars)?;
        let scores = self.scorer.score(ticker_id, bars, &indicators, &strategies)?;

        debug!(
            ticker_id = ticker_id,
            bars = bars.len(),
            score = scores.latest().map(|r| r.score),
            "Ticker evaluated"
        );

        Ok(TickerEvaluation {
            ticker_id,
            indicators,
            strategies,
            scores,
        })
    }
}

impl Default for TickerEvaluator {
    fn default() -> Self {
        Self::new(
            IndicatorAggregator::default(),
            StrategyEvaluator::default(),
            TrendScoreAggregator::default(),
        )
    }
}
