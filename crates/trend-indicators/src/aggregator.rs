//! Runs a configured indicator set over one bar history.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, trace};
use trend_core::error::IndicatorError;
use trend_core::traits::Indicator;
use trend_core::types::{trailing_run, IndicatorGroup, PriceBar, Signal};

use crate::default_indicators;

/// Result of one indicator over one bar history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorResult {
    pub key: String,
    pub group: IndicatorGroup,
    /// Importance weight used by the trend score
    pub weight: f64,
    /// One signal per bar
    pub signals: Vec<Signal>,
    /// Latest indicator value
    pub value: f64,
    /// Last signal
    pub status: Signal,
    /// Bars the last signal has persisted
    pub days: usize,
}

impl IndicatorResult {
    fn from_indicator(indicator: &dyn Indicator, signals: Vec<Signal>, value: f64) -> Self {
        let status = signals.last().copied().unwrap_or_default();
        let days = trailing_run(&signals);
        Self {
            key: indicator.key(),
            group: indicator.group(),
            weight: indicator.weight(),
            signals,
            value,
            status,
            days,
        }
    }
}

/// Ordered set of indicators with unique keys.
pub struct IndicatorAggregator {
    indicators: Vec<Box<dyn Indicator>>,
}

impl IndicatorAggregator {
    /// Build an aggregator; duplicate keys are rejected.
    pub fn new(indicators: Vec<Box<dyn Indicator>>) -> Result<Self, IndicatorError> {
        let mut seen = HashSet::new();
        for indicator in &indicators {
            let key = indicator.key();
            if !seen.insert(key.clone()) {
                return Err(IndicatorError::DuplicateKey(key));
            }
        }
        Ok(Self { indicators })
    }

    /// Aggregator over the default indicator set.
    pub fn with_defaults() -> Self {
        Self {
            indicators: default_indicators(),
        }
    }

    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }

    /// Keys in configuration order.
    pub fn keys(&self) -> Vec<String> {
        self.indicators.iter().map(|i| i.key()).collect()
    }

    pub fn indicators(&self) -> &[Box<dyn Indicator>] {
        &self.indicators
    }

    /// Evaluate every indicator in configuration order.
    ///
    /// An empty history yields an empty result.
    pub fn evaluate(&self, bars: &[PriceBar]) -> Result<Vec<IndicatorResult>, IndicatorError> {
        if bars.is_empty() {
            return Ok(Vec::new());
        }

        let results = self
            .indicators
            .iter()
            .map(|indicator| Self::run(indicator.as_ref(), bars))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            indicators = results.len(),
            bars = bars.len(),
            "Evaluated indicator set"
        );
        Ok(results)
    }

    /// Evaluate a single indicator by key.
    pub fn evaluate_key(
        &self,
        key: &str,
        bars: &[PriceBar],
    ) -> Result<IndicatorResult, IndicatorError> {
        let indicator = self
            .indicators
            .iter()
            .find(|i| i.key() == key)
            .ok_or_else(|| IndicatorError::NotFound(key.to_string()))?;

        if bars.is_empty() {
            return Ok(IndicatorResult::from_indicator(indicator.as_ref(), Vec::new(), 0.0));
        }
        Self::run(indicator.as_ref(), bars)
    }

    fn run(indicator: &dyn Indicator, bars: &[PriceBar]) -> Result<IndicatorResult, IndicatorError> {
        let output = indicator.calculate(bars);
        if output.signals.len() != bars.len() {
            return Err(IndicatorError::LengthMismatch {
                key: indicator.key(),
                expected: bars.len(),
                actual: output.signals.len(),
            });
        }

        let result = IndicatorResult::from_indicator(indicator, output.signals, output.value);
        trace!(key = %result.key, status = %result.status, days = result.days, "Indicator evaluated");
        Ok(result)
    }
}

impl Default for IndicatorAggregator {
    fn default() -> Self {
        Self::with_defaults()
    }
}
