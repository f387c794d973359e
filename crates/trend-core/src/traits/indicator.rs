//! Indicator trait definitions.

use serde::{Deserialize, Serialize};

use crate::types::{IndicatorGroup, PriceBar, Signal};

/// Output of a single indicator run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorOutput {
    /// One signal per input bar
    pub signals: Vec<Signal>,
    /// Latest indicator value
    pub value: f64,
}

impl IndicatorOutput {
    pub fn new(signals: Vec<Signal>, value: f64) -> Self {
        Self { signals, value }
    }

    /// All-neutral output for inputs too short to evaluate.
    pub fn neutral(len: usize) -> Self {
        Self {
            signals: vec![Signal::Neutral; len],
            value: 0.0,
        }
    }
}

/// Trait for signal-producing technical indicators.
///
/// Implementations turn a bar history into a per-bar signal sequence of the
/// same length. They must not panic on short or empty input.
pub trait Indicator: Send + Sync {
    /// Unique key of this configured instance, e.g. `SMA20_indicator`.
    fn key(&self) -> String;

    /// Family used when aggregating signals.
    fn group(&self) -> IndicatorGroup;

    /// Importance weight applied by the trend score.
    fn weight(&self) -> f64 {
        1.0
    }

    /// Number of leading bars that are always neutral.
    fn warmup_period(&self) -> usize;

    /// Calculate the signal sequence and the latest value.
    fn calculate(&self, bars: &[PriceBar]) -> IndicatorOutput;
}

/// Force the first `warmup` signals to neutral.
pub fn neutralize_warmup(signals: &mut [Signal], warmup: usize) {
    let end = warmup.min(signals.len());
    for s in &mut signals[..end] {
        *s = Signal::Neutral;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct UpDay;

    impl Indicator for UpDay {
        fn key(&self) -> String {
            "UP_DAY_indicator".to_string()
        }

        fn group(&self) -> IndicatorGroup {
            IndicatorGroup::Power
        }

        fn warmup_period(&self) -> usize {
            1
        }

        fn calculate(&self, bars: &[PriceBar]) -> IndicatorOutput {
            let mut signals: Vec<Signal> = bars
                .iter()
                .map(|b| Signal::from_sign(b.close - b.open))
                .collect();
            neutralize_warmup(&mut signals, self.warmup_period());
            let value = bars.last().map(|b| b.close).unwrap_or(0.0);
            IndicatorOutput::new(signals, value)
        }
    }

    #[test]
    fn test_indicator_defaults() {
        let indicator = UpDay;
        assert!((indicator.weight() - 1.0).abs() < 1e-10);
        assert!(indicator.calculate(&[]).signals.is_empty());
    }

    #[test]
    fn test_neutralize_warmup() {
        let mut signals = vec![Signal::Long; 4];
        neutralize_warmup(&mut signals, 2);
        assert_eq!(
            signals,
            vec![Signal::Neutral, Signal::Neutral, Signal::Long, Signal::Long]
        );

        let mut short = vec![Signal::Short; 2];
        neutralize_warmup(&mut short, 10);
        assert!(short.iter().all(|s| s.is_neutral()));
    }

    #[test]
    fn test_neutral_output() {
        let out = IndicatorOutput::neutral(3);
        assert_eq!(out.signals.len(), 3);
        assert!(out.signals.iter().all(|s| s.is_neutral()));
        assert!((out.value - 0.0).abs() < 1e-10);
    }
}
