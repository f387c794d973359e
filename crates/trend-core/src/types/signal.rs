//! Directional signals and indicator groups.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-bar directional signal or strategy position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Signal {
    /// Bearish / short (-1)
    Short,
    /// No opinion / flat (0)
    #[default]
    Neutral,
    /// Bullish / long (+1)
    Long,
}

impl Signal {
    /// Integer value in {-1, 0, 1}.
    #[inline]
    pub fn value(self) -> i8 {
        match self {
            Signal::Short => -1,
            Signal::Neutral => 0,
            Signal::Long => 1,
        }
    }

    #[inline]
    pub fn as_f64(self) -> f64 {
        self.value() as f64
    }

    /// Map the sign of a value to a signal. Zero and NaN are neutral.
    #[inline]
    pub fn from_sign(x: f64) -> Self {
        if x > 0.0 {
            Signal::Long
        } else if x < 0.0 {
            Signal::Short
        } else {
            Signal::Neutral
        }
    }

    #[inline]
    pub fn is_long(self) -> bool {
        self == Signal::Long
    }

    #[inline]
    pub fn is_short(self) -> bool {
        self == Signal::Short
    }

    #[inline]
    pub fn is_neutral(self) -> bool {
        self == Signal::Neutral
    }
}

impl From<Signal> for i8 {
    fn from(signal: Signal) -> Self {
        signal.value()
    }
}

impl TryFrom<i8> for Signal {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Signal::Short),
            0 => Ok(Signal::Neutral),
            1 => Ok(Signal::Long),
            other => Err(format!("signal must be -1, 0 or 1, got {}", other)),
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Length of the trailing run of equal signals.
pub fn trailing_run(signals: &[Signal]) -> usize {
    match signals.last() {
        Some(last) => signals.iter().rev().take_while(|s| *s == last).count(),
        None => 0,
    }
}

/// Indicator family used by the trend score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IndicatorGroup {
    /// Moving-average style trend indicators
    Base,
    /// Momentum and oscillator indicators
    Power,
}

impl fmt::Display for IndicatorGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorGroup::Base => write!(f, "BASE"),
            IndicatorGroup::Power => write!(f, "POWER"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_values() {
        assert_eq!(Signal::Long.value(), 1);
        assert_eq!(Signal::Short.value(), -1);
        assert_eq!(Signal::default(), Signal::Neutral);
        assert_eq!(Signal::from_sign(0.3), Signal::Long);
        assert_eq!(Signal::from_sign(-2.0), Signal::Short);
        assert_eq!(Signal::from_sign(0.0), Signal::Neutral);
        assert_eq!(Signal::from_sign(f64::NAN), Signal::Neutral);
    }

    #[test]
    fn test_signal_serde() {
        let json = serde_json::to_string(&vec![Signal::Short, Signal::Neutral, Signal::Long]).unwrap();
        assert_eq!(json, "[-1,0,1]");

        let parsed: Vec<Signal> = serde_json::from_str("[1,0,-1]").unwrap();
        assert_eq!(parsed, vec![Signal::Long, Signal::Neutral, Signal::Short]);

        assert!(serde_json::from_str::<Signal>("2").is_err());
    }

    #[test]
    fn test_trailing_run() {
        use Signal::*;
        assert_eq!(trailing_run(&[]), 0);
        assert_eq!(trailing_run(&[Long]), 1);
        assert_eq!(trailing_run(&[Neutral, Long, Long, Short, Short, Short]), 3);
        assert_eq!(trailing_run(&[Long, Long]), 2);
    }

    #[test]
    fn test_group_serde() {
        assert_eq!(serde_json::to_string(&IndicatorGroup::Power).unwrap(), "\"POWER\"");
        assert_eq!(IndicatorGroup::Base.to_string(), "BASE");
    }
}
