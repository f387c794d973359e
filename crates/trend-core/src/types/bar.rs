//! Daily K-line bars.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// One daily OHLCV bar (a "K-line").
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Trading day
    pub time_key: NaiveDate,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Traded volume (shares)
    pub volume: f64,
    /// Traded value (currency)
    #[serde(default)]
    pub turnover: f64,
    /// Turnover rate (percent of float)
    #[serde(default)]
    pub turnover_rate: f64,
}

impl PriceBar {
    /// Create a new bar without turnover information.
    pub fn new(time_key: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            time_key,
            open,
            high,
            low,
            close,
            volume,
            turnover: 0.0,
            turnover_rate: 0.0,
        }
    }

    /// Attach turnover figures.
    pub fn with_turnover(mut self, turnover: f64, turnover_rate: f64) -> Self {
        self.turnover = turnover;
        self.turnover_rate = turnover_rate;
        self
    }

    /// Typical price (HLC average).
    #[inline]
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// Bar range (high - low).
    #[inline]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// True range against the previous close.
    pub fn true_range(&self, prev_close: Option<f64>) -> f64 {
        match prev_close {
            Some(pc) => {
                let hl = self.high - self.low;
                let hc = (self.high - pc).abs();
                let lc = (self.low - pc).abs();
                hl.max(hc).max(lc)
            }
            None => self.high - self.low,
        }
    }

    /// Check OHLC sanity for a single bar.
    pub fn validate(&self, index: usize) -> Result<(), DataError> {
        let invalid = |reason: &str| DataError::InvalidBar {
            index,
            reason: reason.to_string(),
        };

        let values = [
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume,
            self.turnover,
            self.turnover_rate,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(invalid("non-finite value"));
        }
        if self.high < self.low {
            return Err(invalid("high below low"));
        }
        if self.high < self.open.max(self.close) {
            return Err(invalid("high below open/close"));
        }
        if self.low > self.open.min(self.close) {
            return Err(invalid("low above open/close"));
        }
        if self.volume < 0.0 || self.turnover < 0.0 || self.turnover_rate < 0.0 {
            return Err(invalid("negative volume, turnover or turnover rate"));
        }
        Ok(())
    }
}

/// Column accessors over a bar slice.
pub trait BarSeriesExt {
    fn closes(&self) -> Vec<f64>;
    fn opens(&self) -> Vec<f64>;
    fn highs(&self) -> Vec<f64>;
    fn lows(&self) -> Vec<f64>;
    fn volumes(&self) -> Vec<f64>;
    fn turnovers(&self) -> Vec<f64>;
    fn typical_prices(&self) -> Vec<f64>;
}

impl BarSeriesExt for [PriceBar] {
    fn closes(&self) -> Vec<f64> {
        self.iter().map(|b| b.close).collect()
    }

    fn opens(&self) -> Vec<f64> {
        self.iter().map(|b| b.open).collect()
    }

    fn highs(&self) -> Vec<f64> {
        self.iter().map(|b| b.high).collect()
    }

    fn lows(&self) -> Vec<f64> {
        self.iter().map(|b| b.low).collect()
    }

    fn volumes(&self) -> Vec<f64> {
        self.iter().map(|b| b.volume).collect()
    }

    fn turnovers(&self) -> Vec<f64> {
        self.iter().map(|b| b.turnover).collect()
    }

    fn typical_prices(&self) -> Vec<f64> {
        self.iter().map(|b| b.typical_price()).collect()
    }
}

/// Validate every bar and require strictly ascending time keys.
pub fn validate_series(bars: &[PriceBar]) -> Result<(), DataError> {
    for (i, bar) in bars.iter().enumerate() {
        bar.validate(i)?;
        if i > 0 && bar.time_key <= bars[i - 1].time_key {
            return Err(DataError::OutOfOrder { index: i });
        }
    }
    Ok(())
}
