//! Trend score records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Composite trend score for one bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendScoreRecord {
    pub ticker_id: i64,
    pub time_key: NaiveDate,
    /// Weighted, time-decayed BASE buy strength
    pub ma_buy: f64,
    pub ma_sell: f64,
    /// Weighted, time-decayed POWER buy strength
    pub in_buy: f64,
    pub in_sell: f64,
    /// Strategies long on this bar
    pub strategy_buy: usize,
    /// Strategies short on this bar
    pub strategy_sell: usize,
    /// Reference sub-scores in [0, 100]
    pub ma_score: f64,
    pub in_score: f64,
    pub strategy_score: f64,
    pub trend_strength: f64,
    pub trend_persistence: f64,
    pub volume_price_confirm: f64,
    /// Unbounded composite before normalization
    pub raw_score: f64,
    /// Present when the batch was z-scored
    pub z_score: Option<f64>,
    /// Final score in [0, 100]
    pub score: f64,
}

/// All records of one evaluation run, ascending by time key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreBatch {
    records: Vec<TrendScoreRecord>,
}

impl ScoreBatch {
    pub fn new(mut records: Vec<TrendScoreRecord>) -> Self {
        records.sort_by_key(|r| r.time_key);
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[TrendScoreRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrendScoreRecord> {
        self.records.iter()
    }

    /// The record to persist: greatest time key.
    pub fn latest(&self) -> Option<&TrendScoreRecord> {
        self.records.last()
    }

    /// Final scores in time order.
    pub fn scores(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.score).collect()
    }

    pub fn into_records(self) -> Vec<TrendScoreRecord> {
        self.records
    }
}
