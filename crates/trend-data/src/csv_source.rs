//! CSV K-line source.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;
use trend_core::error::DataError;
use trend_core::types::{validate_series, PriceBar};

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "date", alias = "timestamp", alias = "Timestamp")]
    time_key: String,
    #[serde(alias = "Open")]
    open: f64,
    #[serde(alias = "High")]
    high: f64,
    #[serde(alias = "Low")]
    low: f64,
    #[serde(alias = "Close", alias = "Adj Close")]
    close: f64,
    #[serde(alias = "Volume", default)]
    volume: f64,
    #[serde(alias = "Turnover", alias = "amount", default)]
    turnover: f64,
    #[serde(alias = "TurnoverRate", default)]
    turnover_rate: f64,
}

impl CsvRecord {
    fn into_bar(self) -> Result<PriceBar, DataError> {
        let time_key = parse_date(&self.time_key)?;
        Ok(
            PriceBar::new(time_key, self.open, self.high, self.low, self.close, self.volume)
                .with_turnover(self.turnover, self.turnover_rate),
        )
    }
}

/// Daily K-lines for one ticker stored as CSV.
///
/// Rows may come in any order; loaded bars are sorted ascending and
/// validated, so duplicate days or malformed OHLC values fail the load.
#[derive(Debug, Clone)]
pub struct CsvBarSource {
    path: PathBuf,
}

impl CsvBarSource {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DataError::NoDataAvailable);
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every bar in the file.
    pub fn load(&self) -> Result<Vec<PriceBar>, DataError> {
        let reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| DataError::ParseError(e.to_string()))?;

        let bars = read_bars(reader)?;
        debug!(path = %self.path.display(), bars = bars.len(), "Loaded K-lines");
        Ok(bars)
    }
}

/// Parse K-lines from any CSV reader.
pub fn bars_from_reader<R: Read>(rdr: R) -> Result<Vec<PriceBar>, DataError> {
    let reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(rdr);
    read_bars(reader)
}

fn read_bars<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<PriceBar>, DataError> {
    let mut bars = Vec::new();
    for result in reader.deserialize() {
        let record: CsvRecord = result.map_err(|e| DataError::ParseError(e.to_string()))?;
        bars.push(record.into_bar()?);
    }

    bars.sort_by_key(|b| b.time_key);
    validate_series(&bars)?;
    Ok(bars)
}

/// Parse a trading day from the date formats vendors export.
///
/// Unix timestamps are accepted in seconds or milliseconds.
pub fn parse_date(value: &str) -> Result<NaiveDate, DataError> {
    let value = value.trim();

    for format in ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%Y%m%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(value, format) {
            return Ok(d);
        }
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(dt.date());
        }
    }

    if let Ok(ts) = value.parse::<i64>() {
        // Assume milliseconds if > 10 digits
        let ms = if ts > 10_000_000_000 { ts } else { ts * 1000 };
        if let Some(dt) = DateTime::from_timestamp_millis(ms) {
            return Ok(dt.date_naive());
        }
    }

    Err(DataError::ParseError(format!("Could not parse date: {}", value)))
}
