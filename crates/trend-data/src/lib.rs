//! Data loaders for the trend scoring engine.
//!
//! K-lines and ticker metadata are read from CSV exports; the engine
//! crates never touch the filesystem themselves.

mod csv_source;
mod tickers;

pub use csv_source::{bars_from_reader, parse_date, CsvBarSource};
pub use tickers::{load_tickers, tickers_from_reader};

use std::path::Path;
use trend_core::error::DataError;
use trend_core::types::PriceBar;

/// Load one ticker's bars from a CSV file.
pub fn load_csv(path: impl AsRef<Path>) -> Result<Vec<PriceBar>, DataError> {
    CsvBarSource::new(path)?.load()
}

/// Path of a ticker's K-line file inside a data directory, e.g.
/// `data/SH.600000.csv`.
pub fn kline_path(dir: impl AsRef<Path>, code: &str) -> std::path::PathBuf {
    dir.as_ref().join(format!("{}.csv", code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kline_path() {
        let path = kline_path("data", "SH.600000");
        assert_eq!(path, Path::new("data").join("SH.600000.csv"));
    }
}
