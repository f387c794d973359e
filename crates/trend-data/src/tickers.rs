//! Ticker metadata loader.

use csv::ReaderBuilder;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};
use trend_core::error::DataError;
use trend_core::types::{Ticker, TickerType};

#[derive(Debug, Deserialize)]
struct TickerRecord {
    id: i64,
    code: String,
    #[serde(default)]
    name: String,
    #[serde(rename = "type", alias = "ticker_type")]
    ticker_type: TickerType,
    #[serde(alias = "pettm", default)]
    pe_ttm: Option<f64>,
    #[serde(default)]
    pb: Option<f64>,
    #[serde(default)]
    total_share: Option<f64>,
}

impl From<TickerRecord> for Ticker {
    fn from(r: TickerRecord) -> Self {
        Ticker {
            id: r.id,
            code: r.code,
            name: r.name,
            ticker_type: r.ticker_type,
            pe_ttm: r.pe_ttm,
            pb: r.pb,
            total_share: r.total_share,
        }
    }
}

/// Load the ticker list from a CSV file.
pub fn load_tickers(path: impl AsRef<Path>) -> Result<Vec<Ticker>, DataError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(DataError::NoDataAvailable);
    }
    let file = std::fs::File::open(path).map_err(|e| DataError::Internal(e.to_string()))?;
    let tickers = tickers_from_reader(file)?;
    debug!(path = %path.display(), tickers = tickers.len(), "Loaded tickers");
    Ok(tickers)
}

/// Parse tickers from any CSV reader. Later rows with a repeated id are dropped.
pub fn tickers_from_reader<R: Read>(rdr: R) -> Result<Vec<Ticker>, DataError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(rdr);

    let mut tickers: Vec<Ticker> = Vec::new();
    for result in reader.deserialize() {
        let record: TickerRecord = result.map_err(|e| DataError::ParseError(e.to_string()))?;
        if tickers.iter().any(|t| t.id == record.id) {
            warn!(id = record.id, code = %record.code, "Duplicate ticker id, skipping");
            continue;
        }
        tickers.push(record.into());
    }
    Ok(tickers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_tickers() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "id,code,name,type,pe_ttm,pb,total_share").unwrap();
        writeln!(file, "1,SH.600000,Pudong Bank,STOCK,5.2,0.4,29352000000").unwrap();
        writeln!(file, "2,SH.000001,SSE Composite,IDX,,,").unwrap();
        writeln!(file, "3,US.AAPL,Apple,STOCK,31.0,45.1,").unwrap();
        file.flush().unwrap();

        let tickers = load_tickers(file.path()).unwrap();
        assert_eq!(tickers.len(), 3);
        assert_eq!(tickers[0].ticker_type, TickerType::Stock);
        assert_eq!(tickers[0].pe_ttm, Some(5.2));
        assert_eq!(tickers[1].ticker_type, TickerType::Index);
        assert!(tickers[1].pb.is_none());
        assert!(tickers[2].total_share.is_none());
    }

    #[test]
    fn test_duplicate_ids_skipped() {
        let data = "id,code,type\n1,SZ.000001,STOCK\n1,SZ.000002,STOCK\n";
        let tickers = tickers_from_reader(data.as_bytes()).unwrap();
        assert_eq!(tickers.len(), 1);
        assert_eq!(tickers[0].code, "SZ.000001");
    }

    #[test]
    fn test_unknown_type_fails() {
        let data = "id,code,type\n1,SZ.000001,CRYPTO\n";
        assert!(matches!(
            tickers_from_reader(data.as_bytes()),
            Err(DataError::ParseError(_))
        ));
    }
}
