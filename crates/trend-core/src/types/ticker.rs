//! Ticker metadata.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Security type as reported by the market data vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TickerType {
    #[serde(alias = "DEL")]
    Delisted,
    Stock,
    #[serde(alias = "IDX")]
    Index,
    Bond,
    Drvt,
    Future,
    Etf,
    Bwrt,
    Warrant,
    Plate,
    #[serde(alias = "PLATESET")]
    PlateSet,
}

impl TickerType {
    /// Numeric vendor code.
    pub fn code(self) -> u8 {
        match self {
            TickerType::Delisted => 0,
            TickerType::Stock => 1,
            TickerType::Index => 2,
            TickerType::Bond => 3,
            TickerType::Drvt => 4,
            TickerType::Future => 5,
            TickerType::Etf => 11,
            TickerType::Bwrt => 50,
            TickerType::Warrant => 60,
            TickerType::Plate => 90,
            TickerType::PlateSet => 91,
        }
    }

    /// Parse a vendor code.
    pub fn from_code(code: u8) -> Option<Self> {
        let ty = match code {
            0 => TickerType::Delisted,
            1 => TickerType::Stock,
            2 => TickerType::Index,
            3 => TickerType::Bond,
            4 => TickerType::Drvt,
            5 => TickerType::Future,
            11 => TickerType::Etf,
            50 => TickerType::Bwrt,
            60 => TickerType::Warrant,
            90 => TickerType::Plate,
            91 => TickerType::PlateSet,
            _ => return None,
        };
        Some(ty)
    }
}

/// Exchange group a ticker belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Market {
    /// Hong Kong
    HK,
    /// Shanghai and Shenzhen A-shares
    CN,
    /// United States
    US,
}

impl Market {
    /// Derive the market from a code like `SH.600000`, `HK.00700` or `US.AAPL`.
    pub fn from_code(code: &str) -> Option<Self> {
        let prefix = code.split('.').next()?.to_ascii_uppercase();
        match prefix.as_str() {
            "HK" => Some(Market::HK),
            "SH" | "SZ" => Some(Market::CN),
            "US" => Some(Market::US),
            _ => None,
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Market::HK => write!(f, "HK"),
            Market::CN => write!(f, "CN"),
            Market::US => write!(f, "US"),
        }
    }
}

/// A tradable instrument with the valuation fields used by screening.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    pub id: i64,
    pub code: String,
    #[serde(default)]
    pub name: String,
    pub ticker_type: TickerType,
    /// Trailing price/earnings ratio
    #[serde(default)]
    pub pe_ttm: Option<f64>,
    /// Price/book ratio
    #[serde(default)]
    pub pb: Option<f64>,
    /// Total shares outstanding
    #[serde(default)]
    pub total_share: Option<f64>,
}

impl Ticker {
    /// Create a stock ticker without valuation data.
    pub fn stock(id: i64, code: impl Into<String>) -> Self {
        Self {
            id,
            code: code.into(),
            name: String::new(),
            ticker_type: TickerType::Stock,
            pe_ttm: None,
            pb: None,
            total_share: None,
        }
    }

    pub fn market(&self) -> Option<Market> {
        Market::from_code(&self.code)
    }

    /// Market capitalisation at the given price.
    pub fn market_cap(&self, price: f64) -> Option<f64> {
        self.total_share.map(|shares| shares * price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_type_codes() {
        for code in [0u8, 1, 2, 3, 4, 5, 11, 50, 60, 90, 91] {
            let ty = TickerType::from_code(code).unwrap();
            assert_eq!(ty.code(), code);
        }
        assert!(TickerType::from_code(7).is_none());
    }

    #[test]
    fn test_market_from_code() {
        assert_eq!(Market::from_code("SH.600000"), Some(Market::CN));
        assert_eq!(Market::from_code("sz.000001"), Some(Market::CN));
        assert_eq!(Market::from_code("HK.00700"), Some(Market::HK));
        assert_eq!(Market::from_code("US.AAPL"), Some(Market::US));
        assert_eq!(Market::from_code("AAPL"), None);
    }

    #[test]
    fn test_market_cap() {
        let mut ticker = Ticker::stock(1, "SH.600000");
        assert!(ticker.market_cap(10.0).is_none());

        ticker.total_share = Some(1_000_000.0);
        assert!((ticker.market_cap(10.0).unwrap() - 10_000_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_ticker_type_serde() {
        let ty: TickerType = serde_json::from_str("\"STOCK\"").unwrap();
        assert_eq!(ty, TickerType::Stock);
        let ty: TickerType = serde_json::from_str("\"IDX\"").unwrap();
        assert_eq!(ty, TickerType::Index);
    }
}
