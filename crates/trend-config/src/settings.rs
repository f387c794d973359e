//! Configuration structures.

use serde::{Deserialize, Serialize};
use trend_backtest::DEFAULT_NOTIONAL;
use trend_core::error::EngineError;
use trend_score::ScoreConfig;
use trend_screen::FilterConfig;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub backtest: BacktestSettings,
    #[serde(default)]
    pub score: ScoreConfig,
    #[serde(default)]
    pub filter: FilterConfig,
}

impl AppConfig {
    /// Check every tuning section.
    pub fn validate(&self) -> Result<(), EngineError> {
        self.logging.validate()?;
        self.backtest.validate()?;
        self.score.validate()?;
        self.filter.validate()
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "trendscore".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    /// Log directory; stdout only when unset
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }

    fn validate(&self) -> Result<(), EngineError> {
        match self.format.to_ascii_lowercase().as_str() {
            "pretty" | "json" => Ok(()),
            other => Err(EngineError::Validation(format!(
                "logging.format must be 'pretty' or 'json', got '{}'",
                other
            ))),
        }
    }
}

/// Input locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Directory holding one `<code>.csv` K-line file per ticker
    pub kline_dir: String,
    /// Ticker metadata CSV
    pub tickers_file: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            kline_dir: "data/klines".to_string(),
            tickers_file: "data/tickers.csv".to_string(),
        }
    }
}

/// Backtest settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestSettings {
    /// Capital committed per trade
    pub notional: f64,
}

impl Default for BacktestSettings {
    fn default() -> Self {
        Self {
            notional: DEFAULT_NOTIONAL,
        }
    }
}

impl BacktestSettings {
    fn validate(&self) -> Result<(), EngineError> {
        if !(self.notional.is_finite() && self.notional > 0.0) {
            return Err(EngineError::Validation(format!(
                "backtest.notional must be positive, got {}",
                self.notional
            )));
        }
        Ok(())
    }
}
