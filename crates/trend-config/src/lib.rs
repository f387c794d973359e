//! Configuration management.

mod settings;

pub use settings::{AppConfig, AppSettings, BacktestSettings, DataSettings, LoggingConfig};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Environment prefix, e.g. `TRENDSCORE__BACKTEST__NOTIONAL=50000`.
pub const ENV_PREFIX: &str = "TRENDSCORE";

/// Load configuration from file and environment.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_partial_file() {
        let file = write_config(
            r#"
[backtest]
notional = 50000.0

[score]
trend_window = 10

[filter]
excluded_prefixes = ["SH.688"]
"#,
        );

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.backtest.notional, 50_000.0);
        assert_eq!(config.score.trend_window, 10);
        assert_eq!(config.score.time_decay_window, 10);
        assert_eq!(config.filter.excluded_prefixes, vec!["SH.688".to_string()]);
        assert_eq!(config.filter.capitulation_bars, 4);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_score_model_and_nine_turn() {
        let file = write_config(
            r#"
[score]
model = "normal"

[filter.nine_turn]
down_exact = 8
"#,
        );

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.score.model, trend_score::ScoreModel::Normal);
        let rule = config.filter.nine_turn.unwrap();
        assert_eq!(rule.down_exact, 8);
        assert_eq!(rule.lookback, 4);
    }

    #[test]
    fn test_env_override() {
        std::env::set_var("TRENDSCORE__DATA__KLINE_DIR", "/srv/klines");
        let file = write_config("[app]\nname = \"screen\"\nenvironment = \"test\"\n");

        let config = load_config(file.path()).unwrap();
        std::env::remove_var("TRENDSCORE__DATA__KLINE_DIR");

        assert_eq!(config.app.name, "screen");
        assert_eq!(config.data.kline_dir, "/srv/klines");
    }

    #[test]
    fn test_missing_file() {
        assert!(load_config(Path::new("/nonexistent/trendscore.toml")).is_err());
    }

    #[test]
    fn test_validate() {
        assert!(AppConfig::default().validate().is_ok());

        let mut config = AppConfig::default();
        config.backtest.notional = 0.0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.logging.format = "xml".into();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.score.time_decay_factor = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_file_roundtrip() {
        let text = toml::to_string(&AppConfig::default()).unwrap();
        let file = write_config(&text);
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.score, AppConfig::default().score);
        assert_eq!(config.filter, AppConfig::default().filter);
    }
}
