//! Error types for the trend scoring engine.

use thiserror::Error;

/// Top-level engine error.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("Strategy error: {0}")]
    Strategy(#[from] StrategyError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Data-integrity errors raised by bar validation and series alignment.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("Invalid bar at index {index}: {reason}")]
    InvalidBar { index: usize, reason: String },

    #[error("Bars out of order at index {index}: time keys must be strictly ascending")]
    OutOfOrder { index: usize },

    #[error("Length mismatch for '{key}': expected {expected}, got {actual}")]
    LengthMismatch {
        key: String,
        expected: usize,
        actual: usize,
    },

    #[error("No data available")]
    NoDataAvailable,

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Data source error: {0}")]
    Internal(String),
}

/// Indicator configuration and calculation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("Indicator not found: {0}")]
    NotFound(String),

    #[error("Duplicate indicator key: {0}")]
    DuplicateKey(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Indicator '{key}' returned {actual} signals for {expected} bars")]
    LengthMismatch {
        key: String,
        expected: usize,
        actual: usize,
    },
}

/// Strategy configuration and evaluation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StrategyError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Strategy not found: {0}")]
    NotFound(String),

    #[error("Duplicate strategy key: {0}")]
    DuplicateKey(String),

    #[error("Strategy '{key}' returned {actual} positions for {expected} bars")]
    LengthMismatch {
        key: String,
        expected: usize,
        actual: usize,
    },
}

impl IndicatorError {
    /// Whether the error stems from configuration rather than input data.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::DuplicateKey(_) | Self::InvalidParameter(_)
        )
    }
}

impl StrategyError {
    /// Whether the error stems from configuration rather than input data.
    pub fn is_config(&self) -> bool {
        !matches!(self, Self::LengthMismatch { .. })
    }
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
