//! Core data types for the trend scoring engine.

mod bar;
mod signal;
mod ticker;

pub use bar::{validate_series, BarSeriesExt, PriceBar};
pub use signal::{trailing_run, IndicatorGroup, Signal};
pub use ticker::{Market, Ticker, TickerType};
