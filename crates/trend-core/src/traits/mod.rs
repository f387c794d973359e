//! Core traits for the trend scoring engine.

mod indicator;
mod strategy;

pub use indicator::{neutralize_warmup, Indicator, IndicatorOutput};
pub use strategy::{Strategy, StrategyConfig};
