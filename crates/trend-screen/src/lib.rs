//! Candidate screening over scored tickers.
//!
//! The [`FilterEngine`] combines ticker metadata, daily bars and the trend
//! score history into a pass/reject decision. Three rule sets ship by default:
//! [`FilterConfig::normal`], [`FilterConfig::valuation`] and
//! [`FilterConfig::nine_turn`].

mod config;
mod engine;
pub mod weekly;

pub use config::{FilterConfig, NineTurnRule, ValuationBounds};
pub use engine::{nine_turn_counts, FilterEngine, RejectReason, ScreenDecision};
pub use weekly::weekly_closes;
