//! Core types and traits for the trend scoring engine.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (PriceBar, Ticker)
//! - Directional signals and indicator groups
//! - Core traits for indicators and position strategies
//! - The shared error taxonomy

pub mod error;
pub mod traits;
pub mod types;

pub use error::{EngineError, EngineResult};
pub use traits::*;
pub use types::*;
