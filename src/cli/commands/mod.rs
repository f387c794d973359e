//! CLI command implementations.

pub mod evaluate;
pub mod indicators;
pub mod screen;
pub mod strategies;
pub mod validate;
