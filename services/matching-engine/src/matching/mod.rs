//! Matching logic module
//!
//! Contains crossing detection and trade generation.

pub mod crossing;
pub mod executor;

pub use executor::TradeExecutor;
