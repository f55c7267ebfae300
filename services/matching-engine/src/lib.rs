//! Matching Engine Service
//!
//! Price-time priority continuous double auction. One `LimitOrderBook` per
//! symbol matches aggressive limit orders against resting liquidity, best
//! price first and FIFO within a price; the `Exchange` routes submissions
//! to the right book and aggregates per-user trade history.
//!
//! **Key invariants:**
//! - Price-time priority strictly enforced
//! - Trades execute at the resting order's price
//! - Per-level volume caches always equal the sum of resting volumes
//! - After any submission the best bid is strictly below the best ask

pub mod book;
pub mod exchange;
pub mod lob;
pub mod matching;

mod time;

pub use exchange::Exchange;
pub use lob::LimitOrderBook;
pub use time::now_millis;
