//! Portfolio accounting
//!
//! Tracks cash, per-ticker net positions with weighted average cost, and
//! realized/unrealized PnL over the fills reported by the matching engine.
//! Accounting lives entirely outside the matching core: books do not know
//! portfolios exist.

pub mod portfolio;
pub mod position;

pub use portfolio::Portfolio;
pub use position::TickerPosition;
