//! Trade execution record

use crate::ids::TradeId;
use crate::numeric::Price;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single execution between a bid and an ask
///
/// Trades execute at the resting order's price, so an aggressor whose limit
/// is better than the book receives price improvement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: TradeId,
    pub price: Price,
    pub volume: u64,
    /// Execution time, Unix millis
    pub timestamp: i64,
    pub bid_user_id: String,
    pub ask_user_id: String,
}

impl Trade {
    pub fn new(
        trade_id: TradeId,
        price: Price,
        volume: u64,
        timestamp: i64,
        bid_user_id: impl Into<String>,
        ask_user_id: impl Into<String>,
    ) -> Self {
        Self {
            trade_id,
            price,
            volume,
            timestamp,
            bid_user_id: bid_user_id.into(),
            ask_user_id: ask_user_id.into(),
        }
    }

    /// Trade value (price × volume)
    pub fn notional(&self) -> Decimal {
        self.price.as_decimal() * Decimal::from(self.volume)
    }

    /// Whether the given user was on either side of this trade
    pub fn involves(&self, user_id: &str) -> bool {
        self.bid_user_id == user_id || self.ask_user_id == user_id
    }

    /// Both sides belong to the same user. The engine permits this; the
    /// predicate exists for observers that care.
    pub fn is_self_trade(&self) -> bool {
        self.bid_user_id == self.ask_user_id
    }
}
