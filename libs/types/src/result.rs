//! Operation result records

use crate::ids::OrderId;
use crate::numeric::Price;
use crate::trade::Trade;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Outcome of one order submission
///
/// `trades_executed` and `order_added_to_book` are derived from the other
/// two fields at construction, so the four always agree: trades executed iff
/// `trades` is non-empty, order added iff `order_id` is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderResult {
    pub trades_executed: bool,
    pub trades: Vec<Trade>,
    pub order_added_to_book: bool,
    pub order_id: Option<OrderId>,
}

impl OrderResult {
    pub fn new(trades: Vec<Trade>, order_id: Option<OrderId>) -> Self {
        Self {
            trades_executed: !trades.is_empty(),
            order_added_to_book: order_id.is_some(),
            trades,
            order_id,
        }
    }

    /// Total volume filled across all executions of this submission
    pub fn filled_volume(&self) -> u64 {
        self.trades.iter().map(|t| t.volume).sum()
    }
}

/// Best bid and best ask with their available volumes
///
/// A side with no liquidity reports price 0 and volume 0; `book_has_top` is
/// true when at least one side has liquidity. Prices are plain decimals here
/// because zero is a legal "absent" marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopOfBook {
    pub book_has_top: bool,
    pub ask_price: Decimal,
    pub ask_volume: u64,
    pub bid_price: Decimal,
    pub bid_volume: u64,
}

impl TopOfBook {
    /// Build from the per-side best levels, absent sides as None
    pub fn from_sides(bid: Option<(Price, u64)>, ask: Option<(Price, u64)>) -> Self {
        let (bid_price, bid_volume) = match bid {
            Some((price, volume)) => (price.as_decimal(), volume),
            None => (Decimal::ZERO, 0),
        };
        let (ask_price, ask_volume) = match ask {
            Some((price, volume)) => (price.as_decimal(), volume),
            None => (Decimal::ZERO, 0),
        };
        Self {
            book_has_top: bid.is_some() || ask.is_some(),
            ask_price,
            ask_volume,
            bid_price,
            bid_volume,
        }
    }

    /// An empty book: no top on either side
    pub fn empty() -> Self {
        Self::from_sides(None, None)
    }
}
