//! Resting-order record

use types::ids::OrderId;
use types::numeric::Price;
use types::order::Side;

/// One resting order in the book
///
/// Identity fields are fixed at creation; only `remaining_volume` changes,
/// and only through [`OrderNode::fill`]. Equality is by order id.
#[derive(Debug, Clone)]
pub struct OrderNode {
    order_id: OrderId,
    user_id: String,
    side: Side,
    price: Price,
    ticker: String,
    timestamp: i64,
    remaining_volume: u64,
}

impl OrderNode {
    pub fn new(
        order_id: OrderId,
        user_id: impl Into<String>,
        side: Side,
        price: Price,
        ticker: impl Into<String>,
        timestamp: i64,
        volume: u64,
    ) -> Self {
        Self {
            order_id,
            user_id: user_id.into(),
            side,
            price,
            ticker: ticker.into(),
            timestamp,
            remaining_volume: volume,
        }
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn remaining_volume(&self) -> u64 {
        self.remaining_volume
    }

    /// Consume part of the remaining volume
    ///
    /// Caller guarantees `volume <= remaining_volume`; a node at zero is
    /// removed from its queue before anything else can observe it.
    pub(crate) fn fill(&mut self, volume: u64) {
        debug_assert!(volume <= self.remaining_volume);
        self.remaining_volume -= volume;
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining_volume == 0
    }
}

impl PartialEq for OrderNode {
    fn eq(&self, other: &Self) -> bool {
        self.order_id == other.order_id
    }
}

impl Eq for OrderNode {}
