//! Unique identifier types for exchange entities
//!
//! Order and trade ids are small positive integers drawn from a single
//! process-wide strictly increasing counter, so an id is unique across
//! every book and across both kinds of entity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Unique identifier for an order
///
/// Always positive for an order that actually rested; the wire layer uses
/// `-1` to signal "no order added to the book".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(i64);

impl OrderId {
    /// Wrap a raw id received from the wire
    pub fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Get the inner integer
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeId(i64);

impl TradeId {
    pub fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Generator of order and trade ids
///
/// Clones share one counter, so every book fed from the same source hands
/// out globally unique, strictly increasing ids. The first id issued is 1.
#[derive(Debug, Clone)]
pub struct IdSource {
    counter: Arc<AtomicI64>,
}

impl IdSource {
    pub fn new() -> Self {
        Self {
            counter: Arc::new(AtomicI64::new(0)),
        }
    }

    pub fn next_order_id(&self) -> OrderId {
        OrderId(self.bump())
    }

    pub fn next_trade_id(&self) -> TradeId {
        TradeId(self.bump())
    }

    fn bump(&self) -> i64 {
        self.counter.fetch_add(1, Ordering::Relaxed) + 1
    }
}

impl Default for IdSource {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_start_at_one_and_increase() {
        let source = IdSource::new();
        assert_eq!(source.next_order_id().as_i64(), 1);
        assert_eq!(source.next_trade_id().as_i64(), 2);
        assert_eq!(source.next_order_id().as_i64(), 3);
    }

    #[test]
    fn test_clones_share_the_counter() {
        let source = IdSource::new();
        let clone = source.clone();

        let a = source.next_order_id();
        let b = clone.next_order_id();
        assert_ne!(a, b, "ids from cloned sources must stay unique");
        assert!(b > a);
    }

    #[test]
    fn test_order_id_serialization() {
        let id = OrderId::from_raw(42);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "42");

        let deserialized: OrderId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_trade_id_display() {
        assert_eq!(TradeId::from_raw(7).to_string(), "7");
    }
}
