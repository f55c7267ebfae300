//! Price level queue with FIFO ordering
//!
//! A price level holds every resting order at one price on one side.
//! Arrival order is preserved to enforce time priority; the cumulative
//! volume is cached write-through so volume queries never walk the queue.

use std::collections::VecDeque;
use tracing::trace;
use types::errors::{ExchangeError, ExchangeResult};
use types::ids::OrderId;
use types::numeric::Price;

use super::order_node::OrderNode;

/// FIFO queue of resting orders sharing one price
#[derive(Debug, Clone)]
pub struct PriceLevelQueue {
    price: Price,
    orders: VecDeque<OrderNode>,
    total_volume: u64,
}

impl PriceLevelQueue {
    /// Create a new empty queue for the given price
    pub fn new(price: Price) -> Self {
        Self {
            price,
            orders: VecDeque::new(),
            total_volume: 0,
        }
    }

    pub fn price(&self) -> Price {
        self.price
    }

    /// Append an order at the back of the queue (time priority)
    ///
    /// Rejects a node whose price differs from the queue's price.
    pub fn push_back(&mut self, node: OrderNode) -> ExchangeResult<()> {
        if node.price() != self.price {
            return Err(ExchangeError::Internal {
                message: format!(
                    "order {} at {} enqueued on level {}",
                    node.order_id(),
                    node.price(),
                    self.price
                ),
            });
        }
        self.total_volume += node.remaining_volume();
        self.orders.push_back(node);
        Ok(())
    }

    /// Head of the queue without removing it
    pub fn peek(&self) -> Option<&OrderNode> {
        self.orders.front()
    }

    /// Remove and return the head of the queue
    pub fn pop_front(&mut self) -> Option<OrderNode> {
        let node = self.orders.pop_front()?;
        self.total_volume -= node.remaining_volume();
        Some(node)
    }

    /// Consume `volume` from the head order
    ///
    /// Returns the head node if the fill exhausted it (already unlinked);
    /// None when the head survives with reduced volume or the queue is
    /// empty. The volume cache is adjusted either way.
    pub fn fill_front(&mut self, volume: u64) -> Option<OrderNode> {
        let head = self.orders.front_mut()?;
        debug_assert!(volume <= head.remaining_volume());

        head.fill(volume);
        self.total_volume -= volume;

        if head.is_exhausted() {
            let filled = self.orders.pop_front();
            if let Some(node) = &filled {
                trace!(order_id = %node.order_id(), price = %self.price, "order fully filled");
            }
            filled
        } else {
            None
        }
    }

    /// Remove an order anywhere in the queue by id
    ///
    /// Returns the removed node, or None if no such order rests here.
    pub fn remove(&mut self, order_id: OrderId) -> Option<OrderNode> {
        let position = self.orders.iter().position(|n| n.order_id() == order_id)?;
        let node = self.orders.remove(position)?;
        self.total_volume -= node.remaining_volume();
        trace!(order_id = %order_id, price = %self.price, "order removed from level");
        Some(node)
    }

    pub fn has_orders(&self) -> bool {
        !self.orders.is_empty()
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Cached sum of remaining volumes across the queue
    pub fn total_volume(&self) -> u64 {
        self.total_volume
    }

    /// Orders in queue order, for inspection
    pub fn iter(&self) -> impl Iterator<Item = &OrderNode> {
        self.orders.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::order::Side;

    fn node(id: i64, price: u64, volume: u64) -> OrderNode {
        OrderNode::new(
            OrderId::from_raw(id),
            format!("user{id}"),
            Side::Ask,
            Price::from_u64(price),
            "AAPL",
            1708123456789 + id,
            volume,
        )
    }

    #[test]
    fn test_new_queue_is_empty() {
        let queue = PriceLevelQueue::new(Price::from_u64(100));
        assert!(!queue.has_orders());
        assert_eq!(queue.total_volume(), 0);
        assert!(queue.peek().is_none());
    }

    #[test]
    fn test_push_updates_volume_cache() {
        let mut queue = PriceLevelQueue::new(Price::from_u64(100));
        queue.push_back(node(1, 100, 3)).unwrap();
        queue.push_back(node(2, 100, 5)).unwrap();

        assert!(queue.has_orders());
        assert_eq!(queue.order_count(), 2);
        assert_eq!(queue.total_volume(), 8);
    }

    #[test]
    fn test_push_rejects_wrong_price() {
        let mut queue = PriceLevelQueue::new(Price::from_u64(100));
        let err = queue.push_back(node(1, 101, 3)).unwrap_err();
        assert!(err.is_internal());
        assert!(!queue.has_orders());
    }

    #[test]
    fn test_fifo_ordering() {
        let mut queue = PriceLevelQueue::new(Price::from_u64(100));
        queue.push_back(node(1, 100, 3)).unwrap();
        queue.push_back(node(2, 100, 5)).unwrap();
        queue.push_back(node(3, 100, 2)).unwrap();

        assert_eq!(queue.peek().unwrap().order_id(), OrderId::from_raw(1));
        assert_eq!(queue.pop_front().unwrap().order_id(), OrderId::from_raw(1));
        assert_eq!(queue.pop_front().unwrap().order_id(), OrderId::from_raw(2));
        assert_eq!(queue.pop_front().unwrap().order_id(), OrderId::from_raw(3));
        assert!(queue.pop_front().is_none());
    }

    #[test]
    fn test_fill_front_partial() {
        let mut queue = PriceLevelQueue::new(Price::from_u64(100));
        queue.push_back(node(1, 100, 10)).unwrap();

        let exhausted = queue.fill_front(4);
        assert!(exhausted.is_none());
        assert_eq!(queue.total_volume(), 6);
        assert_eq!(queue.peek().unwrap().remaining_volume(), 6);
    }

    #[test]
    fn test_fill_front_exhausts_head() {
        let mut queue = PriceLevelQueue::new(Price::from_u64(100));
        queue.push_back(node(1, 100, 10)).unwrap();
        queue.push_back(node(2, 100, 7)).unwrap();

        let exhausted = queue.fill_front(10).unwrap();
        assert_eq!(exhausted.order_id(), OrderId::from_raw(1));
        assert_eq!(queue.total_volume(), 7);
        assert_eq!(queue.peek().unwrap().order_id(), OrderId::from_raw(2));
    }

    #[test]
    fn test_remove_middle_order() {
        let mut queue = PriceLevelQueue::new(Price::from_u64(100));
        queue.push_back(node(1, 100, 3)).unwrap();
        queue.push_back(node(2, 100, 5)).unwrap();
        queue.push_back(node(3, 100, 2)).unwrap();

        let removed = queue.remove(OrderId::from_raw(2)).unwrap();
        assert_eq!(removed.remaining_volume(), 5);
        assert_eq!(queue.total_volume(), 5);

        // FIFO order of the survivors is unchanged
        assert_eq!(queue.pop_front().unwrap().order_id(), OrderId::from_raw(1));
        assert_eq!(queue.pop_front().unwrap().order_id(), OrderId::from_raw(3));
    }

    #[test]
    fn test_remove_unknown_order() {
        let mut queue = PriceLevelQueue::new(Price::from_u64(100));
        queue.push_back(node(1, 100, 3)).unwrap();
        assert!(queue.remove(OrderId::from_raw(99)).is_none());
        assert_eq!(queue.total_volume(), 3);
    }

    #[test]
    fn test_volume_cache_matches_sum() {
        let mut queue = PriceLevelQueue::new(Price::from_u64(100));
        queue.push_back(node(1, 100, 3)).unwrap();
        queue.push_back(node(2, 100, 5)).unwrap();
        queue.fill_front(2);
        queue.remove(OrderId::from_raw(2));

        let walked: u64 = queue.iter().map(|n| n.remaining_volume()).sum();
        assert_eq!(queue.total_volume(), walked);
    }
}
