//! Per-symbol limit order book
//!
//! Coordinates the two book sides, the order-id index, and the trade log.
//! An incoming order sweeps the opposite side best price first, FIFO within
//! a price, then rests any residual volume on its own side.

use std::collections::HashMap;
use tracing::{debug, trace};
use types::errors::{ExchangeError, ExchangeResult};
use types::ids::{IdSource, OrderId};
use types::numeric::Price;
use types::order::Side;
use types::result::{OrderResult, TopOfBook};
use types::trade::Trade;

use crate::book::{AskBook, BidBook, OrderNode};
use crate::matching::{crossing, TradeExecutor};

/// Limit order book for a single symbol
///
/// All mutating operations take `&mut self`: one book has exactly one
/// writer at a time, which is what makes price-time priority a total order
/// over submissions.
#[derive(Debug, Clone)]
pub struct LimitOrderBook {
    ticker: String,
    bids: BidBook,
    asks: AskBook,
    /// Location index for O(1) cancellation lookup: id -> (side, price)
    orders_by_id: HashMap<OrderId, (Side, Price)>,
    /// Append-only log of executions in match order
    filled_trades: Vec<Trade>,
    ids: IdSource,
    executor: TradeExecutor,
}

impl LimitOrderBook {
    /// Create an empty book for `ticker`, drawing ids from `ids`
    pub fn new(ticker: impl Into<String>, ids: IdSource) -> Self {
        Self {
            ticker: ticker.into(),
            bids: BidBook::new(),
            asks: AskBook::new(),
            orders_by_id: HashMap::new(),
            filled_trades: Vec::new(),
            executor: TradeExecutor::new(ids.clone()),
            ids,
        }
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// Submit a limit order
    ///
    /// Matches against the opposite side while prices cross, then rests any
    /// residual volume. Validation failures leave the book untouched and
    /// emit no trades.
    pub fn handle_order(
        &mut self,
        user_id: &str,
        side: Side,
        volume: u64,
        price: Price,
        timestamp: i64,
        ticker: &str,
    ) -> ExchangeResult<OrderResult> {
        if ticker != self.ticker {
            return Err(ExchangeError::UnknownTicker {
                ticker: ticker.to_string(),
            });
        }
        if user_id.is_empty() {
            return Err(ExchangeError::EmptyUserId);
        }
        if volume == 0 {
            return Err(ExchangeError::InvalidVolume);
        }

        let mut residual = volume;
        let mut trades = Vec::new();

        match side {
            Side::Bid => self.sweep_asks(user_id, price, timestamp, &mut residual, &mut trades),
            Side::Ask => self.sweep_bids(user_id, price, timestamp, &mut residual, &mut trades),
        }

        let mut order_id = None;
        if residual > 0 {
            let id = self.ids.next_order_id();
            let node = OrderNode::new(
                id,
                user_id,
                side,
                price,
                self.ticker.as_str(),
                timestamp,
                residual,
            );
            match side {
                Side::Bid => self.bids.insert(node)?,
                Side::Ask => self.asks.insert(node)?,
            }
            self.orders_by_id.insert(id, (side, price));
            order_id = Some(id);
            debug!(ticker = %self.ticker, order_id = %id, ?side, %price, residual,
                   "order rested on book");
        }

        Ok(OrderResult::new(trades, order_id))
    }

    /// Match an aggressive bid against resting asks, cheapest first
    fn sweep_asks(
        &mut self,
        user_id: &str,
        limit: Price,
        timestamp: i64,
        residual: &mut u64,
        trades: &mut Vec<Trade>,
    ) {
        while *residual > 0 {
            let Some((ask_price, level)) = self.asks.best_level_mut() else {
                break;
            };
            if !crossing::can_match(limit, ask_price) {
                break;
            }
            let Some(head) = level.peek() else {
                break;
            };

            let fill = (*residual).min(head.remaining_volume());
            let resting_user = head.user_id().to_string();
            let trade =
                self.executor
                    .execute(Side::Bid, user_id, &resting_user, ask_price, fill, timestamp);

            let exhausted = level.fill_front(fill);
            let emptied = !level.has_orders();
            if let Some(filled) = exhausted {
                self.orders_by_id.remove(&filled.order_id());
            }
            if emptied {
                self.asks.prune(ask_price);
            }

            *residual -= fill;
            trace!(ticker = %self.ticker, price = %ask_price, fill, residual = *residual,
                   "bid matched resting ask");
            self.filled_trades.push(trade.clone());
            trades.push(trade);
        }
    }

    /// Match an aggressive ask against resting bids, highest first
    fn sweep_bids(
        &mut self,
        user_id: &str,
        limit: Price,
        timestamp: i64,
        residual: &mut u64,
        trades: &mut Vec<Trade>,
    ) {
        while *residual > 0 {
            let Some((bid_price, level)) = self.bids.best_level_mut() else {
                break;
            };
            if !crossing::can_match(bid_price, limit) {
                break;
            }
            let Some(head) = level.peek() else {
                break;
            };

            let fill = (*residual).min(head.remaining_volume());
            let resting_user = head.user_id().to_string();
            let trade =
                self.executor
                    .execute(Side::Ask, user_id, &resting_user, bid_price, fill, timestamp);

            let exhausted = level.fill_front(fill);
            let emptied = !level.has_orders();
            if let Some(filled) = exhausted {
                self.orders_by_id.remove(&filled.order_id());
            }
            if emptied {
                self.bids.prune(bid_price);
            }

            *residual -= fill;
            trace!(ticker = %self.ticker, price = %bid_price, fill, residual = *residual,
                   "ask matched resting bid");
            self.filled_trades.push(trade.clone());
            trades.push(trade);
        }
    }

    /// Cancel a resting order by id
    ///
    /// Not-found when the id is unknown; an index entry pointing at a level
    /// that does not hold the order is an internal inconsistency.
    pub fn cancel_order(&mut self, order_id: OrderId) -> ExchangeResult<()> {
        let (side, price) = *self
            .orders_by_id
            .get(&order_id)
            .ok_or(ExchangeError::OrderNotFound { order_id })?;

        let removed = match side {
            Side::Bid => self.bids.remove(order_id, price),
            Side::Ask => self.asks.remove(order_id, price),
        };
        let node = removed.ok_or_else(|| ExchangeError::Internal {
            message: format!("order {order_id} indexed at {side:?} {price} but missing from the book"),
        })?;

        self.orders_by_id.remove(&order_id);
        debug!(ticker = %self.ticker, %order_id, volume = node.remaining_volume(),
               "order cancelled");
        Ok(())
    }

    /// Resting volume at a price on one side, 0 when absent
    pub fn get_volume(&self, price: Price, side: Side) -> u64 {
        match side {
            Side::Bid => self.bids.volume_at(price),
            Side::Ask => self.asks.volume_at(price),
        }
    }

    /// Best bid and ask with volumes
    pub fn top_of_book(&self) -> TopOfBook {
        TopOfBook::from_sides(self.bids.best(), self.asks.best())
    }

    /// Last `count` trades in chronological order
    ///
    /// Empty when `count <= 0`; everything when fewer trades exist.
    pub fn previous_trades(&self, count: i64) -> Vec<Trade> {
        if count <= 0 {
            return Vec::new();
        }
        let start = self.filled_trades.len().saturating_sub(count as usize);
        self.filled_trades[start..].to_vec()
    }

    /// Number of orders currently resting
    pub fn resting_order_count(&self) -> usize {
        self.orders_by_id.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(ticker: &str) -> LimitOrderBook {
        LimitOrderBook::new(ticker, IdSource::new())
    }

    fn submit(
        lob: &mut LimitOrderBook,
        user: &str,
        side: Side,
        volume: u64,
        price: u64,
    ) -> OrderResult {
        let ticker = lob.ticker().to_string();
        lob.handle_order(user, side, volume, Price::from_u64(price), 0, &ticker)
            .unwrap()
    }

    #[test]
    fn test_initial_state() {
        let lob = book("AAPL");
        assert_eq!(lob.ticker(), "AAPL");
        assert!(!lob.top_of_book().book_has_top);
        assert_eq!(lob.get_volume(Price::from_u64(100), Side::Ask), 0);
        assert_eq!(lob.get_volume(Price::from_u64(100), Side::Bid), 0);
        assert!(lob.previous_trades(5).is_empty());
    }

    #[test]
    fn test_resting_order_no_trades() {
        let mut lob = book("MSFT");
        let result = submit(&mut lob, "u1", Side::Bid, 100, 250);

        assert!(result.order_added_to_book);
        assert!(!result.trades_executed);
        assert!(result.trades.is_empty());
        assert!(result.order_id.is_some());

        let top = lob.top_of_book();
        assert!(top.book_has_top);
        assert_eq!(top.bid_price, Price::from_u64(250).as_decimal());
        assert_eq!(top.bid_volume, 100);
        assert_eq!(top.ask_volume, 0);
    }

    #[test]
    fn test_full_cross_at_resting_price() {
        let mut lob = book("AMZN");
        submit(&mut lob, "u1", Side::Ask, 10, 100);
        let result = submit(&mut lob, "u2", Side::Bid, 10, 105);

        assert!(result.trades_executed);
        assert!(!result.order_added_to_book);
        assert_eq!(result.order_id, None);
        assert_eq!(result.trades.len(), 1);

        let trade = &result.trades[0];
        assert_eq!(trade.price, Price::from_u64(100), "aggressor pays the resting price");
        assert_eq!(trade.volume, 10);
        assert_eq!(trade.ask_user_id, "u1");
        assert_eq!(trade.bid_user_id, "u2");

        assert!(!lob.top_of_book().book_has_top);
        assert_eq!(lob.resting_order_count(), 0);
    }

    #[test]
    fn test_multi_level_sweep_with_leftover() {
        let mut lob = book("TSLA");
        submit(&mut lob, "m1", Side::Ask, 3, 500);
        submit(&mut lob, "m2", Side::Ask, 5, 505);

        let result = submit(&mut lob, "taker", Side::Bid, 7, 510);
        assert_eq!(result.trades.len(), 2);
        assert_eq!(result.trades[0].price, Price::from_u64(500));
        assert_eq!(result.trades[0].volume, 3);
        assert_eq!(result.trades[1].price, Price::from_u64(505));
        assert_eq!(result.trades[1].volume, 4);
        assert!(!result.order_added_to_book);

        assert_eq!(lob.get_volume(Price::from_u64(505), Side::Ask), 1);
        let top = lob.top_of_book();
        assert_eq!(top.ask_price, Price::from_u64(505).as_decimal());
        assert_eq!(top.ask_volume, 1);
        assert_eq!(top.bid_volume, 0);
    }

    #[test]
    fn test_fifo_within_level() {
        let mut lob = book("AAPL");
        submit(&mut lob, "A", Side::Ask, 3, 100);
        submit(&mut lob, "B", Side::Ask, 5, 100);

        let result = submit(&mut lob, "taker", Side::Bid, 6, 100);
        assert_eq!(result.trades.len(), 2);
        assert_eq!(result.trades[0].ask_user_id, "A");
        assert_eq!(result.trades[0].volume, 3);
        assert_eq!(result.trades[1].ask_user_id, "B");
        assert_eq!(result.trades[1].volume, 3);

        assert_eq!(lob.get_volume(Price::from_u64(100), Side::Ask), 2);
    }

    #[test]
    fn test_cancel_middle_of_queue_preserves_fifo() {
        let mut lob = book("AAPL");
        submit(&mut lob, "A", Side::Ask, 3, 100);
        let middle = submit(&mut lob, "B", Side::Ask, 5, 100);
        submit(&mut lob, "C", Side::Ask, 2, 100);

        lob.cancel_order(middle.order_id.unwrap()).unwrap();
        assert_eq!(lob.get_volume(Price::from_u64(100), Side::Ask), 5);

        let result = submit(&mut lob, "taker", Side::Bid, 5, 100);
        assert_eq!(result.trades.len(), 2);
        assert_eq!(result.trades[0].ask_user_id, "A");
        assert_eq!(result.trades[0].volume, 3);
        assert_eq!(result.trades[1].ask_user_id, "C");
        assert_eq!(result.trades[1].volume, 2);
    }

    #[test]
    fn test_partial_fill_rests_aggressor() {
        let mut lob = book("AAPL");
        submit(&mut lob, "maker", Side::Ask, 2, 700);

        let result = submit(&mut lob, "taker", Side::Bid, 5, 700);
        assert_eq!(result.trades.len(), 1);
        assert_eq!(result.trades[0].volume, 2);
        assert!(result.order_added_to_book);

        assert_eq!(lob.get_volume(Price::from_u64(700), Side::Bid), 3);
        assert_eq!(lob.get_volume(Price::from_u64(700), Side::Ask), 0);
    }

    #[test]
    fn test_no_cross_when_prices_apart() {
        let mut lob = book("AAPL");
        submit(&mut lob, "u1", Side::Ask, 10, 101);
        let result = submit(&mut lob, "u2", Side::Bid, 10, 100);

        assert!(!result.trades_executed);
        assert!(result.order_added_to_book);

        let top = lob.top_of_book();
        assert_eq!(top.ask_price, Price::from_u64(101).as_decimal());
        assert_eq!(top.bid_price, Price::from_u64(100).as_decimal());
    }

    #[test]
    fn test_price_improvement_goes_to_aggressor() {
        let mut lob = book("AAPL");
        submit(&mut lob, "maker", Side::Bid, 4, 102);

        // Aggressive ask limited at 99 trades at the resting bid price 102
        let result = submit(&mut lob, "taker", Side::Ask, 4, 99);
        assert_eq!(result.trades.len(), 1);
        assert_eq!(result.trades[0].price, Price::from_u64(102));
    }

    #[test]
    fn test_self_trade_is_permitted() {
        let mut lob = book("AAPL");
        submit(&mut lob, "u1", Side::Ask, 5, 100);
        let result = submit(&mut lob, "u1", Side::Bid, 5, 100);

        assert_eq!(result.trades.len(), 1);
        assert!(result.trades[0].is_self_trade());
    }

    #[test]
    fn test_wrong_ticker_rejected() {
        let mut lob = book("AAPL");
        let err = lob
            .handle_order("u1", Side::Bid, 1, Price::from_u64(10), 0, "MSFT")
            .unwrap_err();
        assert_eq!(
            err,
            ExchangeError::UnknownTicker {
                ticker: "MSFT".to_string()
            }
        );
        assert!(!lob.top_of_book().book_has_top);
    }

    #[test]
    fn test_zero_volume_rejected() {
        let mut lob = book("AAPL");
        let err = lob
            .handle_order("u1", Side::Bid, 0, Price::from_u64(10), 0, "AAPL")
            .unwrap_err();
        assert_eq!(err, ExchangeError::InvalidVolume);
    }

    #[test]
    fn test_empty_user_rejected() {
        let mut lob = book("AAPL");
        let err = lob
            .handle_order("", Side::Bid, 1, Price::from_u64(10), 0, "AAPL")
            .unwrap_err();
        assert_eq!(err, ExchangeError::EmptyUserId);
    }

    #[test]
    fn test_cancel_unknown_order() {
        let mut lob = book("AAPL");
        let err = lob.cancel_order(OrderId::from_raw(42)).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_cancelled_order_cannot_cancel_twice() {
        let mut lob = book("AAPL");
        let result = submit(&mut lob, "u1", Side::Bid, 5, 100);
        let id = result.order_id.unwrap();

        lob.cancel_order(id).unwrap();
        assert!(lob.cancel_order(id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_fully_filled_order_cannot_be_cancelled() {
        let mut lob = book("AAPL");
        let resting = submit(&mut lob, "maker", Side::Ask, 5, 100);
        submit(&mut lob, "taker", Side::Bid, 5, 100);

        let err = lob.cancel_order(resting.order_id.unwrap()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_previous_trades_window() {
        let mut lob = book("AAPL");
        for i in 0..4u64 {
            submit(&mut lob, "maker", Side::Ask, 1, 100 + i);
            submit(&mut lob, "taker", Side::Bid, 1, 100 + i);
        }

        assert!(lob.previous_trades(0).is_empty());
        assert!(lob.previous_trades(-3).is_empty());

        let last_two = lob.previous_trades(2);
        assert_eq!(last_two.len(), 2);
        assert!(last_two[0].trade_id < last_two[1].trade_id, "chronological order");
        assert_eq!(last_two[1].price, Price::from_u64(103));

        assert_eq!(lob.previous_trades(100).len(), 4);
    }

    #[test]
    fn test_resubmit_after_cancel_loses_time_priority() {
        let mut lob = book("AAPL");
        let first = submit(&mut lob, "A", Side::Ask, 3, 100);
        submit(&mut lob, "B", Side::Ask, 3, 100);

        lob.cancel_order(first.order_id.unwrap()).unwrap();
        submit(&mut lob, "A", Side::Ask, 3, 100);

        let result = submit(&mut lob, "taker", Side::Bid, 3, 100);
        assert_eq!(result.trades[0].ask_user_id, "B", "resubmitted order queues behind");
    }

    #[test]
    fn test_filled_volume_plus_residual_equals_submission() {
        let mut lob = book("AAPL");
        submit(&mut lob, "m1", Side::Ask, 3, 100);
        submit(&mut lob, "m2", Side::Ask, 4, 101);

        let result = submit(&mut lob, "taker", Side::Bid, 10, 105);
        let filled = result.filled_volume();
        let rested = lob.get_volume(Price::from_u64(105), Side::Bid);
        assert_eq!(filled, 7);
        assert_eq!(filled + rested, 10);
    }

    #[test]
    fn test_no_cross_invariant_after_sweep() {
        let mut lob = book("AAPL");
        submit(&mut lob, "m1", Side::Ask, 5, 100);
        submit(&mut lob, "m2", Side::Ask, 5, 102);
        submit(&mut lob, "taker", Side::Bid, 8, 101);

        let top = lob.top_of_book();
        // 5 filled at 100, 3 rest at 101, asks remain at 102
        assert_eq!(top.bid_price, Price::from_u64(101).as_decimal());
        assert_eq!(top.bid_volume, 3);
        assert_eq!(top.ask_price, Price::from_u64(102).as_decimal());
        assert!(top.bid_price < top.ask_price);
    }

    #[test]
    fn test_queries_are_idempotent_between_mutations() {
        let mut lob = book("AAPL");
        submit(&mut lob, "u1", Side::Bid, 7, 99);
        submit(&mut lob, "u2", Side::Ask, 2, 120);

        let first_top = lob.top_of_book();
        let first_vol = lob.get_volume(Price::from_u64(99), Side::Bid);
        assert_eq!(lob.top_of_book(), first_top);
        assert_eq!(lob.get_volume(Price::from_u64(99), Side::Bid), first_vol);
    }
}
