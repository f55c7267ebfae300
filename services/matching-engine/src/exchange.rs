//! Multi-symbol exchange router
//!
//! Owns one limit order book per allowed ticker, validates symbols before
//! forwarding, keeps the user registry, and indexes every execution under
//! both participants' user ids.

use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, info};
use types::errors::{ExchangeError, ExchangeResult};
use types::ids::{IdSource, OrderId};
use types::numeric::Price;
use types::order::Side;
use types::result::{OrderResult, TopOfBook};
use types::trade::Trade;

use crate::lob::LimitOrderBook;
use crate::time::now_millis;

/// Symbol-to-book dispatcher with user-level trade history
pub struct Exchange {
    books: HashMap<String, LimitOrderBook>,
    tickers: BTreeSet<String>,
    users: HashSet<String>,
    /// Executions per user, appended in match order. A user's own crossed
    /// orders append the trade under that user twice, once per side.
    trades_by_user: HashMap<String, Vec<Trade>>,
}

impl Exchange {
    /// Create an exchange with one book per allowed ticker
    ///
    /// Every book draws ids from one shared source, so order and trade ids
    /// are unique across the whole process.
    pub fn new<I, S>(allowed_tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids = IdSource::new();
        let mut books = HashMap::new();
        let mut tickers = BTreeSet::new();

        for ticker in allowed_tickers {
            let ticker = ticker.into();
            books.insert(ticker.clone(), LimitOrderBook::new(ticker.clone(), ids.clone()));
            tickers.insert(ticker);
        }

        info!(count = tickers.len(), "exchange initialized");
        Self {
            books,
            tickers,
            users: HashSet::new(),
            trades_by_user: HashMap::new(),
        }
    }

    fn book(&self, ticker: &str) -> ExchangeResult<&LimitOrderBook> {
        self.books.get(ticker).ok_or_else(|| ExchangeError::UnknownTicker {
            ticker: ticker.to_string(),
        })
    }

    fn book_mut(&mut self, ticker: &str) -> ExchangeResult<&mut LimitOrderBook> {
        self.books.get_mut(ticker).ok_or_else(|| ExchangeError::UnknownTicker {
            ticker: ticker.to_string(),
        })
    }

    /// Register a user id; true iff it was not registered before
    ///
    /// Registration is bookkeeping only: submissions from unregistered
    /// users are accepted.
    pub fn register_user(&mut self, user_id: impl Into<String>) -> bool {
        let user_id = user_id.into();
        let inserted = self.users.insert(user_id.clone());
        if inserted {
            debug!(user_id = %user_id, "user registered");
        }
        inserted
    }

    /// The allowed ticker set
    pub fn tickers(&self) -> BTreeSet<String> {
        self.tickers.clone()
    }

    /// Submit a limit order for `ticker`
    ///
    /// The arrival timestamp is drawn from the wall clock here; the order
    /// of calls defines the total order of executions per book.
    pub fn handle_order(
        &mut self,
        user_id: &str,
        side: Side,
        volume: u64,
        price: Price,
        ticker: &str,
    ) -> ExchangeResult<OrderResult> {
        let timestamp = now_millis();
        let result = self
            .book_mut(ticker)?
            .handle_order(user_id, side, volume, price, timestamp, ticker)?;

        for trade in &result.trades {
            self.trades_by_user
                .entry(trade.bid_user_id.clone())
                .or_default()
                .push(trade.clone());
            self.trades_by_user
                .entry(trade.ask_user_id.clone())
                .or_default()
                .push(trade.clone());
        }

        Ok(result)
    }

    /// Cancel a resting order on `ticker`'s book
    pub fn cancel_order(&mut self, ticker: &str, order_id: OrderId) -> ExchangeResult<bool> {
        self.book_mut(ticker)?.cancel_order(order_id)?;
        Ok(true)
    }

    /// Best bid and ask for `ticker`
    pub fn top_of_book(&self, ticker: &str) -> ExchangeResult<TopOfBook> {
        Ok(self.book(ticker)?.top_of_book())
    }

    /// Resting volume at a price on one side of `ticker`'s book
    pub fn get_volume(&self, ticker: &str, price: Price, side: Side) -> ExchangeResult<u64> {
        Ok(self.book(ticker)?.get_volume(price, side))
    }

    /// Last `count` trades on `ticker`'s book, chronological
    pub fn previous_trades(&self, ticker: &str, count: i64) -> ExchangeResult<Vec<Trade>> {
        Ok(self.book(ticker)?.previous_trades(count))
    }

    /// Every trade the user participated in, in execution order
    ///
    /// Empty for unknown users.
    pub fn trades_by_user(&self, user_id: &str) -> Vec<Trade> {
        self.trades_by_user.get(user_id).cloned().unwrap_or_default()
    }
}
