//! Trade generation
//!
//! Builds trade records for matches, drawing ids from the shared source and
//! assigning the bid and ask participants from the aggressor's side.

use tracing::trace;
use types::ids::IdSource;
use types::numeric::Price;
use types::order::Side;
use types::trade::Trade;

/// Generates trades for fills against resting orders
#[derive(Debug, Clone)]
pub struct TradeExecutor {
    ids: IdSource,
}

impl TradeExecutor {
    pub fn new(ids: IdSource) -> Self {
        Self { ids }
    }

    /// Build the trade for one fill
    ///
    /// `price` is the resting order's price: the aggressor gets price
    /// improvement when its own limit was better. The same user may appear
    /// on both sides; the engine does not prevent self-trades.
    pub fn execute(
        &self,
        aggressor_side: Side,
        aggressor_user: &str,
        resting_user: &str,
        price: Price,
        volume: u64,
        timestamp: i64,
    ) -> Trade {
        let (bid_user, ask_user) = match aggressor_side {
            Side::Bid => (aggressor_user, resting_user),
            Side::Ask => (resting_user, aggressor_user),
        };

        let trade_id = self.ids.next_trade_id();
        trace!(%trade_id, %price, volume, bid_user, ask_user, "trade executed");

        Trade::new(trade_id, price, volume, timestamp, bid_user, ask_user)
    }
}
