//! Crossing detection logic
//!
//! Determines when a bid and ask can match based on price compatibility.
//! Decimal prices compare exactly, so no floating-point tolerance is
//! involved.

use types::numeric::Price;
use types::order::Side;

/// Check if a bid and ask can match at given prices
///
/// For a buy order to match with a sell order the buy price must be at or
/// above the sell price.
pub fn can_match(bid_price: Price, ask_price: Price) -> bool {
    bid_price >= ask_price
}

/// Check if an incoming order crosses a resting order on the other side
pub fn aggressor_crosses(side: Side, aggressor_price: Price, resting_price: Price) -> bool {
    match side {
        Side::Bid => can_match(aggressor_price, resting_price),
        Side::Ask => can_match(resting_price, aggressor_price),
    }
}
