//! Per-ticker position state

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Net position in one ticker
///
/// `net_shares` is positive for a long and negative for a short;
/// `avg_cost` is the weighted average entry price of the open position and
/// zero while flat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TickerPosition {
    pub net_shares: i64,
    pub avg_cost: Decimal,
}

impl TickerPosition {
    pub fn new(net_shares: i64, avg_cost: Decimal) -> Self {
        Self { net_shares, avg_cost }
    }

    pub fn is_flat(&self) -> bool {
        self.net_shares == 0
    }

    pub fn is_long(&self) -> bool {
        self.net_shares > 0
    }

    pub fn is_short(&self) -> bool {
        self.net_shares < 0
    }

    /// Unrealized PnL of the open position against `mark`
    ///
    /// Long: (mark − avg_cost) × shares. Short: (avg_cost − mark) × |shares|.
    pub fn unrealized_pnl(&self, mark: Decimal) -> Decimal {
        if self.net_shares == 0 {
            return Decimal::ZERO;
        }
        let side = if self.net_shares > 0 {
            Decimal::ONE
        } else {
            -Decimal::ONE
        };
        (mark - self.avg_cost) * side * Decimal::from(self.net_shares.unsigned_abs())
    }
}
