//! Portfolio state and fill accounting

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::position::TickerPosition;

/// Cash, open positions, and realized PnL for one account
///
/// `trade` is fed once per fill: positive volume buys, negative volume
/// sells. Positions use sorted maps so summaries iterate deterministically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub cash_balance: Decimal,
    pub realized_pnl: Decimal,
    pub positions: BTreeMap<String, TickerPosition>,
}

impl Portfolio {
    pub fn new(initial_cash: Decimal) -> Self {
        Self {
            cash_balance: initial_cash,
            realized_pnl: Decimal::ZERO,
            positions: BTreeMap::new(),
        }
    }

    /// Apply one fill of `volume` shares at `price`
    ///
    /// volume > 0 buys, volume < 0 sells. Cash always moves by
    /// `price × volume`. Adding in the direction of the open position
    /// re-weights the average cost; trading against it realizes PnL on the
    /// closed shares, and a cross through zero re-opens the remainder at
    /// the fill price.
    pub fn trade(&mut self, ticker: &str, volume: i64, price: Decimal) {
        self.cash_balance -= price * Decimal::from(volume);

        let pos = self.positions.entry(ticker.to_string()).or_default();
        let old_shares = pos.net_shares;
        let old_avg = pos.avg_cost;

        if old_shares == 0 {
            pos.net_shares = volume;
            pos.avg_cost = price;
            return;
        }

        let same_direction = (old_shares > 0) == (volume > 0);
        if same_direction {
            let new_shares = old_shares + volume;
            let old_abs = Decimal::from(old_shares.unsigned_abs());
            let trade_abs = Decimal::from(volume.unsigned_abs());
            let new_abs = Decimal::from(new_shares.unsigned_abs());

            pos.net_shares = new_shares;
            pos.avg_cost = (old_avg * old_abs + price * trade_abs) / new_abs;
            return;
        }

        // Opposite direction: realize PnL on the shares we close
        let shares_closed = old_shares.unsigned_abs().min(volume.unsigned_abs());
        let side = if old_shares > 0 {
            Decimal::ONE
        } else {
            -Decimal::ONE
        };
        self.realized_pnl += (price - old_avg) * side * Decimal::from(shares_closed);

        let new_shares = old_shares + volume;
        pos.net_shares = new_shares;
        if new_shares == 0 {
            // fully closed
            pos.avg_cost = Decimal::ZERO;
        } else if (old_shares > 0) != (new_shares > 0) {
            // crossed through zero: remainder opens at the fill price
            pos.avg_cost = price;
        }
        // partial close on the same side keeps the old average cost
    }

    /// Unrealized PnL of the position in `ticker` against `mark`
    pub fn unrealized_pnl(&self, ticker: &str, mark: Decimal) -> Decimal {
        self.positions
            .get(ticker)
            .map(|pos| pos.unrealized_pnl(mark))
            .unwrap_or(Decimal::ZERO)
    }

    /// Sum of unrealized PnL over every ticker with a known mark price
    ///
    /// Positions without a mark are skipped.
    pub fn total_unrealized_pnl(&self, marks: &BTreeMap<String, Decimal>) -> Decimal {
        self.positions
            .iter()
            .filter_map(|(ticker, pos)| marks.get(ticker).map(|mark| pos.unrealized_pnl(*mark)))
            .sum()
    }

    /// Mark-to-market value: cash + realized + unrealized
    pub fn total_value(&self, marks: &BTreeMap<String, Decimal>) -> Decimal {
        self.cash_balance + self.realized_pnl + self.total_unrealized_pnl(marks)
    }

    pub fn position(&self, ticker: &str) -> Option<&TickerPosition> {
        self.positions.get(ticker)
    }
}
