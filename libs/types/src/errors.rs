//! Error taxonomy for the exchange core
//!
//! Three kinds matter to callers: user-caused validation failures, lookups
//! of things that do not exist, and internal consistency violations. The
//! first two leave the book untouched; the last one means a bug and the
//! affected book should stop accepting work.

use crate::ids::OrderId;
use thiserror::Error;

/// Errors returned by the matching core
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    #[error("unknown ticker: {ticker}")]
    UnknownTicker { ticker: String },

    #[error("order volume must be greater than zero")]
    InvalidVolume,

    #[error("order price must be greater than zero")]
    InvalidPrice,

    #[error("user id must not be empty")]
    EmptyUserId,

    #[error("order side must be 0 (bid) or 1 (ask), got {code}")]
    InvalidSide { code: u8 },

    #[error("order {order_id} not found")]
    OrderNotFound { order_id: OrderId },

    #[error("order book inconsistency: {message}")]
    Internal { message: String },
}

impl ExchangeError {
    /// User-caused validation failure; the book state is unchanged
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            ExchangeError::UnknownTicker { .. }
                | ExchangeError::InvalidVolume
                | ExchangeError::InvalidPrice
                | ExchangeError::EmptyUserId
                | ExchangeError::InvalidSide { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ExchangeError::OrderNotFound { .. })
    }

    /// Invariant violation; indicates a bug rather than bad input
    pub fn is_internal(&self) -> bool {
        matches!(self, ExchangeError::Internal { .. })
    }
}

pub type ExchangeResult<T> = Result<T, ExchangeError>;
