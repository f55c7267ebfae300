//! Wire protocol for the TCP/JSON front-end
//!
//! Requests are single JSON objects tagged by an `action` field. Sides
//! travel as integers (BID = 0, ASK = 1), prices as JSON numbers, and a
//! submission that did not rest reports `order_id` −1. Failures of any
//! kind come back as `{"error": …}` so the book-facing error taxonomy
//! never leaks wire details.

use matching_engine::Exchange;
use parking_lot::RwLock;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;
use types::errors::{ExchangeError, ExchangeResult};
use types::ids::OrderId;
use types::numeric::Price;
use types::order::Side;
use types::result::OrderResult;
use types::trade::Trade;

/// A decoded client request
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Request {
    GetTickers,
    GetTopOfBook {
        ticker: String,
    },
    GetVolume {
        ticker: String,
        price: f64,
        order_type: u8,
    },
    GetPreviousTrades {
        ticker: String,
        num_previous_trades: i64,
    },
    GetTradesByUser {
        user_id: String,
    },
    RegisterUser {
        user_id: String,
    },
    HandleOrder {
        user_id: String,
        order_type: u8,
        volume: u64,
        price: f64,
        ticker: String,
    },
    CancelOrder {
        ticker: String,
        order_id: i64,
    },
}

fn decode_side(code: u8) -> ExchangeResult<Side> {
    Side::from_wire(code).ok_or(ExchangeError::InvalidSide { code })
}

fn decode_price(value: f64) -> ExchangeResult<Price> {
    Price::from_f64(value).ok_or(ExchangeError::InvalidPrice)
}

fn trade_to_json(trade: &Trade) -> Value {
    json!({
        "bid_user_id": trade.bid_user_id,
        "ask_user_id": trade.ask_user_id,
        "price": trade.price.to_f64(),
        "volume": trade.volume,
        "timestamp": trade.timestamp,
    })
}

fn order_result_to_json(result: &OrderResult) -> Value {
    json!({
        "order_added_to_book": result.order_added_to_book,
        "order_id": result.order_id.map(|id| id.as_i64()).unwrap_or(-1),
        "trades_executed": result.trades_executed,
        "trades": result.trades.iter().map(trade_to_json).collect::<Vec<_>>(),
    })
}

/// Execute a request against the exchange and build the response object
pub fn dispatch(exchange: &RwLock<Exchange>, request: Request) -> Value {
    let outcome = match request {
        Request::GetTickers => {
            let tickers = exchange.read().tickers();
            Ok(json!({ "tickers": tickers }))
        }
        Request::GetTopOfBook { ticker } => exchange.read().top_of_book(&ticker).map(|top| {
            json!({
                "has_top": top.book_has_top,
                "bid_price": top.bid_price.to_f64().unwrap_or(0.0),
                "ask_price": top.ask_price.to_f64().unwrap_or(0.0),
                "bid_volume": top.bid_volume,
                "ask_volume": top.ask_volume,
            })
        }),
        Request::GetVolume {
            ticker,
            price,
            order_type,
        } => decode_side(order_type)
            .and_then(|side| decode_price(price).map(|price| (side, price)))
            .and_then(|(side, price)| exchange.read().get_volume(&ticker, price, side))
            .map(|volume| json!({ "volume": volume })),
        Request::GetPreviousTrades {
            ticker,
            num_previous_trades,
        } => exchange
            .read()
            .previous_trades(&ticker, num_previous_trades)
            .map(|trades| json!({ "trades": trades.iter().map(trade_to_json).collect::<Vec<_>>() })),
        Request::GetTradesByUser { user_id } => {
            let trades = exchange.read().trades_by_user(&user_id);
            Ok(json!({ "trades": trades.iter().map(trade_to_json).collect::<Vec<_>>() }))
        }
        Request::RegisterUser { user_id } => {
            let success = exchange.write().register_user(user_id);
            Ok(json!({ "success": success }))
        }
        Request::HandleOrder {
            user_id,
            order_type,
            volume,
            price,
            ticker,
        } => decode_side(order_type)
            .and_then(|side| decode_price(price).map(|price| (side, price)))
            .and_then(|(side, price)| {
                exchange
                    .write()
                    .handle_order(&user_id, side, volume, price, &ticker)
            })
            .map(|result| order_result_to_json(&result)),
        Request::CancelOrder { ticker, order_id } => exchange
            .write()
            .cancel_order(&ticker, OrderId::from_raw(order_id))
            .map(|success| json!({ "success": success })),
    };

    outcome.unwrap_or_else(|err| {
        warn!(%err, "request failed");
        json!({ "error": err.to_string() })
    })
}
