//! Order book infrastructure module
//!
//! Contains the resting-order record, price level queues, and the bid and
//! ask book sides.

pub mod ask_book;
pub mod bid_book;
pub mod order_node;
pub mod price_level;

pub use ask_book::AskBook;
pub use bid_book::BidBook;
pub use order_node::OrderNode;
pub use price_level::PriceLevelQueue;
