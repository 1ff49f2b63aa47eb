//! # kuna
//!
//! Blocking client for the Kuna.io v2 exchange API, plus the local math the
//! command-line tool runs on its responses.
//!
//! ## Layers
//!
//! - **JSON decoding** ([`json`], [`decode`]): total, typed accessors over
//!   `serde_json::Value` and one decoder per endpoint. Every failure names
//!   the field path that broke (`response.asks[2].price`).
//! - **Signing** ([`auth`]): canonical sorted query, HMAC-SHA256 over
//!   `METHOD|PATH|QUERY`, keys held in zeroizing memory.
//! - **Transport** ([`transport`]): the [`Transport`] trait and a
//!   reqwest-backed implementation with bounded timeouts.
//! - **Client** ([`client`]): one method per endpoint.
//! - **Analysis** ([`depth`], [`stats`]): order book depth walks clipped at a
//!   volume or funds ceiling, and min/avg/max/sum over deals.
//!
//! ## Quick Start
//!
//! ```
//! use kuna::{Ceiling, KunaClient, Market};
//! use kuna::mock::MockTransport;
//! use serde_json::json;
//!
//! let transport = MockTransport::builder()
//!     .on_get(
//!         "/api/v2/order_book",
//!         json!({
//!             "asks": [
//!                 { "id": 1, "side": "sell", "ord_type": "limit", "price": "10.0",
//!                   "avg_price": "0.0", "state": "wait", "market": "btcuah",
//!                   "created_at": "2017-08-28T12:00:00Z", "volume": "5.0",
//!                   "remaining_volume": "5.0", "executed_volume": "0.0",
//!                   "trades_count": 0 }
//!             ],
//!             "bids": []
//!         }),
//!     )
//!     .build();
//!
//! let client = KunaClient::with_transport(transport, "https://kuna.io");
//! let book = client.order_book(Market::BtcUah).unwrap();
//!
//! let rows = book.ask_depth(Ceiling::Volume(2.0));
//! assert_eq!(rows.len(), 1);
//! assert_eq!(rows[0].cum_funds, 20.0);
//! ```
//!
//! Against the live exchange use [`KunaClient::new`] with a
//! [`ClientConfig`], and attach a [`Signer`] for account calls.

pub mod auth;
pub mod client;
pub mod decode;
pub mod depth;
mod error;
pub mod json;
mod market;
pub mod mock;
mod side;
pub mod stats;
pub mod transport;
mod types;

// Re-export public API
pub use auth::{FixedTonce, Signer, SystemTonce, TonceSource};
pub use client::KunaClient;
pub use depth::{Ceiling, DepthRow, Level};
pub use error::{Error, Result};
pub use market::{Market, ParseMarketError};
pub use side::{OrderType, ParseSideError, Side};
pub use stats::{Fill, RunningTotal, Spread, Summary};
pub use transport::{ClientConfig, DEFAULT_BASE_URL, HttpTransport, Transport};
pub use types::{Account, HistoryEntry, Order, OrderBook, Stats, Trade, UserInfo};
