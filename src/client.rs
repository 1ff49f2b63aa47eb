//! Kuna.io API v2 client.
//!
//! One method per endpoint. Public market data needs no credentials; account
//! calls are signed with the configured [`Signer`] and fail with
//! [`Error::Credentials`] when none is set.

use chrono::{DateTime, Utc};
use log::debug;
use reqwest::Method;
use serde_json::Value;

use crate::auth::Signer;
use crate::decode;
use crate::error::{Error, Result};
use crate::market::Market;
use crate::side::Side;
use crate::transport::{ClientConfig, HttpTransport, Transport};
use crate::types::{HistoryEntry, Order, OrderBook, Stats, Trade, UserInfo};

const TIMESTAMP: &str = "/api/v2/timestamp";
const TICKERS: &str = "/api/v2/tickers";
const ORDER_BOOK: &str = "/api/v2/order_book";
const TRADES: &str = "/api/v2/trades";
const MEMBERS_ME: &str = "/api/v2/members/me";
const ORDERS: &str = "/api/v2/orders";
const MY_TRADES: &str = "/api/v2/trades/my";
const ORDER_DELETE: &str = "/api/v2/order/delete";

/// Blocking exchange client.
pub struct KunaClient<T = HttpTransport> {
    transport: T,
    base_url: String,
    signer: Option<Signer>,
}

impl KunaClient<HttpTransport> {
    /// Client over a fresh HTTP transport built from `config`.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self::with_transport(
            HttpTransport::new(config)?,
            &config.base_url,
        ))
    }
}

impl<T: Transport> KunaClient<T> {
    pub fn with_transport(transport: T, base_url: &str) -> Self {
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
            signer: None,
        }
    }

    /// Attach API credentials for the account endpoints.
    pub fn with_signer(mut self, signer: Signer) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn signer(&self) -> Result<&Signer> {
        self.signer
            .as_ref()
            .ok_or_else(|| Error::Credentials("API keys are required for this call".into()))
    }

    fn public_get(&self, path_and_query: &str) -> Result<Value> {
        self.transport
            .get(&format!("{}{path_and_query}", self.base_url))
    }

    fn private(&self, method: Method, path: &str, params: &[(&str, &str)]) -> Result<Value> {
        let url = self
            .signer()?
            .signed_url(&self.base_url, &method, path, params);
        if method == Method::POST {
            self.transport.post(&url)
        } else {
            self.transport.get(&url)
        }
    }

    // ========================================================================
    // Market data
    // ========================================================================

    pub fn server_time(&self) -> Result<DateTime<Utc>> {
        decode::decode_server_time(&self.public_get(TIMESTAMP)?)
    }

    /// Latest 24h ticker.
    pub fn stats(&self, market: Market) -> Result<Stats> {
        decode::decode_stats(&self.public_get(&format!("{TICKERS}/{market}"))?)
    }

    pub fn order_book(&self, market: Market) -> Result<OrderBook> {
        decode::decode_order_book(&self.public_get(&format!("{ORDER_BOOK}?market={market}"))?)
    }

    /// Recent public deals.
    pub fn trade_history(&self, market: Market) -> Result<Vec<HistoryEntry>> {
        decode::decode_history(&self.public_get(&format!("{TRADES}?market={market}"))?)
    }

    // ========================================================================
    // Account (signed)
    // ========================================================================

    pub fn user_info(&self) -> Result<UserInfo> {
        decode::decode_user_info(&self.private(Method::GET, MEMBERS_ME, &[])?)
    }

    /// The user's active orders.
    pub fn user_orders(&self, market: Market) -> Result<Vec<Order>> {
        let params = [("market", market.as_str())];
        decode::decode_orders(&self.private(Method::GET, ORDERS, &params)?)
    }

    /// The user's own fills.
    pub fn user_trades(&self, market: Market) -> Result<Vec<Trade>> {
        let params = [("market", market.as_str())];
        decode::decode_trades(&self.private(Method::GET, MY_TRADES, &params)?)
    }

    /// Place a limit order. `volume` is in base currency, `price` per unit.
    pub fn new_order(&self, market: Market, side: Side, volume: f64, price: f64) -> Result<Order> {
        let price = format!("{price:.6}");
        let volume = format!("{volume:.6}");
        let params = [
            ("market", market.as_str()),
            ("price", price.as_str()),
            ("side", side.as_str()),
            ("volume", volume.as_str()),
        ];
        debug!("placing {side} order on {market}: {volume} @ {price}");
        decode::decode_order(&self.private(Method::POST, ORDERS, &params)?)
    }

    /// Cancel one order, returning its final state.
    pub fn cancel_order(&self, id: i64) -> Result<Order> {
        let id = id.to_string();
        decode::decode_order(&self.private(Method::POST, ORDER_DELETE, &[("id", id.as_str())])?)
    }

    /// Cancel every active order on `market`. Stops at the first failure.
    pub fn cancel_all(&self, market: Market) -> Result<Vec<Order>> {
        self.user_orders(market)?
            .iter()
            .map(|order| self.cancel_order(order.id))
            .collect()
    }
}
