//! Domain records decoded from exchange responses.
//!
//! Every record is an immutable value built once per API call. Server
//! figures are trusted as reported: nothing here recomputes `funds` from
//! `price * volume` or `remaining_volume` from `volume - executed_volume`.

use chrono::{DateTime, Utc};

use crate::side::{OrderType, Side};

/// Latest 24-hour ticker for a market.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Stats {
    /// Server time of the snapshot.
    pub at: DateTime<Utc>,
    pub buy: f64,
    pub sell: f64,
    /// Lowest deal price over the last 24 hours.
    pub low: f64,
    /// Highest deal price over the last 24 hours.
    pub high: f64,
    /// Last deal price.
    pub last: f64,
    /// Traded volume in base currency over the last 24 hours.
    pub volume: f64,
    /// Traded amount in quote currency over the last 24 hours; 0 when not reported.
    pub amount: f64,
}

/// A single order, either resting in the book or owned by the user.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Order {
    pub id: i64,
    pub side: Side,
    pub order_type: OrderType,
    pub price: f64,
    pub avg_price: f64,
    /// Server-defined lifecycle state (`wait`, `done`, `cancel`).
    pub state: String,
    pub market: String,
    pub created_at: DateTime<Utc>,
    pub volume: f64,
    pub remaining_volume: f64,
    pub executed_volume: f64,
    pub trades_count: i64,
}

/// Open asks and bids of a market, in server order.
///
/// Asks come lowest price first, bids highest price first. The client never
/// re-sorts them.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OrderBook {
    pub asks: Vec<Order>,
    pub bids: Vec<Order>,
}

/// A public deal from the market's trade history.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HistoryEntry {
    pub id: i64,
    pub price: f64,
    /// Base currency amount.
    pub volume: f64,
    /// Quote currency amount.
    pub funds: f64,
    pub market: String,
    pub created_at: DateTime<Utc>,
}

/// The authenticated member and their balances.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct UserInfo {
    pub email: String,
    pub activated: bool,
    pub accounts: Vec<Account>,
}

/// Balance of one currency.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Account {
    pub currency: String,
    /// Available balance, excluding `locked`.
    pub balance: f64,
    /// Amount held by open orders.
    pub locked: f64,
}

/// A fill belonging to the authenticated user.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Trade {
    pub id: i64,
    pub price: f64,
    pub volume: f64,
    pub funds: f64,
    pub market: String,
    pub created_at: DateTime<Utc>,
    pub side: Side,
}
