//! Domain decoders: generic JSON tree to typed records.
//!
//! Fields are read in a fixed order and the first failure aborts the decode;
//! no partial record is ever returned. Lists decode element by element and a
//! single malformed element fails the whole list. Errors carry the dotted,
//! indexed path of the offending field (`asks[2].price`).

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::Result;
use crate::json::{self, Fields};
use crate::side::{OrderType, Side};
use crate::types::{Account, HistoryEntry, Order, OrderBook, Stats, Trade, UserInfo};

const ROOT: &str = "response";

/// Decode every element of a list with `decode`, tagging errors with the index.
fn decode_list<T>(items: &[Value], decode: impl Fn(&Value) -> Result<T>) -> Result<Vec<T>> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| decode(item).map_err(|e| e.at(&format!("[{i}]"))))
        .collect()
}

/// Server time: a bare epoch-seconds number.
pub fn decode_server_time(v: &Value) -> Result<DateTime<Utc>> {
    json::expect_time(Some(v), ROOT)
}

/// `{"at": <secs>, "ticker": {buy, sell, low, high, last, vol, amount?}}`
pub fn decode_stats(v: &Value) -> Result<Stats> {
    let f = Fields::of(v, ROOT)?;
    let at = f.time("at")?;
    let t = f.object("ticker")?;
    let ticker = || -> Result<Stats> {
        Ok(Stats {
            at,
            buy: t.float("buy")?,
            sell: t.float("sell")?,
            low: t.float("low")?,
            high: t.float("high")?,
            last: t.float("last")?,
            volume: t.float("vol")?,
            amount: t.float_or("amount", 0.0)?,
        })
    };
    ticker().map_err(|e| e.at("ticker"))
}

pub fn decode_order(v: &Value) -> Result<Order> {
    let f = Fields::of(v, "")?;
    Ok(Order {
        id: f.int("id")?,
        side: f.parsed("side", "side (buy|sell)", Side::from_wire)?,
        order_type: f.parsed("ord_type", "order type (limit|market)", OrderType::from_wire)?,
        price: f.float("price")?,
        avg_price: f.float("avg_price")?,
        state: f.string("state")?,
        market: f.string("market")?,
        created_at: f.time_text("created_at")?,
        volume: f.float("volume")?,
        remaining_volume: f.float("remaining_volume")?,
        executed_volume: f.float("executed_volume")?,
        trades_count: f.int("trades_count")?,
    })
}

/// A list of orders, as returned by `/orders` or inside an order book.
pub fn decode_orders(v: &Value) -> Result<Vec<Order>> {
    decode_list(json::expect_list(Some(v), ROOT)?, decode_order)
}

/// `{"asks": [order...], "bids": [order...]}`
pub fn decode_order_book(v: &Value) -> Result<OrderBook> {
    let f = Fields::of(v, ROOT)?;
    let side = |key: &str| decode_list(f.list(key)?, decode_order).map_err(|e| e.at(key));
    Ok(OrderBook {
        asks: side("asks")?,
        bids: side("bids")?,
    })
}

fn decode_history_entry(v: &Value) -> Result<HistoryEntry> {
    let f = Fields::of(v, "")?;
    Ok(HistoryEntry {
        id: f.int("id")?,
        price: f.float("price")?,
        volume: f.float("volume")?,
        funds: f.float("funds")?,
        market: f.string("market")?,
        created_at: f.time_text("created_at")?,
    })
}

/// Public trade history of a market.
pub fn decode_history(v: &Value) -> Result<Vec<HistoryEntry>> {
    decode_list(json::expect_list(Some(v), ROOT)?, decode_history_entry)
}

fn decode_account(v: &Value) -> Result<Account> {
    let f = Fields::of(v, "")?;
    Ok(Account {
        currency: f.string("currency")?,
        balance: f.float("balance")?,
        locked: f.float("locked")?,
    })
}

/// `{"email", "activated", "accounts": [{currency, balance, locked}]}`
pub fn decode_user_info(v: &Value) -> Result<UserInfo> {
    let f = Fields::of(v, ROOT)?;
    Ok(UserInfo {
        email: f.string("email")?,
        activated: f.bool("activated")?,
        accounts: decode_list(f.list("accounts")?, decode_account).map_err(|e| e.at("accounts"))?,
    })
}

fn decode_trade(v: &Value) -> Result<Trade> {
    let f = Fields::of(v, "")?;
    Ok(Trade {
        id: f.int("id")?,
        price: f.float("price")?,
        volume: f.float("volume")?,
        funds: f.float("funds")?,
        market: f.string("market")?,
        created_at: f.time_text("created_at")?,
        side: f.parsed("side", "side (bid|ask)", Side::from_wire)?,
    })
}

/// The authenticated user's own fills.
pub fn decode_trades(v: &Value) -> Result<Vec<Trade>> {
    decode_list(json::expect_list(Some(v), ROOT)?, decode_trade)
}

/// Structured error carried by a non-2xx response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerError {
    pub code: i64,
    pub message: String,
}

/// Best-effort read of `{"error": {"code": int, "message": string}}`.
///
/// Returns `None` when the body is not JSON or has any other shape; the
/// caller then falls back to the bare HTTP status.
pub fn decode_error_payload(body: &[u8]) -> Option<ServerError> {
    let v: Value = serde_json::from_slice(body).ok()?;
    let err = Fields::of(&v, ROOT).ok()?.object("error").ok()?;
    Some(ServerError {
        code: err.int("code").ok()?,
        message: err.string("message").ok()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;

    fn order_json(id: i64, price: &str, remaining: &str) -> Value {
        json!({
            "id": id,
            "side": "sell",
            "ord_type": "limit",
            "price": price,
            "avg_price": "0.0",
            "state": "wait",
            "market": "btcuah",
            "created_at": "2017-08-28T12:34:56+03:00",
            "volume": "1.0",
            "remaining_volume": remaining,
            "executed_volume": "0.0",
            "trades_count": 0
        })
    }

    fn field_of(err: Error) -> String {
        match err {
            Error::MissingValue { field, .. } | Error::TypeMismatch { field, .. } => field,
            other => panic!("not a field error: {other:?}"),
        }
    }

    #[test]
    fn server_time() {
        let t = decode_server_time(&json!(1_503_919_000)).unwrap();
        assert_eq!(t.timestamp(), 1_503_919_000);
        assert!(decode_server_time(&json!("1503919000")).is_err());
    }

    #[test]
    fn stats_amount_defaults_to_zero() {
        let v = json!({
            "at": 1_503_919_000,
            "ticker": {
                "buy": "100.0", "sell": "101.0", "low": "95.5",
                "high": "110", "last": "100.5", "vol": "12.25"
            }
        });
        let s = decode_stats(&v).unwrap();
        assert_eq!(s.buy, 100.0);
        assert_eq!(s.high, 110.0);
        assert_eq!(s.volume, 12.25);
        assert_eq!(s.amount, 0.0);
    }

    #[test]
    fn stats_missing_field_path() {
        let v = json!({ "at": 1, "ticker": { "buy": "1", "sell": "1" } });
        assert_eq!(field_of(decode_stats(&v).unwrap_err()), "ticker.low");
    }

    #[test]
    fn order_decodes_every_field() {
        let o = decode_order(&order_json(7, "4075.5", "0.25")).unwrap();
        assert_eq!(o.id, 7);
        assert_eq!(o.side, Side::Sell);
        assert_eq!(o.order_type, OrderType::Limit);
        assert_eq!(o.price, 4075.5);
        assert_eq!(o.remaining_volume, 0.25);
        assert_eq!(o.state, "wait");
        assert_eq!(o.created_at.timestamp(), 1_503_912_896);
    }

    #[test]
    fn order_fails_on_first_bad_field() {
        let mut v = order_json(1, "nope", "1.0");
        v["id"] = json!(null);
        // id comes before price, so id is reported
        assert_eq!(field_of(decode_order(&v).unwrap_err()), "id");
    }

    #[test]
    fn order_rejects_unknown_side() {
        let mut v = order_json(1, "1.0", "1.0");
        v["side"] = json!("hold");
        assert!(matches!(
            decode_order(&v),
            Err(Error::TypeMismatch { expected: "side (buy|sell)", .. })
        ));
    }

    #[test]
    fn order_book_preserves_server_order() {
        let v = json!({
            "asks": [order_json(1, "12", "1"), order_json(2, "10", "1")],
            "bids": []
        });
        let book = decode_order_book(&v).unwrap();
        let prices: Vec<f64> = book.asks.iter().map(|o| o.price).collect();
        assert_eq!(prices, vec![12.0, 10.0]);
        assert!(book.bids.is_empty());
    }

    #[test]
    fn one_bad_level_fails_the_book() {
        let v = json!({
            "asks": [order_json(1, "10", "1"), order_json(2, "10", "1"), order_json(3, "x", "1")],
            "bids": []
        });
        assert_eq!(field_of(decode_order_book(&v).unwrap_err()), "asks[2].price");
    }

    #[test]
    fn order_book_requires_both_sides() {
        let v = json!({ "asks": [] });
        assert!(matches!(
            decode_order_book(&v),
            Err(Error::MissingValue { expected: "list", .. })
        ));
    }

    #[test]
    fn history() {
        let v = json!([
            { "id": 1, "price": "10", "volume": "2", "funds": "20.01",
              "market": "btcuah", "created_at": "2021-01-01T00:00:00Z" }
        ]);
        let h = decode_history(&v).unwrap();
        assert_eq!(h.len(), 1);
        // funds is trusted, not recomputed
        assert_eq!(h[0].funds, 20.01);
        assert!(decode_history(&json!({})).is_err());
    }

    #[test]
    fn user_info() {
        let v = json!({
            "email": "me@example.com",
            "activated": true,
            "accounts": [
                { "currency": "uah", "balance": "100.5", "locked": "0.0" },
                { "currency": "btc", "balance": "0.1", "locked": "0.05" }
            ]
        });
        let info = decode_user_info(&v).unwrap();
        assert!(info.activated);
        assert_eq!(info.accounts.len(), 2);
        assert_eq!(info.accounts[1].locked, 0.05);
    }

    #[test]
    fn user_info_bad_account_path() {
        let v = json!({
            "email": "me@example.com",
            "activated": false,
            "accounts": [{ "currency": "uah", "balance": "1" }]
        });
        assert_eq!(field_of(decode_user_info(&v).unwrap_err()), "accounts[0].locked");
    }

    #[test]
    fn trades_map_bid_and_ask() {
        let v = json!([
            { "id": 1, "price": "10", "volume": "1", "funds": "10", "market": "btcuah",
              "created_at": "2021-01-01T00:00:00Z", "side": "bid" },
            { "id": 2, "price": "11", "volume": "1", "funds": "11", "market": "btcuah",
              "created_at": "2021-01-01T00:00:01Z", "side": "ask" }
        ]);
        let trades = decode_trades(&v).unwrap();
        assert_eq!(trades[0].side, Side::Buy);
        assert_eq!(trades[1].side, Side::Sell);
    }

    #[test]
    fn trade_bad_time_is_time_format() {
        let v = json!([
            { "id": 1, "price": "10", "volume": "1", "funds": "10", "market": "btcuah",
              "created_at": "yesterday", "side": "bid" }
        ]);
        assert!(matches!(decode_trades(&v), Err(Error::TimeFormat(s)) if s == "yesterday"));
    }

    #[test]
    fn error_payload() {
        let body = br#"{"error": {"code": 2002, "message": "Failed to authorize."}}"#;
        assert_eq!(
            decode_error_payload(body),
            Some(ServerError {
                code: 2002,
                message: "Failed to authorize.".into()
            })
        );
    }

    #[test]
    fn error_payload_is_best_effort() {
        assert_eq!(decode_error_payload(b"<html>502</html>"), None);
        assert_eq!(decode_error_payload(b"{}"), None);
        assert_eq!(decode_error_payload(br#"{"error": "boom"}"#), None);
        assert_eq!(decode_error_payload(br#"{"error": {"code": "1", "message": "x"}}"#), None);
        assert_eq!(decode_error_payload(br#"{"error": {"code": 1}}"#), None);
    }
}
