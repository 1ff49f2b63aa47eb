//! Order side and order type.

use std::fmt;

/// Side of an order or trade.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Wire name used in request parameters.
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }

    /// Parse a side as the server reports it.
    ///
    /// Orders say `buy`/`sell`; the user's own trades say `bid`/`ask`.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "buy" | "bid" => Some(Side::Buy),
            "sell" | "ask" => Some(Side::Sell),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a side string is neither `buy` nor `sell`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid side {0:?}, expected buy or sell")]
pub struct ParseSideError(pub String);

impl std::str::FromStr for Side {
    type Err = ParseSideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(Side::Buy),
            "sell" => Ok(Side::Sell),
            _ => Err(ParseSideError(s.to_string())),
        }
    }
}

/// Order execution type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum OrderType {
    Limit,
    Market,
}

impl OrderType {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderType::Limit => "limit",
            OrderType::Market => "market",
        }
    }

    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "limit" => Some(OrderType::Limit),
            "market" => Some(OrderType::Market),
            _ => None,
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names() {
        assert_eq!(Side::from_wire("buy"), Some(Side::Buy));
        assert_eq!(Side::from_wire("bid"), Some(Side::Buy));
        assert_eq!(Side::from_wire("sell"), Some(Side::Sell));
        assert_eq!(Side::from_wire("ask"), Some(Side::Sell));
        assert_eq!(Side::from_wire("BUY"), None);
        assert_eq!(OrderType::from_wire("limit"), Some(OrderType::Limit));
        assert_eq!(OrderType::from_wire("stop"), None);
    }

    #[test]
    fn from_str_is_lenient_about_case_and_space() {
        assert_eq!(" Sell\n".parse::<Side>(), Ok(Side::Sell));
        assert!("bid".parse::<Side>().is_err());
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Side::Buy), "buy");
        assert_eq!(format!("{}", OrderType::Market), "market");
    }
}
