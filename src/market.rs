//! Supported markets.

use std::fmt;
use std::str::FromStr;

/// A base/quote currency pair traded on the exchange.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Market {
    #[default]
    BtcUah,
    EthUah,
}

impl Market {
    /// Every market this client knows about.
    pub const ALL: [Market; 2] = [Market::BtcUah, Market::EthUah];

    /// Market identifier as used in URLs and query strings.
    pub fn as_str(self) -> &'static str {
        match self {
            Market::BtcUah => "btcuah",
            Market::EthUah => "ethuah",
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown market identifier.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid market: {0:?}. Valid are: btcuah, ethuah")]
pub struct ParseMarketError(pub String);

impl FromStr for Market {
    type Err = ParseMarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Market::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ParseMarketError(s.to_string()))
    }
}
