//! Provider response schemas.
//!
//! Every price feed returns its own JSON layout. A [`Schema`] selects the
//! decoder for one layout; decoders validate the exact shape they expect and
//! write one rate per discovered currency, keyed by normalized code.
//!
//! | Schema           | Price path                                   |
//! |------------------|----------------------------------------------|
//! | `coingecko`      | `market_data.current_price.<code>`           |
//! | `coinmarketcap`  | `data.quotes.<CODE>.price` (+ `metadata.error`) |
//! | `bitcoinaverage` | `<CODE>.last` (skips `timestamp`)            |
//! | `bitpay`         | `[i].code` / `[i].rate`                      |
//! | `blockchaininfo` | `<CODE>.last`                                |
//! | `bitcoincharts`  | `<CODE>.24h` as a string (skips `timestamp`) |

pub mod bitcoinaverage;
pub mod bitcoincharts;
pub mod bitpay;
pub mod blockchain_info;
pub mod coingecko;
pub mod coinmarketcap;

use std::fmt;
use std::str::FromStr;

use rates_core::{DecodeError, RateCache, RatesError};
use serde_json::Value;

/// Decoder variant for one provider response layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Schema {
    CoinGecko,
    CoinMarketCap,
    BitcoinAverage,
    BitPay,
    BlockchainInfo,
    BitcoinCharts,
}

impl Schema {
    pub const ALL: [Schema; 6] = [
        Self::CoinGecko,
        Self::CoinMarketCap,
        Self::BitcoinAverage,
        Self::BitPay,
        Self::BlockchainInfo,
        Self::BitcoinCharts,
    ];

    /// Config name, also used as the error-message prefix.
    pub fn label(self) -> &'static str {
        match self {
            Self::CoinGecko => "coingecko",
            Self::CoinMarketCap => "coinmarketcap",
            Self::BitcoinAverage => "bitcoinaverage",
            Self::BitPay => "bitpay",
            Self::BlockchainInfo => "blockchaininfo",
            Self::BitcoinCharts => "bitcoincharts",
        }
    }

    /// Decode `value` into `cache`.
    ///
    /// Entries are written as they are discovered; on error, entries written
    /// before the failing one stay in `cache`.
    pub fn decode(self, value: &Value, cache: &mut RateCache) -> Result<(), DecodeError> {
        match self {
            Self::CoinGecko => coingecko::decode(value, cache),
            Self::CoinMarketCap => coinmarketcap::decode(value, cache),
            Self::BitcoinAverage => bitcoinaverage::decode(value, cache),
            Self::BitPay => bitpay::decode(value, cache),
            Self::BlockchainInfo => blockchain_info::decode(value, cache),
            Self::BitcoinCharts => bitcoincharts::decode(value, cache),
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Schema {
    type Err = RatesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|schema| schema.label() == wanted)
            .ok_or_else(|| RatesError::Config(format!("unknown provider schema: {s}")))
    }
}
