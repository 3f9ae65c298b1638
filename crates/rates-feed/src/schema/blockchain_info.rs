//! blockchain.info `/ticker` decoder.
//!
//! ```json
//! { "USD": { "15m": 6400.0, "last": 6400.1, "buy": 6400.1, "symbol": "$" } }
//! ```
//!
//! Unlike `bitcoinaverage`, every top-level key must be a ticker object.

use rates_core::{DecodeError, RateCache};
use serde_json::Value;

use crate::json_util::{ROOT, as_object, field, insert_rate, join, price};

const SCHEMA: &str = "blockchaininfo";

pub fn decode(value: &Value, cache: &mut RateCache) -> Result<(), DecodeError> {
    let root = as_object(value, SCHEMA, ROOT)?;

    for (code, ticker) in root {
        let ticker = as_object(ticker, SCHEMA, code)?;
        let p = price(field(ticker, "last", SCHEMA, code)?, SCHEMA, &join(code, "last"))?;
        insert_rate(cache, code, p);
    }
    Ok(())
}
