//! bitcoincharts `weighted_prices.json` decoder.
//!
//! ```json
//! { "USD": { "7d": "6500.10", "30d": "7000.00", "24h": "6400.12" }, "timestamp": 1529796056 }
//! ```
//!
//! Prices are decimal strings. Currencies without a `24h` figure are skipped.

use rates_core::{DecodeError, RateCache};
use serde_json::Value;

use crate::json_util::{ROOT, as_object, insert_rate, join, price_str};

const SCHEMA: &str = "bitcoincharts";

pub fn decode(value: &Value, cache: &mut RateCache) -> Result<(), DecodeError> {
    let root = as_object(value, SCHEMA, ROOT)?;

    for (code, ticker) in root.iter().filter(|(k, _)| k.as_str() != "timestamp") {
        let ticker = as_object(ticker, SCHEMA, code)?;
        let Some(day) = ticker.get("24h") else {
            continue;
        };
        let p = price_str(day, SCHEMA, &join(code, "24h"))?;
        insert_rate(cache, code, p);
    }
    Ok(())
}
