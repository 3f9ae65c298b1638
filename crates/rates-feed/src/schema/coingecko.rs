//! CoinGecko `/coins/{id}` decoder.
//!
//! ```json
//! { "market_data": { "current_price": { "usd": 0.42, "btc": 0.0000061 } } }
//! ```
//!
//! Currency keys are lowercase upstream and normalized on insert.

use rates_core::{DecodeError, RateCache};
use serde_json::Value;

use crate::json_util::{ROOT, as_object, insert_rate, join, object_field, price};

const SCHEMA: &str = "coingecko";

pub fn decode(value: &Value, cache: &mut RateCache) -> Result<(), DecodeError> {
    let root = as_object(value, SCHEMA, ROOT)?;
    let market_data = object_field(root, "market_data", SCHEMA, ROOT)?;
    let current_price = object_field(market_data, "current_price", SCHEMA, "market_data")?;

    for (code, v) in current_price {
        let p = price(v, SCHEMA, &join("market_data.current_price", code))?;
        insert_rate(cache, code, p);
    }
    Ok(())
}
