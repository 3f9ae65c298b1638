//! CoinMarketCap v2 ticker decoder.
//!
//! ```json
//! {
//!   "data": { "quotes": { "USD": { "price": 0.42 }, "BTC": { "price": 0.0000061 } } },
//!   "metadata": { "timestamp": 1529796056, "error": null }
//! }
//! ```
//!
//! A non-null `metadata.error` is checked before anything else and surfaces
//! as [`DecodeError::Provider`].

use rates_core::{DecodeError, RateCache};
use serde_json::Value;

use crate::json_util::{ROOT, as_object, field, insert_rate, join, object_field, price};

const SCHEMA: &str = "coinmarketcap";

pub fn decode(value: &Value, cache: &mut RateCache) -> Result<(), DecodeError> {
    let root = as_object(value, SCHEMA, ROOT)?;

    let metadata = object_field(root, "metadata", SCHEMA, ROOT)?;
    match metadata.get("error") {
        None | Some(Value::Null) => {}
        Some(Value::String(message)) => {
            return Err(DecodeError::Provider { schema: SCHEMA, message: message.clone() });
        }
        Some(other) => {
            return Err(DecodeError::Provider { schema: SCHEMA, message: other.to_string() });
        }
    }

    let data = object_field(root, "data", SCHEMA, ROOT)?;
    let quotes = object_field(data, "quotes", SCHEMA, "data")?;

    for (code, quote) in quotes {
        let path = join("data.quotes", code);
        let quote = as_object(quote, SCHEMA, &path)?;
        let p = price(field(quote, "price", SCHEMA, &path)?, SCHEMA, &join(&path, "price"))?;
        insert_rate(cache, code, p);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn quotes_with_null_error() {
        let mut cache = RateCache::new();
        decode(&json!({"metadata": {"error": null}, "data": {"quotes": {"BTC": {"price": 1.0}}}}), &mut cache)
            .unwrap();
        assert_eq!(cache.get("BTC"), Some(&1.0));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn in_band_error_surfaces_before_data() {
        let mut cache = RateCache::new();
        let err = decode(&json!({"metadata": {"error": "id not found"}}), &mut cache).unwrap_err();
        assert_eq!(err, DecodeError::Provider { schema: SCHEMA, message: "id not found".into() });
        assert!(cache.is_empty());
    }

    #[test]
    fn missing_metadata_is_named() {
        let mut cache = RateCache::new();
        let err = decode(&json!({"data": {"quotes": {}}}), &mut cache).unwrap_err();
        assert_eq!(err, DecodeError::mismatch(SCHEMA, "metadata"));
    }

    #[test]
    fn missing_price_is_named() {
        let mut cache = RateCache::new();
        let err =
            decode(&json!({"metadata": {}, "data": {"quotes": {"USD": {"volume_24h": 5.0}}}}), &mut cache).unwrap_err();
        assert_eq!(err, DecodeError::mismatch(SCHEMA, "data.quotes.USD.price"));
    }
}
