//! BitcoinAverage-style ticker decoder.
//!
//! ```json
//! { "USD": { "last": 6400.1, "ask": 6401.0 }, "EUR": { "last": 5500.2 }, "timestamp": "..." }
//! ```

use rates_core::{DecodeError, RateCache};
use serde_json::Value;

use crate::json_util::{ROOT, as_object, field, insert_rate, join, price};

const SCHEMA: &str = "bitcoinaverage";

pub fn decode(value: &Value, cache: &mut RateCache) -> Result<(), DecodeError> {
    let root = as_object(value, SCHEMA, ROOT)?;

    for (code, ticker) in root.iter().filter(|(k, _)| k.as_str() != "timestamp") {
        let ticker = as_object(ticker, SCHEMA, code)?;
        let p = price(field(ticker, "last", SCHEMA, code)?, SCHEMA, &join(code, "last"))?;
        insert_rate(cache, code, p);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn skips_timestamp() {
        let mut cache = RateCache::new();
        decode(
            &json!({"USD": {"last": 6400.1}, "eur": {"last": 5500.2}, "timestamp": "Sat, 23 Jun 2018"}),
            &mut cache,
        )
        .unwrap();
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("EUR"), Some(&5500.2));
    }

    #[test]
    fn missing_last_is_named() {
        let mut cache = RateCache::new();
        let err = decode(&json!({"USD": {"bid": 1.0}}), &mut cache).unwrap_err();
        assert_eq!(err, DecodeError::mismatch(SCHEMA, "USD.last"));
    }
}
