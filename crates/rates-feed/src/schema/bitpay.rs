//! BitPay `/api/rates` decoder.
//!
//! ```json
//! [ { "code": "USD", "name": "US Dollar", "rate": 6400.1 }, { "code": "EUR", "rate": 5500.2 } ]
//! ```

use rates_core::{DecodeError, RateCache};
use serde_json::Value;

use crate::json_util::{ROOT, as_array, as_object, as_str, field, index, insert_rate, join, price};

const SCHEMA: &str = "bitpay";

pub fn decode(value: &Value, cache: &mut RateCache) -> Result<(), DecodeError> {
    let entries = as_array(value, SCHEMA, ROOT)?;

    for (i, entry) in entries.iter().enumerate() {
        let path = index(ROOT, i);
        let entry = as_object(entry, SCHEMA, &path)?;
        let code = as_str(field(entry, "code", SCHEMA, &path)?, SCHEMA, &join(&path, "code"))?;
        let p = price(field(entry, "rate", SCHEMA, &path)?, SCHEMA, &join(&path, "rate"))?;
        insert_rate(cache, code, p);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn array_of_code_rate_objects() {
        let mut cache = RateCache::new();
        let body = json!([
            {"code": "USD", "name": "US Dollar", "rate": 6400.1},
            {"code": "eur", "rate": 5500.2}
        ]);
        decode(&body, &mut cache).unwrap();
        assert_eq!(cache.get("USD"), Some(&6400.1));
        assert_eq!(cache.get("EUR"), Some(&5500.2));
    }

    #[test]
    fn not_an_array() {
        let mut cache = RateCache::new();
        let err = decode(&json!({"code": "USD", "rate": 1.0}), &mut cache).unwrap_err();
        assert_eq!(err, DecodeError::mismatch(SCHEMA, "$"));
    }

    #[test]
    fn failure_keeps_earlier_writes_in_given_map() {
        let mut cache = RateCache::new();
        let err = decode(&json!([{"code": "USD", "rate": 1.0}, {"code": "EUR"}]), &mut cache).unwrap_err();
        assert_eq!(err, DecodeError::mismatch(SCHEMA, "[1].rate"));
        assert_eq!(cache.get("USD"), Some(&1.0));
    }

    #[test]
    fn non_string_code_is_named() {
        let mut cache = RateCache::new();
        let err = decode(&json!([{"code": 840, "rate": 1.0}]), &mut cache).unwrap_err();
        assert_eq!(err, DecodeError::mismatch(SCHEMA, "[0].code"));
    }
}
