//! Shared JSON shape checks used by every schema decoder.
//!
//! Each helper either returns the typed view of a value or a
//! [`DecodeError::SchemaMismatch`] carrying the dotted path of the offending
//! field (e.g. `market_data.current_price.usd`, `[3].rate`). The root value
//! is reported as `$`.

use rates_core::{DecodeError, RateCache, normalize};
use serde_json::{Map, Value};

/// Path of the document root in error messages.
pub const ROOT: &str = "$";

/// Join a parent path and an object key.
pub fn join(parent: &str, key: &str) -> String {
    if parent == ROOT { key.to_string() } else { format!("{parent}.{key}") }
}

/// Join a parent path and an array index.
pub fn index(parent: &str, i: usize) -> String {
    if parent == ROOT { format!("[{i}]") } else { format!("{parent}[{i}]") }
}

pub fn as_object<'a>(v: &'a Value, schema: &'static str, path: &str) -> Result<&'a Map<String, Value>, DecodeError> {
    v.as_object().ok_or_else(|| DecodeError::mismatch(schema, path))
}

pub fn as_array<'a>(v: &'a Value, schema: &'static str, path: &str) -> Result<&'a Vec<Value>, DecodeError> {
    v.as_array().ok_or_else(|| DecodeError::mismatch(schema, path))
}

pub fn as_str<'a>(v: &'a Value, schema: &'static str, path: &str) -> Result<&'a str, DecodeError> {
    v.as_str().ok_or_else(|| DecodeError::mismatch(schema, path))
}

/// Look up a required key on an object.
pub fn field<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    schema: &'static str,
    parent: &str,
) -> Result<&'a Value, DecodeError> {
    obj.get(key).ok_or_else(|| DecodeError::mismatch(schema, join(parent, key)))
}

/// Look up a required key that must itself be an object.
pub fn object_field<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    schema: &'static str,
    parent: &str,
) -> Result<&'a Map<String, Value>, DecodeError> {
    let v = field(obj, key, schema, parent)?;
    as_object(v, schema, &join(parent, key))
}

/// A JSON number usable as a price: finite and strictly positive.
pub fn price(v: &Value, schema: &'static str, path: &str) -> Result<f64, DecodeError> {
    v.as_f64().filter(|p| is_valid_price(*p)).ok_or_else(|| DecodeError::mismatch(schema, path))
}

/// A price encoded as a decimal string (`"30000.5"`).
pub fn price_str(v: &Value, schema: &'static str, path: &str) -> Result<f64, DecodeError> {
    let s = as_str(v, schema, path)?;
    fast_float2::parse::<f64, _>(s.trim())
        .ok()
        .filter(|p| is_valid_price(*p))
        .ok_or_else(|| DecodeError::mismatch(schema, path))
}

#[inline]
fn is_valid_price(p: f64) -> bool {
    p.is_finite() && p > 0.0
}

/// Write one decoded rate under its normalized code.
#[inline]
pub fn insert_rate(cache: &mut RateCache, code: &str, price: f64) {
    cache.insert(normalize(code), price);
}
