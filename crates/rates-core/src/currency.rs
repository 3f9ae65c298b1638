//! Currency codes and the rate cache type.

use ahash::AHashMap;

/// Price of one coin keyed by normalized currency code (e.g. `"USD"`).
pub type RateCache = AHashMap<String, f64>;

/// Smallest units per coin (satoshi-style divisor).
pub const UNITS_PER_COIN: u64 = 100_000_000;

/// Canonical cache-key form of a currency code.
///
/// Idempotent: `normalize(&normalize(x)) == normalize(x)`.
#[inline]
pub fn normalize(code: &str) -> String {
    code.to_uppercase()
}
