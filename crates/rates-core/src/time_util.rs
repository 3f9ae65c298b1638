//! Wall-clock timestamps.

use std::time::{SystemTime, UNIX_EPOCH};

#[inline]
fn since_epoch() -> std::time::Duration {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default()
}

/// Current time as **seconds** since Unix epoch.
#[inline]
pub fn now_secs() -> u64 {
    since_epoch().as_secs()
}

/// Current time as **milliseconds** since Unix epoch.
#[inline]
pub fn now_ms() -> u64 {
    since_epoch().as_millis() as u64
}
