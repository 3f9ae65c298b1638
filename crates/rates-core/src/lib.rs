//! # rates-core
//!
//! Core crate for the coin exchange-rate service, providing:
//!
//! - **Currency** (`currency`) — code normalization, the rate cache type
//! - **Configuration** (`config`) — JSON config deserialization
//! - **Error types** (`error`) — decode/fetch/lookup errors via thiserror
//! - **Checkpoints** (`checkpoint`) — frozen, self-checked sync checkpoints
//! - **Time utilities** (`time_util`) — epoch timestamps
//! - **Logging** (`logging`) — tracing-based structured logging

pub mod checkpoint;
pub mod config;
pub mod currency;
pub mod error;
pub mod logging;
pub mod time_util;

// Re-export the most used items at crate root for convenience.
pub use currency::{RateCache, UNITS_PER_COIN, normalize};
pub use error::{DecodeError, FetchError, RateError, RatesError};
