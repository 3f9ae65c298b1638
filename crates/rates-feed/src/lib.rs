//! # rates-feed
//!
//! Exchange-rate feeds with ordered provider fallback.
//!
//! ## Architecture
//!
//! ```text
//! RefreshScheduler ─► PriceFetcher::refresh
//!                       └─► Provider[0..n] (first success wins)
//!                             └─► HttpTransport::get ─► serde_json ─► Schema::decode
//! ```
//!
//! - [`aggregator`] — `PriceFetcher`: cache, fallback refresh, lookup API
//! - [`provider`] — one endpoint bound to one schema
//! - [`schema`] — per-provider JSON decoders
//! - [`scheduler`] — periodic refresh loop with stop channel
//! - [`registry`] — providers from config
//! - [`transport`] — HTTP seam (`reqwest` in production)
//! - [`json_util`] — shape-checking helpers

pub mod aggregator;
pub mod json_util;
pub mod provider;
pub mod registry;
pub mod scheduler;
pub mod schema;
pub mod transport;

#[cfg(test)]
mod test_util;

pub use aggregator::PriceFetcher;
pub use provider::Provider;
pub use scheduler::RefreshScheduler;
pub use schema::Schema;
