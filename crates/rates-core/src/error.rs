//! Typed error definitions for the exchange-rate service.
//!
//! The taxonomy is layered the same way a refresh is:
//!
//! - [`DecodeError`] — a response parsed as JSON but did not match the
//!   expected schema, or the upstream reported an error in-band.
//! - [`FetchError`] — one provider attempt failed (transport, JSON, decode).
//! - [`RateError`] — what callers of the aggregator see.
//! - [`RatesError`] — setup problems (config, checkpoint table).
//!
//! All variants implement `std::error::Error` via `thiserror`, so they
//! integrate with `anyhow::Result` at the binary edge.

use thiserror::Error;

/// A provider response did not decode into rates.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    /// Valid JSON, but a required field is missing or has the wrong type.
    #[error("{schema}: schema mismatch at '{field}'")]
    SchemaMismatch { schema: &'static str, field: String },

    /// The upstream reported an error inside an otherwise well-formed body.
    #[error("{schema}: provider returned error: {message}")]
    Provider { schema: &'static str, message: String },
}

impl DecodeError {
    /// Shorthand for [`DecodeError::SchemaMismatch`].
    pub fn mismatch(schema: &'static str, field: impl Into<String>) -> Self {
        Self::SchemaMismatch { schema, field: field.into() }
    }
}

/// A single provider fetch attempt failed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The provider has no endpoint configured.
    #[error("provider '{0}' has no fetch url")]
    Misconfigured(String),

    /// Transport failure, timeout, bad HTTP status or unreadable body.
    #[error("network error: {0}")]
    Network(String),

    /// The body is not valid JSON.
    #[error("parse error: {0}")]
    Parse(String),

    /// The JSON did not match the provider's schema.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Errors returned by the aggregator's public lookup API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateError {
    /// The cache holds no price for this currency.
    #[error("currency not tracked: {0}")]
    UntrackedCurrency(String),

    /// Every configured provider failed in one refresh attempt.
    #[error("all exchange rate providers failed")]
    AllProvidersFailed,
}

/// Setup-time errors.
#[derive(Debug, Error)]
pub enum RatesError {
    /// Configuration parsing or validation error.
    #[error("config error: {0}")]
    Config(String),

    /// The built-in checkpoint table failed its self-check.
    #[error("checkpoint error: {0}")]
    Checkpoint(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_names_field() {
        let e = DecodeError::mismatch("bitpay", "[0].rate");
        assert_eq!(e.to_string(), "bitpay: schema mismatch at '[0].rate'");
    }

    #[test]
    fn decode_error_passes_through_fetch_error() {
        let e: FetchError = DecodeError::Provider { schema: "coinmarketcap", message: "rate limited".into() }.into();
        assert_eq!(e.to_string(), "coinmarketcap: provider returned error: rate limited");
    }
}
