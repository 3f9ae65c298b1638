//! Configuration parsing for the exchange-rate service.
//!
//! Settings are read from a single JSON file. Every field is optional, so an
//! empty object (`{}`) yields the built-in provider list and defaults.
//!
//! # Example config
//!
//! ```json
//! {
//!   "http": { "timeout_secs": 60, "proxy": "socks5://127.0.0.1:9050" },
//!   "refresh_interval_secs": 900,
//!   "providers": [
//!     { "name": "coingecko", "url": "https://api.coingecko.com/...", "schema": "coingecko" },
//!     { "name": "bitpay", "url": "https://bitpay.com/api/rates", "schema": "bitpay" }
//!   ]
//! }
//! ```
//!
//! Provider order in the file is fallback priority order.

use std::time::Duration;

use serde::Deserialize;

use crate::error::RatesError;

/// CoinGecko coin endpoint (market data only).
pub const COINGECKO_URL: &str = concat!(
    "https://api.coingecko.com/api/v3/coins/phore",
    "?tickers=false&community_data=false&developer_data=false&sparkline=false"
);

/// CoinMarketCap v2 ticker endpoint.
pub const COINMARKETCAP_URL: &str = "https://api.coinmarketcap.com/v2/ticker/2158/?convert=BTC";

/// Top-level application config, deserialized from a JSON file.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Shared HTTP client settings.
    #[serde(default)]
    pub http: HttpConfig,

    /// Seconds between background refreshes (default: 900).
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    /// Ordered provider list. `None` means [`default_providers`].
    pub providers: Option<Vec<ProviderConfig>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { http: HttpConfig::default(), refresh_interval_secs: default_refresh_interval_secs(), providers: None }
    }
}

impl AppConfig {
    /// Returns the configured providers, or the built-in list.
    pub fn effective_providers(&self) -> Vec<ProviderConfig> {
        self.providers.clone().unwrap_or_else(default_providers)
    }

    /// Refresh interval as a [`Duration`].
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// Reject settings that would make the service spin or never answer.
    pub fn validate(&self) -> Result<(), RatesError> {
        if self.http.timeout_secs == 0 {
            return Err(RatesError::Config("http.timeout_secs must be > 0".into()));
        }
        if self.refresh_interval_secs == 0 {
            return Err(RatesError::Config("refresh_interval_secs must be > 0".into()));
        }
        if matches!(self.providers.as_deref(), Some([])) {
            return Err(RatesError::Config("providers list is empty".into()));
        }
        Ok(())
    }
}

/// HTTP client settings shared by every provider.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Whole-request timeout in seconds (default: 60).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Optional proxy URL (`socks5://host:port`, `http://host:port`). All
    /// provider traffic is dialed through it.
    pub proxy: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: default_timeout_secs(), proxy: None }
    }
}

impl HttpConfig {
    /// Timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// One price feed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderConfig {
    /// Label used in logs.
    pub name: String,
    /// Endpoint fetched with HTTP GET.
    pub url: String,
    /// Response schema: `coingecko`, `coinmarketcap`, `bitcoinaverage`,
    /// `bitpay`, `blockchaininfo` or `bitcoincharts`.
    pub schema: String,
}

impl ProviderConfig {
    pub fn new(name: &str, url: &str, schema: &str) -> Self {
        Self { name: name.into(), url: url.into(), schema: schema.into() }
    }
}

/// Built-in providers, highest priority first.
pub fn default_providers() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig::new("coingecko", COINGECKO_URL, "coingecko"),
        ProviderConfig::new("coinmarketcap", COINMARKETCAP_URL, "coinmarketcap"),
    ]
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_refresh_interval_secs() -> u64 {
    15 * 60
}

/// Load and parse a JSON config file.
pub fn load_config(path: &std::path::Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}
