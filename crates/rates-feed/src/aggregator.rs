//! Provider-fallback price fetcher.
//!
//! [`PriceFetcher`] owns an ordered list of [`Provider`]s and the single rate
//! cache. A refresh walks the providers in priority order and stops at the
//! first one that succeeds; results are never merged across providers.
//!
//! ```text
//! Idle ─► Trying(0) ─┬─► Success
//!                    └─► Trying(1) ─┬─► Success
//!                                   └─► ... ─► AllFailed
//! ```
//!
//! One [`tokio::sync::Mutex`] guards the cache *and* the whole provider loop,
//! so network I/O for a refresh happens with the lock held. Lookups issued
//! meanwhile wait and then observe either the previous cache or the cache as
//! left by the provider that just succeeded.

use std::time::Duration;

use anyhow::Result;
use rates_core::config::AppConfig;
use rates_core::{RateCache, RateError, UNITS_PER_COIN, normalize, time_util};
use tokio::sync::{Mutex, watch};
use tracing::{error, info, warn};

use crate::provider::Provider;
use crate::registry;
use crate::scheduler;
use crate::transport::ReqwestTransport;

/// Interval used by [`PriceFetcher::run`].
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// State behind the fetcher's lock.
#[derive(Debug, Default)]
struct RateState {
    rates: RateCache,
    /// Epoch ms of the last successful refresh.
    updated_at_ms: Option<u64>,
}

/// Exchange-rate aggregator with ordered provider fallback.
#[derive(Debug)]
pub struct PriceFetcher {
    providers: Vec<Provider>,
    state: Mutex<RateState>,
}

impl PriceFetcher {
    /// Create a fetcher over `providers`, highest priority first. The cache
    /// starts empty; nothing is fetched until the first refresh.
    pub fn new(providers: Vec<Provider>) -> Self {
        Self { providers, state: Mutex::new(RateState::default()) }
    }

    /// Build the HTTP client and provider list from config.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let transport = std::sync::Arc::new(ReqwestTransport::new(&config.http)?);
        let providers = registry::build_providers(&config.effective_providers(), transport)?;
        Ok(Self::new(providers))
    }

    /// Provider names in priority order.
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(Provider::name).collect()
    }

    /// `(name, url)` of each provider in priority order.
    pub fn provider_endpoints(&self) -> Vec<(&str, &str)> {
        self.providers.iter().map(|p| (p.name(), p.url())).collect()
    }

    /// Cached price of one coin in `code`. Never touches the network.
    pub async fn get_exchange_rate(&self, code: &str) -> Result<f64, RateError> {
        let code = normalize(code);
        let state = self.state.lock().await;
        state.rates.get(&code).copied().ok_or(RateError::UntrackedCurrency(code))
    }

    /// Refresh, then look up `code`.
    pub async fn get_latest_rate(&self, code: &str) -> Result<f64, RateError> {
        self.refresh().await?;
        self.get_exchange_rate(code).await
    }

    /// Snapshot of every cached rate, refreshing first unless `use_cache`.
    ///
    /// The returned map is an independent copy.
    pub async fn get_all_rates(&self, use_cache: bool) -> Result<RateCache, RateError> {
        if !use_cache {
            self.refresh().await?;
        }
        let state = self.state.lock().await;
        Ok(state.rates.clone())
    }

    /// Smallest units per coin.
    pub fn units_per_coin(&self) -> u64 {
        UNITS_PER_COIN
    }

    /// Epoch ms of the last successful refresh, if any.
    pub async fn last_updated_ms(&self) -> Option<u64> {
        self.state.lock().await.updated_at_ms
    }

    /// Try each provider in order until one succeeds.
    ///
    /// Holds the lock for the whole call. Each provider is attempted at most
    /// once; every failure is logged and the next provider is tried.
    pub async fn refresh(&self) -> Result<(), RateError> {
        let mut state = self.state.lock().await;

        for provider in &self.providers {
            match provider.fetch(&mut state.rates).await {
                Ok(count) => {
                    state.updated_at_ms = Some(time_util::now_ms());
                    info!("[price-fetcher] refreshed {count} rate(s) from '{}'", provider.name());
                    return Ok(());
                }
                Err(e) => {
                    warn!("[price-fetcher] provider '{}' failed: {e}", provider.name());
                }
            }
        }

        error!("[price-fetcher] failed to fetch exchange rates: all {} provider(s) failed", self.providers.len());
        Err(RateError::AllProvidersFailed)
    }

    /// Refresh now and then every 15 minutes, forever.
    ///
    /// Failures are logged and the schedule continues. Intended to be spawned
    /// as a background task; use [`RefreshScheduler`](crate::scheduler::RefreshScheduler)
    /// when the loop must be stoppable.
    pub async fn run(&self) {
        let (_keep_open, shutdown_rx) = watch::channel(false);
        scheduler::refresh_loop(self, DEFAULT_REFRESH_INTERVAL, shutdown_rx).await;
    }
}
