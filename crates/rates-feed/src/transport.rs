//! HTTP transport used by providers.
//!
//! [`HttpTransport`] is the seam between the fallback engine and the network:
//! production code uses [`ReqwestTransport`], tests plug in canned bodies.

use anyhow::{Context, Result};
use async_trait::async_trait;
use rates_core::{FetchError, config::HttpConfig};
use tracing::debug;

/// Fetches a URL and returns the raw response body.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// HTTP GET `url`.
    ///
    /// Any transport failure, timeout, non-success status or unreadable body
    /// is reported as [`FetchError::Network`].
    async fn get(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// `reqwest`-backed transport shared by all providers.
///
/// The whole request (connect, send, read body) is bounded by the configured
/// timeout. When a proxy is configured, every connection is dialed through it.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// Build the client from [`HttpConfig`].
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().timeout(config.timeout());
        if let Some(proxy) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy).with_context(|| format!("invalid proxy url '{proxy}'"))?;
            builder = builder.proxy(proxy);
        }
        let http = builder.build().context("failed to build HTTP client")?;
        Ok(Self { http })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let resp = self.http.get(url).send().await.map_err(|e| FetchError::Network(format!("GET {url}: {e}")))?;
        let resp = resp.error_for_status().map_err(|e| FetchError::Network(format!("GET {url}: {e}")))?;
        let body = resp.bytes().await.map_err(|e| FetchError::Network(format!("GET {url}: body: {e}")))?;
        debug!("[http] GET {url} -> {} bytes", body.len());
        Ok(body.to_vec())
    }
}
