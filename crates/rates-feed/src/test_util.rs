//! In-memory transport for tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use rates_core::FetchError;

use crate::transport::HttpTransport;

/// Serves canned bodies per URL and counts calls.
#[derive(Default)]
pub struct StubTransport {
    routes: HashMap<String, Option<String>>,
    calls: Mutex<HashMap<String, usize>>,
    delay: Option<Duration>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to `url` with `body`.
    pub fn body(mut self, url: &str, body: &str) -> Self {
        self.routes.insert(url.into(), Some(body.into()));
        self
    }

    /// Respond to `url` with a network error.
    pub fn fail(mut self, url: &str) -> Self {
        self.routes.insert(url.into(), None);
        self
    }

    /// Sleep before answering each request.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }
}

#[async_trait]
impl HttpTransport for StubTransport {
    async fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        *self.calls.lock().unwrap().entry(url.to_string()).or_default() += 1;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.routes.get(url) {
            Some(Some(body)) => Ok(body.clone().into_bytes()),
            Some(None) => Err(FetchError::Network(format!("GET {url}: connection refused"))),
            None => Err(FetchError::Network(format!("GET {url}: 404 Not Found"))),
        }
    }
}
