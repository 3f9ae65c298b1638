//! A single price feed: endpoint + schema + transport.

use std::fmt;
use std::sync::Arc;

use rates_core::{FetchError, RateCache};
use tracing::debug;

use crate::schema::Schema;
use crate::transport::HttpTransport;

/// One configured price feed. Immutable after construction.
#[derive(Clone)]
pub struct Provider {
    name: String,
    url: String,
    schema: Schema,
    transport: Arc<dyn HttpTransport>,
}

impl Provider {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        schema: Schema,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self { name: name.into(), url: url.into(), schema, transport }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn schema(&self) -> Schema {
        self.schema
    }

    /// Fetch, parse and decode this feed into `cache`.
    ///
    /// The response is decoded into a staging map first; `cache` is only
    /// touched when the whole decode succeeds, and then only for the keys this
    /// feed reported. Returns the number of rates written.
    pub async fn fetch(&self, cache: &mut RateCache) -> Result<usize, FetchError> {
        if self.url.is_empty() {
            return Err(FetchError::Misconfigured(self.name.clone()));
        }

        let body = self.transport.get(&self.url).await?;
        let value: serde_json::Value =
            serde_json::from_slice(&body).map_err(|e| FetchError::Parse(format!("{}: {e}", self.name)))?;

        let mut staged = RateCache::new();
        self.schema.decode(&value, &mut staged)?;

        let count = staged.len();
        cache.extend(staged);
        debug!("[provider] '{}' decoded {count} rate(s) ({})", self.name, self.schema);
        Ok(count)
    }
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("name", &self.name)
            .field("url", &self.url)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::StubTransport;
    use rates_core::DecodeError;

    const URL: &str = "https://feed.test/rates";

    fn provider(schema: Schema, transport: StubTransport) -> Provider {
        Provider::new("test", URL, schema, Arc::new(transport))
    }

    #[tokio::test]
    async fn success_writes_normalized_rates() {
        let body = r#"{"market_data":{"current_price":{"usd":12.3,"eur":10.1}}}"#;
        let p = provider(Schema::CoinGecko, StubTransport::new().body(URL, body));
        let mut cache = RateCache::new();
        assert_eq!(p.fetch(&mut cache).await.unwrap(), 2);
        assert_eq!(cache.get("USD"), Some(&12.3));
        assert_eq!(cache.get("EUR"), Some(&10.1));
    }

    #[tokio::test]
    async fn empty_url_is_misconfigured() {
        let transport = Arc::new(StubTransport::new());
        let p = Provider::new("blank", "", Schema::BitPay, transport.clone());
        let err = p.fetch(&mut RateCache::new()).await.unwrap_err();
        assert!(matches!(err, FetchError::Misconfigured(name) if name == "blank"));
        assert_eq!(transport.calls(""), 0);
    }

    #[tokio::test]
    async fn transport_failure_is_network_error() {
        let p = provider(Schema::BitPay, StubTransport::new().fail(URL));
        assert!(matches!(p.fetch(&mut RateCache::new()).await, Err(FetchError::Network(_))));
    }

    #[tokio::test]
    async fn malformed_json_is_parse_error() {
        let p = provider(Schema::BitPay, StubTransport::new().body(URL, "<html>rate limited</html>"));
        assert!(matches!(p.fetch(&mut RateCache::new()).await, Err(FetchError::Parse(_))));
    }

    #[tokio::test]
    async fn schema_mismatch_propagates() {
        let p = provider(Schema::CoinGecko, StubTransport::new().body(URL, r#"{"market_data":{}}"#));
        let err = p.fetch(&mut RateCache::new()).await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::Decode(DecodeError::SchemaMismatch { field, .. }) if field == "market_data.current_price"
        ));
    }

    #[tokio::test]
    async fn failed_decode_after_partial_write_leaves_cache_untouched() {
        // Second entry lacks "rate": the decoder has already staged USD.
        let body = r#"[{"code":"USD","rate":2.0},{"code":"EUR"}]"#;
        let p = provider(Schema::BitPay, StubTransport::new().body(URL, body));
        let mut cache = RateCache::new();
        cache.insert("USD".into(), 1.0);

        assert!(p.fetch(&mut cache).await.is_err());
        assert_eq!(cache.get("USD"), Some(&1.0));
        assert!(cache.get("EUR").is_none());
    }

    #[tokio::test]
    async fn success_keeps_keys_the_feed_did_not_report() {
        let p = provider(Schema::BitPay, StubTransport::new().body(URL, r#"[{"code":"USD","rate":2.0}]"#));
        let mut cache = RateCache::new();
        cache.insert("USD".into(), 1.0);
        cache.insert("JPY".into(), 150.0);

        p.fetch(&mut cache).await.unwrap();
        assert_eq!(cache.get("USD"), Some(&2.0));
        assert_eq!(cache.get("JPY"), Some(&150.0));
    }
}
