//! Provider registry — builds the ordered provider list from config.

use std::sync::Arc;

use anyhow::{Result, anyhow};
use rates_core::config::ProviderConfig;

use crate::provider::Provider;
use crate::schema::Schema;
use crate::transport::HttpTransport;

/// Create one [`Provider`] per config entry, preserving order.
///
/// All providers share `transport`. Unknown schema names are rejected.
pub fn build_providers(configs: &[ProviderConfig], transport: Arc<dyn HttpTransport>) -> Result<Vec<Provider>> {
    configs
        .iter()
        .map(|cfg| -> Result<Provider> {
            let schema: Schema =
                cfg.schema.parse().map_err(|e| anyhow!("provider '{}': {e}", cfg.name))?;
            Ok(Provider::new(cfg.name.clone(), cfg.url.clone(), schema, Arc::clone(&transport)))
        })
        .collect()
}
