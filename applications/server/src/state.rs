/// Shared application state
use crate::config::ServerConfig;
use crate::error::{Result, ServerError};
use crate::services::RateLimiter;
use melos_catalog::{CatalogClient, CatalogConfig};
use std::sync::Arc;
use std::time::Duration;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogClient>,
    /// Client for fetching media bytes. Deliberately has no total
    /// request timeout: streams stay open as long as a track plays.
    pub media_http: reqwest::Client,
    pub rate_limiter: Arc<RateLimiter>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Build the full state from configuration
    pub fn from_config(config: ServerConfig) -> Result<Self> {
        let catalog = CatalogClient::new(
            CatalogConfig::new(
                config.upstream.base_url.clone(),
                config.upstream.api_key.clone(),
            )
            .with_timeout(config.upstream_timeout()),
        )
        .map_err(|e| ServerError::Config(e.to_string()))?;

        let media_http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Melos/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ServerError::Internal(e.to_string()))?;

        Ok(Self {
            catalog: Arc::new(catalog),
            media_http,
            rate_limiter: Arc::new(RateLimiter::new(config.proxy.rate_limit_per_minute)),
            config: Arc::new(config),
        })
    }
}
