//! Public types for the catalog client

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A playable stream offered by the catalog for one track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamCandidate {
    /// Direct media URL, fetchable without further processing
    pub url: String,
    /// Full mime type, including the codecs parameter
    pub mime_type: String,
}

/// Catalog client configuration
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Upstream API base URL, without a trailing slash
    pub base_url: String,
    /// API key appended to player requests
    pub api_key: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl CatalogConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(20),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
