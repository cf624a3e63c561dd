/// Server configuration
use crate::error::{Result, ServerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_upstream")]
    pub upstream: UpstreamSettings,

    #[serde(default = "default_proxy")]
    pub proxy: ProxySettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamSettings {
    /// Catalog API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Catalog API key, required
    #[serde(default)]
    pub api_key: String,

    /// Budget for resolution and for the upstream to start answering a
    /// media request. Does not bound an in-flight stream.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProxySettings {
    /// Requests per minute across all clients, 0 disables throttling
    #[serde(default = "default_rate_limit_per_minute")]
    pub rate_limit_per_minute: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            upstream: default_upstream(),
            proxy: default_proxy(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from file and environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        let config_path = path.map_or_else(|| PathBuf::from("config.toml"), Path::to_path_buf);
        if config_path.exists() {
            settings = settings.add_source(config::File::from(config_path));
        }

        // Override with environment variables (e.g. MELOS_UPSTREAM__API_KEY)
        settings = settings.add_source(
            config::Environment::with_prefix("MELOS")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.upstream.api_key.is_empty() {
            return Err(ServerError::Config(
                "Upstream API key is required (set MELOS_UPSTREAM__API_KEY)".to_string(),
            ));
        }

        if self.upstream.timeout_secs == 0 {
            return Err(ServerError::Config(
                "Upstream timeout must be positive".to_string(),
            ));
        }

        Ok(())
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream.timeout_secs)
    }
}

// Default values

fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_upstream() -> UpstreamSettings {
    UpstreamSettings {
        base_url: default_base_url(),
        api_key: String::new(),
        timeout_secs: default_timeout_secs(),
    }
}

fn default_proxy() -> ProxySettings {
    ProxySettings {
        rate_limit_per_minute: default_rate_limit_per_minute(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_base_url() -> String {
    melos_catalog::DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    20
}

fn default_rate_limit_per_minute() -> u32 {
    100
}
