//! HTTP client for the catalog player endpoint

use crate::context::{ClientVariant, RequestContext};
use crate::error::{CatalogError, Result};
use crate::response::PlayerResponse;
use crate::types::{CatalogConfig, StreamCandidate};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlayerRequest<'a> {
    context: RequestContext,
    video_id: &'a str,
}

/// Client for resolving tracks to playable stream URLs
#[derive(Debug)]
pub struct CatalogClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl CatalogClient {
    /// Create a client for the configured upstream
    pub fn new(config: CatalogConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(CatalogError::InvalidUrl(base_url));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Melos/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(CatalogError::Request)?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key,
        })
    }

    /// Resolve playable stream candidates for `video_id` as `variant`.
    ///
    /// Only formats carrying both an audio mime type and a direct URL
    /// are returned. Cipher-protected formats are skipped; decoding
    /// their signatures is out of scope here.
    pub async fn resolve_streams(
        &self,
        video_id: &str,
        variant: ClientVariant,
    ) -> Result<Vec<StreamCandidate>> {
        let url = format!("{}/player?key={}", self.base_url, self.api_key);
        let request = PlayerRequest {
            context: variant.context(),
            video_id,
        };

        debug!(
            video_id = %video_id,
            client = variant.client_name(),
            "resolving streams"
        );

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CatalogError::Timeout(e.to_string())
                } else if e.is_connect() {
                    CatalogError::Unreachable(e.to_string())
                } else {
                    CatalogError::Request(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CatalogError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let player: PlayerResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::Parse(format!("player response: {}", e)))?;

        let Some(streaming) = player.streaming_data else {
            return Err(CatalogError::NoStreamingData {
                video_id: video_id.to_string(),
            });
        };

        let mut candidates = Vec::new();
        let mut ciphered = 0usize;
        for format in streaming.adaptive_formats {
            let Some(mime_type) = format.mime_type else {
                continue;
            };
            if !mime_type.contains("audio") {
                continue;
            }
            if let Some(url) = format.url {
                candidates.push(StreamCandidate { url, mime_type });
            } else if format.signature_cipher.is_some() || format.legacy_cipher.is_some() {
                ciphered += 1;
            }
        }

        if ciphered > 0 {
            debug!(
                video_id = %video_id,
                skipped = ciphered,
                "skipped cipher-protected formats"
            );
        }
        debug!(
            video_id = %video_id,
            candidates = candidates.len(),
            "resolved streams"
        );

        Ok(candidates)
    }

    /// Resolve with client fallback: walk [`ClientVariant::FALLBACK_ORDER`]
    /// until a variant yields candidates.
    ///
    /// An empty `Ok` means at least one variant answered but none of
    /// them offered a playable format. An error means every variant
    /// failed; the last failure is returned.
    pub async fn resolve_any(&self, video_id: &str) -> Result<Vec<StreamCandidate>> {
        let mut last_error: Option<CatalogError> = None;
        let mut any_answered = false;

        for variant in ClientVariant::FALLBACK_ORDER {
            match self.resolve_streams(video_id, variant).await {
                Ok(candidates) if !candidates.is_empty() => return Ok(candidates),
                Ok(_) => {
                    any_answered = true;
                    warn!(
                        video_id = %video_id,
                        client = variant.client_name(),
                        "no playable formats, trying next client"
                    );
                }
                Err(error) => {
                    warn!(
                        video_id = %video_id,
                        client = variant.client_name(),
                        error = %error,
                        "resolution failed, trying next client"
                    );
                    last_error = Some(error);
                }
            }
        }

        match last_error {
            Some(error) if !any_answered => Err(error),
            _ => Ok(Vec::new()),
        }
    }
}
