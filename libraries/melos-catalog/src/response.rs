//! Serde view of the upstream player response
//!
//! Only the fields this crate consumes are modeled; the real response
//! is far larger and everything else is ignored.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlayerResponse {
    pub streaming_data: Option<StreamingData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StreamingData {
    #[serde(default)]
    pub adaptive_formats: Vec<AdaptiveFormat>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AdaptiveFormat {
    pub mime_type: Option<String>,
    /// Direct URL; absent on cipher-protected formats
    pub url: Option<String>,
    pub signature_cipher: Option<String>,
    /// Older responses use the bare `cipher` key
    #[serde(rename = "cipher")]
    pub legacy_cipher: Option<String>,
}
