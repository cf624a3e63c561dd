//! Upstream client identities
//!
//! The catalog varies its answers by the client that asks. Android is
//! tried first: it gets direct stream URLs where the web clients get
//! cipher-protected ones this crate cannot use.

use serde::Serialize;
use std::str::FromStr;

/// Client identity presented to the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientVariant {
    Android,
    WebRemix,
    Ios,
    TvEmbedded,
    Web,
}

impl ClientVariant {
    /// Order in which variants are tried when resolving with fallback
    pub const FALLBACK_ORDER: [ClientVariant; 5] = [
        ClientVariant::Android,
        ClientVariant::WebRemix,
        ClientVariant::Ios,
        ClientVariant::TvEmbedded,
        ClientVariant::Web,
    ];

    pub fn client_name(self) -> &'static str {
        match self {
            ClientVariant::Android => "ANDROID",
            ClientVariant::WebRemix => "WEB_REMIX",
            ClientVariant::Ios => "IOS",
            ClientVariant::TvEmbedded => "TVHTML5_SIMPLY_EMBEDDED_PLAYER",
            ClientVariant::Web => "WEB",
        }
    }

    pub fn client_version(self) -> &'static str {
        match self {
            ClientVariant::Android => "19.50.37",
            ClientVariant::WebRemix => "1.20241211.07.00",
            ClientVariant::Ios => "19.50.7",
            ClientVariant::TvEmbedded => "2.0",
            ClientVariant::Web => "2.20241211.07.00",
        }
    }

    pub fn platform(self) -> &'static str {
        match self {
            ClientVariant::Android | ClientVariant::Ios => "MOBILE",
            ClientVariant::WebRemix | ClientVariant::Web => "DESKTOP",
            ClientVariant::TvEmbedded => "TV",
        }
    }

    pub(crate) fn context(self) -> RequestContext {
        RequestContext {
            client: RequestClient {
                client_name: self.client_name(),
                client_version: self.client_version(),
                platform: self.platform(),
                hl: "en",
                gl: "US",
            },
        }
    }
}

impl FromStr for ClientVariant {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "android" => Ok(ClientVariant::Android),
            "web_remix" | "webremix" => Ok(ClientVariant::WebRemix),
            "ios" => Ok(ClientVariant::Ios),
            "tv" | "tv_embedded" => Ok(ClientVariant::TvEmbedded),
            "web" => Ok(ClientVariant::Web),
            other => Err(format!("unknown client variant: {}", other)),
        }
    }
}

/// `context` object sent with every player request
#[derive(Debug, Serialize)]
pub(crate) struct RequestContext {
    pub client: RequestClient,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RequestClient {
    pub client_name: &'static str,
    pub client_version: &'static str,
    pub platform: &'static str,
    pub hl: &'static str,
    pub gl: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn android_is_tried_first() {
        assert_eq!(ClientVariant::FALLBACK_ORDER[0], ClientVariant::Android);
    }

    #[test]
    fn context_serializes_with_catalog_field_names() {
        let json = serde_json::to_value(ClientVariant::Android.context()).unwrap();
        assert_eq!(json["client"]["clientName"], "ANDROID");
        assert_eq!(json["client"]["clientVersion"], "19.50.37");
        assert_eq!(json["client"]["platform"], "MOBILE");
        assert_eq!(json["client"]["hl"], "en");
        assert_eq!(json["client"]["gl"], "US");
    }

    #[test]
    fn variant_names_parse_case_insensitively() {
        assert_eq!("ANDROID".parse::<ClientVariant>(), Ok(ClientVariant::Android));
        assert_eq!("tv".parse::<ClientVariant>(), Ok(ClientVariant::TvEmbedded));
        assert_eq!("webremix".parse::<ClientVariant>(), Ok(ClientVariant::WebRemix));
        assert!("gameboy".parse::<ClientVariant>().is_err());
    }
}
