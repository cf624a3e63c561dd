/// Audio streaming proxy API
use crate::{
    error::{Result, ServerError},
    state::AppState,
};
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::Response,
};
use melos_catalog::{select_preferred, StreamCandidate};
use tokio::time::timeout;

/// Longest track identifier accepted
const MAX_TRACK_ID_LEN: usize = 64;

/// Response headers copied through from the upstream when present
const FORWARDED_HEADERS: [&str; 4] = [
    "content-type",
    "content-length",
    "content-range",
    "accept-ranges",
];

/// GET /stream/:track_id
/// Resolve the track and re-stream the upstream bytes, forwarding any
/// Range header so players can seek.
pub async fn stream_track(
    Path(track_id): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response> {
    proxy_stream(state, &track_id, &headers, Method::GET).await
}

/// HEAD /stream/:track_id
/// Same resolution and header handling as GET, body omitted. Lets
/// players probe length and seekability before committing.
pub async fn head_track(
    Path(track_id): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response> {
    proxy_stream(state, &track_id, &headers, Method::HEAD).await
}

async fn proxy_stream(
    state: AppState,
    track_id: &str,
    headers: &HeaderMap,
    method: Method,
) -> Result<Response> {
    validate_track_id(track_id)?;

    if !state.rate_limiter.try_acquire() {
        return Err(ServerError::RateLimited);
    }

    let chosen = resolve_candidate(&state, track_id).await?;
    tracing::debug!("Streaming {} as {}", track_id, chosen.mime_type);

    let upstream = fetch_upstream(&state, &chosen.url, headers, &method).await?;

    let status = upstream.status();
    if status.is_client_error() || status.is_server_error() {
        tracing::warn!(
            "Upstream rejected the stream request for {}: {}",
            track_id,
            status.as_u16()
        );
        return Err(ServerError::UpstreamStatus {
            status: status.as_u16(),
        });
    }

    let content_type = upstream
        .headers()
        .get("content-type")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();
    if !is_streamable_content_type(&content_type) {
        tracing::warn!(
            "Upstream returned a non-audio payload for {}: {:?}",
            track_id,
            content_type
        );
        return Err(ServerError::BadUpstream(
            "Upstream did not return audio".to_string(),
        ));
    }

    // Preserve partial-content semantics; everything else flattens to 200.
    let response_status = if status.as_u16() == StatusCode::PARTIAL_CONTENT.as_u16() {
        StatusCode::PARTIAL_CONTENT
    } else {
        StatusCode::OK
    };

    let mut builder = Response::builder()
        .status(response_status)
        .header(header::CACHE_CONTROL, "no-cache");

    for name in FORWARDED_HEADERS {
        if let Some(value) = upstream.headers().get(name) {
            if let Ok(forwarded) = HeaderValue::from_bytes(value.as_bytes()) {
                builder = builder.header(name, forwarded);
            }
        }
    }

    // Bytes flow through as they arrive; dropping the response (client
    // disconnect) drops the upstream connection with it.
    let body = if method == Method::HEAD {
        Body::empty()
    } else {
        Body::from_stream(upstream.bytes_stream())
    };

    builder
        .body(body)
        .map_err(|e| ServerError::Internal(format!("Failed to build response: {}", e)))
}

/// Resolve the track through the catalog and pick the best candidate
async fn resolve_candidate(state: &AppState, track_id: &str) -> Result<StreamCandidate> {
    let resolution = state.catalog.resolve_any(track_id);
    let candidates = match timeout(state.config.upstream_timeout(), resolution).await {
        Ok(result) => result?,
        Err(_) => {
            return Err(ServerError::UpstreamTimeout(format!(
                "stream resolution exceeded {}s",
                state.config.upstream.timeout_secs
            )))
        }
    };

    select_preferred(&candidates)
        .cloned()
        .ok_or_else(|| ServerError::NotFound(format!("No playable stream for {}", track_id)))
}

/// Start the upstream media request, forwarding the client's Range.
///
/// Only the header phase is bounded by the timeout; once the upstream
/// starts answering, the body may flow for as long as the track lasts.
async fn fetch_upstream(
    state: &AppState,
    url: &str,
    headers: &HeaderMap,
    method: &Method,
) -> Result<reqwest::Response> {
    let mut request = if *method == Method::HEAD {
        state.media_http.head(url)
    } else {
        state.media_http.get(url)
    };

    if let Some(range) = headers.get(header::RANGE).and_then(|value| value.to_str().ok()) {
        request = request.header(reqwest::header::RANGE, range);
    }

    match timeout(state.config.upstream_timeout(), request.send()).await {
        Err(_) => Err(ServerError::UpstreamTimeout(format!(
            "no upstream response within {}s",
            state.config.upstream.timeout_secs
        ))),
        Ok(Err(e)) if e.is_connect() => Err(ServerError::UpstreamUnreachable(e.to_string())),
        Ok(Err(e)) if e.is_timeout() => Err(ServerError::UpstreamTimeout(e.to_string())),
        Ok(Err(e)) => Err(ServerError::Internal(e.to_string())),
        Ok(Ok(response)) => Ok(response),
    }
}

/// Track identifiers are catalog ids: short and URL-safe
fn validate_track_id(track_id: &str) -> Result<()> {
    if track_id.is_empty() {
        return Err(ServerError::BadRequest("Track id required".to_string()));
    }
    if track_id.len() > MAX_TRACK_ID_LEN {
        return Err(ServerError::BadRequest("Track id too long".to_string()));
    }
    if !track_id
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    {
        return Err(ServerError::BadRequest(
            "Track id contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

fn is_streamable_content_type(content_type: &str) -> bool {
    content_type.contains("audio/")
        || content_type.contains("video/")
        || content_type.contains("application/octet-stream")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_typical_track_ids() {
        assert!(validate_track_id("dQw4w9WgXcQ").is_ok());
        assert!(validate_track_id("abc-DEF_123").is_ok());
    }

    #[test]
    fn rejects_empty_and_oversized_ids() {
        assert!(validate_track_id("").is_err());
        assert!(validate_track_id(&"a".repeat(65)).is_err());
        assert!(validate_track_id(&"a".repeat(64)).is_ok());
    }

    #[test]
    fn rejects_ids_with_path_characters() {
        assert!(validate_track_id("../etc/passwd").is_err());
        assert!(validate_track_id("abc.def").is_err());
        assert!(validate_track_id("abc def").is_err());
        assert!(validate_track_id("abc/def").is_err());
    }

    #[test]
    fn streamable_content_types() {
        assert!(is_streamable_content_type("audio/mp4"));
        assert!(is_streamable_content_type("audio/webm; codecs=\"opus\""));
        assert!(is_streamable_content_type("video/mp4"));
        assert!(is_streamable_content_type("application/octet-stream"));
        assert!(!is_streamable_content_type("text/html; charset=utf-8"));
        assert!(!is_streamable_content_type("application/json"));
        assert!(!is_streamable_content_type(""));
    }
}
