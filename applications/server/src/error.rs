/// Server error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use melos_catalog::CatalogError;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Upstream timeout: {0}")]
    UpstreamTimeout(String),

    #[error("Upstream unreachable: {0}")]
    UpstreamUnreachable(String),

    #[error("Upstream returned status {status}")]
    UpstreamStatus { status: u16 },

    #[error("Bad upstream response: {0}")]
    BadUpstream(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<CatalogError> for ServerError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NoStreamingData { video_id } => {
                ServerError::NotFound(format!("No streams for {}", video_id))
            }
            CatalogError::Timeout(msg) => ServerError::UpstreamTimeout(msg),
            CatalogError::Unreachable(msg) => ServerError::UpstreamUnreachable(msg),
            CatalogError::Status { status, .. } => ServerError::UpstreamStatus { status },
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ServerError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ServerError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "Rate limit exceeded".to_string(),
            ),
            ServerError::UpstreamTimeout(ref msg) => {
                tracing::warn!("Upstream timeout: {}", msg);
                (StatusCode::GATEWAY_TIMEOUT, "Upstream timeout".to_string())
            }
            ServerError::UpstreamUnreachable(ref msg) => {
                tracing::warn!("Upstream unreachable: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "Upstream unreachable".to_string(),
                )
            }
            // The upstream already chose a client-facing status; pass it
            // through untouched so players can react to 403/404 themselves.
            ServerError::UpstreamStatus { status } => {
                tracing::warn!("Upstream returned status {}", status);
                (
                    StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                    format!("Upstream returned status {}", status),
                )
            }
            ServerError::BadUpstream(msg) => {
                tracing::warn!("Bad upstream response: {}", msg);
                (StatusCode::BAD_GATEWAY, msg)
            }
            ServerError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Configuration error".to_string(),
                )
            }
            ServerError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_errors_map_to_the_right_variants() {
        let err: ServerError = CatalogError::NoStreamingData {
            video_id: "abc".to_string(),
        }
        .into();
        assert!(matches!(err, ServerError::NotFound(_)));

        let err: ServerError = CatalogError::Timeout("slow".to_string()).into();
        assert!(matches!(err, ServerError::UpstreamTimeout(_)));

        let err: ServerError = CatalogError::Unreachable("down".to_string()).into();
        assert!(matches!(err, ServerError::UpstreamUnreachable(_)));

        let err: ServerError = CatalogError::Status {
            status: 403,
            message: String::new(),
        }
        .into();
        assert!(matches!(err, ServerError::UpstreamStatus { status: 403 }));

        let err: ServerError = CatalogError::Parse("nonsense".to_string()).into();
        assert!(matches!(err, ServerError::Internal(_)));
    }

    #[test]
    fn upstream_statuses_pass_through_to_the_response() {
        let response = ServerError::UpstreamStatus { status: 403 }.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = ServerError::UpstreamStatus { status: 503 }.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn an_unrepresentable_upstream_status_becomes_bad_gateway() {
        let response = ServerError::UpstreamStatus { status: 99 }.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
