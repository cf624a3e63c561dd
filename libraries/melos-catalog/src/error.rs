//! Error types for catalog resolution

use thiserror::Error;

/// Errors from talking to the catalog upstream
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The upstream did not answer in time
    #[error("Catalog request timed out: {0}")]
    Timeout(String),

    /// Could not reach the upstream at all
    #[error("Catalog unreachable: {0}")]
    Unreachable(String),

    /// The upstream answered with a non-success status
    #[error("Catalog returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// The player response carried no streaming data at all
    #[error("No streaming data for {video_id}")]
    NoStreamingData { video_id: String },

    /// The response body did not parse
    #[error("Failed to parse catalog response: {0}")]
    Parse(String),

    /// The configured base URL is not usable
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),
}

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;
