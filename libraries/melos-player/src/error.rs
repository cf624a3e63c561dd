//! Error types for the playback engine

use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by media elements
#[derive(Debug, Error)]
pub enum PlayerError {
    /// The element could not load the requested media
    #[error("Failed to load media: {0}")]
    LoadFailed(String),

    /// The element refused to start playback (autoplay policy, decoder state)
    #[error("Playback rejected: {0}")]
    PlaybackRejected(String),

    /// Seek target outside the playable range
    #[error("Invalid seek position: {0:?}")]
    InvalidSeekPosition(Duration),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlayerError>;
