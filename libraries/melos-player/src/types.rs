//! Core types for playback and queue state

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A playable track as returned by the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Catalog identifier, also used as the stream endpoint path segment
    pub video_id: String,
    /// Display title
    pub title: String,
    /// Primary artist name
    pub artist: String,
    /// Thumbnail URL
    pub thumbnail: Option<String>,
    /// Track length in seconds, when the catalog knows it
    #[serde(rename = "duration")]
    pub duration_secs: Option<u64>,
    /// Album identifier
    pub album_id: Option<String>,
    /// Album display name
    pub album_name: Option<String>,
}

/// Loop behavior at track boundaries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopMode {
    /// Stop at the end of the queue
    #[default]
    None,
    /// Repeat the current track
    One,
    /// Wrap around to the start of the queue
    All,
}

impl LoopMode {
    /// Next mode in the toggle order: none, one, all
    pub fn cycle(self) -> Self {
        match self {
            LoopMode::None => LoopMode::One,
            LoopMode::One => LoopMode::All,
            LoopMode::All => LoopMode::None,
        }
    }
}

/// Snapshot of the observable playback state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerState {
    /// Track whose metadata is currently displayed
    pub current_track: Option<Track>,
    /// Whether playback is running
    pub is_playing: bool,
    /// Whether the element is stalled waiting for data
    pub is_buffering: bool,
    /// Playback position within the current track
    pub current_time: Duration,
    /// Total duration, once the element has reported it
    pub duration: Option<Duration>,
    /// Progress through the track, 0 to 100
    pub progress_percent: f32,
    /// Volume, 0 to 100
    pub volume: u8,
    /// Whether shuffle is active
    pub shuffle: bool,
    /// Loop behavior
    pub loop_mode: LoopMode,
}

/// Derived view of the queue around the current position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueInfo {
    /// Track currently loaded, if any
    pub current_track: Option<Track>,
    /// Index of the current track within the queue
    pub current_index: Option<usize>,
    /// Track that would play on a linear advance
    pub next_track: Option<Track>,
    /// Track that precedes the current one
    pub previous_track: Option<Track>,
    /// Number of tracks in the queue
    pub queue_length: usize,
    /// One-based position for display, 0 when nothing is queued
    pub position_in_queue: usize,
}
