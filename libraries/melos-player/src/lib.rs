//! Melos - Playback Engine
//!
//! Platform-agnostic playback and queue state machine. The engine owns
//! a [`MediaElement`] (whatever actually produces sound on the host)
//! and tracks the queue, playback flags, position, volume, and the
//! shuffle/loop modes. Hosts call its synchronous operations from
//! their UI thread and pump [`PlayerEngine::process_events`] to fold
//! in element notifications.
//!
//! # Example
//!
//! ```ignore
//! use melos_player::{FilePreferenceStore, PlayerEngine};
//!
//! let mut engine = PlayerEngine::new(
//!     || Box::new(WebAudioElement::new("/stream")),
//!     Box::new(FilePreferenceStore::new("player-prefs.json")),
//! );
//!
//! engine.set_queue(album_tracks, 0);
//! engine.toggle_shuffle();
//!
//! // From the host's update loop:
//! engine.process_events();
//! let state = engine.state();
//! ```

mod element;
mod engine;
mod error;
mod events;
mod policy;
mod prefs;
pub mod types;

pub use element::MediaElement;
pub use engine::PlayerEngine;
pub use error::{PlayerError, Result};
pub use events::MediaEvent;
pub use prefs::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore, Preferences};
pub use types::{LoopMode, PlayerState, QueueInfo, Track};
