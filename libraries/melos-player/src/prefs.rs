//! Persisted player preferences
//!
//! Only volume, shuffle, and loop mode survive restarts. The queue,
//! current track, and position are transient and always start fresh.

use crate::types::LoopMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// The user settings that persist across sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Volume, 0 to 100
    #[serde(default = "default_volume")]
    pub volume: u8,
    /// Whether shuffle is active
    #[serde(default)]
    pub shuffle: bool,
    /// Loop behavior
    #[serde(rename = "loop", default)]
    pub loop_mode: LoopMode,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            volume: default_volume(),
            shuffle: false,
            loop_mode: LoopMode::None,
        }
    }
}

fn default_volume() -> u8 {
    100
}

/// Best-effort preference storage.
///
/// Failures are logged and swallowed; playback never breaks because a
/// settings file could not be read or written.
pub trait PreferenceStore: Send {
    /// Load persisted preferences, `None` when nothing usable is stored
    fn load(&self) -> Option<Preferences>;

    /// Persist preferences
    fn save(&self, prefs: &Preferences);
}

/// JSON file backed store
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self) -> Option<Preferences> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Failed to read preferences from {:?}: {}", self.path, e);
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(prefs) => Some(prefs),
            Err(e) => {
                warn!("Ignoring malformed preferences in {:?}: {}", self.path, e);
                None
            }
        }
    }

    fn save(&self, prefs: &Preferences) {
        let json = match serde_json::to_string_pretty(prefs) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize preferences: {}", e);
                return;
            }
        };

        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!("Failed to create preference directory {:?}: {}", parent, e);
                return;
            }
        }

        if let Err(e) = std::fs::write(&self.path, json) {
            warn!("Failed to write preferences to {:?}: {}", self.path, e);
        }
    }
}

/// In-memory store for tests and hosts without a writable filesystem
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    inner: Arc<Mutex<Option<Preferences>>>,
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Option<Preferences> {
        self.inner.lock().ok().and_then(|guard| *guard)
    }

    fn save(&self, prefs: &Preferences) {
        if let Ok(mut guard) = self.inner.lock() {
            *guard = Some(*prefs);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_round_trips_preferences() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePreferenceStore::new(dir.path().join("prefs.json"));

        let prefs = Preferences {
            volume: 35,
            shuffle: true,
            loop_mode: LoopMode::All,
        };
        store.save(&prefs);

        assert_eq!(store.load(), Some(prefs));
    }

    #[test]
    fn file_store_returns_none_for_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePreferenceStore::new(dir.path().join("nope.json"));
        assert_eq!(store.load(), None);
    }

    #[test]
    fn file_store_ignores_malformed_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = FilePreferenceStore::new(path);
        assert_eq!(store.load(), None);
    }

    #[test]
    fn file_store_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePreferenceStore::new(dir.path().join("nested/deep/prefs.json"));
        store.save(&Preferences::default());
        assert_eq!(store.load(), Some(Preferences::default()));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let prefs: Preferences = serde_json::from_str("{}").unwrap();
        assert_eq!(prefs, Preferences::default());

        let prefs: Preferences = serde_json::from_str(r#"{"loop":"one"}"#).unwrap();
        assert_eq!(prefs.loop_mode, LoopMode::One);
        assert_eq!(prefs.volume, 100);
    }

    #[test]
    fn loop_mode_is_stored_under_the_loop_key() {
        let json = serde_json::to_value(Preferences {
            volume: 80,
            shuffle: false,
            loop_mode: LoopMode::All,
        })
        .unwrap();
        assert_eq!(json["loop"], "all");
    }

    #[test]
    fn memory_store_shares_state_across_clones() {
        let store = MemoryPreferenceStore::default();
        let clone = store.clone();

        store.save(&Preferences {
            volume: 10,
            shuffle: false,
            loop_mode: LoopMode::None,
        });

        assert_eq!(clone.load().map(|p| p.volume), Some(10));
    }
}
