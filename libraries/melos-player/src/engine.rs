//! Playback engine
//!
//! Single source of truth for what is playing and what plays next.
//! All mutating operations are synchronous and run on the caller's
//! thread; element events arrive through a channel and are folded in
//! by [`PlayerEngine::process_events`]. Operations never return errors
//! to the caller: a failed load or a rejected play is logged and the
//! state rolls back to a consistent stopped shape.

use crate::element::MediaElement;
use crate::events::MediaEvent;
use crate::policy::{self, NextAction};
use crate::prefs::{PreferenceStore, Preferences};
use crate::types::{LoopMode, PlayerState, QueueInfo, Track};
use std::sync::mpsc::Receiver;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Position beyond which "previous" restarts the current track instead
/// of stepping back through the queue
const PREVIOUS_RESTART_THRESHOLD: Duration = Duration::from_secs(3);

/// Volume restored by unmute when no earlier audible level is known
const DEFAULT_UNMUTE_VOLUME: u8 = 50;

type ElementFactory = Box<dyn Fn() -> Box<dyn MediaElement> + Send>;

/// The playback and queue state machine.
///
/// Owns a media element and a queue of tracks. The element is replaced
/// wholesale by [`reset`](Self::reset), which is also the only point
/// where the engine re-subscribes to element events.
pub struct PlayerEngine {
    element: Box<dyn MediaElement>,
    make_element: ElementFactory,
    events: Option<Receiver<MediaEvent>>,
    prefs: Box<dyn PreferenceStore>,

    queue: Vec<Track>,
    queue_index: Option<usize>,
    current_track: Option<Track>,

    is_playing: bool,
    is_buffering: bool,
    current_time: Duration,
    duration: Option<Duration>,

    volume: u8,
    last_volume: u8,
    shuffle: bool,
    loop_mode: LoopMode,
}

impl PlayerEngine {
    /// Create an engine around an element built by `make_element`.
    ///
    /// Persisted preferences are loaded and applied immediately. The
    /// element's event stream is claimed here, exactly once.
    pub fn new<F>(make_element: F, prefs: Box<dyn PreferenceStore>) -> Self
    where
        F: Fn() -> Box<dyn MediaElement> + Send + 'static,
    {
        let make_element: ElementFactory = Box::new(make_element);
        let mut element = make_element();
        let events = element.take_events();
        if events.is_none() {
            error!("Media element did not provide an event stream");
        }

        let stored = prefs.load().unwrap_or_default();
        let volume = stored.volume.min(100);
        element.set_volume(volume);

        Self {
            element,
            make_element,
            events,
            prefs,
            queue: Vec::new(),
            queue_index: None,
            current_track: None,
            is_playing: false,
            is_buffering: false,
            current_time: Duration::ZERO,
            duration: None,
            volume,
            last_volume: if volume > 0 { volume } else { DEFAULT_UNMUTE_VOLUME },
            shuffle: stored.shuffle,
            loop_mode: stored.loop_mode,
        }
    }

    // ===== Playback Control =====

    /// Play `track`, or toggle play/pause when it is already current.
    ///
    /// On a load or play failure the previous current track stays in
    /// place so its metadata remains visible; only the playing and
    /// buffering flags drop.
    pub fn play_track(&mut self, track: &Track) {
        if track.video_id.is_empty() {
            error!("play_track: track has no identifier");
            return;
        }

        let is_current = self
            .current_track
            .as_ref()
            .is_some_and(|current| current.video_id == track.video_id);

        if is_current {
            if self.is_playing {
                self.element.pause();
                self.is_playing = false;
            } else {
                match self.element.play() {
                    Ok(()) => self.is_playing = true,
                    Err(e) => {
                        error!("play_track: resume rejected: {}", e);
                        self.is_playing = false;
                        self.is_buffering = false;
                    }
                }
            }
            return;
        }

        if let Err(e) = self.element.load(&track.video_id) {
            error!("play_track: failed to load {}: {}", track.video_id, e);
            self.is_playing = false;
            self.is_buffering = false;
            return;
        }
        self.element.set_volume(self.volume);

        match self.element.play() {
            Ok(()) => {
                // Adopt the queue position when the track is queued;
                // otherwise the index is left where it was.
                if let Some(found) = self
                    .queue
                    .iter()
                    .position(|queued| queued.video_id == track.video_id)
                {
                    self.queue_index = Some(found);
                }
                self.current_track = Some(track.clone());
                self.is_playing = true;
                self.is_buffering = false;
                self.current_time = Duration::ZERO;
            }
            Err(e) => {
                error!("play_track: playback rejected for {}: {}", track.video_id, e);
                self.is_playing = false;
                self.is_buffering = false;
            }
        }
    }

    /// Toggle play/pause on the current track
    pub fn toggle_play(&mut self) {
        if self.current_track.is_none() {
            warn!("toggle_play: no track loaded");
            return;
        }

        if self.is_playing {
            self.element.pause();
            self.is_playing = false;
        } else {
            match self.element.play() {
                Ok(()) => self.is_playing = true,
                Err(e) => error!("toggle_play: playback rejected: {}", e),
            }
        }
    }

    /// Advance according to the loop and shuffle rules.
    ///
    /// Also runs when the element reports the current track ended.
    pub fn play_next(&mut self) {
        let action = policy::decide_next(
            self.queue.len(),
            self.queue_index,
            self.shuffle,
            self.loop_mode,
            self.current_track.is_some(),
            &mut rand::thread_rng(),
        );
        debug!("play_next: {:?}", action);
        self.apply_next_action(action);
    }

    /// Step back: restart the current track when more than a few
    /// seconds in, otherwise move to the previous queue entry.
    pub fn play_previous(&mut self) {
        if self.element.position() > PREVIOUS_RESTART_THRESHOLD {
            self.restart_current();
            return;
        }

        match self.queue_index {
            Some(index) if index > 0 => {
                let previous = self.queue[index - 1].clone();
                self.queue_index = Some(index - 1);
                self.play_track(&previous);
            }
            _ => {
                // At the head of the queue, or no queue position at
                // all. Restart whatever is loaded.
                if self.current_track.is_some() {
                    self.restart_current();
                }
            }
        }
    }

    // ===== Seeking =====

    /// Seek to a percentage of the known duration, 0 to 100.
    ///
    /// No-op until the element has reported a duration.
    pub fn seek_to_percent(&mut self, percent: f32) {
        let Some(duration) = self.element.duration() else {
            return;
        };
        if duration.is_zero() {
            return;
        }
        let percent = percent.clamp(0.0, 100.0);
        self.seek_element(duration.mul_f32(percent / 100.0));
    }

    /// Seek to an absolute position, clamped to the known duration.
    ///
    /// No-op until the element has reported a duration.
    pub fn seek_to(&mut self, position: Duration) {
        let Some(duration) = self.element.duration() else {
            return;
        };
        if duration.is_zero() {
            return;
        }
        self.seek_element(position.min(duration));
    }

    fn seek_element(&mut self, target: Duration) {
        match self.element.seek(target) {
            Ok(()) => {
                // Optimistic: the element's next TimeUpdate wins.
                self.current_time = target;
            }
            Err(e) => warn!("seek failed: {}", e),
        }
    }

    // ===== Volume =====

    /// Set the volume, clamped to 0..=100
    pub fn set_volume(&mut self, level: u8) {
        let level = level.min(100);
        self.element.set_volume(level);
        self.volume = level;
        if level > 0 {
            self.last_volume = level;
        }
        self.save_preferences();
    }

    /// Mute, or restore the last audible volume
    pub fn toggle_mute(&mut self) {
        if self.volume > 0 {
            self.last_volume = self.volume;
            self.volume = 0;
            self.element.set_volume(0);
        } else {
            let restored = if self.last_volume > 0 {
                self.last_volume
            } else {
                DEFAULT_UNMUTE_VOLUME
            };
            self.volume = restored;
            self.element.set_volume(restored);
        }
        self.save_preferences();
    }

    // ===== Queue Management =====

    /// Replace the queue wholesale and start playback at `start_index`
    /// (clamped to the queue length).
    ///
    /// When the entry at the start index is already the current track,
    /// the queue swaps underneath it without reloading; paused playback
    /// is resumed.
    pub fn set_queue(&mut self, tracks: Vec<Track>, start_index: usize) {
        if tracks.is_empty() {
            warn!("set_queue: no tracks provided");
            return;
        }

        let index = start_index.min(tracks.len() - 1);
        let starting = tracks[index].clone();
        let same_track = self
            .current_track
            .as_ref()
            .is_some_and(|current| current.video_id == starting.video_id);

        self.queue = tracks;
        self.queue_index = Some(index);

        if same_track {
            if !self.is_playing {
                match self.element.play() {
                    Ok(()) => self.is_playing = true,
                    Err(e) => error!("set_queue: resume rejected: {}", e),
                }
            }
        } else {
            self.play_track(&starting);
        }
    }

    /// Play the queue entry at `index`
    pub fn play_track_at_index(&mut self, index: usize) {
        if index >= self.queue.len() {
            warn!(
                "play_track_at_index: index {} out of bounds (queue length {})",
                index,
                self.queue.len()
            );
            return;
        }
        self.queue_index = Some(index);
        let track = self.queue[index].clone();
        self.play_track(&track);
    }

    /// Append tracks to the queue.
    ///
    /// When nothing is playing yet, playback starts at the current
    /// queue position (the front, for a previously empty queue).
    pub fn add_to_queue(&mut self, tracks: Vec<Track>) {
        if tracks.is_empty() {
            warn!("add_to_queue: no tracks to add");
            return;
        }

        self.queue.extend(tracks);
        if self.queue_index.is_none() {
            self.queue_index = Some(0);
        }

        if self.current_track.is_none() {
            if let Some(index) = self.queue_index {
                let track = self.queue[index].clone();
                self.play_track(&track);
            }
        }
    }

    /// Remove the queue entry at `index`, shifting later entries down.
    ///
    /// Removing the playing entry stops it; the entry shifted into its
    /// place, if any, starts playing. Removing the last entry while it
    /// plays leaves the queue without a position.
    pub fn remove_from_queue(&mut self, index: usize) {
        if index >= self.queue.len() {
            warn!("remove_from_queue: index {} out of bounds", index);
            return;
        }

        let removed = self.queue.remove(index);

        match self.queue_index {
            Some(current) if index < current => {
                self.queue_index = Some(current - 1);
            }
            Some(current) if index == current => {
                let removed_is_current = self
                    .current_track
                    .as_ref()
                    .is_some_and(|track| track.video_id == removed.video_id);
                if removed_is_current {
                    self.element.pause();
                    self.is_playing = false;
                    self.current_track = None;
                    self.current_time = Duration::ZERO;
                }

                if index < self.queue.len() {
                    self.queue_index = Some(index);
                    let replacement = self.queue[index].clone();
                    self.play_track(&replacement);
                } else {
                    self.queue_index = None;
                }
            }
            _ => {}
        }
    }

    /// Drop the whole queue and stop playback.
    ///
    /// The current track's metadata stays visible so the UI keeps
    /// showing what was last playing.
    pub fn clear_queue(&mut self) {
        self.element.pause();
        self.queue.clear();
        self.queue_index = None;
        self.is_playing = false;
        self.current_time = Duration::ZERO;
    }

    // ===== Modes =====

    /// Toggle shuffle
    pub fn toggle_shuffle(&mut self) {
        self.shuffle = !self.shuffle;
        debug!("shuffle: {}", self.shuffle);
        self.save_preferences();
    }

    /// Cycle the loop mode: none, one, all
    pub fn toggle_loop(&mut self) {
        self.loop_mode = self.loop_mode.cycle();
        debug!("loop mode: {:?}", self.loop_mode);
        self.save_preferences();
    }

    // ===== Element Events =====

    /// Drain pending element events and fold them into the state.
    ///
    /// Hosts call this from their update loop. Position and duration
    /// reported here overwrite any optimistic value a seek set.
    pub fn process_events(&mut self) {
        let mut batch = Vec::new();
        if let Some(receiver) = &self.events {
            while let Ok(event) = receiver.try_recv() {
                batch.push(event);
            }
        }
        for event in batch {
            self.apply_event(event);
        }
    }

    fn apply_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::TimeUpdate { position, duration } => {
                self.current_time = position;
                self.duration = duration;
            }
            MediaEvent::BufferingStart => self.is_buffering = true,
            MediaEvent::BufferingEnd => self.is_buffering = false,
            MediaEvent::Ended => {
                debug!("track ended, advancing");
                self.play_next();
            }
            MediaEvent::Error { message } => {
                error!("Media element error: {}", message);
                self.is_playing = false;
                self.is_buffering = false;
            }
        }
    }

    // ===== Recovery =====

    /// Tear down the element and build a fresh one (crash recovery).
    ///
    /// All transient state clears; persisted preferences survive and
    /// are re-applied to the new element. This is the only path that
    /// re-subscribes to element events.
    pub fn reset(&mut self) {
        self.element.pause();
        self.element = (self.make_element)();
        self.events = self.element.take_events();
        if self.events.is_none() {
            error!("reset: media element did not provide an event stream");
        }
        self.element.set_volume(self.volume);

        self.queue.clear();
        self.queue_index = None;
        self.current_track = None;
        self.is_playing = false;
        self.is_buffering = false;
        self.current_time = Duration::ZERO;
        self.duration = None;

        info!("Player reset");
    }

    // ===== Observable State =====

    /// Snapshot of the observable playback state
    pub fn state(&self) -> PlayerState {
        PlayerState {
            current_track: self.current_track.clone(),
            is_playing: self.is_playing,
            is_buffering: self.is_buffering,
            current_time: self.current_time,
            duration: self.duration,
            progress_percent: self.progress_percent(),
            volume: self.volume,
            shuffle: self.shuffle,
            loop_mode: self.loop_mode,
        }
    }

    /// Progress through the current track, 0 to 100.
    ///
    /// Always derived from position and duration, never stored, so it
    /// cannot drift from them.
    pub fn progress_percent(&self) -> f32 {
        match self.duration {
            Some(duration) if !duration.is_zero() => {
                let ratio = self.current_time.as_secs_f32() / duration.as_secs_f32();
                (ratio * 100.0).clamp(0.0, 100.0)
            }
            _ => 0.0,
        }
    }

    /// The queued tracks, in order
    pub fn queue(&self) -> &[Track] {
        &self.queue
    }

    /// Index of the current track within the queue
    pub fn queue_index(&self) -> Option<usize> {
        self.queue_index
    }

    /// Track currently loaded, if any
    pub fn current_track(&self) -> Option<&Track> {
        self.current_track.as_ref()
    }

    /// Whether playback is running
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Current volume, 0 to 100
    pub fn volume(&self) -> u8 {
        self.volume
    }

    /// Whether shuffle is active
    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    /// Current loop mode
    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    /// Derived view of the queue around the current position.
    ///
    /// Read-only: a missing index is recomputed for the view by
    /// searching the queue for the current track, without mutating
    /// the stored state.
    pub fn queue_info(&self) -> QueueInfo {
        let mut index = self.queue_index;
        if index.is_none() {
            if let Some(current) = &self.current_track {
                index = self
                    .queue
                    .iter()
                    .position(|track| track.video_id == current.video_id);
                if index.is_some() {
                    debug!("queue_info: derived index for current track");
                }
            }
        }

        QueueInfo {
            current_track: self.current_track.clone(),
            current_index: index,
            next_track: index.and_then(|i| self.queue.get(i + 1)).cloned(),
            previous_track: index
                .and_then(|i| i.checked_sub(1))
                .and_then(|p| self.queue.get(p))
                .cloned(),
            queue_length: self.queue.len(),
            position_in_queue: index.map_or(0, |i| i + 1),
        }
    }

    /// Repair a desynced queue index in place.
    ///
    /// Returns whether the queue is usable afterwards: non-empty with
    /// a valid position.
    pub fn validate_queue_state(&mut self) -> bool {
        if self.queue_index.is_none() && !self.queue.is_empty() {
            if let Some(current) = &self.current_track {
                if let Some(found) = self
                    .queue
                    .iter()
                    .position(|track| track.video_id == current.video_id)
                {
                    warn!("validate_queue_state: repaired queue index to {}", found);
                    self.queue_index = Some(found);
                }
            }
        }
        self.queue_index.is_some() && !self.queue.is_empty()
    }

    // ===== Internals =====

    fn restart_current(&mut self) {
        if let Err(e) = self.element.seek(Duration::ZERO) {
            warn!("restart seek failed: {}", e);
        }
        self.current_time = Duration::ZERO;
    }

    fn apply_next_action(&mut self, action: NextAction) {
        match action {
            NextAction::Stop => {
                self.element.pause();
                self.is_playing = false;
            }
            NextAction::RestartCurrent => {
                self.restart_current();
                match self.element.play() {
                    Ok(()) => self.is_playing = true,
                    Err(e) => {
                        error!("play_next: restart rejected: {}", e);
                        self.is_playing = false;
                    }
                }
            }
            NextAction::PlayIndex(index) => {
                if let Some(track) = self.queue.get(index).cloned() {
                    self.queue_index = Some(index);
                    self.play_track(&track);
                }
            }
            NextAction::EndOfQueue => {
                self.element.pause();
                self.is_playing = false;
                self.current_time = Duration::ZERO;
            }
        }
    }

    fn save_preferences(&self) {
        self.prefs.save(&Preferences {
            volume: self.volume,
            shuffle: self.shuffle,
            loop_mode: self.loop_mode,
        });
    }
}
