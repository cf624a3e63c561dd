//! Platform media element abstraction

use crate::error::Result;
use crate::events::MediaEvent;
use std::sync::mpsc::Receiver;
use std::time::Duration;

/// A platform audio element the engine drives.
///
/// Implementations wrap whatever actually makes sound on the host: an
/// HTML audio element behind a webview bridge, a native output stream,
/// or a silent stub. The engine never talks to the platform directly.
pub trait MediaElement: Send {
    /// Load media by track identifier, replacing whatever was loaded.
    ///
    /// Position resets to zero and the duration becomes unknown until
    /// the element reports it through a `TimeUpdate` event.
    fn load(&mut self, track_id: &str) -> Result<()>;

    /// Begin or resume playback.
    ///
    /// An error means the element refused to start (autoplay policy,
    /// decoder failure); the caller must not assume playback is running.
    fn play(&mut self) -> Result<()>;

    /// Halt playback, keeping the current position
    fn pause(&mut self);

    /// Move the playhead
    fn seek(&mut self, position: Duration) -> Result<()>;

    /// Current playhead position
    fn position(&self) -> Duration;

    /// Total duration, `None` until media metadata is known
    fn duration(&self) -> Option<Duration>;

    /// Set output volume, 0 to 100
    fn set_volume(&mut self, level: u8);

    /// Current output volume
    fn volume(&self) -> u8;

    /// Hand out the element's event stream.
    ///
    /// Returns `Some` exactly once per element instance; later calls
    /// return `None`. The engine claims the receiver at construction
    /// and again after every `reset`, so no event is ever delivered to
    /// two listeners.
    fn take_events(&mut self) -> Option<Receiver<MediaEvent>>;
}

#[cfg(test)]
pub(crate) use fake::{FakeElementHandle, FakeMediaElement};

#[cfg(test)]
mod fake {
    use super::*;
    use crate::error::PlayerError;
    use std::sync::mpsc::{self, Sender};
    use std::sync::{Arc, Mutex};

    /// Scriptable in-memory element for engine tests
    pub(crate) struct FakeMediaElement {
        shared: Arc<Mutex<FakeElementState>>,
        receiver: Option<Receiver<MediaEvent>>,
    }

    /// Test-side handle for inspecting and driving a fake element
    #[derive(Clone)]
    pub(crate) struct FakeElementHandle {
        shared: Arc<Mutex<FakeElementState>>,
        sender: Sender<MediaEvent>,
    }

    #[derive(Debug, Clone, Default)]
    pub(crate) struct FakeElementState {
        pub loaded: Vec<String>,
        pub playing: bool,
        pub play_calls: u32,
        pub pause_calls: u32,
        pub seeks: Vec<Duration>,
        pub position: Duration,
        pub duration: Option<Duration>,
        pub volume: u8,
        pub reject_play: bool,
        pub reject_load: bool,
    }

    impl FakeMediaElement {
        pub fn create() -> (Self, FakeElementHandle) {
            let (sender, receiver) = mpsc::channel();
            let shared = Arc::new(Mutex::new(FakeElementState::default()));
            let element = Self {
                shared: Arc::clone(&shared),
                receiver: Some(receiver),
            };
            (element, FakeElementHandle { shared, sender })
        }
    }

    impl FakeElementHandle {
        pub fn emit(&self, event: MediaEvent) {
            let _ = self.sender.send(event);
        }

        pub fn set_position(&self, position: Duration) {
            self.shared.lock().unwrap().position = position;
        }

        pub fn set_duration(&self, duration: Option<Duration>) {
            self.shared.lock().unwrap().duration = duration;
        }

        pub fn set_reject_play(&self, reject: bool) {
            self.shared.lock().unwrap().reject_play = reject;
        }

        pub fn snapshot(&self) -> FakeElementState {
            self.shared.lock().unwrap().clone()
        }
    }

    impl MediaElement for FakeMediaElement {
        fn load(&mut self, track_id: &str) -> Result<()> {
            let mut state = self.shared.lock().unwrap();
            if state.reject_load {
                return Err(PlayerError::LoadFailed(format!("refused {}", track_id)));
            }
            state.loaded.push(track_id.to_string());
            state.playing = false;
            state.position = Duration::ZERO;
            state.duration = None;
            Ok(())
        }

        fn play(&mut self) -> Result<()> {
            let mut state = self.shared.lock().unwrap();
            if state.reject_play {
                return Err(PlayerError::PlaybackRejected("autoplay blocked".to_string()));
            }
            state.playing = true;
            state.play_calls += 1;
            Ok(())
        }

        fn pause(&mut self) {
            let mut state = self.shared.lock().unwrap();
            state.playing = false;
            state.pause_calls += 1;
        }

        fn seek(&mut self, position: Duration) -> Result<()> {
            let mut state = self.shared.lock().unwrap();
            if let Some(duration) = state.duration {
                if position > duration {
                    return Err(PlayerError::InvalidSeekPosition(position));
                }
            }
            state.seeks.push(position);
            state.position = position;
            Ok(())
        }

        fn position(&self) -> Duration {
            self.shared.lock().unwrap().position
        }

        fn duration(&self) -> Option<Duration> {
            self.shared.lock().unwrap().duration
        }

        fn set_volume(&mut self, level: u8) {
            self.shared.lock().unwrap().volume = level.min(100);
        }

        fn volume(&self) -> u8 {
            self.shared.lock().unwrap().volume
        }

        fn take_events(&mut self) -> Option<Receiver<MediaEvent>> {
            self.receiver.take()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_events_yields_the_receiver_exactly_once() {
        let (mut element, _handle) = FakeMediaElement::create();
        assert!(element.take_events().is_some());
        assert!(element.take_events().is_none());
    }

    #[test]
    fn events_reach_the_taken_receiver() {
        let (mut element, handle) = FakeMediaElement::create();
        let receiver = element.take_events().unwrap();
        handle.emit(MediaEvent::Ended);
        assert_eq!(receiver.try_recv().unwrap(), MediaEvent::Ended);
    }

    #[test]
    fn load_resets_position_and_duration() {
        let (mut element, handle) = FakeMediaElement::create();
        handle.set_duration(Some(Duration::from_secs(90)));
        handle.set_position(Duration::from_secs(30));

        element.load("abc").unwrap();

        assert_eq!(element.position(), Duration::ZERO);
        assert_eq!(element.duration(), None);
        assert_eq!(handle.snapshot().loaded, vec!["abc".to_string()]);
    }

    #[test]
    fn seek_past_known_duration_is_rejected() {
        let (mut element, handle) = FakeMediaElement::create();
        handle.set_duration(Some(Duration::from_secs(10)));
        assert!(element.seek(Duration::from_secs(11)).is_err());
        assert!(element.seek(Duration::from_secs(10)).is_ok());
    }
}
