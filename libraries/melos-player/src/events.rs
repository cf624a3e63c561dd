//! Events emitted by media elements

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Asynchronous notifications from a media element.
///
/// These are the only asynchronous input to the engine; everything else
/// is a synchronous method call. `TimeUpdate` is authoritative for
/// position and duration and overwrites any optimistic value a seek set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MediaEvent {
    /// Periodic position report
    TimeUpdate {
        position: Duration,
        duration: Option<Duration>,
    },
    /// The element started fetching and cannot play yet
    BufferingStart,
    /// Enough data arrived to resume
    BufferingEnd,
    /// The current media played to its end
    Ended,
    /// Unrecoverable element failure
    Error { message: String },
}
