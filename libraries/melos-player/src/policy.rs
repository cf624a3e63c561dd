//! Next-track decision logic
//!
//! Pure function of current queue state so every branch is testable
//! with a seeded RNG. The engine applies the returned action.

use crate::types::LoopMode;
use rand::Rng;

/// What the engine should do when advancing past the current track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextAction {
    /// Nothing playable: stop
    Stop,
    /// Replay the current track from the start
    RestartCurrent,
    /// Jump to this queue index
    PlayIndex(usize),
    /// Natural end of the queue: pause and rewind
    EndOfQueue,
}

/// Decide what plays next.
///
/// Priority order: loop-one beats shuffle, shuffle beats linear
/// advance, and loop-all only applies at the natural end of the queue.
pub fn decide_next(
    queue_len: usize,
    queue_index: Option<usize>,
    shuffle: bool,
    loop_mode: LoopMode,
    has_current: bool,
    rng: &mut impl Rng,
) -> NextAction {
    let Some(index) = queue_index else {
        return NextAction::Stop;
    };
    if queue_len == 0 {
        return NextAction::Stop;
    }

    if loop_mode == LoopMode::One && has_current {
        return NextAction::RestartCurrent;
    }

    if shuffle {
        return NextAction::PlayIndex(random_other_index(queue_len, index, rng));
    }

    if index + 1 < queue_len {
        return NextAction::PlayIndex(index + 1);
    }

    if loop_mode == LoopMode::All {
        return NextAction::PlayIndex(0);
    }

    NextAction::EndOfQueue
}

/// Uniform draw over `0..len` excluding `current`, so shuffle never
/// repeats the same index back to back. A single-entry queue yields 0.
fn random_other_index(len: usize, current: usize, rng: &mut impl Rng) -> usize {
    if len <= 1 {
        return 0;
    }
    let mut index = rng.gen_range(0..len - 1);
    if index >= current {
        index += 1;
    }
    index
}
