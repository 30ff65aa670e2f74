use crate::types::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackMode {
    Manual,
    Autoplay,
}

/// Read-only view of the current playback position.
///
/// Implementations must be monotonic while playing. Judgement derives every
/// distance and lag from this value, never from a wall clock, so it stays
/// correct across pause/resume and uneven frame pacing.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> Seconds;
}

impl<T: TimeSource + ?Sized> TimeSource for Shared<T> {
    fn now(&self) -> Seconds {
        (**self).now()
    }
}
