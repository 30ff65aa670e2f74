use crate::types::*;
use serde::{Deserialize, Serialize};

/// Press or release of one lane, stamped in playback time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputEvent {
    pub lane: Lane,
    pub timestamp: Seconds,
    pub pressed: bool,
}

impl InputEvent {
    pub fn press(lane: Lane, timestamp: Seconds) -> Self {
        Self {
            lane,
            timestamp,
            pressed: true,
        }
    }

    pub fn release(lane: Lane, timestamp: Seconds) -> Self {
        Self {
            lane,
            timestamp,
            pressed: false,
        }
    }
}
