use crate::clock::{FrameClock, PlaybackClock};
use lanebeat_ports::playback::TimeSource;
use lanebeat_ports::types::Seconds;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportState {
    Stopped,
    Playing,
    Paused,
}

/// Play/pause/stop over the playback clock.
///
/// Time only reaches the judge through `begin_frame`, which latches the
/// playback position while playing and leaves it frozen otherwise.
pub struct Transport {
    state: TransportState,
    playback: Arc<PlaybackClock>,
    frame: Arc<FrameClock>,
}

impl Transport {
    pub fn new(playback: Arc<PlaybackClock>) -> Self {
        Self {
            state: TransportState::Stopped,
            playback,
            frame: Arc::new(FrameClock::new()),
        }
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == TransportState::Playing
    }

    /// Time source handed to the judgement engine.
    pub fn frame_clock(&self) -> Arc<FrameClock> {
        self.frame.clone()
    }

    pub fn playback_clock(&self) -> Arc<PlaybackClock> {
        self.playback.clone()
    }

    pub fn play(&mut self) {
        self.state = TransportState::Playing;
    }

    pub fn pause(&mut self) {
        if self.state == TransportState::Playing {
            self.state = TransportState::Paused;
        }
    }

    pub fn stop(&mut self) {
        self.state = TransportState::Stopped;
        self.playback.reset();
        self.frame.latch(0.0);
    }

    /// Latches this frame's time. Returns `None` unless playing.
    pub fn begin_frame(&mut self) -> Option<Seconds> {
        if self.state != TransportState::Playing {
            return None;
        }
        let now = self.playback.get();
        self.frame.latch(now);
        Some(now)
    }

    /// Time the judge currently sees.
    pub fn now(&self) -> Seconds {
        self.frame.now()
    }
}
