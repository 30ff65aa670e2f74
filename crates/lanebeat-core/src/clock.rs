use lanebeat_ports::playback::TimeSource;
use lanebeat_ports::types::Seconds;
use log::trace;
use std::sync::atomic::{AtomicU64, Ordering};

/// Playback position published by the audio collaborator.
///
/// Writes that would move time backwards are dropped; only `reset` rewinds.
pub struct PlaybackClock {
    seconds: AtomicU64,
}

impl PlaybackClock {
    pub fn new() -> Self {
        Self {
            seconds: AtomicU64::new(0f64.to_bits()),
        }
    }

    pub fn set(&self, seconds: Seconds) {
        let mut current = self.seconds.load(Ordering::Relaxed);
        loop {
            if !(seconds > f64::from_bits(current)) {
                if seconds < f64::from_bits(current) {
                    trace!("dropping backwards playback time {seconds}");
                }
                return;
            }
            match self.seconds.compare_exchange_weak(
                current,
                seconds.to_bits(),
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return,
                Err(actual) => current = actual,
            }
        }
    }

    pub fn get(&self) -> Seconds {
        f64::from_bits(self.seconds.load(Ordering::Relaxed))
    }

    pub fn reset(&self) {
        self.seconds.store(0f64.to_bits(), Ordering::Relaxed);
    }
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for PlaybackClock {
    fn now(&self) -> Seconds {
        self.get()
    }
}

/// Playback time sampled once at the start of each frame.
///
/// The engine reads this instead of the live clock so every judgement within
/// one frame sees the same `now`, and a paused transport freezes it.
pub struct FrameClock {
    seconds: AtomicU64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            seconds: AtomicU64::new(0f64.to_bits()),
        }
    }

    pub fn latch(&self, seconds: Seconds) {
        self.seconds.store(seconds.to_bits(), Ordering::Relaxed);
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for FrameClock {
    fn now(&self) -> Seconds {
        f64::from_bits(self.seconds.load(Ordering::Relaxed))
    }
}
