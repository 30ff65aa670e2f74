use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};

pub type Seconds = f64; // playback time, seconds from song start
pub type Lane = u8; // input column index

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(pub u32);

/// Renderer travel speed; deserialized values go through the same clamp as `new`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "f32")]
pub struct ScrollSpeed(pub f32);

impl ScrollSpeed {
    pub const MIN: f32 = 0.5;
    pub const MAX: f32 = 20.0;

    pub fn new(value: f32) -> Self {
        if value.is_finite() {
            Self(value.clamp(Self::MIN, Self::MAX))
        } else {
            Self::default()
        }
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for ScrollSpeed {
    fn default() -> Self {
        Self(5.0)
    }
}

impl From<f32> for ScrollSpeed {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "long#{}", self.0)
    }
}

pub type Shared<T> = Arc<T>;
