use crate::playback::PlaybackMode;
use crate::types::*;
use serde::{Deserialize, Serialize};

fn default_scroll_speed() -> ScrollSpeed {
    ScrollSpeed::default()
}

fn default_playback_mode() -> PlaybackMode {
    PlaybackMode::Manual
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(String),
    #[error("serialization error: {0}")]
    Serde(String),
    #[error("chart not found: {0}")]
    ChartNotFound(String),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsDto {
    /// Added to every arrival time to compensate for input/audio latency.
    pub judging_offset_ms: i32,
    #[serde(default = "default_scroll_speed")]
    pub scroll_speed: ScrollSpeed,
    #[serde(default = "default_playback_mode")]
    pub playback_mode: PlaybackMode,
    pub last_chart: Option<String>,
}

impl SettingsDto {
    pub fn judging_offset(&self) -> Seconds {
        self.judging_offset_ms as Seconds / 1000.0
    }
}

impl Default for SettingsDto {
    fn default() -> Self {
        Self {
            judging_offset_ms: 0,
            scroll_speed: ScrollSpeed::default(),
            playback_mode: PlaybackMode::Manual,
            last_chart: None,
        }
    }
}

/// One chart file known to the storage backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartEntry {
    pub name: String,
}

pub trait StoragePort: Send + Sync {
    fn load_settings(&self) -> Result<SettingsDto, StorageError>;
    fn save_settings(&self, s: &SettingsDto) -> Result<(), StorageError>;

    fn list_charts(&self) -> Result<Vec<ChartEntry>, StorageError>;
    /// Raw chart text; parsing belongs to the chart domain.
    fn read_chart(&self, name: &str) -> Result<String, StorageError>;
}
