use crate::ipc::{PlayResult, SessionState};
use lanebeat_domain_eval::{LiveNote, LongNoteGroup};
use lanebeat_ports::input::InputEvent;
use lanebeat_ports::storage::{SettingsDto, StorageError};
use lanebeat_ports::types::Seconds;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DIAGNOSTICS_FILE: &str = "lanebeat-diagnostics.json";

/// What the judge was looking at when the bundle was taken.
#[derive(Clone, Debug, Serialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    /// Latched frame time.
    pub now: Seconds,
    pub title: Option<String>,
    pub lane_count: u8,
    pub total_notes: usize,
    pub live_notes: Vec<LiveNote>,
    pub long_groups: Vec<LongNoteGroup>,
}

#[derive(Clone, Debug, Serialize)]
pub struct DiagnosticsBundle {
    pub version: &'static str,
    pub os: &'static str,
    pub arch: &'static str,
    pub settings: SettingsDto,
    pub recent_inputs: Vec<InputEvent>,
    pub summary: Option<PlayResult>,
    pub session: Option<SessionSnapshot>,
}

impl DiagnosticsBundle {
    pub fn new(
        settings: SettingsDto,
        recent_inputs: Vec<InputEvent>,
        summary: Option<PlayResult>,
        session: Option<SessionSnapshot>,
    ) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
            settings,
            recent_inputs,
            summary,
            session,
        }
    }

    /// Writes the bundle as one pretty JSON file inside `dir` and returns its path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, StorageError> {
        fs::create_dir_all(dir).map_err(|e| StorageError::Io(e.to_string()))?;
        let path = dir.join(DIAGNOSTICS_FILE);
        let data = serde_json::to_vec_pretty(self).map_err(|e| StorageError::Serde(e.to_string()))?;
        fs::write(&path, data).map_err(|e| StorageError::Io(e.to_string()))?;
        Ok(path)
    }
}
