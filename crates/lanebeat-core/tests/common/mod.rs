#![allow(dead_code)]

use lanebeat_core::{AppCore, ChartSource, Command, Event, SessionState};
use lanebeat_domain_eval::Tier;
use lanebeat_ports::storage::{ChartEntry, SettingsDto, StorageError, StoragePort};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

/// 120 BPM, 4 lanes: lane 0 at 0.5 s, lane 1 at 1.0 s.
pub const TWO_TAPS: &str = r#"{
    "title": "two taps",
    "bpm": 120,
    "lane_count": 4,
    "notes": [
        { "type": "normal", "lane": 0, "beatIndex": 4, "beatsPerUnit": 4 },
        { "type": "normal", "lane": 1, "beatIndex": 8, "beatsPerUnit": 4 }
    ]
}"#;

/// A tap plus a three-point hold on lane 2 (0.5 s, 0.75 s, 1.0 s).
pub const TAP_AND_HOLD: &str = r#"{
    "bpm": 120,
    "lane_count": 4,
    "notes": [
        { "type": "normal", "lane": 0, "beatIndex": 6, "beatsPerUnit": 4 },
        { "type": "long_linear", "lane": 2, "beatIndex": 4, "beatsPerUnit": 4,
          "segments": [
            { "type": "long_linear", "lane": 2, "beatIndex": 6, "beatsPerUnit": 4 },
            { "type": "long_linear", "lane": 2, "beatIndex": 8, "beatsPerUnit": 4 }
          ] }
    ]
}"#;

/// Clones share saved settings, so a test can inspect what the core persisted.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    pub settings: Arc<Mutex<Option<SettingsDto>>>,
    pub charts: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn with_chart(name: &str, body: &str) -> Self {
        let mut charts = BTreeMap::new();
        charts.insert(name.to_string(), body.to_string());
        Self {
            settings: Arc::new(Mutex::new(None)),
            charts,
        }
    }
}

impl StoragePort for MemoryStorage {
    fn load_settings(&self) -> Result<SettingsDto, StorageError> {
        Ok(self.settings.lock().clone().unwrap_or_default())
    }

    fn save_settings(&self, s: &SettingsDto) -> Result<(), StorageError> {
        *self.settings.lock() = Some(s.clone());
        Ok(())
    }

    fn list_charts(&self) -> Result<Vec<ChartEntry>, StorageError> {
        Ok(self
            .charts
            .keys()
            .map(|name| ChartEntry { name: name.clone() })
            .collect())
    }

    fn read_chart(&self, name: &str) -> Result<String, StorageError> {
        self.charts
            .get(name)
            .cloned()
            .ok_or_else(|| StorageError::ChartNotFound(name.to_string()))
    }
}

pub fn loaded(chart: &str) -> AppCore {
    let mut app = AppCore::new(None).expect("core starts");
    app.handle_command(Command::LoadChart {
        source: ChartSource::Inline(chart.to_string()),
    })
    .expect("chart loads");
    assert_eq!(app.session_state(), SessionState::Ready);
    app
}

/// Publishes `t` as the playback position and runs one frame.
pub fn frame(app: &mut AppCore, t: f64) -> Vec<Event> {
    app.playback_clock().set(t);
    app.tick();
    app.drain_events()
}

pub fn frames(app: &mut AppCore, times: impl IntoIterator<Item = f64>) -> Vec<Event> {
    times.into_iter().flat_map(|t| frame(app, t)).collect()
}

pub fn feedback(events: &[Event]) -> Vec<Tier> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::JudgeFeedback { tier, .. } => Some(*tier),
            _ => None,
        })
        .collect()
}

pub fn states(events: &[Event]) -> Vec<SessionState> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::SessionStateUpdated { state, .. } => Some(*state),
            _ => None,
        })
        .collect()
}
