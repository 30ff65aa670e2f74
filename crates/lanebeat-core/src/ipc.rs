use lanebeat_domain_chart::LongRef;
use lanebeat_domain_eval::{JudgeSource, ScoreState, Tier, TierCounts};
use lanebeat_ports::input::InputEvent;
use lanebeat_ports::playback::PlaybackMode;
use lanebeat_ports::storage::{ChartEntry, SettingsDto};
use lanebeat_ports::types::{GroupId, Lane, ScrollSpeed, Seconds};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ChartSource {
    JsonFile(String),
    /// A chart name resolved through the storage backend.
    Stored(String),
    Inline(String),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Command {
    ListCharts,
    LoadChart { source: ChartSource },
    /// Starts from the top, or resumes when paused.
    StartPlay,
    PausePlay,
    /// Rewinds to the top with a fresh session.
    StopPlay,
    SetJudgingOffsetMs { ms: i32 },
    SetScrollSpeed { speed: f32 },
    SetPlaybackMode { mode: PlaybackMode },
    ExportDiagnostics { path: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Idle,
    Ready,
    Running,
    Paused,
    Finished,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayResult {
    pub score: u32,
    pub max_combo: u32,
    pub tier_counts: TierCounts,
    pub early: u32,
    pub late: u32,
    pub accuracy: f64,
    pub full_combo: bool,
    pub all_perfect: bool,
}

impl PlayResult {
    pub fn from_score(score: &ScoreState) -> Self {
        Self {
            score: score.score(),
            max_combo: score.max_combo(),
            tier_counts: score.tier_counts(),
            early: score.early(),
            late: score.late(),
            accuracy: score.accuracy(),
            full_combo: score.is_full_combo(),
            all_perfect: score.is_all_perfect(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Event {
    ChartsUpdated {
        charts: Vec<ChartEntry>,
    },
    SessionStateUpdated {
        state: SessionState,
        settings: SettingsDto,
    },
    ChartLoaded {
        title: Option<String>,
        lane_count: u8,
        total_notes: usize,
        end_time: Seconds,
        scroll_speed: ScrollSpeed,
    },
    JudgeFeedback {
        lane: Lane,
        tier: Tier,
        time_lag: Option<Seconds>,
        source: JudgeSource,
        long: Option<LongRef>,
    },
    LongNoteRetired {
        group: GroupId,
    },
    ScoreSummaryUpdated {
        score: u32,
        combo: u32,
        max_combo: u32,
        tier_counts: TierCounts,
    },
    SongFinished {
        result: PlayResult,
    },
    RecentInputEvents {
        events: Vec<InputEvent>,
    },
}
