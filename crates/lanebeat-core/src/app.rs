use crate::clock::PlaybackClock;
use crate::diagnostics::{DiagnosticsBundle, SessionSnapshot};
use crate::input::{drain, input_queue, InputSink, INPUT_QUEUE_CAPACITY};
use crate::ipc::{ChartSource, Command, Event, PlayResult, SessionState};
use crate::transport::Transport;
use lanebeat_domain_chart::{
    build_timeline, import_chart_path, import_chart_str, Chart, ChartError, Timeline,
    TimelineParams,
};
use lanebeat_domain_eval::{JudgeConfig, JudgeEvent, JudgementEngine, LiveNote, LongNoteGroup};
use lanebeat_ports::input::InputEvent;
use lanebeat_ports::playback::PlaybackMode;
use lanebeat_ports::storage::{SettingsDto, StorageError, StoragePort};
use lanebeat_ports::types::{ScrollSpeed, Seconds};
use log::{debug, info, warn};
use rtrb::Consumer;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;

const RECENT_INPUT_LIMIT: usize = 32;
/// Playback seconds between `RecentInputEvents` snapshots.
const RECENT_INPUT_INTERVAL: Seconds = 0.05;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("chart error: {0}")]
    Chart(#[from] ChartError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("no chart loaded")]
    NoChart,
    #[error("no storage backend configured")]
    NoStorage,
}

/// Frame-stepped host for one play session.
///
/// Collaborators push input through [`InputSink`], publish the playback
/// position through [`PlaybackClock`], send [`Command`]s, and call `tick`
/// once per rendered frame. Everything they need to show comes back through
/// `drain_events` or the read-only accessors.
pub struct AppCore {
    storage: Option<Box<dyn StoragePort>>,
    settings: SettingsDto,
    session_state: SessionState,
    transport: Transport,
    judge: JudgementEngine,
    chart: Option<Chart>,
    timeline: Option<Timeline>,
    input_tx: InputSink,
    input_rx: Consumer<InputEvent>,
    events: VecDeque<Event>,
    recent_inputs: VecDeque<InputEvent>,
    last_input_emit: Option<Seconds>,
}

impl AppCore {
    pub fn new(storage: Option<Box<dyn StoragePort>>) -> Result<Self, AppError> {
        let settings = match storage.as_ref() {
            Some(storage) => storage.load_settings().unwrap_or_else(|e| {
                warn!("falling back to default settings: {e}");
                SettingsDto::default()
            }),
            None => SettingsDto::default(),
        };

        let transport = Transport::new(Arc::new(PlaybackClock::new()));
        let judge = JudgementEngine::new(judge_config(&settings), transport.frame_clock());
        let (input_tx, input_rx) = input_queue(INPUT_QUEUE_CAPACITY);

        Ok(Self {
            storage,
            settings,
            session_state: SessionState::Idle,
            transport,
            judge,
            chart: None,
            timeline: None,
            input_tx,
            input_rx,
            events: VecDeque::new(),
            recent_inputs: VecDeque::with_capacity(RECENT_INPUT_LIMIT),
            last_input_emit: None,
        })
    }

    pub fn handle_command(&mut self, cmd: Command) -> Result<(), AppError> {
        match cmd {
            Command::ListCharts => {
                let charts = match self.storage.as_ref() {
                    Some(storage) => storage.list_charts()?,
                    None => Vec::new(),
                };
                self.events.push_back(Event::ChartsUpdated { charts });
            }
            Command::LoadChart { source } => {
                self.load_chart(source)?;
            }
            Command::StartPlay => match self.session_state {
                SessionState::Idle => return Err(AppError::NoChart),
                SessionState::Running => {}
                SessionState::Ready | SessionState::Paused => {
                    self.set_running();
                }
                SessionState::Finished => {
                    self.reset_session()?;
                    self.set_running();
                }
            },
            Command::PausePlay => {
                if self.session_state == SessionState::Running {
                    self.transport.pause();
                    self.session_state = SessionState::Paused;
                    self.emit_session_state();
                }
            }
            Command::StopPlay => {
                if self.chart.is_some() {
                    self.reset_session()?;
                    self.session_state = SessionState::Ready;
                    self.emit_session_state();
                }
            }
            Command::SetJudgingOffsetMs { ms } => {
                self.settings.judging_offset_ms = ms;
                // Arrival times are baked in at build time; a running
                // session picks the new offset up on its next stop.
                if self.session_state == SessionState::Ready {
                    self.reset_session()?;
                }
                self.emit_session_state();
                self.save_settings();
            }
            Command::SetScrollSpeed { speed } => {
                let speed = ScrollSpeed::new(speed);
                self.settings.scroll_speed = speed;
                if let Some(timeline) = self.timeline.as_mut() {
                    timeline.scroll_speed = speed;
                }
                self.emit_session_state();
                self.save_settings();
            }
            Command::SetPlaybackMode { mode } => {
                self.settings.playback_mode = mode;
                self.judge.set_autoplay(mode == PlaybackMode::Autoplay);
                self.emit_session_state();
                self.save_settings();
            }
            Command::ExportDiagnostics { path } => {
                let written = self.diagnostics().write_to(Path::new(&path))?;
                info!("diagnostics written to {}", written.display());
            }
        }
        Ok(())
    }

    /// Runs one frame: latch time, feed queued input, then the time-driven checks.
    pub fn tick(&mut self) {
        let latched = self.transport.begin_frame();
        if latched.is_none() || self.session_state != SessionState::Running {
            self.discard_inputs();
            return;
        }
        self.process_inputs();
        self.advance_judge();
        self.check_finished();
        self.emit_recent_inputs();
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain(..).collect()
    }

    pub fn input_sink(&self) -> InputSink {
        self.input_tx.clone()
    }

    pub fn playback_clock(&self) -> Arc<PlaybackClock> {
        self.transport.playback_clock()
    }

    pub fn session_state(&self) -> SessionState {
        self.session_state
    }

    pub fn settings(&self) -> &SettingsDto {
        &self.settings
    }

    /// Playback time as of the last latched frame.
    pub fn now(&self) -> Seconds {
        self.transport.now()
    }

    pub fn judge(&self) -> &JudgementEngine {
        &self.judge
    }

    pub fn timeline(&self) -> Option<&Timeline> {
        self.timeline.as_ref()
    }

    /// Notes still on the field, latest arrival first.
    pub fn live_notes(&self) -> impl Iterator<Item = &LiveNote> + '_ {
        self.judge.registry().iter()
    }

    pub fn long_groups(&self) -> impl Iterator<Item = &LongNoteGroup> + '_ {
        self.judge.long_notes().groups()
    }

    pub fn result(&self) -> Option<PlayResult> {
        self.chart
            .as_ref()
            .map(|_| PlayResult::from_score(self.judge.score()))
    }

    pub fn diagnostics(&self) -> DiagnosticsBundle {
        DiagnosticsBundle::new(
            self.settings.clone(),
            self.recent_inputs.iter().copied().collect(),
            self.result(),
            self.snapshot(),
        )
    }

    /// `None` until a chart is loaded.
    pub fn snapshot(&self) -> Option<SessionSnapshot> {
        let timeline = self.timeline.as_ref()?;
        Some(SessionSnapshot {
            state: self.session_state,
            now: self.transport.now(),
            title: self.chart.as_ref().and_then(|c| c.title.clone()),
            lane_count: timeline.lane_count,
            total_notes: timeline.total_notes(),
            live_notes: self.live_notes().copied().collect(),
            long_groups: self.long_groups().cloned().collect(),
        })
    }

    fn load_chart(&mut self, source: ChartSource) -> Result<(), AppError> {
        let (chart, remembered) = match source {
            ChartSource::JsonFile(path) => (import_chart_path(Path::new(&path))?, Some(path)),
            ChartSource::Inline(text) => (import_chart_str(&text)?, None),
            ChartSource::Stored(name) => {
                let storage = self.storage.as_ref().ok_or(AppError::NoStorage)?;
                let text = storage.read_chart(&name)?;
                (import_chart_str(&text)?, Some(name))
            }
        };
        // Fails before touching the current session if the chart is bad.
        build_timeline(&chart, self.timeline_params())?;

        self.chart = Some(chart);
        self.reset_session()?;
        self.session_state = SessionState::Ready;

        if let Some(timeline) = self.timeline.as_ref() {
            let title = self.chart.as_ref().and_then(|c| c.title.clone());
            info!(
                "chart loaded: {} ({} notes)",
                title.as_deref().unwrap_or("untitled"),
                timeline.total_notes()
            );
            self.events.push_back(Event::ChartLoaded {
                title,
                lane_count: timeline.lane_count,
                total_notes: timeline.total_notes(),
                end_time: timeline.end_time(),
                scroll_speed: timeline.scroll_speed,
            });
        }
        self.emit_session_state();

        if remembered.is_some() {
            self.settings.last_chart = remembered;
            self.save_settings();
        }
        Ok(())
    }

    /// Rewinds to the top and rebuilds the timeline with current settings.
    fn reset_session(&mut self) -> Result<(), AppError> {
        let chart = self.chart.as_ref().ok_or(AppError::NoChart)?;
        let timeline = build_timeline(chart, self.timeline_params())?;

        self.transport.stop();
        self.discard_inputs();
        self.last_input_emit = None;
        self.judge.set_autoplay(self.settings.playback_mode == PlaybackMode::Autoplay);
        let judge_events = self.judge.load_timeline(&timeline);
        self.timeline = Some(timeline);
        for event in judge_events {
            self.handle_judge_event(event);
        }
        Ok(())
    }

    fn timeline_params(&self) -> TimelineParams {
        TimelineParams {
            judging_offset: self.settings.judging_offset(),
            scroll_speed: self.settings.scroll_speed,
        }
    }

    fn set_running(&mut self) {
        self.transport.play();
        self.session_state = SessionState::Running;
        self.emit_session_state();
    }

    fn process_inputs(&mut self) {
        for event in drain(&mut self.input_rx) {
            self.record_recent_input(event);
            let judge_events = self.judge.on_input(event);
            for event in judge_events {
                self.handle_judge_event(event);
            }
        }
    }

    fn discard_inputs(&mut self) {
        let dropped = drain(&mut self.input_rx).len();
        if dropped > 0 {
            debug!("discarded {dropped} input events outside play");
        }
    }

    fn advance_judge(&mut self) {
        let judge_events = self.judge.update();
        for event in judge_events {
            self.handle_judge_event(event);
        }
    }

    fn check_finished(&mut self) {
        if !self.judge.is_finished() {
            return;
        }
        self.transport.pause();
        self.session_state = SessionState::Finished;
        let result = PlayResult::from_score(self.judge.score());
        info!(
            "song finished: score {} max combo {}",
            result.score, result.max_combo
        );
        self.events.push_back(Event::SongFinished { result });
        self.emit_session_state();
    }

    fn handle_judge_event(&mut self, event: JudgeEvent) {
        match event {
            JudgeEvent::Judged {
                lane,
                tier,
                time_lag,
                source,
                long,
                ..
            } => {
                self.events.push_back(Event::JudgeFeedback {
                    lane,
                    tier,
                    time_lag,
                    source,
                    long,
                });
            }
            JudgeEvent::LongNoteRetired { group } => {
                self.events.push_back(Event::LongNoteRetired { group });
            }
            JudgeEvent::Stats {
                score,
                combo,
                max_combo,
                tier_counts,
            } => {
                self.events.push_back(Event::ScoreSummaryUpdated {
                    score,
                    combo,
                    max_combo,
                    tier_counts,
                });
            }
        }
    }

    fn record_recent_input(&mut self, event: InputEvent) {
        if self.recent_inputs.len() >= RECENT_INPUT_LIMIT {
            self.recent_inputs.pop_front();
        }
        self.recent_inputs.push_back(event);
    }

    fn emit_recent_inputs(&mut self) {
        let now = self.transport.now();
        if self
            .last_input_emit
            .is_some_and(|last| now - last < RECENT_INPUT_INTERVAL)
        {
            return;
        }
        if !self.recent_inputs.is_empty() {
            self.events.push_back(Event::RecentInputEvents {
                events: self.recent_inputs.iter().copied().collect(),
            });
        }
        self.last_input_emit = Some(now);
    }

    fn emit_session_state(&mut self) {
        self.events.push_back(Event::SessionStateUpdated {
            state: self.session_state,
            settings: self.settings.clone(),
        });
    }

    fn save_settings(&self) {
        if let Some(storage) = self.storage.as_ref() {
            if let Err(e) = storage.save_settings(&self.settings) {
                warn!("failed to save settings: {e}");
            }
        }
    }
}

fn judge_config(settings: &SettingsDto) -> JudgeConfig {
    JudgeConfig {
        autoplay: settings.playback_mode == PlaybackMode::Autoplay,
        ..JudgeConfig::default()
    }
}
