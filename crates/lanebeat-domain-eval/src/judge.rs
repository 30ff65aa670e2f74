use crate::long_note::{LongNoteTracker, SegmentJudgement};
use crate::registry::{NoteRegistry, SearchWindow};
use crate::score::{ScoreState, TierCounts};
use crate::tier::{Tier, TimingWindows};
use lanebeat_domain_chart::{LongRef, Timeline};
use lanebeat_ports::input::InputEvent;
use lanebeat_ports::playback::TimeSource;
use lanebeat_ports::types::{GroupId, Lane, Seconds};
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Clone, Copy, Debug)]
pub struct JudgeConfig {
    pub windows: TimingWindows,
    pub search: SearchWindow,
    /// How long after its arrival an untouched note is still tappable.
    pub miss_grace: Seconds,
    pub autoplay: bool,
    pub autoplay_epsilon: Seconds,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        let windows = TimingWindows::default();
        Self {
            windows,
            search: SearchWindow::default(),
            miss_grace: windows.widest(),
            autoplay: false,
            autoplay_epsilon: 0.001,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum JudgeSource {
    Input,
    Timeout,
    Hold,
    Autoplay,
}

#[derive(Clone, Debug, PartialEq)]
pub enum JudgeEvent {
    Judged {
        lane: Lane,
        arrival_time: Seconds,
        tier: Tier,
        /// `timestamp - arrival` for taps; `None` for timeouts and holds.
        time_lag: Option<Seconds>,
        source: JudgeSource,
        long: Option<LongRef>,
    },
    LongNoteRetired {
        group: GroupId,
    },
    Stats {
        score: u32,
        combo: u32,
        max_combo: u32,
        tier_counts: TierCounts,
    },
}

/// Owns every live note of one play session and everything they score into.
pub struct JudgementEngine {
    cfg: JudgeConfig,
    clock: Arc<dyn TimeSource>,
    registry: NoteRegistry,
    long_notes: LongNoteTracker,
    score: ScoreState,
    lane_pressed: Vec<bool>,
    total_notes: usize,
}

impl JudgementEngine {
    pub fn new(cfg: JudgeConfig, clock: Arc<dyn TimeSource>) -> Self {
        Self {
            cfg,
            clock,
            registry: NoteRegistry::new(),
            long_notes: LongNoteTracker::new(),
            score: ScoreState::default(),
            lane_pressed: Vec::new(),
            total_notes: 0,
        }
    }

    pub fn load_timeline(&mut self, timeline: &Timeline) -> Vec<JudgeEvent> {
        self.registry.load(&timeline.normal);
        self.long_notes.load(&timeline.long_groups);
        self.total_notes = timeline.total_notes();
        self.score = ScoreState::new(self.total_notes);
        self.lane_pressed = vec![false; timeline.lane_count as usize];
        info!(
            "loaded timeline: {} notes ({} long groups) over {} lanes",
            self.total_notes,
            timeline.long_groups.len(),
            timeline.lane_count
        );
        vec![self.stats_event()]
    }

    pub fn set_autoplay(&mut self, autoplay: bool) {
        self.cfg.autoplay = autoplay;
    }

    pub fn config(&self) -> &JudgeConfig {
        &self.cfg
    }

    pub fn now(&self) -> Seconds {
        self.clock.now()
    }

    pub fn registry(&self) -> &NoteRegistry {
        &self.registry
    }

    pub fn long_notes(&self) -> &LongNoteTracker {
        &self.long_notes
    }

    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    pub fn total_notes(&self) -> usize {
        self.total_notes
    }

    pub fn is_lane_pressed(&self, lane: Lane) -> bool {
        lane_down(&self.lane_pressed, lane)
    }

    /// Every note has reached a terminal tier.
    pub fn is_finished(&self) -> bool {
        self.registry.is_empty() && self.long_notes.is_empty()
    }

    pub fn on_input(&mut self, e: InputEvent) -> Vec<JudgeEvent> {
        let mut events = Vec::new();
        if self.cfg.autoplay {
            trace!("autoplay active; ignoring input on lane {}", e.lane);
            return events;
        }
        let Some(was_down) = self.lane_pressed.get(e.lane as usize).copied() else {
            debug!("input on unknown lane {}", e.lane);
            return events;
        };

        if was_down != e.pressed {
            self.lane_pressed[e.lane as usize] = e.pressed;
            let pressed = &self.lane_pressed;
            let lane = e.lane;
            let judged = self.long_notes.on_press_change(
                lane,
                e.timestamp,
                |l| if l == lane { was_down } else { lane_down(pressed, l) },
                |l| lane_down(pressed, l),
            );
            self.apply_segments(judged, JudgeSource::Hold, &mut events);
        }

        if e.pressed {
            self.judge_tap(e, &mut events);
        }
        events
    }

    /// Time-driven pass; the host calls this once per frame after feeding input.
    pub fn update(&mut self) -> Vec<JudgeEvent> {
        let now = self.clock.now();
        let mut events = Vec::new();

        if self.cfg.autoplay {
            for index in self.registry.due(now + self.cfg.autoplay_epsilon) {
                let lag = self.registry.get(index).map(|n| now - n.arrival_time);
                self.judge_note(index, Tier::Perfect, lag, JudgeSource::Autoplay, &mut events);
            }
        }

        let grace = self.cfg.miss_grace;
        let expired: Vec<usize> = self
            .registry
            .due(now - grace)
            .into_iter()
            .filter(|&index| {
                self.registry
                    .get(index)
                    .is_some_and(|n| n.arrival_time + grace < now)
            })
            .collect();
        for index in expired {
            self.judge_note(index, Tier::Miss, None, JudgeSource::Timeout, &mut events);
        }

        let autoplay = self.cfg.autoplay;
        let pressed = &self.lane_pressed;
        let judged = self
            .long_notes
            .advance_all(now, |l| autoplay || lane_down(pressed, l));
        let source = if autoplay {
            JudgeSource::Autoplay
        } else {
            JudgeSource::Hold
        };
        self.apply_segments(judged, source, &mut events);

        events
    }

    fn judge_tap(&mut self, e: InputEvent, events: &mut Vec<JudgeEvent>) {
        let Some(note) = self
            .registry
            .find_nearest(e.lane, e.timestamp, self.cfg.search)
            .copied()
        else {
            return;
        };

        let signed_lag = e.timestamp - note.arrival_time;
        let Some(tier) = self.cfg.windows.classify(signed_lag) else {
            trace!(
                "tap on lane {} is {:.3}s off the nearest note; not scored",
                e.lane,
                signed_lag
            );
            return;
        };
        self.judge_note(note.list_index, tier, Some(signed_lag), JudgeSource::Input, events);
    }

    /// Retires one registry note. A note another path already removed is a no-op.
    fn judge_note(
        &mut self,
        index: usize,
        tier: Tier,
        time_lag: Option<Seconds>,
        source: JudgeSource,
        events: &mut Vec<JudgeEvent>,
    ) {
        let Some(note) = self.registry.remove(index) else {
            return;
        };

        self.score.apply(tier);
        if let Some(lag) = time_lag {
            self.score.record_timing(tier, lag);
        }
        trace!("lane {} {:?} via {:?}", note.lane, tier, source);
        events.push(JudgeEvent::Judged {
            lane: note.lane,
            arrival_time: note.arrival_time,
            tier,
            time_lag,
            source,
            long: note.long,
        });

        if let Some(group) = note.group() {
            let held = self.cfg.autoplay || lane_down(&self.lane_pressed, note.lane);
            self.long_notes.resolve_start(group, held);
        }
        events.push(self.stats_event());
    }

    fn apply_segments(
        &mut self,
        judged: Vec<SegmentJudgement>,
        source: JudgeSource,
        events: &mut Vec<JudgeEvent>,
    ) {
        if judged.is_empty() {
            return;
        }
        for segment in judged {
            self.score.apply(segment.tier);
            events.push(JudgeEvent::Judged {
                lane: segment.segment.lane,
                arrival_time: segment.segment.arrival_time,
                tier: segment.tier,
                time_lag: None,
                source,
                long: Some(LongRef {
                    group: segment.group,
                    status: segment.segment.status,
                }),
            });
            if segment.retired {
                events.push(JudgeEvent::LongNoteRetired {
                    group: segment.group,
                });
            }
        }
        events.push(self.stats_event());
    }

    fn stats_event(&self) -> JudgeEvent {
        JudgeEvent::Stats {
            score: self.score.score(),
            combo: self.score.combo(),
            max_combo: self.score.max_combo(),
            tier_counts: self.score.tier_counts(),
        }
    }
}

fn lane_down(pressed: &[bool], lane: Lane) -> bool {
    pressed.get(lane as usize).copied().unwrap_or(false)
}
