#![allow(dead_code)]

use lanebeat_domain_chart::{build_timeline, Chart, NoteKind, NoteSpec, Timeline, TimelineParams};
use lanebeat_domain_eval::{JudgeConfig, JudgeEvent, JudgementEngine, Tier};
use lanebeat_ports::playback::TimeSource;
use lanebeat_ports::types::Seconds;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Default)]
pub struct ManualClock {
    bits: AtomicU64,
}

impl ManualClock {
    pub fn set(&self, now: Seconds) {
        self.bits.store(now.to_bits(), Ordering::Relaxed);
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> Seconds {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

/// 120 BPM at 4 units per beat: every beat index is 0.125 s.
pub fn chart(notes: Vec<NoteSpec>) -> Chart {
    let mut chart = Chart::new(120.0, 4);
    chart.notes = notes;
    chart
}

pub fn long(lane: u8, beat: i64, points: &[(u8, i64)]) -> NoteSpec {
    NoteSpec::long(
        NoteKind::LongLinear,
        lane,
        beat,
        4,
        points
            .iter()
            .map(|&(lane, beat)| NoteSpec::normal(lane, beat, 4))
            .collect(),
    )
}

pub fn timeline(notes: Vec<NoteSpec>) -> Timeline {
    build_timeline(&chart(notes), TimelineParams::default()).expect("timeline should build")
}

pub fn engine(notes: Vec<NoteSpec>, cfg: JudgeConfig) -> (JudgementEngine, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::default());
    let mut engine = JudgementEngine::new(cfg, clock.clone());
    engine.load_timeline(&timeline(notes));
    (engine, clock)
}

pub fn tiers(events: &[JudgeEvent]) -> Vec<Tier> {
    events
        .iter()
        .filter_map(|event| match event {
            JudgeEvent::Judged { tier, .. } => Some(*tier),
            _ => None,
        })
        .collect()
}
