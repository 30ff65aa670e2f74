use crate::tier::Tier;
use lanebeat_domain_chart::{LongGroupSpec, NoteKind, TimedSegment};
use lanebeat_ports::types::{GroupId, Lane, Seconds};
use log::debug;
use serde::Serialize;
use std::collections::VecDeque;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum HoldState {
    /// Start not resolved yet.
    Idle,
    Pressed,
    Released,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SegmentJudgement {
    pub group: GroupId,
    pub segment: TimedSegment,
    pub tier: Tier,
    /// Set on the End segment: the group is gone after this judgement.
    pub retired: bool,
}

/// One long note after its Start: the segments still waiting to cross the line.
#[derive(Clone, Debug, Serialize)]
pub struct LongNoteGroup {
    id: GroupId,
    kind: NoteKind,
    active_lane: Lane,
    pending: VecDeque<TimedSegment>,
    hold_state: HoldState,
}

impl LongNoteGroup {
    pub fn from_spec(spec: &LongGroupSpec) -> Self {
        Self {
            id: spec.id,
            kind: spec.kind,
            active_lane: spec.start_lane,
            pending: spec.segments.iter().copied().collect(),
            hold_state: HoldState::Idle,
        }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn kind(&self) -> NoteKind {
        self.kind
    }

    pub fn hold_state(&self) -> HoldState {
        self.hold_state
    }

    pub fn is_pressed(&self) -> bool {
        self.hold_state == HoldState::Pressed
    }

    /// Lane of the most recently resolved point.
    pub fn active_lane(&self) -> Lane {
        self.active_lane
    }

    pub fn next_segment(&self) -> Option<&TimedSegment> {
        self.pending.front()
    }

    pub fn segments(&self) -> impl Iterator<Item = &TimedSegment> + '_ {
        self.pending.iter()
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// A press change on `lane` concerns this group.
    pub fn watches(&self, lane: Lane) -> bool {
        lane == self.active_lane || self.next_segment().is_some_and(|s| s.lane == lane)
    }

    fn held(&self, is_down: &impl Fn(Lane) -> bool) -> bool {
        is_down(self.active_lane) || self.next_segment().is_some_and(|s| is_down(s.lane))
    }

    fn resolve_start(&mut self, held: bool) {
        self.hold_state = if held {
            HoldState::Pressed
        } else {
            HoldState::Released
        };
    }

    /// Judges, in order, every pending segment that has reached the line by `now`.
    fn advance(&mut self, now: Seconds, is_down: &impl Fn(Lane) -> bool) -> Vec<SegmentJudgement> {
        let mut judged = Vec::new();
        if self.hold_state == HoldState::Idle {
            return judged;
        }

        while let Some(next) = self.pending.front().copied() {
            if next.arrival_time > now {
                break;
            }
            let held = self.held(is_down);
            self.pending.pop_front();
            self.active_lane = next.lane;
            judged.push(SegmentJudgement {
                group: self.id,
                segment: next,
                tier: if held { Tier::Perfect } else { Tier::Miss },
                retired: self.pending.is_empty(),
            });
        }

        self.refresh(is_down);
        judged
    }

    fn refresh(&mut self, is_down: &impl Fn(Lane) -> bool) {
        if self.hold_state != HoldState::Idle {
            self.hold_state = if self.held(is_down) {
                HoldState::Pressed
            } else {
                HoldState::Released
            };
        }
    }
}

/// Continuity state for every long note that has not been retired.
#[derive(Debug, Default)]
pub struct LongNoteTracker {
    groups: Vec<LongNoteGroup>,
}

impl LongNoteTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, specs: &[LongGroupSpec]) {
        self.groups = specs.iter().map(LongNoteGroup::from_spec).collect();
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, id: GroupId) -> Option<&LongNoteGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn groups(&self) -> impl Iterator<Item = &LongNoteGroup> + '_ {
        self.groups.iter()
    }

    /// The group's Start was judged (hit, missed or autoplayed).
    pub fn resolve_start(&mut self, id: GroupId, held: bool) {
        match self.groups.iter_mut().find(|g| g.id == id) {
            Some(group) => group.resolve_start(held),
            None => debug!("start resolved for unknown group {id}"),
        }
    }

    /// Per-frame pass over every group.
    pub fn advance_all(&mut self, now: Seconds, is_down: impl Fn(Lane) -> bool) -> Vec<SegmentJudgement> {
        let mut judged = Vec::new();
        for group in &mut self.groups {
            judged.extend(group.advance(now, &is_down));
        }
        self.retire_finished();
        judged
    }

    /// Re-evaluation on a press change of `lane`.
    ///
    /// Segments that crossed before the change are judged with the hold state
    /// that was in effect (`was_down`); the group then follows `is_down`.
    pub fn on_press_change(
        &mut self,
        lane: Lane,
        at: Seconds,
        was_down: impl Fn(Lane) -> bool,
        is_down: impl Fn(Lane) -> bool,
    ) -> Vec<SegmentJudgement> {
        let mut judged = Vec::new();
        for group in self.groups.iter_mut().filter(|g| g.watches(lane)) {
            judged.extend(group.advance(at, &was_down));
            group.refresh(&is_down);
        }
        self.retire_finished();
        judged
    }

    fn retire_finished(&mut self) {
        self.groups.retain(|group| {
            let finished = group.pending.is_empty();
            if finished {
                debug!("retired {}", group.id);
            }
            !finished
        });
    }
}
