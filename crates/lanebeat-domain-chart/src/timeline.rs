use crate::json_import::{validate_chart, ChartError};
use crate::model::{Chart, NoteKind, SegmentStatus};
use lanebeat_ports::types::{GroupId, Lane, ScrollSpeed, Seconds};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimelineParams {
    /// Seconds added to every arrival time.
    pub judging_offset: Seconds,
    /// Renderer-only; timing never depends on it.
    pub scroll_speed: ScrollSpeed,
}

impl Default for TimelineParams {
    fn default() -> Self {
        Self {
            judging_offset: 0.0,
            scroll_speed: ScrollSpeed::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LongRef {
    pub group: GroupId,
    pub status: SegmentStatus,
}

/// A tap-judged point: a normal note or the start of a long note.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimedNote {
    pub arrival_time: Seconds,
    pub lane: Lane,
    pub kind: NoteKind,
    pub long: Option<LongRef>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimedSegment {
    pub arrival_time: Seconds,
    pub lane: Lane,
    pub status: SegmentStatus,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LongGroupSpec {
    pub id: GroupId,
    pub kind: NoteKind,
    pub start_time: Seconds,
    pub start_lane: Lane,
    /// Inner segments in order, End last.
    pub segments: Vec<TimedSegment>,
}

#[derive(Clone, Debug)]
pub struct Timeline {
    /// Descending arrival time: the soonest note is last.
    pub normal: Vec<TimedNote>,
    pub long_groups: Vec<LongGroupSpec>,
    pub lane_count: u8,
    pub scroll_speed: ScrollSpeed,
    pub judging_offset: Seconds,
    total_notes: usize,
}

impl Timeline {
    pub fn total_notes(&self) -> usize {
        self.total_notes
    }

    /// Arrival time of the last judgeable point.
    pub fn end_time(&self) -> Seconds {
        let normal = self.normal.first().map(|n| n.arrival_time);
        let long = self
            .long_groups
            .iter()
            .filter_map(|g| g.segments.last())
            .map(|s| s.arrival_time)
            .fold(None, |acc: Option<Seconds>, t| Some(acc.map_or(t, |a| a.max(t))));
        match (normal, long) {
            (Some(a), Some(b)) => a.max(b),
            (Some(a), None) | (None, Some(a)) => a,
            (None, None) => 0.0,
        }
    }

    /// Distance from the judgement line along the travel axis.
    pub fn travel_distance(&self, arrival_time: Seconds, now: Seconds) -> f32 {
        (arrival_time - now) as f32 * self.scroll_speed.get()
    }
}

pub fn build_timeline(chart: &Chart, params: TimelineParams) -> Result<Timeline, ChartError> {
    validate_chart(chart)?;

    let arrival = |beat_time: Seconds| beat_time + params.judging_offset;
    let mut normal = Vec::with_capacity(chart.notes.len());
    let mut long_groups = Vec::new();
    let mut total_notes = 0usize;

    for note in &chart.notes {
        let start_time = arrival(note.beat_time(chart.bpm));
        total_notes += 1;

        if !note.kind.is_long() {
            normal.push(TimedNote {
                arrival_time: start_time,
                lane: note.lane,
                kind: note.kind,
                long: None,
            });
            continue;
        }

        let id = GroupId(long_groups.len() as u32);
        let points = note.segments();
        let last = points.len().saturating_sub(1);
        let segments: Vec<TimedSegment> = points
            .iter()
            .enumerate()
            .map(|(idx, point)| TimedSegment {
                arrival_time: arrival(point.beat_time(chart.bpm)),
                lane: point.lane,
                status: if idx == last {
                    SegmentStatus::End
                } else {
                    SegmentStatus::Inner
                },
            })
            .collect();
        total_notes += segments.len();

        normal.push(TimedNote {
            arrival_time: start_time,
            lane: note.lane,
            kind: note.kind,
            long: Some(LongRef {
                group: id,
                status: SegmentStatus::Start,
            }),
        });
        long_groups.push(LongGroupSpec {
            id,
            kind: note.kind,
            start_time,
            start_lane: note.lane,
            segments,
        });
    }

    // Stable: simultaneous notes keep chart order.
    normal.sort_by(|a, b| b.arrival_time.total_cmp(&a.arrival_time));

    Ok(Timeline {
        normal,
        long_groups,
        lane_count: chart.lane_count,
        scroll_speed: params.scroll_speed,
        judging_offset: params.judging_offset,
        total_notes,
    })
}
