use lanebeat_ports::types::{Lane, Seconds};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

fn default_lane_count() -> u8 {
    5
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "RawNoteKind")]
pub enum NoteKind {
    Normal,
    LongLinear,
    LongCurve,
}

impl NoteKind {
    pub fn is_long(self) -> bool {
        matches!(self, NoteKind::LongLinear | NoteKind::LongCurve)
    }
}

/// Charts in the wild spell the kind either as a name or as the editor's
/// numeric code (1 = normal, 2 = long linear, 3 = long curve).
#[derive(Deserialize)]
#[serde(untagged)]
enum RawNoteKind {
    Code(u8),
    Name(String),
}

impl TryFrom<RawNoteKind> for NoteKind {
    type Error = String;

    fn try_from(raw: RawNoteKind) -> Result<Self, Self::Error> {
        match raw {
            RawNoteKind::Code(1) => Ok(NoteKind::Normal),
            RawNoteKind::Code(2) => Ok(NoteKind::LongLinear),
            RawNoteKind::Code(3) => Ok(NoteKind::LongCurve),
            RawNoteKind::Code(code) => Err(format!("unknown note type code {code}")),
            RawNoteKind::Name(name) => match name.to_ascii_lowercase().as_str() {
                "normal" | "tap" => Ok(NoteKind::Normal),
                "long_linear" | "long" | "hold" => Ok(NoteKind::LongLinear),
                "long_curve" | "curve" | "slide" => Ok(NoteKind::LongCurve),
                _ => Err(format!("unknown note type {name:?}")),
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentStatus {
    Start,
    Inner,
    End,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoteSpec {
    #[serde(rename = "type")]
    pub kind: NoteKind,
    #[serde(alias = "block")]
    pub lane: Lane,
    #[serde(rename = "beatIndex", alias = "num")]
    pub beat_index: i64,
    #[serde(rename = "beatsPerUnit", alias = "LPB")]
    pub beats_per_unit: u32,
    /// Inner and end points of a long note, in order.
    #[serde(default, alias = "notes", skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<NoteSpec>>,
}

impl NoteSpec {
    pub fn normal(lane: Lane, beat_index: i64, beats_per_unit: u32) -> Self {
        Self {
            kind: NoteKind::Normal,
            lane,
            beat_index,
            beats_per_unit,
            segments: None,
        }
    }

    pub fn long(
        kind: NoteKind,
        lane: Lane,
        beat_index: i64,
        beats_per_unit: u32,
        segments: Vec<NoteSpec>,
    ) -> Self {
        Self {
            kind,
            lane,
            beat_index,
            beats_per_unit,
            segments: Some(segments),
        }
    }

    pub fn segments(&self) -> &[NoteSpec] {
        self.segments.as_deref().unwrap_or(&[])
    }

    /// Seconds from song start, before any latency offset.
    pub fn beat_time(&self, bpm: f64) -> Seconds {
        beat_to_seconds(self.beat_index, self.beats_per_unit, bpm)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(alias = "BPM")]
    pub bpm: f64,
    #[serde(default = "default_lane_count", alias = "maxBlock")]
    pub lane_count: u8,
    #[serde(default)]
    pub notes: Vec<NoteSpec>,
}

impl Chart {
    pub fn new(bpm: f64, lane_count: u8) -> Self {
        Self {
            title: None,
            bpm,
            lane_count,
            notes: Vec::new(),
        }
    }

    /// Every judgeable point: taps, long starts and all long segments.
    pub fn judgeable_count(&self) -> usize {
        self.notes
            .iter()
            .map(|note| 1 + note.segments().len())
            .sum()
    }
}

pub fn beat_to_seconds(beat_index: i64, beats_per_unit: u32, bpm: f64) -> Seconds {
    beat_index as f64 * (60.0 / bpm) / beats_per_unit as f64
}
