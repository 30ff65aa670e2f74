use crate::model::{Chart, NoteSpec};
use std::path::Path;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ChartError {
    #[error("io error: {0}")]
    Io(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("invalid bpm: {0}")]
    InvalidBpm(f64),
    #[error("chart declares no lanes")]
    NoLanes,
    #[error("note {note}: beatsPerUnit must be positive")]
    ZeroBeatsPerUnit { note: usize },
    #[error("note {note}: negative beat index {beat_index}")]
    NegativeBeat { note: usize, beat_index: i64 },
    #[error("note {note}: lane {lane} outside 0..{lane_count}")]
    LaneOutOfRange { note: usize, lane: u8, lane_count: u8 },
    #[error("note {note}: long note has no segments")]
    MissingSegments { note: usize },
    #[error("note {note}: normal note carries segments")]
    UnexpectedSegments { note: usize },
    #[error("note {note}: segment {segment} has nested segments")]
    NestedSegments { note: usize, segment: usize },
    #[error("note {note}: segment {segment} does not come after the previous point")]
    SegmentOutOfOrder { note: usize, segment: usize },
}

pub fn import_chart_path(path: &Path) -> Result<Chart, ChartError> {
    let data = std::fs::read_to_string(path).map_err(|e| ChartError::Io(e.to_string()))?;
    import_chart_str(&data)
}

pub fn import_chart_str(data: &str) -> Result<Chart, ChartError> {
    let chart: Chart = serde_json::from_str(data).map_err(|e| ChartError::Parse(e.to_string()))?;
    validate_chart(&chart)?;
    Ok(chart)
}

pub fn export_chart_string(chart: &Chart) -> Result<String, ChartError> {
    serde_json::to_string_pretty(chart).map_err(|e| ChartError::Parse(e.to_string()))
}

/// Rejects anything the timeline builder cannot resolve.
pub fn validate_chart(chart: &Chart) -> Result<(), ChartError> {
    if !chart.bpm.is_finite() || chart.bpm <= 0.0 {
        return Err(ChartError::InvalidBpm(chart.bpm));
    }
    if chart.lane_count == 0 {
        return Err(ChartError::NoLanes);
    }

    for (idx, note) in chart.notes.iter().enumerate() {
        validate_point(chart, idx, note)?;

        match (note.kind.is_long(), note.segments.as_deref()) {
            (true, None) | (true, Some([])) => {
                return Err(ChartError::MissingSegments { note: idx });
            }
            (false, Some(segments)) if !segments.is_empty() => {
                return Err(ChartError::UnexpectedSegments { note: idx });
            }
            (false, _) => {}
            (true, Some(segments)) => {
                let mut previous = note.beat_time(chart.bpm);
                for (seg_idx, segment) in segments.iter().enumerate() {
                    validate_point(chart, idx, segment)?;
                    if !segment.segments().is_empty() {
                        return Err(ChartError::NestedSegments {
                            note: idx,
                            segment: seg_idx,
                        });
                    }
                    let at = segment.beat_time(chart.bpm);
                    if at <= previous {
                        return Err(ChartError::SegmentOutOfOrder {
                            note: idx,
                            segment: seg_idx,
                        });
                    }
                    previous = at;
                }
            }
        }
    }

    Ok(())
}

fn validate_point(chart: &Chart, idx: usize, point: &NoteSpec) -> Result<(), ChartError> {
    if point.beats_per_unit == 0 {
        return Err(ChartError::ZeroBeatsPerUnit { note: idx });
    }
    if point.beat_index < 0 {
        return Err(ChartError::NegativeBeat {
            note: idx,
            beat_index: point.beat_index,
        });
    }
    if point.lane >= chart.lane_count {
        return Err(ChartError::LaneOutOfRange {
            note: idx,
            lane: point.lane,
            lane_count: chart.lane_count,
        });
    }
    Ok(())
}
