use lanebeat_domain_chart::{LongRef, NoteKind, TimedNote};
use lanebeat_ports::types::{GroupId, Lane, Seconds};
use log::trace;
use serde::Serialize;

/// Distances closer than this count as simultaneous.
const TIE_EPSILON: Seconds = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LiveNote {
    pub arrival_time: Seconds,
    pub lane: Lane,
    pub kind: NoteKind,
    /// Registry slot; stable for the note's whole life.
    pub list_index: usize,
    pub long: Option<LongRef>,
}

impl LiveNote {
    pub fn group(&self) -> Option<GroupId> {
        self.long.map(|long| long.group)
    }
}

/// Pre-filter for nearest-note lookups, relative to the judgement line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchWindow {
    pub behind: Seconds,
    pub ahead: Seconds,
}

impl Default for SearchWindow {
    fn default() -> Self {
        Self {
            behind: 1.5,
            ahead: 5.0,
        }
    }
}

/// Unjudged notes, ordered by descending arrival time.
///
/// Slots never move: removing a note vacates its slot, so every other note
/// keeps its `list_index`. Vacated slots at the tail are trimmed, which keeps
/// the soonest live note at (or near) the highest index.
#[derive(Debug, Default)]
pub struct NoteRegistry {
    slots: Vec<Option<LiveNote>>,
    live: usize,
}

impl NoteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, notes: &[TimedNote]) {
        debug_assert!(
            notes
                .windows(2)
                .all(|pair| pair[0].arrival_time >= pair[1].arrival_time),
            "registry expects notes in descending arrival order"
        );

        self.slots = notes
            .iter()
            .enumerate()
            .map(|(list_index, note)| {
                Some(LiveNote {
                    arrival_time: note.arrival_time,
                    lane: note.lane,
                    kind: note.kind,
                    list_index,
                    long: note.long,
                })
            })
            .collect();
        self.live = self.slots.len();
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn get(&self, index: usize) -> Option<&LiveNote> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// Live notes from the furthest in the future to the soonest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &LiveNote> + '_ {
        self.slots.iter().filter_map(Option::as_ref)
    }

    pub fn soonest(&self) -> Option<&LiveNote> {
        self.iter().next_back()
    }

    /// Nearest live note in `lane` to `now` inside `window`.
    ///
    /// Ties go to the earlier arrival, then to the lower slot index.
    pub fn find_nearest(&self, lane: Lane, now: Seconds, window: SearchWindow) -> Option<&LiveNote> {
        let mut best: Option<(&LiveNote, Seconds)> = None;

        for note in self.iter().rev() {
            let delta = note.arrival_time - now;
            if delta > window.ahead {
                break;
            }
            if delta < -window.behind || note.lane != lane {
                continue;
            }

            let distance = delta.abs();
            let better = match best {
                None => true,
                Some((current, current_distance)) => {
                    if (distance - current_distance).abs() <= TIE_EPSILON {
                        note.arrival_time < current.arrival_time
                            || (note.arrival_time == current.arrival_time
                                && note.list_index < current.list_index)
                    } else {
                        distance < current_distance
                    }
                }
            };
            if better {
                best = Some((note, distance));
            }
        }

        best.map(|(note, _)| note)
    }

    /// Slot indices of live notes arriving at or before `deadline`, soonest first.
    pub fn due(&self, deadline: Seconds) -> Vec<usize> {
        self.iter()
            .rev()
            .take_while(|note| note.arrival_time <= deadline)
            .map(|note| note.list_index)
            .collect()
    }

    /// Removes the note in slot `index`.
    ///
    /// A vacated or out-of-range slot means another event already judged the
    /// note; that race is expected and yields `None`.
    pub fn remove(&mut self, index: usize) -> Option<LiveNote> {
        let Some(slot) = self.slots.get_mut(index) else {
            trace!("registry slot {index} out of range; already judged");
            return None;
        };
        let Some(note) = slot.take() else {
            trace!("registry slot {index} already vacated");
            return None;
        };

        self.live -= 1;
        while matches!(self.slots.last(), Some(None)) {
            self.slots.pop();
        }
        Some(note)
    }
}
