mod common;

use common::timeline;
use lanebeat_domain_chart::{NoteKind, NoteSpec, TimedNote};
use lanebeat_domain_eval::{NoteRegistry, SearchWindow};
use pretty_assertions::assert_eq;

fn note(arrival_time: f64, lane: u8) -> TimedNote {
    TimedNote {
        arrival_time,
        lane,
        kind: NoteKind::Normal,
        long: None,
    }
}

fn registry(notes: &[TimedNote]) -> NoteRegistry {
    let mut registry = NoteRegistry::new();
    registry.load(notes);
    registry
}

#[test]
fn load_keeps_timeline_order_and_indices() {
    let timeline = timeline(vec![
        NoteSpec::normal(0, 8, 4),
        NoteSpec::normal(1, 4, 4),
        NoteSpec::normal(2, 12, 4),
    ]);
    let registry = registry(&timeline.normal);

    let seen: Vec<_> = registry.iter().map(|n| (n.list_index, n.arrival_time)).collect();
    assert_eq!(seen, vec![(0, 1.5), (1, 1.0), (2, 0.5)]);
    assert_eq!(registry.soonest().map(|n| n.lane), Some(1));
    assert_eq!(registry.len(), 3);
}

#[test]
fn find_nearest_respects_lane_and_window() {
    let registry = registry(&[note(8.0, 0), note(2.0, 0), note(1.0, 1)]);
    let window = SearchWindow::default();

    // 8.0 is more than 5 s ahead of 2.5.
    let nearest = registry.find_nearest(0, 2.5, window).map(|n| n.arrival_time);
    assert_eq!(nearest, Some(2.0));

    // Only notes up to 1.5 s behind the line qualify.
    assert_eq!(registry.find_nearest(1, 2.6, window), None);
    assert_eq!(
        registry.find_nearest(1, 2.5, window).map(|n| n.arrival_time),
        Some(1.0)
    );
    assert_eq!(registry.find_nearest(3, 1.0, window), None);
}

#[test]
fn find_nearest_breaks_ties_deterministically() {
    let window = SearchWindow::default();

    // Equal distance either side of now: the earlier note wins.
    let registry_a = registry(&[note(1.2, 0), note(0.8, 0)]);
    assert_eq!(
        registry_a.find_nearest(0, 1.0, window).map(|n| n.arrival_time),
        Some(0.8)
    );

    // Simultaneous notes: the lower registry index wins.
    let registry_b = registry(&[note(1.0, 0), note(1.0, 0), note(0.2, 2)]);
    assert_eq!(
        registry_b.find_nearest(0, 1.0, window).map(|n| n.list_index),
        Some(0)
    );
}

#[test]
fn remove_is_index_stable() {
    let mut registry = registry(&[note(3.0, 0), note(2.0, 1), note(1.0, 2)]);

    let removed = registry.remove(1).expect("slot 1 is live");
    assert_eq!(removed.arrival_time, 2.0);
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.get(0).map(|n| n.list_index), Some(0));
    assert_eq!(registry.get(2).map(|n| n.list_index), Some(2));
    assert!(!registry.contains(1));
}

#[test]
fn removing_twice_or_out_of_range_is_a_no_op() {
    let mut registry = registry(&[note(2.0, 0), note(1.0, 0)]);

    assert!(registry.remove(1).is_some());
    // The tail slot was trimmed, so the index is now out of range.
    assert!(registry.remove(1).is_none());
    assert!(registry.remove(42).is_none());
    assert_eq!(registry.len(), 1);

    assert!(registry.remove(0).is_some());
    assert!(registry.is_empty());
    assert!(registry.remove(0).is_none());
}

#[test]
fn due_lists_soonest_first_and_skips_vacated_slots() {
    let mut registry = registry(&[note(4.0, 0), note(3.0, 0), note(2.0, 0), note(1.0, 0)]);
    registry.remove(2);

    assert_eq!(registry.due(3.0), vec![3, 1]);
    assert_eq!(registry.due(0.5), Vec::<usize>::new());
    assert_eq!(registry.due(10.0), vec![3, 1, 0]);
}
