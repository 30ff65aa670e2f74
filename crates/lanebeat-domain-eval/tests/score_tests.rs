use lanebeat_domain_eval::{ScoreState, Tier, TimingWindows, THEORETICAL_MAX};
use pretty_assertions::assert_eq;

#[test]
fn windows_are_inclusive_on_the_better_tier() {
    let windows = TimingWindows::default();

    assert_eq!(windows.classify(0.0), Some(Tier::Perfect));
    assert_eq!(windows.classify(0.08), Some(Tier::Perfect));
    assert_eq!(windows.classify(0.0800001), Some(Tier::Great));
    assert_eq!(windows.classify(-0.08), Some(Tier::Perfect));
    assert_eq!(windows.classify(0.12), Some(Tier::Great));
    assert_eq!(windows.classify(0.25), Some(Tier::Good));
    assert_eq!(windows.classify(-0.4), Some(Tier::Bad));
    assert_eq!(windows.classify(0.4000001), None);
}

#[test]
fn score_uses_floor_of_the_ratio() {
    let mut score = ScoreState::new(3);
    assert_eq!(score.max_possible_score(), 3.0);

    score.apply(Tier::Perfect);
    // 1/3 of the theoretical max, floored.
    assert_eq!(score.score(), 333_333);

    score.apply(Tier::Good);
    assert_eq!(score.score(), 500_000);

    score.apply(Tier::Perfect);
    assert_eq!(score.score(), 833_333);
}

#[test]
fn empty_chart_scores_zero() {
    let mut score = ScoreState::new(0);
    assert_eq!(score.recompute_score(), 0);
    assert_eq!(score.accuracy(), 0.0);
}

#[test]
fn combo_rules_per_tier() {
    let mut score = ScoreState::new(6);
    for tier in [Tier::Perfect, Tier::Great, Tier::Good] {
        score.apply(tier);
    }
    assert_eq!(score.combo(), 3);

    score.apply(Tier::Bad);
    assert_eq!(score.combo(), 0);
    score.apply(Tier::Perfect);
    score.apply(Tier::Miss);
    assert_eq!(score.combo(), 0);
    assert_eq!(score.max_combo(), 3);

    let counts = score.tier_counts();
    assert_eq!(counts.total(), 6);
    assert_eq!(counts.get(Tier::Miss), 1);
    assert!(!score.is_full_combo());
    assert_eq!(score.apparent_score(), 1.0 + 0.75 + 0.5 + 0.25 + 1.0);
}

#[test]
fn score_never_decreases() {
    let sequence = [
        Tier::Miss,
        Tier::Bad,
        Tier::Perfect,
        Tier::Miss,
        Tier::Great,
        Tier::Good,
        Tier::Miss,
        Tier::Perfect,
    ];
    let mut score = ScoreState::new(sequence.len());
    let mut last = 0;
    for tier in sequence {
        let now = score.apply(tier);
        assert!(now >= last, "{tier:?} dropped the score from {last} to {now}");
        last = now;
    }
    assert!(last <= THEORETICAL_MAX);
}

#[test]
fn accuracy_counts_judged_notes_only() {
    let mut score = ScoreState::new(10);
    score.apply(Tier::Perfect);
    score.apply(Tier::Good);

    assert_eq!(score.accuracy(), 0.75);
    assert_eq!(score.judged(), 2);
}
