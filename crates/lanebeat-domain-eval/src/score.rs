use crate::tier::Tier;
use lanebeat_ports::types::Seconds;
use serde::{Deserialize, Serialize};

pub const THEORETICAL_MAX: u32 = 1_000_000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCounts {
    pub perfect: u32,
    pub great: u32,
    pub good: u32,
    pub bad: u32,
    pub miss: u32,
}

impl TierCounts {
    pub fn get(&self, tier: Tier) -> u32 {
        match tier {
            Tier::Perfect => self.perfect,
            Tier::Great => self.great,
            Tier::Good => self.good,
            Tier::Bad => self.bad,
            Tier::Miss => self.miss,
        }
    }

    fn slot(&mut self, tier: Tier) -> &mut u32 {
        match tier {
            Tier::Perfect => &mut self.perfect,
            Tier::Great => &mut self.great,
            Tier::Good => &mut self.good,
            Tier::Bad => &mut self.bad,
            Tier::Miss => &mut self.miss,
        }
    }

    pub fn total(&self) -> u32 {
        Tier::ALL.iter().map(|tier| self.get(*tier)).sum()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreState {
    combo: u32,
    max_combo: u32,
    apparent_score: f64,
    max_possible_score: f64,
    tier_counts: TierCounts,
    early: u32,
    late: u32,
    score: u32,
}

impl ScoreState {
    pub fn new(total_notes: usize) -> Self {
        Self {
            max_possible_score: total_notes as f64 * Tier::BEST.weight(),
            ..Self::default()
        }
    }

    /// Counts one judgement and recomputes the score.
    pub fn apply(&mut self, tier: Tier) -> u32 {
        *self.tier_counts.slot(tier) += 1;
        self.apparent_score += tier.weight();
        if tier.keeps_combo() {
            self.combo += 1;
            self.max_combo = self.max_combo.max(self.combo);
        } else {
            self.combo = 0;
        }
        self.recompute_score()
    }

    /// Signed lag is `timestamp - arrival`; Perfect taps are not split.
    pub fn record_timing(&mut self, tier: Tier, signed_lag: Seconds) {
        if tier == Tier::Perfect || tier == Tier::Miss {
            return;
        }
        if signed_lag < 0.0 {
            self.early += 1;
        } else if signed_lag > 0.0 {
            self.late += 1;
        }
    }

    pub fn recompute_score(&mut self) -> u32 {
        if self.max_possible_score <= 0.0 {
            self.score = 0;
            return self.score;
        }
        let max = THEORETICAL_MAX as f64;
        let floored = (self.apparent_score / self.max_possible_score * max).floor();
        self.score = (max * floored / max).round().clamp(0.0, max) as u32;
        self.score
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn max_combo(&self) -> u32 {
        self.max_combo
    }

    pub fn apparent_score(&self) -> f64 {
        self.apparent_score
    }

    pub fn max_possible_score(&self) -> f64 {
        self.max_possible_score
    }

    pub fn tier_counts(&self) -> TierCounts {
        self.tier_counts
    }

    pub fn early(&self) -> u32 {
        self.early
    }

    pub fn late(&self) -> u32 {
        self.late
    }

    pub fn judged(&self) -> u32 {
        self.tier_counts.total()
    }

    /// Achieved share of the judged notes' best-case value.
    pub fn accuracy(&self) -> f64 {
        let judged = self.judged();
        if judged == 0 {
            return 0.0;
        }
        self.apparent_score / (judged as f64 * Tier::BEST.weight())
    }

    pub fn is_full_combo(&self) -> bool {
        self.tier_counts.bad == 0 && self.tier_counts.miss == 0
    }

    pub fn is_all_perfect(&self) -> bool {
        self.judged() == self.tier_counts.perfect
    }
}
