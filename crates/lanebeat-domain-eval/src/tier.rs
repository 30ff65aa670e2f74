use lanebeat_ports::types::Seconds;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    Perfect,
    Great,
    Good,
    Bad,
    Miss,
}

impl Tier {
    pub const ALL: [Tier; 5] = [Tier::Perfect, Tier::Great, Tier::Good, Tier::Bad, Tier::Miss];
    pub const BEST: Tier = Tier::Perfect;

    pub fn weight(self) -> f64 {
        match self {
            Tier::Perfect => 1.0,
            Tier::Great => 0.75,
            Tier::Good => 0.5,
            Tier::Bad => 0.25,
            Tier::Miss => 0.0,
        }
    }

    /// Whether this tier extends the combo. Bad and Miss break it.
    pub fn keeps_combo(self) -> bool {
        matches!(self, Tier::Perfect | Tier::Great | Tier::Good)
    }
}

/// Inclusive upper bounds on `|time lag|`, in seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimingWindows {
    pub perfect: Seconds,
    pub great: Seconds,
    pub good: Seconds,
    pub bad: Seconds,
}

impl Default for TimingWindows {
    fn default() -> Self {
        Self {
            perfect: 0.08,
            great: 0.12,
            good: 0.25,
            bad: 0.40,
        }
    }
}

impl TimingWindows {
    /// `None` past the Bad window: a badly aimed tap is ignored, not a Miss.
    pub fn classify(&self, time_lag: Seconds) -> Option<Tier> {
        let lag = time_lag.abs();
        if lag <= self.perfect {
            Some(Tier::Perfect)
        } else if lag <= self.great {
            Some(Tier::Great)
        } else if lag <= self.good {
            Some(Tier::Good)
        } else if lag <= self.bad {
            Some(Tier::Bad)
        } else {
            None
        }
    }

    pub fn widest(&self) -> Seconds {
        self.bad
    }
}
