use ev_core::Tick;

/// Aggregate counters sampled at the end of each step.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct StepSummary {
    pub step:          Tick,
    pub sim_time_secs: f64,
    pub total:         usize,
    pub evacuated:     usize,
    pub dead:          usize,
    pub waiting:       usize,
    pub in_transit:    usize,
    /// Link admissions during phases ① and ③.
    pub admitted:      usize,
    /// Link releases during phase ③.
    pub released:      usize,
}

impl StepSummary {
    /// `evacuated + dead`.
    pub fn finished(&self) -> usize {
        self.evacuated + self.dead
    }

    pub fn all_finished(&self) -> bool {
        self.finished() == self.total
    }
}
