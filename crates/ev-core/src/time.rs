//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing step counter `k` (`Tick`).  One step
//! lasts `T` simulated seconds, so the simulated time at step `k` is:
//!
//!   sim_time_secs = k * T
//!
//! This logical clock governs every travel-time comparison in the engine.
//! Wall-clock time is never consulted.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation step counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "k{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Maps step counts to simulated seconds.
///
/// `SimClock` is cheap to copy and holds no heap data.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Simulated seconds per step (`T`).
    pub step_secs: f64,
    /// The current step, advanced by [`SimClock::advance`] after each step.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(step_secs: f64) -> Self {
        Self { step_secs, current_tick: Tick::ZERO }
    }

    /// Advance the clock by one step.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = self.current_tick + 1;
    }

    /// Simulated seconds at the current step (`k * T`).
    #[inline]
    pub fn now_secs(&self) -> f64 {
        self.secs_at(self.current_tick)
    }

    /// Simulated seconds at an arbitrary step.
    #[inline]
    pub fn secs_at(&self, tick: Tick) -> f64 {
        tick.0 as f64 * self.step_secs
    }

    /// Number of whole steps needed to cover `secs` (rounds up).
    #[inline]
    pub fn steps_for_secs(&self, secs: f64) -> u64 {
        (secs / self.step_secs).ceil().max(0.0) as u64
    }

    /// Break elapsed simulated time into (hours, minutes, seconds).
    pub fn elapsed_hms(&self) -> (u64, u32, u32) {
        let total = self.now_secs().max(0.0) as u64;
        (total / 3_600, ((total % 3_600) / 60) as u32, (total % 60) as u32)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (h, m, s) = self.elapsed_hms();
        write!(f, "{} ({}:{:02}:{:02})", self.current_tick, h, m, s)
    }
}
