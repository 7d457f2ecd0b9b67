//! Simulation observer trait for progress reporting and data collection.

use ev_agent::AgentStore;
use ev_core::Tick;
use ev_mobility::MobilityStore;
use ev_spatial::StreetNetwork;

use crate::StepSummary;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// step loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct Progress;
///
/// impl SimObserver for Progress {
///     fn on_step_end(&mut self, s: &StepSummary) {
///         println!("{}: {}/{} evacuated", s.step, s.evacuated, s.total);
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each step, before any processing.
    fn on_step_start(&mut self, _step: Tick) {}

    /// Called after all phases of a step.
    fn on_step_end(&mut self, _summary: &StepSummary) {}

    /// Called at snapshot intervals (every `config.snapshot_interval_steps`
    /// steps) with read-only access to the full edge and agent state.
    fn on_snapshot(
        &mut self,
        _step:     Tick,
        _mobility: &MobilityStore,
        _agents:   &AgentStore,
        _network:  &StreetNetwork,
    ) {}

    /// Called once after the final step completes.
    fn on_sim_end(&mut self, _final_step: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
