//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use ev_agent::AgentStore;
use ev_core::Tick;
use ev_mobility::MobilityStore;
use ev_sim::{SimObserver, StepSummary};
use ev_spatial::StreetNetwork;

use crate::row::{AgentSnapshotRow, EdgeStateRow, StepSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes edge states, agent snapshots and step
/// summaries to any [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_step_end(&mut self, s: &StepSummary) {
        let row = StepSummaryRow {
            step:          s.step.0,
            sim_time_secs: s.sim_time_secs,
            total:         s.total as u64,
            evacuated:     s.evacuated as u64,
            dead:          s.dead as u64,
            waiting:       s.waiting as u64,
            in_transit:    s.in_transit as u64,
        };
        let result = self.writer.write_step_summary(&row);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, step: Tick, mobility: &MobilityStore, agents: &AgentStore, network: &StreetNetwork) {
        let edges: Vec<EdgeStateRow> = network
            .edge_ids()
            .map(|edge| {
                let (from, to) = network.endpoints(edge);
                let state = mobility.edge_state(edge);
                EdgeStateRow {
                    step:          step.0,
                    edge_id:       edge.0,
                    from:          from.0,
                    to:            to.0,
                    velocity:      state.velocity,
                    travel_time:   state.travel_time,
                    occupancy_pct: state.occupancy_pct,
                }
            })
            .collect();

        let snapshots: Vec<AgentSnapshotRow> = agents
            .agent_ids()
            .map(|agent| {
                let pos = mobility.state(agent).pos;
                AgentSnapshotRow {
                    agent_id: agent.0,
                    step:     step.0,
                    phase:    agents.phase(agent),
                    x:        pos.x,
                    y:        pos.y,
                }
            })
            .collect();

        if !edges.is_empty() {
            let result = self.writer.write_edge_states(&edges);
            self.store_err(result);
        }
        if !snapshots.is_empty() {
            let result = self.writer.write_agent_snapshots(&snapshots);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _final_step: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
