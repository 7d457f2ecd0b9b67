//! The `Sim` struct and its step loop.

use tracing::{debug, info};

use ev_agent::{AgentPhase, AgentStore};
use ev_core::{AgentId, NodeId, RoutePolicy, SimClock, SimConfig, Tick};
use ev_mobility::{MobilityEngine, MobilityError};
use ev_spatial::{Router, StreetNetwork};

use crate::{HazardModel, NoopObserver, SimError, SimObserver, SimResult, StepSummary};

/// The main simulation runner.
///
/// Holds the street network, all agent and link state, and drives the
/// five-phase step loop described in the [crate docs](crate).
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<R: Router, H: HazardModel> {
    pub config: SimConfig,

    /// Simulation clock: the current step `k` and its time `k · T`.
    pub clock: SimClock,

    pub network: StreetNetwork,

    /// Identity and lifecycle of every agent.
    pub agents: AgentStore,

    /// Links, edge costs, node FIFOs and per-agent movement state.
    pub mobility: MobilityEngine<R>,

    pub hazard: H,

    pub(crate) last: Option<StepSummary>,
}

impl<R: Router, H: HazardModel> Sim<R, H> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run until termination.
    ///
    /// # Errors
    ///
    /// [`SimError::Unbounded`] if no horizon is configured and some active
    /// agent has no reachable destination; nothing is simulated in that case.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        if self.config.horizon_secs.is_none() {
            let stuck = self.mobility.unroutable_agents(&self.network, &self.agents);
            if let Some(&first) = stuck.first() {
                return Err(SimError::Unbounded { count: stuck.len(), first });
            }
        }

        info!(agents = self.agents.count, horizon = ?self.config.horizon_steps(), "run started");
        while !self.is_finished() {
            self.observed_step(observer)?;
        }
        observer.on_sim_end(self.clock.current_tick);

        let s = self.summary();
        info!(
            steps     = s.step.0,
            evacuated = s.evacuated,
            dead      = s.dead,
            total     = s.total,
            "run finished at {}",
            self.clock
        );
        Ok(())
    }

    /// Run exactly `n` steps from the current position, ignoring termination.
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_steps<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.observed_step(observer)?;
        }
        Ok(())
    }

    /// Run a single step without an observer.
    pub fn step(&mut self) -> SimResult<StepSummary> {
        self.observed_step(&mut NoopObserver)
    }

    /// `true` once the horizon is reached or, without a horizon, once every
    /// agent is evacuated or dead.
    pub fn is_finished(&self) -> bool {
        match self.config.horizon_steps() {
            Some(h) => self.clock.current_tick.0 >= h,
            None    => self.agents.counts().finished() == self.agents.count,
        }
    }

    /// Counters after the most recent step (or the initial state).
    pub fn summary(&self) -> StepSummary {
        self.last.unwrap_or_else(|| self.current_summary(self.clock.current_tick, 0, 0))
    }

    // ── External signals ──────────────────────────────────────────────────

    /// Kill `agent` now, removing it from its node or link.
    pub fn kill(&mut self, agent: AgentId) -> SimResult<()> {
        self.mobility.kill(agent, &mut self.agents)?;
        Ok(())
    }

    /// Set (or clear) the destination of one agent.
    pub fn set_destination(&mut self, agent: AgentId, dest: Option<NodeId>) -> SimResult<()> {
        if let Some(node) = dest {
            if !self.network.contains_node(node) {
                return Err(MobilityError::NodeNotFound(node).into());
            }
        }
        self.agents.set_destination(agent, dest).map_err(MobilityError::from)?;
        Ok(())
    }

    /// Assign destinations to every agent from `f(agent, orig_node)`.
    ///
    /// Nodes outside the network are ignored (the agent keeps no
    /// destination).
    pub fn assign_destinations<F>(&mut self, mut f: F)
    where
        F: FnMut(AgentId, NodeId) -> Option<NodeId>,
    {
        for agent in 0..self.agents.count as u32 {
            let agent = AgentId(agent);
            let dest = f(agent, self.agents.orig_node[agent.index()])
                .filter(|&n| self.network.contains_node(n));
            self.agents.dest_node[agent.index()] = dest;
        }
    }

    // ── Core step processing ──────────────────────────────────────────────

    fn observed_step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<StepSummary> {
        let now = self.clock.current_tick;
        observer.on_step_start(now);
        let summary = self.process_step(now)?;
        observer.on_step_end(&summary);

        let interval = self.config.snapshot_interval_steps;
        if interval > 0 && now.0 % interval == 0 {
            observer.on_snapshot(now, &self.mobility.store, &self.agents, &self.network);
        }

        self.last = Some(summary);
        self.clock.advance();
        Ok(summary)
    }

    fn process_step(&mut self, now: Tick) -> SimResult<StepSummary> {
        let now_secs = self.clock.secs_at(now);

        // ── Phase 0: hazard and periodic reroute ──────────────────────────
        let casualties = self.hazard.casualties(now, now_secs, &self.agents, &self.mobility.store);
        for agent in casualties {
            if let Err(e) = self.mobility.kill(agent, &mut self.agents) {
                debug!(agent = %agent, error = %e, "ignoring death signal");
            }
        }
        if let RoutePolicy::Periodic { every_steps } = self.config.route_policy {
            if every_steps > 0 && now.0 % every_steps == 0 {
                let n = self.mobility.reroute_active(&self.network, &self.agents);
                debug!(step = %now, rerouted = n, "periodic reroute");
            }
        }

        // ── Phase 1: advance ──────────────────────────────────────────────
        //
        // Costs here are the ones published in the previous step.
        let mut admitted = 0;
        for node in self.mobility.store.occupied_nodes() {
            admitted += self.admit_at(node, now_secs);
        }

        // ── Phase 2: link update ──────────────────────────────────────────
        self.mobility.update_links();

        // ── Phase 3: release ──────────────────────────────────────────────
        let mut released = 0;
        let edges: Vec<_> = self.network.edge_ids().collect();
        for edge in edges {
            let landed = match self.mobility.release(edge, now_secs, &self.network, &mut self.agents) {
                Ok(landed) => landed,
                Err(e) => {
                    debug!(edge = %edge, error = %e, "release failed; skipping edge");
                    continue;
                }
            };
            released += landed.len();
            for (agent, node) in landed {
                if self.agents.phase(agent) == AgentPhase::WaitingAtNode {
                    admitted += self.admit_at(node, now_secs);
                }
            }
        }

        // ── Phase 4: kinematics ───────────────────────────────────────────
        self.mobility.advance_positions(self.config.step_secs, &self.network);

        Ok(self.current_summary(now, admitted, released))
    }

    /// Run link selection at `node`; a failure is logged and costs only that
    /// node's admission for this call.
    fn admit_at(&mut self, node: NodeId, now_secs: f64) -> usize {
        match self.mobility.choose_outgoing_link(node, now_secs, &self.network, &mut self.agents) {
            Ok(outcome) => usize::from(outcome.admitted.is_some()),
            Err(e) => {
                debug!(node = %node, error = %e, "admission failed; node skipped");
                0
            }
        }
    }

    fn current_summary(&self, step: Tick, admitted: usize, released: usize) -> StepSummary {
        let counts = self.agents.counts();
        StepSummary {
            step,
            sim_time_secs: self.clock.secs_at(step),
            total:         self.agents.count,
            evacuated:     counts.evacuated,
            dead:          counts.dead,
            waiting:       counts.waiting,
            in_transit:    counts.in_transit,
            admitted,
            released,
        }
    }
}
