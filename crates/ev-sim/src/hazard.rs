//! External death signals.
//!
//! The flood model itself lives outside the engine.  At the start of each
//! step the scheduler asks a [`HazardModel`] which agents die now and removes
//! them from whatever node or link holds them.

use std::collections::BTreeMap;

use ev_agent::AgentStore;
use ev_core::{AgentId, Tick};
use ev_mobility::MobilityStore;

pub trait HazardModel {
    /// Agents that die at `step`.  Agents already terminal are ignored.
    fn casualties(
        &mut self,
        step:          Tick,
        sim_time_secs: f64,
        agents:        &AgentStore,
        mobility:      &MobilityStore,
    ) -> Vec<AgentId>;
}

/// No hazard: nobody dies.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoHazard;

impl HazardModel for NoHazard {
    fn casualties(&mut self, _: Tick, _: f64, _: &AgentStore, _: &MobilityStore) -> Vec<AgentId> {
        Vec::new()
    }
}

/// Deaths fixed in advance, keyed by step.
#[derive(Clone, Debug, Default)]
pub struct ScheduledDeaths {
    by_step: BTreeMap<Tick, Vec<AgentId>>,
}

impl ScheduledDeaths {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(mut self, step: Tick, agent: AgentId) -> Self {
        self.by_step.entry(step).or_default().push(agent);
        self
    }
}

impl HazardModel for ScheduledDeaths {
    fn casualties(&mut self, step: Tick, _: f64, _: &AgentStore, _: &MobilityStore) -> Vec<AgentId> {
        self.by_step.remove(&step).unwrap_or_default()
    }
}
