//! Fluent builder for constructing a [`Sim`].

use tracing::info;

use ev_agent::AgentStore;
use ev_core::{AgentKind, NodeId, SimConfig, SimRng};
use ev_mobility::{MobilityEngine, MobilityError};
use ev_population::{PopulationRecord, PopulationSeeder};
use ev_spatial::{Router, StreetNetwork};

use crate::{HazardModel, NoHazard, Sim, SimError, SimResult};

/// An agent placed by hand rather than seeded from a record.
struct ManualAgent {
    name: String,
    kind: AgentKind,
    node: NodeId,
    dest: Option<NodeId>,
}

/// Fluent builder for [`Sim<R, H>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: step length, horizon, seed, route policy, …
/// - [`StreetNetwork`]: the directed street graph
/// - `R: Router`: the routing algorithm (e.g. [`ev_spatial::DijkstraRouter`])
///
/// # Optional inputs (have defaults)
///
/// | Method              | Default                  |
/// |---------------------|--------------------------|
/// | `.population(v)`    | no seeded agents         |
/// | `.agent(..)`        | no hand-placed agents    |
/// | `.hazard(h)`        | [`NoHazard`]             |
///
/// Seeded agents come first (in record order), then hand-placed ones in call
/// order; `AgentId`s follow that order.
pub struct SimBuilder<R: Router, H: HazardModel = NoHazard> {
    config:     SimConfig,
    network:    StreetNetwork,
    router:     R,
    hazard:     H,
    population: Vec<PopulationRecord>,
    manual:     Vec<ManualAgent>,
}

impl<R: Router> SimBuilder<R, NoHazard> {
    pub fn new(config: SimConfig, network: StreetNetwork, router: R) -> Self {
        Self {
            config,
            network,
            router,
            hazard:     NoHazard,
            population: Vec::new(),
            manual:     Vec::new(),
        }
    }
}

impl<R: Router, H: HazardModel> SimBuilder<R, H> {
    /// Population records to seed at build time.
    pub fn population(mut self, records: Vec<PopulationRecord>) -> Self {
        self.population = records;
        self
    }

    /// Place one resident at `node`, optionally with a destination.
    pub fn agent(mut self, name: impl Into<String>, node: NodeId, dest: Option<NodeId>) -> Self {
        self.manual.push(ManualAgent { name: name.into(), kind: AgentKind::Resident, node, dest });
        self
    }

    /// Replace the hazard model.
    pub fn hazard<H2: HazardModel>(self, hazard: H2) -> SimBuilder<R, H2> {
        SimBuilder {
            config:     self.config,
            network:    self.network,
            router:     self.router,
            hazard,
            population: self.population,
            manual:     self.manual,
        }
    }

    /// Validate inputs, seed the population, place every agent and return a
    /// ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<R, H>> {
        self.config.validate().map_err(SimError::Config)?;

        // ── Decide placements ─────────────────────────────────────────────
        let mut rng = SimRng::new(self.config.seed);
        let plan = PopulationSeeder::new(&self.network).plan(&self.population, &mut rng);
        let agent_count = plan.agent_count() + self.manual.len();

        // ── Spawn and place ───────────────────────────────────────────────
        let mut agents = AgentStore::with_capacity(agent_count);
        let mut mobility = MobilityEngine::new(
            self.router,
            &self.network,
            self.config.link_params,
            self.config.route_policy,
            agent_count,
        );

        for (name, kind, node) in plan.agents() {
            let id = agents.spawn(name, kind);
            mobility.place(id, node, &self.network, &mut agents)?;
        }
        for m in self.manual {
            if let Some(dest) = m.dest {
                if !self.network.contains_node(dest) {
                    return Err(MobilityError::NodeNotFound(dest).into());
                }
            }
            let id = agents.spawn(m.name, m.kind);
            agents.set_destination(id, m.dest).map_err(MobilityError::from)?;
            mobility.place(id, m.node, &self.network, &mut agents)?;
        }

        info!(
            agents  = agents.count,
            nodes   = self.network.node_count(),
            edges   = self.network.edge_count(),
            skipped = plan.skipped.len(),
            "simulation built"
        );

        Ok(Sim {
            clock:   self.config.make_clock(),
            config:  self.config,
            network: self.network,
            agents,
            mobility,
            hazard:  self.hazard,
            last:    None,
        })
    }
}
