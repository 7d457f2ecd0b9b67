//! High-level mobility engine: routing, link admission, release and kinematics.

use tracing::debug;

use ev_agent::{AgentError, AgentPhase, AgentStore};
use ev_core::{AgentId, EdgeId, LinkParams, NodeId, RoutePolicy};
use ev_spatial::{Router, StreetNetwork};

use crate::{Admission, Link, MobilityError, MobilityResult, MobilityStore, MovementState};

/// What one [`MobilityEngine::choose_outgoing_link`] call did at a node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeOutcome {
    /// The agent admitted onto a link, if any.  At most one per call.
    pub admitted:  Option<(AgentId, EdgeId)>,
    /// Agents found standing on their destination and evacuated.
    pub evacuated: Vec<AgentId>,
    /// Agent turned away by a full link; it keeps its place in the FIFO.
    pub blocked:   Option<(AgentId, EdgeId)>,
}

/// Wraps a [`Router`] and [`MobilityStore`] and implements every per-agent
/// movement rule the scheduler drives.
///
/// # Type parameter
///
/// `R` must implement [`Router`] (e.g. [`ev_spatial::DijkstraRouter`]).
pub struct MobilityEngine<R: Router> {
    pub router: R,
    pub store:  MobilityStore,
    pub policy: RoutePolicy,
}

impl<R: Router> MobilityEngine<R> {
    pub fn new(
        router:      R,
        network:     &StreetNetwork,
        params:      LinkParams,
        policy:      RoutePolicy,
        agent_count: usize,
    ) -> Self {
        Self {
            router,
            store: MobilityStore::new(network, params, agent_count),
            policy,
        }
    }

    /// Put `agent` at the back of `node`'s resident FIFO (initial placement).
    pub fn place(
        &mut self,
        agent:   AgentId,
        node:    NodeId,
        network: &StreetNetwork,
        agents:  &mut AgentStore,
    ) -> MobilityResult<()> {
        if !network.contains_node(node) {
            return Err(MobilityError::NodeNotFound(node));
        }
        agents.place(agent, node)?;
        if agent.index() >= self.store.states.len() {
            self.store.states.resize(agent.index() + 1, MovementState::unplaced());
        }
        self.store.states[agent.index()] = MovementState::at_node(node, network.node_pos[node.index()]);
        self.store.residents_mut(node).push_back(agent);
        Ok(())
    }

    // ── Routing ───────────────────────────────────────────────────────────

    /// Compute a route for `agent` to its destination over current edge costs.
    ///
    /// A waiting agent is routed from its node; an agent on a link from the
    /// link's target.  On any error the agent's state is left untouched.
    ///
    /// # Errors
    ///
    /// * [`MobilityError::NoDestination`] if the destination is unset.
    /// * [`MobilityError::NotPlaced`] before placement.
    /// * [`MobilityError::Routing`] when the destination is unreachable.
    pub fn compute_route(
        &mut self,
        agent:   AgentId,
        network: &StreetNetwork,
        agents:  &AgentStore,
    ) -> MobilityResult<()> {
        if !agents.contains(agent) {
            return Err(AgentError::NotFound(agent).into());
        }
        let dest = agents.destination(agent).ok_or(MobilityError::NoDestination(agent))?;
        let origin = self.route_origin(agent).ok_or(MobilityError::NotPlaced(agent))?;
        let route = self.router.route(network, &self.store.costs, origin, dest)?;
        self.store.states[agent.index()].set_route(route.nodes);
        Ok(())
    }

    /// Batch-recompute routes of every active agent with a destination.
    /// Failures keep the previous route.  Returns how many routes changed.
    pub fn reroute_active(&mut self, network: &StreetNetwork, agents: &AgentStore) -> usize {
        let (ids, pairs) = self.route_requests(agents);
        let results = self.router.route_many(network, &self.store.costs, &pairs);
        let mut updated = 0;
        for (agent, result) in ids.into_iter().zip(results) {
            match result {
                Ok(route) => {
                    self.store.states[agent.index()].set_route(route.nodes);
                    updated += 1;
                }
                Err(e) => debug!(agent = %agent, error = %e, "periodic reroute failed; keeping route"),
            }
        }
        updated
    }

    /// Active agents that could never finish: no destination, or a
    /// destination not reachable from where they stand.
    pub fn unroutable_agents(&self, network: &StreetNetwork, agents: &AgentStore) -> Vec<AgentId> {
        let mut stuck: Vec<AgentId> = agents
            .active_ids()
            .filter(|&a| agents.destination(a).is_none())
            .collect();
        let (ids, pairs) = self.route_requests(agents);
        let results = self.router.route_many(network, &self.store.costs, &pairs);
        stuck.extend(ids.into_iter().zip(results).filter(|(_, r)| r.is_err()).map(|(a, _)| a));
        stuck.sort_unstable();
        stuck
    }

    fn route_origin(&self, agent: AgentId) -> Option<NodeId> {
        let state = self.store.states.get(agent.index())?;
        if !state.is_placed() {
            return None;
        }
        if state.in_transit() { state.next_node } else { Some(state.curr_node) }
    }

    fn route_requests(&self, agents: &AgentStore) -> (Vec<AgentId>, Vec<(NodeId, NodeId)>) {
        let mut ids = Vec::new();
        let mut pairs = Vec::new();
        for agent in agents.active_ids() {
            let (Some(dest), Some(origin)) = (agents.destination(agent), self.route_origin(agent)) else {
                continue;
            };
            ids.push(agent);
            pairs.push((origin, dest));
        }
        (ids, pairs)
    }

    // ── Admission ─────────────────────────────────────────────────────────

    /// Admit at most one waiting agent at `node` onto an outgoing link.
    ///
    /// Residents are considered oldest first.  Agents standing on their
    /// destination are evacuated on the way.  Agents without a usable route
    /// are skipped and keep their place.  The first agent with a candidate
    /// link either enters it or, if it is full, blocks the node for this call.
    pub fn choose_outgoing_link(
        &mut self,
        node:     NodeId,
        now_secs: f64,
        network:  &StreetNetwork,
        agents:   &mut AgentStore,
    ) -> MobilityResult<NodeOutcome> {
        let mut outcome = NodeOutcome::default();
        let mut idx = 0;
        while let Some(&agent) = self.store.residents(node).get(idx) {
            if agents.phase(agent) != AgentPhase::WaitingAtNode {
                self.store.residents_mut(node).remove(idx);
                debug!(agent = %agent, node = %node, phase = %agents.phase(agent), "dropping stale resident");
                continue;
            }
            if agents.destination(agent) == Some(node) {
                self.store.residents_mut(node).remove(idx);
                self.evacuate(agent, agents)?;
                outcome.evacuated.push(agent);
                continue;
            }

            let Some(edge) = self.candidate_edge(agent, node, network, agents) else {
                idx += 1;
                continue;
            };

            let to = network.edge_to[edge.index()];
            match self.store.links[edge.index()].enqueue(agent, now_secs) {
                Admission::Admitted => {
                    self.store.residents_mut(node).remove(idx);
                    self.store.states[agent.index()].enter_link(edge, to, now_secs);
                    agents.transition(agent, AgentPhase::InTransit)?;
                    outcome.admitted = Some((agent, edge));
                }
                Admission::Full => {
                    debug!(agent = %agent, edge = %edge, "link full; agent keeps waiting");
                    outcome.blocked = Some((agent, edge));
                }
            }
            break;
        }
        Ok(outcome)
    }

    /// Cheapest outgoing edge toward the agent's next route node, or among
    /// all outgoing edges when it has no destination.  First in enumeration
    /// order wins ties.
    fn candidate_edge(
        &mut self,
        agent:   AgentId,
        node:    NodeId,
        network: &StreetNetwork,
        agents:  &AgentStore,
    ) -> Option<EdgeId> {
        if network.out_degree(node) == 0 {
            return None;
        }

        let target = match agents.destination(agent) {
            None => None,
            Some(dest) => {
                let state = &self.store.states[agent.index()];
                let stale = self.policy == RoutePolicy::AtEveryNode
                    || state.next_node.is_none()
                    || state.route_end() != Some(dest);
                if stale {
                    if let Err(e) = self.compute_route(agent, network, agents) {
                        debug!(agent = %agent, node = %node, error = %e, "no usable route; agent stays");
                        return None;
                    }
                }
                Some(self.store.states[agent.index()].next_node?)
            }
        };

        let mut best: Option<(EdgeId, f64)> = None;
        for edge in network.out_edges(node) {
            if target.is_some_and(|t| network.edge_to[edge.index()] != t) {
                continue;
            }
            let cost = self.store.costs.get(edge);
            match best {
                Some((_, best_cost)) if cost >= best_cost => {}
                _ => best = Some((edge, cost)),
            }
        }
        best.map(|(edge, _)| edge)
    }

    // ── Link update ───────────────────────────────────────────────────────

    /// Recompute velocity and travel time of every occupied or still
    /// congested link and publish the new travel times as edge costs.
    /// Returns how many links were updated.
    pub fn update_links(&mut self) -> usize {
        let MobilityStore { links, costs, .. } = &mut self.store;

        #[cfg(not(feature = "parallel"))]
        {
            links
                .iter_mut()
                .zip(costs.as_mut_slice().iter_mut())
                .map(|(link, cost)| refresh_link(link, cost))
                .filter(|&updated| updated)
                .count()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            links
                .par_iter_mut()
                .zip(costs.as_mut_slice().par_iter_mut())
                .map(|(link, cost)| usize::from(refresh_link(link, cost)))
                .sum()
        }
    }

    // ── Release ───────────────────────────────────────────────────────────

    /// Release every agent whose travel time on `edge` has elapsed, up to the
    /// link's discharge limit.  Each lands on the edge's target and is
    /// either evacuated there or appended to its resident FIFO.
    ///
    /// Returns `(agent, target)` in release order.
    pub fn release(
        &mut self,
        edge:     EdgeId,
        now_secs: f64,
        network:  &StreetNetwork,
        agents:   &mut AgentStore,
    ) -> MobilityResult<Vec<(AgentId, NodeId)>> {
        let released = self.store.links[edge.index()].dequeue_eligible(now_secs);
        if released.is_empty() {
            return Ok(Vec::new());
        }
        let to = network.edge_to[edge.index()];
        let pos = network.node_pos[to.index()];
        let mut landed = Vec::with_capacity(released.len());
        for agent in released {
            self.store.states[agent.index()].arrive_at(to, pos);
            let result = if agents.destination(agent) == Some(to) {
                self.evacuate(agent, agents)
            } else {
                agents
                    .transition(agent, AgentPhase::WaitingAtNode)
                    .map(|()| self.store.residents_mut(to).push_back(agent))
                    .map_err(MobilityError::from)
            };
            match result {
                Ok(()) => landed.push((agent, to)),
                Err(e) => debug!(agent = %agent, edge = %edge, error = %e, "release failed; agent dropped"),
            }
        }
        Ok(landed)
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    fn evacuate(&mut self, agent: AgentId, agents: &mut AgentStore) -> MobilityResult<()> {
        agents.transition(agent, AgentPhase::Evacuated)?;
        self.store.states[agent.index()].retire();
        debug!(agent = %agent, "evacuated");
        Ok(())
    }

    /// Mark `agent` dead and remove it from whichever node FIFO or link queue
    /// holds it.
    ///
    /// # Errors
    ///
    /// [`MobilityError::Agent`] if the agent is unknown, unplaced, or already
    /// terminal; nothing is changed in that case.
    pub fn kill(&mut self, agent: AgentId, agents: &mut AgentStore) -> MobilityResult<()> {
        if !agents.contains(agent) {
            return Err(AgentError::NotFound(agent).into());
        }
        let was = agents.phase(agent);
        agents.transition(agent, AgentPhase::Dead)?;

        let state = &self.store.states[agent.index()];
        match (was, state.link) {
            (AgentPhase::InTransit, Some(edge)) => {
                self.store.links[edge.index()].remove(agent);
            }
            _ => {
                let node = state.curr_node;
                self.store.residents_mut(node).retain(|&a| a != agent);
            }
        }
        self.store.states[agent.index()].retire();
        Ok(())
    }

    // ── Kinematics ────────────────────────────────────────────────────────

    /// Move every in-transit agent `dt` seconds along its link.
    pub fn advance_positions(&mut self, dt: f64, network: &StreetNetwork) {
        let MobilityStore { states, links, .. } = &mut self.store;
        for state in states.iter_mut() {
            let Some(edge) = state.link else { continue };
            let link = &links[edge.index()];
            let (from, to) = network.endpoints(edge);
            state.advance_position(
                dt,
                link.velocity(),
                link.length_m,
                network.node_pos[from.index()],
                network.node_pos[to.index()],
            );
        }
    }
}

fn refresh_link(link: &mut Link, cost: &mut f64) -> bool {
    if link.is_empty() && !link.is_congested() {
        return false;
    }
    link.update_velocity();
    *cost = link.update_travel_time();
    true
}
