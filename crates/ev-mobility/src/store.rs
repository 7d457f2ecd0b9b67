//! The `MobilityStore` — movement state, links, edge costs and node FIFOs.

use std::collections::VecDeque;

use ev_core::{AgentId, EdgeId, LinkParams, NodeId};
use ev_spatial::{EdgeCosts, SpatialError, StreetNetwork};

use crate::{Link, MobilityResult, MovementState};

/// Observable state of one edge, as reported downstream.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EdgeState {
    pub velocity:      f64,
    pub travel_time:   f64,
    pub occupancy_pct: u32,
}

/// Aggregates along a node path, picking the cheapest parallel edge between
/// each consecutive pair.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RouteStats {
    pub travel_time_secs: f64,
    pub length_m:         f64,
    /// Mean of the link velocities (not length-weighted).
    pub mean_velocity:    f64,
}

/// Holds everything that changes while agents move.
///
/// * `states` is indexed by `AgentId`.
/// * `links` and `costs` are indexed by `EdgeId`; `costs[e]` always equals
///   the travel time last published by `links[e]`.
/// * `residents` is indexed by `NodeId`; each FIFO holds exactly the agents
///   waiting at that node, in arrival order.
pub struct MobilityStore {
    pub states: Vec<MovementState>,
    pub links:  Vec<Link>,
    pub costs:  EdgeCosts,
    pub(crate) residents: Vec<VecDeque<AgentId>>,
}

impl MobilityStore {
    /// One free-flowing link per edge, empty node FIFOs, and `agent_count`
    /// unplaced agents.
    pub fn new(network: &StreetNetwork, params: LinkParams, agent_count: usize) -> Self {
        let links = network
            .edge_ids()
            .map(|e| Link::new(network.edge_length_m[e.index()], network.edge_width_m[e.index()], params))
            .collect();
        Self {
            states:    vec![MovementState::unplaced(); agent_count],
            links,
            costs:     EdgeCosts::free_flow(network, &params),
            residents: vec![VecDeque::new(); network.node_count()],
        }
    }

    #[inline]
    pub fn state(&self, agent: AgentId) -> &MovementState {
        &self.states[agent.index()]
    }

    #[inline]
    pub fn link(&self, edge: EdgeId) -> &Link {
        &self.links[edge.index()]
    }

    // ── Node resident FIFOs ───────────────────────────────────────────────

    /// Agents waiting at `node`, oldest arrival first.
    pub fn residents(&self, node: NodeId) -> &VecDeque<AgentId> {
        &self.residents[node.index()]
    }

    pub(crate) fn residents_mut(&mut self, node: NodeId) -> &mut VecDeque<AgentId> {
        &mut self.residents[node.index()]
    }

    /// Nodes with at least one waiting agent, ascending.
    pub fn occupied_nodes(&self) -> Vec<NodeId> {
        self.residents
            .iter()
            .enumerate()
            .filter(|(_, q)| !q.is_empty())
            .map(|(i, _)| NodeId(i as u32))
            .collect()
    }

    pub fn waiting_count(&self) -> usize {
        self.residents.iter().map(VecDeque::len).sum()
    }

    pub fn in_transit_count(&self) -> usize {
        self.links.iter().map(Link::len).sum()
    }

    // ── Reporting ─────────────────────────────────────────────────────────

    pub fn edge_state(&self, edge: EdgeId) -> EdgeState {
        let link = &self.links[edge.index()];
        EdgeState {
            velocity:      link.velocity(),
            travel_time:   link.travel_time(),
            occupancy_pct: link.occupancy_percent(),
        }
    }

    /// Travel time, length and mean velocity along `nodes` using current
    /// link state.
    ///
    /// # Errors
    ///
    /// [`SpatialError::NoRoute`] if two consecutive nodes are not joined by an
    /// edge.
    pub fn route_stats(&self, network: &StreetNetwork, nodes: &[NodeId]) -> MobilityResult<RouteStats> {
        let mut stats = RouteStats::default();
        if nodes.len() < 2 {
            return Ok(stats);
        }
        for pair in nodes.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            if !network.contains_node(from) {
                return Err(SpatialError::NodeNotFound(from).into());
            }
            let edge = network
                .edges_between(from, to)
                .reduce(|best, e| if self.costs.get(e) < self.costs.get(best) { e } else { best })
                .ok_or(SpatialError::NoRoute { from, to })?;
            let link = &self.links[edge.index()];
            stats.travel_time_secs += self.costs.get(edge);
            stats.length_m += link.length_m;
            stats.mean_velocity += link.velocity();
        }
        stats.mean_velocity /= (nodes.len() - 1) as f64;
        Ok(stats)
    }
}
