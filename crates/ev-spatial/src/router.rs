//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! The mobility engine calls routing via the [`Router`] trait, so applications
//! can swap in custom implementations (A*, behavioural models) without
//! touching the scheduler.
//!
//! # Cost units
//!
//! Costs are the link travel times in seconds held by [`EdgeCosts`].  They are
//! strictly positive, so plain Dijkstra is exact.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use ev_core::{EdgeId, NodeId};

use crate::{EdgeCosts, SpatialError, SpatialResult, StreetNetwork};

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Nodes visited in order, from origin to destination inclusive.
    pub nodes: Vec<NodeId>,
    /// Edges traversed in order; `edges.len() == nodes.len() - 1`.
    pub edges: Vec<EdgeId>,
    /// Sum of edge costs at the time of the query, in seconds.
    pub total_cost_secs: f64,
}

impl Route {
    /// `true` if origin and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn origin(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    pub fn destination(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable shortest-path engine over current edge costs.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so batched queries can fan out over
/// Rayon workers with the `parallel` feature.
pub trait Router: Send + Sync {
    /// Compute a minimum-cost route from `from` to `to`.
    ///
    /// `from == to` yields a trivial route.  Disconnected pairs fail with
    /// [`SpatialError::NoRoute`].
    fn route(
        &self,
        network: &StreetNetwork,
        costs:   &EdgeCosts,
        from:    NodeId,
        to:      NodeId,
    ) -> SpatialResult<Route>;

    /// Like [`route`](Self::route) but with a possibly unset destination,
    /// which fails with [`SpatialError::NoDestination`].
    fn shortest_path(
        &self,
        network: &StreetNetwork,
        costs:   &EdgeCosts,
        from:    NodeId,
        to:      Option<NodeId>,
    ) -> SpatialResult<Route> {
        match to {
            Some(to) => self.route(network, costs, from, to),
            None     => Err(SpatialError::NoDestination { from }),
        }
    }

    /// One result per `(origin, destination)` pair, in input order.  Each
    /// pair fails independently.
    fn route_many(
        &self,
        network: &StreetNetwork,
        costs:   &EdgeCosts,
        pairs:   &[(NodeId, NodeId)],
    ) -> Vec<SpatialResult<Route>> {
        #[cfg(not(feature = "parallel"))]
        {
            pairs
                .iter()
                .map(|&(from, to)| self.route(network, costs, from, to))
                .collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            pairs
                .par_iter()
                .map(|&(from, to)| self.route(network, costs, from, to))
                .collect()
        }
    }
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Standard Dijkstra over the CSR street graph with a binary heap.
///
/// Ties between equal-cost frontier entries are broken by ascending `NodeId`
/// and, among parallel edges, by enumeration order (the first edge to reach a
/// node at the best cost keeps it).
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(
        &self,
        network: &StreetNetwork,
        costs:   &EdgeCosts,
        from:    NodeId,
        to:      NodeId,
    ) -> SpatialResult<Route> {
        dijkstra(network, costs, from, to)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Total order over non-NaN costs so they can live in a `BinaryHeap`.
#[derive(Copy, Clone, PartialEq, Debug)]
struct Cost(f64);

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

fn dijkstra(
    network: &StreetNetwork,
    costs:   &EdgeCosts,
    from:    NodeId,
    to:      NodeId,
) -> SpatialResult<Route> {
    for n in [from, to] {
        if !network.contains_node(n) {
            return Err(SpatialError::NodeNotFound(n));
        }
    }
    if from == to {
        return Ok(Route { nodes: vec![from], edges: vec![], total_cost_secs: 0.0 });
    }

    let n = network.node_count();
    let mut dist      = vec![f64::INFINITY; n];
    let mut prev_edge = vec![EdgeId::INVALID; n];

    dist[from.index()] = 0.0;

    // Reverse makes the max-heap a min-heap; NodeId is the secondary key.
    let mut heap: BinaryHeap<Reverse<(Cost, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((Cost(0.0), from)));

    while let Some(Reverse((Cost(cost), node))) = heap.pop() {
        if node == to {
            return Ok(reconstruct(network, &prev_edge, to, cost));
        }

        // Stale heap entry.
        if cost > dist[node.index()] {
            continue;
        }

        for edge in network.out_edges(node) {
            let neighbor = network.edge_to[edge.index()];
            let new_cost = cost + costs.get(edge);

            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                heap.push(Reverse((Cost(new_cost), neighbor)));
            }
        }
    }

    Err(SpatialError::NoRoute { from, to })
}

fn reconstruct(
    network:   &StreetNetwork,
    prev_edge: &[EdgeId],
    to:        NodeId,
    total:     f64,
) -> Route {
    let mut edges = Vec::new();
    let mut cur = to;
    loop {
        let e = prev_edge[cur.index()];
        if e == EdgeId::INVALID {
            break;
        }
        edges.push(e);
        cur = network.edge_from[e.index()];
    }
    edges.reverse();

    let mut nodes = Vec::with_capacity(edges.len() + 1);
    nodes.push(cur);
    nodes.extend(edges.iter().map(|e| network.edge_to[e.index()]));

    Route { nodes, edges, total_cost_secs: total }
}
