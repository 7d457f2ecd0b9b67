//! Per-edge routing cost: the current travel time of each edge's link.

use ev_core::{EdgeId, LinkParams};

use crate::StreetNetwork;

/// Current travel time in seconds for every edge, indexed by `EdgeId`.
///
/// The router reads these values and the link update phase re-publishes them
/// after every recomputation.  Costs are always strictly positive.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeCosts(Vec<f64>);

impl EdgeCosts {
    /// Free-flow travel times `length / max_speed` for every edge.
    pub fn free_flow(network: &StreetNetwork, params: &LinkParams) -> Self {
        EdgeCosts(
            network
                .edge_length_m
                .iter()
                .map(|&l| params.free_flow_secs(l))
                .collect(),
        )
    }

    /// Wrap explicit per-edge costs.
    pub fn from_vec(costs: Vec<f64>) -> Self {
        debug_assert!(costs.iter().all(|c| *c > 0.0), "edge costs must be positive");
        EdgeCosts(costs)
    }

    #[inline]
    pub fn get(&self, edge: EdgeId) -> f64 {
        self.0[edge.index()]
    }

    #[inline]
    pub fn set(&mut self, edge: EdgeId, cost: f64) {
        debug_assert!(cost > 0.0, "edge cost must be positive, got {cost}");
        self.0[edge.index()] = cost;
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.0
    }
}
