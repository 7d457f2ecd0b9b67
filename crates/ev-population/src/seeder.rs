//! Region-to-node seeding.

use tracing::{info, warn};

use ev_core::{AgentKind, NodeId, SimRng};
use ev_spatial::StreetNetwork;

use crate::PopulationRecord;

/// A group of agents from one record placed on one node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedGroup {
    /// Index of the originating record.
    pub record: usize,
    pub label:  String,
    pub kind:   AgentKind,
    pub node:   NodeId,
    pub size:   u32,
    /// Per-record sequence number of the group's first agent.
    pub first:  u32,
}

impl SeedGroup {
    /// Agent names in this group: `<label>-<first>`, `<label>-<first+1>`, …
    pub fn names(&self) -> impl Iterator<Item = String> + '_ {
        (self.first..self.first + self.size).map(move |n| format!("{}-{n}", self.label))
    }
}

/// The full placement decided for a set of records.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SeedPlan {
    pub groups:  Vec<SeedGroup>,
    /// Records whose region contained no node.
    pub skipped: Vec<usize>,
}

impl SeedPlan {
    /// Total number of agents the plan creates.
    pub fn agent_count(&self) -> usize {
        self.groups.iter().map(|g| g.size as usize).sum()
    }

    /// `(name, kind, node)` for every agent in seeding order.
    pub fn agents(&self) -> impl Iterator<Item = (String, AgentKind, NodeId)> + '_ {
        self.groups
            .iter()
            .flat_map(|g| g.names().map(move |name| (name, g.kind, g.node)))
    }
}

/// Places population records onto a street network.
pub struct PopulationSeeder<'a> {
    network: &'a StreetNetwork,
}

impl<'a> PopulationSeeder<'a> {
    pub fn new(network: &'a StreetNetwork) -> Self {
        Self { network }
    }

    /// Decide group sizes and nodes for every record.
    ///
    /// `rng` is only consulted for records whose region holds more nodes than
    /// people, so the same seed always yields the same plan.
    pub fn plan(&self, records: &[PopulationRecord], rng: &mut SimRng) -> SeedPlan {
        let mut plan = SeedPlan::default();
        for (i, record) in records.iter().enumerate() {
            let nodes = self.network.nodes_in_region(&record.region);
            if nodes.is_empty() {
                warn!(record = %record.label, "no street node inside region; skipping");
                plan.skipped.push(i);
                continue;
            }
            if record.quantity == 0 {
                continue;
            }

            let quantity = record.quantity as usize;
            let k = quantity.min(nodes.len());
            let chosen: Vec<NodeId> = if nodes.len() <= quantity {
                nodes[..k].to_vec()
            } else {
                rng.sample_indices(nodes.len(), k).into_iter().map(|j| nodes[j]).collect()
            };

            let mut first = 0u32;
            for (size, node) in group_sizes(record.quantity, k).zip(chosen) {
                plan.groups.push(SeedGroup {
                    record: i,
                    label:  record.label.clone(),
                    kind:   record.kind,
                    node,
                    size,
                    first,
                });
                first += size;
            }
            info!(record = %record.label, agents = record.quantity, nodes = k, "seeded population");
        }
        plan
    }
}

/// Split `quantity` into `k` near-equal parts; the first `quantity % k`
/// parts get one extra.
pub(crate) fn group_sizes(quantity: u32, k: usize) -> impl Iterator<Item = u32> {
    let k32 = k as u32;
    let (base, extra) = if k32 == 0 { (0, 0) } else { (quantity / k32, quantity % k32) };
    (0..k32).map(move |i| base + u32::from(i < extra))
}
