//! Core agent storage.
//!
//! Every `Vec` field has exactly `count` elements and the `AgentId` value is
//! the index into all of them:
//!
//! ```ignore
//! let home = store.orig_node[agent.index()];
//! ```

use ev_core::{AgentId, AgentKind, NodeId};

use crate::{AgentError, AgentPhase, AgentResult};

/// Structure-of-Arrays storage for pedestrian identity and lifecycle.
///
/// Agents are appended by the population seeder and never removed; a
/// terminal phase marks them as finished instead, so `AgentId`s stay dense
/// and stable for the whole run.
#[derive(Default)]
pub struct AgentStore {
    /// Number of agents.  Equals the length of every SoA `Vec`.
    pub count: usize,

    /// Display name, `<label>-<n>` for seeded agents.
    pub name: Vec<String>,
    pub kind: Vec<AgentKind>,

    /// Node the agent was seeded at.  `NodeId::INVALID` while `Unplaced`.
    pub orig_node: Vec<NodeId>,
    /// Shelter the agent walks to.  `None` until assigned externally.
    pub dest_node: Vec<Option<NodeId>>,

    phase: Vec<AgentPhase>,
}

/// Number of agents in each lifecycle phase.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhaseCounts {
    pub unplaced:   usize,
    pub waiting:    usize,
    pub in_transit: usize,
    pub evacuated:  usize,
    pub dead:       usize,
}

impl PhaseCounts {
    pub fn total(&self) -> usize {
        self.unplaced + self.waiting + self.in_transit + self.evacuated + self.dead
    }

    /// `evacuated + dead`.
    pub fn finished(&self) -> usize {
        self.evacuated + self.dead
    }
}

impl AgentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            count:     0,
            name:      Vec::with_capacity(capacity),
            kind:      Vec::with_capacity(capacity),
            orig_node: Vec::with_capacity(capacity),
            dest_node: Vec::with_capacity(capacity),
            phase:     Vec::with_capacity(capacity),
        }
    }

    /// Append a new `Unplaced` agent and return its id.
    pub fn spawn(&mut self, name: impl Into<String>, kind: AgentKind) -> AgentId {
        let id = AgentId(self.count as u32);
        self.name.push(name.into());
        self.kind.push(kind);
        self.orig_node.push(NodeId::INVALID);
        self.dest_node.push(None);
        self.phase.push(AgentPhase::Unplaced);
        self.count += 1;
        id
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn contains(&self, agent: AgentId) -> bool {
        agent.index() < self.count
    }

    /// Iterator over all `AgentId`s in ascending index order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.count as u32).map(AgentId)
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    #[inline]
    pub fn phase(&self, agent: AgentId) -> AgentPhase {
        self.phase[agent.index()]
    }

    pub fn phases(&self) -> &[AgentPhase] {
        &self.phase
    }

    /// Move `agent` to `next`, rejecting transitions the lifecycle forbids.
    pub fn transition(&mut self, agent: AgentId, next: AgentPhase) -> AgentResult<()> {
        let slot = self
            .phase
            .get_mut(agent.index())
            .ok_or(AgentError::NotFound(agent))?;
        if !slot.can_become(next) {
            return Err(AgentError::IllegalTransition { agent, from: *slot, to: next });
        }
        *slot = next;
        Ok(())
    }

    /// Record the seeding node and move the agent to `WaitingAtNode`.
    pub fn place(&mut self, agent: AgentId, node: NodeId) -> AgentResult<()> {
        self.transition(agent, AgentPhase::WaitingAtNode)?;
        self.orig_node[agent.index()] = node;
        Ok(())
    }

    pub fn set_destination(&mut self, agent: AgentId, dest: Option<NodeId>) -> AgentResult<()> {
        let slot = self
            .dest_node
            .get_mut(agent.index())
            .ok_or(AgentError::NotFound(agent))?;
        *slot = dest;
        Ok(())
    }

    #[inline]
    pub fn destination(&self, agent: AgentId) -> Option<NodeId> {
        self.dest_node[agent.index()]
    }

    #[inline]
    pub fn is_evacuated(&self, agent: AgentId) -> bool {
        self.phase[agent.index()] == AgentPhase::Evacuated
    }

    #[inline]
    pub fn is_dead(&self, agent: AgentId) -> bool {
        self.phase[agent.index()] == AgentPhase::Dead
    }

    #[inline]
    pub fn is_active(&self, agent: AgentId) -> bool {
        self.phase[agent.index()].is_active()
    }

    /// Agents still waiting or in transit, ascending.
    pub fn active_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.agent_ids().filter(|&a| self.is_active(a))
    }

    pub fn counts(&self) -> PhaseCounts {
        let mut c = PhaseCounts::default();
        for p in &self.phase {
            match p {
                AgentPhase::Unplaced      => c.unplaced += 1,
                AgentPhase::WaitingAtNode => c.waiting += 1,
                AgentPhase::InTransit     => c.in_transit += 1,
                AgentPhase::Evacuated     => c.evacuated += 1,
                AgentPhase::Dead          => c.dead += 1,
            }
        }
        c
    }
}
