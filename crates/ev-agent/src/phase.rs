//! Pedestrian lifecycle.
//!
//! ```text
//!  Unplaced ──► WaitingAtNode ⇄ InTransit
//!                    │              │
//!                    ├──► Evacuated ◄┤
//!                    └──► Dead ◄─────┘
//! ```
//!
//! `Evacuated` and `Dead` are terminal: once entered, the agent is never
//! scheduled again.

use std::fmt;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AgentPhase {
    /// Created but not yet assigned to a node.
    #[default]
    Unplaced,
    /// In a node's resident FIFO, waiting for admission to a link.
    WaitingAtNode,
    /// Queued on a link.
    InTransit,
    Evacuated,
    Dead,
}

impl AgentPhase {
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, AgentPhase::Evacuated | AgentPhase::Dead)
    }

    /// `true` while the agent is still taking part in the evacuation.
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, AgentPhase::WaitingAtNode | AgentPhase::InTransit)
    }

    /// Whether the lifecycle permits moving from `self` to `next`.
    pub fn can_become(self, next: AgentPhase) -> bool {
        use AgentPhase::*;
        match (self, next) {
            (Unplaced, WaitingAtNode)                      => true,
            (WaitingAtNode, InTransit | Evacuated | Dead)  => true,
            (InTransit, WaitingAtNode | Evacuated | Dead)  => true,
            _                                              => false,
        }
    }

    /// Label used in output files.
    pub fn as_str(self) -> &'static str {
        match self {
            AgentPhase::Unplaced      => "unplaced",
            AgentPhase::WaitingAtNode => "waiting",
            AgentPhase::InTransit     => "in_transit",
            AgentPhase::Evacuated     => "evacuated",
            AgentPhase::Dead          => "dead",
        }
    }
}

impl fmt::Display for AgentPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
