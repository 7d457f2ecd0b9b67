//! Plain data row types written by output backends.

use ev_agent::AgentPhase;

/// Published state of one directed edge at a snapshot step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeStateRow {
    pub step:          u64,
    pub edge_id:       u32,
    pub from:          u32,
    pub to:            u32,
    /// Metres per second.
    pub velocity:      f64,
    /// Seconds; also the edge's routing cost.
    pub travel_time:   f64,
    /// Occupancy as a rounded percentage of storage capacity.
    pub occupancy_pct: u32,
}

/// Position and lifecycle phase of one agent at a snapshot step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSnapshotRow {
    pub agent_id: u32,
    pub step:     u64,
    pub phase:    AgentPhase,
    pub x:        f64,
    pub y:        f64,
}

/// Population counters after one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSummaryRow {
    pub step:          u64,
    pub sim_time_secs: f64,
    pub total:         u64,
    pub evacuated:     u64,
    pub dead:          u64,
    pub waiting:       u64,
    pub in_transit:    u64,
}
