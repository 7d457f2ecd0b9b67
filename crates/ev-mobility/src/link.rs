//! Per-edge capacity/flow/velocity model.
//!
//! # Derived quantities
//!
//! For a link of length `l` and width `w`:
//!
//! ```text
//! area                a = l · w
//! storage capacity    c = max(1, floor(a · max_density))   agents held at once
//! flow capacity       q = w · max_capacity                 agents released per second
//! velocity            v ∈ (0, max_speed]
//! travel time         t = l / v
//! ```
//!
//! Velocity degrades with occupancy `p = len / c` as `v = min(max_speed, K / p)`
//! with `K = (q / c) · l`; an empty link runs at `max_speed`.
//!
//! All times are simulated seconds (`k · T`), never wall-clock.

use std::collections::VecDeque;

use ev_core::{AgentId, LinkParams};

/// Slack for comparing accumulated simulated times.
const TIME_EPS: f64 = 1e-9;

/// Result of [`Link::enqueue`].  `Full` is backpressure, not an error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Admission {
    Admitted,
    Full,
}

impl Admission {
    #[inline]
    pub fn is_admitted(self) -> bool {
        self == Admission::Admitted
    }
}

/// One queued agent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct QueueEntry {
    pub agent:       AgentId,
    /// Simulated time of admission.
    pub enter_secs:  f64,
    /// Link travel time at the moment of admission.
    pub travel_secs: f64,
}

impl QueueEntry {
    /// Earliest simulated time at which the agent may leave.
    #[inline]
    pub fn due_secs(&self) -> f64 {
        self.enter_secs + self.travel_secs
    }

    #[inline]
    pub fn is_due(&self, now_secs: f64) -> bool {
        now_secs + TIME_EPS >= self.due_secs()
    }
}

// ── Link ──────────────────────────────────────────────────────────────────────

/// Queueing and congestion state of one directed edge.
#[derive(Clone, Debug)]
pub struct Link {
    pub length_m: f64,
    pub width_m:  f64,
    pub area_m2:  f64,
    pub params:   LinkParams,

    storage_capacity: usize,
    flow_capacity:    f64,
    velocity:         f64,
    travel_time:      f64,
    queue:            VecDeque<QueueEntry>,
}

impl Link {
    /// A free-flowing, empty link.
    pub fn new(length_m: f64, width_m: f64, params: LinkParams) -> Self {
        let area_m2 = length_m * width_m;
        let storage_capacity = ((area_m2 * params.max_density).floor() as usize).max(1);
        Self {
            length_m,
            width_m,
            area_m2,
            params,
            storage_capacity,
            flow_capacity: width_m * params.max_capacity,
            velocity:      params.max_speed,
            travel_time:   length_m / params.max_speed,
            queue:         VecDeque::new(),
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// `c`: maximum number of agents held simultaneously.
    #[inline]
    pub fn storage_capacity(&self) -> usize {
        self.storage_capacity
    }

    /// `q`: agents released per simulated second.
    #[inline]
    pub fn flow_capacity(&self) -> f64 {
        self.flow_capacity
    }

    /// Most agents one [`dequeue_eligible`](Self::dequeue_eligible) call may
    /// release: `floor(q)`, but never less than one.
    #[inline]
    pub fn discharge_limit(&self) -> usize {
        (self.flow_capacity.floor() as usize).max(1)
    }

    #[inline]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    #[inline]
    pub fn travel_time(&self) -> f64 {
        self.travel_time
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.queue.len() >= self.storage_capacity
    }

    /// `true` while velocity is below free flow.
    #[inline]
    pub fn is_congested(&self) -> bool {
        self.velocity < self.params.max_speed
    }

    /// Queued entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &QueueEntry> + '_ {
        self.queue.iter()
    }

    pub fn contains(&self, agent: AgentId) -> bool {
        self.queue.iter().any(|e| e.agent == agent)
    }

    // ── Queue operations ──────────────────────────────────────────────────

    /// Admit `agent` at simulated time `now_secs` if there is room.
    pub fn enqueue(&mut self, agent: AgentId, now_secs: f64) -> Admission {
        if self.is_full() {
            return Admission::Full;
        }
        self.queue.push_back(QueueEntry {
            agent,
            enter_secs:  now_secs,
            travel_secs: self.travel_time,
        });
        Admission::Admitted
    }

    /// Remove agents whose travel time has elapsed at `now_secs`, oldest
    /// first, up to [`discharge_limit`](Self::discharge_limit).
    ///
    /// Ineligible entries keep their relative order and do not block eligible
    /// ones behind them.
    pub fn dequeue_eligible(&mut self, now_secs: f64) -> Vec<AgentId> {
        if self.queue.is_empty() {
            return Vec::new();
        }
        let limit = self.discharge_limit();
        let mut released = Vec::new();
        let mut kept = VecDeque::with_capacity(self.queue.len());
        for entry in self.queue.drain(..) {
            if released.len() < limit && entry.is_due(now_secs) {
                released.push(entry.agent);
            } else {
                kept.push_back(entry);
            }
        }
        self.queue = kept;
        released
    }

    /// Drop `agent` from the queue wherever it is.  Returns `false` if it was
    /// not queued here.
    pub fn remove(&mut self, agent: AgentId) -> bool {
        match self.queue.iter().position(|e| e.agent == agent) {
            Some(i) => {
                self.queue.remove(i);
                true
            }
            None => false,
        }
    }

    // ── Congestion model ──────────────────────────────────────────────────

    /// Recompute `v` from the current occupancy.
    pub fn update_velocity(&mut self) -> f64 {
        let occupied = self.queue.len();
        self.velocity = if occupied == 0 {
            self.params.max_speed
        } else {
            let c = self.storage_capacity as f64;
            let p = occupied as f64 / c;
            let k = (self.flow_capacity / c) * self.length_m;
            (k / p).min(self.params.max_speed)
        };
        self.velocity
    }

    /// Recompute `t = l / v` and return it as the edge's new routing cost.
    pub fn update_travel_time(&mut self) -> f64 {
        self.travel_time = self.length_m / self.velocity;
        self.travel_time
    }

    /// Occupancy as a rounded percentage of storage capacity.
    pub fn occupancy_percent(&self) -> u32 {
        (self.queue.len() as f64 / self.storage_capacity as f64 * 100.0).round() as u32
    }
}
