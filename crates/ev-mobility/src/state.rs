//! Per-agent movement state.

use ev_core::{EdgeId, NodeId, Point};

/// Upper bound on link progress; an agent never reaches the far node by
/// interpolation alone.
const MAX_PROGRESS: f64 = 1.0 - 1e-9;

/// The movement state for a single agent.
///
/// An agent is either **at a node** (`link == None`, `curr_node` set) or
/// **on a link** (`link == Some(edge)` from `curr_node` to `next_node`).
/// `curr_node` only changes when the link releases the agent.
#[derive(Debug, Clone, PartialEq)]
pub struct MovementState {
    /// Node the agent is at, or the source of the link it occupies.
    /// `NodeId::INVALID` until placed.
    pub curr_node: NodeId,

    /// Next node along the route, or the target of the occupied link.
    pub next_node: Option<NodeId>,

    /// Planned node sequence ending at the destination.  Empty when no route
    /// has been computed (or the agent has no destination).
    pub route: Vec<NodeId>,

    /// Index of `curr_node` within `route`.
    pub route_idx: usize,

    /// Link currently occupied.
    pub link: Option<EdgeId>,

    /// Simulated time at which the agent entered `link`.
    pub enter_secs: f64,

    /// Fraction of `link` covered so far, in `[0, 1)`.
    pub progress: f64,

    /// Interpolated position for telemetry.
    pub pos: Point,
}

impl MovementState {
    /// State of an agent that has not been placed yet.
    pub fn unplaced() -> Self {
        Self {
            curr_node:  NodeId::INVALID,
            next_node:  None,
            route:      Vec::new(),
            route_idx:  0,
            link:       None,
            enter_secs: 0.0,
            progress:   0.0,
            pos:        Point::default(),
        }
    }

    /// Stationary at `node`.
    pub fn at_node(node: NodeId, pos: Point) -> Self {
        Self { curr_node: node, pos, ..Self::unplaced() }
    }

    #[inline]
    pub fn is_placed(&self) -> bool {
        self.curr_node != NodeId::INVALID
    }

    #[inline]
    pub fn in_transit(&self) -> bool {
        self.link.is_some()
    }

    #[inline]
    pub fn has_route(&self) -> bool {
        !self.route.is_empty()
    }

    /// Install a freshly computed route.
    ///
    /// At a node the route starts at `curr_node`; on a link it starts at the
    /// link's target, which stays `next_node` until release.
    pub fn set_route(&mut self, nodes: Vec<NodeId>) {
        self.route = nodes;
        self.route_idx = 0;
        if self.link.is_none() {
            self.next_node = self.route.get(1).copied();
        }
    }

    pub fn clear_route(&mut self) {
        self.route.clear();
        self.route_idx = 0;
        if self.link.is_none() {
            self.next_node = None;
        }
    }

    /// Node at the end of the current route.
    pub fn route_end(&self) -> Option<NodeId> {
        self.route.last().copied()
    }

    /// Step onto `edge` toward `to` at simulated time `now_secs`.
    pub fn enter_link(&mut self, edge: EdgeId, to: NodeId, now_secs: f64) {
        self.link = Some(edge);
        self.next_node = Some(to);
        self.enter_secs = now_secs;
        self.progress = 0.0;
    }

    /// Land on `node` after the occupied link released the agent.
    ///
    /// `next_node` becomes the route entry after `node`, or `None` when the
    /// route ends here or does not pass through `node`.
    pub fn arrive_at(&mut self, node: NodeId, pos: Point) {
        self.curr_node = node;
        self.link = None;
        self.progress = 0.0;
        self.pos = pos;

        let found = self
            .route
            .iter()
            .skip(self.route_idx)
            .position(|&n| n == node)
            .map(|off| self.route_idx + off);
        match found {
            Some(i) => {
                self.route_idx = i;
                self.next_node = self.route.get(i + 1).copied();
            }
            None => self.clear_route(),
        }
    }

    /// Leave the network (evacuated or dead); the route is no longer needed.
    pub fn retire(&mut self) {
        self.link = None;
        self.next_node = None;
        self.route.clear();
        self.route_idx = 0;
        self.progress = 0.0;
    }

    /// Move `velocity · dt` metres further along a link of `length_m` running
    /// from `from` to `to`, and re-interpolate `pos`.
    pub fn advance_position(&mut self, dt: f64, velocity: f64, length_m: f64, from: Point, to: Point) {
        if from.same_position(to) || length_m <= 0.0 {
            self.pos = from;
            return;
        }
        let fraction = (velocity * dt / length_m).clamp(0.0, MAX_PROGRESS);
        self.progress = (self.progress + fraction).min(MAX_PROGRESS);
        self.pos = from.lerp(to, self.progress);
    }
}

impl Default for MovementState {
    fn default() -> Self {
        Self::unplaced()
    }
}
