//! Street network representation and builder.
//!
//! # Data layout
//!
//! The graph is a directed multigraph in **Compressed Sparse Row (CSR)**
//! format.  Given a `NodeId n`, its outgoing edges occupy the `EdgeId` range:
//!
//! ```text
//! node_out_start[n] .. node_out_start[n+1]
//! ```
//!
//! Edges are sorted stably by `(from, to)`, so a node's outgoing edges are
//! enumerated in ascending target order, and parallel edges keep the order in
//! which they were added.  Link selection relies on this order for ties.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) over node coordinates answers region membership
//! queries during population seeding and nearest-node snapping.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use ev_core::{EdgeId, NodeId, Point, RoadClass};

use crate::{Region, SpatialError, SpatialResult};

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2],
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── StreetNetwork ─────────────────────────────────────────────────────────────

/// Directed street graph in CSR format plus a spatial index over its nodes.
///
/// The structure is immutable once built.  Everything that changes during a
/// run (link queues, edge costs, resident agents) lives outside it, indexed by
/// the same dense `NodeId`/`EdgeId` values.
pub struct StreetNetwork {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Planar position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<Point>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId) ─────────────────────────────────────
    pub edge_from: Vec<NodeId>,
    pub edge_to: Vec<NodeId>,
    /// Length in metres.
    pub edge_length_m: Vec<f64>,
    /// Narrowest usable width in metres.
    pub edge_width_m: Vec<f64>,
    /// Street category the width was derived from (`Unclassified` when the
    /// width was supplied directly).
    pub edge_class: Vec<RoadClass>,

    spatial_idx: RTree<NodeEntry>,
}

impl StreetNetwork {
    /// Construct an empty network with no nodes or edges.
    pub fn empty() -> Self {
        StreetNetwork {
            node_pos:       Vec::new(),
            node_out_start: vec![0],
            edge_from:      Vec::new(),
            edge_to:        Vec::new(),
            edge_length_m:  Vec::new(),
            edge_width_m:   Vec::new(),
            edge_class:     Vec::new(),
            spatial_idx:    RTree::new(),
        }
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    #[inline]
    pub fn contains_node(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    /// Iterator over every `NodeId` in ascending order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.node_count() as u32).map(NodeId)
    }

    /// Iterator over every `EdgeId` in ascending order.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.edge_count() as u32).map(EdgeId)
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Outgoing edges of `node`, in enumeration order (ascending target).
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// All parallel edges from `from` to `to`.
    pub fn edges_between(&self, from: NodeId, to: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.out_edges(from).filter(move |e| self.edge_to[e.index()] == to)
    }

    #[inline]
    pub fn endpoints(&self, edge: EdgeId) -> (NodeId, NodeId) {
        (self.edge_from[edge.index()], self.edge_to[edge.index()])
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Nearest node to `pos`; `None` only if the network has no nodes.
    pub fn nearest_node(&self, pos: Point) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.x, pos.y])
            .map(|e| e.id)
    }

    /// Every node whose position lies inside `region` (boundary included),
    /// in ascending `NodeId` order.
    pub fn nodes_in_region(&self, region: &Region) -> Vec<NodeId> {
        let Some((min, max)) = region.bbox() else {
            return Vec::new();
        };
        let envelope = AABB::from_corners([min.x, min.y], [max.x, max.y]);
        let mut nodes: Vec<NodeId> = self
            .spatial_idx
            .locate_in_envelope(&envelope)
            .filter(|e| region.contains(Point::new(e.point[0], e.point[1])))
            .map(|e| e.id)
            .collect();
        nodes.sort_unstable();
        nodes
    }
}

// ── StreetNetworkBuilder ──────────────────────────────────────────────────────

/// Construct a [`StreetNetwork`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use ev_core::{Point, RoadClass};
/// use ev_spatial::StreetNetworkBuilder;
///
/// let mut b = StreetNetworkBuilder::new();
/// let a = b.add_node(Point::new(0.0, 0.0));
/// let c = b.add_node(Point::new(120.0, 0.0));
/// b.add_street_of_class(a, c, 120.0, RoadClass::Residential);
/// let net = b.build().unwrap();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.edge_count(), 2); // bidirectional
/// ```
pub struct StreetNetworkBuilder {
    nodes:     Vec<Point>,
    raw_edges: Vec<RawEdge>,
}

struct RawEdge {
    from:     NodeId,
    to:       NodeId,
    length_m: f64,
    width_m:  f64,
    class:    RoadClass,
}

impl StreetNetworkBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), raw_edges: Vec::new() }
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes:     Vec::with_capacity(nodes),
            raw_edges: Vec::with_capacity(edges),
        }
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: Point) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        id
    }

    /// Add a **directed** edge with an explicit width.
    pub fn add_directed_street(&mut self, from: NodeId, to: NodeId, length_m: f64, width_m: f64) {
        self.raw_edges.push(RawEdge { from, to, length_m, width_m, class: RoadClass::Unclassified });
    }

    /// Add edges in both directions for a two-way street segment.
    pub fn add_street(&mut self, a: NodeId, b: NodeId, length_m: f64, width_m: f64) {
        self.add_directed_street(a, b, length_m, width_m);
        self.add_directed_street(b, a, length_m, width_m);
    }

    /// Add a two-way street whose width comes from the road-class lookup.
    pub fn add_street_of_class(&mut self, a: NodeId, b: NodeId, length_m: f64, class: RoadClass) {
        let width_m = class.width_m();
        self.raw_edges.push(RawEdge { from: a, to: b, length_m, width_m, class });
        self.raw_edges.push(RawEdge { from: b, to: a, length_m, width_m, class });
    }

    /// Look up the position of a node added earlier.
    pub fn node_pos(&self, id: NodeId) -> Point {
        self.nodes[id.index()]
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`StreetNetwork`].
    ///
    /// # Errors
    ///
    /// [`SpatialError::NodeNotFound`] for an edge endpoint that was never
    /// added, [`SpatialError::InvalidEdge`] for a non-positive length or width.
    pub fn build(self) -> SpatialResult<StreetNetwork> {
        let node_count = self.nodes.len();

        let mut raw = self.raw_edges;
        // Stable: parallel edges keep insertion order.
        raw.sort_by_key(|e| (e.from.0, e.to.0));

        for (i, e) in raw.iter().enumerate() {
            for n in [e.from, e.to] {
                if n.index() >= node_count {
                    return Err(SpatialError::NodeNotFound(n));
                }
            }
            let reason = if !(e.length_m.is_finite() && e.length_m > 0.0) {
                Some("length must be positive")
            } else if !(e.width_m.is_finite() && e.width_m > 0.0) {
                Some("width must be positive")
            } else {
                None
            };
            if let Some(reason) = reason {
                return Err(SpatialError::InvalidEdge {
                    edge: EdgeId(i as u32),
                    from: e.from,
                    to:   e.to,
                    reason,
                });
            }
        }

        let edge_from:     Vec<NodeId>    = raw.iter().map(|e| e.from).collect();
        let edge_to:       Vec<NodeId>    = raw.iter().map(|e| e.to).collect();
        let edge_length_m: Vec<f64>       = raw.iter().map(|e| e.length_m).collect();
        let edge_width_m:  Vec<f64>       = raw.iter().map(|e| e.width_m).collect();
        let edge_class:    Vec<RoadClass> = raw.iter().map(|e| e.class).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, raw.len());

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &pos)| NodeEntry { point: [pos.x, pos.y], id: NodeId(i as u32) })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        Ok(StreetNetwork {
            node_pos: self.nodes,
            node_out_start,
            edge_from,
            edge_to,
            edge_length_m,
            edge_width_m,
            edge_class,
            spatial_idx,
        })
    }
}

impl Default for StreetNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
