//! Unit tests for ev-spatial.
//!
//! All tests use hand-crafted networks in a metric plane.

#[cfg(test)]
mod helpers {
    use ev_core::{LinkParams, NodeId, Point};
    use crate::{EdgeCosts, StreetNetwork, StreetNetworkBuilder};

    /// Small grid:
    ///
    ///   0:(0,0)   1:(100,0)   2:(200,0)
    ///   3:(0,100)             4:(200,100)
    ///
    /// Two-way streets: 0-1, 1-2, 2-4 (100 m each), 0-3 (500 m), 3-4 (100 m).
    /// Free-flow shortest path 0→4 is 0→1→2→4 (300 m) vs 0→3→4 (600 m).
    pub fn grid_network() -> (StreetNetwork, [NodeId; 5]) {
        let mut b = StreetNetworkBuilder::new();
        let n0 = b.add_node(Point::new(0.0, 0.0));
        let n1 = b.add_node(Point::new(100.0, 0.0));
        let n2 = b.add_node(Point::new(200.0, 0.0));
        let n3 = b.add_node(Point::new(0.0, 100.0));
        let n4 = b.add_node(Point::new(200.0, 100.0));

        b.add_street(n0, n1, 100.0, 2.0);
        b.add_street(n1, n2, 100.0, 2.0);
        b.add_street(n2, n4, 100.0, 2.0);
        b.add_street(n0, n3, 500.0, 2.0);
        b.add_street(n3, n4, 100.0, 2.0);

        (b.build().unwrap(), [n0, n1, n2, n3, n4])
    }

    pub fn free_flow(net: &StreetNetwork) -> EdgeCosts {
        EdgeCosts::free_flow(net, &LinkParams::default())
    }
}

// ── Builder & network structure ────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use ev_core::{NodeId, Point, RoadClass};
    use crate::{SpatialError, StreetNetworkBuilder};

    #[test]
    fn empty_build() {
        let net = StreetNetworkBuilder::new().build().unwrap();
        assert_eq!(net.node_count(), 0);
        assert_eq!(net.edge_count(), 0);
        assert!(net.is_empty());
    }

    #[test]
    fn out_edges_sorted_by_target() {
        let mut b = StreetNetworkBuilder::new();
        let a = b.add_node(Point::new(0.0, 0.0));
        let c = b.add_node(Point::new(10.0, 0.0));
        let d = b.add_node(Point::new(20.0, 0.0));
        // Added in descending target order on purpose.
        b.add_directed_street(a, d, 20.0, 2.0);
        b.add_directed_street(a, c, 10.0, 2.0);
        let net = b.build().unwrap();

        let targets: Vec<NodeId> = net.out_edges(a).map(|e| net.edge_to[e.index()]).collect();
        assert_eq!(targets, vec![c, d]);
        assert_eq!(net.out_degree(c), 0);
    }

    #[test]
    fn parallel_edges_keep_insertion_order() {
        let mut b = StreetNetworkBuilder::new();
        let a = b.add_node(Point::new(0.0, 0.0));
        let c = b.add_node(Point::new(10.0, 0.0));
        b.add_directed_street(a, c, 10.0, 2.0);
        b.add_directed_street(a, c, 10.0, 4.0);
        let net = b.build().unwrap();

        let widths: Vec<f64> = net.edges_between(a, c).map(|e| net.edge_width_m[e.index()]).collect();
        assert_eq!(widths, vec![2.0, 4.0]);
    }

    #[test]
    fn class_lookup_sets_width() {
        let mut b = StreetNetworkBuilder::new();
        let a = b.add_node(Point::new(0.0, 0.0));
        let c = b.add_node(Point::new(10.0, 0.0));
        b.add_street_of_class(a, c, 10.0, RoadClass::Primary);
        let net = b.build().unwrap();
        for e in net.edge_ids() {
            assert_eq!(net.edge_width_m[e.index()], RoadClass::Primary.width_m());
            assert_eq!(net.edge_class[e.index()], RoadClass::Primary);
        }
    }

    #[test]
    fn rejects_zero_length() {
        let mut b = StreetNetworkBuilder::new();
        let a = b.add_node(Point::new(0.0, 0.0));
        let c = b.add_node(Point::new(0.0, 0.0));
        b.add_directed_street(a, c, 0.0, 2.0);
        assert!(matches!(b.build(), Err(SpatialError::InvalidEdge { .. })));
    }

    #[test]
    fn rejects_unknown_endpoint() {
        let mut b = StreetNetworkBuilder::new();
        let a = b.add_node(Point::new(0.0, 0.0));
        b.add_directed_street(a, NodeId(9), 10.0, 2.0);
        assert!(matches!(b.build(), Err(SpatialError::NodeNotFound(NodeId(9)))));
    }
}

// ── Regions ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod region {
    use ev_core::Point;
    use crate::{Polygon, Region, SpatialError};

    #[test]
    fn rect_contains_interior_and_boundary() {
        let r = Region::from(Polygon::rect(Point::new(0.0, 0.0), Point::new(10.0, 10.0)));
        assert!(r.contains(Point::new(5.0, 5.0)));
        assert!(r.contains(Point::new(0.0, 5.0)));
        assert!(r.contains(Point::new(10.0, 10.0)));
        assert!(!r.contains(Point::new(10.1, 5.0)));
    }

    #[test]
    fn concave_polygon() {
        // L-shape: the notch at (7.5, 7.5) is outside.
        let l: Region = "0 0;10 0;10 5;5 5;5 10;0 10".parse().unwrap();
        assert!(l.contains(Point::new(2.0, 8.0)));
        assert!(l.contains(Point::new(8.0, 2.0)));
        assert!(!l.contains(Point::new(7.5, 7.5)));
    }

    #[test]
    fn multi_ring_parse_and_bbox() {
        let r: Region = "0 0;1 0;1 1 | 5 5;6 5;6 6".parse().unwrap();
        assert_eq!(r.polygons.len(), 2);
        let (lo, hi) = r.bbox().unwrap();
        assert_eq!(lo, Point::new(0.0, 0.0));
        assert_eq!(hi, Point::new(6.0, 6.0));
    }

    #[test]
    fn parse_errors() {
        assert!(matches!("0 0;1 1".parse::<Region>(), Err(SpatialError::InvalidRegion(_))));
        assert!(matches!("0 0;1 x;2 2".parse::<Region>(), Err(SpatialError::InvalidRegion(_))));
    }
}

// ── Spatial queries ───────────────────────────────────────────────────────────

#[cfg(test)]
mod queries {
    use ev_core::Point;
    use crate::{Polygon, Region, StreetNetworkBuilder};

    #[test]
    fn nodes_in_region_sorted() {
        let (net, [n0, n1, _, n3, _]) = super::helpers::grid_network();
        let left = Region::from(Polygon::rect(Point::new(-1.0, -1.0), Point::new(150.0, 150.0)));
        assert_eq!(net.nodes_in_region(&left), vec![n0, n1, n3]);
    }

    #[test]
    fn empty_region_finds_nothing() {
        let (net, _) = super::helpers::grid_network();
        let far = Region::from(Polygon::rect(Point::new(1e6, 1e6), Point::new(1e6 + 1.0, 1e6 + 1.0)));
        assert!(net.nodes_in_region(&far).is_empty());
        assert!(net.nodes_in_region(&Region::default()).is_empty());
    }

    #[test]
    fn nearest_node() {
        let (net, [n0, n1, ..]) = super::helpers::grid_network();
        assert_eq!(net.nearest_node(Point::new(40.0, 0.0)), Some(n0));
        assert_eq!(net.nearest_node(Point::new(60.0, 0.0)), Some(n1));
        let empty = StreetNetworkBuilder::new().build().unwrap();
        assert_eq!(empty.nearest_node(Point::new(0.0, 0.0)), None);
    }
}

// ── Dijkstra routing ──────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use ev_core::{NodeId, Point};
    use crate::{DijkstraRouter, EdgeCosts, Router, SpatialError, StreetNetworkBuilder};

    #[test]
    fn trivial_same_node() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        let costs = super::helpers::free_flow(&net);
        let r = DijkstraRouter.route(&net, &costs, n0, n0).unwrap();
        assert!(r.is_trivial());
        assert_eq!(r.nodes, vec![n0]);
        assert_eq!(r.total_cost_secs, 0.0);
    }

    #[test]
    fn shortest_path_free_flow() {
        let (net, [n0, n1, n2, _, n4]) = super::helpers::grid_network();
        let costs = super::helpers::free_flow(&net);
        let route = DijkstraRouter.route(&net, &costs, n0, n4).unwrap();

        assert_eq!(route.nodes, vec![n0, n1, n2, n4]);
        assert_eq!(route.edges.len(), 3);
        assert!((route.total_cost_secs - 300.0 / 1.66).abs() < 1e-9);
        for (i, e) in route.edges.iter().enumerate() {
            assert_eq!(net.endpoints(*e), (route.nodes[i], route.nodes[i + 1]));
        }
    }

    #[test]
    fn congestion_diverts_route() {
        let (net, [n0, n1, n2, n3, n4]) = super::helpers::grid_network();
        let mut costs = super::helpers::free_flow(&net);
        // Make 1→2 very slow.
        let slow = net.edges_between(n1, n2).next().unwrap();
        costs.set(slow, 10_000.0);
        let route = DijkstraRouter.route(&net, &costs, n0, n4).unwrap();
        assert_eq!(route.nodes, vec![n0, n3, n4]);
    }

    #[test]
    fn picks_cheaper_parallel_edge() {
        let mut b = StreetNetworkBuilder::new();
        let a = b.add_node(Point::new(0.0, 0.0));
        let c = b.add_node(Point::new(10.0, 0.0));
        b.add_directed_street(a, c, 10.0, 2.0);
        b.add_directed_street(a, c, 10.0, 2.0);
        let net = b.build().unwrap();
        let parallel: Vec<_> = net.edges_between(a, c).collect();
        let costs = EdgeCosts::from_vec(vec![9.0, 3.0]);
        let route = DijkstraRouter.route(&net, &costs, a, c).unwrap();
        assert_eq!(route.edges, vec![parallel[1]]);
        assert_eq!(route.total_cost_secs, 3.0);
    }

    #[test]
    fn no_route_disconnected() {
        let mut b = StreetNetworkBuilder::new();
        let a = b.add_node(Point::new(0.0, 0.0));
        let c = b.add_node(Point::new(1.0, 0.0));
        let net = b.build().unwrap();
        let costs = super::helpers::free_flow(&net);
        let result = DijkstraRouter.route(&net, &costs, a, c);
        assert!(matches!(result, Err(SpatialError::NoRoute { .. })));
    }

    #[test]
    fn one_way_blocks_return() {
        let mut b = StreetNetworkBuilder::new();
        let a = b.add_node(Point::new(0.0, 0.0));
        let c = b.add_node(Point::new(0.0, 1.0));
        b.add_directed_street(a, c, 100.0, 2.0);
        let net = b.build().unwrap();
        let costs = super::helpers::free_flow(&net);
        assert!(DijkstraRouter.route(&net, &costs, a, c).is_ok());
        assert!(DijkstraRouter.route(&net, &costs, c, a).is_err());
    }

    #[test]
    fn unknown_node_errors() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        let costs = super::helpers::free_flow(&net);
        let result = DijkstraRouter.route(&net, &costs, n0, NodeId(99));
        assert!(matches!(result, Err(SpatialError::NodeNotFound(NodeId(99)))));
    }

    #[test]
    fn unset_destination_is_config_error() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        let costs = super::helpers::free_flow(&net);
        let err = DijkstraRouter.shortest_path(&net, &costs, n0, None).unwrap_err();
        assert!(matches!(err, SpatialError::NoDestination { .. }));
        assert!(err.is_config());
    }

    #[test]
    fn route_many_preserves_order() {
        let (net, [n0, n1, n2, n3, n4]) = super::helpers::grid_network();
        let costs = super::helpers::free_flow(&net);
        let isolated = NodeId(42);
        let pairs = [(n4, n0), (n0, n1), (n0, isolated), (n3, n2)];
        let routes = DijkstraRouter.route_many(&net, &costs, &pairs);

        assert_eq!(routes.len(), 4);
        assert_eq!(routes[0].as_ref().unwrap().destination(), Some(n0));
        assert_eq!(routes[1].as_ref().unwrap().nodes, vec![n0, n1]);
        assert!(routes[2].is_err());
        assert_eq!(routes[3].as_ref().unwrap().origin(), Some(n3));
    }
}
