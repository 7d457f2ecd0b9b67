//! Unit tests for ev-population.

#[cfg(test)]
mod helpers {
    use ev_core::{NodeId, Point};
    use ev_spatial::{StreetNetwork, StreetNetworkBuilder};

    /// 4 × 3 lattice of nodes 10 m apart, ids row-major from (0, 0).
    pub fn lattice() -> (StreetNetwork, Vec<NodeId>) {
        let mut b = StreetNetworkBuilder::new();
        let mut ids = Vec::new();
        for y in 0..3 {
            for x in 0..4 {
                ids.push(b.add_node(Point::new(x as f64 * 10.0, y as f64 * 10.0)));
            }
        }
        for y in 0..3 {
            for x in 0..3 {
                b.add_street(ids[y * 4 + x], ids[y * 4 + x + 1], 10.0, 2.0);
            }
        }
        (b.build().unwrap(), ids)
    }
}

// ── Group partition ───────────────────────────────────────────────────────────

#[cfg(test)]
mod partition {
    use crate::seeder::group_sizes;

    #[test]
    fn near_equal_sizes() {
        let sizes: Vec<u32> = group_sizes(10, 3).collect();
        assert_eq!(sizes, vec![4, 3, 3]);
        assert_eq!(group_sizes(10, 3).sum::<u32>(), 10);
    }

    #[test]
    fn exact_division_and_singletons() {
        assert_eq!(group_sizes(8, 4).collect::<Vec<_>>(), vec![2, 2, 2, 2]);
        assert_eq!(group_sizes(3, 3).collect::<Vec<_>>(), vec![1, 1, 1]);
        assert_eq!(group_sizes(5, 0).count(), 0);
    }

    #[test]
    fn sizes_differ_by_at_most_one() {
        for q in 1..60u32 {
            for k in 1..=q.min(12) as usize {
                let sizes: Vec<u32> = group_sizes(q, k).collect();
                let (lo, hi) = (sizes.iter().min().unwrap(), sizes.iter().max().unwrap());
                assert!(hi - lo <= 1, "q={q} k={k}: {sizes:?}");
                assert_eq!(sizes.iter().sum::<u32>(), q);
            }
        }
    }
}

// ── Seeder ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod seeder {
    use std::collections::HashSet;

    use ev_core::{AgentKind, Point, SimRng};
    use ev_spatial::{Polygon, Region};

    use crate::{PopulationRecord, PopulationSeeder};
    use super::helpers::lattice;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Region {
        Polygon::rect(Point::new(x0, y0), Point::new(x1, y1)).into()
    }

    #[test]
    fn more_people_than_nodes_uses_every_node_by_index() {
        let (net, ids) = lattice();
        // Bottom row: 4 nodes.
        let rec = PopulationRecord::new("south", 10, rect(-1.0, -1.0, 31.0, 1.0));
        let plan = PopulationSeeder::new(&net).plan(&[rec], &mut SimRng::new(1));

        let nodes: Vec<_> = plan.groups.iter().map(|g| g.node).collect();
        assert_eq!(nodes, ids[..4].to_vec());
        let sizes: Vec<_> = plan.groups.iter().map(|g| g.size).collect();
        assert_eq!(sizes, vec![3, 3, 2, 2]);
        assert_eq!(plan.agent_count(), 10);
    }

    #[test]
    fn fewer_people_than_nodes_picks_distinct_nodes() {
        let (net, _) = lattice();
        let everywhere = rect(-1.0, -1.0, 100.0, 100.0);
        let rec = PopulationRecord::new("all", 5, everywhere.clone());
        let plan = PopulationSeeder::new(&net).plan(&[rec], &mut SimRng::new(7));

        assert_eq!(plan.groups.len(), 5);
        assert!(plan.groups.iter().all(|g| g.size == 1));
        let distinct: HashSet<_> = plan.groups.iter().map(|g| g.node).collect();
        assert_eq!(distinct.len(), 5);
        assert!(plan.groups.iter().all(|g| everywhere.contains(net.node_pos[g.node.index()])));
    }

    #[test]
    fn same_seed_same_plan() {
        let (net, _) = lattice();
        let recs = vec![PopulationRecord::new("all", 4, rect(-1.0, -1.0, 100.0, 100.0))];
        let seeder = PopulationSeeder::new(&net);
        let a = seeder.plan(&recs, &mut SimRng::new(42));
        let b = seeder.plan(&recs, &mut SimRng::new(42));
        assert_eq!(a, b);
    }

    #[test]
    fn empty_region_is_skipped() {
        let (net, _) = lattice();
        let recs = vec![
            PopulationRecord::new("sea", 50, rect(500.0, 500.0, 600.0, 600.0)),
            PopulationRecord::new("corner", 2, rect(-1.0, -1.0, 1.0, 1.0)),
        ];
        let plan = PopulationSeeder::new(&net).plan(&recs, &mut SimRng::new(0));
        assert_eq!(plan.skipped, vec![0]);
        assert_eq!(plan.groups.len(), 1);
        assert_eq!(plan.groups[0].record, 1);
        assert_eq!(plan.groups[0].size, 2);
    }

    #[test]
    fn zero_quantity_creates_nothing() {
        let (net, _) = lattice();
        let recs = vec![PopulationRecord::new("empty", 0, rect(-1.0, -1.0, 100.0, 100.0))];
        let plan = PopulationSeeder::new(&net).plan(&recs, &mut SimRng::new(0));
        assert!(plan.groups.is_empty());
        assert!(plan.skipped.is_empty());
    }

    #[test]
    fn agent_names_and_kinds() {
        let (net, ids) = lattice();
        let recs = vec![
            PopulationRecord::new("pier", 3, rect(-1.0, -1.0, 11.0, 1.0)).with_kind(AgentKind::Visitor),
        ];
        let plan = PopulationSeeder::new(&net).plan(&recs, &mut SimRng::new(0));
        let agents: Vec<_> = plan.agents().collect();
        assert_eq!(
            agents,
            vec![
                ("pier-0".to_string(), AgentKind::Visitor, ids[0]),
                ("pier-1".to_string(), AgentKind::Visitor, ids[0]),
                ("pier-2".to_string(), AgentKind::Visitor, ids[1]),
            ]
        );
    }
}

// ── CSV loader ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use ev_core::Point;

    use crate::{load_records_reader, PopulationError};

    #[test]
    fn parses_rows_in_order() {
        let csv = "label,quantity,region\n\
                   north,120,0 0;400 0;400 300;0 300\n\
                   harbour,35,500 0;700 0;700 150 | 800 0;900 0;900 80\n";
        let recs = load_records_reader(Cursor::new(csv)).unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].label, "north");
        assert_eq!(recs[0].quantity, 120);
        assert!(recs[0].region.contains(Point::new(200.0, 150.0)));
        assert_eq!(recs[1].region.polygons.len(), 2);
    }

    #[test]
    fn bad_quantity() {
        let csv = "label,quantity,region\nx,lots,0 0;1 0;1 1\n";
        assert!(matches!(load_records_reader(Cursor::new(csv)), Err(PopulationError::Parse(_))));
    }

    #[test]
    fn bad_region_names_the_row() {
        let csv = "label,quantity,region\nok,1,0 0;1 0;1 1\nbroken,2,0 0;1 1\n";
        match load_records_reader(Cursor::new(csv)) {
            Err(PopulationError::Parse(msg)) => assert!(msg.contains("broken"), "{msg}"),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file() {
        let err = crate::load_records_csv(std::path::Path::new("/nonexistent/pop.csv")).unwrap_err();
        assert!(matches!(err, PopulationError::Io(_)));
    }
}
