//! Integration tests for ev-output.

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use ev_agent::AgentPhase;

    use crate::csv::CsvWriter;
    use crate::row::{AgentSnapshotRow, EdgeStateRow, StepSummaryRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn read_all(path: &std::path::Path) -> Vec<csv::StringRecord> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.records().map(|r| r.unwrap()).collect()
    }

    fn headers(path: &std::path::Path) -> Vec<String> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.headers().unwrap().iter().map(str::to_owned).collect()
    }

    #[test]
    fn csv_files_created_in_missing_dir() {
        let dir = tmp();
        let out = dir.path().join("nested/out");
        let _w = CsvWriter::new(&out).unwrap();
        assert!(out.join("edge_states.csv").exists());
        assert!(out.join("agent_snapshots.csv").exists());
        assert!(out.join("step_summaries.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        assert_eq!(
            headers(&dir.path().join("edge_states.csv")),
            ["step", "edge_id", "from", "to", "velocity", "travel_time", "occupancy_pct"]
        );
        assert_eq!(headers(&dir.path().join("agent_snapshots.csv")), ["agent_id", "step", "phase", "x", "y"]);
        assert_eq!(
            headers(&dir.path().join("step_summaries.csv")),
            ["step", "sim_time_secs", "total", "evacuated", "dead", "waiting", "in_transit"]
        );
    }

    #[test]
    fn csv_edge_rows() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_edge_states(&[EdgeStateRow {
            step: 4, edge_id: 7, from: 1, to: 2, velocity: 0.83, travel_time: 120.5, occupancy_pct: 40,
        }])
        .unwrap();
        w.finish().unwrap();

        let rows = read_all(&dir.path().join("edge_states.csv"));
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][1], "7");
        assert_eq!(rows[0][4].parse::<f64>().unwrap(), 0.83);
        assert_eq!(rows[0][5].parse::<f64>().unwrap(), 120.5);
        assert_eq!(&rows[0][6], "40");
    }

    #[test]
    fn csv_agent_phase_label() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_agent_snapshots(&[
            AgentSnapshotRow { agent_id: 0, step: 1, phase: AgentPhase::InTransit, x: 1.5, y: 0.0 },
            AgentSnapshotRow { agent_id: 1, step: 1, phase: AgentPhase::Evacuated, x: 9.0, y: 3.0 },
        ])
        .unwrap();
        w.finish().unwrap();

        let rows = read_all(&dir.path().join("agent_snapshots.csv"));
        assert_eq!(&rows[0][2], "in_transit");
        assert_eq!(&rows[1][2], "evacuated");
        assert_eq!(rows[0][3].parse::<f64>().unwrap(), 1.5);
    }

    #[test]
    fn csv_step_summary() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_step_summary(&StepSummaryRow {
            step: 3, sim_time_secs: 3.0, total: 10, evacuated: 4, dead: 1, waiting: 2, in_transit: 3,
        })
        .unwrap();
        w.finish().unwrap();

        let rows = read_all(&dir.path().join("step_summaries.csv"));
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "3");
        assert_eq!(&rows[0][3], "4");
        assert_eq!(&rows[0][4], "1");
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use tempfile::TempDir;

    use ev_core::{Point, SimConfig};
    use ev_sim::SimBuilder;
    use ev_spatial::{DijkstraRouter, StreetNetworkBuilder};

    use crate::csv::CsvWriter;
    use crate::observer::SimOutputObserver;
    use crate::row::{AgentSnapshotRow, EdgeStateRow, StepSummaryRow};
    use crate::writer::OutputWriter;
    use crate::{OutputError, OutputResult};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn count_rows(path: &std::path::Path) -> usize {
        csv::Reader::from_path(path).unwrap().records().count()
    }

    #[test]
    fn integration_csv() {
        // Two-way 10 m street: 2 edges.  Free-flow crossing takes ~6 steps.
        let mut b = StreetNetworkBuilder::new();
        let a = b.add_node(Point::new(0.0, 0.0));
        let z = b.add_node(Point::new(10.0, 0.0));
        b.add_street(a, z, 10.0, 2.0);
        let net = b.build().unwrap();

        let config = SimConfig { snapshot_interval_steps: 2, ..SimConfig::default() };
        let mut sim = SimBuilder::new(config, net, DijkstraRouter)
            .agent("p0", a, Some(z))
            .agent("p1", a, Some(z))
            .agent("p2", z, Some(z))
            .build()
            .unwrap();

        let dir = tmp();
        let mut obs = SimOutputObserver::new(CsvWriter::new(dir.path()).unwrap());
        sim.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none(), "no write errors expected");

        let steps = sim.clock.current_tick.0 as usize;
        let snapshots = steps.div_ceil(2);
        assert_eq!(count_rows(&dir.path().join("step_summaries.csv")), steps);
        assert_eq!(count_rows(&dir.path().join("edge_states.csv")), snapshots * 2);
        assert_eq!(count_rows(&dir.path().join("agent_snapshots.csv")), snapshots * 3);
    }

    /// Fails every write after the first `ok` calls.
    struct Flaky {
        ok:       usize,
        calls:    usize,
        finished: bool,
    }

    impl Flaky {
        fn tick(&mut self) -> OutputResult<()> {
            self.calls += 1;
            if self.calls > self.ok {
                return Err(OutputError::Io(std::io::Error::other(format!("write {}", self.calls))));
            }
            Ok(())
        }
    }

    impl OutputWriter for Flaky {
        fn write_edge_states(&mut self, _: &[EdgeStateRow]) -> OutputResult<()> {
            self.tick()
        }
        fn write_agent_snapshots(&mut self, _: &[AgentSnapshotRow]) -> OutputResult<()> {
            self.tick()
        }
        fn write_step_summary(&mut self, _: &StepSummaryRow) -> OutputResult<()> {
            self.tick()
        }
        fn finish(&mut self) -> OutputResult<()> {
            self.finished = true;
            Ok(())
        }
    }

    #[test]
    fn first_error_is_kept() {
        let mut b = StreetNetworkBuilder::new();
        let a = b.add_node(Point::new(0.0, 0.0));
        let z = b.add_node(Point::new(5.0, 0.0));
        b.add_street(a, z, 5.0, 2.0);
        let mut sim = SimBuilder::new(SimConfig::default(), b.build().unwrap(), DijkstraRouter)
            .agent("p", a, Some(z))
            .build()
            .unwrap();

        let mut obs = SimOutputObserver::new(Flaky { ok: 1, calls: 0, finished: false });
        sim.run(&mut obs).unwrap();

        let err = obs.take_error().expect("error stored");
        assert_eq!(err.to_string(), "I/O error: write 2");
        assert!(obs.take_error().is_none());
        assert!(obs.into_writer().finished);
    }
}

// ── SQLite tests ──────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use tempfile::TempDir;

    use ev_agent::AgentPhase;

    use crate::row::{AgentSnapshotRow, EdgeStateRow, StepSummaryRow};
    use crate::sqlite::SqliteWriter;
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn sqlite_db_created() {
        let dir = tmp();
        let _w = SqliteWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("output.db").exists());
    }

    #[test]
    fn sqlite_edge_states() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        let rows: Vec<EdgeStateRow> = (0..4)
            .map(|e| EdgeStateRow {
                step: 0, edge_id: e, from: e, to: e + 1, velocity: 1.66, travel_time: 6.0, occupancy_pct: 0,
            })
            .collect();
        w.write_edge_states(&rows).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM edge_states", [], |r| r.get(0)).unwrap();
        assert_eq!(count, 4);
        let to: i64 = conn
            .query_row("SELECT to_node FROM edge_states WHERE edge_id = 2", [], |r| r.get(0))
            .unwrap();
        assert_eq!(to, 3);
    }

    #[test]
    fn sqlite_phase_stored_as_text() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_agent_snapshots(&[AgentSnapshotRow {
            agent_id: 0, step: 0, phase: AgentPhase::WaitingAtNode, x: 0.0, y: 0.0,
        }])
        .unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let phase: String = conn
            .query_row("SELECT phase FROM agent_snapshots WHERE agent_id = 0", [], |r| r.get(0))
            .unwrap();
        assert_eq!(phase, "waiting");
    }

    #[test]
    fn sqlite_step_summary() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_step_summary(&StepSummaryRow {
            step: 7, sim_time_secs: 7.0, total: 50, evacuated: 42, dead: 3, waiting: 1, in_transit: 4,
        })
        .unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let (evacuated, dead): (i64, i64) = conn
            .query_row("SELECT evacuated, dead FROM step_summaries WHERE step = 7", [], |r| {
                Ok((r.get(0)?, r.get(1)?))
            })
            .unwrap();
        assert_eq!((evacuated, dead), (42, 3));
    }
}
