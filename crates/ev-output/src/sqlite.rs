//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! three tables: `edge_states`, `agent_snapshots` and `step_summaries`.

use std::path::Path;

use rusqlite::Connection;

use crate::{AgentSnapshotRow, EdgeStateRow, OutputResult, StepSummaryRow};
use crate::writer::OutputWriter;

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS edge_states (
                 step          INTEGER NOT NULL,
                 edge_id       INTEGER NOT NULL,
                 from_node     INTEGER NOT NULL,
                 to_node       INTEGER NOT NULL,
                 velocity      REAL    NOT NULL,
                 travel_time   REAL    NOT NULL,
                 occupancy_pct INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS agent_snapshots (
                 agent_id INTEGER NOT NULL,
                 step     INTEGER NOT NULL,
                 phase    TEXT    NOT NULL,
                 x        REAL    NOT NULL,
                 y        REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS step_summaries (
                 step          INTEGER PRIMARY KEY,
                 sim_time_secs REAL    NOT NULL,
                 total         INTEGER NOT NULL,
                 evacuated     INTEGER NOT NULL,
                 dead          INTEGER NOT NULL,
                 waiting       INTEGER NOT NULL,
                 in_transit    INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_edge_states(&mut self, rows: &[EdgeStateRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO edge_states \
                 (step, edge_id, from_node, to_node, velocity, travel_time, occupancy_pct) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.step,
                    row.edge_id,
                    row.from,
                    row.to,
                    row.velocity,
                    row.travel_time,
                    row.occupancy_pct,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_agent_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO agent_snapshots (agent_id, step, phase, x, y) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![row.agent_id, row.step, row.phase.as_str(), row.x, row.y])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_step_summary(&mut self, row: &StepSummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO step_summaries \
             (step, sim_time_secs, total, evacuated, dead, waiting, in_transit) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                row.step,
                row.sim_time_secs,
                row.total,
                row.evacuated,
                row.dead,
                row.waiting,
                row.in_transit,
            ],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
