//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `edge_states.csv`
//! - `agent_snapshots.csv`
//! - `step_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::{AgentSnapshotRow, EdgeStateRow, OutputResult, StepSummaryRow};
use crate::writer::OutputWriter;

/// Writes simulation output to three CSV files.
pub struct CsvWriter {
    edges:     Writer<File>,
    agents:    Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create the three CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut edges = Writer::from_path(dir.join("edge_states.csv"))?;
        edges.write_record(["step", "edge_id", "from", "to", "velocity", "travel_time", "occupancy_pct"])?;

        let mut agents = Writer::from_path(dir.join("agent_snapshots.csv"))?;
        agents.write_record(["agent_id", "step", "phase", "x", "y"])?;

        let mut summaries = Writer::from_path(dir.join("step_summaries.csv"))?;
        summaries.write_record(["step", "sim_time_secs", "total", "evacuated", "dead", "waiting", "in_transit"])?;

        Ok(Self {
            edges,
            agents,
            summaries,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_edge_states(&mut self, rows: &[EdgeStateRow]) -> OutputResult<()> {
        for row in rows {
            self.edges.write_record(&[
                row.step.to_string(),
                row.edge_id.to_string(),
                row.from.to_string(),
                row.to.to_string(),
                format!("{:.4}", row.velocity),
                format!("{:.3}", row.travel_time),
                row.occupancy_pct.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_agent_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.agents.write_record(&[
                row.agent_id.to_string(),
                row.step.to_string(),
                row.phase.as_str().to_owned(),
                format!("{:.3}", row.x),
                format!("{:.3}", row.y),
            ])?;
        }
        Ok(())
    }

    fn write_step_summary(&mut self, row: &StepSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.step.to_string(),
            row.sim_time_secs.to_string(),
            row.total.to_string(),
            row.evacuated.to_string(),
            row.dead.to_string(),
            row.waiting.to_string(),
            row.in_transit.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.edges.flush()?;
        self.agents.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
