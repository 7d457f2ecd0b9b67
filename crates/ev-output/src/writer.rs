//! The `OutputWriter` trait implemented by all backend writers.

use crate::{AgentSnapshotRow, EdgeStateRow, OutputResult, StepSummaryRow};

/// Trait implemented by the CSV and SQLite writers.
///
/// Errors surface to the observer, which keeps the first one for
/// [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    /// Write a batch of per-edge rows.
    fn write_edge_states(&mut self, rows: &[EdgeStateRow]) -> OutputResult<()>;

    /// Write a batch of per-agent rows.
    fn write_agent_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()>;

    /// Write one step summary row.
    fn write_step_summary(&mut self, row: &StepSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
