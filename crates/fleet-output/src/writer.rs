//! The `OutputWriter` trait implemented by backend writers.

use crate::{OutputResult, RobotSnapshotRow, TickSummaryRow};

/// Sink for robot snapshots and tick summaries.
///
/// Errors are returned here, but the observer stores them and exposes them
/// through [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    /// Write a batch of robot snapshots.
    fn write_snapshots(&mut self, rows: &[RobotSnapshotRow]) -> OutputResult<()>;

    /// Write one tick summary row.
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Flush all underlying file handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
