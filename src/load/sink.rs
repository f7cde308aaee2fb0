//! Sink trait and the dedup-then-write entry point

use super::dedup::dedup_records;
use super::types::{Binding, LoadReport};
use crate::error::Result;
use crate::types::Record;
use tracing::{debug, info};

/// Destination that applies a binding's write strategy to a batch
pub trait Sink: Send {
    /// Short sink name used in logs
    fn name(&self) -> &str;

    /// Write an already deduplicated batch
    fn write(&mut self, binding: &Binding, records: Vec<Record>) -> Result<LoadReport>;
}

/// Dedup a batch by primary key, then write it
pub fn load_records(
    sink: &mut dyn Sink,
    binding: &Binding,
    records: Vec<Record>,
) -> Result<LoadReport> {
    let received = records.len();
    let staged = dedup_records(records, &binding.primary_key, binding.dedup_sort.as_ref());
    if staged.len() < received {
        debug!(
            table = %binding.table,
            dropped = received - staged.len(),
            "Dropped in-batch duplicates"
        );
    }

    let mut report = sink.write(binding, staged)?;
    report.rows_received = received;

    info!(
        sink = sink.name(),
        table = %report.table,
        strategy = %binding.write_strategy,
        staged = report.rows_staged,
        deleted = report.rows_deleted,
        retired = report.rows_retired,
        inserted = report.rows_inserted,
        "Loaded batch"
    );
    Ok(report)
}
