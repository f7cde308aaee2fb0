//! Transformer step implementations

use super::types::RecordTransformer;
use crate::types::{JsonValue, Record};

// ============================================================================
// Projection
// ============================================================================

/// Keeps only allow-listed attributes
///
/// Allow-listed keys missing from the input are omitted, not defaulted to
/// null. An empty allow-list projects every record to `{}`.
#[derive(Debug, Clone, Default)]
pub struct Projection {
    columns: Vec<String>,
}

impl Projection {
    /// Create a projection over `columns`
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// The allow-list, in declared order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

impl RecordTransformer for Projection {
    fn name(&self) -> &'static str {
        "projection"
    }

    fn apply(&self, mut record: Record) -> Record {
        let mut projected = Record::new();
        for column in &self.columns {
            if let Some(value) = record.remove(column) {
                projected.insert(column.clone(), value);
            }
        }
        projected
    }
}

// ============================================================================
// Enrichment
// ============================================================================

/// Attribute name for the partition year
pub const YEAR_COLUMN: &str = "year";

/// Attribute name for the partition month
pub const MONTH_COLUMN: &str = "month";

/// Tags a record with the run's `year` and `month`
///
/// Existing values under those names are overwritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Enrichment {
    year: i32,
    month: u32,
}

impl Enrichment {
    /// Create an enrichment step for one run
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }
}

impl RecordTransformer for Enrichment {
    fn name(&self) -> &'static str {
        "enrichment"
    }

    fn apply(&self, mut record: Record) -> Record {
        record.insert(YEAR_COLUMN.to_string(), JsonValue::from(self.year));
        record.insert(MONTH_COLUMN.to_string(), JsonValue::from(self.month));
        record
    }
}
