//! Load types

use crate::catalog::{DedupSort, ResourceDefinition};
use crate::transform::{MONTH_COLUMN, YEAR_COLUMN};
use crate::types::WriteStrategy;
use serde::Serialize;

/// Storage class of a bronze column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Strings stored as-is, other values as JSON text
    Json,
    /// Partition tags
    Integer,
}

impl ColumnKind {
    pub fn sql_type(self) -> &'static str {
        match self {
            ColumnKind::Json => "VARCHAR",
            ColumnKind::Integer => "BIGINT",
        }
    }
}

/// A stored column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
}

/// How one resource's records land in its table
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    /// Destination table
    pub table: String,
    /// Stored data columns, in order
    pub columns: Vec<Column>,
    pub primary_key: Vec<String>,
    pub merge_key: Vec<String>,
    pub write_strategy: WriteStrategy,
    pub dedup_sort: Option<DedupSort>,
}

impl Binding {
    /// Binding for a catalog resource
    pub fn for_resource(resource: &ResourceDefinition) -> Self {
        let partitioned = resource.is_time_partitioned();
        let columns = resource
            .stored_columns()
            .into_iter()
            .map(|name| {
                let kind = if partitioned && (name == YEAR_COLUMN || name == MONTH_COLUMN) {
                    ColumnKind::Integer
                } else {
                    ColumnKind::Json
                };
                Column { name, kind }
            })
            .collect();

        Self {
            table: resource.table_name(),
            columns,
            primary_key: resource.primary_key().to_vec(),
            merge_key: resource.merge_key().to_vec(),
            write_strategy: resource.write_strategy(),
            dedup_sort: resource.dedup_sort().cloned(),
        }
    }

    /// Names of the stored data columns
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Outcome of writing one batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub table: String,
    /// Records handed to the loader
    pub rows_received: usize,
    /// Records left after in-batch dedup
    pub rows_staged: usize,
    /// Rows removed by a merge
    pub rows_deleted: usize,
    /// Current versions closed by an SCD2 write
    pub rows_retired: usize,
    pub rows_inserted: usize,
}

impl LoadReport {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }
}
