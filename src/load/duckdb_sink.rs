//! DuckDB sink
//!
//! Bronze tables live in a dataset schema and are created on first write.
//! Every write stages the batch in a temp table and applies the write
//! strategy inside one transaction.

use super::sink::Sink;
use super::types::{Binding, Column, ColumnKind, LoadReport};
use crate::error::{Error, Result};
use crate::types::{JsonValue, Record, WriteStrategy};
use chrono::{DateTime, Utc};
use duckdb::types::Value as DuckValue;
use duckdb::{params, params_from_iter, Connection};
use std::path::Path;
use tracing::debug;

/// Load timestamp column
pub const LOADED_AT_COLUMN: &str = "_loaded_at";
/// SCD2 validity start
pub const VALID_FROM_COLUMN: &str = "_valid_from";
/// SCD2 validity end; `NULL` marks the current version
pub const VALID_TO_COLUMN: &str = "_valid_to";

const STAGE_TABLE: &str = "_bronze_stage";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Sink writing into a DuckDB database
pub struct DuckDbSink {
    conn: Connection,
    database: String,
    dataset: String,
    location: String,
}

impl DuckDbSink {
    /// Open (or create) a database file
    pub fn open(path: impl AsRef<Path>, dataset: impl Into<String>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            Error::sink(format!("Failed to open DuckDB at '{}': {e}", path.display()))
        })?;
        Self::with_connection(conn, dataset, path.display().to_string())
    }

    /// In-memory database
    pub fn in_memory(dataset: impl Into<String>) -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::sink(format!("Failed to create DuckDB connection: {e}")))?;
        Self::with_connection(conn, dataset, ":memory:".to_string())
    }

    fn with_connection(conn: Connection, dataset: impl Into<String>, location: String) -> Result<Self> {
        let dataset = dataset.into();
        // Catalog is named after the file stem and may equal the dataset
        let database: String = conn
            .query_row("SELECT current_database()", [], |row| row.get(0))
            .map_err(|e| Error::sink(format!("Failed to read database name: {e}")))?;
        conn.execute_batch(&format!(
            "CREATE SCHEMA IF NOT EXISTS {}.{};",
            quote(&database),
            quote(&dataset)
        ))
        .map_err(|e| Error::sink(format!("Failed to create schema '{dataset}': {e}")))?;
        debug!(location = %location, database = %database, dataset = %dataset, "Opened DuckDB sink");
        Ok(Self {
            conn,
            database,
            dataset,
            location,
        })
    }

    /// Catalog name DuckDB gave the attached database
    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Underlying connection, for ad-hoc queries
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Fully qualified, quoted table name
    pub fn table_ref(&self, table: &str) -> String {
        format!(
            "{}.{}.{}",
            quote(&self.database),
            quote(&self.dataset),
            quote(table)
        )
    }

    /// Number of rows in a table, or `None` when it does not exist
    pub fn row_count(&self, table: &str) -> Result<Option<usize>> {
        if !self.table_exists(table)? {
            return Ok(None);
        }
        let count: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", self.table_ref(table)), [], |row| {
                row.get(0)
            })?;
        Ok(Some(usize::try_from(count).unwrap_or_default()))
    }

    /// Check whether a table exists in the dataset
    pub fn table_exists(&self, table: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM information_schema.tables \
             WHERE table_catalog = ? AND table_schema = ? AND table_name = ?",
            params![self.database, self.dataset, table],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Write a batch with an explicit load timestamp
    pub fn write_at(
        &mut self,
        binding: &Binding,
        records: Vec<Record>,
        loaded_at: DateTime<Utc>,
    ) -> Result<LoadReport> {
        if binding.columns.is_empty() {
            return Err(Error::sink(format!("Table '{}' has no columns", binding.table)));
        }

        let target = self.table_ref(&binding.table);
        let ts = loaded_at.format(TIMESTAMP_FORMAT).to_string();
        let mut report = LoadReport::new(&binding.table);
        report.rows_staged = records.len();

        let tx = self.conn.transaction()?;
        tx.execute_batch(&create_table_sql(&target, binding))?;
        tx.execute_batch(&create_stage_sql(&binding.columns))?;
        stage_records(&tx, &binding.columns, &records)?;

        match binding.write_strategy {
            WriteStrategy::Merge => {
                report.rows_deleted = tx.execute(&merge_delete_sql(&target, binding), params![])?;
                report.rows_inserted = tx.execute(&merge_insert_sql(&target, binding), params![ts])?;
            }
            WriteStrategy::MergeScd2 => {
                report.rows_retired = tx.execute(&scd2_retire_sql(&target, binding), params![ts])?;
                report.rows_inserted =
                    tx.execute(&scd2_insert_sql(&target, binding), params![ts, ts])?;
            }
        }

        tx.execute_batch(&format!("DROP TABLE IF EXISTS {};", quote(STAGE_TABLE)))?;
        tx.commit()?;
        Ok(report)
    }
}

impl Sink for DuckDbSink {
    fn name(&self) -> &str {
        "duckdb"
    }

    fn write(&mut self, binding: &Binding, records: Vec<Record>) -> Result<LoadReport> {
        self.write_at(binding, records, Utc::now())
    }
}

impl std::fmt::Debug for DuckDbSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuckDbSink")
            .field("location", &self.location)
            .field("database", &self.database)
            .field("dataset", &self.dataset)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// SQL
// ============================================================================

/// Quote an identifier
pub(crate) fn quote(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

fn column_list(columns: &[Column], prefix: &str) -> String {
    columns
        .iter()
        .map(|c| format!("{prefix}{}", quote(&c.name)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn column_defs(columns: &[Column]) -> Vec<String> {
    columns
        .iter()
        .map(|c| format!("{} {}", quote(&c.name), c.kind.sql_type()))
        .collect()
}

fn create_table_sql(target: &str, binding: &Binding) -> String {
    let mut defs = column_defs(&binding.columns);
    defs.push(format!("{} TIMESTAMP", quote(LOADED_AT_COLUMN)));
    if binding.write_strategy == WriteStrategy::MergeScd2 {
        defs.push(format!("{} TIMESTAMP", quote(VALID_FROM_COLUMN)));
        defs.push(format!("{} TIMESTAMP", quote(VALID_TO_COLUMN)));
    }
    format!("CREATE TABLE IF NOT EXISTS {target} ({});", defs.join(", "))
}

fn create_stage_sql(columns: &[Column]) -> String {
    format!(
        "CREATE OR REPLACE TEMP TABLE {} ({});",
        quote(STAGE_TABLE),
        column_defs(columns).join(", ")
    )
}

fn stage_records(conn: &Connection, columns: &[Column], records: &[Record]) -> Result<()> {
    if records.is_empty() {
        return Ok(());
    }
    let placeholders = vec!["?"; columns.len()].join(", ");
    let mut stmt = conn.prepare(&format!(
        "INSERT INTO {} ({}) VALUES ({placeholders})",
        quote(STAGE_TABLE),
        column_list(columns, "")
    ))?;

    for record in records {
        let row = columns.iter().map(|c| to_sql_value(c.kind, record.get(&c.name)));
        stmt.execute(params_from_iter(row))?;
    }
    Ok(())
}

/// Convert a record value for storage; missing and null become `NULL`
fn to_sql_value(kind: ColumnKind, value: Option<&JsonValue>) -> DuckValue {
    match (kind, value) {
        (_, None | Some(JsonValue::Null)) => DuckValue::Null,
        (ColumnKind::Integer, Some(v)) => v.as_i64().map_or(DuckValue::Null, DuckValue::BigInt),
        (ColumnKind::Json, Some(JsonValue::String(s))) => DuckValue::Text(s.clone()),
        (ColumnKind::Json, Some(v)) => DuckValue::Text(v.to_string()),
    }
}

/// `t.k1 = s.k1 AND ...`; `None` for an empty key
fn key_match(keys: &[String]) -> Option<String> {
    if keys.is_empty() {
        return None;
    }
    Some(
        keys.iter()
            .map(|k| format!("t.{0} = s.{0}", quote(k)))
            .collect::<Vec<_>>()
            .join(" AND "),
    )
}

fn content_match(columns: &[Column]) -> String {
    columns
        .iter()
        .map(|c| format!("t.{0} IS NOT DISTINCT FROM s.{0}", quote(&c.name)))
        .collect::<Vec<_>>()
        .join(" AND ")
}

fn stage_exists(condition: &str) -> String {
    format!("EXISTS (SELECT 1 FROM {} s WHERE {condition})", quote(STAGE_TABLE))
}

fn merge_delete_sql(target: &str, binding: &Binding) -> String {
    let scopes: Vec<String> = [key_match(&binding.primary_key), key_match(&binding.merge_key)]
        .into_iter()
        .flatten()
        .map(|m| stage_exists(&m))
        .collect();
    let scope = if scopes.is_empty() {
        "FALSE".to_string()
    } else {
        scopes.join(" OR ")
    };
    format!("DELETE FROM {target} WHERE rowid IN (SELECT t.rowid FROM {target} t WHERE {scope})")
}

fn merge_insert_sql(target: &str, binding: &Binding) -> String {
    let cols = column_list(&binding.columns, "");
    format!(
        "INSERT INTO {target} ({cols}, {}) SELECT {}, CAST(? AS TIMESTAMP) FROM {} s",
        quote(LOADED_AT_COLUMN),
        column_list(&binding.columns, "s."),
        quote(STAGE_TABLE)
    )
}

fn scd2_retire_sql(target: &str, binding: &Binding) -> String {
    let in_scope = match key_match(&binding.merge_key) {
        Some(m) => stage_exists(&m),
        None => format!("EXISTS (SELECT 1 FROM {})", quote(STAGE_TABLE)),
    };
    format!(
        "UPDATE {target} SET {valid_to} = CAST(? AS TIMESTAMP) WHERE rowid IN (\
         SELECT t.rowid FROM {target} t WHERE t.{valid_to} IS NULL AND {in_scope} AND NOT {unchanged})",
        valid_to = quote(VALID_TO_COLUMN),
        unchanged = stage_exists(&content_match(&binding.columns)),
    )
}

fn scd2_insert_sql(target: &str, binding: &Binding) -> String {
    format!(
        "INSERT INTO {target} ({cols}, {loaded}, {from}, {to}) \
         SELECT {staged}, CAST(? AS TIMESTAMP), CAST(? AS TIMESTAMP), NULL FROM {stage} s \
         WHERE NOT EXISTS (SELECT 1 FROM {target} t WHERE t.{to} IS NULL AND {same})",
        cols = column_list(&binding.columns, ""),
        loaded = quote(LOADED_AT_COLUMN),
        from = quote(VALID_FROM_COLUMN),
        to = quote(VALID_TO_COLUMN),
        staged = column_list(&binding.columns, "s."),
        stage = quote(STAGE_TABLE),
        same = content_match(&binding.columns),
    )
}
