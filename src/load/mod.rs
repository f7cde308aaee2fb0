//! Load coordinator module
//!
//! # Overview
//!
//! Each resource is bound to its destination table through a [`Binding`]:
//! primary key, merge key, write strategy and dedup rule. A batch is first
//! collapsed to one record per primary key ([`dedup_records`]), then handed
//! to a [`Sink`].
//!
//! [`DuckDbSink`] implements both write strategies:
//! - **Merge**: delete target rows sharing a primary key or merge key with
//!   the batch, then insert the batch. Re-running a month replaces exactly
//!   that month.
//! - **SCD2**: close current versions in the batch's merge-key scope whose
//!   content is no longer in the batch, then insert batch rows that have no
//!   identical current version.

mod dedup;
mod duckdb_sink;
mod sink;
mod types;

pub use dedup::dedup_records;
pub use duckdb_sink::{DuckDbSink, LOADED_AT_COLUMN, VALID_FROM_COLUMN, VALID_TO_COLUMN};
pub use sink::{load_records, Sink};
pub use types::{Binding, Column, ColumnKind, LoadReport};
