// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::needless_pass_by_value)]

//! # Bronze Loader
//!
//! Incremental, month-at-a-time extraction of the public SpaceX v4 API into
//! the raw ("bronze") layer of a DuckDB warehouse.
//!
//! ## Features
//!
//! - **Monthly Windows**: half-open `[start, end)` calendar windows
//! - **Body Pagination**: `options.page` injection driven by `hasNextPage`
//! - **Projection**: per-resource attribute allow-lists plus `year`/`month` tags
//! - **Idempotent Loads**: delete-insert merge and SCD2 history in DuckDB
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bronze_loader::{config::Settings, pipeline::LoadPipeline, Result};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let settings = Settings::load(None)?;
//!     let mut pipeline = LoadPipeline::from_settings(&settings)?;
//!     let summary = pipeline
//!         .run_month(2021, 3, &[], CancellationToken::new())
//!         .await?;
//!     println!("{} records", summary.total_records());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                 LoadPipeline::run_month(y, m)                 │
//! └───────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬────────────┐
//! │  Window  │  Catalog  │   Extractor   │ Transform │    Load    │
//! ├──────────┼───────────┼───────────────┼───────────┼────────────┤
//! │ [start,  │ launches  │ Transport     │ Projection│ Dedup      │
//! │   end)   │ rockets   │ Paginator     │ Enrichment│ Merge      │
//! │          │ ...       │ docs[*]       │           │ SCD2       │
//! └──────────┴───────────┴───────────────┴───────────┴────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the loader
pub mod error;

/// Common types and type aliases
pub mod types;

/// Settings and typed request defaults
pub mod config;

/// Monthly extraction windows
pub mod window;

/// Resource catalog
pub mod catalog;

/// Record transformer pipeline
pub mod transform;

/// Body pagination state machine
pub mod pagination;

/// HTTP transport
pub mod http;

/// Record-list selection
pub mod decode;

/// Request/response loop
pub mod extract;

/// Dedup and DuckDB sink
pub mod load;

/// Monthly extract-and-load runs
pub mod pipeline;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use catalog::{Catalog, ResourceName};
pub use pipeline::{LoadPipeline, RunSummary};
pub use window::{compute_window, Window};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
