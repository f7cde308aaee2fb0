//! Record transformer module
//!
//! # Overview
//!
//! Records coming off the API are reshaped by a [`Pipeline`] of pure steps:
//! - [`Projection`] restricts a record to the resource's allow-list
//! - [`Enrichment`] tags it with the run's `year` and `month`

mod steps;
mod types;

pub use steps::{Enrichment, Projection, MONTH_COLUMN, YEAR_COLUMN};
pub use types::{Pipeline, RecordTransformer};

use crate::catalog::ResourceDefinition;
use crate::window::Window;

/// Build the transformer pipeline for one resource and run
///
/// Time-partitioned resources are projected, then enriched with the
/// window's year and month. Reference resources are only projected.
pub fn pipeline_for(resource: &ResourceDefinition, window: &Window) -> Pipeline {
    let pipeline = Pipeline::new().then(Projection::new(resource.allowed_columns().iter().cloned()));
    if resource.is_time_partitioned() {
        pipeline.then(Enrichment::new(window.year(), window.month()))
    } else {
        pipeline
    }
}
