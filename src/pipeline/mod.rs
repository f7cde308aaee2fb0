//! Pipeline module
//!
//! # Overview
//!
//! One run extracts a calendar month for a selection of resources and
//! loads each into its bronze table:
//!
//! ```text
//! (year, month) ──► Window ──► Extractor (all resources concurrently)
//!                                   │
//!                                   ▼
//!                       load_records ──► Sink (one resource at a time)
//! ```
//!
//! Extraction of every selected resource must succeed before anything is
//! loaded, so a failed or cancelled run leaves the destination untouched.

mod types;

pub use types::{ResourceSummary, RunSummary};

use crate::catalog::Catalog;
use crate::config::Settings;
use crate::error::Result;
use crate::extract::Extractor;
use crate::http::{HttpClient, HttpClientConfig};
use crate::load::{load_records, Binding, DuckDbSink, Sink};
use crate::pagination::BodyPageNumberPaginator;
use crate::window::compute_window;
use futures::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Name the loader identifies itself with in logs
pub const PIPELINE_NAME: &str = "spacex_api";

/// Extract-and-load runner over one catalog and one sink
pub struct LoadPipeline {
    catalog: Catalog,
    extractor: Extractor,
    sink: Box<dyn Sink>,
}

impl LoadPipeline {
    pub fn new(catalog: Catalog, extractor: Extractor, sink: impl Sink + 'static) -> Self {
        Self {
            catalog,
            extractor,
            sink: Box::new(sink),
        }
    }

    /// Build the HTTP transport, catalog and DuckDB sink from settings
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let mut http = HttpClientConfig::builder()
            .base_url(&settings.base_url)
            .timeout(Duration::from_secs(settings.timeout_secs));
        if let Some(agent) = &settings.user_agent {
            http = http.user_agent(agent);
        }
        let client = HttpClient::with_config(http.build())?;

        let layout = &settings.pagination;
        let paginator = BodyPageNumberPaginator::new()
            .with_initial_page(layout.initial_page)
            .with_page_location(&layout.options_key, &layout.page_key)
            .with_has_next_key(&layout.has_next_key);
        let extractor = Extractor::new(Arc::new(client)).with_paginator(paginator);

        let catalog = Catalog::spacex_with_page_limit(settings.page_limit)?;
        let sink = DuckDbSink::open(&settings.destination, &settings.dataset)?;

        Ok(Self::new(catalog, extractor, sink))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Run one month for `resources` (empty = every resource)
    pub async fn run_month(
        &mut self,
        year: i32,
        month: u32,
        resources: &[String],
        cancel: CancellationToken,
    ) -> Result<RunSummary> {
        let started = Instant::now();
        let window = compute_window(year, month)?;
        let selected = self.catalog.select(resources)?;

        info!(
            pipeline = PIPELINE_NAME,
            window = %window,
            resources = selected.len(),
            "Starting run"
        );

        let extractions = join_all(
            selected
                .iter()
                .map(|resource| self.extractor.extract_all(resource, &window, cancel.clone())),
        )
        .await;

        let mut extracted = Vec::with_capacity(extractions.len());
        let mut first_error = None;
        for (resource, result) in selected.iter().zip(extractions) {
            match result {
                Ok(extraction) => extracted.push((*resource, extraction)),
                Err(e) => {
                    error!(resource = %resource.name(), error = %e, "Extraction failed");
                    first_error.get_or_insert(e);
                }
            }
        }
        if let Some(e) = first_error {
            return Err(e);
        }

        let mut summary = RunSummary::new(&window);
        for (resource, extraction) in extracted {
            let binding = Binding::for_resource(resource);
            let load = load_records(self.sink.as_mut(), &binding, extraction.records)?;
            summary.resources.push(ResourceSummary {
                resource: resource.name(),
                extract: extraction.stats,
                load,
            });
        }

        summary.set_duration(started.elapsed().as_millis() as u64);
        info!(
            pipeline = PIPELINE_NAME,
            window = %window,
            records = summary.total_records(),
            duration_ms = summary.duration_ms,
            "Run complete"
        );
        Ok(summary)
    }
}

impl std::fmt::Debug for LoadPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadPipeline")
            .field("resources", &self.catalog.names())
            .field("sink", &self.sink.name())
            .finish_non_exhaustive()
    }
}
