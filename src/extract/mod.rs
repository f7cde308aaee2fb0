//! Extraction module
//!
//! Request/response loop for one resource over one window.
//!
//! # Overview
//!
//! [`Extractor::extract`] returns a lazy, finite stream of transformed
//! records. Each call starts a fresh pagination run at page 1:
//!
//! 1. Build the base body from the resource (month filter for
//!    time-partitioned resources) and inject the first page
//! 2. Send the request, observe `hasNextPage`, select `docs[*]` and run
//!    each record through the resource's transformer pipeline
//! 3. While more pages remain, inject the next page and repeat
//!
//! Request N+1 is only built after response N has been observed.
//! Transport errors end the stream unmodified. Cancellation is checked
//! between an observed response and the next request and ends the stream
//! with [`Error::Cancelled`].

mod types;

pub use types::{ExtractStats, Extraction, Page};

use crate::catalog::ResourceDefinition;
use crate::decode::{JsonDecoder, RecordDecoder};
use crate::error::{Error, Result};
use crate::http::Transport;
use crate::pagination::{BodyPageNumberPaginator, PageRequest, PaginationPhase, PaginationState, Paginator};
use crate::transform::{pipeline_for, Pipeline};
use crate::types::{Method, Record};
use crate::window::Window;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Extractor for catalog resources
#[derive(Clone)]
pub struct Extractor {
    transport: Arc<dyn Transport>,
    paginator: Arc<dyn Paginator>,
}

impl Extractor {
    /// Create an extractor paging with `options.page` / `hasNextPage`
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            paginator: Arc::new(BodyPageNumberPaginator::new()),
        }
    }

    /// Use a different paginator
    #[must_use]
    pub fn with_paginator(mut self, paginator: impl Paginator + 'static) -> Self {
        self.paginator = Arc::new(paginator);
        self
    }

    /// Stream of pages for one resource over `window`
    pub fn pages(
        &self,
        resource: &ResourceDefinition,
        window: &Window,
        cancel: CancellationToken,
    ) -> BoxStream<'static, Result<Page>> {
        let endpoint = resource.endpoint();
        let run = PageRun {
            resource: resource.name().to_string(),
            transport: Arc::clone(&self.transport),
            paginator: Arc::clone(&self.paginator),
            decoder: JsonDecoder::with_path(endpoint.data_selector.clone()),
            pipeline: pipeline_for(resource, window),
            method: endpoint.method,
            path: endpoint.path.clone(),
            request: PageRequest::new(resource.request_body(window)),
            state: Some(self.paginator.start()),
            pages: 0,
            cancel,
        };

        info!(
            resource = %run.resource,
            window = %window,
            "Starting extraction"
        );

        stream::try_unfold(run, |mut run| async move {
            let page = run.next_page().await?;
            Ok::<_, Error>(page.map(|page| (page, run)))
        })
        .boxed()
    }

    /// Lazy stream of transformed records for one resource over `window`
    pub fn extract(
        &self,
        resource: &ResourceDefinition,
        window: &Window,
        cancel: CancellationToken,
    ) -> BoxStream<'static, Result<Record>> {
        self.pages(resource, window, cancel)
            .map_ok(|page| stream::iter(page.records.into_iter().map(Ok)))
            .try_flatten()
            .boxed()
    }

    /// Drain the stream for one resource into memory
    pub async fn extract_all(
        &self,
        resource: &ResourceDefinition,
        window: &Window,
        cancel: CancellationToken,
    ) -> Result<Extraction> {
        let start = Instant::now();
        let mut stats = ExtractStats::new(resource.name().as_str());
        let mut records = Vec::new();

        let mut pages = self.pages(resource, window, cancel);
        while let Some(page) = pages.try_next().await? {
            stats.add_page(page.records.len());
            records.extend(page.records);
        }

        stats.set_duration(start.elapsed().as_millis() as u64);
        info!(
            resource = %stats.resource,
            pages = stats.pages,
            records = stats.records,
            "Extraction complete"
        );
        Ok(Extraction { records, stats })
    }
}

impl std::fmt::Debug for Extractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extractor").finish_non_exhaustive()
    }
}

// ============================================================================
// Page Run
// ============================================================================

/// Owned state of one pagination run
struct PageRun {
    resource: String,
    transport: Arc<dyn Transport>,
    paginator: Arc<dyn Paginator>,
    decoder: JsonDecoder,
    pipeline: Pipeline,
    method: Method,
    path: String,
    request: PageRequest,
    /// `None` once the run is exhausted
    state: Option<PaginationState>,
    pages: usize,
    cancel: CancellationToken,
}

impl PageRun {
    async fn next_page(&mut self) -> Result<Option<Page>> {
        let Some(state) = self.state.take() else {
            return Ok(None);
        };

        match state.phase() {
            PaginationPhase::AwaitingFirst => {
                self.paginator
                    .prepare_initial_request(&state, &mut self.request)?;
            }
            PaginationPhase::HasMore => {
                if self.cancel.is_cancelled() {
                    info!(resource = %self.resource, pages = self.pages, "Extraction cancelled");
                    return Err(Error::Cancelled {
                        resource: self.resource.clone(),
                        pages: self.pages,
                    });
                }
                self.paginator
                    .prepare_next_request(&state, &mut self.request)?;
            }
            PaginationPhase::Exhausted => return Ok(None),
        }

        let response = self
            .transport
            .send(self.method, &self.path, &self.request.body)
            .await?;
        let next = self.paginator.observe_response(state, &response);

        let records: Vec<Record> = self
            .decoder
            .records(&response)?
            .into_iter()
            .map(|value| self.pipeline.apply_value(value))
            .collect();

        self.pages += 1;
        debug!(
            resource = %self.resource,
            page = self.request.page_number,
            records = records.len(),
            has_more = next.has_more(),
            "Fetched page"
        );

        let page = Page {
            number: self.request.page_number,
            records,
            has_more: next.has_more(),
        };
        if next.has_more() {
            self.state = Some(next);
        }
        Ok(Some(page))
    }
}
