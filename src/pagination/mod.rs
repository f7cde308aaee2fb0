//! Pagination module
//!
//! # Overview
//!
//! Pagination is an explicit state machine. A [`Paginator`] strategy knows
//! how to write the page number into a request and how to read the
//! continuation signal from a response; the [`PaginationState`] value it
//! threads through a run records the current page and phase.
//!
//! A missing or malformed continuation flag ends pagination instead of
//! raising an error, so an unexpected response shape can never loop forever.

mod strategies;
mod types;

pub use strategies::BodyPageNumberPaginator;
pub use types::{PageRequest, PaginationPhase, PaginationState, Paginator};
