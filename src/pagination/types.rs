//! Pagination types and traits
//!
//! Defines the pagination state machine and the request it drives.

use crate::error::{Error, Result};
use serde_json::{Map, Value};

/// Phase of a pagination run
///
/// `AwaitingFirst → HasMore → Exhausted`; `Exhausted` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaginationPhase {
    /// No response observed yet
    #[default]
    AwaitingFirst,
    /// The last response announced another page
    HasMore,
    /// No further pages will be requested
    Exhausted,
}

/// Pagination cursor for one resource extraction
///
/// A plain value: every transition consumes the current state and returns
/// the next one, so the sequence of states is visible to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    page: u32,
    phase: PaginationPhase,
    responses: usize,
}

impl PaginationState {
    /// Create a state positioned on `initial_page`
    pub fn new(initial_page: u32) -> Self {
        Self {
            page: initial_page,
            phase: PaginationPhase::AwaitingFirst,
            responses: 0,
        }
    }

    /// Page number the next request will carry
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Current phase
    pub fn phase(&self) -> PaginationPhase {
        self.phase
    }

    /// Number of responses observed so far
    pub fn responses(&self) -> usize {
        self.responses
    }

    /// Check if another page must be requested
    pub fn has_more(&self) -> bool {
        self.phase == PaginationPhase::HasMore
    }

    /// Check if pagination is complete
    pub fn is_exhausted(&self) -> bool {
        self.phase == PaginationPhase::Exhausted
    }

    /// Transition after a response announcing another page
    #[must_use]
    pub fn advance(self) -> Self {
        if self.is_exhausted() {
            return self.observed();
        }
        Self {
            page: self.page.saturating_add(1),
            phase: PaginationPhase::HasMore,
            responses: self.responses + 1,
        }
    }

    /// Transition after a response that ends pagination
    #[must_use]
    pub fn exhaust(self) -> Self {
        Self {
            phase: PaginationPhase::Exhausted,
            ..self.observed()
        }
    }

    fn observed(self) -> Self {
        Self {
            responses: self.responses + 1,
            ..self
        }
    }
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(1)
    }
}

/// JSON body of a page request plus the page it targets
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    /// Request body sent to the API
    pub body: Value,
    /// Page number injected into the body (>= 1 once prepared)
    pub page_number: u32,
}

impl PageRequest {
    /// Create a request from a base body; the page is injected later
    pub fn new(body: Value) -> Self {
        Self {
            body,
            page_number: 0,
        }
    }

    /// Get a mutable handle to `body[key]`, creating an empty object there
    /// when the key is absent or does not hold an object
    pub fn object_at(&mut self, key: &str) -> &mut Map<String, Value> {
        if !self.body.is_object() {
            self.body = Value::Object(Map::new());
        }
        let Value::Object(root) = &mut self.body else {
            unreachable!("body was just replaced by an object")
        };

        let slot = root
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        match slot {
            Value::Object(map) => map,
            _ => unreachable!("slot was just replaced by an object"),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(Value::Object(Map::new()))
    }
}

/// Core trait for body-driven pagination strategies
pub trait Paginator: Send + Sync {
    /// State for a fresh run
    fn start(&self) -> PaginationState;

    /// Write `page` into the request
    fn inject(&self, page: u32, request: &mut PageRequest);

    /// Consume a response body and return the next state
    fn observe_response(&self, state: PaginationState, body: &Value) -> PaginationState;

    /// Prepare the first request of a run
    fn prepare_initial_request(
        &self,
        state: &PaginationState,
        request: &mut PageRequest,
    ) -> Result<()> {
        if state.phase() != PaginationPhase::AwaitingFirst {
            return Err(Error::pagination(format!(
                "initial request prepared in phase {:?}",
                state.phase()
            )));
        }
        self.inject(state.page(), request);
        Ok(())
    }

    /// Prepare the follow-up request; only legal while more pages remain
    fn prepare_next_request(&self, state: &PaginationState, request: &mut PageRequest) -> Result<()> {
        if !state.has_more() {
            return Err(Error::pagination(format!(
                "next request prepared in phase {:?}",
                state.phase()
            )));
        }
        self.inject(state.page(), request);
        Ok(())
    }
}
