//! Pagination strategy implementations

use super::types::{PageRequest, PaginationState, Paginator};
use serde_json::Value;
use tracing::debug;

// ============================================================================
// Body Page Number Pagination
// ============================================================================

/// Page-number pagination carried in the JSON request body
///
/// Writes the page to `body[options_key][page_key]` and follows the boolean
/// `has_next_key` flag of each response. Common pattern (mongoose-paginate):
/// - request `{"query": {...}, "options": {"page": 2, "limit": 50}}`
/// - response `{"docs": [...], "hasNextPage": true, "totalDocs": 120}`
#[derive(Debug, Clone)]
pub struct BodyPageNumberPaginator {
    /// First page number
    pub initial_page: u32,
    /// Key of the nested options object
    pub options_key: String,
    /// Key of the page field inside the options object
    pub page_key: String,
    /// Response field announcing another page
    pub has_next_key: String,
}

impl Default for BodyPageNumberPaginator {
    fn default() -> Self {
        Self {
            initial_page: 1,
            options_key: "options".to_string(),
            page_key: "page".to_string(),
            has_next_key: "hasNextPage".to_string(),
        }
    }
}

impl BodyPageNumberPaginator {
    /// Create a paginator with the default `options.page` / `hasNextPage` layout
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the first page number
    #[must_use]
    pub fn with_initial_page(mut self, page: u32) -> Self {
        self.initial_page = page;
        self
    }

    /// Set where the page number is written
    #[must_use]
    pub fn with_page_location(
        mut self,
        options_key: impl Into<String>,
        page_key: impl Into<String>,
    ) -> Self {
        self.options_key = options_key.into();
        self.page_key = page_key.into();
        self
    }

    /// Set the response flag announcing another page
    #[must_use]
    pub fn with_has_next_key(mut self, key: impl Into<String>) -> Self {
        self.has_next_key = key.into();
        self
    }
}

impl Paginator for BodyPageNumberPaginator {
    fn start(&self) -> PaginationState {
        PaginationState::new(self.initial_page)
    }

    fn inject(&self, page: u32, request: &mut PageRequest) {
        request
            .object_at(&self.options_key)
            .insert(self.page_key.clone(), Value::from(page));
        request.page_number = page;
    }

    fn observe_response(&self, state: PaginationState, body: &Value) -> PaginationState {
        // Only a literal `true` continues; absent or malformed flags stop the run
        match body.get(&self.has_next_key) {
            Some(Value::Bool(true)) => state.advance(),
            Some(Value::Bool(false)) => state.exhaust(),
            other => {
                debug!(
                    flag = %self.has_next_key,
                    found = ?other,
                    "pagination flag missing or not a boolean, treating as last page"
                );
                state.exhaust()
            }
        }
    }
}
