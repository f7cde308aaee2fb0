//! Decoder types and traits

use crate::error::Result;
use serde_json::Value;

/// Selector for the record list in a SpaceX query response
pub const DEFAULT_RECORD_PATH: &str = "docs[*]";

/// Trait for selecting records out of a parsed response
pub trait RecordDecoder: Send + Sync {
    /// Records in the response; a missing record list is an empty page
    fn records(&self, response: &Value) -> Result<Vec<Value>>;
}
