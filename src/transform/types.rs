//! Transformer types and traits

use crate::types::{JsonValue, Record};
use std::fmt;

/// A pure record → record step
pub trait RecordTransformer: Send + Sync {
    /// Short step name used in logs
    fn name(&self) -> &'static str;

    /// Transform one record
    fn apply(&self, record: Record) -> Record;
}

/// Ordered sequence of transformer steps
///
/// Steps run in insertion order and each sees the previous step's output.
/// Enrichment must come after projection unless `year`/`month` are in the
/// allow-list, otherwise projection discards the tags.
#[derive(Default)]
pub struct Pipeline {
    steps: Vec<Box<dyn RecordTransformer>>,
}

impl Pipeline {
    /// Create an empty pipeline (identity)
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step
    #[must_use]
    pub fn then(mut self, step: impl RecordTransformer + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Names of the steps, in order
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if the pipeline has no steps
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run a record through every step
    pub fn apply(&self, record: Record) -> Record {
        self.steps
            .iter()
            .fold(record, |record, step| step.apply(record))
    }

    /// Run a raw API value through the pipeline; non-objects start as `{}`
    pub fn apply_value(&self, value: JsonValue) -> Record {
        let record = match value {
            JsonValue::Object(map) => map,
            _ => Record::new(),
        };
        self.apply(record)
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("steps", &self.step_names())
            .finish()
    }
}
