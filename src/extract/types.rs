//! Extractor types

use crate::types::Record;
use serde::Serialize;

/// One decoded and transformed page
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Page number that was requested
    pub number: u32,
    /// Transformed records, in response order
    pub records: Vec<Record>,
    /// Whether the response announced another page
    pub has_more: bool,
}

/// Counters for one extraction run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractStats {
    /// Resource name
    pub resource: String,
    /// Pages fetched
    pub pages: usize,
    /// Records yielded
    pub records: usize,
    /// Pages that carried no records
    pub empty_pages: usize,
    /// Wall time in milliseconds
    pub duration_ms: u64,
}

impl ExtractStats {
    /// Create stats for a resource
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            ..Self::default()
        }
    }

    /// Count a page
    pub fn add_page(&mut self, records: usize) {
        self.pages += 1;
        self.records += records;
        if records == 0 {
            self.empty_pages += 1;
        }
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}

/// Records of a completed extraction plus its counters
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub records: Vec<Record>,
    pub stats: ExtractStats,
}
