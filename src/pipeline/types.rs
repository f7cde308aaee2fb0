//! Run summary types

use crate::catalog::ResourceName;
use crate::extract::ExtractStats;
use crate::load::LoadReport;
use crate::window::Window;
use serde::Serialize;

/// Outcome for one resource
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceSummary {
    pub resource: ResourceName,
    pub extract: ExtractStats,
    pub load: LoadReport,
}

/// Outcome of one monthly run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub year: i32,
    pub month: u32,
    /// Window start, `YYYY-MM-DDTHH:MM:SSZ`
    pub start: String,
    /// Window end (exclusive)
    pub end: String,
    pub resources: Vec<ResourceSummary>,
    pub duration_ms: u64,
}

impl RunSummary {
    pub fn new(window: &Window) -> Self {
        Self {
            year: window.year(),
            month: window.month(),
            start: window.start_str(),
            end: window.end_str(),
            resources: Vec::new(),
            duration_ms: 0,
        }
    }

    /// Records extracted across resources
    pub fn total_records(&self) -> usize {
        self.resources.iter().map(|r| r.extract.records).sum()
    }

    /// Rows inserted across resources
    pub fn total_inserted(&self) -> usize {
        self.resources.iter().map(|r| r.load.rows_inserted).sum()
    }

    pub fn get(&self, resource: ResourceName) -> Option<&ResourceSummary> {
        self.resources.iter().find(|r| r.resource == resource)
    }

    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}
