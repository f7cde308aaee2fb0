//! Catalog types

use crate::config::{EndpointConfig, EndpointDefaults, EndpointOverride};
use crate::error::{Error, Result};
use crate::transform::{MONTH_COLUMN, YEAR_COLUMN};
use crate::types::{JsonObject, JsonValue, SortDirection, WriteStrategy};
use crate::window::Window;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Resource Names
// ============================================================================

/// Prefix of every bronze table name
pub const TABLE_PREFIX: &str = "bronze_";

/// Closed set of resources the loader knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceName {
    Launches,
    Rockets,
    Launchpads,
    Payloads,
    Ships,
    Cores,
}

impl ResourceName {
    /// Every resource, in catalog order
    pub const ALL: [ResourceName; 6] = [
        ResourceName::Launches,
        ResourceName::Rockets,
        ResourceName::Launchpads,
        ResourceName::Payloads,
        ResourceName::Ships,
        ResourceName::Cores,
    ];

    /// API name of the resource
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceName::Launches => "launches",
            ResourceName::Rockets => "rockets",
            ResourceName::Launchpads => "launchpads",
            ResourceName::Payloads => "payloads",
            ResourceName::Ships => "ships",
            ResourceName::Cores => "cores",
        }
    }

    /// Destination table name, e.g. `bronze_launches`
    pub fn table_name(self) -> String {
        format!("{TABLE_PREFIX}{}", self.as_str())
    }

    /// Query endpoint relative to the API root, e.g. `launches/query`
    pub fn endpoint_path(self) -> String {
        format!("{}/query", self.as_str())
    }

    /// Position in [`ResourceName::ALL`]
    pub(crate) fn index(self) -> usize {
        self as usize
    }

    /// All API names
    pub fn all_names() -> Vec<&'static str> {
        Self::ALL.iter().map(|n| n.as_str()).collect()
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceName {
    type Err = Error;

    /// Accepts the API name or the table name, case-insensitively
    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_ascii_lowercase();
        let bare = lowered.strip_prefix(TABLE_PREFIX).unwrap_or(&lowered);
        Self::ALL
            .into_iter()
            .find(|n| n.as_str() == bare)
            .ok_or_else(|| Error::unknown_resource(s, Self::all_names()))
    }
}

// ============================================================================
// Dedup Rule
// ============================================================================

/// In-batch dedup rule: which record wins among duplicates of a primary key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupSort {
    pub column: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl DedupSort {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }
}

// ============================================================================
// Resource Definition
// ============================================================================

/// Everything the extractor and sink need to know about one resource
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDefinition {
    name: ResourceName,
    endpoint: EndpointConfig,
    allowed_columns: Vec<String>,
    primary_key: Vec<String>,
    merge_key: Vec<String>,
    write_strategy: WriteStrategy,
    dedup_sort: Option<DedupSort>,
    date_column: Option<String>,
}

impl ResourceDefinition {
    pub fn name(&self) -> ResourceName {
        self.name
    }

    pub fn endpoint(&self) -> &EndpointConfig {
        &self.endpoint
    }

    pub fn endpoint_path(&self) -> &str {
        &self.endpoint.path
    }

    pub fn table_name(&self) -> String {
        self.name.table_name()
    }

    /// Attribute allow-list, in declared order
    pub fn allowed_columns(&self) -> &[String] {
        &self.allowed_columns
    }

    pub fn primary_key(&self) -> &[String] {
        &self.primary_key
    }

    pub fn merge_key(&self) -> &[String] {
        &self.merge_key
    }

    pub fn write_strategy(&self) -> WriteStrategy {
        self.write_strategy
    }

    pub fn dedup_sort(&self) -> Option<&DedupSort> {
        self.dedup_sort.as_ref()
    }

    /// Attribute the month filter applies to, if any
    pub fn date_column(&self) -> Option<&str> {
        self.date_column.as_deref()
    }

    /// Time-partitioned resources are filtered by window and tagged with year/month
    pub fn is_time_partitioned(&self) -> bool {
        self.date_column.is_some()
    }

    /// Columns stored for each record: the allow-list, then year/month when partitioned
    pub fn stored_columns(&self) -> Vec<String> {
        let mut columns = self.allowed_columns.clone();
        if self.is_time_partitioned() {
            for extra in [YEAR_COLUMN, MONTH_COLUMN] {
                if !columns.iter().any(|c| c == extra) {
                    columns.push(extra.to_string());
                }
            }
        }
        columns
    }

    /// Base request body for a run over `window`
    ///
    /// Page number is not set here; the paginator injects it.
    pub fn request_body(&self, window: &Window) -> JsonValue {
        let mut filter = JsonObject::new();
        if let Some(column) = &self.date_column {
            let mut range = JsonObject::new();
            range.insert("$gte".to_string(), JsonValue::from(window.start_str()));
            range.insert("$lt".to_string(), JsonValue::from(window.end_str()));
            filter.insert(column.clone(), JsonValue::Object(range));
        }
        self.endpoint.body(filter)
    }
}

// ============================================================================
// Defaults / Overrides
// ============================================================================

/// Settings shared by every resource unless overridden
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDefaults {
    pub primary_key: Vec<String>,
    pub merge_key: Vec<String>,
    pub write_strategy: WriteStrategy,
    pub endpoint: EndpointDefaults,
}

impl Default for ResourceDefaults {
    fn default() -> Self {
        Self {
            primary_key: vec!["id".to_string()],
            merge_key: vec!["id".to_string()],
            write_strategy: WriteStrategy::MergeScd2,
            endpoint: EndpointDefaults::default(),
        }
    }
}

/// Per-resource settings; `None` fields inherit [`ResourceDefaults`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceOverride {
    pub allowed_columns: Vec<String>,
    pub primary_key: Option<Vec<String>>,
    pub merge_key: Option<Vec<String>>,
    pub write_strategy: Option<WriteStrategy>,
    pub dedup_sort: Option<DedupSort>,
    pub date_column: Option<String>,
    pub endpoint: EndpointOverride,
}

impl ResourceOverride {
    /// Create an override with only an allow-list
    pub fn columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_columns: columns.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

impl ResourceDefaults {
    /// Merge an override into these defaults and validate the result
    pub fn resolve(&self, name: ResourceName, over: ResourceOverride) -> Result<ResourceDefinition> {
        let definition = ResourceDefinition {
            name,
            endpoint: self.endpoint.merge(&name.endpoint_path(), &over.endpoint),
            allowed_columns: over.allowed_columns,
            primary_key: over.primary_key.unwrap_or_else(|| self.primary_key.clone()),
            merge_key: over.merge_key.unwrap_or_else(|| self.merge_key.clone()),
            write_strategy: over.write_strategy.unwrap_or(self.write_strategy),
            dedup_sort: over.dedup_sort,
            date_column: over.date_column,
        };
        validate(&definition)?;
        Ok(definition)
    }
}

fn validate(def: &ResourceDefinition) -> Result<()> {
    let field = |f: &str| format!("{}.{f}", def.name);

    if def.allowed_columns.is_empty() {
        return Err(Error::invalid_value(field("allowed_columns"), "cannot be empty"));
    }

    let stored = def.stored_columns();
    let known = |c: &String| stored.contains(c);

    if def.primary_key.is_empty() {
        return Err(Error::invalid_value(field("primary_key"), "cannot be empty"));
    }
    for (label, keys) in [("primary_key", &def.primary_key), ("merge_key", &def.merge_key)] {
        if let Some(bad) = keys.iter().find(|k| !known(*k)) {
            return Err(Error::invalid_value(
                field(label),
                format!("column '{bad}' is not stored for this resource"),
            ));
        }
    }
    if let Some(sort) = &def.dedup_sort {
        if !known(&sort.column) {
            return Err(Error::invalid_value(
                field("dedup_sort"),
                format!("column '{}' is not stored for this resource", sort.column),
            ));
        }
    }
    if let Some(date) = &def.date_column {
        if !def.allowed_columns.contains(date) {
            return Err(Error::invalid_value(
                field("date_column"),
                format!("column '{date}' is not in the allow-list"),
            ));
        }
    }
    Ok(())
}
