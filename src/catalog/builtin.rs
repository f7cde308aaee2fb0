//! Built-in SpaceX v4 resources

use super::types::{DedupSort, ResourceName, ResourceOverride};
use crate::types::{SortDirection, WriteStrategy};

pub const LAUNCH_COLUMNS: &[&str] = &[
    "id",
    "name",
    "details",
    "flight_number",
    "launchpad",
    "date_utc",
    "rocket",
    "payloads",
    "ships",
    "cores",
    "success",
];

pub const ROCKET_COLUMNS: &[&str] = &[
    "id",
    "name",
    "description",
    "company",
    "type",
    "active",
    "stages",
    "boosters",
    "cost_per_launch",
    "success_rate_pct",
    "first_flight",
    "country",
];

pub const LAUNCHPAD_COLUMNS: &[&str] = &[
    "id",
    "name",
    "full_name",
    "locality",
    "region",
    "latitude",
    "longitude",
    "launch_attempts",
    "launch_successes",
    "launches",
    "rockets",
    "status",
    "details",
    "timezone",
];

pub const PAYLOAD_COLUMNS: &[&str] = &[
    "id",
    "name",
    "type",
    "launch",
    "reused",
    "manufacturers",
    "customers",
    "nationalities",
    "mass_kg",
    "orbit",
    "lifespan_years",
    "epoch",
];

pub const SHIP_COLUMNS: &[&str] = &[
    "id",
    "name",
    "model",
    "type",
    "active",
    "mass_kg",
    "year_built",
    "home_port",
    "launches",
];

pub const CORE_COLUMNS: &[&str] = &[
    "id",
    "status",
    "serial",
    "reuse_count",
    "launches",
    "last_update",
];

/// Override for one built-in resource
///
/// Launches are the only time-partitioned resource: filtered on `date_utc`,
/// merged by month, latest `date_utc` kept among duplicates. Everything else
/// is reference data keyed by `id` and written with history.
pub fn spacex_override(name: ResourceName) -> ResourceOverride {
    match name {
        ResourceName::Launches => ResourceOverride {
            primary_key: Some(vec!["id".to_string()]),
            merge_key: Some(vec!["year".to_string(), "month".to_string()]),
            write_strategy: Some(WriteStrategy::Merge),
            dedup_sort: Some(DedupSort::new("date_utc", SortDirection::Desc)),
            date_column: Some("date_utc".to_string()),
            ..ResourceOverride::columns(LAUNCH_COLUMNS.iter().copied())
        },
        ResourceName::Rockets => ResourceOverride::columns(ROCKET_COLUMNS.iter().copied()),
        ResourceName::Launchpads => ResourceOverride::columns(LAUNCHPAD_COLUMNS.iter().copied()),
        ResourceName::Payloads => ResourceOverride::columns(PAYLOAD_COLUMNS.iter().copied()),
        ResourceName::Ships => ResourceOverride::columns(SHIP_COLUMNS.iter().copied()),
        ResourceName::Cores => ResourceOverride::columns(CORE_COLUMNS.iter().copied()),
    }
}
