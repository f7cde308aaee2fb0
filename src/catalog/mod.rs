//! Resource catalog module
//!
//! # Overview
//!
//! The catalog maps each [`ResourceName`] to a validated
//! [`ResourceDefinition`]: endpoint, attribute allow-list, keys, write
//! strategy, dedup rule and optional date attribute.
//!
//! Definitions are built by merging a [`ResourceOverride`] into shared
//! [`ResourceDefaults`]. Validation runs once at construction, so a
//! [`Catalog`] value always holds one definition per resource.
//!
//! # Example
//!
//! ```
//! use bronze_loader::catalog::{Catalog, ResourceName};
//!
//! let catalog = Catalog::spacex().unwrap();
//! let launches = catalog.get(ResourceName::Launches);
//! assert_eq!(launches.endpoint_path(), "launches/query");
//! assert!(launches.is_time_partitioned());
//! ```

mod builtin;
mod types;

pub use builtin::{
    spacex_override, CORE_COLUMNS, LAUNCHPAD_COLUMNS, LAUNCH_COLUMNS, PAYLOAD_COLUMNS,
    ROCKET_COLUMNS, SHIP_COLUMNS,
};
pub use types::{
    DedupSort, ResourceDefaults, ResourceDefinition, ResourceName, ResourceOverride, TABLE_PREFIX,
};

use crate::error::Result;
use tracing::debug;

/// Validated set of resource definitions, one per [`ResourceName`]
#[derive(Debug, Clone)]
pub struct Catalog {
    resources: Vec<ResourceDefinition>,
}

impl Catalog {
    /// The built-in SpaceX catalog with default settings
    pub fn spacex() -> Result<Self> {
        Self::build(&ResourceDefaults::default(), spacex_override)
    }

    /// The built-in SpaceX catalog requesting `limit` records per page
    pub fn spacex_with_page_limit(limit: u32) -> Result<Self> {
        let defaults = ResourceDefaults {
            endpoint: ResourceDefaults::default().endpoint.with_page_limit(limit),
            ..ResourceDefaults::default()
        };
        Self::build(&defaults, spacex_override)
    }

    /// Build a catalog from defaults and a per-resource override source
    pub fn build<F>(defaults: &ResourceDefaults, overrides: F) -> Result<Self>
    where
        F: Fn(ResourceName) -> ResourceOverride,
    {
        let resources = ResourceName::ALL
            .into_iter()
            .map(|name| defaults.resolve(name, overrides(name)))
            .collect::<Result<Vec<_>>>()?;
        debug!("Catalog built with {} resources", resources.len());
        Ok(Self { resources })
    }

    /// Definition for a resource
    pub fn get(&self, name: ResourceName) -> &ResourceDefinition {
        &self.resources[name.index()]
    }

    /// Definition for a resource given by name (`launches` or `bronze_launches`)
    pub fn lookup(&self, name: &str) -> Result<&ResourceDefinition> {
        Ok(self.get(name.parse()?))
    }

    /// Resolve a selection; an empty selection means every resource
    ///
    /// Duplicates are dropped, catalog order is kept.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<&ResourceDefinition>> {
        if names.is_empty() {
            return Ok(self.iter().collect());
        }
        let mut wanted = names
            .iter()
            .map(|n| n.as_ref().parse::<ResourceName>())
            .collect::<Result<Vec<_>>>()?;
        wanted.sort_unstable();
        wanted.dedup();
        Ok(wanted.into_iter().map(|n| self.get(n)).collect())
    }

    /// Resource names, in catalog order
    pub fn names(&self) -> Vec<ResourceName> {
        self.resources.iter().map(ResourceDefinition::name).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceDefinition> {
        self.resources.iter()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}
