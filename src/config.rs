//! Configuration types
//!
//! Two layers live here:
//! - [`Settings`]: process-level settings (API base URL, destination,
//!   dataset, page size, timeout) read from a YAML file, then the
//!   environment, then CLI flags.
//! - [`EndpointDefaults`] / [`EndpointOverride`]: the typed request shape
//!   shared by every resource and the per-resource fields that replace it.

use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue, Method, OptionStringExt};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ============================================================================
// Process Settings
// ============================================================================

/// Default API root
pub const DEFAULT_BASE_URL: &str = "https://api.spacexdata.com/v4/";

/// Default page size sent as `options.limit`
pub const DEFAULT_PAGE_LIMIT: u32 = 50;

/// Environment variable prefix for settings overrides
pub const ENV_PREFIX: &str = "BRONZE_";

/// Settings for one loader process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Settings {
    /// API root joined with each endpoint path
    pub base_url: String,
    /// DuckDB database file
    pub destination: PathBuf,
    /// Schema the bronze tables are created in
    pub dataset: String,
    /// Records requested per page
    pub page_limit: u32,
    /// Transport timeout in seconds
    pub timeout_secs: u64,
    /// User agent override
    pub user_agent: Option<String>,
    /// Resources to run (empty = all)
    pub resources: Vec<String>,
    /// Where the page number goes and which flag announces more pages
    pub pagination: PaginationSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            destination: PathBuf::from("spacex_api.duckdb"),
            dataset: "bronze".to_string(),
            page_limit: DEFAULT_PAGE_LIMIT,
            timeout_secs: 30,
            user_agent: None,
            resources: Vec::new(),
            pagination: PaginationSettings::default(),
        }
    }
}

/// Body pagination layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct PaginationSettings {
    /// First page requested
    pub initial_page: u32,
    /// Request body object holding the page number
    pub options_key: String,
    /// Page number field inside `options_key`
    pub page_key: String,
    /// Boolean response field announcing another page
    pub has_next_key: String,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            initial_page: 1,
            options_key: "options".to_string(),
            page_key: "page".to_string(),
            has_next_key: "hasNextPage".to_string(),
        }
    }
}

impl Settings {
    /// Parse settings from YAML; omitted fields keep their defaults
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read settings file '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load settings: defaults, then the optional file, then `BRONZE_*` variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        settings.apply_env(|key| std::env::var(key).ok())?;
        settings.validate()?;
        Ok(settings)
    }

    /// Apply `BRONZE_*` overrides read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}")).none_if_empty();

        if let Some(url) = var("BASE_URL") {
            self.base_url = url;
        }
        if let Some(dest) = var("DESTINATION") {
            self.destination = PathBuf::from(dest);
        }
        if let Some(dataset) = var("DATASET") {
            self.dataset = dataset;
        }
        if let Some(limit) = var("PAGE_LIMIT") {
            self.page_limit = limit.trim().parse().map_err(|e| {
                Error::invalid_value("BRONZE_PAGE_LIMIT", format!("'{limit}': {e}"))
            })?;
        }
        if let Some(timeout) = var("TIMEOUT_SECS") {
            self.timeout_secs = timeout.trim().parse().map_err(|e| {
                Error::invalid_value("BRONZE_TIMEOUT_SECS", format!("'{timeout}': {e}"))
            })?;
        }
        if let Some(agent) = var("USER_AGENT") {
            self.user_agent = Some(agent);
        }
        if let Some(resources) = var("RESOURCES") {
            self.resources = split_list(&resources);
        }
        Ok(())
    }

    /// Validate settings values
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::invalid_value("base_url", "cannot be empty"));
        }
        url::Url::parse(&self.base_url)?;

        if self.page_limit == 0 {
            return Err(Error::invalid_value("page_limit", "must be at least 1"));
        }
        if self.timeout_secs == 0 {
            return Err(Error::invalid_value("timeout_secs", "must be at least 1"));
        }
        for (field, key) in [
            ("pagination.options_key", &self.pagination.options_key),
            ("pagination.page_key", &self.pagination.page_key),
            ("pagination.has_next_key", &self.pagination.has_next_key),
        ] {
            if key.trim().is_empty() {
                return Err(Error::invalid_value(field, "cannot be empty"));
            }
        }
        if self.dataset.is_empty()
            || !self
                .dataset
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(Error::invalid_value(
                "dataset",
                format!("'{}' must be a plain identifier", self.dataset),
            ));
        }
        Ok(())
    }
}

/// Split a comma-separated list, dropping blanks
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

// ============================================================================
// Endpoint Defaults / Overrides
// ============================================================================

/// Request shape shared by every resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EndpointDefaults {
    /// HTTP method
    pub method: Method,
    /// Selector for the record list in each response
    pub data_selector: String,
    /// Base filter object sent as `query`
    #[serde(default)]
    pub query: JsonObject,
    /// Base options object sent as `options`
    #[serde(default)]
    pub options: JsonObject,
}

impl Default for EndpointDefaults {
    fn default() -> Self {
        let mut options = JsonObject::new();
        options.insert("limit".to_string(), JsonValue::from(DEFAULT_PAGE_LIMIT));
        Self {
            method: Method::POST,
            data_selector: "docs[*]".to_string(),
            query: JsonObject::new(),
            options,
        }
    }
}

impl EndpointDefaults {
    /// Set the page size
    #[must_use]
    pub fn with_page_limit(mut self, limit: u32) -> Self {
        self.options
            .insert("limit".to_string(), JsonValue::from(limit));
        self
    }

    /// Merge a per-resource override into these defaults
    ///
    /// Scalar fields set on the override replace the default. `query` and
    /// `options` merge key by key: override keys win, other default keys
    /// are inherited.
    pub fn merge(&self, path: &str, over: &EndpointOverride) -> EndpointConfig {
        let mut query = self.query.clone();
        query.extend(over.query.clone());
        let mut options = self.options.clone();
        options.extend(over.options.clone());

        EndpointConfig {
            path: path.to_string(),
            method: over.method.unwrap_or(self.method),
            data_selector: over
                .data_selector
                .clone()
                .unwrap_or_else(|| self.data_selector.clone()),
            query,
            options,
        }
    }
}

/// Per-resource request fields; unset fields inherit the defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct EndpointOverride {
    /// HTTP method override
    pub method: Option<Method>,
    /// Record selector override
    pub data_selector: Option<String>,
    /// Extra `query` keys
    pub query: JsonObject,
    /// Extra `options` keys
    pub options: JsonObject,
}

/// Fully resolved request configuration for one resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Path relative to the API root
    pub path: String,
    /// HTTP method
    pub method: Method,
    /// Selector for the record list in each response
    pub data_selector: String,
    /// Static part of the `query` object
    pub query: JsonObject,
    /// Static part of the `options` object
    pub options: JsonObject,
}

impl EndpointConfig {
    /// Assemble the request body `{ "query": ..., "options": ... }`
    pub fn body(&self, extra_query: JsonObject) -> JsonValue {
        let mut query = self.query.clone();
        query.extend(extra_query);

        let mut body = JsonObject::new();
        body.insert("query".to_string(), JsonValue::Object(query));
        body.insert(
            "options".to_string(),
            JsonValue::Object(self.options.clone()),
        );
        JsonValue::Object(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::HashMap;

    fn obj(value: JsonValue) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.dataset, "bronze");
        assert_eq!(settings.page_limit, 50);
        assert!(settings.resources.is_empty());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_settings_from_yaml_partial() {
        let yaml = r#"
destination: /tmp/warehouse.duckdb
page_limit: 100
resources: [launches, rockets]
"#;
        let settings = Settings::from_yaml_str(yaml).unwrap();
        assert_eq!(settings.destination, PathBuf::from("/tmp/warehouse.duckdb"));
        assert_eq!(settings.page_limit, 100);
        assert_eq!(settings.resources, vec!["launches", "rockets"]);
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_settings_pagination_layout() {
        let yaml = r#"
pagination:
  page_key: pageNumber
  has_next_key: more
"#;
        let settings = Settings::from_yaml_str(yaml).unwrap();
        assert_eq!(settings.pagination.options_key, "options");
        assert_eq!(settings.pagination.page_key, "pageNumber");
        assert_eq!(settings.pagination.has_next_key, "more");
        assert_eq!(settings.pagination.initial_page, 1);

        assert!(Settings::from_yaml_str("pagination:\n  page_key: \"\"\n").is_err());
    }

    #[test]
    fn test_settings_from_yaml_rejects_bad_values() {
        assert!(Settings::from_yaml_str("page_limit: 0").is_err());
        assert!(Settings::from_yaml_str("base_url: not a url").is_err());
        assert!(Settings::from_yaml_str("dataset: \"drop table\"").is_err());
    }

    #[test]
    fn test_settings_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("BRONZE_BASE_URL", "http://localhost:8080/v4/"),
            ("BRONZE_DATASET", "raw"),
            ("BRONZE_PAGE_LIMIT", " 25 "),
            ("BRONZE_RESOURCES", "launches, ,cores"),
            ("BRONZE_USER_AGENT", ""),
        ]);

        let mut settings = Settings::default();
        settings
            .apply_env(|k| env.get(k).map(ToString::to_string))
            .unwrap();

        assert_eq!(settings.base_url, "http://localhost:8080/v4/");
        assert_eq!(settings.dataset, "raw");
        assert_eq!(settings.page_limit, 25);
        assert_eq!(settings.resources, vec!["launches", "cores"]);
        assert!(settings.user_agent.is_none());
    }

    #[test]
    fn test_settings_env_invalid_number() {
        let mut settings = Settings::default();
        let err = settings
            .apply_env(|k| (k == "BRONZE_PAGE_LIMIT").then(|| "many".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("BRONZE_PAGE_LIMIT"));
        assert!(err.is_config_error());
    }

    #[test]
    fn test_settings_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yaml");
        std::fs::write(&path, "dataset: staging\n").unwrap();

        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.dataset, "staging");

        let missing = Settings::from_file(dir.path().join("nope.yaml")).unwrap_err();
        assert!(missing.to_string().contains("nope.yaml"));
    }

    #[test]
    fn test_endpoint_defaults() {
        let defaults = EndpointDefaults::default();
        assert_eq!(defaults.method, Method::POST);
        assert_eq!(defaults.data_selector, "docs[*]");
        assert_eq!(JsonValue::Object(defaults.options), json!({"limit": 50}));
    }

    #[test]
    fn test_override_inherits_unset_fields() {
        let defaults = EndpointDefaults::default().with_page_limit(10);
        let resolved = defaults.merge("rockets/query", &EndpointOverride::default());

        assert_eq!(resolved.path, "rockets/query");
        assert_eq!(resolved.method, Method::POST);
        assert_eq!(resolved.data_selector, "docs[*]");
        assert_eq!(JsonValue::Object(resolved.options), json!({"limit": 10}));
    }

    #[test]
    fn test_override_wins_over_defaults() {
        let defaults = EndpointDefaults {
            query: obj(json!({"upcoming": false})),
            ..EndpointDefaults::default()
        };
        let over = EndpointOverride {
            method: Some(Method::GET),
            data_selector: Some("$.items[*]".to_string()),
            query: obj(json!({"upcoming": true, "success": true})),
            options: obj(json!({"sort": {"date_utc": "asc"}})),
        };

        let resolved = defaults.merge("launches/query", &over);
        assert_eq!(resolved.method, Method::GET);
        assert_eq!(resolved.data_selector, "$.items[*]");
        assert_eq!(
            JsonValue::Object(resolved.query),
            json!({"upcoming": true, "success": true})
        );
        assert_eq!(
            JsonValue::Object(resolved.options),
            json!({"limit": 50, "sort": {"date_utc": "asc"}})
        );
    }

    #[test]
    fn test_endpoint_body() {
        let resolved = EndpointDefaults::default().merge("x", &EndpointOverride::default());
        let body = resolved.body(obj(json!({"date_utc": {"$gte": "a"}})));
        assert_eq!(
            body,
            json!({"query": {"date_utc": {"$gte": "a"}}, "options": {"limit": 50}})
        );
    }

    #[test]
    fn test_override_from_yaml() {
        let over: EndpointOverride = serde_yaml::from_str("method: GET\noptions:\n  limit: 5\n").unwrap();
        assert_eq!(over.method, Some(Method::GET));
        assert_eq!(over.options.get("limit"), Some(&json!(5)));
        assert!(over.query.is_empty());
    }
}
