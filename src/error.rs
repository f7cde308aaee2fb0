//! Error types for the bronze loader
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Two response-shape problems are deliberately *not* errors: a missing
//! `hasNextPage` flag ends pagination and a missing record list yields an
//! empty page. See [`crate::pagination`] and [`crate::decode`].

use thiserror::Error;

/// The main error type for the bronze loader
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Invalid extraction window {year}-{month:02}: month must be between 1 and 12")]
    InvalidWindow { year: i32, month: u32 },

    #[error("Unknown resource '{name}'. Valid resources: {}", valid.join(", "))]
    UnknownResource { name: String, valid: Vec<String> },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    // ============================================================================
    // Data Processing Errors
    // ============================================================================
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("JSONPath error: {message}")]
    JsonPath { message: String },

    #[error("Pagination error: {message}")]
    Pagination { message: String },

    #[error("Extraction of '{resource}' cancelled after {pages} page(s)")]
    Cancelled { resource: String, pages: usize },

    // ============================================================================
    // Sink Errors
    // ============================================================================
    #[error("Sink error: {message}")]
    Sink { message: String },

    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an invalid window error
    pub fn invalid_window(year: i32, month: u32) -> Self {
        Self::InvalidWindow { year, month }
    }

    /// Create an unknown resource error listing the valid names
    pub fn unknown_resource<I, S>(name: impl Into<String>, valid: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::UnknownResource {
            name: name.into(),
            valid: valid.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a JSONPath error
    pub fn json_path(message: impl Into<String>) -> Self {
        Self::JsonPath {
            message: message.into(),
        }
    }

    /// Create a pagination error
    pub fn pagination(message: impl Into<String>) -> Self {
        Self::Pagination {
            message: message.into(),
        }
    }

    /// Create a sink error
    pub fn sink(message: impl Into<String>) -> Self {
        Self::Sink {
            message: message.into(),
        }
    }

    /// Configuration problems surface immediately and are never worth retrying
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidWindow { .. }
                | Error::UnknownResource { .. }
                | Error::Config { .. }
                | Error::InvalidConfigValue { .. }
                | Error::YamlParse(_)
                | Error::InvalidUrl(_)
        )
    }

    /// Check if this error came from the HTTP exchange
    pub fn is_transport_error(&self) -> bool {
        matches!(self, Error::Http(_) | Error::HttpStatus { .. })
    }
}

/// Result type alias for the bronze loader
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::invalid_window(2021, 13);
        assert_eq!(
            err.to_string(),
            "Invalid extraction window 2021-13: month must be between 1 and 12"
        );

        let err = Error::unknown_resource("dragons", ["launches", "rockets"]);
        assert_eq!(
            err.to_string(),
            "Unknown resource 'dragons'. Valid resources: launches, rockets"
        );

        let err = Error::http_status(404, "Not found");
        assert_eq!(err.to_string(), "HTTP 404: Not found");
    }

    #[test]
    fn test_error_classification() {
        assert!(Error::invalid_window(2021, 0).is_config_error());
        assert!(Error::unknown_resource("x", Vec::<String>::new()).is_config_error());
        assert!(Error::config("bad").is_config_error());

        assert!(Error::http_status(500, "").is_transport_error());
        assert!(!Error::http_status(500, "").is_config_error());
        assert!(!Error::sink("boom").is_transport_error());
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
