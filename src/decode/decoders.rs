//! Decoder implementations

use super::types::{RecordDecoder, DEFAULT_RECORD_PATH};
use crate::error::{Error, Result};
use serde_json::Value;

// ============================================================================
// JSON Decoder
// ============================================================================

/// JSON decoder selecting records at a path
///
/// Paths are either simple (`docs[*]`, `$.data.items`, `results[0]`) or
/// full JSONPath expressions. Selecting a missing key, or `null`, gives no
/// records. A `[*]` wildcard over anything but an array gives no records;
/// a plain path ending at an object gives that single record.
#[derive(Debug, Clone)]
pub struct JsonDecoder {
    record_path: String,
}

impl Default for JsonDecoder {
    fn default() -> Self {
        Self::with_path(DEFAULT_RECORD_PATH)
    }
}

impl JsonDecoder {
    /// Create a decoder selecting `docs[*]`
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder with a record path
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            record_path: path.into(),
        }
    }

    pub fn record_path(&self) -> &str {
        &self.record_path
    }
}

impl RecordDecoder for JsonDecoder {
    fn records(&self, value: &Value) -> Result<Vec<Value>> {
        let path = self.record_path.as_str();
        // jsonpath-rust only for filters and deep wildcards
        if needs_jsonpath(path) {
            return extract_with_jsonpath(value, path);
        }

        Ok(match extract_simple_path(value, path) {
            Some(Value::Array(arr)) => arr,
            Some(Value::Null) | None => Vec::new(),
            Some(v) => vec![v],
        })
    }
}

fn needs_jsonpath(path: &str) -> bool {
    path.contains("..") || path.contains("[?") || path.matches('*').count() > 1
}

/// Walk a dot path with optional `[n]`, `[-n]` or trailing `[*]` segments
fn extract_simple_path(value: &Value, path: &str) -> Option<Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);

    let mut current = value;
    for part in path.split('.').filter(|p| !p.is_empty()) {
        let Some(bracket_pos) = part.find('[') else {
            current = current.get(part)?;
            continue;
        };

        let name = &part[..bracket_pos];
        let index_str = part[bracket_pos + 1..].strip_suffix(']')?;

        if !name.is_empty() {
            current = current.get(name)?;
        }

        if index_str == "*" {
            return match current {
                Value::Array(_) => Some(current.clone()),
                _ => None,
            };
        }

        let index = index_str.parse::<i64>().ok()?;
        let arr = current.as_array()?;
        let idx = if index < 0 {
            arr.len().checked_sub(usize::try_from(index.unsigned_abs()).ok()?)?
        } else {
            usize::try_from(index).ok()?
        };
        current = arr.get(idx)?;
    }

    Some(current.clone())
}

fn extract_with_jsonpath(value: &Value, path: &str) -> Result<Vec<Value>> {
    use jsonpath_rust::JsonPath;

    let jp = JsonPath::try_from(path)
        .map_err(|e| Error::json_path(format!("Invalid JSONPath '{path}': {e}")))?;

    match jp.find(value) {
        Value::Array(arr) => Ok(arr),
        Value::Null => Ok(vec![]),
        other => Ok(vec![other]),
    }
}
