//! In-batch dedup by primary key

use crate::catalog::DedupSort;
use crate::types::{JsonValue, Record};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Collapse records sharing a primary key to one
///
/// With a dedup rule the record ranked first by its direction wins; records
/// whose sort value is missing or null rank last. Ties, and batches without
/// a rule, keep the first record seen. Records with a missing or null key
/// column have no identity and pass through untouched. Output follows the
/// order in which each key first appeared.
pub fn dedup_records(
    records: Vec<Record>,
    primary_key: &[String],
    dedup_sort: Option<&DedupSort>,
) -> Vec<Record> {
    if primary_key.is_empty() {
        return records;
    }

    let mut slots: HashMap<String, usize> = HashMap::with_capacity(records.len());
    let mut kept: Vec<Record> = Vec::with_capacity(records.len());

    for record in records {
        let Some(key) = key_of(&record, primary_key) else {
            kept.push(record);
            continue;
        };
        match slots.get(&key) {
            None => {
                slots.insert(key, kept.len());
                kept.push(record);
            }
            Some(&idx) => {
                if let Some(sort) = dedup_sort {
                    if outranks(&record, &kept[idx], sort) {
                        kept[idx] = record;
                    }
                }
            }
        }
    }

    kept
}

/// Serialized key, or `None` when any key column is missing or null
fn key_of(record: &Record, primary_key: &[String]) -> Option<String> {
    let parts = primary_key
        .iter()
        .map(|c| record.get(c).filter(|v| !v.is_null()).cloned())
        .collect::<Option<Vec<JsonValue>>>()?;
    Some(JsonValue::Array(parts).to_string())
}

/// Strictly better than the incumbent; equal ranks keep the incumbent
fn outranks(candidate: &Record, incumbent: &Record, sort: &DedupSort) -> bool {
    let value = |r: &Record| r.get(&sort.column).filter(|v| !v.is_null()).cloned();
    match (value(candidate), value(incumbent)) {
        (Some(c), Some(i)) => sort.direction.apply(compare_json(&c, &i)) == Ordering::Less,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

/// Total order over JSON scalars: bools < numbers < strings < arrays < objects
pub(crate) fn compare_json(a: &JsonValue, b: &JsonValue) -> Ordering {
    fn rank(v: &JsonValue) -> u8 {
        match v {
            JsonValue::Null => 0,
            JsonValue::Bool(_) => 1,
            JsonValue::Number(_) => 2,
            JsonValue::String(_) => 3,
            JsonValue::Array(_) => 4,
            JsonValue::Object(_) => 5,
        }
    }

    match (a, b) {
        (JsonValue::Bool(x), JsonValue::Bool(y)) => x.cmp(y),
        (JsonValue::Number(x), JsonValue::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => {
                let (x, y) = (x.as_f64().unwrap_or(f64::NAN), y.as_f64().unwrap_or(f64::NAN));
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            }
        },
        (JsonValue::String(x), JsonValue::String(y)) => x.cmp(y),
        _ if rank(a) == rank(b) => a.to_string().cmp(&b.to_string()),
        _ => rank(a).cmp(&rank(b)),
    }
}
