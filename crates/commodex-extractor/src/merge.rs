//! Merge per-chunk extraction results into one canonical record.
//!
//! Merging is order-independent apart from first-wins fields, which use the
//! chunk sequence as the deterministic tie-break. Inputs are standardized
//! per-chunk records; the merged record is standardized once more at the end
//! so it satisfies the same invariants as a single-chunk record.

use crate::error::ExtractorError;
use crate::standardize::standardize;
use serde_json::{Map, Value};
use std::collections::HashSet;

const SWOT_KEYS: [&str; 4] = ["strengths", "weaknesses", "opportunities", "threats"];

/// Fields with a dedicated merge policy; everything else merges first-wins.
const POLICY_FIELDS: [&str; 9] = [
    "commodity_name",
    "responsible_managers",
    "creation_date",
    "valid_until",
    "cost_drivers",
    "sustainability_factors",
    "quantitative_initiatives",
    "qualitative_initiatives",
    "swot_analysis",
];

/// Merge standardized per-chunk records into one record.
///
/// Chunks that failed extraction must already be filtered out; an empty
/// input means every chunk failed.
pub fn merge_records(records: Vec<Value>) -> Result<Value, ExtractorError> {
    if records.is_empty() {
        return Err(ExtractorError::AllChunksFailed);
    }

    let mut merged = Map::new();

    for field in ["commodity_name", "responsible_managers", "creation_date", "valid_until"] {
        if let Some(value) = records
            .iter()
            .filter_map(|record| record.get(field))
            .find(|value| supplies(value))
        {
            merged.insert(field.to_string(), value.clone());
        }
    }

    for field in ["cost_drivers", "sustainability_factors"] {
        if let Some(value) = merge_most_complete(&records, field) {
            merged.insert(field.to_string(), value);
        }
    }

    if let Some(value) =
        merge_initiatives(&records, "quantitative_initiatives", &["description"], "QT")
    {
        merged.insert("quantitative_initiatives".to_string(), value);
    }
    if let Some(value) =
        merge_initiatives(&records, "qualitative_initiatives", &["title", "description"], "Q")
    {
        merged.insert("qualitative_initiatives".to_string(), value);
    }

    if let Some(value) = merge_swot(&records) {
        merged.insert("swot_analysis".to_string(), value);
    }

    // Fields outside the canonical schema: first occurrence wins.
    for record in &records {
        let Some(object) = record.as_object() else {
            continue;
        };
        for (key, value) in object {
            if POLICY_FIELDS.contains(&key.as_str()) || merged.contains_key(key) {
                continue;
            }
            merged.insert(key.clone(), value.clone());
        }
    }

    Ok(standardize(Value::Object(merged)))
}

/// Whether a chunk actually supplies a value for a first-wins field.
fn supplies(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(object) => !object.is_empty(),
        _ => true,
    }
}

/// Most-complete heuristic: the mapping with the most top-level keys wins,
/// ties broken by first occurrence.
fn merge_most_complete(records: &[Value], field: &str) -> Option<Value> {
    let mut best: Option<&Map<String, Value>> = None;
    for record in records {
        if let Some(map) = record.get(field).and_then(Value::as_object) {
            if best.is_none_or(|current| map.len() > current.len()) {
                best = Some(map);
            }
        }
    }
    best.map(|map| Value::Object(map.clone()))
}

/// Concatenate initiative lists across chunks, dropping entries whose dedup
/// key text was already seen, then re-sequence IDs that match the synthetic
/// pattern. IDs that came from the source document are kept verbatim.
fn merge_initiatives(
    records: &[Value],
    field: &str,
    dedup_keys: &[&str],
    id_prefix: &str,
) -> Option<Value> {
    let mut present = false;
    let mut seen = HashSet::new();
    let mut merged: Vec<Value> = Vec::new();

    for record in records {
        let Some(value) = record.get(field) else {
            continue;
        };
        present = true;
        let Some(items) = value.as_array() else {
            continue;
        };
        for item in items {
            let key = dedup_keys
                .iter()
                .find_map(|key| item.get(*key).and_then(Value::as_str))
                .map(str::to_string);
            if let Some(key) = key {
                if !seen.insert(key) {
                    continue;
                }
            }
            merged.push(item.clone());
        }
    }

    if !present {
        return None;
    }

    for (index, item) in merged.iter_mut().enumerate() {
        if let Some(object) = item.as_object_mut() {
            let synthesized = object
                .get("id")
                .and_then(Value::as_str)
                .is_none_or(|id| is_synthetic_id(id, id_prefix));
            if synthesized {
                object.insert(
                    "id".to_string(),
                    Value::String(format!("{id_prefix}{}", index + 1)),
                );
            }
        }
    }

    Some(Value::Array(merged))
}

fn is_synthetic_id(id: &str, prefix: &str) -> bool {
    id.strip_prefix(prefix)
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}

/// Concatenate each SWOT list across chunks and deduplicate by exact string
/// equality. Survivor order is an implementation detail.
fn merge_swot(records: &[Value]) -> Option<Value> {
    let mut present = false;
    let mut out = Map::new();

    for key in SWOT_KEYS {
        let mut seen = HashSet::new();
        let mut list = Vec::new();
        for record in records {
            let Some(swot) = record.get("swot_analysis").and_then(Value::as_object) else {
                continue;
            };
            present = true;
            if let Some(items) = swot.get(key).and_then(Value::as_array) {
                for item in items {
                    if let Some(text) = item.as_str() {
                        if seen.insert(text.to_string()) {
                            list.push(Value::String(text.to_string()));
                        }
                    }
                }
            }
        }
        out.insert(key.to_string(), Value::Array(list));
    }

    present.then_some(Value::Object(out))
}
