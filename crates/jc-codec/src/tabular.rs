//! Tabular encoding of arrays of objects.
//!
//! `[{"id": "C1", "label": "Foo"}, {"id": "C2", "label": "Bar"}]` becomes
//! `[["C1", "Foo"], ["C2", "Bar"]]` plus a column list in the schema. Only
//! the root array or arrays held directly by top-level keys are eligible.

use crate::fields::{FieldDecoder, FieldEncoder};
use crate::paths::{element_prefix, join_path};
use crate::schema::{TabularArray, TabularKind};
use jc_core::config::is_root_array_key;
use jc_core::TabularConfig;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Eligible arrays are non-empty and hold nothing but objects.
fn is_object_array(items: &[Value]) -> bool {
    !items.is_empty() && items.iter().all(Value::is_object)
}

/// Encode `items`, the array at logical path `array_path`, into rows.
fn encode_rows(items: &[Value], array_path: &str, encoder: &FieldEncoder<'_>) -> (Vec<Value>, TabularArray) {
    let prefix = element_prefix(array_path);
    let sep = encoder.separator();

    // path → key, ordered by path.
    let mut columns: BTreeMap<String, &str> = BTreeMap::new();
    for map in items.iter().filter_map(Value::as_object) {
        for (key, value) in map {
            let path = join_path(&prefix, key, sep);
            if !encoder.drops(&path, value) {
                columns.insert(path, key.as_str());
            }
        }
    }

    let mut missing = Vec::new();
    let rows: Vec<Value> = items
        .iter()
        .filter_map(Value::as_object)
        .enumerate()
        .map(|(row, map)| {
            let cells = columns
                .iter()
                .enumerate()
                .map(|(col, (path, key))| match map.get(*key) {
                    Some(value) if !encoder.drops(path, value) => encoder.encode_value(value, path),
                    _ => {
                        missing.push([row, col]);
                        Value::Null
                    }
                })
                .collect();
            Value::Array(cells)
        })
        .collect();

    let fields = columns
        .iter()
        .map(|(path, key)| encoder.key_for(path, key).to_string())
        .collect();

    (
        rows,
        TabularArray {
            fields,
            kind: TabularKind::ObjectArray,
            missing,
        },
    )
}

/// Replace the configured arrays of `data` with row tables.
///
/// A target holding anything but objects is left as-is for the field codec,
/// so every element keeps its exact shape.
///
/// Returns the transformed document and the metadata for each array that was
/// encoded, keyed by `""`/`"[]"` for the root or by the top-level key.
/// Cells holding objects are field-encoded here; the caller must not encode
/// the tables again.
pub fn encode_tabular_arrays(
    data: &Value,
    encoder: &FieldEncoder<'_>,
    config: &TabularConfig,
) -> (Value, BTreeMap<String, TabularArray>) {
    let mut metadata = BTreeMap::new();
    if !config.is_active() {
        return (data.clone(), metadata);
    }

    match data {
        Value::Array(items) => {
            let Some(root_key) = config.root_key() else {
                return (data.clone(), metadata);
            };
            if !is_object_array(items) {
                debug!(len = items.len(), "root array is not a non-empty array of objects, left untabulated");
                return (data.clone(), metadata);
            }
            let (rows, meta) = encode_rows(items, "", encoder);
            metadata.insert(root_key.to_string(), meta);
            (Value::Array(rows), metadata)
        }
        Value::Object(map) => {
            let mut result = map.clone();
            for array_path in config.named_paths() {
                match map.get(array_path) {
                    Some(Value::Array(items)) if is_object_array(items) => {
                        let (rows, meta) = encode_rows(items, array_path, encoder);
                        result.insert(array_path.to_string(), Value::Array(rows));
                        metadata.insert(array_path.to_string(), meta);
                    }
                    _ => debug!(array_path, "tabular target absent or not an array of objects"),
                }
            }
            (Value::Object(result), metadata)
        }
        other => (other.clone(), metadata),
    }
}

fn decode_rows(rows: &[Value], array_path: &str, meta: &TabularArray, decoder: &FieldDecoder<'_>) -> Vec<Value> {
    let prefix = element_prefix(array_path);
    let columns: Vec<(String, String)> = meta
        .fields
        .iter()
        .map(|id| decoder.resolve_key(id, &prefix))
        .collect();
    let missing: HashSet<(usize, usize)> = meta.missing.iter().map(|&[r, c]| (r, c)).collect();

    rows.iter()
        .enumerate()
        .map(|(row, value)| match value {
            Value::Array(cells) => {
                let mut obj = Map::new();
                for (col, (name, path)) in columns.iter().enumerate() {
                    if missing.contains(&(row, col)) {
                        continue;
                    }
                    let cell = cells
                        .get(col)
                        .map(|cell| decoder.decode_value(cell, path))
                        .unwrap_or(Value::Null);
                    obj.insert(name.clone(), cell);
                }
                Value::Object(obj)
            }
            other => other.clone(),
        })
        .collect()
}

/// Rebuild arrays of objects from row tables described by `metadata`.
/// Short rows yield null for their trailing fields.
pub fn decode_tabular_arrays(
    data: &Value,
    decoder: &FieldDecoder<'_>,
    metadata: &BTreeMap<String, TabularArray>,
) -> Value {
    if metadata.is_empty() {
        return data.clone();
    }

    match data {
        Value::Array(rows) => match metadata.iter().find(|(key, _)| is_root_array_key(key)) {
            Some((_, meta)) => Value::Array(decode_rows(rows, "", meta, decoder)),
            None => data.clone(),
        },
        Value::Object(map) => {
            let mut result = map.clone();
            for (key, meta) in metadata.iter().filter(|(key, _)| !is_root_array_key(key)) {
                if let Some(Value::Array(rows)) = map.get(key) {
                    result.insert(key.clone(), Value::Array(decode_rows(rows, key, meta, decoder)));
                }
            }
            Value::Object(result)
        }
        other => other.clone(),
    }
}
