//! Logical path collection.
//!
//! A logical path joins object keys with the configured separator and marks
//! "one element of an array" with `[]`, e.g. `anchors[].anchor_id`. Every
//! element of an array shares the same path template.

use jc_core::{CompressionConfig, ROOT_ARRAY_MARKER};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Join an object key onto a path prefix.
pub fn join_path(prefix: &str, key: &str, sep: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}{sep}{key}")
    }
}

/// Path template shared by the elements of the array at `prefix`.
pub fn element_prefix(prefix: &str) -> String {
    format!("{prefix}{ROOT_ARRAY_MARKER}")
}

/// What every child path of `prefix` starts with.
pub fn child_base(prefix: &str, sep: &str) -> String {
    if prefix.is_empty() {
        String::new()
    } else {
        format!("{prefix}{sep}")
    }
}

/// True if an object occurs anywhere inside `items`, at any array depth.
pub fn contains_objects(items: &[Value]) -> bool {
    items.iter().any(|item| match item {
        Value::Object(_) => true,
        Value::Array(inner) => contains_objects(inner),
        _ => false,
    })
}

/// Leaves are scalars (null included) and arrays without objects. Leaf keys
/// get codes; their values are never rewritten.
pub fn is_leaf(value: &Value) -> bool {
    match value {
        Value::Object(_) => false,
        Value::Array(items) => !contains_objects(items),
        _ => true,
    }
}

/// Result of walking a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogicalFields {
    /// Leaf paths that survive filtering, sorted lexicographically.
    pub paths: Vec<String>,
    /// Leaf paths dropped by the filter.
    pub excluded: BTreeSet<String>,
    /// Container keys whose path is not a kept leaf. These are written
    /// verbatim, so no code may equal one of them.
    pub passthrough_keys: BTreeSet<String>,
    /// (path, key) of verbatim keys that start with their parent's path and
    /// equal a kept leaf path. Under identity codes they would decode as that
    /// leaf.
    pub identity_conflicts: Vec<(String, String)>,
}

struct PathWalker<'a> {
    sep: &'a str,
    leaves: BTreeSet<String>,
    /// (path, key) of every container-valued key.
    containers: BTreeSet<(String, String)>,
}

impl<'a> PathWalker<'a> {
    fn new(sep: &'a str) -> Self {
        Self {
            sep,
            leaves: BTreeSet::new(),
            containers: BTreeSet::new(),
        }
    }

    fn walk(&mut self, value: &Value, prefix: &str) {
        match value {
            Value::Object(map) => self.walk_object(map, prefix),
            Value::Array(items) => self.walk_array(items, prefix),
            _ => {}
        }
    }

    fn walk_object(&mut self, map: &Map<String, Value>, prefix: &str) {
        for (key, value) in map {
            let path = join_path(prefix, key, self.sep);
            if is_leaf(value) {
                self.leaves.insert(path);
            } else {
                self.walk(value, &path);
                self.containers.insert((path, key.clone()));
            }
        }
    }

    // Heterogeneous elements contribute the union of their keys.
    fn walk_array(&mut self, items: &[Value], prefix: &str) {
        let prefix = element_prefix(prefix);
        for item in items {
            match item {
                Value::Object(map) => self.walk_object(map, &prefix),
                Value::Array(inner) => self.walk_array(inner, &prefix),
                _ => {}
            }
        }
    }
}

/// Collect the sorted, filtered set of logical leaf paths of `data`.
///
/// Filtering matches exact full paths: a non-empty `include_paths` keeps only
/// the listed paths, then `exclude_paths` is subtracted.
pub fn collect_logical_fields(data: &Value, config: &CompressionConfig) -> LogicalFields {
    let mut walker = PathWalker::new(config.separator());
    walker.walk(data, "");

    let (kept, excluded): (Vec<String>, Vec<String>) = walker
        .leaves
        .iter()
        .cloned()
        .partition(|path| config.filter.retains(path));

    let verbatim: Vec<(String, String)> = walker
        .containers
        .into_iter()
        .filter(|(path, _)| kept.binary_search(path).is_err())
        .collect();

    let identity_conflicts = verbatim
        .iter()
        .filter(|(path, key)| {
            let parent = &path[..path.len() - key.len()];
            path != key && key.starts_with(parent) && kept.binary_search(key).is_ok()
        })
        .cloned()
        .collect();

    LogicalFields {
        paths: kept,
        excluded: excluded.into_iter().collect(),
        passthrough_keys: verbatim.into_iter().map(|(_, key)| key).collect(),
        identity_conflicts,
    }
}
