//! Field codec: rewrite object keys between logical names and codes.
//!
//! Only leaf paths carry codes. An intermediate key such as `user` in
//! `{"user": {"name": "x"}}` has no code and is written as-is, while its
//! child becomes `{"user": {"a": "x"}}`. Decoding relies on that: inside an
//! object at path `P`, a key is a code only if its path lies directly under
//! `P`, anything else is a verbatim key.

use crate::codes::CodeMap;
use crate::paths::{child_base, element_prefix, is_leaf, join_path};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Logical names → codes.
pub struct FieldEncoder<'a> {
    codes: &'a CodeMap,
    excluded: &'a BTreeSet<String>,
    sep: &'a str,
}

impl<'a> FieldEncoder<'a> {
    pub fn new(codes: &'a CodeMap, excluded: &'a BTreeSet<String>, sep: &'a str) -> Self {
        Self { codes, excluded, sep }
    }

    pub fn separator(&self) -> &str {
        self.sep
    }

    pub fn is_excluded(&self, path: &str) -> bool {
        self.excluded.contains(path)
    }

    /// Filtering drops leaf values only. A container at an excluded path is
    /// still walked, since its children may be kept.
    pub fn drops(&self, path: &str, value: &Value) -> bool {
        is_leaf(value) && self.is_excluded(path)
    }

    /// The key written for `key` at `path`: its code, or the key itself.
    pub fn key_for<'k>(&'k self, path: &str, key: &'k str) -> &'k str {
        self.codes.code_for(path).unwrap_or(key)
    }

    /// Encode `value`, which sits at logical path `prefix`.
    pub fn encode_value(&self, value: &Value, prefix: &str) -> Value {
        match value {
            Value::Object(map) => Value::Object(self.encode_object(map, prefix, &BTreeSet::new())),
            Value::Array(items) => Value::Array(self.encode_array(items, prefix)),
            other => other.clone(),
        }
    }

    /// Encode an object, copying entries whose key is in `skip` untouched.
    pub fn encode_object(
        &self,
        map: &Map<String, Value>,
        prefix: &str,
        skip: &BTreeSet<String>,
    ) -> Map<String, Value> {
        let mut out = Map::new();
        for (key, value) in map {
            if skip.contains(key) {
                out.insert(key.clone(), value.clone());
                continue;
            }
            let path = join_path(prefix, key, self.sep);
            if self.drops(&path, value) {
                continue;
            }
            out.insert(
                self.key_for(&path, key).to_string(),
                self.encode_value(value, &path),
            );
        }
        out
    }

    fn encode_array(&self, items: &[Value], prefix: &str) -> Vec<Value> {
        let prefix = element_prefix(prefix);
        items.iter().map(|item| self.encode_value(item, &prefix)).collect()
    }
}

/// Codes → logical names.
pub struct FieldDecoder<'a> {
    codes: &'a CodeMap,
    sep: &'a str,
}

impl<'a> FieldDecoder<'a> {
    pub fn new(codes: &'a CodeMap, sep: &'a str) -> Self {
        Self { codes, sep }
    }

    /// Resolve a key found in an object at `prefix` to (name, logical path).
    /// Unknown keys, and codes whose path belongs elsewhere, are kept as-is.
    pub fn resolve_key(&self, key: &str, prefix: &str) -> (String, String) {
        if let Some(path) = self.codes.path_for(key) {
            let base = child_base(prefix, self.sep);
            if let Some(name) = path.strip_prefix(base.as_str()) {
                return (name.to_string(), path.to_string());
            }
        }
        (key.to_string(), join_path(prefix, key, self.sep))
    }

    pub fn decode_value(&self, value: &Value, prefix: &str) -> Value {
        match value {
            Value::Object(map) => Value::Object(self.decode_object(map, prefix, &BTreeSet::new())),
            Value::Array(items) => Value::Array(self.decode_array(items, prefix)),
            other => other.clone(),
        }
    }

    pub fn decode_object(
        &self,
        map: &Map<String, Value>,
        prefix: &str,
        skip: &BTreeSet<String>,
    ) -> Map<String, Value> {
        let mut out = Map::new();
        for (key, value) in map {
            if skip.contains(key) {
                out.insert(key.clone(), value.clone());
                continue;
            }
            let (name, path) = self.resolve_key(key, prefix);
            out.insert(name, self.decode_value(value, &path));
        }
        out
    }

    fn decode_array(&self, items: &[Value], prefix: &str) -> Vec<Value> {
        let prefix = element_prefix(prefix);
        items.iter().map(|item| self.decode_value(item, &prefix)).collect()
    }
}

/// Encode `data` located at `prefix`, dropping `excluded` paths.
pub fn encode_data_with_field_codes(
    data: &Value,
    codes: &CodeMap,
    excluded: &BTreeSet<String>,
    prefix: &str,
    sep: &str,
) -> Value {
    FieldEncoder::new(codes, excluded, sep).encode_value(data, prefix)
}

/// Inverse of [`encode_data_with_field_codes`] for a root-level value.
pub fn decode_data_from_field_codes(data: &Value, codes: &CodeMap, sep: &str) -> Value {
    FieldDecoder::new(codes, sep).decode_value(data, "")
}
