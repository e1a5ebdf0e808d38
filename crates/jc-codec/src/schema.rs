//! Schema object and the `{schema, data}` payload.

use crate::codes::CodeMap;
use jc_core::{CodecError, CompressionConfig, FlattenConfig, Result, RootType, TabularConfig};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const SCHEMA_VERSION: u32 = 1;

/// Layout of a tabular-encoded array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabularKind {
    #[default]
    ObjectArray,
}

/// Column metadata for one tabular-encoded array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabularArray {
    /// Column identifiers in row order: a field code, or the verbatim key of
    /// a column that holds nested objects.
    pub fields: Vec<String>,
    #[serde(default)]
    pub kind: TabularKind,
    /// `[row, column]` cells whose field was absent in the source element or
    /// filtered out. They are written as null.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<[usize; 2]>,
}

/// Sub-configs echoed into the schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    pub flatten: FlattenConfig,
    pub tabular: TabularConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaStructure {
    pub tabular_arrays: BTreeMap<String, TabularArray>,
}

/// Everything `decompress` needs besides the data itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaObject {
    pub version: u32,
    pub original_root_type: RootType,
    #[serde(default)]
    pub config: SchemaConfig,
    /// code → logical path.
    pub fields: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure: Option<SchemaStructure>,
}

impl SchemaObject {
    pub fn separator(&self) -> &str {
        &self.config.flatten.path_separator
    }

    /// Tabular metadata, if any array was tabular-encoded.
    pub fn tabular_arrays(&self) -> Option<&BTreeMap<String, TabularArray>> {
        self.structure.as_ref().map(|s| &s.tabular_arrays)
    }
}

/// Assemble the schema. `structure` is present iff some array was
/// tabular-encoded.
pub fn build_schema_object(
    original_root_type: RootType,
    config: &CompressionConfig,
    codes: &CodeMap,
    tabular_arrays: BTreeMap<String, TabularArray>,
) -> SchemaObject {
    SchemaObject {
        version: SCHEMA_VERSION,
        original_root_type,
        config: SchemaConfig {
            flatten: config.flatten.clone(),
            tabular: config.tabular.clone(),
        },
        fields: codes.fields().clone(),
        structure: if tabular_arrays.is_empty() {
            None
        } else {
            Some(SchemaStructure { tabular_arrays })
        },
    }
}

/// A compressed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressedPayload {
    pub schema: SchemaObject,
    pub data: Value,
}

impl CompressedPayload {
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Parse a `{schema, data}` document, rejecting anything else with
    /// [`CodecError::InvalidCompressedFormat`].
    pub fn from_value(value: &Value) -> Result<Self> {
        let obj = value.as_object().ok_or_else(|| {
            CodecError::InvalidCompressedFormat(format!(
                "expected an object, got {}",
                jc_core::json_kind(value)
            ))
        })?;
        let schema = obj
            .get("schema")
            .ok_or_else(|| CodecError::InvalidCompressedFormat("missing `schema` key".into()))?;
        let data = obj
            .get("data")
            .ok_or_else(|| CodecError::InvalidCompressedFormat("missing `data` key".into()))?;
        let schema = SchemaObject::deserialize(schema)
            .map_err(|e| CodecError::InvalidCompressedFormat(format!("malformed schema: {e}")))?;
        Ok(Self {
            schema,
            data: data.clone(),
        })
    }
}
