//! Compression pipeline: orchestrates path collection, code assignment,
//! tabular encoding, field encoding and schema assembly.

use crate::codes::{build_field_code_map, CodeMap};
use crate::fields::{FieldDecoder, FieldEncoder};
use crate::paths::collect_logical_fields;
use crate::schema::{build_schema_object, CompressedPayload, SCHEMA_VERSION};
use crate::tabular::{decode_tabular_arrays, encode_tabular_arrays};
use jc_core::config::is_root_array_key;
use jc_core::{CodecError, CompressionConfig, KeyMappingStrategy, Result, RootType};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Character counts for a compressed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionStats {
    pub original_chars: usize,
    /// Serialized `{schema, data}`.
    pub compressed_chars: usize,
    /// Serialized `data` alone.
    pub data_chars: usize,
}

impl CompressionStats {
    pub fn ratio(&self) -> f64 {
        if self.original_chars == 0 { return 1.0; }
        self.compressed_chars as f64 / self.original_chars as f64
    }

    /// Negative when the schema costs more than the codes save.
    pub fn reduction_pct(&self) -> f64 {
        if self.original_chars == 0 { return 0.0; }
        (1.0 - self.ratio()) * 100.0
    }
}

/// Measure the serialized size of `original` against its payload.
pub fn measure(original: &Value, payload: &CompressedPayload) -> Result<CompressionStats> {
    Ok(CompressionStats {
        original_chars: serde_json::to_string(original)?.chars().count(),
        compressed_chars: serde_json::to_string(payload)?.chars().count(),
        data_chars: serde_json::to_string(&payload.data)?.chars().count(),
    })
}

fn has_root_table<V>(tables: &BTreeMap<String, V>) -> bool {
    tables.keys().any(|key| is_root_array_key(key))
}

fn named_tables<V>(tables: &BTreeMap<String, V>) -> BTreeSet<String> {
    tables.keys().filter(|key| !is_root_array_key(key)).cloned().collect()
}

/// Compress `data` (an object or array) into `{schema, data}`.
pub fn compress(data: &Value, config: &CompressionConfig) -> Result<CompressedPayload> {
    config.validate()?;
    let root_type = RootType::of(data)?;
    let sep = config.separator();

    let fields = collect_logical_fields(data, config);
    if config.key_mapping.strategy == KeyMappingStrategy::Identity {
        if let Some((path, key)) = fields.identity_conflicts.first() {
            return Err(CodecError::AmbiguousKey { key: key.clone(), path: path.clone() });
        }
    }
    let codes = build_field_code_map(&fields.paths, &config.key_mapping, &fields.passthrough_keys)?;
    let encoder = FieldEncoder::new(&codes, &fields.excluded, sep);

    let (encoded, tables) = encode_tabular_arrays(data, &encoder, &config.tabular);

    // A tabulated root is final. Otherwise encode everything except the
    // named tables, which are already in row form.
    let final_data = if has_root_table(&tables) {
        encoded
    } else {
        match &encoded {
            Value::Object(map) => Value::Object(encoder.encode_object(map, "", &named_tables(&tables))),
            other => encoder.encode_value(other, ""),
        }
    };

    debug!(
        root = root_type.as_str(),
        paths = fields.paths.len(),
        excluded = fields.excluded.len(),
        tables = tables.len(),
        strategy = config.key_mapping.strategy.as_str(),
        "compressed document"
    );

    let schema = build_schema_object(root_type, config, &codes, tables);
    Ok(CompressedPayload { schema, data: final_data })
}

/// Decompress a `{schema, data}` document. Only the schema is needed.
pub fn decompress(compressed: &Value) -> Result<Value> {
    decompress_payload(&CompressedPayload::from_value(compressed)?)
}

/// Decompress an already-parsed payload.
pub fn decompress_payload(payload: &CompressedPayload) -> Result<Value> {
    let schema = &payload.schema;
    if schema.version != SCHEMA_VERSION {
        return Err(CodecError::UnsupportedVersion(schema.version.into()));
    }
    if !schema.original_root_type.matches(&payload.data) {
        return Err(CodecError::InvalidCompressedFormat(format!(
            "schema declares a root {} but data is {}",
            schema.original_root_type.as_str(),
            jc_core::json_kind(&payload.data)
        )));
    }
    let sep = schema.separator();
    if sep.is_empty() {
        return Err(CodecError::InvalidCompressedFormat("empty path separator".into()));
    }

    let codes = CodeMap::from_fields(schema.fields.clone());
    let decoder = FieldDecoder::new(&codes, sep);
    let empty = BTreeMap::new();
    let tables = schema.tabular_arrays().unwrap_or(&empty);

    let decoded = decode_tabular_arrays(&payload.data, &decoder, tables);

    // Mirrors the skips in `compress`.
    let result = if has_root_table(tables) {
        decoded
    } else {
        match &decoded {
            Value::Object(map) => Value::Object(decoder.decode_object(map, "", &named_tables(tables))),
            other => decoder.decode_value(other, ""),
        }
    };

    debug!(
        root = schema.original_root_type.as_str(),
        fields = codes.len(),
        tables = tables.len(),
        "decompressed document"
    );
    Ok(result)
}

/// A compressor bound to one validated configuration.
#[derive(Debug, Clone, Default)]
pub struct JsonCompactor {
    config: CompressionConfig,
}

impl JsonCompactor {
    pub fn new(config: CompressionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Parse and validate a loosely-typed configuration document.
    pub fn from_config_value(value: &Value) -> Result<Self> {
        Ok(Self { config: CompressionConfig::from_value(value)? })
    }

    pub fn config(&self) -> &CompressionConfig {
        &self.config
    }

    pub fn compress(&self, data: &Value) -> Result<CompressedPayload> {
        compress(data, &self.config)
    }

    pub fn decompress(&self, compressed: &Value) -> Result<Value> {
        decompress(compressed)
    }

    /// Compress a JSON document into its persisted single-document form.
    pub fn compress_to_string(&self, json: &str) -> Result<String> {
        let data: Value = serde_json::from_str(json)?;
        Ok(serde_json::to_string(&self.compress(&data)?)?)
    }

    pub fn decompress_str(&self, json: &str) -> Result<String> {
        let compressed: Value = serde_json::from_str(json)?;
        Ok(serde_json::to_string(&self.decompress(&compressed)?)?)
    }
}
