use crate::*;
use anyhow::Result;
use jc_core::{CompressionConfig, KeyMappingStrategy};
use serde_json::{json, Value};
use std::sync::Arc;

struct FailingStrategy;

impl CompressionStrategy for FailingStrategy {
    fn name(&self) -> &str { "failing" }

    fn compress(&self, _content: &Value, _ctx: &StrategyContext) -> Result<Value> {
        anyhow::bail!("always fails")
    }

    fn decompress(&self, content: &Value, _ctx: &StrategyContext) -> Result<Value> {
        Ok(content.clone())
    }

    fn is_lossless(&self) -> bool { false }
}

fn ctx() -> StrategyContext { StrategyContext::with_source("concepts.json") }

// ========== Context ==========

#[test]
fn test_context_source() {
    assert_eq!(ctx().source_or_unknown(), "concepts.json");
    assert_eq!(StrategyContext::new().source_or_unknown(), "<unknown>");
}

// ========== Schema JSON ==========

#[test]
fn test_schema_json_roundtrip() {
    let strategy = SchemaJsonStrategy::default();
    let data = json!({"user": {"name": "x"}, "age": 3});
    let packed = strategy.compress(&data, &ctx()).unwrap();
    assert!(packed.get("schema").is_some());
    assert!(packed.get("data").is_some());
    assert_eq!(strategy.decompress(&packed, &ctx()).unwrap(), data);
    assert_eq!(strategy.name(), "schema_json");
    assert!(strategy.is_lossless());
}

#[test]
fn test_schema_json_from_params() {
    let strategy = SchemaJsonStrategy::from_params(&json!({
        "key_mapping": {"strategy": "identity"},
        "tabular": {"enabled": true, "array_paths": [""]}
    }))
    .unwrap();
    assert_eq!(strategy.config().key_mapping.strategy, KeyMappingStrategy::Identity);
    let data = json!([{"id": 1}, {"id": 2}]);
    let packed = strategy.compress(&data, &ctx()).unwrap();
    assert_eq!(packed["data"], json!([[1], [2]]));
    assert_eq!(strategy.decompress(&packed, &ctx()).unwrap(), data);
}

#[test]
fn test_schema_json_bad_params() {
    let err = SchemaJsonStrategy::from_params(&json!({"key_mapping": {"strategy": "zip"}})).unwrap_err();
    assert!(format!("{err:#}").contains("zip"));
}

#[test]
fn test_schema_json_lossy_when_filtering() {
    let strategy = SchemaJsonStrategy::new(CompressionConfig::default().with_include_paths(["id"])).unwrap();
    assert!(!strategy.is_lossless());
}

#[test]
fn test_schema_json_error_names_source() {
    let err = SchemaJsonStrategy::default().compress(&json!(42), &ctx()).unwrap_err();
    assert!(err.to_string().contains("concepts.json"));
}

// ========== Passthrough ==========

#[test]
fn test_passthrough_is_identity() {
    let strategy = PassthroughStrategy::new();
    let data = json!({"k": [1, 2]});
    assert_eq!(strategy.compress(&data, &ctx()).unwrap(), data);
    assert_eq!(strategy.decompress(&data, &ctx()).unwrap(), data);
    assert_eq!(strategy.name(), "none");
}

// ========== Registry ==========

#[test]
fn test_registry_builtin() {
    let registry = StrategyRegistry::with_builtin();
    assert_eq!(registry.names(), vec!["none", "schema_json"]);
    assert!(registry.contains(SCHEMA_JSON));
    assert!(registry.get("missing").is_none());
}

#[test]
fn test_registry_dispatch_roundtrip() {
    let registry = StrategyRegistry::with_builtin();
    let data = json!({"b": 1, "a": {"c": [true]}});
    let packed = registry.compress(SCHEMA_JSON, &data, &ctx()).unwrap();
    assert_eq!(registry.decompress(SCHEMA_JSON, &packed, &ctx()).unwrap(), data);
}

#[test]
fn test_registry_unknown_name() {
    let registry = StrategyRegistry::with_builtin();
    let err = registry.compress("anchor_index", &json!({}), &ctx()).unwrap_err();
    assert!(err.to_string().contains("anchor_index"));
}

#[test]
fn test_registry_replace() {
    let mut registry = StrategyRegistry::new();
    assert!(registry.register(Arc::new(SchemaJsonStrategy::default())).is_none());
    let custom = SchemaJsonStrategy::new(CompressionConfig::default().with_strategy(KeyMappingStrategy::Identity)).unwrap();
    assert!(registry.register(Arc::new(custom)).is_some());
    assert_eq!(registry.names(), vec!["schema_json"]);
}

#[test]
fn test_compress_or_passthrough_applies() {
    let registry = StrategyRegistry::with_builtin();
    let data = json!({"name": "x"});
    let outcome = registry.compress_or_passthrough(SCHEMA_JSON, &data, &ctx());
    assert!(outcome.applied);
    assert_eq!(outcome.content["data"], json!({"a": "x"}));
}

#[test]
fn test_compress_or_passthrough_falls_back() {
    let mut registry = StrategyRegistry::with_builtin();
    registry.register(Arc::new(FailingStrategy));
    let data = json!({"name": "x"});

    let outcome = registry.compress_or_passthrough("failing", &data, &ctx());
    assert!(!outcome.applied);
    assert_eq!(outcome.content, data);

    let outcome = registry.compress_or_passthrough(SCHEMA_JSON, &json!("scalar"), &ctx());
    assert!(!outcome.applied);
    assert_eq!(outcome.content, json!("scalar"));

    let outcome = registry.compress_or_passthrough("unknown", &data, &ctx());
    assert!(!outcome.applied);
}
