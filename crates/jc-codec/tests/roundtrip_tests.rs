//! End-to-end behaviour of compress/decompress: documented scenarios plus
//! property tests over generated documents.

use jc_codec::{collect_logical_fields, compress, decompress, CodecError, CompressionConfig};
use jc_core::KeyMappingStrategy;
use proptest::prelude::*;
use serde_json::{json, Value};

fn cfg() -> CompressionConfig { CompressionConfig::default() }

fn roundtrip(data: &Value, config: &CompressionConfig) -> Value {
    let payload = compress(data, config).unwrap();
    decompress(&payload.to_value().unwrap()).unwrap()
}

// ============================================================
// Scenarios
// ============================================================

#[test]
fn test_flat_object_scenario() {
    let data = json!({"name": "Alice", "age": 30});
    let payload = compress(&data, &cfg()).unwrap();
    let v = payload.to_value().unwrap();
    assert_eq!(v["schema"]["fields"], json!({"a": "age", "b": "name"}));
    assert_eq!(v["data"], json!({"a": 30, "b": "Alice"}));
    assert_eq!(decompress(&v).unwrap(), json!({"age": 30, "name": "Alice"}));
}

#[test]
fn test_nested_dict_scenario() {
    let data = json!({"user": {"name": "x"}});
    let v = compress(&data, &cfg()).unwrap().to_value().unwrap();
    assert_eq!(v["schema"]["fields"], json!({"a": "user.name"}));
    assert_eq!(v["data"], json!({"user": {"a": "x"}}));
    assert_eq!(decompress(&v).unwrap(), data);
}

#[test]
fn test_tabular_root_scenario() {
    let data = json!([{"id": "C1", "label": "Foo"}, {"id": "C2", "label": "Bar"}]);
    let config = CompressionConfig::from_value(&json!({
        "tabular": {"enabled": true, "array_paths": [""]}
    }))
    .unwrap();
    let payload = compress(&data, &config).unwrap();
    let rows = payload.data.as_array().unwrap();
    assert!(rows.iter().all(|r| r.as_array().map(Vec::len) == Some(2)));
    assert_eq!(decompress(&payload.to_value().unwrap()).unwrap(), data);
}

#[test]
fn test_auto_abbrev_ordering_scenario() {
    let payload = compress(&json!({"c": 1, "b": 2, "a": 3}), &cfg()).unwrap();
    let codes: Vec<&str> = payload.schema.fields.keys().map(String::as_str).collect();
    assert_eq!(codes, vec!["a", "b", "c"]);
    assert_eq!(payload.schema.fields["a"], "a");
}

#[test]
fn test_document_with_everything() {
    let data = json!({
        "doc_id": "D-7",
        "meta": {"source": "upload", "created": "2026-01-15", "flags": []},
        "anchors": [
            {"anchor_id": "A1", "text": "first", "refs": [{"to": "A2"}]},
            {"anchor_id": "A2", "text": "second", "score": 0.5},
            {"anchor_id": "A3", "text": null, "tags": ["x", "y"]}
        ],
        "sections": [
            {"title": "Intro", "paragraphs": [{"n": 1}, {"n": 2}]},
            {"title": "Body", "paragraphs": []}
        ],
        "matrix": [[1, 2], [3, 4]]
    });
    for config in [
        cfg(),
        cfg().with_tabular_paths(["anchors", "sections"]),
        cfg().with_strategy(KeyMappingStrategy::Identity).with_tabular_paths(["anchors"]),
        cfg().with_separator("::").with_tabular_paths(["sections"]),
    ] {
        assert_eq!(roundtrip(&data, &config), data, "config: {config:?}");
    }
}

#[test]
fn test_lossy_filtering_scenario() {
    let data = json!({"id": "A1", "label": "User", "description": "long text"});
    let config = CompressionConfig::from_value(&json!({
        "filter": {"include_paths": ["id", "label"]}
    }))
    .unwrap();
    let restored = roundtrip(&data, &config);
    assert_eq!(restored["id"], json!("A1"));
    assert_eq!(restored["label"], json!("User"));
    assert!(restored.get("description").is_none());
}

#[test]
fn test_persisted_document_is_plain_json() {
    let data = json!({"rows": [{"a": 1.5, "b": "x"}], "n": null});
    let payload = compress(&data, &cfg().with_tabular_paths(["rows"])).unwrap();
    let text = serde_json::to_string(&payload).unwrap();
    let reparsed: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(reparsed, payload.to_value().unwrap());
    assert_eq!(decompress(&reparsed).unwrap(), data);
}

// ============================================================
// Properties
// ============================================================

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-z ]{0,6}".prop_map(Value::String),
    ]
}

// Short keys from a small alphabet collide with generated codes on purpose.
fn arb_key() -> impl Strategy<Value = String> {
    prop_oneof!["[a-e]{1,2}", "[a-c][.][a-c]"]
}

fn arb_json() -> impl Strategy<Value = Value> {
    arb_scalar().prop_recursive(4, 48, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
            prop::collection::btree_map(arb_key(), inner, 0..5)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn arb_object() -> impl Strategy<Value = Value> {
    prop::collection::btree_map(arb_key(), arb_json(), 0..6)
        .prop_map(|m| Value::Object(m.into_iter().collect()))
}

fn arb_root() -> impl Strategy<Value = Value> {
    prop_oneof![
        arb_object(),
        prop::collection::vec(arb_json(), 0..5).prop_map(Value::Array),
    ]
}

fn arb_object_rows() -> impl Strategy<Value = Value> {
    prop::collection::vec(arb_object(), 1..6).prop_map(Value::Array)
}

proptest! {
    #[test]
    fn prop_roundtrip_without_filtering(data in arb_root()) {
        prop_assert_eq!(roundtrip(&data, &cfg()), data.clone());
        let identity = cfg().with_strategy(KeyMappingStrategy::Identity);
        match compress(&data, &identity) {
            Ok(payload) => {
                prop_assert_eq!(decompress(&payload.to_value().unwrap()).unwrap(), data);
            }
            Err(err) => prop_assert!(matches!(err, CodecError::AmbiguousKey { .. }), "{}", err),
        }
    }

    #[test]
    fn prop_roundtrip_tabular_root(data in arb_object_rows()) {
        let config = cfg().with_tabular_paths([""]);
        let payload = compress(&data, &config).unwrap();
        let meta = &payload.schema.tabular_arrays().unwrap()[""];
        for row in payload.data.as_array().unwrap() {
            prop_assert_eq!(row.as_array().unwrap().len(), meta.fields.len());
        }
        prop_assert_eq!(decompress(&payload.to_value().unwrap()).unwrap(), data);
    }

    #[test]
    fn prop_roundtrip_tabular_named(rows in arb_object_rows(), rest in arb_object()) {
        let mut data = rest;
        data.as_object_mut().unwrap().insert("table".into(), rows);
        let config = cfg().with_tabular_paths(["table"]);
        prop_assert_eq!(roundtrip(&data, &config), data);
    }

    #[test]
    fn prop_deterministic(data in arb_root()) {
        let config = cfg().with_tabular_paths([""]);
        let a = serde_json::to_string(&compress(&data, &config).unwrap()).unwrap();
        let b = serde_json::to_string(&compress(&data, &config).unwrap()).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_codes_are_a_bijection(data in arb_root()) {
        let payload = compress(&data, &cfg()).unwrap();
        let paths: std::collections::BTreeSet<&String> = payload.schema.fields.values().collect();
        prop_assert_eq!(paths.len(), payload.schema.fields.len());
    }

    #[test]
    fn prop_excluded_paths_never_surface(data in arb_object()) {
        let all = collect_logical_fields(&data, &cfg()).paths;
        let dropped: Vec<String> = all.iter().step_by(2).cloned().collect();
        let config = cfg().with_exclude_paths(dropped.clone());
        let payload = compress(&data, &config).unwrap();
        for path in &dropped {
            prop_assert!(!payload.schema.fields.values().any(|p| p == path));
        }
        let kept = collect_logical_fields(&decompress(&payload.to_value().unwrap()).unwrap(), &cfg()).paths;
        for path in &dropped {
            prop_assert!(!kept.contains(path));
        }
    }

    #[test]
    fn prop_included_paths_survive(data in arb_root()) {
        let all = collect_logical_fields(&data, &cfg()).paths;
        let wanted: Vec<String> = all.iter().step_by(2).cloned().collect();
        let config = cfg().with_include_paths(wanted.clone());
        let restored = roundtrip(&data, &config);
        let kept = collect_logical_fields(&restored, &cfg()).paths;
        for path in &wanted {
            prop_assert!(kept.contains(path), "lost {}", path);
        }
    }
}
