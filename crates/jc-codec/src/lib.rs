//! Lossless JSON compaction codec.
//!
//! `compress` turns a JSON object or array into `{schema, data}` where object
//! keys are replaced by short codes and selected arrays of objects become
//! row tables. `decompress` inverts it using the schema alone.
//!
//! Stages:
//! 1. Path collection: sorted logical leaf paths, include/exclude filtering
//! 2. Code assignment: identity or short alphabetic codes
//! 3. Tabular encoding of configured arrays of objects
//! 4. Field encoding: key rewriting for everything else
//! 5. Schema assembly

pub mod codes;
pub mod fields;
pub mod paths;
pub mod pipeline;
pub mod schema;
pub mod tabular;

pub use codes::{build_field_code_map, generate_codes, CodeMap};
pub use fields::{decode_data_from_field_codes, encode_data_with_field_codes, FieldDecoder, FieldEncoder};
pub use paths::{collect_logical_fields, LogicalFields};
pub use pipeline::{compress, decompress, decompress_payload, measure, CompressionStats, JsonCompactor};
pub use schema::{build_schema_object, CompressedPayload, SchemaObject, TabularArray, SCHEMA_VERSION};
pub use tabular::{decode_tabular_arrays, encode_tabular_arrays};

pub use jc_core::{CodecError, CompressionConfig, Result, RootType};
