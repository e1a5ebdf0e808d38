//! Shared configuration and error types for the JSON compaction codec.

pub mod config;
pub mod error;
pub mod types;

pub use config::{
    CompressionConfig, FilterConfig, FlattenConfig, KeyMappingConfig, KeyMappingStrategy,
    TabularConfig, DEFAULT_PATH_SEPARATOR, ROOT_ARRAY_MARKER,
};
pub use error::{CodecError, Result};
pub use types::{json_kind, RootType};
