use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Invalid root type: expected object or array, got {0}")]
    InvalidRootType(&'static str),
    #[error("Unknown key mapping strategy: {0}")]
    UnknownKeyMappingStrategy(String),
    #[error("Code space exhausted: {paths} paths do not fit in codes of at most {max_length} characters")]
    CodeSpaceExhausted { paths: usize, max_length: usize },
    #[error("Key `{key}` at `{path}` reads as an identity code; use auto_abbrev")]
    AmbiguousKey { key: String, path: String },
    #[error("Invalid compressed format: {0}")]
    InvalidCompressedFormat(String),
    #[error("Unsupported schema version: {0}")]
    UnsupportedVersion(u64),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CodecError>;
