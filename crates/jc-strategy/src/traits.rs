use anyhow::Result;
use serde_json::Value;

/// Caller-supplied information passed to every strategy call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrategyContext {
    /// Where the content came from, e.g. a file name. Used in logs and errors.
    pub source: Option<String>,
}

impl StrategyContext {
    pub fn new() -> Self { Self::default() }

    pub fn with_source(source: impl Into<String>) -> Self {
        Self { source: Some(source.into()) }
    }

    pub fn source_or_unknown(&self) -> &str {
        self.source.as_deref().unwrap_or("<unknown>")
    }
}

/// Trait for JSON compression strategies selected by name.
pub trait CompressionStrategy: Send + Sync {
    /// Name used in configuration and in the registry.
    fn name(&self) -> &str;

    fn compress(&self, content: &Value, ctx: &StrategyContext) -> Result<Value>;

    fn decompress(&self, content: &Value, ctx: &StrategyContext) -> Result<Value>;

    /// Whether `decompress(compress(x)) == x` for every accepted input.
    fn is_lossless(&self) -> bool {
        true
    }
}
