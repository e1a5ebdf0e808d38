//! The schema/data codec as a named strategy.

use anyhow::{Context as _, Result};
use jc_codec::JsonCompactor;
use jc_core::CompressionConfig;
use serde_json::Value;

use crate::traits::{CompressionStrategy, StrategyContext};

/// Strategy name of [`SchemaJsonStrategy`].
pub const SCHEMA_JSON: &str = "schema_json";

/// Wraps [`JsonCompactor`]. Lossy only when the config filters paths.
#[derive(Debug, Clone, Default)]
pub struct SchemaJsonStrategy {
    compactor: JsonCompactor,
}

impl SchemaJsonStrategy {
    pub fn new(config: CompressionConfig) -> Result<Self> {
        Ok(Self { compactor: JsonCompactor::new(config)? })
    }

    /// Build from loosely-typed strategy parameters.
    pub fn from_params(params: &Value) -> Result<Self> {
        let config = CompressionConfig::from_value(params).context("invalid schema_json parameters")?;
        Self::new(config)
    }

    pub fn config(&self) -> &CompressionConfig {
        self.compactor.config()
    }
}

impl CompressionStrategy for SchemaJsonStrategy {
    fn name(&self) -> &str { SCHEMA_JSON }

    fn compress(&self, content: &Value, ctx: &StrategyContext) -> Result<Value> {
        let payload = self
            .compactor
            .compress(content)
            .with_context(|| format!("schema_json compress failed for {}", ctx.source_or_unknown()))?;
        Ok(payload.to_value()?)
    }

    fn decompress(&self, content: &Value, ctx: &StrategyContext) -> Result<Value> {
        self.compactor
            .decompress(content)
            .with_context(|| format!("schema_json decompress failed for {}", ctx.source_or_unknown()))
    }

    fn is_lossless(&self) -> bool {
        self.config().filter.is_empty()
    }
}
