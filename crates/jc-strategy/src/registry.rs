//! Name → strategy dispatch.

use anyhow::{anyhow, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::passthrough::PassthroughStrategy;
use crate::schema_json::SchemaJsonStrategy;
use crate::traits::{CompressionStrategy, StrategyContext};

/// Output of [`StrategyRegistry::compress_or_passthrough`].
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyOutcome {
    pub content: Value,
    /// False when the original content was returned.
    pub applied: bool,
}

/// Registered strategies, keyed by [`CompressionStrategy::name`].
#[derive(Clone, Default)]
pub struct StrategyRegistry {
    strategies: BTreeMap<String, Arc<dyn CompressionStrategy>>,
}

impl StrategyRegistry {
    pub fn new() -> Self { Self::default() }

    /// Registry holding `schema_json` (default config) and `none`.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(SchemaJsonStrategy::default()));
        registry.register(Arc::new(PassthroughStrategy::new()));
        registry
    }

    /// Add a strategy, returning the one it replaced.
    pub fn register(&mut self, strategy: Arc<dyn CompressionStrategy>) -> Option<Arc<dyn CompressionStrategy>> {
        let name = strategy.name().to_string();
        debug!(strategy = %name, "registered compression strategy");
        self.strategies.insert(name, strategy)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn CompressionStrategy>> {
        self.strategies.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.strategies.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.strategies.keys().map(String::as_str).collect()
    }

    fn require(&self, name: &str) -> Result<&Arc<dyn CompressionStrategy>> {
        self.strategies
            .get(name)
            .ok_or_else(|| anyhow!("unknown compression strategy `{name}` (known: {})", self.names().join(", ")))
    }

    pub fn compress(&self, name: &str, content: &Value, ctx: &StrategyContext) -> Result<Value> {
        self.require(name)?.compress(content, ctx)
    }

    pub fn decompress(&self, name: &str, content: &Value, ctx: &StrategyContext) -> Result<Value> {
        self.require(name)?.decompress(content, ctx)
    }

    /// Compress with `name`, returning the original content if the strategy
    /// is unknown or fails.
    pub fn compress_or_passthrough(&self, name: &str, content: &Value, ctx: &StrategyContext) -> StrategyOutcome {
        match self.compress(name, content, ctx) {
            Ok(compressed) => StrategyOutcome { content: compressed, applied: true },
            Err(err) => {
                warn!(strategy = name, source = ctx.source_or_unknown(), error = %format!("{err:#}"), "compression failed, using original content");
                StrategyOutcome { content: content.clone(), applied: false }
            }
        }
    }
}

impl std::fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyRegistry").field("strategies", &self.names()).finish()
    }
}
