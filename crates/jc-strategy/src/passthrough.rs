use anyhow::Result;
use serde_json::Value;

use crate::traits::{CompressionStrategy, StrategyContext};

pub const NONE: &str = "none";

/// Returns content unchanged in both directions.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughStrategy;

impl PassthroughStrategy {
    pub fn new() -> Self { Self }
}

impl CompressionStrategy for PassthroughStrategy {
    fn name(&self) -> &str { NONE }

    fn compress(&self, content: &Value, _ctx: &StrategyContext) -> Result<Value> {
        Ok(content.clone())
    }

    fn decompress(&self, content: &Value, _ctx: &StrategyContext) -> Result<Value> {
        Ok(content.clone())
    }
}
