//! Named compression strategies over JSON content.
//!
//! The schema/data codec is one strategy among any the host registers; the
//! registry only sees the [`CompressionStrategy`] trait.

pub mod passthrough;
pub mod registry;
pub mod schema_json;
pub mod traits;

pub use passthrough::{PassthroughStrategy, NONE};
pub use registry::{StrategyOutcome, StrategyRegistry};
pub use schema_json::{SchemaJsonStrategy, SCHEMA_JSON};
pub use traits::{CompressionStrategy, StrategyContext};

#[cfg(test)]
mod tests;
