//! Typed compression configuration.
//!
//! Host configuration arrives as loosely-typed JSON (often converted from
//! YAML). [`CompressionConfig::from_value`] is the single parse-and-validate
//! step; the codec only ever sees the typed struct.

use crate::error::{CodecError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_PATH_SEPARATOR: &str = ".";

/// Marks "one element of an array of objects" in a logical path. As a tabular
/// array path (like the empty string) it designates the root array.
pub const ROOT_ARRAY_MARKER: &str = "[]";

const DEFAULT_MIN_CODE_LENGTH: usize = 1;
const DEFAULT_MAX_CODE_LENGTH: usize = 4;

/// Lossy include/exclude filtering on exact logical paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub include_paths: BTreeSet<String>,
    pub exclude_paths: BTreeSet<String>,
}

impl FilterConfig {
    /// True when no path can be dropped.
    pub fn is_empty(&self) -> bool {
        self.include_paths.is_empty() && self.exclude_paths.is_empty()
    }

    /// Whether a logical path survives filtering.
    pub fn retains(&self, path: &str) -> bool {
        if !self.include_paths.is_empty() && !self.include_paths.contains(path) {
            return false;
        }
        !self.exclude_paths.contains(path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlattenConfig {
    /// Echoed into the schema; path composition does not depend on it.
    pub enabled: bool,
    pub path_separator: String,
}

impl Default for FlattenConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path_separator: DEFAULT_PATH_SEPARATOR.into(),
        }
    }
}

/// How logical paths are turned into codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyMappingStrategy {
    /// Code equals the logical path. Useful when inspecting output.
    Identity,
    /// Short lowercase codes: a, b, ..., z, aa, ab, ...
    AutoAbbrev,
}

impl KeyMappingStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::AutoAbbrev => "auto_abbrev",
        }
    }
}

impl fmt::Display for KeyMappingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyMappingStrategy {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "identity" => Ok(Self::Identity),
            "auto_abbrev" => Ok(Self::AutoAbbrev),
            other => Err(CodecError::UnknownKeyMappingStrategy(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyMappingConfig {
    pub strategy: KeyMappingStrategy,
    /// Length of the first generated code.
    pub min_length: usize,
    /// Longest code `auto_abbrev` may emit before giving up.
    pub max_length: usize,
}

impl Default for KeyMappingConfig {
    fn default() -> Self {
        Self {
            strategy: KeyMappingStrategy::AutoAbbrev,
            min_length: DEFAULT_MIN_CODE_LENGTH,
            max_length: DEFAULT_MAX_CODE_LENGTH,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabularConfig {
    pub enabled: bool,
    /// `""` or `"[]"` for the root array, otherwise a top-level object key.
    pub array_paths: BTreeSet<String>,
}

impl TabularConfig {
    /// Whether tabular encoding can apply at all.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.array_paths.is_empty()
    }

    /// The configured root-array marker, preferring `""` over `"[]"`.
    pub fn root_key(&self) -> Option<&str> {
        self.array_paths
            .iter()
            .map(String::as_str)
            .find(|key| is_root_array_key(key))
    }

    /// Configured top-level keys of an object root.
    pub fn named_paths(&self) -> impl Iterator<Item = &str> {
        self.array_paths
            .iter()
            .map(String::as_str)
            .filter(|key| !is_root_array_key(key))
    }
}

/// `""` and `"[]"` both address the root array.
pub fn is_root_array_key(key: &str) -> bool {
    key.is_empty() || key == ROOT_ARRAY_MARKER
}

/// Full configuration for one compress call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompressionConfig {
    pub filter: FilterConfig,
    pub flatten: FlattenConfig,
    pub key_mapping: KeyMappingConfig,
    pub tabular: TabularConfig,
}

/// Wire shape of `key_mapping`, before the strategy name is checked.
#[derive(Deserialize)]
#[serde(default)]
struct RawKeyMapping {
    strategy: String,
    min_length: usize,
    max_length: usize,
}

impl Default for RawKeyMapping {
    fn default() -> Self {
        let defaults = KeyMappingConfig::default();
        Self {
            strategy: defaults.strategy.as_str().into(),
            min_length: defaults.min_length,
            max_length: defaults.max_length,
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawCompressionConfig {
    filter: FilterConfig,
    flatten: FlattenConfig,
    key_mapping: RawKeyMapping,
    tabular: TabularConfig,
}

impl CompressionConfig {
    /// Parse and validate a loosely-typed configuration document.
    /// Missing sections take their defaults.
    pub fn from_value(value: &Value) -> Result<Self> {
        let raw = RawCompressionConfig::deserialize(value)
            .map_err(|e| CodecError::InvalidConfig(e.to_string()))?;
        let config = Self {
            filter: raw.filter,
            flatten: raw.flatten,
            key_mapping: KeyMappingConfig {
                strategy: raw.key_mapping.strategy.parse()?,
                min_length: raw.key_mapping.min_length,
                max_length: raw.key_mapping.max_length,
            },
            tabular: raw.tabular,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| CodecError::InvalidConfig(e.to_string()))?;
        Self::from_value(&value)
    }

    pub fn validate(&self) -> Result<()> {
        if self.flatten.path_separator.is_empty() {
            return Err(CodecError::InvalidConfig(
                "flatten.path_separator must not be empty".into(),
            ));
        }
        let km = &self.key_mapping;
        if km.min_length == 0 {
            return Err(CodecError::InvalidConfig(
                "key_mapping.min_length must be at least 1".into(),
            ));
        }
        if km.min_length > km.max_length {
            return Err(CodecError::InvalidConfig(format!(
                "key_mapping.min_length ({}) exceeds max_length ({})",
                km.min_length, km.max_length
            )));
        }
        Ok(())
    }

    pub fn separator(&self) -> &str {
        &self.flatten.path_separator
    }

    pub fn with_strategy(mut self, strategy: KeyMappingStrategy) -> Self {
        self.key_mapping.strategy = strategy;
        self
    }

    pub fn with_include_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter.include_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_exclude_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter.exclude_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Enable tabular encoding for the given array paths.
    pub fn with_tabular_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tabular.enabled = true;
        self.tabular.array_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.flatten.path_separator = separator.into();
        self
    }
}
