//! Code assignment: logical path ↔ short code.

use jc_core::{CodecError, KeyMappingConfig, KeyMappingStrategy, Result};
use std::collections::{BTreeMap, BTreeSet};

/// Bijective base-26 enumeration over `a..z`: a, b, ..., z, aa, ab, ...
/// starting at `min_length` characters and ending after `max_length`.
#[derive(Debug, Clone)]
pub struct AlphaCodes {
    current: Vec<u8>,
    max_length: usize,
}

impl AlphaCodes {
    pub fn new(min_length: usize, max_length: usize) -> Self {
        Self {
            current: vec![b'a'; min_length.max(1)],
            max_length,
        }
    }

    fn advance(&mut self) {
        for slot in self.current.iter_mut().rev() {
            if *slot < b'z' {
                *slot += 1;
                return;
            }
            *slot = b'a';
        }
        self.current.push(b'a');
    }
}

impl Iterator for AlphaCodes {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.current.len() > self.max_length {
            return None;
        }
        let code = self.current.iter().map(|&b| b as char).collect();
        self.advance();
        Some(code)
    }
}

/// Generate the first `n` codes of at most `max_length` characters.
pub fn generate_codes(n: usize, min_length: usize, max_length: usize) -> Vec<String> {
    AlphaCodes::new(min_length, max_length).take(n).collect()
}

/// Bidirectional code map built once per compress call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeMap {
    code_to_path: BTreeMap<String, String>,
    path_to_code: BTreeMap<String, String>,
}

impl CodeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from a schema's `fields` (code → path).
    pub fn from_fields(fields: BTreeMap<String, String>) -> Self {
        let path_to_code = fields
            .iter()
            .map(|(code, path)| (path.clone(), code.clone()))
            .collect();
        Self {
            code_to_path: fields,
            path_to_code,
        }
    }

    fn insert(&mut self, code: String, path: String) {
        self.path_to_code.insert(path.clone(), code.clone());
        self.code_to_path.insert(code, path);
    }

    pub fn code_for(&self, path: &str) -> Option<&str> {
        self.path_to_code.get(path).map(String::as_str)
    }

    pub fn path_for(&self, code: &str) -> Option<&str> {
        self.code_to_path.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.code_to_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code_to_path.is_empty()
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.code_to_path
    }
}

/// Assign a code to each path, in order.
///
/// `auto_abbrev` hands out [`AlphaCodes`] in sequence, skipping any code in
/// `reserved` (keys that are written verbatim). Running past `max_length`
/// is a [`CodecError::CodeSpaceExhausted`] failure.
pub fn build_field_code_map(
    paths: &[String],
    key_mapping: &KeyMappingConfig,
    reserved: &BTreeSet<String>,
) -> Result<CodeMap> {
    let mut map = CodeMap::new();
    match key_mapping.strategy {
        KeyMappingStrategy::Identity => {
            for path in paths {
                map.insert(path.clone(), path.clone());
            }
        }
        KeyMappingStrategy::AutoAbbrev => {
            let mut codes = AlphaCodes::new(key_mapping.min_length, key_mapping.max_length)
                .filter(|code| !reserved.contains(code));
            for path in paths {
                let code = codes.next().ok_or(CodecError::CodeSpaceExhausted {
                    paths: paths.len(),
                    max_length: key_mapping.max_length,
                })?;
                map.insert(code, path.clone());
            }
        }
    }
    Ok(map)
}
