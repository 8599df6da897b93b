//! Combination registry
//!
//! Maps a user-chosen name to an ordered list of marker identities. Constituents
//! are not checked against any known marker set and may repeat.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use crate::core::error::{MarkerError, Result};

/// Combination definition syntax: `NAME=marker1,marker2,...`
pub static DEFINITION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([^=]*?)\s*=(.*)$").expect("Invalid DEFINITION_RE regex")
});

/// Named marker combinations, kept for the lifetime of the session
#[derive(Debug, Clone, Default)]
pub struct ComboRegistry {
    combos: BTreeMap<String, Vec<String>>,
}

impl ComboRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define `name`, replacing any previous definition entirely.
    /// Returns the replaced constituent list, if any.
    pub fn define(
        &mut self,
        name: impl Into<String>,
        markers: impl IntoIterator<Item = impl Into<String>>,
    ) -> Option<Vec<String>> {
        let markers = markers.into_iter().map(Into::into).collect();
        self.combos.insert(name.into(), markers)
    }

    /// Constituents of `name`, or `None` when it was never defined
    pub fn resolve(&self, name: &str) -> Option<&[String]> {
        self.combos.get(name).map(Vec::as_slice)
    }

    /// All combinations in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.combos
            .iter()
            .map(|(name, markers)| (name.as_str(), markers.as_slice()))
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.combos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combos.is_empty()
    }
}

/// A parsed `NAME=a,b,c` definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComboDefinition {
    pub name: String,
    pub markers: Vec<String>,
}

/// Parse a `NAME=a,b,c` definition. Whitespace around the name and each
/// constituent is trimmed and empty constituents are dropped.
pub fn parse_definition(input: &str) -> Result<ComboDefinition> {
    let caps = DEFINITION_RE.captures(input).ok_or_else(|| {
        MarkerError::InvalidCombination(format!("expected NAME=marker,... but got '{}'", input))
    })?;

    let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    if name.is_empty() {
        return Err(MarkerError::InvalidCombination(format!(
            "missing combination name in '{}'",
            input
        )));
    }

    let markers = caps
        .get(2)
        .map(|m| m.as_str())
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    Ok(ComboDefinition {
        name: name.to_string(),
        markers,
    })
}
