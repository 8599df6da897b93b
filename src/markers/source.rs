//! Marker source loading
//!
//! Reads one marker file and returns its entries in file order:
//! - YAML: a top-level list, or a mapping whose `markers` key holds the list
//! - CSV: the first field of every non-empty record

use serde_yaml::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::core::error::{MarkerError, Result};
use crate::core::model::MarkerEntry;
use crate::core::paths::{classify, SourceFormat};

/// Load the marker entries of a file. Unrecognized extensions yield no entries.
pub fn load_markers(path: &Path) -> Result<Vec<MarkerEntry>> {
    let entries = match classify(path) {
        Some(SourceFormat::Structured) => load_structured(path)?,
        Some(SourceFormat::Flat) => load_flat(path)?,
        None => return Ok(Vec::new()),
    };
    debug!(path = %path.display(), entries = entries.len(), "loaded marker file");
    Ok(entries)
}

fn load_structured(path: &Path) -> Result<Vec<MarkerEntry>> {
    let content = fs::read_to_string(path).map_err(|e| MarkerError::io(path, e))?;
    parse_structured(&content, path)
}

/// Parse a YAML marker document
pub fn parse_structured(content: &str, path: &Path) -> Result<Vec<MarkerEntry>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let document: Value = serde_yaml::from_str(content).map_err(|source| MarkerError::Yaml {
        path: path.to_path_buf(),
        source,
    })?;

    let items = match document {
        Value::Sequence(items) => items,
        Value::Mapping(mut map) => match map.remove("markers") {
            Some(Value::Sequence(items)) => items,
            Some(other) => {
                return Err(MarkerError::InvalidDocument {
                    path: path.to_path_buf(),
                    detail: format!("`markers` must be a list, found {}", value_kind(&other)),
                })
            }
            None => return Ok(Vec::new()),
        },
        _ => return Ok(Vec::new()),
    };

    items
        .into_iter()
        .map(|item| entry_from_value(item, path))
        .collect()
}

fn entry_from_value(value: Value, path: &Path) -> Result<MarkerEntry> {
    match value {
        Value::String(s) => Ok(MarkerEntry::Plain(s)),
        Value::Number(n) => Ok(MarkerEntry::Plain(n.to_string())),
        Value::Bool(b) => Ok(MarkerEntry::Plain(b.to_string())),
        Value::Mapping(map) => match map.get("meta") {
            Some(Value::String(name)) if !name.is_empty() => Ok(MarkerEntry::Meta(name.clone())),
            _ => Err(MarkerError::InvalidEntry {
                path: path.to_path_buf(),
                detail: "mapping entries need a non-empty string `meta` key".to_string(),
            }),
        },
        Value::Tagged(tagged) => entry_from_value(tagged.value, path),
        other => Err(MarkerError::InvalidEntry {
            path: path.to_path_buf(),
            detail: format!("unsupported {} entry", value_kind(&other)),
        }),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged",
    }
}

fn load_flat(path: &Path) -> Result<Vec<MarkerEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|source| MarkerError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    let mut entries = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| MarkerError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(first) = record.get(0) {
            entries.push(MarkerEntry::plain(first));
        }
    }
    Ok(entries)
}
