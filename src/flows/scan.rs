//! Text scanning flow
//!
//! Counts literal, non-overlapping occurrences of markers and combinations in text.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::combos::registry::ComboRegistry;
use crate::core::error::{MarkerError, Result};
use crate::core::model::{CountItem, CountKind, CountSet};

/// Counts produced by scanning one text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    /// Markers that occur at least once
    pub markers: BTreeMap<String, usize>,
    /// Every registered combination, including those with zero occurrences
    pub combinations: BTreeMap<String, usize>,
}

impl ScanReport {
    /// Single mapping where a combination replaces a same-named marker
    pub fn merged(&self) -> BTreeMap<String, usize> {
        let mut counts = self.markers.clone();
        counts.extend(
            self.combinations
                .iter()
                .map(|(name, count)| (name.clone(), *count)),
        );
        counts
    }

    /// Count set in identity order, tagged with the kind that produced each value
    pub fn to_count_set(&self) -> CountSet {
        self.merged()
            .into_iter()
            .map(|(identity, count)| {
                let kind = if self.combinations.contains_key(&identity) {
                    CountKind::Combination
                } else {
                    CountKind::Marker
                };
                CountItem::new(kind, identity, count)
            })
            .collect()
    }
}

/// Left-to-right, non-overlapping occurrence count of `needle` in `text`
pub fn count_occurrences(text: &str, needle: &str) -> usize {
    text.matches(needle).count()
}

/// Scan `text` for every marker and every registered combination.
///
/// A combination's count is the sum of its constituents' counts, each counted
/// independently and once per listed occurrence.
pub fn scan_text<'a>(
    text: &str,
    markers: impl IntoIterator<Item = &'a str>,
    combos: &ComboRegistry,
) -> ScanReport {
    let mut report = ScanReport::default();

    for marker in markers {
        let count = count_occurrences(text, marker);
        if count > 0 {
            report.markers.insert(marker.to_string(), count);
        }
    }

    for (name, constituents) in combos.iter() {
        let count: usize = constituents
            .iter()
            .map(|marker| count_occurrences(text, marker))
            .sum();
        report.combinations.insert(name.to_string(), count);
    }

    debug!(
        bytes = text.len(),
        markers = report.markers.len(),
        combinations = report.combinations.len(),
        "scanned text"
    );
    report
}

/// Use the contents of `input` when it names an existing file, else `input` itself
pub fn resolve_text(input: &str) -> Result<String> {
    let path = Path::new(input);
    if path.is_file() {
        debug!(path = %path.display(), "reading text from file");
        return fs::read_to_string(path).map_err(|e| MarkerError::io(path, e));
    }
    Ok(input.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_count_occurrences_non_overlapping() {
        assert_eq!(count_occurrences("hi there, hi! hello", "hi"), 2);
        assert_eq!(count_occurrences("aaaa", "aa"), 2);
        assert_eq!(count_occurrences("abc", "x"), 0);
    }

    #[test]
    fn test_count_occurrences_is_case_sensitive() {
        assert_eq!(count_occurrences("Hi hi HI", "hi"), 1);
    }

    #[test]
    fn test_combination_sums_constituents() {
        let mut combos = ComboRegistry::new();
        combos.define("greeting", ["hi", "hello"]);

        let report = scan_text("hi there, hi! hello", ["hi", "hello"], &combos);
        assert_eq!(report.combinations.get("greeting"), Some(&3));
        assert_eq!(report.markers.get("hi"), Some(&2));
        assert_eq!(report.markers.get("hello"), Some(&1));
    }

    #[test]
    fn test_duplicate_constituents_count_twice() {
        let mut combos = ComboRegistry::new();
        combos.define("double", ["hi", "hi"]);

        let report = scan_text("hi", std::iter::empty(), &combos);
        assert_eq!(report.combinations.get("double"), Some(&2));
    }

    #[test]
    fn test_unmatched_markers_are_omitted_but_combinations_kept() {
        let mut combos = ComboRegistry::new();
        combos.define("unknown", ["zzz"]);

        let report = scan_text("hello", ["hi", "hello"], &combos);
        assert!(!report.markers.contains_key("hi"));
        assert_eq!(report.combinations.get("unknown"), Some(&0));
    }

    #[test]
    fn test_combination_overwrites_same_named_marker() {
        let mut combos = ComboRegistry::new();
        combos.define("hi", ["hello", "hey"]);

        let report = scan_text("hi hi hello hey", ["hi"], &combos);
        let merged = report.merged();
        assert_eq!(merged.get("hi"), Some(&2));
        assert_eq!(report.markers.get("hi"), Some(&2));

        let combos_only = scan_text("hi hi hi hello", ["hi"], &combos);
        assert_eq!(combos_only.merged().get("hi"), Some(&1));

        let set = combos_only.to_count_set();
        assert_eq!(set.len(), 1);
        assert_eq!(set.items[0].kind, CountKind::Combination);
    }

    #[test]
    fn test_resolve_text_reads_existing_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("input.txt");
        fs::write(&path, "hi from file").unwrap();

        let text = resolve_text(path.to_str().unwrap()).unwrap();
        assert_eq!(text, "hi from file");
    }

    #[test]
    fn test_resolve_text_falls_back_to_literal() {
        let text = resolve_text("definitely/not/a/file.txt").unwrap();
        assert_eq!(text, "definitely/not/a/file.txt");
    }

    #[test]
    fn test_resolve_text_directory_is_literal() {
        let temp = tempdir().unwrap();
        let input = temp.path().to_str().unwrap();
        assert_eq!(resolve_text(input).unwrap(), input);
    }
}
