//! Directory aggregation
//!
//! Walks a directory tree, loads every marker file and sums occurrences.
//! Flat (CSV) files are converted on the fly: a YAML companion holding the
//! file's deduplicated markers is written next to each one.

use anyhow::Context;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::core::error::{MarkerError, Result};
use crate::core::model::{CountKind, CountSet, MarkerEntry};
use crate::core::paths::{
    classify, companion_path, consolidated_path, display_relative, is_consolidated,
    SourceFormat,
};
use crate::core::render::{Layout, OutputFormat, RenderConfig, Renderer};
use crate::markers::source::load_markers;
use crate::markers::store::save_markers;

/// Occurrence counts for plain and meta markers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MarkerTally {
    pub markers: BTreeMap<String, usize>,
    pub metas: BTreeMap<String, usize>,
}

impl MarkerTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one entry in the tally matching its kind
    pub fn record(&mut self, entry: &MarkerEntry) {
        let tally = match entry {
            MarkerEntry::Plain(_) => &mut self.markers,
            MarkerEntry::Meta(_) => &mut self.metas,
        };
        *tally.entry(entry.identity().to_string()).or_insert(0) += 1;
    }

    pub fn record_all<'a>(&mut self, entries: impl IntoIterator<Item = &'a MarkerEntry>) {
        for entry in entries {
            self.record(entry);
        }
    }

    /// Add another tally's counts to this one
    pub fn merge(&mut self, other: &MarkerTally) {
        for (name, count) in &other.markers {
            *self.markers.entry(name.clone()).or_insert(0) += count;
        }
        for (name, count) in &other.metas {
            *self.metas.entry(name.clone()).or_insert(0) += count;
        }
    }

    /// Every identity seen in either tally
    pub fn identities(&self) -> BTreeSet<&str> {
        self.markers
            .keys()
            .chain(self.metas.keys())
            .map(String::as_str)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty() && self.metas.is_empty()
    }

    /// Count set with plain markers first, then meta markers
    pub fn to_count_set(&self) -> CountSet {
        let mut set = CountSet::new();
        set.extend_counts(CountKind::Marker, &self.markers);
        set.extend_counts(CountKind::Meta, &self.metas);
        set
    }
}

/// Load one marker file into `tally`.
///
/// A flat file also gets its YAML companion (re)written with the file's
/// deduplicated markers. Returns the number of entries loaded.
pub fn ingest_file(path: &Path, tally: &mut MarkerTally) -> Result<usize> {
    let Some(format) = classify(path) else {
        return Ok(0);
    };

    let entries = load_markers(path)?;
    if format == SourceFormat::Flat {
        let companion = companion_path(path);
        save_markers(entries.iter().map(|e| e.identity()), &companion)?;
        debug!(
            source = %path.display(),
            companion = %companion.display(),
            "converted flat marker file"
        );
    }

    tally.record_all(&entries);
    Ok(entries.len())
}

/// Aggregate marker counts across every marker file under `directory`
pub fn analyze_markers(directory: &Path) -> Result<MarkerTally> {
    if !directory.is_dir() {
        return Err(MarkerError::NotADirectory(directory.to_path_buf()));
    }

    let mut tally = MarkerTally::new();
    let mut files = 0usize;

    // Sorted walk reads each directory fully before yielding its entries,
    // so companions written during the walk are not picked up in this run.
    for entry in WalkDir::new(directory).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        // follows symlinks to files; linked directories are not descended
        if !path.is_file() {
            continue;
        }

        if is_consolidated(path) || classify(path).is_none() {
            continue;
        }

        let loaded = ingest_file(path, &mut tally)?;
        files += 1;
        debug!(file = %display_relative(path, directory), entries = loaded, "counted");
    }

    info!(
        directory = %directory.display(),
        files,
        markers = tally.markers.len(),
        metas = tally.metas.len(),
        "aggregated markers"
    );
    Ok(tally)
}

/// Write every identity in `tally` to the consolidated list inside `directory`
pub fn consolidate(tally: &MarkerTally, directory: &Path) -> Result<(PathBuf, usize)> {
    let path = consolidated_path(directory);
    let identities = tally.identities();
    let count = identities.len();
    save_markers(identities, &path)?;
    info!(path = %path.display(), markers = count, "consolidated markers");
    Ok((path, count))
}

/// Run the analyze command
pub fn run_analyze(
    directory: &Path,
    consolidate_markers: bool,
    config: RenderConfig,
) -> anyhow::Result<()> {
    let tally = analyze_markers(directory)
        .with_context(|| format!("Failed to analyze markers in {}", directory.display()))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    Renderer::with_config(config).render_to(&tally.to_count_set(), Layout::Summary, &mut out)?;

    if consolidate_markers {
        let (path, count) = consolidate(&tally, directory).with_context(|| {
            format!("Failed to consolidate markers in {}", directory.display())
        })?;
        if config.format == OutputFormat::Text {
            writeln!(out, "Consolidated {} markers into {}", count, path.display())?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_file(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn counts(pairs: &[(&str, usize)]) -> BTreeMap<String, usize> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_analyze_sums_across_files() {
        let temp = tempdir().unwrap();
        write_file(&temp.path().join("a.yaml"), "- hi\n- hello\n- hi\n");
        write_file(&temp.path().join("sub/b.yml"), "markers:\n  - hi\n");

        let tally = analyze_markers(temp.path()).unwrap();
        assert_eq!(tally.markers, counts(&[("hi", 3), ("hello", 1)]));
        assert!(tally.metas.is_empty());
    }

    #[test]
    fn test_meta_entries_only_count_as_meta() {
        let temp = tempdir().unwrap();
        write_file(
            &temp.path().join("a.yaml"),
            "- {meta: X}\n- {meta: X}\n- Y\n",
        );
        write_file(&temp.path().join("b.yaml"), "- X\n");

        let tally = analyze_markers(temp.path()).unwrap();
        assert_eq!(tally.markers, counts(&[("X", 1), ("Y", 1)]));
        assert_eq!(tally.metas, counts(&[("X", 2)]));
    }

    #[test]
    fn test_csv_is_converted_with_deduplicated_companion() {
        let temp = tempdir().unwrap();
        write_file(&temp.path().join("markers.csv"), "b\na\na\n");

        let tally = analyze_markers(temp.path()).unwrap();
        assert_eq!(tally.markers, counts(&[("a", 2), ("b", 1)]));

        let companion = temp.path().join("markers.yaml");
        let entries = load_markers(&companion).unwrap();
        assert_eq!(entries, vec![MarkerEntry::plain("a"), MarkerEntry::plain("b")]);
    }

    #[test]
    fn test_companion_overwrites_existing_yaml() {
        let temp = tempdir().unwrap();
        write_file(&temp.path().join("sub/list.csv"), "new\n");
        write_file(&temp.path().join("other/list.yaml"), "- untouched\n");

        analyze_markers(temp.path()).unwrap();
        write_file(&temp.path().join("sub/list.yaml"), "- stale\n- stale2\n");
        analyze_markers(temp.path()).unwrap();

        let entries = load_markers(&temp.path().join("sub/list.yaml")).unwrap();
        assert_eq!(entries, vec![MarkerEntry::plain("new")]);
    }

    #[test]
    fn test_unrecognized_files_are_ignored() {
        let temp = tempdir().unwrap();
        write_file(&temp.path().join("notes.txt"), "hi\nhello\n");
        write_file(&temp.path().join("a.yaml"), "- hi\n");

        let tally = analyze_markers(temp.path()).unwrap();
        assert_eq!(tally.markers, counts(&[("hi", 1)]));
        assert!(!temp.path().join("notes.yaml").exists());
    }

    #[test]
    fn test_malformed_file_aborts_scan() {
        let temp = tempdir().unwrap();
        write_file(&temp.path().join("a.yaml"), "- hi\n");
        write_file(&temp.path().join("b.yaml"), "- [broken\n");

        assert!(analyze_markers(temp.path()).is_err());
    }

    #[test]
    fn test_missing_directory_is_error() {
        let temp = tempdir().unwrap();
        assert!(analyze_markers(&temp.path().join("nope")).is_err());
    }

    #[test]
    fn test_consolidated_file_is_not_recounted() {
        let temp = tempdir().unwrap();
        write_file(&temp.path().join("a.yaml"), "- hi\n- {meta: tone}\n");

        let first = analyze_markers(temp.path()).unwrap();
        let (path, written) = consolidate(&first, temp.path()).unwrap();
        assert_eq!(written, 2);
        assert_eq!(
            load_markers(&path).unwrap(),
            vec![MarkerEntry::plain("hi"), MarkerEntry::plain("tone")]
        );

        let second = analyze_markers(temp.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_nested_consolidated_file_is_not_recounted() {
        let temp = tempdir().unwrap();
        let sub = temp.path().join("sub");
        write_file(&sub.join("a.yaml"), "- hi\n");

        let tally = analyze_markers(&sub).unwrap();
        consolidate(&tally, &sub).unwrap();
        assert!(sub.join("_all_markers.yaml").exists());

        let parent = analyze_markers(temp.path()).unwrap();
        assert_eq!(parent.markers, counts(&[("hi", 1)]));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_marker_file_is_counted() {
        let temp = tempdir().unwrap();
        let real = temp.path().join("real/a.yaml");
        write_file(&real, "- hi\n");
        let scanned = temp.path().join("scan");
        fs::create_dir_all(&scanned).unwrap();
        std::os::unix::fs::symlink(&real, scanned.join("link.yaml")).unwrap();

        let tally = analyze_markers(&scanned).unwrap();
        assert_eq!(tally.markers, counts(&[("hi", 1)]));
    }

    #[test]
    fn test_file_root_is_rejected() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("a.yaml");
        write_file(&path, "- hi\n");

        let err = analyze_markers(&path).unwrap_err();
        assert!(matches!(err, MarkerError::NotADirectory(_)));
    }

    #[test]
    fn test_ingest_file_is_additive() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("a.yaml");
        write_file(&path, "- hi\n");

        let mut tally = MarkerTally::new();
        assert_eq!(ingest_file(&path, &mut tally).unwrap(), 1);
        assert_eq!(ingest_file(&path, &mut tally).unwrap(), 1);
        assert_eq!(tally.markers, counts(&[("hi", 2)]));
    }

    #[test]
    fn test_merge_adds_counts() {
        let mut a = MarkerTally::new();
        a.record(&MarkerEntry::plain("x"));
        let mut b = MarkerTally::new();
        b.record(&MarkerEntry::plain("x"));
        b.record(&MarkerEntry::meta("m"));

        a.merge(&b);
        assert_eq!(a.markers, counts(&[("x", 2)]));
        assert_eq!(a.metas, counts(&[("m", 1)]));
    }

    #[test]
    fn test_to_count_set_orders_markers_before_metas() {
        let mut tally = MarkerTally::new();
        tally.record(&MarkerEntry::meta("a"));
        tally.record(&MarkerEntry::plain("z"));

        let set = tally.to_count_set();
        let kinds: Vec<_> = set.items.iter().map(|i| i.kind).collect();
        assert_eq!(kinds, vec![CountKind::Marker, CountKind::Meta]);
    }
}
