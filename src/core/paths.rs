//! Path classification utilities
//!
//! Decides which files are marker sources and where derived files
//! (companion and consolidated marker lists) are written.

use std::path::{Path, PathBuf};

/// Extensions of structured (YAML) marker lists
pub const STRUCTURED_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Extension of flat (CSV) marker lists
pub const FLAT_EXTENSION: &str = "csv";

/// Extension given to the structured companion of a flat file
pub const COMPANION_EXTENSION: &str = "yaml";

/// File name of the consolidated marker list written inside a scanned root
pub const CONSOLIDATED_FILE: &str = "_all_markers.yaml";

/// Format family of a marker source file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Structured,
    Flat,
}

/// Classify a path by its (case-insensitive) extension
pub fn classify(path: &Path) -> Option<SourceFormat> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    if STRUCTURED_EXTENSIONS.contains(&ext.as_str()) {
        Some(SourceFormat::Structured)
    } else if ext == FLAT_EXTENSION {
        Some(SourceFormat::Flat)
    } else {
        None
    }
}

/// Path of the structured companion written for a flat file
pub fn companion_path(path: &Path) -> PathBuf {
    path.with_extension(COMPANION_EXTENSION)
}

/// Path of the consolidated marker list for a scanned root
pub fn consolidated_path(root: &Path) -> PathBuf {
    root.join(CONSOLIDATED_FILE)
}

/// Whether `path` is a consolidated marker list, at any depth
pub fn is_consolidated(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name == CONSOLIDATED_FILE)
}

/// Normalize a path to use '/' as separator (for cross-platform consistency)
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Path relative to root for display, falling back to the full path
pub fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .map(normalize_path)
        .unwrap_or_else(|_| normalize_path(path))
}
