//! Markers module - Load, store and aggregate marker lists
//!
//! Marker files are YAML lists (`.yaml`/`.yml`) or flat CSV files (`.csv`).
//! Entries are plain strings or `{meta: name}` records.

pub mod aggregate;
pub mod source;
pub mod store;
