//! Marker store - Write deduplicated marker lists as YAML

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::core::error::{MarkerError, Result};

/// Write the sorted, deduplicated markers to `path` as a YAML list,
/// replacing any existing file.
pub fn save_markers<I, S>(markers: I, path: &Path) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let sorted: BTreeSet<String> = markers.into_iter().map(Into::into).collect();
    let yaml = serde_yaml::to_string(&sorted).map_err(|source| MarkerError::Yaml {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, yaml).map_err(|e| MarkerError::io(path, e))?;
    debug!(path = %path.display(), markers = sorted.len(), "wrote marker list");
    Ok(())
}
