//! Error types for marker loading, aggregation and combination parsing

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarkerError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML in {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to read CSV in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Not a marker directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Invalid marker entry in {}: {detail}", .path.display())]
    InvalidEntry { path: PathBuf, detail: String },

    #[error("Invalid marker document {}: {detail}", .path.display())]
    InvalidDocument { path: PathBuf, detail: String },

    #[error("Invalid combination definition: {0}")]
    InvalidCombination(String),
}

impl MarkerError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MarkerError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, MarkerError>;
