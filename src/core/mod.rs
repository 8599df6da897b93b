//! Core module - Shared data structures and utilities
//!
//! This module provides:
//! - Marker entries and the count model (CountSet)
//! - Rendering functions for different output formats
//! - Marker file classification and derived paths
//! - The core error type
//! - Logging setup

pub mod error;
pub mod logging;
pub mod model;
pub mod paths;
pub mod render;
