//! Flows module - Operations a front-end drives against loaded markers
//!
//! Provides:
//! - scan: Count markers and combinations in text
//! - session: In-process tally + combinations, and the line-oriented shell

pub mod scan;
pub mod session;
