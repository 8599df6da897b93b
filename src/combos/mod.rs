//! Combos module - Named groups of markers counted together

pub mod registry;
