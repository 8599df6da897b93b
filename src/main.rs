//! marker-tally - Aggregate annotation marker lists and count them in text
//!
//! marker-tally provides:
//! - Marker aggregation across YAML and CSV marker lists in a directory tree
//! - CSV to YAML conversion of flat marker lists
//! - Named marker combinations
//! - Literal marker and combination counting in text

use anyhow::Result;
use clap::Parser;

mod cli;
mod combos;
mod core;
mod flows;
mod markers;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    crate::core::logging::init_cli_logger(cli.verbose, cli.quiet);
    cli::run(cli)
}
