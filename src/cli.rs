//! CLI module - Command-line interface definitions and handlers

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::render::{OutputFormat, RenderConfig};

/// marker-tally - aggregate marker lists and count markers in text.
#[derive(Parser, Debug)]
#[command(name = "marker-tally")]
#[command(
    author,
    version,
    about,
    long_about = r#"marker-tally aggregates annotation marker lists and counts markers in text.

Marker lists are YAML files (.yaml/.yml) holding a list of markers, or a mapping
whose `markers` key holds that list, and flat CSV files (.csv) whose first column
names one marker per row. An entry of the form `{meta: name}` is a meta marker
and is counted separately.

Output formats:
- text: human-readable lines (default)
- jsonl: one JSON object per count
- json: a single JSON array

Examples:
    marker-tally analyze markers/
    marker-tally analyze markers/ --consolidate
    marker-tally scan "hi there, hello" --markers markers/ --combo greeting=hi,hello
    marker-tally session < script.txt
"#
)]
pub struct Cli {
    /// Output format (text/jsonl/json).
    #[arg(
        long,
        global = true,
        default_value = "text",
        env = "MARKER_TALLY_FORMAT",
        value_name = "FORMAT",
        long_help = "Select the output format for counts.\n\n\
Supported values:\n\
- text (default)\n\
- jsonl\n\
- json\n\n\
Every JSON count has the shape {\"kind\": ..., \"identity\": ..., \"count\": ...}."
    )]
    pub format: String,

    /// Quiet mode (errors only on stderr).
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (more diagnostics).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Enable debug diagnostics on stderr (loaded files, conversions,\n\
totals). RUST_LOG overrides this flag when set."
    )]
    pub verbose: bool,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Count markers across every marker file under a directory.
    #[command(
        long_about = "Walk DIR recursively, load every .yaml/.yml/.csv marker file and print\n\
how often each marker occurs, sorted by marker.\n\n\
Each CSV file is converted as it is read: a .yaml file with the same stem is\n\
written next to it holding the CSV's sorted, deduplicated markers.\n\n\
Examples:\n\
  marker-tally analyze markers/\n\
  marker-tally analyze markers/ --consolidate\n"
    )]
    Analyze {
        /// Directory with marker files.
        #[arg(value_name = "DIR")]
        directory: PathBuf,

        /// Also write every marker seen to DIR/_all_markers.yaml.
        #[arg(
            long,
            long_help = "Write the sorted set of every marker seen (plain and meta) to\n\
DIR/_all_markers.yaml. That file is skipped by later analyze runs."
        )]
        consolidate: bool,
    },

    /// Count markers and combinations in a text or text file.
    #[command(
        long_about = r#"Count literal occurrences of every loaded marker in TEXT. When TEXT names
an existing file, the file's contents are scanned instead.

A combination's count is the sum of its markers' counts. A combination that shares
its name with a marker replaces that marker's count in the output.

Examples:
    marker-tally scan "hi there, hi! hello" --markers markers/
    marker-tally scan notes.txt --markers a.yaml --markers b.csv --combo greeting=hi,hello
"#
    )]
    Scan {
        /// Text to scan, or a path to a text file.
        #[arg(value_name = "TEXT")]
        text: String,

        /// Marker directory or file to load (repeatable).
        #[arg(long = "markers", short = 'm', value_name = "PATH")]
        markers: Vec<PathBuf>,

        /// Combination definition NAME=marker1,marker2 (repeatable).
        #[arg(long = "combo", short = 'c', value_name = "NAME=MARKERS")]
        combos: Vec<String>,
    },

    /// Read session commands from stdin.
    #[command(
        long_about = r#"Run an interactive session reading one command per line from stdin:

  load DIR            replace loaded markers with the markers under DIR
  add FILE            add the markers of one file
  combo NAME=a,b      define a combination
  show NAME           print the markers of a combination
  scan TEXT           count markers and combinations in TEXT (or a file path)
  markers             print the loaded marker counts
  combos              print the defined combinations
  quit                end the session
"#
    )]
    Session,
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let format: OutputFormat = cli.format.parse().unwrap_or_default();
    let render_config = RenderConfig::with_pretty(format, cli.pretty);

    match cli.command {
        Commands::Analyze {
            directory,
            consolidate,
        } => crate::markers::aggregate::run_analyze(&directory, consolidate, render_config),

        Commands::Scan {
            text,
            markers,
            combos,
        } => crate::flows::session::run_scan(&text, &markers, &combos, render_config),

        Commands::Session => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            crate::flows::session::run_shell(stdin.lock(), stdout.lock(), render_config)
        }
    }
}
