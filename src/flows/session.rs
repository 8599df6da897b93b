//! Session flow - In-process state driven by a front-end
//!
//! A session owns the marker tally and the combination registry. Preconditions
//! that are not met (nothing loaded, empty name or selection, empty text) are
//! reported as a `Notice` rather than an error.

use anyhow::Context;
use std::fmt;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::combos::registry::{parse_definition, ComboRegistry};
use crate::core::error::Result;
use crate::core::render::{Layout, RenderConfig, Renderer};
use crate::flows::scan::{resolve_text, scan_text, ScanReport};
use crate::markers::aggregate::{analyze_markers, ingest_file, MarkerTally};

/// Informational reason an operation did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    NoMarkersLoaded,
    NothingToScan,
    EmptyName,
    EmptySelection,
    EmptyText,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Notice::NoMarkersLoaded => "No markers loaded",
            Notice::NothingToScan => "Load markers first",
            Notice::EmptyName => "Combination name is empty",
            Notice::EmptySelection => "No markers selected for the combination",
            Notice::EmptyText => "No text to analyze",
        };
        f.write_str(msg)
    }
}

/// Result of a session operation that may be skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Done(T),
    Skipped(Notice),
}

impl<T> Outcome<T> {
    #[allow(dead_code)]
    pub fn done(self) -> Option<T> {
        match self {
            Outcome::Done(value) => Some(value),
            Outcome::Skipped(_) => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct Session {
    tally: MarkerTally,
    combos: ComboRegistry,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tally(&self) -> &MarkerTally {
        &self.tally
    }

    pub fn combos(&self) -> &ComboRegistry {
        &self.combos
    }

    /// Replace the tally with the counts found under `directory`.
    /// Returns the number of distinct plain markers.
    pub fn load_directory(&mut self, directory: &Path) -> Result<usize> {
        self.tally = analyze_markers(directory)?;
        info!(
            directory = %directory.display(),
            markers = self.tally.markers.len(),
            "session loaded directory"
        );
        Ok(self.tally.markers.len())
    }

    /// Add the counts found under `directory` to the current tally
    pub fn include_directory(&mut self, directory: &Path) -> Result<usize> {
        let found = analyze_markers(directory)?;
        self.tally.merge(&found);
        Ok(found.markers.len())
    }

    /// Add the entries of one marker file to the current tally.
    /// Returns the number of entries added.
    pub fn add_file(&mut self, path: &Path) -> Result<usize> {
        let added = ingest_file(path, &mut self.tally)?;
        info!(path = %path.display(), entries = added, "session added file");
        Ok(added)
    }

    /// Define a combination from the given markers (last definition wins).
    /// Returns the number of constituents.
    pub fn define_combination(&mut self, name: &str, markers: Vec<String>) -> Outcome<usize> {
        if self.tally.is_empty() {
            return Outcome::Skipped(Notice::NoMarkersLoaded);
        }
        if name.trim().is_empty() {
            return Outcome::Skipped(Notice::EmptyName);
        }
        if markers.is_empty() {
            return Outcome::Skipped(Notice::EmptySelection);
        }

        let size = markers.len();
        self.combos.define(name, markers);
        Outcome::Done(size)
    }

    /// Scan text, or the contents of the file `input` names, against the
    /// loaded markers and combinations.
    pub fn analyze_text(&self, input: &str) -> Result<Outcome<ScanReport>> {
        if self.tally.markers.is_empty() && self.combos.is_empty() {
            return Ok(Outcome::Skipped(Notice::NothingToScan));
        }
        if input.is_empty() {
            return Ok(Outcome::Skipped(Notice::EmptyText));
        }

        let text = resolve_text(input)?;
        let markers = self.tally.markers.keys().map(String::as_str);
        Ok(Outcome::Done(scan_text(&text, markers, &self.combos)))
    }
}

/// Run the scan command: build a session from marker paths and combination
/// definitions, then analyze `input`.
pub fn run_scan(
    input: &str,
    marker_paths: &[PathBuf],
    combo_defs: &[String],
    config: RenderConfig,
) -> anyhow::Result<()> {
    let mut session = Session::new();
    for path in marker_paths {
        if path.is_dir() {
            session
                .include_directory(path)
                .with_context(|| format!("Failed to load markers from {}", path.display()))?;
        } else {
            session
                .add_file(path)
                .with_context(|| format!("Failed to load marker file {}", path.display()))?;
        }
    }

    for def in combo_defs {
        let def = parse_definition(def)?;
        if let Outcome::Skipped(notice) = session.define_combination(&def.name, def.markers) {
            eprintln!("Info: {} ('{}')", notice, def.name);
        }
    }

    match session.analyze_text(input)? {
        Outcome::Done(report) => {
            let stdout = std::io::stdout();
            Renderer::with_config(config).render_to(
                &report.to_count_set(),
                Layout::Analysis,
                stdout.lock(),
            )?;
        }
        Outcome::Skipped(notice) => eprintln!("Info: {}", notice),
    }

    Ok(())
}

/// Run a line-oriented session: one command per input line.
///
/// Commands: `load DIR`, `add FILE`, `combo NAME=a,b`, `show NAME`, `scan TEXT`,
/// `markers`, `combos`, `quit`. Failures are reported and the session continues.
pub fn run_shell<R: BufRead, W: Write>(
    reader: R,
    mut writer: W,
    config: RenderConfig,
) -> anyhow::Result<()> {
    let mut session = Session::new();
    let renderer = Renderer::with_config(config);

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (command, arg) = line
            .split_once(char::is_whitespace)
            .map(|(c, a)| (c, a.trim()))
            .unwrap_or((line, ""));

        match command {
            "quit" | "exit" => break,
            "load" => match session.load_directory(Path::new(arg)) {
                Ok(count) => writeln!(writer, "Loaded {} markers from {}", count, arg)?,
                Err(err) => writeln!(writer, "Error: {}", err)?,
            },
            "add" => match session.add_file(Path::new(arg)) {
                Ok(_) => writeln!(writer, "Added markers from {}", arg)?,
                Err(err) => writeln!(writer, "Error: {}", err)?,
            },
            "combo" => match parse_definition(arg) {
                Ok(def) => match session.define_combination(&def.name, def.markers) {
                    Outcome::Done(size) => writeln!(
                        writer,
                        "Created combination '{}' with {} markers",
                        def.name, size
                    )?,
                    Outcome::Skipped(notice) => writeln!(writer, "Info: {}", notice)?,
                },
                Err(err) => writeln!(writer, "Error: {}", err)?,
            },
            "scan" => match session.analyze_text(arg) {
                Ok(Outcome::Done(report)) => {
                    renderer.render_to(&report.to_count_set(), Layout::Analysis, &mut writer)?
                }
                Ok(Outcome::Skipped(notice)) => writeln!(writer, "Info: {}", notice)?,
                Err(err) => writeln!(writer, "Error: {}", err)?,
            },
            "markers" => renderer.render_to(
                &session.tally().to_count_set(),
                Layout::Summary,
                &mut writer,
            )?,
            "show" => match session.combos().resolve(arg) {
                Some(markers) => writeln!(writer, "{}: {}", arg, markers.join(", "))?,
                None => writeln!(writer, "Info: Unknown combination '{}'", arg)?,
            },
            "combos" => {
                for (name, markers) in session.combos().iter() {
                    writeln!(writer, "{}: {}", name, markers.join(", "))?;
                }
            }
            other => writeln!(writer, "Info: Unknown command '{}'", other)?,
        }
    }

    Ok(())
}
