//! Renderer module
//!
//! Renders CountSet to different output formats: text, jsonl, json

use crate::core::model::{CountKind, CountSet};
use std::io::Write;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Jsonl,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "jsonl" => Ok(OutputFormat::Jsonl),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Text layout of a count set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Directory summary: `{identity}: {count} examples`, meta markers in their own section
    Summary,
    /// Text analysis: `  {identity}: {count}` under a heading
    Analysis,
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl RenderConfig {
    /// Create a new render config with default options
    #[allow(dead_code)]
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            pretty: false,
        }
    }

    /// Create a new render config with pretty option
    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

/// Renderer for count sets
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    /// Create a new renderer with render config
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a count set to a string
    pub fn render(&self, set: &CountSet, layout: Layout) -> String {
        match self.config.format {
            OutputFormat::Text => match layout {
                Layout::Summary => render_summary(set),
                Layout::Analysis => render_analysis(set),
            },
            OutputFormat::Jsonl => self.render_jsonl(set),
            OutputFormat::Json => self.render_json(set),
        }
    }

    /// Render to a writer, terminated by a newline
    pub fn render_to<W: Write>(
        &self,
        set: &CountSet,
        layout: Layout,
        mut writer: W,
    ) -> std::io::Result<()> {
        let output = self.render(set, layout);
        if output.is_empty() {
            return Ok(());
        }
        writeln!(writer, "{}", output)
    }

    /// Render as JSON Lines (one JSON object per line)
    fn render_jsonl(&self, set: &CountSet) -> String {
        set.items
            .iter()
            .filter_map(|item| {
                if self.config.pretty {
                    serde_json::to_string_pretty(item).ok()
                } else {
                    serde_json::to_string(item).ok()
                }
            })
            .collect::<Vec<_>>()
            .join(if self.config.pretty { "\n\n" } else { "\n" })
    }

    /// Render as a single JSON array
    fn render_json(&self, set: &CountSet) -> String {
        if self.config.pretty {
            serde_json::to_string_pretty(&set.items).unwrap_or_else(|_| "[]".to_string())
        } else {
            serde_json::to_string(&set.items).unwrap_or_else(|_| "[]".to_string())
        }
    }
}

fn render_summary(set: &CountSet) -> String {
    let mut lines = vec!["Marker summary:".to_string()];
    lines.extend(
        set.of_kind(CountKind::Marker)
            .map(|item| format!("{}: {} examples", item.identity, item.count)),
    );

    let metas: Vec<String> = set
        .of_kind(CountKind::Meta)
        .map(|item| format!("{}: {} examples", item.identity, item.count))
        .collect();
    if !metas.is_empty() {
        lines.push(String::new());
        lines.push("Meta markers:".to_string());
        lines.extend(metas);
    }

    lines.join("\n")
}

fn render_analysis(set: &CountSet) -> String {
    let mut lines = vec!["Analysis result:".to_string()];
    lines.extend(
        set.items
            .iter()
            .map(|item| format!("  {}: {}", item.identity, item.count)),
    );
    lines.join("\n")
}
