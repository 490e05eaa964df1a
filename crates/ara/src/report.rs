//! 📊 report.rs: "So... how covered are we?" Asked every standup, every sprint, forever.
//!
//! 🚀 Turns a [`CoverageCube`] into something a human or a frontend can consume:
//! the raw JSON the SPA expects, or a stack of comfy tables for the terminal.
//!
//! ⚠️ Watching these numbers will not make them go up. Writing scenarios will.

use anyhow::{Context, Result};
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table, presets::UTF8_FULL};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cube::CoverageCube;

/// 🎨 How should the cube leave the building?
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// 📦 `{ "axes": [...], "values": [...] }`, exactly what the frontend decodes.
    #[default]
    Json,
    /// 🍽️ One table per axis, every other axis held at ALL.
    Table,
}

/// 🔧 Where and how to write the report.
#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    /// 📂 `None` = stdout.
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

fn default_pretty() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            file_name: None,
            pretty: default_pretty(),
        }
    }
}

/// 🎨 Render the cube in the configured format.
pub fn render(cube: &CoverageCube, config: &OutputConfig) -> Result<String> {
    match config.format {
        OutputFormat::Json if config.pretty => {
            serde_json::to_string_pretty(cube).context("💀 The cube refused to become pretty JSON")
        }
        OutputFormat::Json => {
            serde_json::to_string(cube).context("💀 The cube refused to become JSON")
        }
        OutputFormat::Table => Ok(render_summary(cube)),
    }
}

/// 🍽️ One table per axis: point label, tooltip, and its count with every other axis at ALL.
///
/// Layout per axis:
/// ```text
/// Countries
/// ┌───────┬───────────────┬───────┐
/// │ Point ┆ Details       ┆ Count │
/// ╞═══════╪═══════════════╪═══════╡
/// │ All   ┆               ┆    11 │
/// │ FR    ┆ France        ┆    10 │
/// ...
/// ```
pub fn render_summary(cube: &CoverageCube) -> String {
    let mut rendered = String::new();
    for (axis_index, axis) in cube.axes.iter().enumerate() {
        let totals = cube.axis_totals(axis_index).unwrap_or_default();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Point", "Details", "Count"]);

        for (point, count) in axis.points.iter().zip(totals) {
            table.add_row(vec![
                Cell::new(&point.name),
                Cell::new(point.tooltip.as_deref().unwrap_or("")),
                Cell::new(count).set_alignment(CellAlignment::Right),
            ]);
        }

        if !rendered.is_empty() {
            rendered.push('\n');
        }
        rendered.push_str(&axis.name);
        rendered.push('\n');
        rendered.push_str(&table.to_string());
        rendered.push('\n');
    }
    rendered
}

/// 📤 Write the rendered report to its file, or to stdout when no file is configured.
pub async fn write_report(rendered: &str, config: &OutputConfig) -> Result<()> {
    match &config.file_name {
        Some(file_name) => {
            tokio::fs::write(file_name, rendered).await.context(format!(
                "💀 Could not write the coverage report to '{file_name}'"
            ))?;
            info!("📤 Coverage report written to '{}'", file_name);
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
