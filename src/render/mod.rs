//! Output rendering for crm-joins.
//!
//! Results are printed either as text tables for reading along with the
//! lesson, or as JSON for anything that wants the full result set.

mod table;

pub use table::TextTable;

use crate::config::DisplayConfig;
use crate::db::{QueryResult, Schema};
use crate::error::{JoinsError, Result};
use crate::lesson::{LessonStep, StepReport};
use serde::{Deserialize, Serialize};

/// Output format for printed results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Boxed text tables showing the first rows.
    #[default]
    Text,
    /// Pretty-printed JSON with every row.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid output format: {s}. Expected: text or json")),
        }
    }
}

/// Renders one result as a text table using the display settings.
pub fn render_result(result: &QueryResult, display: &DisplayConfig) -> String {
    TextTable::new(result)
        .preview_rows(display.preview_rows)
        .max_column_width(display.max_column_width)
        .render()
}

/// Renders a lesson step: heading, narrative, SQL and the result table.
pub fn render_report(report: &StepReport, display: &DisplayConfig) -> String {
    let step = &report.step;
    let heading = format!("[{}] {}", step.id, step.title);
    let underline = "=".repeat(heading.chars().count());

    format!(
        "{heading}\n{underline}\n{}\n\n    {}\n\n{}",
        step.narrative,
        step.sql,
        render_result(&report.result, display)
    )
}

/// Renders lesson reports in the requested format.
pub fn render_reports(
    reports: &[StepReport],
    format: OutputFormat,
    display: &DisplayConfig,
) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(reports
            .iter()
            .map(|report| render_report(report, display))
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Json => to_json(reports),
    }
}

/// Renders ad-hoc query results in the requested format.
pub fn render_results(
    results: &[QueryResult],
    format: OutputFormat,
    display: &DisplayConfig,
) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(results
            .iter()
            .map(|result| render_result(result, display))
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Json => to_json(results),
    }
}

/// Renders the store schema in the requested format.
pub fn render_schema(schema: &Schema, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(schema.format_for_display()),
        OutputFormat::Json => to_json(schema),
    }
}

/// Lists step ids, topics and titles, one per line.
pub fn render_step_list(steps: &[LessonStep]) -> String {
    let id_width = steps.iter().map(|s| s.id.len()).max().unwrap_or(0);
    steps
        .iter()
        .map(|step| {
            format!(
                "{:<id_width$}  {} ({})\n",
                step.id,
                step.title,
                step.topic.label()
            )
        })
        .collect()
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut json = serde_json::to_string_pretty(value)
        .map_err(|e| JoinsError::internal(format!("Failed to serialize output: {e}")))?;
    json.push('\n');
    Ok(json)
}
