//! Plain-text result tables.
//!
//! Renders query results as boxed tables with column headers, auto-sized
//! columns and a row-count footer. Only the first rows are shown, the way
//! the lesson previews each result.

use crate::db::{QueryResult, Row};

/// Minimum width for any column.
const MIN_COLUMN_WIDTH: usize = 4;

/// Renders a query result as a text table.
pub struct TextTable<'a> {
    result: &'a QueryResult,
    preview_rows: usize,
    max_column_width: usize,
}

impl<'a> TextTable<'a> {
    /// Creates a new table showing at most 5 rows.
    pub fn new(result: &'a QueryResult) -> Self {
        Self {
            result,
            preview_rows: 5,
            max_column_width: 40,
        }
    }

    /// Sets how many rows are shown.
    pub fn preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    /// Sets the maximum column width.
    pub fn max_column_width(mut self, width: usize) -> Self {
        self.max_column_width = width.max(MIN_COLUMN_WIDTH);
        self
    }

    fn shown_rows(&self) -> &'a [Row] {
        self.result.head(self.preview_rows)
    }

    /// Calculates the width of each column over the header and shown rows.
    fn calculate_column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self
            .result
            .columns
            .iter()
            .map(|col| display_width(&col.name).max(MIN_COLUMN_WIDTH))
            .collect();

        for row in self.shown_rows() {
            for (i, value) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(display_width(&value.to_display_string()));
                }
            }
        }

        widths
            .iter()
            .map(|&w| w.min(self.max_column_width))
            .collect()
    }

    /// Renders the table to a string ending in a newline.
    pub fn render(&self) -> String {
        if self.result.columns.is_empty() {
            return "(no columns)\n".to_string();
        }

        let widths = self.calculate_column_widths();
        let mut lines = Vec::new();

        lines.push(render_border(&widths, '┌', '┬', '┐'));

        let headers: Vec<String> = self.result.columns.iter().map(|c| c.name.clone()).collect();
        lines.push(render_cells(&headers, &widths));

        lines.push(render_border(&widths, '├', '┼', '┤'));

        for row in self.shown_rows() {
            let cells: Vec<String> = row.iter().map(|v| v.to_display_string()).collect();
            lines.push(render_cells(&cells, &widths));
        }

        lines.push(render_border(&widths, '└', '┴', '┘'));
        lines.push(self.footer());

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    fn footer(&self) -> String {
        let total = self.result.row_count;
        let shown = self.shown_rows().len();
        let millis = self.result.execution_time.as_millis();

        if shown < total {
            format!("showing {shown} of {total} rows ({millis}ms)")
        } else {
            format!(
                "{} row{} returned ({}ms)",
                total,
                if total == 1 { "" } else { "s" },
                millis
            )
        }
    }
}

fn display_width(s: &str) -> usize {
    s.chars().count()
}

/// Truncates a string to fit within the given width, adding ellipsis if needed.
fn truncate(s: &str, max_width: usize) -> String {
    if display_width(s) <= max_width {
        s.to_string()
    } else if max_width <= 3 {
        s.chars().take(max_width).collect()
    } else {
        let mut out: String = s.chars().take(max_width - 3).collect();
        out.push_str("...");
        out
    }
}

fn render_border(widths: &[usize], left: char, mid: char, right: char) -> String {
    let segments: Vec<String> = widths.iter().map(|&w| "─".repeat(w + 2)).collect();
    format!("{left}{}{right}", segments.join(&mid.to_string()))
}

fn render_cells(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(i, &w)| {
            let text = truncate(cells.get(i).map(String::as_str).unwrap_or(""), w);
            let pad = w - display_width(&text);
            format!(" {}{} ", text, " ".repeat(pad))
        })
        .collect();
    format!("│{}│", padded.join("│"))
}
