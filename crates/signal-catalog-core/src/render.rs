//! Plain-table and markdown rendering for reports.
//!
//! Reports build their output through [`ReportDoc`] so every command gets
//! the same two formats: aligned text tables for terminals, pipe tables and
//! headings for markdown export.

use std::fmt::Write as _;
use std::str::FromStr;

use crate::error::ValidationError;

/// Cells longer than this are truncated with an ellipsis in table mode.
const MAX_CELL_WIDTH: usize = 40;

/// Output format selector for report commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "table" => Ok(OutputFormat::Table),
            "markdown" => Ok(OutputFormat::Markdown),
            other => Err(ValidationError::UnknownFormat {
                value: other.to_string(),
            }),
        }
    }
}

/// A rectangular block of cells with a header row.
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.headers.len());
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn truncate(cell: &str) -> String {
        if cell.chars().count() > MAX_CELL_WIDTH {
            let head: String = cell.chars().take(MAX_CELL_WIDTH - 3).collect();
            format!("{head}...")
        } else {
            cell.to_string()
        }
    }

    fn render_plain(&self, out: &mut String) {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        let rows: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(|c| Self::truncate(c)).collect())
            .collect();
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let header: Vec<String> = self
            .headers
            .iter()
            .enumerate()
            .map(|(i, h)| format!("{h:<width$}", width = widths[i]))
            .collect();
        let _ = writeln!(out, "{}", header.join(" | "));
        let divider: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        let _ = writeln!(out, "{}", divider.join("-+-"));

        for row in &rows {
            let line: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(i, c)| format!("{c:<width$}", width = widths[i]))
                .collect();
            let _ = writeln!(out, "{}", line.join(" | "));
        }
    }

    fn render_markdown(&self, out: &mut String) {
        let _ = writeln!(out, "| {} |", self.headers.join(" | "));
        let divider: Vec<&str> = self.headers.iter().map(|_| "---").collect();
        let _ = writeln!(out, "| {} |", divider.join(" | "));
        for row in &self.rows {
            let cells: Vec<String> = row.iter().map(|c| c.replace('|', "\\|")).collect();
            let _ = writeln!(out, "| {} |", cells.join(" | "));
        }
    }
}

/// Incremental report document, format-aware.
pub struct ReportDoc {
    format: OutputFormat,
    buf: String,
}

impl ReportDoc {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            buf: String::new(),
        }
    }

    /// Top-level title (`#` in markdown, `=` underline in table mode).
    pub fn title(&mut self, text: &str) {
        match self.format {
            OutputFormat::Markdown => {
                let _ = writeln!(self.buf, "# {text}");
            }
            OutputFormat::Table => {
                let _ = writeln!(self.buf, "{text}");
                let _ = writeln!(self.buf, "{}", "=".repeat(text.chars().count()));
            }
        }
    }

    /// Section heading (`##` in markdown, `-` underline in table mode).
    pub fn heading(&mut self, text: &str) {
        match self.format {
            OutputFormat::Markdown => {
                let _ = writeln!(self.buf, "## {text}");
            }
            OutputFormat::Table => {
                let _ = writeln!(self.buf, "{text}");
                let _ = writeln!(self.buf, "{}", "-".repeat(text.chars().count()));
            }
        }
    }

    /// `Label: value` line.
    pub fn kv(&mut self, label: &str, value: impl std::fmt::Display) {
        let _ = writeln!(self.buf, "{label}: {value}");
    }

    /// Bulleted line.
    pub fn bullet(&mut self, text: &str) {
        let _ = writeln!(self.buf, "- {text}");
    }

    /// Raw line.
    pub fn line(&mut self, text: &str) {
        let _ = writeln!(self.buf, "{text}");
    }

    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    pub fn table(&mut self, table: &Table) {
        match self.format {
            OutputFormat::Table => table.render_plain(&mut self.buf),
            OutputFormat::Markdown => table.render_markdown(&mut self.buf),
        }
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Table {
        let mut t = Table::new(&["ID", "Title"]);
        t.push_row(vec!["1".to_string(), "Short".to_string()]);
        t.push_row(vec!["12".to_string(), "x".repeat(60)]);
        t
    }

    #[test]
    fn format_parse_rejects_unknown() {
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert_eq!(
            "markdown".parse::<OutputFormat>().unwrap(),
            OutputFormat::Markdown
        );
        assert!("json".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn plain_table_aligns_and_truncates() {
        let mut doc = ReportDoc::new(OutputFormat::Table);
        doc.table(&sample_table());
        let out = doc.finish();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0].trim_end(), "ID | Title");
        assert!(lines[1].contains("-+-"));
        assert!(lines[2].starts_with("1  | Short"));
        assert!(lines[3].contains("..."));
        // Truncated cell respects the cap.
        assert!(lines[3].split('|').nth(1).unwrap().trim().chars().count() <= 40);
    }

    #[test]
    fn markdown_table_uses_pipes() {
        let mut doc = ReportDoc::new(OutputFormat::Markdown);
        doc.table(&sample_table());
        let out = doc.finish();
        assert!(out.starts_with("| ID | Title |"));
        assert!(out.lines().nth(1).unwrap().contains("---"));
    }

    #[test]
    fn headings_follow_format() {
        let mut md = ReportDoc::new(OutputFormat::Markdown);
        md.heading("Snapshot");
        assert_eq!(md.finish(), "## Snapshot\n");

        let mut plain = ReportDoc::new(OutputFormat::Table);
        plain.heading("Snapshot");
        assert_eq!(plain.finish(), "Snapshot\n--------\n");
    }
}
