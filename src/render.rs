//! Output formatting for row sets and aggregate results.
//!
//! Rows render as an ASCII grid, CSV, or a JSON array of objects. Deciding
//! what to print for an empty row set is left to the caller.

use std::io::Write;

use clap::ValueEnum;
use comfy_table::presets::ASCII_FULL;
use comfy_table::{Cell, Table};

use crate::data::{AggregateOutcome, RowSet};

/// Printed by one-shot mode when no rows survive the filter.
pub const NO_MATCHES: &str = "No data matches the filter condition";

/// Printed by interactive mode when the current rows are empty.
pub const NO_DATA: &str = "No data to display";

/// Printed when the aggregated column had no numeric cells.
pub const NO_NUMERIC_DATA: &str = "No numeric data available for aggregation";

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Grid table (default)
    #[default]
    Table,
    /// Comma-separated values
    Csv,
    /// Pretty-printed JSON array
    Json,
}

/// Formats row sets for output.
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    /// Create a new formatter with the specified format.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Format a row set and write it to the given writer.
    pub fn write<W: Write>(&self, rows: &RowSet, writer: &mut W) -> std::io::Result<()> {
        match self.format {
            OutputFormat::Table => writeln!(writer, "{}", render_table(rows)),
            OutputFormat::Csv => write_csv(rows, writer),
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *writer, rows)?;
                writeln!(writer)
            }
        }
    }
}

/// Render rows as a bordered grid with the column names as header.
pub fn render_table(rows: &RowSet) -> Table {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.set_header(rows.columns().iter().map(Cell::new));
    for row in rows {
        table.add_row(row.values().iter().map(Cell::new));
    }
    table
}

fn write_csv<W: Write>(rows: &RowSet, writer: &mut W) -> std::io::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(rows.columns())?;
    for row in rows {
        csv_writer.write_record(row.values())?;
    }
    csv_writer.flush()
}

/// The single line printed for an aggregate, or `None` when none was asked for.
pub fn aggregate_line(outcome: &AggregateOutcome) -> Option<String> {
    match outcome {
        AggregateOutcome::NotRequested => None,
        AggregateOutcome::NoNumericData => Some(NO_NUMERIC_DATA.to_string()),
        AggregateOutcome::Computed(result) => Some(format!("Aggregate result: {result}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{AggregateOp, AggregateResult};

    fn sample() -> RowSet {
        RowSet::from_rows(&["name", "price"], vec![vec!["Widget", "100"]]).unwrap()
    }

    fn written(format: OutputFormat, rows: &RowSet) -> String {
        let mut out = Vec::new();
        OutputFormatter::new(format).write(rows, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn table_has_header_and_cells() {
        let text = written(OutputFormat::Table, &sample());
        assert!(text.contains("name"));
        assert!(text.contains("price"));
        assert!(text.contains("Widget"));
        assert!(text.starts_with('+'));
    }

    #[test]
    fn empty_set_renders_header_only() {
        let empty = RowSet::new(vec!["name".into()]);
        let text = written(OutputFormat::Table, &empty);
        assert!(text.contains("name"));
    }

    #[test]
    fn csv_output() {
        assert_eq!(written(OutputFormat::Csv, &sample()), "name,price\nWidget,100\n");
    }

    #[test]
    fn json_output_keeps_column_order() {
        let value: serde_json::Value =
            serde_json::from_str(&written(OutputFormat::Json, &sample())).unwrap();
        assert_eq!(value[0]["name"], "Widget");
        assert_eq!(value[0]["price"], "100");
    }

    #[test]
    fn aggregate_lines() {
        assert_eq!(aggregate_line(&AggregateOutcome::NotRequested), None);
        assert_eq!(
            aggregate_line(&AggregateOutcome::NoNumericData).as_deref(),
            Some(NO_NUMERIC_DATA)
        );
        let avg = AggregateOutcome::Computed(AggregateResult {
            op: AggregateOp::Avg,
            value: 175.0,
        });
        assert_eq!(aggregate_line(&avg).as_deref(), Some("Aggregate result: 175.00"));
    }
}
