use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, RecordBatch};
use arrow::error::ArrowError;
use arrow::util::display::array_value_to_string;
use clap::ValueEnum;
use log::debug;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::RowSet;
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Source formats
// ---------------------------------------------------------------------------

/// Input file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceFormat {
    /// Comma-separated values
    Csv,
    /// Tab-separated values
    Tsv,
    /// JSON array of flat objects
    Json,
    /// Apache Parquet
    Parquet,
}

impl SourceFormat {
    /// Infer the format from a file extension. Unknown extensions read as CSV.
    pub fn from_extension(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "tsv" | "tab" => SourceFormat::Tsv,
            "json" => SourceFormat::Json,
            "parquet" | "pq" => SourceFormat::Parquet,
            _ => SourceFormat::Csv,
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a row set from a file, picking the format from its extension.
pub fn load_file(path: &Path) -> Result<RowSet, LoadError> {
    load_file_as(path, SourceFormat::from_extension(path))
}

/// Load a row set from a file in an explicit format.
///
/// A missing path is [`LoadError::FileNotFound`]; any other failure is
/// reported as [`LoadError::Unreadable`] carrying the full context chain.
pub fn load_file_as(path: &Path, format: SourceFormat) -> Result<RowSet, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let loaded = match format {
        SourceFormat::Csv => load_delimited(path, b','),
        SourceFormat::Tsv => load_delimited(path, b'\t'),
        SourceFormat::Json => load_json(path),
        SourceFormat::Parquet => load_parquet(path),
    };

    let rows = loaded.map_err(|e| LoadError::Unreadable {
        path: path.display().to_string(),
        reason: format!("{e:#}"),
    })?;
    debug!("loaded {rows} from {} as {format:?}", path.display());
    Ok(rows)
}

// ---------------------------------------------------------------------------
// CSV / TSV loader
// ---------------------------------------------------------------------------

/// Header row names the columns; every cell is kept verbatim.
fn load_delimited(path: &Path, delimiter: u8) -> Result<RowSet> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .context("opening delimited file")?;

    let headers: Vec<String> = reader
        .headers()
        .context("reading header row")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = RowSet::new(headers);

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("row {row_no}"))?;
        rows.push_row(record.iter().map(|v| v.to_string()).collect())
            .with_context(|| format!("row {row_no}"))?;
    }

    Ok(rows)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "name": "Widget", "price": 100 },
///   { "name": "Gadget", "price": "250" }
/// ]
/// ```
///
/// The first object fixes the header; every object must use the same keys.
fn load_json(path: &Path) -> Result<RowSet> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut rows: Option<RowSet> = None;

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let set = rows.get_or_insert_with(|| RowSet::new(obj.keys().cloned().collect()));

        if obj.len() != set.columns().len() {
            bail!(
                "Row {i}: has {} keys but the header has {}",
                obj.len(),
                set.columns().len()
            );
        }

        let mut values = Vec::with_capacity(obj.len());
        for column in set.columns() {
            let val = obj
                .get(column)
                .with_context(|| format!("Row {i}: missing key '{column}'"))?;
            values.push(json_to_cell(val));
        }
        set.push_row(values).with_context(|| format!("Row {i}"))?;
    }

    Ok(rows.unwrap_or_default())
}

fn json_to_cell(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file. Every column is rendered to text with Arrow's display
/// formatter so cells look the same as they would in a CSV export.
fn load_parquet(path: &Path) -> Result<RowSet> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;

    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    rows_from_batches(headers, reader)
}

/// Flatten record batches into rows. Row numbers in error context count from
/// the start of the file, not the batch.
fn rows_from_batches<I>(headers: Vec<String>, batches: I) -> Result<RowSet>
where
    I: IntoIterator<Item = std::result::Result<RecordBatch, ArrowError>>,
{
    let mut rows = RowSet::new(headers);
    let mut offset = 0usize;

    for batch_result in batches {
        let batch = batch_result.context("reading parquet record batch")?;

        for row in 0..batch.num_rows() {
            let row_no = offset + row;
            let values = batch
                .columns()
                .iter()
                .map(|col| cell_to_string(col, row))
                .collect::<Result<Vec<_>>>()
                .with_context(|| format!("Row {row_no}"))?;
            rows.push_row(values).with_context(|| format!("Row {row_no}"))?;
        }
        offset += batch.num_rows();
    }

    Ok(rows)
}

fn cell_to_string(col: &Arc<dyn Array>, row: usize) -> Result<String> {
    if col.is_null(row) {
        return Ok(String::new());
    }
    array_value_to_string(col, row)
        .with_context(|| format!("formatting {:?} value", col.data_type()))
}
