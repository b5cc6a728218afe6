use std::fmt;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::error::RowWidthMismatch;

// ---------------------------------------------------------------------------
// Row – one record of the source table
// ---------------------------------------------------------------------------

/// A single record. Cells are kept exactly as stored in the source and are
/// positionally aligned with the owning [`RowSet`]'s header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    values: Vec<String>,
}

impl Row {
    /// Cell at a header position.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    /// All cells in header order.
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

// ---------------------------------------------------------------------------
// RowSet – header plus ordered rows
// ---------------------------------------------------------------------------

/// An ordered sequence of rows sharing one header.
///
/// Every row holds exactly one value per header column; [`RowSet::push_row`]
/// rejects anything else.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowSet {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl RowSet {
    /// An empty row set with the given header.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a row set from string slices. Mostly useful for tests and demos.
    pub fn from_rows(columns: &[&str], rows: Vec<Vec<&str>>) -> Result<Self, RowWidthMismatch> {
        let mut set = Self::new(columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            set.push_row(row.into_iter().map(str::to_string).collect())?;
        }
        Ok(set)
    }

    /// Append a row, enforcing the header width.
    pub fn push_row(&mut self, values: Vec<String>) -> Result<(), RowWidthMismatch> {
        if values.len() != self.columns.len() {
            return Err(RowWidthMismatch {
                expected: self.columns.len(),
                found: values.len(),
            });
        }
        self.rows.push(Row { values });
        Ok(())
    }

    /// A new set with the same header and the given rows.
    ///
    /// The rows must come from a set with this header.
    pub(crate) fn with_rows(&self, rows: Vec<Row>) -> Self {
        Self {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Header position of a column, matched exactly.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<'a> IntoIterator for &'a RowSet {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl fmt::Display for RowSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rows x {} columns", self.len(), self.columns.len())
    }
}

// -- Serialized as a list of objects keyed by column, in header order --

struct RowRecord<'a> {
    columns: &'a [String],
    row: &'a Row,
}

impl Serialize for RowRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, value) in self.columns.iter().zip(&self.row.values) {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

impl Serialize for RowSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(&RowRecord {
                columns: &self.columns,
                row,
            })?;
        }
        seq.end()
    }
}
