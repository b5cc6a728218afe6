use std::path::{Path, PathBuf};

use log::debug;

use crate::data::{
    apply_filter, calculate_aggregate, load_file_as, AggregateOutcome, RowSet, SourceFormat,
};
use crate::error::{LoadError, QueryError};

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// The interactive session's retained rows, plus where to reload them from.
///
/// Filters replace the rows wholesale; a failed command leaves them as they
/// were.
#[derive(Debug)]
pub struct SessionState {
    source: PathBuf,
    format: SourceFormat,
    rows: RowSet,
}

impl SessionState {
    /// Load `source` and start a session over its rows.
    pub fn open(source: &Path, format: SourceFormat) -> Result<Self, LoadError> {
        let rows = load_file_as(source, format)?;
        Ok(Self {
            source: source.to_path_buf(),
            format,
            rows,
        })
    }

    /// Current rows.
    pub fn rows(&self) -> &RowSet {
        &self.rows
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Narrow the current rows by `condition` and return the match count.
    pub fn filter(&mut self, condition: &str) -> Result<usize, QueryError> {
        let filtered = apply_filter(&self.rows, Some(condition))?;
        debug!("session filter {condition:?}: {} -> {} rows", self.rows.len(), filtered.len());
        self.rows = filtered;
        Ok(self.rows.len())
    }

    /// Aggregate over the current rows without changing them.
    pub fn aggregate(&self, spec: &str) -> Result<AggregateOutcome, QueryError> {
        calculate_aggregate(&self.rows, Some(spec))
    }

    /// Re-read the source file, discarding any filtering.
    pub fn reset(&mut self) -> Result<(), LoadError> {
        self.rows = load_file_as(&self.source, self.format)?;
        debug!("session reset to {} rows", self.rows.len());
        Ok(())
    }
}
