//! Error types for rusty-table.

use thiserror::Error;

/// Main error type for rusty-table operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Error loading the source file
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Error evaluating a filter or aggregate
    #[error(transparent)]
    Query(#[from] QueryError),

    /// I/O error while writing output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to reading the source file.
#[derive(Error, Debug)]
pub enum LoadError {
    /// File not found
    #[error("File '{path}' not found")]
    FileNotFound { path: String },

    /// File exists but could not be read or parsed
    #[error("Cannot read '{path}': {reason}")]
    Unreadable { path: String, reason: String },
}

/// Errors raised while parsing or evaluating filters and aggregates.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// No operator could split the condition into exactly two parts
    #[error("Invalid condition format: {0}")]
    InvalidCondition(String),

    /// Operator parsed but has no comparison behind it
    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),

    /// Referenced column is absent from a row
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Aggregate spec lacks the `column=operation` shape
    #[error("Invalid aggregate format: {0}")]
    InvalidAggregate(String),

    /// Aggregate operation other than avg/min/max
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),
}

/// Convenience alias for results in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// A row whose cell count disagrees with the header.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("row has {found} values but the header has {expected} columns")]
pub struct RowWidthMismatch {
    pub expected: usize,
    pub found: usize,
}
