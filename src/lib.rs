//! # rusty-table
//!
//! Read a delimited tabular file into memory, keep the rows matching one
//! comparison, and either print them as a table or reduce a numeric column
//! to a single value.
//!
//! - **Conditions**: `column=literal` (exact text), `column>n`, `column<n`
//! - **Aggregates**: `column=avg`, `column=min`, `column=max`
//! - **Inputs**: CSV, TSV, JSON records, Parquet
//! - **Interactive mode**: filters narrow a retained row set until `reset`
//!
//! # Example
//!
//! ```no_run
//! use rusty_table::data::{apply_filter, calculate_aggregate, load_file};
//! use rusty_table::render::aggregate_line;
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let rows = load_file(Path::new("products.csv"))?;
//!     let expensive = apply_filter(&rows, Some("price>150"))?;
//!     let outcome = calculate_aggregate(&expensive, Some("price=avg"))?;
//!     if let Some(line) = aggregate_line(&outcome) {
//!         println!("{line}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod cli;
pub mod data;
pub mod error;
pub mod render;
pub mod repl;
pub mod state;

pub use error::{Error, LoadError, QueryError, Result};
