//! Command-line argument definitions.

use std::path::PathBuf;

use clap::Parser;

use crate::data::SourceFormat;
use crate::render::OutputFormat;

/// Filter and aggregate a delimited tabular file.
#[derive(Parser, Debug)]
#[command(name = "rusty-table")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Tabular file to read (CSV, TSV, JSON records or Parquet)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Keep only rows matching a condition, e.g. "price>500" or "name=Widget"
    #[arg(short = 'w', long = "where", value_name = "CONDITION")]
    pub condition: Option<String>,

    /// Reduce a numeric column, e.g. "price=avg" (avg, min or max)
    #[arg(short = 'a', long = "aggregate", value_name = "COLUMN=OP")]
    pub aggregate: Option<String>,

    /// Start an interactive session over the file
    #[arg(
        short = 'i',
        long = "interactive",
        conflicts_with_all = ["condition", "aggregate", "format"]
    )]
    pub interactive: bool,

    /// Output format for rows
    #[arg(long = "format", value_enum)]
    pub format: Option<OutputFormat>,

    /// Input format (inferred from extension if not specified)
    #[arg(long = "input-format", value_enum, value_name = "FORMAT")]
    pub input_format: Option<SourceFormat>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Input format to use for `file`.
    pub fn source_format(&self) -> SourceFormat {
        self.input_format
            .unwrap_or_else(|| SourceFormat::from_extension(&self.file))
    }

    /// Default log filter for the verbosity count.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
