//! End-to-end tests: real files on disk, the one-shot pipeline, and scripted
//! interactive sessions.

use std::io::Write;

use clap::Parser;
use rusty_table::app::{run_once, Command, Flow, ScriptInput, Session};
use rusty_table::cli::Args;
use rusty_table::data::{
    apply_filter, calculate_aggregate, load_file, parse_condition, AggregateOutcome, SourceFormat,
};
use rusty_table::render::aggregate_line;
use rusty_table::state::SessionState;
use rusty_table::{Error, LoadError, QueryError};
use tempfile::NamedTempFile;

const PRODUCTS: &str = "name,price\nWidget,100\nGadget,250\nwidget,abc\n";

fn csv_file(contents: &str) -> NamedTempFile {
    let mut tmp = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    write!(tmp, "{contents}").unwrap();
    tmp
}

/// Run a scripted session and return (stdout, stderr).
fn run_session(tmp: &NamedTempFile, script: &[u8]) -> (String, String) {
    let state = SessionState::open(tmp.path(), SourceFormat::Csv).unwrap();
    let mut session = Session::new(state);
    let (mut out, mut err) = (Vec::new(), Vec::new());
    session
        .run(&mut ScriptInput::new(script), &mut out, &mut err)
        .unwrap();
    (String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
}

fn one_shot(tmp: &NamedTempFile, extra: &[&str]) -> Result<String, Error> {
    let path = tmp.path().to_str().unwrap();
    let args = Args::try_parse_from(["rusty-table", path].iter().chain(extra)).unwrap();
    let mut out = Vec::new();
    run_once(&args, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn one_shot_filter_then_aggregate() {
    let tmp = csv_file(PRODUCTS);
    let rows = load_file(tmp.path()).unwrap();

    let expensive = apply_filter(&rows, Some("price>150")).unwrap();
    assert_eq!(expensive.len(), 1);
    assert_eq!(expensive.rows()[0].values(), ["Gadget", "250"]);

    let avg = calculate_aggregate(&rows, Some("price=avg")).unwrap();
    assert_eq!(aggregate_line(&avg).unwrap(), "Aggregate result: 175.00");

    let max = calculate_aggregate(&rows, Some("price=max")).unwrap();
    assert_eq!(aggregate_line(&max).unwrap(), "Aggregate result: 250.0");
}

#[test]
fn one_shot_prints_table_of_filtered_rows() {
    let tmp = csv_file(PRODUCTS);
    let out = one_shot(&tmp, &["--where", "price>150"]).unwrap();
    assert!(out.contains("name"));
    assert!(out.contains("Gadget"));
    assert!(!out.contains("Widget"));
}

#[test]
fn one_shot_reports_no_matches() {
    let tmp = csv_file(PRODUCTS);
    let out = one_shot(&tmp, &["--where", "price>1000"]).unwrap();
    assert_eq!(out, "No data matches the filter condition\n");
}

#[test]
fn one_shot_aggregate_replaces_table() {
    let tmp = csv_file(PRODUCTS);
    let out = one_shot(&tmp, &["--where", "price>150", "--aggregate", "price=avg"]).unwrap();
    assert_eq!(out, "Aggregate result: 250.00\n");

    // Even with no rows left, an aggregate request prints its one line.
    let out = one_shot(&tmp, &["--where", "price>1000", "--aggregate", "price=max"]).unwrap();
    assert_eq!(out, "No numeric data available for aggregation\n");
}

#[test]
fn one_shot_csv_format() {
    let tmp = csv_file(PRODUCTS);
    let out = one_shot(&tmp, &["--where", "name=Widget", "--format", "csv"]).unwrap();
    assert_eq!(out, "name,price\nWidget,100\n");
}

#[test]
fn one_shot_errors_abort() {
    let tmp = csv_file(PRODUCTS);
    assert!(matches!(
        one_shot(&tmp, &["--where", "price>=1"]),
        Err(Error::Query(QueryError::UnsupportedOperator(_)))
    ));
    assert!(matches!(
        one_shot(&tmp, &["--aggregate", "price=sum"]),
        Err(Error::Query(QueryError::UnknownOperation(_)))
    ));
}

#[test]
fn equality_is_case_sensitive() {
    let tmp = csv_file(PRODUCTS);
    let rows = load_file(tmp.path()).unwrap();
    let out = apply_filter(&rows, Some("name=Widget")).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out.rows()[0].get(0), Some("Widget"));
}

#[test]
fn not_requested_differs_from_no_numeric_data() {
    let tmp = csv_file(PRODUCTS);
    let rows = load_file(tmp.path()).unwrap();
    assert_eq!(calculate_aggregate(&rows, Some("")).unwrap(), AggregateOutcome::NotRequested);
    assert_eq!(
        calculate_aggregate(&rows, Some("name=min")).unwrap(),
        AggregateOutcome::NoNumericData
    );
}

#[test]
fn inclusive_operators_parse_but_do_not_filter() {
    assert!(parse_condition(">=5").is_ok());
    assert!(parse_condition("<=5").is_ok());

    let tmp = csv_file(PRODUCTS);
    let rows = load_file(tmp.path()).unwrap();
    assert!(matches!(
        apply_filter(&rows, Some("price>=5")),
        Err(QueryError::UnsupportedOperator(_))
    ));
}

#[test]
fn missing_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_file(&dir.path().join("nope.csv")).unwrap_err();
    assert!(matches!(err, LoadError::FileNotFound { .. }));
}

#[test]
fn filter_reset_show_restores_original_rows() {
    let tmp = csv_file(PRODUCTS);
    let (out, err) = run_session(&tmp, b"filter price>150\nreset\nshow\nexit\n");

    assert!(out.contains("Found 1 matching records"));
    assert!(out.contains("Data reset to original"));

    let after_reset = out.split("Data reset to original").nth(1).unwrap();
    assert!(after_reset.contains("Widget"));
    assert!(after_reset.contains("Gadget"));
    assert!(after_reset.contains("abc"));
    assert!(out.trim_end().ends_with("Goodbye!"));
    assert!(err.is_empty());
}

#[test]
fn filters_narrow_retained_state() {
    let tmp = csv_file(PRODUCTS);
    let (out, _) = run_session(&tmp, b"filter price<200\naggregate price=max\n");
    assert!(out.contains("Found 1 matching records"));
    assert!(out.contains("Aggregate result: 100.0"));
}

#[test]
fn errors_do_not_end_the_session_or_change_state() {
    let tmp = csv_file(PRODUCTS);
    let state = SessionState::open(tmp.path(), SourceFormat::Csv).unwrap();
    let mut session = Session::new(state);
    let (mut out, mut err) = (Vec::new(), Vec::new());

    for line in ["filter cost>1", "filter price>=1", "filter price", "aggregate price=sum"] {
        let flow = session.execute(Command::parse(line), &mut out, &mut err).unwrap();
        assert_eq!(flow, Flow::Continue);
    }
    assert_eq!(session.state().rows().len(), 3);

    let err = String::from_utf8(err).unwrap();
    assert!(err.contains("Error: Missing column: cost"));
    assert!(err.contains("Error: Unsupported operator: >="));
    assert!(err.contains("Error: Invalid condition format: price"));
    assert!(err.contains("Error: Unknown operation: sum"));
    assert!(!String::from_utf8(out).unwrap().contains("Error:"));
}

#[test]
fn invalid_utf8_line_does_not_end_the_session() {
    let tmp = csv_file(PRODUCTS);
    let (out, err) = run_session(&tmp, b"filter price>\xff\nshow\nexit\n");

    // The mangled literal is not a number, so nothing matches, but the
    // following commands still run.
    assert!(out.contains("Found 0 matching records"));
    assert!(out.contains("Goodbye!"));
    assert!(err.is_empty());
}

#[test]
fn invalid_commands_and_empty_results() {
    let tmp = csv_file(PRODUCTS);
    let (out, _) = run_session(&tmp, b"frobnicate\nfilter\nfilter price>1000\nshow\n");
    assert_eq!(out.matches("Invalid command. Try again.").count(), 2);
    assert!(out.contains("Found 0 matching records"));
    assert!(out.contains("No data to display"));
    // End of input ends the session like `exit`.
    assert!(out.trim_end().ends_with("Goodbye!"));
}

#[test]
fn aggregate_over_filtered_out_rows_has_no_numeric_data() {
    let tmp = csv_file(PRODUCTS);
    let (out, _) = run_session(&tmp, b"filter name=widget\naggregate price=avg\nexit\n");
    assert!(out.contains("No numeric data available for aggregation"));
}

#[test]
fn reset_reads_the_file_again() {
    let tmp = csv_file(PRODUCTS);
    let state = SessionState::open(tmp.path(), SourceFormat::Csv).unwrap();
    let mut session = Session::new(state);
    let (mut out, mut err) = (Vec::new(), Vec::new());

    std::fs::write(tmp.path(), "name,price\nOnly,1\n").unwrap();
    session.execute(Command::Reset, &mut out, &mut err).unwrap();
    assert_eq!(session.state().rows().len(), 1);
}

#[test]
fn failed_reset_keeps_filtered_rows() {
    let tmp = csv_file(PRODUCTS);
    let state = SessionState::open(tmp.path(), SourceFormat::Csv).unwrap();
    let mut session = Session::new(state);
    let (mut out, mut err) = (Vec::new(), Vec::new());

    session
        .execute(Command::parse("filter price>150"), &mut out, &mut err)
        .unwrap();
    let path = tmp.path().to_path_buf();
    tmp.close().unwrap();
    assert!(!path.exists());

    let flow = session.execute(Command::Reset, &mut out, &mut err).unwrap();
    assert_eq!(flow, Flow::Continue);
    assert_eq!(session.state().rows().len(), 1);

    let err = String::from_utf8(err).unwrap();
    assert!(err.starts_with("Error: "));
    assert!(err.contains("not found"));
    assert!(!String::from_utf8(out).unwrap().contains("Data reset to original"));
}
