use std::cmp::Ordering;

use log::{debug, trace};

use super::condition::{parse_condition, Condition, Operator};
use super::model::RowSet;
use crate::error::QueryError;

// ---------------------------------------------------------------------------
// Row filter: apply one parsed condition across a row set
// ---------------------------------------------------------------------------

/// Filter `rows` by a raw condition string.
///
/// An absent or empty condition returns the input unchanged. Otherwise the
/// condition is parsed and evaluated per row:
/// * `=` compares the cell and the literal as strings, case-sensitively
/// * `>` / `<` compare numerically; a row whose cell or literal is not a
///   number is dropped without error
/// * `>=` / `<=` are rejected with [`QueryError::UnsupportedOperator`]
///
/// A column missing from the header aborts the whole filter with
/// [`QueryError::MissingColumn`] as soon as a row is inspected.
pub fn apply_filter(rows: &RowSet, condition: Option<&str>) -> Result<RowSet, QueryError> {
    match condition {
        None | Some("") => Ok(rows.clone()),
        Some(raw) => filter_rows(rows, &parse_condition(raw)?),
    }
}

/// Evaluate an already-parsed condition. Matching rows keep their order.
pub fn filter_rows(rows: &RowSet, condition: &Condition) -> Result<RowSet, QueryError> {
    let wanted = match condition.operator {
        Operator::Equal => None,
        Operator::GreaterThan => Some(Ordering::Greater),
        Operator::LessThan => Some(Ordering::Less),
        unsupported @ (Operator::GreaterOrEqual | Operator::LessOrEqual) => {
            return Err(QueryError::UnsupportedOperator(unsupported.to_string()));
        }
    };

    let mut matched = Vec::new();
    let mut skipped = 0usize;

    if !rows.is_empty() {
        let index = rows
            .column_index(&condition.column)
            .ok_or_else(|| QueryError::MissingColumn(condition.column.clone()))?;

        for row in rows {
            let cell = row
                .get(index)
                .ok_or_else(|| QueryError::MissingColumn(condition.column.clone()))?;

            let keep = match wanted {
                None => cell == condition.literal,
                Some(ordering) => {
                    match (cell.parse::<f64>(), condition.literal.parse::<f64>()) {
                        (Ok(cell), Ok(literal)) => cell.partial_cmp(&literal) == Some(ordering),
                        _ => {
                            trace!("skipping non-numeric cell {cell:?} for {condition}");
                            skipped += 1;
                            false
                        }
                    }
                }
            };

            if keep {
                matched.push(row.clone());
            }
        }
    }

    debug!(
        "filter {condition}: {} of {} rows matched ({skipped} non-numeric skipped)",
        matched.len(),
        rows.len()
    );
    Ok(rows.with_rows(matched))
}
