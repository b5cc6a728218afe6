use std::fmt;
use std::str::FromStr;

use log::debug;

use super::model::RowSet;
use crate::error::QueryError;

// ---------------------------------------------------------------------------
// Aggregate spec – `column=operation`
// ---------------------------------------------------------------------------

/// Reductions over a numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateOp {
    /// Arithmetic mean, rounded to two decimals
    Avg,
    /// Minimum value
    Min,
    /// Maximum value
    Max,
}

impl FromStr for AggregateOp {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "avg" => Ok(AggregateOp::Avg),
            "min" => Ok(AggregateOp::Min),
            "max" => Ok(AggregateOp::Max),
            other => Err(QueryError::UnknownOperation(other.to_string())),
        }
    }
}

impl fmt::Display for AggregateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AggregateOp::Avg => "avg",
            AggregateOp::Min => "min",
            AggregateOp::Max => "max",
        })
    }
}

/// A parsed aggregate request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateSpec {
    pub column: String,
    pub op: AggregateOp,
}

impl FromStr for AggregateSpec {
    type Err = QueryError;

    /// Split on the first `=`; the column part is kept verbatim.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (column, op) = raw
            .split_once('=')
            .ok_or_else(|| QueryError::InvalidAggregate(raw.to_string()))?;
        Ok(AggregateSpec {
            column: column.to_string(),
            op: op.parse()?,
        })
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// A computed aggregate. `Avg` values are already rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateResult {
    pub op: AggregateOp,
    pub value: f64,
}

impl fmt::Display for AggregateResult {
    /// `avg` always shows two decimals; `min`/`max` keep full precision.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.op {
            AggregateOp::Avg => write!(f, "{:.2}", self.value),
            AggregateOp::Min | AggregateOp::Max => write!(f, "{:?}", self.value),
        }
    }
}

/// What an aggregate request produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AggregateOutcome {
    /// No spec was given.
    NotRequested,
    /// The column had no cell that parses as a number.
    NoNumericData,
    Computed(AggregateResult),
}

/// Evaluate a raw `column=operation` spec against `rows`.
///
/// An absent or empty spec yields [`AggregateOutcome::NotRequested`].
pub fn calculate_aggregate(
    rows: &RowSet,
    spec: Option<&str>,
) -> Result<AggregateOutcome, QueryError> {
    match spec {
        None | Some("") => Ok(AggregateOutcome::NotRequested),
        Some(raw) => aggregate_rows(rows, &raw.parse()?),
    }
}

/// Reduce the numeric cells of `spec.column`. Cells that are not numbers are
/// dropped silently; a column absent from the header is an error once any
/// row is inspected.
pub fn aggregate_rows(rows: &RowSet, spec: &AggregateSpec) -> Result<AggregateOutcome, QueryError> {
    let values = numeric_values(rows, &spec.column)?;
    debug!(
        "aggregate {}={}: {} numeric of {} rows",
        spec.column,
        spec.op,
        values.len(),
        rows.len()
    );

    if values.is_empty() {
        return Ok(AggregateOutcome::NoNumericData);
    }

    let value = match spec.op {
        AggregateOp::Avg => {
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            round_to_cents(mean)
        }
        AggregateOp::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
        AggregateOp::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    };

    Ok(AggregateOutcome::Computed(AggregateResult { op: spec.op, value }))
}

/// Round to two decimals. Values too large to scale by 100 have no fractional
/// part left to round and are returned unchanged.
fn round_to_cents(value: f64) -> f64 {
    let scaled = value * 100.0;
    if scaled.is_finite() {
        scaled.round() / 100.0
    } else {
        value
    }
}

fn numeric_values(rows: &RowSet, column: &str) -> Result<Vec<f64>, QueryError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let index = rows
        .column_index(column)
        .ok_or_else(|| QueryError::MissingColumn(column.to_string()))?;

    Ok(rows
        .iter()
        .filter_map(|row| row.get(index))
        .filter_map(|cell| cell.parse::<f64>().ok())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prices() -> RowSet {
        RowSet::from_rows(
            &["item", "price"],
            vec![vec!["a", "100"], vec!["b", "250"], vec!["c", "abc"]],
        )
        .unwrap()
    }

    fn computed(rows: &RowSet, spec: &str) -> AggregateResult {
        match calculate_aggregate(rows, Some(spec)).unwrap() {
            AggregateOutcome::Computed(result) => result,
            other => panic!("expected a computed result, got {other:?}"),
        }
    }

    #[test]
    fn avg_skips_non_numeric_and_rounds() {
        let result = computed(&prices(), "price=avg");
        assert_eq!(result.value, 175.0);
        assert_eq!(result.to_string(), "175.00");
    }

    #[test]
    fn avg_is_rounded_to_two_decimals() {
        let rows = RowSet::from_rows(&["x"], vec![vec!["1"], vec!["1"], vec!["2"]]).unwrap();
        let result = computed(&rows, "x=avg");
        assert_eq!(result.value, 1.33);
        assert_eq!(result.to_string(), "1.33");
    }

    #[test]
    fn avg_of_huge_values_stays_finite() {
        let rows = RowSet::from_rows(&["x"], vec![vec!["1e307"]]).unwrap();
        let avg = computed(&rows, "x=avg");
        assert_eq!(avg.value, 1e307);
        assert!(!avg.to_string().contains("inf"));
        assert_eq!(computed(&rows, "x=max").value, 1e307);

        let negative = RowSet::from_rows(&["x"], vec![vec!["-1e307"]]).unwrap();
        assert_eq!(computed(&negative, "x=avg").value, -1e307);
    }

    #[test]
    fn min_and_max_keep_full_precision() {
        let rows = RowSet::from_rows(&["x"], vec![vec!["1.23456"], vec!["9.87654"]]).unwrap();
        assert_eq!(computed(&rows, "x=min").to_string(), "1.23456");
        assert_eq!(computed(&rows, "x=max").to_string(), "9.87654");
        assert_eq!(computed(&prices(), "price=max").to_string(), "250.0");
        assert_eq!(computed(&prices(), "price=min").value, 100.0);
    }

    #[test]
    fn empty_spec_is_not_requested() {
        assert_eq!(calculate_aggregate(&prices(), None).unwrap(), AggregateOutcome::NotRequested);
        assert_eq!(
            calculate_aggregate(&prices(), Some("")).unwrap(),
            AggregateOutcome::NotRequested
        );
    }

    #[test]
    fn all_non_numeric_column_has_no_numeric_data() {
        assert_eq!(
            calculate_aggregate(&prices(), Some("item=avg")).unwrap(),
            AggregateOutcome::NoNumericData
        );
    }

    #[test]
    fn unknown_operation_is_rejected() {
        assert_eq!(
            calculate_aggregate(&prices(), Some("price=sum")),
            Err(QueryError::UnknownOperation("sum".into()))
        );
    }

    #[test]
    fn spec_without_separator_is_invalid() {
        assert_eq!(
            calculate_aggregate(&prices(), Some("price")),
            Err(QueryError::InvalidAggregate("price".into()))
        );
    }

    #[test]
    fn missing_column_is_reported() {
        assert_eq!(
            calculate_aggregate(&prices(), Some("cost=max")),
            Err(QueryError::MissingColumn("cost".into()))
        );
    }
}
