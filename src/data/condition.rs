use std::fmt;

use crate::error::QueryError;

// ---------------------------------------------------------------------------
// Operator – comparison token recognised in a condition
// ---------------------------------------------------------------------------

/// Comparison operators accepted by [`parse_condition`].
///
/// Only `=`, `>` and `<` are evaluated by the row filter; `>=` and `<=`
/// parse but are rejected when the filter is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    GreaterOrEqual,
    LessOrEqual,
    Equal,
    GreaterThan,
    LessThan,
}

impl Operator {
    /// Scan order. Two-character tokens precede their one-character prefixes.
    pub const SCAN_ORDER: [Operator; 5] = [
        Operator::GreaterOrEqual,
        Operator::LessOrEqual,
        Operator::Equal,
        Operator::GreaterThan,
        Operator::LessThan,
    ];

    pub fn token(self) -> &'static str {
        match self {
            Operator::GreaterOrEqual => ">=",
            Operator::LessOrEqual => "<=",
            Operator::Equal => "=",
            Operator::GreaterThan => ">",
            Operator::LessThan => "<",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

// ---------------------------------------------------------------------------
// Condition – parsed (column, operator, literal) triple
// ---------------------------------------------------------------------------

/// A single comparison predicate. Both sides are kept verbatim, whitespace
/// included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub column: String,
    pub operator: Operator,
    pub literal: String,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.column, self.operator, self.literal)
    }
}

/// Parse a raw predicate such as `price>500` or `name=Widget`.
///
/// Operators are tried in [`Operator::SCAN_ORDER`]. The first one that occurs
/// in the text *and* splits it into exactly two parts wins; an operator that
/// occurs more than once is skipped in favour of the next candidate.
pub fn parse_condition(raw: &str) -> Result<Condition, QueryError> {
    for operator in Operator::SCAN_ORDER {
        let token = operator.token();
        if !raw.contains(token) {
            continue;
        }
        let parts: Vec<&str> = raw.split(token).collect();
        if let [column, literal] = parts.as_slice() {
            return Ok(Condition {
                column: (*column).to_string(),
                operator,
                literal: (*literal).to_string(),
            });
        }
    }
    Err(QueryError::InvalidCondition(raw.to_string()))
}
