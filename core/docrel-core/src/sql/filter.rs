//! Filter Expression Splitter — `key<op>value` into its three parts.
//!
//! This is the building block a query layer consumes; it does not evaluate
//! anything. Operators are tried in a fixed order so the two-character forms
//! win over their one-character prefixes.
//!
//! Known limitation: the first operator *contained anywhere* in the
//! expression wins, so `a>b=c` splits on `=` (key `a>b`), and a value that
//! repeats the matched operator makes the expression invalid.

use crate::error::{DocRelError, DocRelResult};
use std::fmt;

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    NotEqual,
    GreaterOrEqual,
    LessOrEqual,
    Equal,
    Greater,
    Less,
}

impl Operator {
    /// Match order; do not reorder.
    pub const PRECEDENCE: [Operator; 6] = [
        Operator::NotEqual,
        Operator::GreaterOrEqual,
        Operator::LessOrEqual,
        Operator::Equal,
        Operator::Greater,
        Operator::Less,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::NotEqual => "!=",
            Operator::GreaterOrEqual => ">=",
            Operator::LessOrEqual => "<=",
            Operator::Equal => "=",
            Operator::Greater => ">",
            Operator::Less => "<",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A split comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub key: String,
    pub operator: Operator,
    pub value: String,
}

/// Split `expression` into key, operator and value.
///
/// ```rust
/// use docrel_core::sql::filter::{split, Operator};
///
/// let filter = split("age>=18").unwrap();
/// assert_eq!(filter.key, "age");
/// assert_eq!(filter.operator, Operator::GreaterOrEqual);
/// assert_eq!(filter.value, "18");
/// ```
pub fn split(expression: &str) -> DocRelResult<Filter> {
    let operator = Operator::PRECEDENCE
        .into_iter()
        .find(|op| expression.contains(op.as_str()))
        .ok_or_else(|| DocRelError::InvalidOperator(expression.to_string()))?;

    let parts: Vec<&str> = expression.split(operator.as_str()).collect();
    match parts.as_slice() {
        [key, value] if !key.is_empty() && !value.is_empty() => Ok(Filter {
            key: (*key).to_string(),
            operator,
            value: (*value).to_string(),
        }),
        _ => Err(DocRelError::InvalidExpression(expression.to_string())),
    }
}
