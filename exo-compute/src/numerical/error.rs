//! The kinds of errors raised while evaluating an expression.

use ariadne::Fmt;
use exo_attrs::ErrorKind;
use exo_error::EXPR;

/// The expression has no numeric value, because it contains a symbol, a hole, a template or a
/// relation.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` has no numeric value", expr),
    labels = ["this expression"],
    help = format!("substitute every {} before evaluating", "symbol".fg(EXPR)),
)]
pub struct NonNumeric {
    /// The canonical text of the offending sub-expression.
    pub expr: String,
}

/// A division by zero, or an undefined power such as `0^(-1)`.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "division by zero",
    labels = ["this divisor is zero"],
)]
pub struct DivisionByZero;

/// Decimal mode was asked for more fractional digits than it writes.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("cannot round to {} decimal places", precision),
    labels = ["this value"],
    help = format!("the precision is at most {}", max),
)]
pub struct PrecisionTooLarge {
    /// The requested number of fractional digits.
    pub precision: u32,

    /// The largest precision accepted.
    pub max: u32,
}
