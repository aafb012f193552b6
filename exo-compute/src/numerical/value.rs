//! Exact evaluation of numeric trees.

use crate::consts::{DEFAULT_PRECISION, MAX_EXPONENT, MAX_PRECISION};
use exo_error::Error;
use exo_parser::{Expr, Node};
use rug::{ops::Pow, Integer, Rational};
use super::{
    convert::{fraction_node, rational, rounded_node},
    error::{DivisionByZero, NonNumeric, PrecisionTooLarge},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How [`eval`] writes the value it computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EvalOptions {
    /// Write the value as a decimal instead of a fraction.
    pub decimal: bool,

    /// The number of fractional digits kept in decimal mode.
    pub precision: u32,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self { decimal: false, precision: DEFAULT_PRECISION }
    }
}

impl EvalOptions {
    /// Options for decimal mode at the given precision.
    pub fn decimal(precision: u32) -> Self {
        Self { decimal: true, precision }
    }
}

fn non_numeric(node: &Node) -> Error {
    Error::unspanned(NonNumeric { expr: node.to_string() })
}

/// Returns the value of an expression as an integer, if it has one.
pub fn integer_value(node: &Node) -> Result<Option<Integer>, Error> {
    let value = value(node)?;
    if *value.denom() == 1 {
        Ok(Some(value.into_numer_denom().0))
    } else {
        Ok(None)
    }
}

/// Computes the exact value of a numeric expression. Units are ignored.
///
/// Symbols, holes, templates, relations and booleans have no value, and neither do powers whose
/// result is irrational, such as `2^(1/2)`.
pub fn value(node: &Node) -> Result<Rational, Error> {
    match &node.expr {
        Expr::Number(number) => Ok(rational(number)),
        Expr::Bracket(inner) | Expr::Positive(inner) => value(inner),
        Expr::Opposite(inner) => Ok(-value(inner)?),
        Expr::Percentage(inner) => Ok(value(inner)? / Rational::from(100)),
        Expr::Sum(lhs, rhs) => Ok(value(lhs)? + value(rhs)?),
        Expr::Difference(lhs, rhs) => Ok(value(lhs)? - value(rhs)?),
        Expr::Product(lhs, rhs) => Ok(value(lhs)? * value(rhs)?),
        Expr::Quotient(lhs, rhs) | Expr::Division(lhs, rhs) => {
            let divisor = value(rhs)?;
            if divisor.cmp0().is_eq() {
                return Err(Error::unspanned(DivisionByZero));
            }
            Ok(value(lhs)? / divisor)
        },
        Expr::Power(lhs, rhs) => power(value(lhs)?, &value(rhs)?).ok_or_else(|| non_numeric(node))?,
        Expr::Function(name, args) => function(node, name, args),
        Expr::Symbol(_)
        | Expr::SegmentLength(_)
        | Expr::Hole
        | Expr::Error(_)
        | Expr::Boolean(_)
        | Expr::Equality(..)
        | Expr::Unequality(..)
        | Expr::Inequality(..)
        | Expr::Template(_) => Err(non_numeric(node)),
    }
}

/// Raises `base` to a rational exponent. The outer [`None`] means the result is not rational;
/// the inner error is a division by zero.
fn power(base: Rational, exponent: &Rational) -> Option<Result<Rational, Error>> {
    let (numer, denom) = (exponent.numer().to_i32()?, exponent.denom().to_u32()?);
    if numer.unsigned_abs() > MAX_EXPONENT || denom > MAX_EXPONENT {
        return None;
    }
    if base.cmp0().is_eq() && numer < 0 {
        return Some(Err(Error::unspanned(DivisionByZero)));
    }

    let base = if denom == 1 { base } else { root(&base, denom)? };
    Some(Ok(base.pow(numer)))
}

/// The exact `n`th root of a value, if it is rational. Odd roots of negative values are negative.
pub fn root(value: &Rational, n: u32) -> Option<Rational> {
    let negative = value.cmp0().is_lt();
    if negative && n % 2 == 0 {
        return None;
    }

    let exact = |x: &Integer| {
        let root = Integer::from(x.root_ref(n));
        (root.clone().pow(n) == *x).then_some(root)
    };
    let magnitude = Rational::from(value.abs_ref());
    let root = Rational::from((exact(magnitude.numer())?, exact(magnitude.denom())?));
    Some(if negative { -root } else { root })
}

/// Evaluates the integer arguments of `pgcd` and `mod`.
fn integer_args(node: &Node, args: &[Node]) -> Result<Vec<Integer>, Error> {
    args.iter()
        .map(|arg| integer_value(arg)?.ok_or_else(|| non_numeric(node)))
        .collect()
}

fn function(node: &Node, name: &str, args: &[Node]) -> Result<Rational, Error> {
    match (name, args) {
        ("sqrt", [arg]) => {
            let value = value(arg)?;
            if value.cmp0().is_lt() {
                return Err(non_numeric(node));
            }
            root(&value, 2).ok_or_else(|| non_numeric(node))
        },
        ("abs", [arg]) => Ok(value(arg)?.abs()),
        ("floor", [arg]) => Ok(value(arg)?.floor()),
        ("round", [arg]) => Ok(value(arg)?.round()),
        ("pgcd", [_, _, ..]) => {
            let gcd = integer_args(node, args)?
                .into_iter()
                .fold(Integer::new(), |acc, n| acc.gcd(&n));
            Ok(Rational::from(gcd))
        },
        ("mod", [_, _]) => {
            let [a, b]: [Integer; 2] = integer_args(node, args)?
                .try_into()
                .map_err(|_| non_numeric(node))?;
            if b.cmp0().is_eq() {
                return Err(Error::unspanned(DivisionByZero));
            }
            let mut rem = a % &b;
            if rem.cmp0().is_lt() {
                rem += b.abs();
            }
            Ok(Rational::from(rem))
        },
        _ => Err(non_numeric(node)),
    }
}

/// Reduces a numeric expression to a single number node, copying its unit.
///
/// In fraction mode the result is an integer or a reduced `p/q` quotient. In decimal mode it is
/// rounded half away from zero to `options.precision` fractional digits, which may not exceed
/// [`MAX_PRECISION`].
pub fn eval(node: &Node, options: EvalOptions) -> Result<Node, Error> {
    if options.decimal && options.precision > MAX_PRECISION {
        return Err(Error::unspanned(PrecisionTooLarge {
            precision: options.precision,
            max: MAX_PRECISION,
        }));
    }

    let value = value(node)?;
    let result = if options.decimal {
        rounded_node(&value, options.precision)
    } else {
        fraction_node(&value)
    };
    Ok(result.with_unit(node.unit.clone()))
}
