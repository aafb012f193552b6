//! Conversions between [`Number`] literals, exact [`Rational`] values and expression nodes.

use crate::consts::MAX_DECIMAL_DIGITS;
use exo_parser::{Node, Number};
use rug::{ops::Pow, Integer, Rational};

/// The exact value of a number literal.
pub fn rational(number: &Number) -> Rational {
    let digits = format!("{}{}", number.integer_part(), number.fraction_part());
    // a normalized number only holds ASCII digits
    let numerator = Integer::from_str_radix(&digits, 10).unwrap_or_default();
    let scale = Integer::from(10).pow(number.fraction_part().len() as u32);
    Rational::from((numerator, scale))
}

/// The number literal of a non-negative integer.
pub fn integer_number(value: &Integer) -> Number {
    Number::from_parts(&value.to_string(), "").unwrap_or_else(|| Number::from(0))
}

/// Writes the magnitude of `value` as a decimal literal, if its denominator divides a power of
/// ten small enough. `1/4` is `0.25`; `1/3` has no decimal literal.
pub fn decimal_number(value: &Rational) -> Option<Number> {
    let magnitude = Rational::from(value.abs_ref());
    let mut scale = Integer::from(1);
    for digits in 0..=MAX_DECIMAL_DIGITS {
        if scale.is_divisible(magnitude.denom()) {
            let scaled = Integer::from(&scale / magnitude.denom()) * magnitude.numer();
            let text = scaled.to_string();
            let digits = digits as usize;
            let text = format!("{:0>width$}", text, width = digits + 1);
            let (integer, fraction) = text.split_at(text.len() - digits);
            return Number::from_parts(integer, fraction);
        }
        scale *= 10;
    }
    None
}

/// Wraps a node for a magnitude in an [`Opposite`](exo_parser::Expr::Opposite) if `negative`.
fn signed(node: Node, negative: bool) -> Node {
    if negative {
        node.oppose()
    } else {
        node
    }
}

/// The node of an integer value: a number, or the opposite of one.
pub fn integer_node(value: &Integer) -> Node {
    signed(Node::number(integer_number(&Integer::from(value.abs_ref()))), value.cmp0().is_lt())
}

/// The node of an exact value in fraction form: an integer, or a reduced quotient `p/q`, wrapped
/// in an opposite when negative.
pub fn fraction_node(value: &Rational) -> Node {
    let negative = value.cmp0().is_lt();
    let numer = Node::number(integer_number(&Integer::from(value.numer().abs_ref())));
    if *value.denom() == 1 {
        return signed(numer, negative);
    }
    let denom = Node::number(integer_number(value.denom()));
    signed(numer.frac(denom), negative)
}

/// The node of an exact value written as a decimal literal, falling back to [`fraction_node`]
/// for values with no finite decimal expansion.
pub fn decimal_node(value: &Rational) -> Node {
    match decimal_number(value) {
        Some(number) => signed(Node::number(number), value.cmp0().is_lt()),
        None => fraction_node(value),
    }
}

/// The node of `value` rounded half away from zero to `precision` fractional digits. Trailing
/// zeros are dropped, so `1/4` at five digits is `0.25`.
pub fn rounded_node(value: &Rational, precision: u32) -> Node {
    let scale = Rational::from(Integer::from(10).pow(precision));
    let scaled = Rational::from(value.abs_ref()) * scale;
    let (rounded, _) = scaled.round().into_numer_denom();
    let digits = precision as usize;
    let text = format!("{:0>width$}", rounded.to_string(), width = digits + 1);
    let (integer, fraction) = text.split_at(text.len() - digits);
    let number = Number::from_parts(integer, fraction).unwrap_or_else(|| Number::from(0));
    signed(Node::number(number), value.cmp0().is_lt() && rounded.cmp0().is_ne())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn number(text: &str) -> Number {
        text.parse().unwrap()
    }

    #[test]
    fn literal_values() {
        assert_eq!(rational(&number("0.25")), Rational::from((1, 4)));
        assert_eq!(rational(&number("12")), Rational::from(12));
        assert_eq!(rational(&number("1.5")), Rational::from((3, 2)));
    }

    #[test]
    fn decimal_literals() {
        assert_eq!(decimal_number(&Rational::from((1, 4))).unwrap().as_str(), "0.25");
        assert_eq!(decimal_number(&Rational::from((-7, 2))).unwrap().as_str(), "3.5");
        assert_eq!(decimal_number(&Rational::from((3, 1000))).unwrap().as_str(), "0.003");
        assert_eq!(decimal_number(&Rational::from(40)).unwrap().as_str(), "40");
        assert!(decimal_number(&Rational::from((1, 3))).is_none());
    }

    #[test]
    fn nodes() {
        assert_eq!(fraction_node(&Rational::from((-2, 6))).to_string(), "-1/3");
        assert_eq!(fraction_node(&Rational::from(7)).to_string(), "7");
        assert_eq!(decimal_node(&Rational::from((-1, 8))).to_string(), "-0.125");
        assert_eq!(decimal_node(&Rational::from((2, 3))).to_string(), "2/3");
        assert_eq!(integer_node(&Integer::from(-12)).to_string(), "-12");
    }

    #[test]
    fn rounded_nodes() {
        assert_eq!(rounded_node(&Rational::from((1, 3)), 2).to_string(), "0.33");
        assert_eq!(rounded_node(&Rational::from((-1, 8)), 2).to_string(), "-0.13");
        assert_eq!(rounded_node(&Rational::from((1, 4)), 5).to_string(), "0.25");
        assert_eq!(rounded_node(&Rational::from((7, 2)), 0).to_string(), "4");
        assert_eq!(rounded_node(&Rational::from((-1, 1000)), 2).to_string(), "0");
        assert_eq!(
            rounded_node(&Rational::from((1, 3)), 80).to_string(),
            format!("0.{}", "3".repeat(80)),
        );
    }
}
