//! The normal form of an expression, used to decide whether two answers are the same.
//!
//! The expression first goes through bracket elision, sign normalization and canonical ordering.
//! It is then reduced to a quotient of polynomials: sums of monomials with exact rational
//! coefficients and rational exponents ([`poly`]). Like terms and like factors combine, integer
//! powers of sums expand, and numeric sub-expressions evaluate. The reduced form is finally
//! rendered back into a tree.
//!
//! | Expression   | Normal form     |
//! | ------------ | --------------- |
//! | `1+2`        | `3`             |
//! | `0.5`        | `1/2`           |
//! | `a+a`        | `2*a`           |
//! | `(a+b)^2`    | `2*a*b+a^2+b^2` |
//! | `1/(2a)`     | `a^(-1)/2`      |
//! | `sqrt(16y)`  | `4*y^(1/2)`     |
//! | `(a+b)/(c+d)`| `(a+b)/(c+d)`   |
//!
//! Functions other than `sqrt` are opaque factors whose arguments are normalized, unless every
//! argument is numeric and the function has an exact value (`abs`, `floor`, `round`, `pgcd`,
//! `mod`). Relations normalize each side separately.

pub mod poly;
mod render;

use crate::{
    consts::{MAX_EXPANSION_DEGREE, MAX_EXPONENT},
    numerical::{error::DivisionByZero, rational, value},
};
use exo_error::Error;
use exo_parser::{Expr, Kind, Node, Parent};
use poly::{term_power, Fraction};
use rug::Rational;
use super::{brackets::{elide, group}, order::canonicalize, signs::normalize_signs};

/// Computes the normal form of an expression. The unit of the root is kept.
pub fn normal(node: &Node) -> Result<Node, Error> {
    let prepared = canonicalize(&normalize_signs(&elide(node)));
    let result = match &prepared.expr {
        Expr::Equality(..) | Expr::Unequality(..) | Expr::Inequality(..) => {
            prepared.try_map_children(|side, _| normal(side))?
        },
        Expr::Boolean(_) => prepared,
        _ => render::fraction(&reduce(&prepared)?),
    };
    Ok(result.with_unit_of(node))
}

/// Returns true if both expressions have the same normal form.
pub fn equivalent(a: &Node, b: &Node) -> Result<bool, Error> {
    Ok(normal(a)? == normal(b)?)
}

/// Reduces an expression to a quotient of polynomials. Units below the root are ignored.
fn reduce(node: &Node) -> Result<Fraction, Error> {
    match &node.expr {
        Expr::Number(number) => Ok(Fraction::constant(rational(number))),
        Expr::Bracket(inner) | Expr::Positive(inner) => reduce(inner),
        Expr::Opposite(inner) => Ok(reduce(inner)?.neg()),
        Expr::Percentage(inner) => reduce(inner)?.mul(&Fraction::constant(Rational::from((1, 100)))),
        Expr::Sum(lhs, rhs) => reduce(lhs)?.add(&reduce(rhs)?),
        Expr::Difference(lhs, rhs) => reduce(lhs)?.add(&reduce(rhs)?.neg()),
        Expr::Product(lhs, rhs) => reduce(lhs)?.mul(&reduce(rhs)?),
        Expr::Quotient(lhs, rhs) | Expr::Division(lhs, rhs) => reduce(lhs)?.div(&reduce(rhs)?),
        Expr::Power(lhs, rhs) => power(reduce(lhs)?, reduce(rhs)?),
        Expr::Function(name, args) => match (name.as_str(), args.as_slice()) {
            ("sqrt", [arg]) => power(reduce(arg)?, Fraction::constant(Rational::from((1, 2)))),
            _ => function(name, args),
        },
        Expr::Equality(..) | Expr::Unequality(..) | Expr::Inequality(..) => {
            Ok(Fraction::base(normal(node)?.with_unit(None).bracket()))
        },
        Expr::Symbol(_)
        | Expr::SegmentLength(_)
        | Expr::Hole
        | Expr::Error(_)
        | Expr::Boolean(_)
        | Expr::Template(_) => Ok(Fraction::base(node.clone().with_unit(None))),
    }
}

/// A function call with normalized arguments, evaluated if it has an exact value.
fn function(name: &str, args: &[Node]) -> Result<Fraction, Error> {
    let args = args.iter()
        .map(|arg| Ok(normal(arg)?.with_unit(None)))
        .collect::<Result<Vec<_>, Error>>()?;
    let call = Node::function(name, args);
    match value(&call) {
        Ok(value) => Ok(Fraction::constant(value)),
        Err(err) if err.is::<DivisionByZero>() => Err(err),
        Err(_) => Ok(Fraction::base(call)),
    }
}

/// `base^exponent`, kept as an opaque factor.
fn opaque_power(base: &Fraction, exponent: &Fraction) -> Fraction {
    let base = group(render::fraction(base), Parent::new(Kind::Power, 0, 2));
    let exponent = group(render::fraction(exponent), Parent::new(Kind::Power, 1, 2));
    Fraction::base(base.pow(exponent))
}

fn power(base: Fraction, exponent: Fraction) -> Result<Fraction, Error> {
    let Some(constant) = exponent.as_constant() else {
        return Ok(opaque_power(&base, &exponent));
    };

    let (Some(numer), Some(denom)) = (constant.numer().to_i32(), constant.denom().to_u32()) else {
        return Ok(opaque_power(&base, &exponent));
    };
    if numer.unsigned_abs() > MAX_EXPONENT || denom > MAX_EXPONENT {
        return Ok(opaque_power(&base, &exponent));
    }

    if numer == 0 {
        return Ok(Fraction::constant(Rational::from(1)));
    }
    if numer < 0 {
        return power(base.inv()?, Fraction::constant(-constant));
    }
    if base.num.is_zero() {
        return Ok(base);
    }

    if let Some((coefficient, monomial)) = base.as_term() {
        if let Some(result) = term_power(coefficient, monomial, &constant) {
            return Ok(result);
        }
    } else if denom == 1 && numer.unsigned_abs() <= MAX_EXPANSION_DEGREE {
        return base.expand(numer.unsigned_abs());
    }

    Ok(Fraction::factor(render::fraction(&base), constant))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use exo_parser::parse;

    fn normal_text(text: &str) -> String {
        normal(&parse(text).unwrap()).unwrap().to_string()
    }

    fn check(cases: &[(&str, &str)]) {
        for (text, expected) in cases {
            assert_eq!(normal_text(text), *expected, "normal form of {}", text);
        }
    }

    #[test]
    fn numbers() {
        check(&[
            ("0", "0"), ("(1)", "1"), ("-1", "-1"), ("+1", "1"), ("1+2", "3"), ("5-2", "3"),
            ("-5-2", "-7"), ("0*5", "0"), ("-4*5", "-20"), ("(-4)*5", "-20"), ("4*(-5)", "-20"),
            ("(-4)*(-5)", "20"), ("2*3+4", "10"), ("3/3", "1"), ("-1/3", "-1/3"),
            ("1/(-3)", "-1/3"), ("(-1)/(-3)", "1/3"), ("2/4", "1/2"), ("0.5", "1/2"),
            ("0.5/2", "1/4"), ("1/3+1/3", "2/3"), ("2/3*5/7", "10/21"), ("2/3:(5/7)", "14/15"),
            ("23%", "23/100"),
        ]);
    }

    #[test]
    fn sums_and_products() {
        check(&[
            ("a", "a"), ("-a", "-a"), ("1a", "a"), ("-1a", "-a"), ("0a", "0"), ("2a", "2*a"),
            ("a+a", "2*a"), ("a+b", "a+b"), ("2a+3b", "2*a+3*b"), ("a-b", "a-b"),
            ("a-2b", "a-2*b"), ("ab", "a*b"), ("-ab", "-a*b"), ("(-a)*b", "-a*b"),
            ("a*(-b)", "-a*b"), ("(-a)*(-b)", "a*b"), ("a*a", "a^2"),
        ]);
    }

    #[test]
    fn negative_exponents() {
        check(&[
            ("a^(-1)", "a^(-1)"), ("(ab)^(-1)", "a^(-1)*b^(-1)"), ("1/a", "a^(-1)"),
            ("1/(2a)", "a^(-1)/2"), ("3/(2a)", "(3*a^(-1))/2"), ("b/(2a)", "(a^(-1)*b)/2"),
            ("(3b)/(2a)", "(3*a^(-1)*b)/2"), ("(3bc)/(2ad)", "(3*a^(-1)*b*c*d^(-1))/2"),
            ("1/(ab)", "a^(-1)*b^(-1)"),
        ]);
    }

    #[test]
    fn powers() {
        check(&[
            ("a^2*a^3", "a^5"), ("a^5*a^(-3)", "a^2"), ("a^(2)*a^(-2)", "1"),
            ("a^(-1)*a^(-1)", "a^(-2)"), ("a^5:a^(-3)", "a^8"), ("a^(-1):a^(-1)", "1"),
            ("a^(-2):a^(-3)", "a"), ("a^(-3)/a^(-2)", "a^(-1)"), ("(-a)^2", "a^2"),
            ("(-a)^3", "-a^3"), ("(ab)^3", "a^3*b^3"), ("(ab)^(-3)", "a^(-3)*b^(-3)"),
            ("b^2^3", "b^6"), ("b^2^(-3)", "b^(-6)"), ("b^(-2)^3", "b^(-6)"),
            ("(1/b)^3", "b^(-3)"), ("(a/b)^3", "a^3*b^(-3)"), ("(a:b)^3", "a^3*b^(-3)"),
            ("(a/b)^(-3)", "a^(-3)*b^3"), ("(a:b)^(-3)", "a^(-3)*b^3"),
        ]);
    }

    #[test]
    fn expansions() {
        check(&[
            ("(a+b)^2", "2*a*b+a^2+b^2"),
            ("(a-b)^2", "-2*a*b+a^2+b^2"),
            (
                "(a+b-c)^3",
                "-6*a*b*c+3*a*b^2+3*a*c^2+3*a^2*b-3*a^2*c+a^3+3*b*c^2-3*b^2*c+b^3-c^3",
            ),
            ("(a+b)/(c+d)", "(a+b)/(c+d)"),
            ("(a+b)^2/(c+d)^2", "(2*a*b+a^2+b^2)/(2*c*d+c^2+d^2)"),
            ("(a+b)/(a+b)", "1"),
        ]);
    }

    #[test]
    fn functions() {
        check(&[
            ("sqrt(x)", "x^(1/2)"), ("x^(-1/2)", "x^(-1/2)"), ("sqrt(xy)", "x^(1/2)*y^(1/2)"),
            ("sqrt(16y)", "4*y^(1/2)"), ("sqrt(x^2)", "x"), ("sqrt(x)^2", "x"),
            ("sqrt(x)^3", "x^(3/2)"), ("cos(1+2)", "cos(3)"), ("cos(cos(1+2))", "cos(cos(3))"),
            ("ln(ln (1+2))", "ln(ln(3))"), ("sin(1)+cos(2)", "cos(2)+sin(1)"),
            ("cos(2)+cos(2)", "2*cos(2)"), ("cos(2)*cos(2)", "cos(2)^2"),
            ("pgcd(12;18)", "6"), ("sqrt(2)*sqrt(2)", "2"), ("sqrt(8)", "8^(1/2)"),
        ]);
    }

    #[test]
    fn relations_and_units() {
        check(&[("a+a=2", "2*a=2"), ("x+1<3", "1+x<3"), ("3 km", "3 km")]);
    }

    #[test]
    fn division_by_zero() {
        assert!(normal(&parse("1/(a-a)").unwrap()).unwrap_err().is::<DivisionByZero>());
        assert!(normal(&parse("mod(3;0)").unwrap()).is_err());
    }

    #[test]
    fn equivalence() {
        let eq = |a: &str, b: &str| equivalent(&parse(a).unwrap(), &parse(b).unwrap()).unwrap();
        assert!(eq("(a+b)^2", "a^2+2ab+b^2"));
        assert!(eq("2/4", "0.5"));
        assert!(eq("x/2", "0.5x"));
        assert!(!eq("a+b", "a-b"));
    }

    #[test]
    fn idempotent() {
        for text in ["(a+b-c)^3", "(3bc)/(2ad)", "(a+b)^2/(c+d)^2", "sqrt(x)^3", "-1/3", "cos(2)^2"] {
            let once = normal(&parse(text).unwrap()).unwrap();
            assert_eq!(normal(&once).unwrap(), once, "{}", text);
        }
    }
}
