//! Writes reduced fractions back as expression trees.

use crate::{numerical::{fraction_node, integer_node}, symbolic::brackets::group};
use exo_parser::{Kind, Node, Parent};
use rug::Rational;
use super::poly::{Fraction, Monomial, Poly};

/// Renders `base^exponent` as a factor of a product.
fn factor(base: &Node, exponent: &Rational) -> Node {
    if *exponent == 1 {
        return group(base.clone(), Parent::new(Kind::Product, 1, 2));
    }

    let base = group(base.clone(), Parent::new(Kind::Power, 0, 2));
    let exponent = if *exponent.denom() == 1 && exponent.cmp0().is_gt() {
        integer_node(exponent.numer())
    } else {
        fraction_node(exponent).bracket()
    };
    base.pow(exponent)
}

/// Renders `magnitude*monomial` for a positive `magnitude`: `3*a*b`, `a^(-1)/2` or
/// `(3*a^(-1))/2`.
fn term(monomial: &Monomial, magnitude: &Rational) -> Node {
    let (numer, denom) = (magnitude.numer(), magnitude.denom());
    let mut factors = monomial.0.iter().map(|(base, exponent)| factor(&base.0, exponent));

    let numerator = match factors.next() {
        None => integer_node(numer),
        Some(first) => {
            let first = if *numer == 1 { first } else { integer_node(numer).mult(first) };
            factors.fold(first, Node::mult)
        },
    };

    if *denom == 1 {
        return numerator;
    }
    let numerator = if numerator.is(Kind::Product) { numerator.bracket() } else { numerator };
    numerator.frac(integer_node(denom))
}

/// Renders a polynomial: terms in monomial order, the first one carrying its sign as an
/// opposite and the others joined by `+` or `-`.
pub fn poly(poly: &Poly) -> Node {
    let mut terms = poly.0.iter();
    let Some((monomial, coefficient)) = terms.next() else {
        return Node::integer(0);
    };

    let first = term(monomial, &Rational::from(coefficient.abs_ref()));
    let first = if coefficient.cmp0().is_lt() { first.oppose() } else { first };

    terms.fold(first, |acc, (monomial, coefficient)| {
        let next = term(monomial, &Rational::from(coefficient.abs_ref()));
        if coefficient.cmp0().is_lt() {
            acc.sub(next)
        } else {
            acc.add(next)
        }
    })
}

/// Renders a fraction: its numerator alone, or `(numerator)/(denominator)`.
pub fn fraction(fraction: &Fraction) -> Node {
    let numerator = poly(&fraction.num);
    if fraction.den.is_one() {
        return numerator;
    }

    let numerator = if fraction.num.len() > 1 {
        numerator.bracket()
    } else {
        group(numerator, Parent::new(Kind::Quotient, 0, 2))
    };
    numerator.frac(poly(&fraction.den).bracket())
}
