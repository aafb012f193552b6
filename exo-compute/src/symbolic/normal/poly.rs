//! Sums of monomials with exact rational coefficients, and quotients of them.

use crate::numerical::{compare, error::DivisionByZero, integer_node, rational, root};
use exo_error::Error;
use exo_parser::{Expr, Node};
use rug::{ops::Pow, Integer, Rational};
use std::{
    cmp::Ordering,
    collections::{btree_map::Entry, BTreeMap},
};

/// A factor that arithmetic cannot look into, such as a symbol, a function call, or a positive
/// integer raised to a fractional exponent. Bases are ordered by [`compare`].
#[derive(Debug, Clone)]
pub struct Base(pub Node);

impl PartialEq for Base {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for Base {}

impl PartialOrd for Base {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Base {
    fn cmp(&self, other: &Self) -> Ordering {
        compare(&self.0, &other.0)
    }
}

impl Base {
    /// The value of a numeric base.
    fn number(&self) -> Option<Rational> {
        match &self.0.expr {
            Expr::Number(number) => Some(rational(number)),
            _ => None,
        }
    }
}

/// A product of bases, each raised to a non-zero rational exponent. The empty monomial is `1`.
///
/// Monomials are ordered by their lists of `(base, exponent)` pairs, so `a*b` sorts before
/// `a*b^2`, which sorts before `a^2`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Monomial(pub BTreeMap<Base, Rational>);

impl Monomial {
    /// The monomial `base^exponent`.
    pub fn factor(base: Node, exponent: Rational) -> Self {
        Self(BTreeMap::from([(Base(base), exponent)]))
    }

    /// Multiplies two monomials. Numeric bases may settle into a rational factor, which is
    /// returned alongside the product.
    pub fn mul(&self, other: &Monomial) -> (Rational, Monomial) {
        let mut factors = self.0.clone();
        for (base, exponent) in &other.0 {
            *factors.entry(base.clone()).or_insert_with(Rational::new) += exponent;
        }
        settle(factors)
    }

    /// Raises every base to `exponent` times its own exponent.
    pub fn pow(&self, exponent: &Rational) -> (Rational, Monomial) {
        settle(
            self.0.iter()
                .map(|(base, own)| (base.clone(), Rational::from(own * exponent)))
                .collect(),
        )
    }
}

/// Drops zero exponents and moves what can be computed exactly out of numeric bases: integer
/// powers, exact roots, and the whole part of fractional exponents (`2^(3/2)` is `2*2^(1/2)`).
fn settle(factors: BTreeMap<Base, Rational>) -> (Rational, Monomial) {
    let mut coefficient = Rational::from(1);
    let mut settled = BTreeMap::new();

    for (base, mut exponent) in factors {
        if let Some(value) = base.number() {
            let (numer, denom) = (exponent.numer().to_i32(), exponent.denom().to_u32());
            if let (Some(numer), Some(denom)) = (numer, denom) {
                if let Some(root) = root(&value, denom) {
                    coefficient *= root.pow(numer);
                    continue;
                }
            }

            let whole = exponent.clone().floor();
            if let Some(whole_i32) = whole.numer().to_i32() {
                coefficient *= value.pow(whole_i32);
                exponent -= whole;
            }
        }

        if exponent.cmp0().is_ne() {
            settled.insert(base, exponent);
        }
    }

    (coefficient, Monomial(settled))
}

/// A sum of monomials with non-zero rational coefficients, in monomial order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Poly(pub BTreeMap<Monomial, Rational>);

impl Poly {
    /// The constant polynomial `value`.
    pub fn constant(value: Rational) -> Self {
        Self::term(value, Monomial::default())
    }

    /// The polynomial `1`.
    pub fn one() -> Self {
        Self::constant(Rational::from(1))
    }

    /// The single-term polynomial `coefficient*monomial`.
    pub fn term(coefficient: Rational, monomial: Monomial) -> Self {
        let mut poly = Self::default();
        poly.insert(monomial, coefficient);
        poly
    }

    /// Adds `coefficient*monomial` to this polynomial.
    fn insert(&mut self, monomial: Monomial, coefficient: Rational) {
        match self.0.entry(monomial) {
            Entry::Vacant(entry) => {
                if coefficient.cmp0().is_ne() {
                    entry.insert(coefficient);
                }
            },
            Entry::Occupied(mut entry) => {
                *entry.get_mut() += coefficient;
                if entry.get().cmp0().is_eq() {
                    entry.remove();
                }
            },
        }
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_one(&self) -> bool {
        *self == Self::one()
    }

    /// The number of terms.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The value of a constant polynomial.
    pub fn as_constant(&self) -> Option<Rational> {
        match self.single_term() {
            Some((monomial, coefficient)) if monomial.0.is_empty() => Some(coefficient.clone()),
            None if self.is_zero() => Some(Rational::new()),
            _ => None,
        }
    }

    /// The only term of a single-term polynomial.
    pub fn single_term(&self) -> Option<(&Monomial, &Rational)> {
        let mut terms = self.0.iter();
        match (terms.next(), terms.next()) {
            (Some(term), None) => Some(term),
            _ => None,
        }
    }

    pub fn add(&self, other: &Poly) -> Poly {
        let mut sum = self.clone();
        for (monomial, coefficient) in &other.0 {
            sum.insert(monomial.clone(), coefficient.clone());
        }
        sum
    }

    pub fn neg(&self) -> Poly {
        self.scale(&Rational::from(-1))
    }

    pub fn scale(&self, factor: &Rational) -> Poly {
        let mut scaled = Poly::default();
        for (monomial, coefficient) in &self.0 {
            scaled.insert(monomial.clone(), Rational::from(coefficient * factor));
        }
        scaled
    }

    pub fn mul(&self, other: &Poly) -> Poly {
        let mut product = Poly::default();
        for (a, a_coefficient) in &self.0 {
            for (b, b_coefficient) in &other.0 {
                let (factor, monomial) = a.mul(b);
                product.insert(monomial, factor * a_coefficient * b_coefficient);
            }
        }
        product
    }

    /// Expands this polynomial to a non-negative integer power.
    pub fn pow(&self, exponent: u32) -> Poly {
        (0..exponent).fold(Poly::one(), |acc, _| acc.mul(self))
    }

    /// The gcd of the numerators of the coefficients over the lcm of their denominators, with
    /// the sign of the first coefficient. Dividing by it leaves primitive integer coefficients.
    fn content(&self) -> Rational {
        let (numer, denom) = self.0.values().fold(
            (Integer::new(), Integer::from(1)),
            |(numer, denom), coefficient| (numer.gcd(coefficient.numer()), denom.lcm(coefficient.denom())),
        );
        let content = Rational::from((numer, denom));
        match self.0.values().next() {
            Some(first) if first.cmp0().is_lt() => -content,
            _ => content,
        }
    }
}

/// A quotient of polynomials.
///
/// The denominator is either `1` or has several terms: a single-term denominator is always
/// folded into the numerator as negative exponents. A several-term denominator is scaled to
/// primitive integer coefficients with a positive first term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fraction {
    pub num: Poly,
    pub den: Poly,
}

impl Fraction {
    /// Builds the fraction `num/den` in reduced form.
    pub fn new(num: Poly, den: Poly) -> Result<Self, Error> {
        if den.is_zero() {
            return Err(Error::unspanned(DivisionByZero));
        }
        if num.is_zero() {
            return Ok(Self::constant(Rational::new()));
        }

        if let Some((monomial, coefficient)) = den.single_term() {
            let (factor, inverse) = monomial.pow(&Rational::from(-1));
            let num = num.mul(&Poly::term(factor / coefficient, inverse));
            return Ok(Self { num, den: Poly::one() });
        }

        let scale = Rational::from(1) / den.content();
        let (num, den) = (num.scale(&scale), den.scale(&scale));
        if num == den {
            return Ok(Self::constant(Rational::from(1)));
        }
        Ok(Self { num, den })
    }

    pub fn constant(value: Rational) -> Self {
        Self { num: Poly::constant(value), den: Poly::one() }
    }

    /// The fraction `base^exponent`, for a base arithmetic cannot look into.
    pub fn factor(base: Node, exponent: Rational) -> Self {
        let (coefficient, monomial) = Monomial::default().mul(&Monomial::factor(base, exponent));
        Self { num: Poly::term(coefficient, monomial), den: Poly::one() }
    }

    /// The fraction `base`.
    pub fn base(base: Node) -> Self {
        Self::factor(base, Rational::from(1))
    }

    /// The value of a constant fraction.
    pub fn as_constant(&self) -> Option<Rational> {
        if self.den.is_one() {
            self.num.as_constant()
        } else {
            None
        }
    }

    /// The coefficient and monomial of a single-term fraction with no denominator.
    pub fn as_term(&self) -> Option<(&Rational, &Monomial)> {
        if self.den.is_one() {
            self.num.single_term().map(|(monomial, coefficient)| (coefficient, monomial))
        } else {
            None
        }
    }

    pub fn neg(&self) -> Self {
        Self { num: self.num.neg(), den: self.den.clone() }
    }

    pub fn add(&self, other: &Fraction) -> Result<Self, Error> {
        if self.den == other.den {
            return Self::new(self.num.add(&other.num), self.den.clone());
        }
        Self::new(
            self.num.mul(&other.den).add(&other.num.mul(&self.den)),
            self.den.mul(&other.den),
        )
    }

    pub fn mul(&self, other: &Fraction) -> Result<Self, Error> {
        Self::new(self.num.mul(&other.num), self.den.mul(&other.den))
    }

    pub fn inv(&self) -> Result<Self, Error> {
        Self::new(self.den.clone(), self.num.clone())
    }

    pub fn div(&self, other: &Fraction) -> Result<Self, Error> {
        self.mul(&other.inv()?)
    }

    /// Raises this fraction to a non-negative integer power by expansion.
    pub fn expand(&self, exponent: u32) -> Result<Self, Error> {
        Self::new(self.num.pow(exponent), self.den.pow(exponent))
    }
}

/// Raises `coefficient*monomial` to a rational exponent. Returns [`None`] for an even root of a
/// negative coefficient.
pub fn term_power(coefficient: &Rational, monomial: &Monomial, exponent: &Rational) -> Option<Fraction> {
    let negative = coefficient.cmp0().is_lt();
    if negative && exponent.denom().is_even() {
        return None;
    }
    let sign = if negative && exponent.numer().is_odd() { -1 } else { 1 };

    let mut factors = monomial.0.iter()
        .map(|(base, own)| (base.clone(), Rational::from(own * exponent)))
        .collect::<BTreeMap<_, _>>();
    let (numer, denom) = Rational::from(coefficient.abs_ref()).into_numer_denom();
    for (value, exponent) in [(numer, exponent.clone()), (denom, -exponent.clone())] {
        if value != 1 {
            *factors.entry(Base(integer_node(&value))).or_insert_with(Rational::new) += exponent;
        }
    }

    let (factor, monomial) = settle(factors);
    Some(Fraction {
        num: Poly::term(factor * Rational::from(sign), monomial),
        den: Poly::one(),
    })
}
