//! The exclusions of a template, resolved to values before sampling.

use crate::numerical::value;
use exo_parser::Node;
use rug::{Integer, Rational};
use tracing::debug;

/// The resolved exclusions of one template instance.
#[derive(Debug, Clone, Default)]
pub struct Exclusions {
    /// `\{…}`: excluded values.
    pub values: Vec<Node>,

    /// `\[a;b]`: an inclusive range of excluded values.
    pub range: Option<(Rational, Rational)>,

    /// `\m{…}`: the candidate must not be a multiple of these.
    pub multiples: Vec<Rational>,

    /// `\d{…}`: the candidate must not divide these.
    pub dividers: Vec<Rational>,

    /// `\g{…}`: the candidate must be coprime with these.
    pub coprimes: Vec<Rational>,
}

/// The integer value of a rational, if it has one.
fn integer(value: &Rational) -> Option<&Integer> {
    (*value.denom() == 1).then(|| value.numer())
}

/// Returns true if `a` is a multiple of the non-zero integer `b`.
fn is_multiple(a: &Rational, b: &Rational) -> bool {
    match (integer(a), integer(b)) {
        (Some(a), Some(b)) if b.cmp0().is_ne() => a.is_divisible(b),
        _ => false,
    }
}

/// Returns true if `node` and `excluded` are the same value, or are written the same way when
/// either has no value.
fn same(node: &Node, candidate: Option<&Rational>, excluded: &Node) -> bool {
    match (candidate, value(excluded)) {
        (Some(candidate), Ok(excluded)) => *candidate == excluded,
        _ => node.to_string() == excluded.to_string(),
    }
}

impl Exclusions {
    /// Returns true if no exclusion is configured.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
            && self.range.is_none()
            && self.multiples.is_empty()
            && self.dividers.is_empty()
            && self.coprimes.is_empty()
    }

    /// Returns true if `node` is one of the excluded values.
    pub fn is_listed(&self, node: &Node) -> bool {
        let candidate = value(node).ok();
        self.values.iter().any(|excluded| same(node, candidate.as_ref(), excluded))
    }

    /// Returns true if any exclusion rejects `node`. The numeric exclusions only apply to
    /// candidates that have a value.
    pub fn rejects(&self, node: &Node) -> bool {
        let rejected = self.is_listed(node) || match value(node) {
            Ok(candidate) => self.rejects_value(&candidate),
            Err(_) => false,
        };
        if rejected {
            debug!(candidate = %node, "draw rejected");
        }
        rejected
    }

    fn rejects_value(&self, candidate: &Rational) -> bool {
        if let Some((min, max)) = &self.range {
            if min <= candidate && candidate <= max {
                return true;
            }
        }

        self.multiples.iter().any(|multiple| is_multiple(candidate, multiple))
            || self.dividers.iter().any(|divider| is_multiple(divider, candidate))
            || self.coprimes.iter().any(|operand| match (integer(candidate), integer(operand)) {
                (Some(a), Some(b)) => Integer::from(a.gcd_ref(b)) != 1,
                _ => false,
            })
    }
}
