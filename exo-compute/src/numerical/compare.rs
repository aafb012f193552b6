//! A strict total order over expression trees, used to sort the operands of sums and products.

use exo_parser::{Expr, Node};
use std::cmp::Ordering;
use super::convert::rational;

/// Compares two expressions.
///
/// Brackets wrapping either side are looked through first and only break ties, the shallower
/// side first. Numbers compare by value. Other expressions compare by kind (see
/// [`Kind`](exo_parser::Kind)), then by name, then by their children from left to right, and
/// finally by their units, a missing unit sorting first.
///
/// Two trees compare [`Ordering::Equal`] exactly when they are equal.
pub fn compare(a: &Node, b: &Node) -> Ordering {
    let (a_inner, a_depth) = a.unbracketed();
    let (b_inner, b_depth) = b.unbracketed();

    structure(a_inner, b_inner)
        .then(a_depth.cmp(&b_depth))
        .then_with(|| compare_units(a, b))
}

fn compare_units(a: &Node, b: &Node) -> Ordering {
    match (&a.unit, &b.unit) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => compare(a, b),
    }
}

/// Compares everything but the units of the outermost nodes.
fn structure(a: &Node, b: &Node) -> Ordering {
    if let (Expr::Number(a), Expr::Number(b)) = (&a.expr, &b.expr) {
        return rational(a).cmp(&rational(b));
    }

    a.kind().cmp(&b.kind())
        .then_with(|| payload(&a.expr, &b.expr))
        .then_with(|| {
            let (a, b) = (a.children(), b.children());
            a.iter()
                .zip(b.iter())
                .map(|(a, b)| compare(a, b))
                .find(|ordering| ordering.is_ne())
                .unwrap_or_else(|| a.len().cmp(&b.len()))
        })
}

/// Compares what two expressions of the same kind hold besides their children.
fn payload(a: &Expr, b: &Expr) -> Ordering {
    match (a, b) {
        (Expr::Symbol(a), Expr::Symbol(b))
        | (Expr::SegmentLength(a), Expr::SegmentLength(b))
        | (Expr::Error(a), Expr::Error(b))
        | (Expr::Function(a, _), Expr::Function(b, _)) => a.cmp(b),
        (Expr::Boolean(a), Expr::Boolean(b)) => a.cmp(b),
        (Expr::Inequality(a, ..), Expr::Inequality(b, ..)) => a.cmp(b),
        (Expr::Template(a), Expr::Template(b)) => a.to_string().cmp(&b.to_string()),
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use exo_parser::parse;

    fn cmp(a: &str, b: &str) -> Ordering {
        compare(&parse(a).unwrap(), &parse(b).unwrap())
    }

    #[test]
    fn numbers_by_value() {
        assert_eq!(cmp("2", "10"), Ordering::Less);
        assert_eq!(cmp("0.5", "0.25"), Ordering::Greater);
        assert_eq!(cmp("3", "3"), Ordering::Equal);
    }

    #[test]
    fn kinds_then_names() {
        assert_eq!(cmp("9", "a"), Ordering::Less);
        assert_eq!(cmp("a", "b"), Ordering::Less);
        assert_eq!(cmp("b", "a^2"), Ordering::Less);
        assert_eq!(cmp("cos(2)", "sin(1)"), Ordering::Less);
        assert_eq!(cmp("a*b", "a+b"), Ordering::Less);
    }

    #[test]
    fn children_left_to_right() {
        assert_eq!(cmp("a^2", "a^3"), Ordering::Less);
        assert_eq!(cmp("b^2", "a^3"), Ordering::Greater);
        assert_eq!(cmp("pgcd(1;2)", "pgcd(1;2;3)"), Ordering::Less);
    }

    #[test]
    fn brackets_break_ties() {
        assert_eq!(cmp("(a)", "b"), Ordering::Less);
        assert_eq!(cmp("a", "(a)"), Ordering::Less);
        assert_eq!(cmp("((a))", "((a))"), Ordering::Equal);
    }

    #[test]
    fn units_sort_last() {
        assert_eq!(cmp("3", "3 km"), Ordering::Less);
        assert_eq!(cmp("3 km", "3 m"), Ordering::Less);
    }

    #[test]
    fn antisymmetric() {
        let texts = ["1", "a", "-a", "(a)", "a+b", "2*a", "cos(a)", "3 km", "a^2", "$e{2}"];
        for a in texts {
            for b in texts {
                assert_eq!(cmp(a, b), cmp(b, a).reverse(), "{} vs {}", a, b);
                assert_eq!(cmp(a, b).is_eq(), parse(a).unwrap() == parse(b).unwrap());
            }
        }
    }
}
