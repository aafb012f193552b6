//! Canonical ordering of the operands of sums and products.

use crate::numerical::compare;
use exo_parser::{Expr, Node};

/// Sorts the terms of every sum and the factors of every product of the tree, using
/// [`compare`]. Other operators keep the order of their operands, since they do not commute.
///
/// The sort is stable, so canonicalizing an already canonical tree returns it unchanged. A sign
/// that ends up as a later term of a sum is bracketed, so `b+-a` is written `-a+b` or `b+(-a)`.
pub fn canonicalize(node: &Node) -> Node {
    match &node.expr {
        Expr::Sum(..) => {
            let terms = sorted(node.terms());
            fold(terms, |acc, term| {
                if term.kind().is_sign() {
                    acc.add(term.bracket())
                } else {
                    acc.add(term)
                }
            })
            .with_unit_of(node)
        },
        Expr::Product(..) => fold(sorted(node.factors()), Node::mult).with_unit_of(node),
        _ => node.map_children(|child, _| canonicalize(child)),
    }
}

fn sorted(operands: Vec<&Node>) -> Vec<Node> {
    let mut operands = operands.into_iter().map(canonicalize).collect::<Vec<_>>();
    operands.sort_by(compare);
    operands
}

/// Folds the operands left to right. `operands` holds at least two nodes, since it comes from a
/// sum or a product.
fn fold(operands: Vec<Node>, f: impl Fn(Node, Node) -> Node) -> Node {
    let mut operands = operands.into_iter();
    let first = operands.next().unwrap_or_else(Node::hole);
    operands.fold(first, f)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use exo_parser::parse;

    fn canonical(text: &str) -> String {
        canonicalize(&parse(text).unwrap()).to_string()
    }

    #[test]
    fn sorts_terms() {
        assert_eq!(canonical("c+a+b"), "a+b+c");
        assert_eq!(canonical("x+3+2"), "2+3+x");
        assert_eq!(canonical("sin(1)+cos(2)"), "cos(2)+sin(1)");
        assert_eq!(canonical("a^2+a"), "a+a^2");
    }

    #[test]
    fn sorts_factors() {
        assert_eq!(canonical("cba"), "a*b*c");
        assert_eq!(canonical("b*2*a"), "2*a*b");
    }

    #[test]
    fn brackets_later_signs() {
        assert_eq!(canonical("b+(-a)"), "b+(-a)");
        assert_eq!(canonical("-b+a"), "a+(-b)");
        assert_eq!(canonical("-b+(-a)"), "(-a)+(-b)");
    }

    #[test]
    fn non_commutative_operators_keep_order() {
        assert_eq!(canonical("b-a"), "b-a");
        assert_eq!(canonical("(c+b)/(b*a)"), "(b+c)/(a*b)");
        assert_eq!(canonical("(y+x)^2"), "(x+y)^2");
    }

    #[test]
    fn sums_sort_by_top_level_terms() {
        assert_eq!(canonical("d+(c+b)+a"), "a+d+(b+c)");
        assert_eq!(canonical("c+b-a+d"), "d+b+c-a");
    }

    #[test]
    fn idempotent() {
        for text in ["c+a+b", "-b+(-a)+c", "b*2*a+a", "(c+b)/(b*a)", "x*y+3 km"] {
            let once = canonicalize(&parse(text).unwrap());
            assert_eq!(canonicalize(&once), once, "{}", text);
        }
    }
}
