//! Removal of redundant brackets.

use exo_parser::{Expr, Kind, Node, Parent};

/// Returns true if a bracket around `inner`, sitting at `parent`, can be dropped without changing
/// the meaning of the tree. `None` means the bracket is the root.
///
/// `inner` must already be free of redundant brackets itself.
pub fn is_redundant(parent: Option<Parent>, inner: &Node) -> bool {
    let Some(parent) = parent else {
        return true;
    };

    if matches!(parent.kind, Kind::Function | Kind::Bracket | Kind::Equality | Kind::Unequality | Kind::Inequality)
        || matches!(inner.kind(), Kind::Function | Kind::Hole | Kind::Number | Kind::Symbol)
    {
        return true;
    }

    let first = parent.is_first();
    match (parent.kind, inner.kind()) {
        (Kind::Sum, Kind::Sum | Kind::Difference | Kind::Product | Kind::Quotient | Kind::Division | Kind::Power) => true,
        (Kind::Sum, Kind::Opposite | Kind::Positive) => first,

        (Kind::Difference, Kind::Sum | Kind::Difference) => first,
        (Kind::Difference, Kind::Product | Kind::Quotient | Kind::Division | Kind::Power) => true,

        (Kind::Product, Kind::Product | Kind::Power) => true,
        (Kind::Product, Kind::Quotient | Kind::Division) => first || parent.is_last(),

        (Kind::Quotient | Kind::Division, Kind::Product | Kind::Quotient | Kind::Division) => first,
        (Kind::Quotient | Kind::Division, Kind::Power) => true,

        (Kind::Power, Kind::Power) => first,
        _ => false,
    }
}

/// Wraps `node` in a bracket if it would need one at `slot`.
pub fn group(node: Node, slot: Parent) -> Node {
    let needed = if slot.kind.is_sign() {
        matches!(node.kind(), Kind::Sum | Kind::Difference | Kind::Opposite | Kind::Positive)
            || node.kind().is_relation()
    } else {
        !node.is(Kind::Bracket) && !is_redundant(Some(slot), &node)
    };

    if needed {
        node.bracket()
    } else {
        node
    }
}

/// Removes every redundant bracket of the tree.
///
/// A bracket holding a unit, such as the one of `(1+2) km`, is kept unless it wraps a single
/// leaf.
pub fn elide(node: &Node) -> Node {
    elide_at(node, None)
}

fn elide_at(node: &Node, parent: Option<Parent>) -> Node {
    match &node.expr {
        Expr::Bracket(inner) => {
            let inner = elide_at(inner, Some(Parent::new(Kind::Bracket, 0, 1)));
            let keeps_unit = node.unit.is_some() && !inner.children().is_empty();
            if !keeps_unit && is_redundant(parent, &inner) {
                inner.with_unit_of(node)
            } else {
                Node { expr: Expr::Bracket(Box::new(inner)), unit: node.unit.clone() }
            }
        },
        _ => node.map_children(|child, link| elide_at(child, Some(link))),
    }
}
