//! Random reordering of the operands of sums and products.

use exo_parser::{Kind, Node};
use rand::{seq::SliceRandom, Rng};

/// Shuffles the terms of a sum. Other nodes are returned unchanged.
///
/// The terms are the operands of the whole chain of sums at the top of `node`, so `a+b+c` may
/// become `c+a+b`. The multiset of terms and the value are unchanged.
pub fn shuffle_terms<R: Rng + ?Sized>(node: &Node, rng: &mut R) -> Node {
    if !node.is(Kind::Sum) {
        return node.clone();
    }
    shuffle_fold(node, node.terms(), rng, Node::add)
}

/// Shuffles the factors of a product. Other nodes are returned unchanged.
pub fn shuffle_factors<R: Rng + ?Sized>(node: &Node, rng: &mut R) -> Node {
    if !node.is(Kind::Product) {
        return node.clone();
    }
    shuffle_fold(node, node.factors(), rng, Node::mult)
}

fn shuffle_fold<R: Rng + ?Sized>(
    node: &Node,
    operands: Vec<&Node>,
    rng: &mut R,
    f: fn(Node, Node) -> Node,
) -> Node {
    let mut operands = operands.into_iter().cloned().collect::<Vec<_>>();
    operands.shuffle(rng);

    let Some(last) = operands.pop() else {
        return node.clone();
    };
    operands.into_iter().fold(last, f).with_unit_of(node)
}
