//! Normalization of unary signs.
//!
//! The tree is rewritten bottom-up. Each level is rebuilt from the already normalized operands
//! of the level below, following these rules:
//!
//! | Before          | After     | Note                                                     |
//! | --------------- | --------- | -------------------------------------------------------- |
//! | `(-a)*(-b)`     | `a*b`     | also `/` and `:`; the signs of both ends combine          |
//! | `a*(-b)`        | `(-a*b)`  | bracketed unless the parent is a bracket or the root      |
//! | `a+(-b)`        | `a-b`     | likewise `a+(+b)`, `a-(-b)` and `a-(+b)`                  |
//! | `-(-a)`         | `+a`      | likewise `-(+a)`, `+(-a)` and `+(+a)`                     |
//! | `(+a)`          | `a`       | the bracket stays if `a` needs it where it sits           |
//! | `+a`            | `a`       | unless directly inside a bracket                          |

use exo_parser::{Expr, Kind, Node, Parent};
use super::brackets::group;

/// Collapses nested signs and sign-bearing brackets to their minimal form. The value of the
/// tree is unchanged.
pub fn normalize_signs(node: &Node) -> Node {
    normalize_at(node, None)
}

fn normalize_at(node: &Node, parent: Option<Parent>) -> Node {
    let rebuilt = node.map_children(|child, link| normalize_at(child, Some(link)));
    let rewritten = rewrite(rebuilt, parent);
    let under_bracket = parent.map_or(false, |parent| parent.kind == Kind::Bracket);

    let result = match rewritten.expr {
        Expr::Positive(inner) if !under_bracket => regroup(*inner, parent),
        expr => Node { expr, unit: rewritten.unit },
    };
    result.with_unit_of(node)
}

/// The operand and sign of a bracket directly wrapping a sign, with the units of the wrappers
/// moved onto the operand.
fn signed_bracket(node: &Node) -> Option<(Node, bool)> {
    let Expr::Bracket(inner) = &node.expr else {
        return None;
    };
    let (operand, negative) = match &inner.expr {
        Expr::Opposite(operand) => (operand, true),
        Expr::Positive(operand) => (operand, false),
        _ => return None,
    };
    Some(((**operand).clone().with_unit_of(inner).with_unit_of(node), negative))
}

/// Brackets `node` if it needs one at `parent`.
fn regroup(node: Node, parent: Option<Parent>) -> Node {
    match parent {
        Some(slot) => group(node, slot),
        None => node,
    }
}

/// Applies the first rule matching the top of `node`, whose children are already normalized.
fn rewrite(node: Node, parent: Option<Parent>) -> Node {
    let kind = node.kind();
    match &node.expr {
        Expr::Product(lhs, rhs) | Expr::Quotient(lhs, rhs) | Expr::Division(lhs, rhs)
            if signed_bracket(lhs).is_some() || signed_bracket(rhs).is_some() =>
        {
            let (first, first_negative) = signed_bracket(lhs).unwrap_or_else(|| ((**lhs).clone(), false));
            let (last, last_negative) = signed_bracket(rhs).unwrap_or_else(|| ((**rhs).clone(), false));
            let first = group(first, Parent::new(kind, 0, 2));
            let last = group(last, Parent::new(kind, 1, 2));
            let operation = match kind {
                Kind::Product => first.mult(last),
                Kind::Quotient => first.frac(last),
                _ => first.div(last),
            };

            if first_negative != last_negative {
                let opposite = operation.oppose();
                match parent {
                    Some(parent) if parent.kind != Kind::Bracket => opposite.bracket(),
                    _ => opposite,
                }
            } else {
                operation
            }
        },
        Expr::Sum(lhs, rhs) | Expr::Difference(lhs, rhs) if signed_bracket(rhs).is_some() => {
            let Some((operand, negative)) = signed_bracket(rhs) else {
                return node;
            };
            let subtract = negative != (kind == Kind::Difference);
            let result_kind = if subtract { Kind::Difference } else { Kind::Sum };
            let operand = group(operand, Parent::new(result_kind, 1, 2));
            let lhs = (**lhs).clone();
            if subtract {
                lhs.sub(operand)
            } else {
                lhs.add(operand)
            }
        },
        Expr::Opposite(inner) | Expr::Positive(inner) if signed_bracket(inner).is_some() => {
            let Some((operand, negative)) = signed_bracket(inner) else {
                return node;
            };
            let negative = negative != (kind == Kind::Opposite);
            let operand = group(operand, Parent::new(kind, 0, 1));
            if negative {
                operand.oppose()
            } else {
                operand.positive()
            }
        },
        Expr::Bracket(inner) => match &inner.expr {
            Expr::Positive(operand) => regroup((**operand).clone(), parent),
            _ => node,
        },
        _ => node,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use exo_parser::parse;

    fn normalized(text: &str) -> String {
        normalize_signs(&parse(text).unwrap()).to_string()
    }

    #[test]
    fn double_opposite() {
        assert_eq!(normalized("-(-a)"), "a");
        assert_eq!(normalized("-(+a)"), "-a");
        assert_eq!(normalized("+(-a)"), "-a");
        assert_eq!(normalized("+(+a)"), "a");
        assert_eq!(normalized("(-(-a))"), "a");
    }

    #[test]
    fn products() {
        assert_eq!(normalized("(-4)*(-5)"), "4*5");
        assert_eq!(normalized("(-a)*b"), "-a*b");
        assert_eq!(normalized("a:(-b)"), "-a:b");
        assert_eq!(normalized("(+a)/(-b)"), "-a/b");
        assert_eq!(normalized("2+(-3)*4"), "2-3*4");
        assert_eq!(normalized("((-2)*3)*4"), "-2*3*4");
    }

    #[test]
    fn sums() {
        assert_eq!(normalized("a+(-b)"), "a-b");
        assert_eq!(normalized("a+(+b)"), "a+b");
        assert_eq!(normalized("a-(-b)"), "a+b");
        assert_eq!(normalized("a-(+b)"), "a-b");
        assert_eq!(normalized("a-(-(b+c))"), "a+(b+c)");
    }

    #[test]
    fn positive_signs() {
        assert_eq!(normalized("+a+b"), "a+b");
        assert_eq!(normalized("(+a)*b"), "a*b");
        assert_eq!(normalized("a/(+b/c)"), "a/(b/c)");
        assert_eq!(normalized("a:(+b:c)"), "a:(b:c)");
        assert_eq!(normalized("a*(+b/c)"), "a*b/c");
    }

    #[test]
    fn keeps_units() {
        assert_eq!(normalized("(-3)*(-2) km"), "3*2 km");
        assert_eq!(normalized("a-(-b km)"), "a+b km");
    }
}
