//! Checking a learner's answer against the shape of an expected template.
//!
//! Matching is structural: `2+$e{1}` accepts `2+7` but not `9`. Nothing is generated, so bounds
//! and exclusions that depend on other templates or on parameters are not checked.

use crate::numerical::{decimal_node, rational, value};
use exo_parser::{Bounds, Expr, Nature, Node, Template};
use rug::Rational;
use super::exclusion::Exclusions;

/// Returns true if `candidate` has the shape described by `pattern`.
///
/// Outside templates, the candidate must have the same structure as the pattern, with numbers
/// compared by value. A template accepts the values it could have generated.
pub fn match_template(candidate: &Node, pattern: &Node) -> bool {
    if let Some(template) = pattern.as_template() {
        return matches(candidate.unbracketed().0, template);
    }

    let labels_match = match (&candidate.expr, &pattern.expr) {
        (Expr::Number(a), Expr::Number(b)) => rational(a) == rational(b),
        (Expr::Symbol(a), Expr::Symbol(b))
        | (Expr::SegmentLength(a), Expr::SegmentLength(b))
        | (Expr::Error(a), Expr::Error(b)) => a == b,
        (Expr::Function(a, _), Expr::Function(b, _)) => a == b,
        (Expr::Inequality(a, ..), Expr::Inequality(b, ..)) => a == b,
        (Expr::Boolean(a), Expr::Boolean(b)) => a == b,
        (Expr::Template(a), Expr::Template(b)) => a == b,
        _ => candidate.kind() == pattern.kind(),
    };

    let (children, pattern_children) = (candidate.children(), pattern.children());
    labels_match
        && candidate.unit == pattern.unit
        && children.len() == pattern_children.len()
        && children.into_iter().zip(pattern_children).all(|(a, b)| match_template(a, b))
}

/// The value of a bound, if it can be known without generating anything.
fn known(node: &Node) -> Option<Rational> {
    value(node).ok()
}

/// The number of digits of a non-negative integer, `0` having none.
fn digits(value: &Rational) -> Option<u32> {
    if *value.denom() != 1 || value.cmp0().is_lt() {
        return None;
    }
    if value.cmp0().is_eq() {
        return Some(0);
    }
    u32::try_from(value.numer().to_string().len()).ok()
}

fn known_all(nodes: &[Node]) -> Vec<Rational> {
    nodes.iter().filter_map(known).collect()
}

/// The exclusions of a template whose operands have a known value.
fn known_exclusions(template: &Template) -> Exclusions {
    Exclusions {
        values: template.exclude.iter().filter(|node| !node.has_template()).cloned().collect(),
        range: template.exclude_range.as_ref()
            .and_then(|(min, max)| Some((known(min)?, known(max)?))),
        multiples: known_all(&template.exclude_multiple),
        dividers: known_all(&template.exclude_divider),
        coprimes: known_all(&template.exclude_common_dividers_with),
    }
}

/// Splits a written number into its value and whether it was written with a sign. Returns
/// [`None`] if the candidate is not a possibly signed number, or uses a sign the template cannot
/// produce.
fn signed_number<'a>(candidate: &'a Node, template: &Template) -> Option<(&'a Node, Rational)> {
    let (number, negative) = match &candidate.expr {
        Expr::Number(_) => (candidate, false),
        Expr::Opposite(inner) => (&**inner, true),
        Expr::Positive(inner) if template.signed => (&**inner, false),
        _ => return None,
    };
    let Expr::Number(magnitude) = &number.expr else {
        return None;
    };
    let magnitude = rational(magnitude);
    Some((number, if negative { -magnitude } else { magnitude }))
}

/// The values a template may have drawn to produce `written`: the value itself, and its
/// opposite for templates that invert the sign of their draw.
fn draws(written: Rational, template: &Template) -> Vec<Rational> {
    let invertible = template.relative || template.nature == Nature::OddInteger;
    if invertible && written.cmp0().is_ne() {
        let opposite = Rational::from(-&written);
        vec![written, opposite]
    } else {
        vec![written]
    }
}

fn in_digit_bounds(drawn: &Rational, min: Option<&Node>, max: &Node) -> bool {
    let Some(count) = digits(drawn) else {
        return false;
    };
    let min = match min {
        Some(min) => known(min),
        None => Some(Rational::new()),
    };
    min.map_or(true, |min| min <= count)
        && known(max).map_or(true, |max| count <= max)
}

fn in_span(count: usize, (min, max): &(Node, Option<Node>)) -> bool {
    let Ok(count) = u32::try_from(count) else {
        return false;
    };
    let min = known(min);
    let max = match max {
        Some(max) => known(max),
        None => min.clone(),
    };
    min.map_or(true, |min| min <= count) && max.map_or(true, |max| count <= max)
}

fn matches(candidate: &Node, template: &Template) -> bool {
    match template.nature {
        Nature::Integer | Nature::EvenInteger | Nature::OddInteger => {
            let Some((number, written)) = signed_number(candidate, template) else {
                return false;
            };
            if !matches!(&number.expr, Expr::Number(n) if n.is_integer()) {
                return false;
            }

            let exclusions = known_exclusions(template);
            draws(written, template).into_iter().any(|drawn| {
                let parity = match template.nature {
                    Nature::EvenInteger => drawn.numer().is_even(),
                    Nature::OddInteger => drawn.numer().is_odd(),
                    _ => true,
                };
                let bounded = match &template.bounds {
                    Bounds::Unbounded => drawn.cmp0().is_ge(),
                    Bounds::Digits { min, max } => in_digit_bounds(&drawn, min.as_ref(), max),
                    Bounds::Range { min, max } => {
                        known(min).map_or(true, |min| min <= drawn)
                            && known(max).map_or(true, |max| drawn <= max)
                    },
                    _ => false,
                };
                parity && bounded && !exclusions.rejects(&decimal_node(&drawn))
            })
        },
        Nature::Decimal => {
            let Some((number, written)) = signed_number(candidate, template) else {
                return false;
            };
            let Expr::Number(magnitude) = &number.expr else {
                return false;
            };
            let integer_digits = match magnitude.integer_part() {
                "0" => 0,
                part => part.len(),
            };
            let bounded = match &template.bounds {
                Bounds::DecimalDigits { integer, fraction } => {
                    in_span(integer_digits, integer) && in_span(magnitude.fraction_part().len(), fraction)
                },
                Bounds::Unbounded => true,
                _ => false,
            };
            bounded && draws(written, template).iter().any(|drawn| drawn.cmp0().is_ge())
        },
        Nature::List => match &template.bounds {
            Bounds::Choices(choices) => {
                !known_exclusions(template).rejects(candidate)
                    && choices.iter().any(|choice| match_template(candidate, choice))
            },
            _ => false,
        },
        Nature::Fraction | Nature::DecimalValue | Nature::BackReference { .. } => value(candidate).is_ok(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use exo_parser::parse;

    fn check(cases: &[(&str, &str, bool)]) {
        for (candidate, pattern, expected) in cases {
            let result = match_template(&parse(candidate).unwrap(), &parse(pattern).unwrap());
            assert_eq!(result, *expected, "matching {} against {}", candidate, pattern);
        }
    }

    #[test]
    fn structure() {
        check(&[
            ("2", "2", true), ("2", "3", false), ("2", "?", false), ("2", "a", false),
            ("2", "-2", false), ("2", "2+3", false), ("2", "2-3", false), ("2", "2*3", false),
            ("2", "2:3", false), ("2", "2/3", false), ("2", "2^3", false),
            ("a", "a", true), ("a", "b", false), ("a", "?", false), ("a", "-a", false),
            ("a", "a+3", false), ("a", "a^3", false),
            ("?", "?", true), ("?", "3", false), ("?", "a", false), ("?", "-?", false),
            ("?", "?+3", false), ("?", "?^3", false),
            ("-2", "-2", true), ("-2", "2", false), ("-2", "?", false), ("-2", "-2+3", false),
            ("-2", "-2^3", false),
            ("2+3", "2+3", true), ("2-3", "2-3", true), ("2*3", "2*3", true), ("2/3", "2/3", true),
            ("2:3", "2:3", true), ("2^3", "2^3", true), ("2.50", "2.5", true),
        ]);
    }

    #[test]
    fn integers() {
        check(&[
            ("2", "$e", true), ("2", "$er", true), ("-2", "$er", true), ("0", "$e", true),
            ("0", "$er", true), ("2", "$ep", true), ("3", "$ep", false), ("2", "$ei", false),
            ("3", "$ei", true), ("2", "$epr", true), ("3", "$epr", false), ("2", "$eir", false),
            ("3", "$eir", true), ("-2", "$epr", true), ("-3", "$epr", false),
            ("-2", "$eir", false), ("-3", "$eir", true), ("2.4", "$e", false), ("-2", "$e", false),
            ("a", "$e", false),
        ]);
    }

    #[test]
    fn digit_bounds() {
        check(&[
            ("0", "$e{0}", true), ("0", "$e{0;0}", true), ("0", "$e{1}", true),
            ("0", "$e{0;1}", true), ("0", "$e{1;1}", false), ("2", "$e{1}", true),
            ("2", "$e{1;1}", true), ("2", "$e{0;1}", true), ("2", "$er{1}", true),
            ("2", "$epr{1}", true), ("2", "$eir{1}", false), ("2", "$er{1;1}", true),
            ("-2", "$er{1}", true), ("-2", "$er{1;1}", true), ("-2", "$epr{1;1}", true),
            ("-2", "$eir{1;1}", false), ("24", "$e{1}", false), ("24", "$e{1;1}", false),
        ]);
    }

    #[test]
    fn ranges_and_exclusions() {
        check(&[
            ("2", "$e[2;2]", true), ("2", "$e[2;3]", true), ("2", "$e[1;2]", true),
            ("4", "$e[2;3]", false), ("1", "$e[2;3]", false), ("-2", "$e[-3;3]", true),
            ("5", "$e[1;9]\\{5}", false), ("6", "$e[1;9]\\{5}", true), ("6", "$e[1;9]\\m{3}", false),
            ("4", "$e[1;9]\\g{6}", false), ("5", "$e[1;9]\\g{6}", true),
        ]);
    }

    #[test]
    fn other_natures() {
        check(&[
            ("2.35", "$d{1;2}", true), ("2.3", "$d{1;2}", false), ("12.3", "$d{1:2;1}", true),
            ("-2.35", "$d{1;2}", false), ("-2.35", "$dr{1;2}", true),
            ("b", "$l{a;b;c}", true), ("d", "$l{a;b;c}", false), ("b", "$l{a;b;c}\\{b}", false),
            ("3", "$l{a;$e{1}}", true),
            ("1/2", "${x}", true), ("0.5", "$${x}", true), ("a", "$1", false), ("7", "$1", true),
        ]);
    }

    #[test]
    fn templates_inside_expressions() {
        check(&[
            ("2+7", "2+$e{1}", true), ("2+(-7)", "2+$er{1}", true), ("3+7", "2+$e{1}", false),
            ("2*a", "$e*a", true), ("2*b", "$e*a", false),
        ]);
    }
}
