//! Substitution of symbols by the expressions bound to them.

use crate::consts::{CONSTANTS, DEFAULT_MAX_SUBSTITUTION_DEPTH};
use exo_error::Error;
use exo_parser::{parse, Expr, Node, Parent};
use std::collections::HashMap;
use super::{brackets::group, error::SubstitutionCycle};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Options for [`substitute_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SubstituteOptions {
    /// How many substitutions may be nested inside one another before the bindings are
    /// considered cyclic.
    pub max_depth: usize,
}

impl Default for SubstituteOptions {
    fn default() -> Self {
        Self { max_depth: DEFAULT_MAX_SUBSTITUTION_DEPTH }
    }
}

/// Replaces every symbol that is a named constant or has a binding with the parsed text it is
/// bound to, using the default [`SubstituteOptions`].
///
/// Constants (`pi`, `e`) take priority over the bindings. Symbols bound to nothing are left
/// unchanged. Replacements are themselves substituted, so bindings may refer to other bindings.
pub fn substitute(node: &Node, bindings: &HashMap<String, String>) -> Result<Node, Error> {
    substitute_with(node, bindings, SubstituteOptions::default())
}

/// Like [`substitute`], with explicit options.
pub fn substitute_with(
    node: &Node,
    bindings: &HashMap<String, String>,
    options: SubstituteOptions,
) -> Result<Node, Error> {
    Substitution { bindings, options, chain: Vec::new() }.run(node, None)
}

struct Substitution<'a> {
    bindings: &'a HashMap<String, String>,
    options: SubstituteOptions,

    /// The symbols currently being replaced, outermost first.
    chain: Vec<String>,
}

impl Substitution<'_> {
    fn binding(&self, name: &str) -> Option<&str> {
        CONSTANTS.get(name)
            .copied()
            .or_else(|| self.bindings.get(name).map(String::as_str))
    }

    fn run(&mut self, node: &Node, parent: Option<Parent>) -> Result<Node, Error> {
        match &node.expr {
            Expr::Symbol(name) => {
                let Some(text) = self.binding(name) else {
                    return Ok(node.clone());
                };

                if self.chain.contains(name) || self.chain.len() >= self.options.max_depth {
                    let mut chain = self.chain.clone();
                    chain.push(name.clone());
                    debug!(chain = %chain.join(" -> "), "substitution cycle");
                    return Err(Error::unspanned(SubstitutionCycle { chain }));
                }

                let replacement = parse(text)?;
                self.chain.push(name.clone());
                let result = self.run(&replacement, parent);
                self.chain.pop();

                let result = result?.with_unit_of(node);
                Ok(match parent {
                    Some(slot) => group(result, slot),
                    None => result,
                })
            },
            Expr::Number(_) | Expr::Error(_) | Expr::Hole | Expr::Template(_) => Ok(node.clone()),
            _ => node.try_map_children(|child, link| self.run(child, Some(link))),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use crate::numerical::value;
    use rug::Rational;

    fn bindings(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn substituted(text: &str, pairs: &[(&str, &str)]) -> Node {
        substitute(&parse(text).unwrap(), &bindings(pairs)).unwrap()
    }

    #[test]
    fn replaces_bound_symbols() {
        let node = substituted("a+b", &[("a", "2"), ("b", "3")]);
        assert_eq!(value(&node).unwrap(), Rational::from(5));
    }

    #[test]
    fn leaves_unbound_symbols() {
        assert_eq!(substituted("c", &[]).to_string(), "c");
        assert_eq!(substituted("2c+a", &[("a", "1")]).to_string(), "2*c+1");
    }

    #[test]
    fn constants_take_priority() {
        assert_eq!(substituted("2pi", &[("pi", "3")]).to_string(), "2*3.14");
        assert_eq!(substituted("e", &[]).to_string(), "2.7");
    }

    #[test]
    fn nested_bindings() {
        assert_eq!(substituted("a", &[("a", "b+1"), ("b", "2")]).to_string(), "2+1");
        assert_eq!(substituted("2a", &[("a", "b+1"), ("b", "x")]).to_string(), "2*(x+1)");
    }

    #[test]
    fn groups_replacements() {
        assert_eq!(substituted("3a", &[("a", "-2")]).to_string(), "3*(-2)");
        assert_eq!(substituted("a^2", &[("a", "x+1")]).to_string(), "(x+1)^2");
        assert_eq!(substituted("-a", &[("a", "4")]).to_string(), "-4");
        assert_eq!(substituted("cos(a)", &[("a", "x+1")]).to_string(), "cos(x+1)");
    }

    #[test]
    fn keeps_units_and_templates() {
        let node = parse("a+$e{2}").unwrap();
        let node = substitute(&node, &bindings(&[("a", "5")])).unwrap();
        assert_eq!(node.to_string(), "5+$e{2}");

        let node = parse("2*a km").unwrap();
        let node = substitute(&node, &bindings(&[("a", "5")])).unwrap();
        assert_eq!(node.to_string(), "2*5 km");
    }

    #[test]
    fn cycles_are_errors() {
        let err = substitute(&parse("a").unwrap(), &bindings(&[("a", "b"), ("b", "a+1")])).unwrap_err();
        let cycle = err.downcast_ref::<SubstitutionCycle>().unwrap();
        assert_eq!(cycle.chain, vec!["a", "b", "a"]);

        let err = substitute(&parse("2x").unwrap(), &bindings(&[("x", "x")])).unwrap_err();
        assert!(err.is::<SubstitutionCycle>());
    }

    #[test]
    fn depth_limit() {
        let chain = bindings(&[("a", "b"), ("b", "c"), ("c", "d"), ("d", "1")]);
        let node = parse("a").unwrap();
        assert!(substitute_with(&node, &chain, SubstituteOptions { max_depth: 2 }).is_err());
        assert_eq!(substitute_with(&node, &chain, SubstituteOptions { max_depth: 4 }).unwrap().to_string(), "1");
    }
}
