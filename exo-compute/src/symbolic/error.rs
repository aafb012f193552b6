//! The kinds of errors raised by symbolic rewrites.

use ariadne::Fmt;
use exo_attrs::ErrorKind;
use exo_error::EXPR;

/// Substituting a symbol keeps reintroducing symbols that need substituting.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("substitution of `{}` never ends", chain.first().map_or("", String::as_str)),
    labels = ["while substituting this expression"],
    help = format!("the bindings refer to each other: {}", chain.join(" -> ").fg(EXPR)),
)]
pub struct SubstitutionCycle {
    /// The symbols being substituted, outermost first.
    pub chain: Vec<String>,
}
