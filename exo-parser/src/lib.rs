//! Expression model, tokenizer and parser for templated math exercises.
//!
//! The entry point is [`parse`], which turns text such as `2a+$e[2;9]` into a [`Node`] tree. The
//! tree is a closed tagged union ([`Expr`]) over every expression kind the toolkit understands,
//! including template placeholders ([`Template`]) that the generation engine in `exo-compute`
//! replaces with random values.
//!
//! Every [`Node`] prints back to canonical text through its [`Display`](std::fmt::Display)
//! implementation.

pub mod node;
pub mod parser;
pub mod tokenizer;

pub use node::{
    number::Number,
    template::{Bounds, Nature, Template},
    Expr,
    Kind,
    Node,
    Parent,
    Relation,
};

use exo_error::Error;
use parser::Parser;

/// Parses the given text into an expression tree. The whole input must be consumed.
pub fn parse(text: &str) -> Result<Node, Error> {
    Parser::new(text).try_parse_full()
}
