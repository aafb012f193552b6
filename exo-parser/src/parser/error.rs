//! The kinds of errors the parser reports.

use ariadne::Fmt;
use exo_attrs::ErrorKind;
use exo_error::EXPR;
use crate::tokenizer::TokenKind;

/// The end of the source code was reached unexpectedly.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected end of input",
    labels = [format!("you might need to add another {} here", "expression".fg(EXPR))],
)]
pub struct UnexpectedEof;

/// The end of the source code was expected, but something else was found.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expected end of input",
    labels = [format!("I could not understand the remaining {} here", "expression".fg(EXPR))],
)]
pub struct ExpectedEof;

/// An unexpected token was encountered.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected token",
    labels = [format!("expected one of: {}", expected.iter().map(|t| format!("{:?}", t)).collect::<Vec<_>>().join(", "))],
    help = format!("found {:?}", found),
)]
pub struct UnexpectedToken {
    /// The token(s) that were expected.
    pub expected: &'static [TokenKind],

    /// The token that was found.
    pub found: TokenKind,
}

/// An operand was expected, such as a number, a letter or a bracket.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expected an expression",
    labels = ["here"],
    help = format!("found `{}`", found),
)]
pub struct ExpectedExpr {
    /// The text that was found instead.
    pub found: String,
}

/// A template placeholder is not written correctly.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("invalid template: {}", reason),
    labels = [reason.clone()],
    help = format!("templates look like {}, {} or {}", "$e{2}".fg(EXPR), "$er[1;9]\\{5}".fg(EXPR), "$l{a;b;c}".fg(EXPR)),
)]
pub struct InvalidTemplate {
    /// What is wrong with the template.
    pub reason: String,
}
