use logos::Logos;
use std::ops::Range;

/// The different kinds of tokens that can be produced by the tokenizer.
///
/// Letters are tokenized one at a time: `ab` is the implicit product of `a` and `b`, and the
/// parser reassembles function names, units and template natures from consecutive letters.
/// Numbers are tokenized as runs of digits for the same reason, since `3 9 8 9` is the single
/// number `3989`.
#[derive(Logos, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    #[regex(r"[ \t\n\r]+")]
    Whitespace,

    #[regex(r"[0-9]+")]
    Digits,

    #[token(".")]
    Dot,

    #[token(",")]
    Comma,

    #[regex(r"[a-zA-Z]")]
    Letter,

    #[token("+")]
    Add,

    #[token("-")]
    Sub,

    #[token("*")]
    Mul,

    #[token(":")]
    Colon,

    #[token("/")]
    Slash,

    #[token("^")]
    Caret,

    #[token("%")]
    Percent,

    #[token("=")]
    Eq,

    #[token("!=")]
    NotEq,

    #[token("<")]
    Less,

    #[token("<=")]
    LessEq,

    #[token(">")]
    Greater,

    #[token(">=")]
    GreaterEq,

    #[token("(")]
    OpenParen,

    #[token(")")]
    CloseParen,

    #[token("{")]
    OpenCurly,

    #[token("}")]
    CloseCurly,

    #[token("[")]
    OpenSquare,

    #[token("]")]
    CloseSquare,

    #[token(";")]
    Semicolon,

    #[token("?")]
    Question,

    #[token("$")]
    Dollar,

    #[token("$$")]
    DoubleDollar,

    #[token("\\")]
    Backslash,

    #[regex(r".", priority = 0)]
    Symbol,
}

impl TokenKind {
    /// Returns true if the token represents whitespace.
    pub fn is_whitespace(self) -> bool {
        matches!(self, TokenKind::Whitespace)
    }
}

/// A token produced by the tokenizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'source> {
    /// The region of the source code that this token originated from.
    pub span: Range<usize>,

    /// The kind of token.
    pub kind: TokenKind,

    /// The raw lexeme that was parsed into this token.
    pub lexeme: &'source str,
}

impl Token<'_> {
    /// Returns true if the token represents whitespace.
    pub fn is_whitespace(&self) -> bool {
        self.kind.is_whitespace()
    }

    /// Returns true if the token is the letter `letter`.
    pub fn is_letter(&self, letter: char) -> bool {
        self.kind == TokenKind::Letter && self.lexeme.starts_with(letter)
    }
}
