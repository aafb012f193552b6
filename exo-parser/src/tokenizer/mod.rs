pub mod token;

use logos::{Lexer, Logos};
pub use token::{Token, TokenKind};

/// Returns an iterator over the token kinds produced by the tokenizer.
pub fn tokenize(input: &str) -> Lexer<TokenKind> {
    TokenKind::lexer(input)
}

/// Returns an owned array containing all of the tokens produced by the tokenizer. This allows us
/// to backtrack in case of an error.
///
/// Characters no rule accepts become [`TokenKind::Symbol`] tokens, so tokenizing never fails.
pub fn tokenize_complete(input: &str) -> Box<[Token]> {
    let mut lexer = tokenize(input);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        tokens.push(Token {
            span: lexer.span(),
            kind: result.unwrap_or(TokenKind::Symbol),
            lexeme: lexer.slice(),
        });
    }

    tokens.into_boxed_slice()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Compares the tokens produced by the tokenizer to the raw expected tokens.
    fn compare_tokens<'source, const N: usize>(input: &'source str, expected: [(TokenKind, &'source str); N]) {
        let mut lexer = tokenize(input);

        for (expected_kind, expected_lexeme) in expected.into_iter() {
            assert_eq!(lexer.next(), Some(Ok(expected_kind)));
            assert_eq!(lexer.slice(), expected_lexeme);
        }

        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn number_with_spaces() {
        compare_tokens(
            "3 9,5",
            [
                (TokenKind::Digits, "3"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Digits, "9"),
                (TokenKind::Comma, ","),
                (TokenKind::Digits, "5"),
            ],
        );
    }

    #[test]
    fn implicit_product() {
        compare_tokens(
            "2ab<=c",
            [
                (TokenKind::Digits, "2"),
                (TokenKind::Letter, "a"),
                (TokenKind::Letter, "b"),
                (TokenKind::LessEq, "<="),
                (TokenKind::Letter, "c"),
            ],
        );
    }

    #[test]
    fn template() {
        compare_tokens(
            "$ei[2;9]\\{5}$$2{$1}",
            [
                (TokenKind::Dollar, "$"),
                (TokenKind::Letter, "e"),
                (TokenKind::Letter, "i"),
                (TokenKind::OpenSquare, "["),
                (TokenKind::Digits, "2"),
                (TokenKind::Semicolon, ";"),
                (TokenKind::Digits, "9"),
                (TokenKind::CloseSquare, "]"),
                (TokenKind::Backslash, "\\"),
                (TokenKind::OpenCurly, "{"),
                (TokenKind::Digits, "5"),
                (TokenKind::CloseCurly, "}"),
                (TokenKind::DoubleDollar, "$$"),
                (TokenKind::Digits, "2"),
                (TokenKind::OpenCurly, "{"),
                (TokenKind::Dollar, "$"),
                (TokenKind::Digits, "1"),
                (TokenKind::CloseCurly, "}"),
            ],
        );
    }

    #[test]
    fn unknown_characters() {
        let tokens = tokenize_complete("a&é");
        let kinds = tokens.iter().map(|t| t.kind).collect::<Vec<_>>();
        assert_eq!(kinds, vec![TokenKind::Letter, TokenKind::Symbol, TokenKind::Symbol]);
        assert_eq!(tokens[2].lexeme, "é");
    }
}
