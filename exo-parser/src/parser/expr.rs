//! The expression grammar, from lowest to highest precedence:
//!
//! | Level     | Operators                                   | Associativity |
//! | --------- | ------------------------------------------- | ------------- |
//! | relation  | `=` `!=` `<` `<=` `>` `>=` (at most one)    | none          |
//! | sum       | `+` `-`, with an optional leading sign      | left          |
//! | term      | `*` `:` `/`                                 | left          |
//! | implicit  | juxtaposition, such as `2ab` or `3(a+b)`    | left          |
//! | power     | `^`, followed by an optional unit           | left          |
//! | operand   | a primary, optionally followed by `%`       |               |
//!
//! A leading sign applies to the whole first term, so `-2*3` is the opposite of `2*3`. Signs
//! are not accepted after a binary operator: `1+-2` must be written `1+(-2)`.

use exo_error::Error;
use super::{
    error::{ExpectedExpr, UnexpectedToken},
    template::parse_template,
    Parse,
    Parser,
};
use crate::{
    node::{number::Number, Expr, Node, Relation},
    tokenizer::TokenKind,
};

/// The functions that can be called, such as `pgcd(12;18)`.
pub const FUNCTIONS: &[&str] = &[
    "sqrt", "cos", "sin", "tan", "ln", "log", "exp", "pgcd", "mod", "floor", "abs", "round",
];

/// The units that can follow a quantity, such as `3 km`.
pub const UNITS: &[&str] = &[
    "km", "hm", "dam", "m", "dm", "cm", "mm",
    "kL", "hL", "daL", "L", "dL", "cL", "mL",
    "kg", "hg", "dag", "g", "dg", "cg", "mg",
    "h", "min", "s", "ms",
];

impl Parse for Node {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        parse_relation(input)
    }
}

/// Parses `sum` or `sum <relation> sum`.
pub fn parse_relation(input: &mut Parser) -> Result<Node, Error> {
    let lhs = parse_sum(input)?;

    let relation = input.try_parse_with_fn(|input| {
        let token = input.next_token()?;
        match token.kind {
            TokenKind::Eq => Ok(None),
            TokenKind::NotEq => Ok(Some(None)),
            TokenKind::Less => Ok(Some(Some(Relation::Less))),
            TokenKind::LessEq => Ok(Some(Some(Relation::LessEq))),
            TokenKind::Greater => Ok(Some(Some(Relation::Greater))),
            TokenKind::GreaterEq => Ok(Some(Some(Relation::GreaterEq))),
            found => Err(input.error(UnexpectedToken {
                expected: &[TokenKind::Eq, TokenKind::NotEq, TokenKind::Less, TokenKind::LessEq, TokenKind::Greater, TokenKind::GreaterEq],
                found,
            })),
        }
    });

    let Ok(relation) = relation else {
        return Ok(lhs);
    };

    let (lhs, rhs) = (Box::new(lhs), Box::new(parse_sum(input)?));
    let expr = match relation {
        None => Expr::Equality(lhs, rhs),
        Some(None) => Expr::Unequality(lhs, rhs),
        Some(Some(relation)) => Expr::Inequality(relation, lhs, rhs),
    };
    Ok(Node::new(expr))
}

/// Consumes the next token if it is one of `kinds`, returning its kind.
fn operator(input: &mut Parser, kinds: &'static [TokenKind]) -> Option<TokenKind> {
    input.try_parse_with_fn(|input| input.expect(kinds)).ok().map(|token| token.kind)
}

/// Parses a sum of terms, with an optional leading sign.
pub fn parse_sum(input: &mut Parser) -> Result<Node, Error> {
    let sign = operator(input, &[TokenKind::Add, TokenKind::Sub]);
    let first = parse_term(input)?;
    let mut acc = match sign {
        Some(TokenKind::Add) => first.positive(),
        Some(_) => first.oppose(),
        None => first,
    };

    while let Some(op) = operator(input, &[TokenKind::Add, TokenKind::Sub]) {
        let rhs = parse_term(input)?;
        acc = if op == TokenKind::Add { acc.add(rhs) } else { acc.sub(rhs) };
    }

    Ok(acc)
}

/// Parses factors separated by `*`, `:` or `/`.
fn parse_term(input: &mut Parser) -> Result<Node, Error> {
    let mut acc = parse_implicit(input)?;

    while let Some(op) = operator(input, &[TokenKind::Mul, TokenKind::Colon, TokenKind::Slash]) {
        let rhs = parse_implicit(input)?;
        acc = match op {
            TokenKind::Mul => acc.mult(rhs),
            TokenKind::Colon => acc.div(rhs),
            _ => acc.frac(rhs),
        };
    }

    Ok(acc)
}

/// Parses an implicit product, such as `2ab` or `3(x+1)`. An implicit factor may not start with
/// a digit, since digits following a number belong to that number.
fn parse_implicit(input: &mut Parser) -> Result<Node, Error> {
    let mut acc = parse_power(input)?;

    loop {
        let starts_factor = input.peek().map_or(false, |token| matches!(
            token.kind,
            TokenKind::Letter | TokenKind::OpenParen | TokenKind::Question | TokenKind::Dollar | TokenKind::DoubleDollar
        ));
        if !starts_factor {
            break;
        }

        match input.try_parse_with_fn(parse_power) {
            Ok(rhs) => acc = acc.mult(rhs),
            Err(_) => break,
        }
    }

    Ok(acc)
}

/// Parses `operand ^ operand ^ ...`, left associative, followed by an optional unit.
pub fn parse_power(input: &mut Parser) -> Result<Node, Error> {
    let mut acc = parse_operand(input)?;

    while operator(input, &[TokenKind::Caret]).is_some() {
        let rhs = parse_operand(input)?;
        acc = acc.pow(rhs);
    }

    if let Ok(unit) = input.try_parse_with_fn(parse_unit) {
        acc.unit = Some(Box::new(unit));
    }

    Ok(acc)
}

/// Parses a unit: whitespace, then a run of letters naming a known unit.
fn parse_unit(input: &mut Parser) -> Result<Node, Error> {
    if !input.at(TokenKind::Whitespace) {
        return Err(input.error(ExpectedExpr { found: String::new() }));
    }
    input.next_raw();

    let word = letters(input);
    if UNITS.contains(&word.as_str()) {
        consume(input, word.len());
        Ok(Node::symbol(word))
    } else {
        Err(input.error(ExpectedExpr { found: word }))
    }
}

/// Parses a primary, optionally followed by `%`.
fn parse_operand(input: &mut Parser) -> Result<Node, Error> {
    let primary = parse_primary(input)?;
    if input.at(TokenKind::Percent) {
        input.next_raw();
        return Ok(Node::new(Expr::Percentage(Box::new(primary))));
    }
    Ok(primary)
}

/// Returns the run of letters starting at the cursor, without consuming it.
fn letters(input: &Parser) -> String {
    input.remaining()
        .iter()
        .take_while(|token| token.kind == TokenKind::Letter)
        .map(|token| token.lexeme)
        .collect()
}

/// Consumes `count` tokens without skipping whitespace.
fn consume(input: &mut Parser, count: usize) {
    for _ in 0..count {
        input.next_raw();
    }
}

/// Parses a number, a name, a hole, a bracket or a template.
fn parse_primary(input: &mut Parser) -> Result<Node, Error> {
    let Some(token) = input.peek().cloned() else {
        return Err(input.error(super::error::UnexpectedEof));
    };

    match token.kind {
        TokenKind::Digits | TokenKind::Dot | TokenKind::Comma => parse_number(input),
        TokenKind::Letter => parse_name(input),
        TokenKind::Question => {
            input.next_token()?;
            Ok(Node::hole())
        },
        TokenKind::OpenParen => {
            input.next_token()?;
            let inner = parse_relation(input)?;
            input.expect(&[TokenKind::CloseParen])?;
            Ok(inner.bracket())
        },
        TokenKind::Dollar | TokenKind::DoubleDollar => parse_template(input),
        _ => {
            input.skip_whitespace();
            Err(input.error(ExpectedExpr { found: token.lexeme.to_owned() }))
        },
    }
}

/// Parses a number whose digit groups may be separated by whitespace, with an optional
/// fractional part introduced by `.` or `,`.
fn parse_number(input: &mut Parser) -> Result<Node, Error> {
    let mut integer = String::new();
    let mut fraction = String::new();

    while let Ok(token) = input.try_parse_with_fn(|input| input.expect(&[TokenKind::Digits])) {
        integer.push_str(token.lexeme);
    }

    let separator = input.try_parse_with_fn(|input| {
        input.expect(&[TokenKind::Dot, TokenKind::Comma])?;
        input.expect(&[TokenKind::Digits])
    });
    if let Ok(token) = separator {
        fraction.push_str(token.lexeme);
        while let Ok(token) = input.try_parse_with_fn(|input| input.expect(&[TokenKind::Digits])) {
            fraction.push_str(token.lexeme);
        }
    }

    if integer.is_empty() && fraction.is_empty() {
        let found = input.peek().map_or_else(String::new, |token| token.lexeme.to_owned());
        return Err(input.error(ExpectedExpr { found }));
    }

    Number::from_parts(&integer, &fraction)
        .map(Node::number)
        .ok_or_else(|| input.error(ExpectedExpr { found: format!("{}.{}", integer, fraction) }))
}

/// Parses a function call, a keyword, a segment length or a single-letter symbol.
fn parse_name(input: &mut Parser) -> Result<Node, Error> {
    input.skip_whitespace();
    let word = letters(input);

    if FUNCTIONS.contains(&word.as_str()) {
        let call = input.try_parse_with_fn(|input| {
            consume(input, word.len());
            input.expect(&[TokenKind::OpenParen])?;
            let mut args = vec![parse_relation(input)?];
            while input.expect(&[TokenKind::Semicolon, TokenKind::CloseParen])?.kind == TokenKind::Semicolon {
                args.push(parse_relation(input)?);
            }
            Ok(Node::function(word.clone(), args))
        });
        if let Ok(call) = call {
            return Ok(call);
        }
    }

    match word.as_str() {
        "true" | "false" => {
            consume(input, word.len());
            return Ok(Node::new(Expr::Boolean(word == "true")));
        },
        "pi" => {
            consume(input, 2);
            return Ok(Node::symbol("pi"));
        },
        _ => {},
    }

    let mut chars = word.chars();
    match (chars.next(), chars.next()) {
        (Some(a), Some(b)) if a.is_ascii_uppercase() && b.is_ascii_uppercase() => {
            consume(input, 2);
            Ok(Node::new(Expr::SegmentLength(format!("{}{}", a, b))))
        },
        (Some(a), _) => {
            consume(input, 1);
            Ok(Node::symbol(a))
        },
        (None, _) => {
            let found = input.peek().map_or_else(String::new, |token| token.lexeme.to_owned());
            Err(input.error(ExpectedExpr { found }))
        },
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use crate::{parse, Kind};

    fn shape(text: &str) -> (Kind, Vec<Kind>) {
        let node = parse(text).unwrap();
        (node.kind(), node.children().into_iter().map(Node::kind).collect())
    }

    #[test]
    fn numbers() {
        assert_eq!(parse("00123,445").unwrap().to_string(), "123.445");
        assert_eq!(parse("123,44500").unwrap().to_string(), "123.445");
        assert_eq!(parse("3 9 8 9").unwrap().to_string(), "3989");
        assert_eq!(parse("  1 23  ,4 45 0 0 ").unwrap().to_string(), "123.445");
        assert_eq!(parse("3 + 7").unwrap().to_string(), "3+7");
    }

    #[test]
    fn leaves() {
        assert_eq!(parse("?").unwrap(), Node::hole());
        assert_eq!(parse("AB").unwrap().kind(), Kind::SegmentLength);
        assert_eq!(parse("a").unwrap(), Node::symbol("a"));
        assert_eq!(parse("pi").unwrap(), Node::symbol("pi"));
        assert_eq!(parse("true").unwrap(), Node::new(Expr::Boolean(true)));
    }

    #[test]
    fn round_trips() {
        for text in [
            "-1", "+1", "(3)", "1+1", "1-1", "1*1", "1:1", "1/1", "1^1", "1/2^3",
            "-(((+3.4+4/3)*2:(-4-5^2)))", "1=1", "1!=1", "1<1", "1<=1", "1>1", "1>=1",
            "pgcd(12;18)", "mod(15;4)", "cos(5)", "floor(5.2)", "abs(-5)", "23%",
            "1 km=1000 m", "2 min",
        ] {
            assert_eq!(parse(text).unwrap().to_string(), text);
        }
    }

    #[test]
    fn precedence() {
        assert_eq!(shape("1+1+1"), (Kind::Sum, vec![Kind::Sum, Kind::Number]));
        assert_eq!(shape("1+1*1"), (Kind::Sum, vec![Kind::Number, Kind::Product]));
        assert_eq!(shape("1*1/1"), (Kind::Quotient, vec![Kind::Product, Kind::Number]));
        assert_eq!(shape("1:1/1"), (Kind::Quotient, vec![Kind::Division, Kind::Number]));
        assert_eq!(shape("1/1:1"), (Kind::Division, vec![Kind::Quotient, Kind::Number]));
        assert_eq!(shape("1^1^1"), (Kind::Power, vec![Kind::Power, Kind::Number]));
        assert_eq!(shape("1/1^1"), (Kind::Quotient, vec![Kind::Number, Kind::Power]));
        assert_eq!(shape("1-(1+1)"), (Kind::Difference, vec![Kind::Number, Kind::Bracket]));
    }

    #[test]
    fn leading_signs() {
        assert_eq!(shape("-1+2"), (Kind::Sum, vec![Kind::Opposite, Kind::Number]));
        assert_eq!(shape("-1*2"), (Kind::Opposite, vec![Kind::Product]));
        assert_eq!(shape("+1/2"), (Kind::Positive, vec![Kind::Quotient]));
        assert_eq!(shape("-(1+2)"), (Kind::Opposite, vec![Kind::Bracket]));
        assert!(parse("1+-2").is_err());
    }

    #[test]
    fn implicit_products() {
        assert_eq!(shape("abc"), (Kind::Product, vec![Kind::Product, Kind::Symbol]));
        assert_eq!(shape("ab:c"), (Kind::Division, vec![Kind::Product, Kind::Symbol]));
        assert_eq!(shape("ab:c*d"), (Kind::Product, vec![Kind::Division, Kind::Symbol]));
        assert_eq!(shape("x^yz"), (Kind::Product, vec![Kind::Power, Kind::Symbol]));
        assert_eq!(shape("ax^y"), (Kind::Product, vec![Kind::Symbol, Kind::Power]));
        assert_eq!(parse("2ab+cab").unwrap().to_string(), "2*a*b+c*a*b");
        assert_eq!(parse("2(a+b)").unwrap().to_string(), "2*(a+b)");
    }

    #[test]
    fn functions_accept_spaces_before_parens() {
        assert_eq!(parse("ln (1+2)").unwrap().to_string(), "ln(1+2)");
        assert_eq!(parse("2cos(x)").unwrap().to_string(), "2*cos(x)");
    }

    #[test]
    fn units() {
        let node = parse("3 km").unwrap();
        assert_eq!(node.unit.as_deref(), Some(&Node::symbol("km")));
        assert_eq!(node.expr, Expr::Number(Number::from(3)));

        // a letter that is not a unit is an implicit factor
        assert_eq!(shape("2 x"), (Kind::Product, vec![Kind::Number, Kind::Symbol]));
    }

    #[test]
    fn errors() {
        assert!(parse("(1+2").is_err());
        assert!(parse("1+").is_err());
        assert!(parse("1 2 )").is_err());
        assert!(parse("&").is_err());
    }
}
