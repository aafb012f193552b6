//! Template syntax.
//!
//! ```text
//! $e  $ep  $ei  $d  $l       nature, followed by the flags `r` (relative) and `s` (signed)
//! {max}  {min;max}           digit counts of `$e`, `$ep` and `$ei`
//! [min;max]                  inclusive range of `$e`, `$ep` and `$ei`
//! {i;f}  {i1:i2;f1:f2}       digit counts of the integer and fractional parts of `$d`
//! {a;b;c}                    choices of `$l`
//! ${expr}  $$p{expr}         value of an expression, as a fraction or a decimal to `p` places
//! $N  ${N}                   the Nth value generated so far
//! \{a;b}  \[a;b]             excluded values, excluded range
//! \m{a}  \d{a}  \g{a}        excluded multiples, dividers, and values sharing a divider
//! ```
//!
//! Nature letters, flags and bounds must be written without whitespace between them.

use exo_error::Error;
use super::{
    error::{InvalidTemplate, UnexpectedToken},
    expr::{parse_power, parse_relation, parse_sum},
    Parser,
};
use crate::{
    node::{
        template::{Bounds, Nature, Template},
        Expr,
        Node,
    },
    tokenizer::TokenKind,
};

fn invalid(input: &Parser, reason: impl Into<String>) -> Error {
    input.error(InvalidTemplate { reason: reason.into() })
}

/// Parses `item;item;...` up to and including the closing token. The opening token must already
/// have been consumed.
fn parse_items<T>(
    input: &mut Parser,
    close: &'static [TokenKind],
    mut item: impl FnMut(&mut Parser) -> Result<T, Error>,
) -> Result<Vec<T>, Error> {
    let mut items = vec![item(input)?];
    loop {
        let token = input.next_token()?;
        if token.kind == TokenKind::Semicolon {
            items.push(item(input)?);
        } else if close.contains(&token.kind) {
            return Ok(items);
        } else {
            input.prev();
            return Err(input.error(UnexpectedToken { expected: close, found: token.kind }));
        }
    }
}

/// Parses `a` or `a:b`, a fixed or ranged digit count of `$d`.
fn parse_span(input: &mut Parser) -> Result<(Node, Option<Node>), Error> {
    let first = parse_power(input)?;
    if input.try_parse_with_fn(|input| input.expect(&[TokenKind::Colon])).is_ok() {
        Ok((first, Some(parse_power(input)?)))
    } else {
        Ok((first, None))
    }
}

/// Parses a positive back-reference index.
fn parse_index(input: &mut Parser, lexeme: &str) -> Result<usize, Error> {
    match lexeme.parse::<usize>() {
        Ok(index) if index >= 1 => Ok(index),
        _ => Err(invalid(input, "back-references are numbered from 1")),
    }
}

/// Consumes the letter `letter` if it is the current token, without skipping whitespace.
fn eat_letter(input: &mut Parser, letter: char) -> bool {
    if input.current_token().map_or(false, |token| token.is_letter(letter)) {
        input.next_raw();
        true
    } else {
        false
    }
}

/// Parses a template placeholder, including its exclusions.
pub fn parse_template(input: &mut Parser) -> Result<Node, Error> {
    input.skip_whitespace();
    let token = input.expect(&[TokenKind::Dollar, TokenKind::DoubleDollar])?;

    let mut template = if token.kind == TokenKind::DoubleDollar {
        let precision = match input.current_token() {
            Some(token) if token.kind == TokenKind::Digits => {
                let lexeme = token.lexeme;
                let precision = lexeme.parse::<u32>().map_err(|_| invalid(input, "precision is too large"))?;
                input.next_raw();
                Some(precision)
            },
            _ => None,
        };
        if !input.at(TokenKind::OpenCurly) {
            return Err(invalid(input, "`$$` must be followed by an expression in braces"));
        }
        input.next_raw();
        let value = parse_relation(input)?;
        input.expect(&[TokenKind::CloseCurly])?;

        let mut template = Template::new(Nature::DecimalValue, Bounds::Value(value));
        template.precision = precision;
        template
    } else {
        match input.current_token().map(|token| (token.kind, token.lexeme)) {
            Some((TokenKind::Digits, lexeme)) => {
                let index = parse_index(input, lexeme)?;
                input.next_raw();
                Template::back_reference(index)
            },
            Some((TokenKind::OpenCurly, _)) => {
                input.next_raw();
                let value = parse_relation(input)?;
                input.expect(&[TokenKind::CloseCurly])?;
                match &value.expr {
                    Expr::Number(number) if value.unit.is_none() && number.is_integer() && !number.is_zero() => {
                        let index = parse_index(input, number.as_str())?;
                        Template::new(Nature::BackReference { index, braced: true }, Bounds::Unbounded)
                    },
                    _ => Template::new(Nature::Fraction, Bounds::Value(value)),
                }
            },
            Some((TokenKind::Letter, _)) => parse_drawn(input)?,
            _ => return Err(invalid(input, "expected a nature such as `e`, `d` or `l` after `$`")),
        }
    };

    parse_exclusions(input, &mut template)?;
    Ok(template.into_node())
}

/// Parses the nature, flags and bounds of `$e`, `$ep`, `$ei`, `$d` and `$l`. The cursor is on
/// the first nature letter.
fn parse_drawn(input: &mut Parser) -> Result<Template, Error> {
    let nature = if eat_letter(input, 'e') {
        if eat_letter(input, 'p') {
            Nature::EvenInteger
        } else if eat_letter(input, 'i') {
            Nature::OddInteger
        } else {
            Nature::Integer
        }
    } else if eat_letter(input, 'd') {
        Nature::Decimal
    } else if eat_letter(input, 'l') {
        Nature::List
    } else {
        return Err(invalid(input, "unknown template nature"));
    };

    let (mut relative, mut signed) = (false, false);
    loop {
        if !relative && eat_letter(input, 'r') {
            relative = true;
        } else if !signed && eat_letter(input, 's') {
            signed = true;
        } else {
            break;
        }
    }

    let bounds = match nature {
        Nature::List => {
            if !input.at(TokenKind::OpenCurly) {
                return Err(invalid(input, "`$l` must be followed by its choices in braces"));
            }
            input.next_raw();
            Bounds::Choices(parse_items(input, &[TokenKind::CloseCurly], parse_sum)?)
        },
        Nature::Decimal if input.at(TokenKind::OpenCurly) => {
            input.next_raw();
            let spans = parse_items(input, &[TokenKind::CloseCurly], parse_span)?;
            let [integer, fraction]: [_; 2] = spans.try_into()
                .map_err(|_| invalid(input, "`$d` takes the digit counts of its integer and fractional parts"))?;
            Bounds::DecimalDigits { integer, fraction }
        },
        _ if nature.is_integer() && input.at(TokenKind::OpenCurly) => {
            input.next_raw();
            let mut items = parse_items(input, &[TokenKind::CloseCurly], parse_sum)?.into_iter();
            match (items.next(), items.next(), items.next()) {
                (Some(max), None, None) => Bounds::Digits { min: None, max },
                (Some(min), Some(max), None) => Bounds::Digits { min: Some(min), max },
                _ => return Err(invalid(input, "digit bounds are `{max}` or `{min;max}`")),
            }
        },
        _ if nature.is_integer() && input.at(TokenKind::OpenSquare) => {
            input.next_raw();
            let (min, max) = parse_pair(input)?;
            Bounds::Range { min, max }
        },
        _ => Bounds::Unbounded,
    };

    let mut template = Template::new(nature, bounds);
    template.relative = relative;
    template.signed = signed;
    Ok(template)
}

/// Parses `a;b]`, the remainder of a range whose `[` has been consumed.
fn parse_pair(input: &mut Parser) -> Result<(Node, Node), Error> {
    let items = parse_items(input, &[TokenKind::CloseSquare], parse_sum)?;
    let [min, max]: [_; 2] = items.try_into()
        .map_err(|_| invalid(input, "ranges are written `[min;max]`"))?;
    Ok((min, max))
}

/// Parses any number of exclusions following a template.
fn parse_exclusions(input: &mut Parser, template: &mut Template) -> Result<(), Error> {
    while input.at(TokenKind::Backslash) {
        input.next_raw();

        let list = if input.at(TokenKind::OpenSquare) {
            input.next_raw();
            template.exclude_range = Some(parse_pair(input)?);
            continue;
        } else if input.at(TokenKind::OpenCurly) {
            &mut template.exclude
        } else if eat_letter(input, 'm') {
            &mut template.exclude_multiple
        } else if eat_letter(input, 'd') {
            &mut template.exclude_divider
        } else if eat_letter(input, 'g') {
            &mut template.exclude_common_dividers_with
        } else {
            return Err(invalid(input, "unknown exclusion; expected `\\{`, `\\[`, `\\m{`, `\\d{` or `\\g{`"));
        };

        if !input.at(TokenKind::OpenCurly) {
            return Err(invalid(input, "exclusions list their values in braces"));
        }
        input.next_raw();
        list.extend(parse_items(input, &[TokenKind::CloseCurly], parse_sum)?);
    }

    Ok(())
}
