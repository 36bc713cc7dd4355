//! Common parser combinators for the predicate dialect

use qofr_ast::{Identifier, Literal};
use rust_decimal::Decimal;
use std::str::FromStr;
use winnow::ascii::digit1;
use winnow::combinator::opt;
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{one_of, take_while};

/// Parser input type
pub type Input<'a> = &'a str;

/// Parser result type
pub type PResult<T> = winnow::ModalResult<T, ContextError>;

fn backtrack() -> ErrMode<ContextError> {
    ErrMode::Backtrack(ContextError::new())
}

/// Consume zero or more whitespace characters
pub fn ws<'a>(input: &mut Input<'a>) -> PResult<()> {
    take_while(0.., char::is_whitespace)
        .void()
        .parse_next(input)
}

/// Match a literal token exactly (no surrounding whitespace handling)
pub fn lit<'a>(token: &'static str) -> impl FnMut(&mut Input<'a>) -> PResult<()> {
    move |input: &mut Input<'a>| winnow::token::literal(token).void().parse_next(input)
}

/// Match a case-insensitive keyword at a word boundary
pub fn keyword<'a>(kw: &'static str) -> impl FnMut(&mut Input<'a>) -> PResult<()> {
    move |input: &mut Input<'a>| {
        let checkpoint = *input;
        let word = word_parser(input)?;
        if word.eq_ignore_ascii_case(kw) {
            Ok(())
        } else {
            *input = checkpoint;
            Err(backtrack())
        }
    }
}

/// Match a keyword with surrounding whitespace consumed; restores the
/// input on failure so callers can probe alternatives
pub fn padded_keyword<'a>(kw: &'static str) -> impl FnMut(&mut Input<'a>) -> PResult<()> {
    move |input: &mut Input<'a>| {
        let checkpoint = *input;
        ws.parse_next(input)?;
        match keyword(kw).parse_next(input) {
            Ok(()) => {
                ws.parse_next(input)?;
                Ok(())
            }
            Err(e) => {
                *input = checkpoint;
                Err(e)
            }
        }
    }
}

/// Take one identifier-shaped word: letter or underscore, then
/// alphanumerics and underscores
fn word_parser<'a>(input: &mut Input<'a>) -> PResult<&'a str> {
    (
        one_of(('a'..='z', 'A'..='Z', '_')),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)
}

/// Parse an identifier (not a keyword)
pub fn identifier_parser<'a>(input: &mut Input<'a>) -> PResult<Identifier> {
    let checkpoint = *input;
    let word = word_parser(input)?;
    if is_keyword(word) {
        *input = checkpoint;
        return Err(backtrack());
    }
    Ok(Identifier::new(word))
}

/// Parse a boolean literal keyword
pub fn boolean_parser<'a>(input: &mut Input<'a>) -> PResult<bool> {
    if keyword("true").parse_next(input).is_ok() {
        Ok(true)
    } else if keyword("false").parse_next(input).is_ok() {
        Ok(false)
    } else {
        Err(backtrack())
    }
}

/// Parse a number (decimal or integer) returning a Literal
pub fn number_parser<'a>(input: &mut Input<'a>) -> PResult<Literal> {
    let text = (opt('-'), digit1, opt(('.', digit1)))
        .take()
        .parse_next(input)?;

    if text.contains('.') {
        Ok(Literal::Decimal(Decimal::from_str(text).unwrap_or_default()))
    } else {
        match text.parse::<i64>() {
            Ok(n) => Ok(Literal::Integer(n)),
            Err(_) => Ok(Literal::Decimal(Decimal::from_str(text).unwrap_or_default())),
        }
    }
}

/// Parse a string literal (single-quoted, `''` escapes a quote)
pub fn string_parser<'a>(input: &mut Input<'a>) -> PResult<String> {
    '\''.parse_next(input)?;
    let mut value = String::new();
    loop {
        let chunk: &str = take_while(0.., |c: char| c != '\'').parse_next(input)?;
        value.push_str(chunk);
        '\''.parse_next(input)?;
        if opt('\'').parse_next(input)?.is_some() {
            value.push('\'');
            continue;
        }
        break;
    }
    Ok(value)
}

/// Parse a date literal: @YYYY-MM-DD
pub fn date_literal_parser<'a>(input: &mut Input<'a>) -> PResult<chrono::NaiveDate> {
    let checkpoint = *input;
    '@'.parse_next(input)?;
    let year = exact_digits(input, 4)?;
    lit("-").parse_next(input)?;
    let month = exact_digits(input, 2)?;
    lit("-").parse_next(input)?;
    let day = exact_digits(input, 2)?;

    match chrono::NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32) {
        Some(date) => Ok(date),
        None => {
            *input = checkpoint;
            Err(backtrack())
        }
    }
}

fn exact_digits<'a>(input: &mut Input<'a>, count: usize) -> PResult<u64> {
    let text: &str = take_while(count..=count, |c: char| c.is_ascii_digit()).parse_next(input)?;
    text.parse().map_err(|_| backtrack())
}

/// Check if a word is a dialect keyword
pub fn is_keyword(word: &str) -> bool {
    matches!(
        word.to_ascii_lowercase().as_str(),
        "and" | "or" | "not" | "true" | "false"
    )
}

/// Preprocess predicate source: strip `#` line comments and fold
/// newlines into spaces, leaving string literals intact
pub fn preprocess(input: &str) -> String {
    let mut result = String::new();
    let mut chars = input.chars().peekable();
    let mut in_string = false;

    while let Some(ch) = chars.next() {
        match ch {
            '\'' if !in_string => {
                in_string = true;
                result.push(ch);
            }
            '\'' if in_string => {
                // Check for escaped quote
                if chars.peek() == Some(&'\'') {
                    result.push(ch);
                    result.push(chars.next().unwrap());
                } else {
                    in_string = false;
                    result.push(ch);
                }
            }
            '#' if !in_string => {
                // Line comment: skip to end of line
                result.push(' ');
                for c in chars.by_ref() {
                    if c == '\n' {
                        result.push(' ');
                        break;
                    }
                }
            }
            '\n' | '\r' | '\t' if !in_string => {
                result.push(' ');
            }
            _ => result.push(ch),
        }
    }

    result
}
