//! Expression parser using recursive descent with precedence climbing
//!
//! Precedence, loosest to tightest: OR, AND, NOT, comparison. Comparison
//! does not chain (`a < b < c` is rejected); the operands of a comparison
//! are primaries only.

use crate::combinators::{
    boolean_parser, date_literal_parser, identifier_parser, lit, number_parser, padded_keyword,
    string_parser, ws, Input, PResult,
};
use qofr_ast::{BinaryOp, Expression, Literal};
use winnow::prelude::*;

/// Parse a predicate expression (entry point)
pub fn expression_parser<'a>(input: &mut Input<'a>) -> PResult<Expression> {
    ws.parse_next(input)?;
    or_expression(input)
}

/// Parse an OR expression (lowest precedence)
fn or_expression<'a>(input: &mut Input<'a>) -> PResult<Expression> {
    let mut left = and_expression(input)?;

    loop {
        if padded_keyword("or").parse_next(input).is_ok() {
            let right = and_expression(input)?;
            left = Expression::binary(left, BinaryOp::Or, right);
        } else {
            break;
        }
    }

    Ok(left)
}

/// Parse an AND expression
fn and_expression<'a>(input: &mut Input<'a>) -> PResult<Expression> {
    let mut left = not_expression(input)?;

    loop {
        if padded_keyword("and").parse_next(input).is_ok() {
            let right = not_expression(input)?;
            left = Expression::binary(left, BinaryOp::And, right);
        } else {
            break;
        }
    }

    Ok(left)
}

/// Parse a NOT expression (right-recursive so `NOT NOT x` nests)
fn not_expression<'a>(input: &mut Input<'a>) -> PResult<Expression> {
    if padded_keyword("not").parse_next(input).is_ok() {
        let operand = not_expression(input)?;
        return Ok(Expression::not(operand));
    }

    comparison_expression(input)
}

/// Parse a comparison or a bare primary
fn comparison_expression<'a>(input: &mut Input<'a>) -> PResult<Expression> {
    let left = primary_expression(input)?;
    ws.parse_next(input)?;

    let op = if lit("<=").parse_next(input).is_ok() {
        Some(BinaryOp::LessOrEqual)
    } else if lit(">=").parse_next(input).is_ok() {
        Some(BinaryOp::GreaterOrEqual)
    } else if lit("!=").parse_next(input).is_ok() {
        Some(BinaryOp::NotEqual)
    } else if lit("=").parse_next(input).is_ok() {
        Some(BinaryOp::Equal)
    } else if lit("<").parse_next(input).is_ok() {
        Some(BinaryOp::Less)
    } else if lit(">").parse_next(input).is_ok() {
        Some(BinaryOp::Greater)
    } else {
        None
    };

    if let Some(op) = op {
        ws.parse_next(input)?;
        let right = primary_expression(input)?;
        Ok(Expression::binary(left, op, right))
    } else {
        Ok(left)
    }
}

/// Parse a primary: parenthesized expression, literal, or reference
fn primary_expression<'a>(input: &mut Input<'a>) -> PResult<Expression> {
    ws.parse_next(input)?;

    // Parenthesized group
    if lit("(").parse_next(input).is_ok() {
        let inner = or_expression(input)?;
        ws.parse_next(input)?;
        lit(")").parse_next(input)?;
        return Ok(inner);
    }

    // Boolean keyword
    let checkpoint = *input;
    if let Ok(b) = boolean_parser(input) {
        return Ok(Expression::Literal(Literal::Boolean(b)));
    }
    *input = checkpoint;

    // Date literal
    if input.starts_with('@') {
        let date = date_literal_parser(input)?;
        return Ok(Expression::Literal(Literal::Date(date)));
    }

    // String literal
    if input.starts_with('\'') {
        let value = string_parser(input)?;
        return Ok(Expression::Literal(Literal::String(value)));
    }

    // Number
    if input.starts_with(|c: char| c.is_ascii_digit() || c == '-') {
        let checkpoint = *input;
        match number_parser(input) {
            Ok(lit) => return Ok(Expression::Literal(lit)),
            Err(e) => {
                *input = checkpoint;
                return Err(e);
            }
        }
    }

    // Fact or rule reference
    let checkpoint = *input;
    match identifier_parser(input) {
        Ok(id) => Ok(Expression::Reference(id)),
        Err(e) => {
            *input = checkpoint;
            Err(e)
        }
    }
}
