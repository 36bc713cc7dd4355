//! Tests for parsing predicate literal values
//!
//! Covers the dialect's literal types:
//! - Booleans
//! - Integers
//! - Decimals
//! - Strings (single-quoted categories)
//! - Dates (@YYYY-MM-DD)

use chrono::NaiveDate;
use qofr_ast::{Expression, Literal};
use qofr_parser::parse_predicate;
use rstest::rstest;
use rust_decimal::Decimal;
use std::str::FromStr;

fn parse_expr(input: &str) -> Expression {
    parse_predicate(input).unwrap_or_else(|e| panic!("Failed to parse '{}': {:?}", input, e))
}

fn assert_literal(expr: &Expression) -> &Literal {
    match expr {
        Expression::Literal(lit) => lit,
        _ => panic!("Expected Literal, got: {:?}", expr),
    }
}

#[rstest]
#[case("true", true)]
#[case("TRUE", true)]
#[case("false", false)]
#[case("False", false)]
fn test_boolean(#[case] input: &str, #[case] expected: bool) {
    let expr = parse_expr(input);
    let lit = assert_literal(&expr);
    assert_eq!(lit, &Literal::Boolean(expected));
}

#[test]
fn test_integer() {
    let expr = parse_expr("140");
    let lit = assert_literal(&expr);
    assert!(matches!(lit, Literal::Integer(140)));
}

#[test]
fn test_integer_negative() {
    let expr = parse_expr("-5");
    let lit = assert_literal(&expr);
    assert!(matches!(lit, Literal::Integer(-5)));
}

#[test]
fn test_decimal() {
    let expr = parse_expr("90.5");
    let lit = assert_literal(&expr);
    assert_eq!(lit, &Literal::Decimal(Decimal::from_str("90.5").unwrap()));
}

#[test]
fn test_string_category() {
    let expr = parse_expr("'F'");
    let lit = assert_literal(&expr);
    assert_eq!(lit, &Literal::String("F".to_string()));
}

#[test]
fn test_string_with_space() {
    let expr = parse_expr("'North East'");
    let lit = assert_literal(&expr);
    assert_eq!(lit, &Literal::String("North East".to_string()));
}

#[test]
fn test_string_escaped_quote() {
    let expr = parse_expr("'it''s'");
    let lit = assert_literal(&expr);
    assert_eq!(lit, &Literal::String("it's".to_string()));
}

#[test]
fn test_date() {
    let expr = parse_expr("@2022-03-31");
    let lit = assert_literal(&expr);
    assert_eq!(
        lit,
        &Literal::Date(NaiveDate::from_ymd_opt(2022, 3, 31).unwrap())
    );
}

#[test]
fn test_date_invalid_month_fails() {
    assert!(parse_predicate("@2022-13-01").is_err());
}

#[test]
fn test_unterminated_string_fails() {
    assert!(parse_predicate("'missing").is_err());
}
