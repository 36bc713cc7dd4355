//! QOFR predicate parser using Winnow
//!
//! This crate parses the restricted boolean predicate dialect used by
//! quality-indicator business rules, using recursive descent with
//! precedence climbing. `#` line comments are stripped before parsing.

mod combinators;
mod expression;

pub use combinators::preprocess;

use qofr_ast::Expression;
use qofr_diagnostics::{QofError, Result, SourceLocation, QOF0001, QOF0002};
use winnow::combinator::eof;
use winnow::error::ContextError;
use winnow::prelude::*;

/// Parse a predicate into an expression tree
///
/// The whole input must be consumed; trailing tokens are a parse error.
pub fn parse_predicate(source: &str) -> Result<Expression> {
    let cleaned = preprocess(source);
    let mut input: &str = &cleaned;

    let expr = expression::expression_parser(&mut input)
        .map_err(|e| QofError::parse(QOF0001, format!("Parse error: {:?}", e), source))?;

    combinators::ws(&mut input).ok();
    if eof::<_, ContextError>.parse_next(&mut input).is_err() {
        let offset = cleaned.len() - input.len();
        let location = SourceLocation::from_span((offset..cleaned.len()).into(), &cleaned);
        return Err(QofError::parse_at(
            QOF0002,
            format!("Unexpected trailing input: '{}'", input.trim_end()),
            source,
            location,
        ));
    }

    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qofr_ast::{BinaryOp, Expression, Literal};

    #[test]
    fn test_parse_simple_reference() {
        let expr = parse_predicate("hyp_reg").unwrap();
        assert!(matches!(expr, Expression::Reference(id) if id.name == "hyp_reg"));
    }

    #[test]
    fn test_parse_population_predicate() {
        // The general-population filter, as written in protocol definitions
        let source = r#"
            # Define general population parameters
            gms_reg_status AND
            (NOT died) AND
            (sex = 'F' OR sex = 'M') AND
            (age_band != 'missing')
        "#;
        let expr = parse_predicate(source).unwrap();

        // Left-associative AND spine, NOT nested inside
        let Expression::BinaryOp(top) = expr else {
            panic!("Expected BinaryOp");
        };
        assert_eq!(top.op, BinaryOp::And);
    }

    #[test]
    fn test_parse_trailing_input_fails() {
        let err = parse_predicate("died extra )").unwrap_err();
        assert_eq!(err.code(), QOF0002);
        assert!(err.location().is_some());
    }

    #[test]
    fn test_parse_unbalanced_parens_fails() {
        assert!(parse_predicate("(died AND sex = 'F'").is_err());
    }

    #[test]
    fn test_parse_comment_only_fails() {
        assert!(parse_predicate("# nothing here").is_err());
    }

    #[test]
    fn test_parse_threshold_comparison() {
        let expr = parse_predicate("bp_sys_value <= 140").unwrap();
        let Expression::BinaryOp(cmp) = expr else {
            panic!("Expected BinaryOp");
        };
        assert_eq!(cmp.op, BinaryOp::LessOrEqual);
        assert_eq!(*cmp.right, Expression::Literal(Literal::Integer(140)));
    }
}
