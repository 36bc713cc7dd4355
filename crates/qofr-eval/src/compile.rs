//! Predicate compilation: reference resolution and kind checking
//!
//! Compilation walks a parsed expression once, against the declared fact
//! dictionary and the rule names defined so far, and rejects anything that
//! could fail mid-run: undefined references, forward or self references
//! between rules, comparisons over incompatible kinds, and predicates
//! whose root is not boolean-valued. After this pass the only value-level
//! surprise left at runtime is a missing fact, which reads as null.

use indexmap::IndexSet;
use qofr_ast::{BinaryOp, Expression, Literal};
use qofr_diagnostics::{QofError, Result, QOF0100, QOF0101, QOF0102, QOF0104, QOF0105};
use qofr_model::{FactDictionary, FactKind};

/// The namespace a predicate is checked against
pub(crate) struct Scope<'a> {
    /// Declared facts
    pub dictionary: &'a FactDictionary,
    /// Name of the rule being compiled, if any (self-reference check)
    pub rule_name: Option<&'a str>,
    /// Rules defined earlier in the chain (referencable)
    pub earlier_rules: &'a IndexSet<String>,
    /// Every rule name in the chain (forward-reference check)
    pub all_rules: &'a IndexSet<String>,
}

/// Check a predicate and return its inferred kind; the root must be boolean
pub(crate) fn check_predicate(expr: &Expression, scope: &Scope<'_>) -> Result<()> {
    let kind = infer_kind(expr, scope)?;
    if kind != FactKind::Boolean {
        let name = scope.rule_name.unwrap_or("<predicate>");
        return Err(QofError::definition_for(
            QOF0105,
            format!("Predicate of '{}' is {}-valued, expected boolean", name, kind),
            name,
        ));
    }
    Ok(())
}

/// Infer the kind of an expression, failing on unresolved references and
/// kind mismatches
fn infer_kind(expr: &Expression, scope: &Scope<'_>) -> Result<FactKind> {
    match expr {
        Expression::Literal(lit) => Ok(literal_kind(lit)),

        Expression::Reference(id) => {
            let name = id.name.as_str();
            if scope.earlier_rules.contains(name) {
                // Rule outputs are always boolean
                return Ok(FactKind::Boolean);
            }
            if let Some(kind) = scope.dictionary.kind_of(name) {
                return Ok(kind);
            }
            if scope.rule_name == Some(name) {
                return Err(QofError::definition_for(
                    QOF0102,
                    format!("Rule '{}' references itself", name),
                    name,
                ));
            }
            if scope.all_rules.contains(name) {
                return Err(QofError::definition_for(
                    QOF0101,
                    format!(
                        "Rule '{}' is referenced before it is defined in the chain",
                        name
                    ),
                    name,
                ));
            }
            Err(QofError::definition_for(
                QOF0100,
                format!("Undefined fact '{}'", name),
                name,
            ))
        }

        Expression::BinaryOp(e) if e.op.is_logical() => {
            let left = infer_kind(&e.left, scope)?;
            let right = infer_kind(&e.right, scope)?;
            for (side, kind) in [("left", left), ("right", right)] {
                if kind != FactKind::Boolean {
                    return Err(QofError::definition(
                        QOF0105,
                        format!(
                            "{} operand of {} is {}-valued, expected boolean",
                            side, e.op, kind
                        ),
                    ));
                }
            }
            Ok(FactKind::Boolean)
        }

        Expression::BinaryOp(e) => {
            let left = infer_kind(&e.left, scope)?;
            let right = infer_kind(&e.right, scope)?;
            check_comparison(e.op, left, right)?;
            Ok(FactKind::Boolean)
        }

        Expression::UnaryOp(e) => {
            let kind = infer_kind(&e.operand, scope)?;
            if kind != FactKind::Boolean {
                return Err(QofError::definition(
                    QOF0105,
                    format!("Operand of NOT is {}-valued, expected boolean", kind),
                ));
            }
            Ok(FactKind::Boolean)
        }
    }
}

/// Validate operand kinds for a comparison operator
fn check_comparison(op: BinaryOp, left: FactKind, right: FactKind) -> Result<()> {
    if left != right {
        return Err(QofError::definition(
            QOF0104,
            format!("Cannot compare {} with {} using {}", left, right, op),
        ));
    }

    // Ordering requires an ordered kind; equality works for every kind
    let is_ordering = matches!(
        op,
        BinaryOp::Less | BinaryOp::LessOrEqual | BinaryOp::Greater | BinaryOp::GreaterOrEqual
    );
    if is_ordering && !matches!(left, FactKind::Number | FactKind::Date) {
        return Err(QofError::definition(
            QOF0104,
            format!("Ordering comparison {} is not defined for {} values", op, left),
        ));
    }

    Ok(())
}

const fn literal_kind(lit: &Literal) -> FactKind {
    match lit {
        Literal::Boolean(_) => FactKind::Boolean,
        Literal::Integer(_) | Literal::Decimal(_) => FactKind::Number,
        Literal::Date(_) => FactKind::Date,
        Literal::String(_) => FactKind::Category,
    }
}
