//! Compiled rules and predicate evaluation
//!
//! Expressions evaluate under three-valued logic: a missing fact reads as
//! null, `AND` is false-dominant, `OR` is true-dominant, and comparisons
//! with a null operand are null. At the rule boundary null coerces to
//! false. This null handling is part of the business-rule protocol, not an
//! error path.

use indexmap::{IndexMap, IndexSet};
use qofr_ast::{BinaryOp, Expression, Literal, RuleAction, RuleDef, UnaryOp};
use qofr_diagnostics::Result;
use qofr_model::{FactDictionary, FactValue, Patient};
use rust_decimal::Decimal;

use crate::compile::{check_predicate, Scope};
use crate::error::{EvalError, EvalResult};

/// Outputs of rules already evaluated for the current patient
pub type RuleOutputs = IndexMap<String, bool>;

/// A rule whose predicate has been parsed, resolved and kind-checked
#[derive(Debug, Clone)]
pub struct CompiledRule {
    /// Rule name (also the result column name)
    pub name: String,
    /// Action taken when the predicate is true
    pub action: RuleAction,
    expr: Expression,
}

impl CompiledRule {
    /// Compile a rule definition within a chain
    ///
    /// `earlier_rules` are the names this rule may reference; `all_rules`
    /// is used to distinguish forward references from undefined facts.
    pub fn compile(
        def: &RuleDef,
        dictionary: &FactDictionary,
        earlier_rules: &IndexSet<String>,
        all_rules: &IndexSet<String>,
    ) -> Result<Self> {
        let expr = qofr_parser::parse_predicate(&def.predicate)?;
        let scope = Scope {
            dictionary,
            rule_name: Some(&def.name),
            earlier_rules,
            all_rules,
        };
        check_predicate(&expr, &scope)?;

        Ok(Self {
            name: def.name.clone(),
            action: def.action,
            expr,
        })
    }

    /// Compile a standalone predicate (register, eligibility, achievement)
    /// that cannot reference any rules
    pub fn standalone(
        name: impl Into<String>,
        predicate: &str,
        dictionary: &FactDictionary,
    ) -> Result<Self> {
        let name = name.into();
        let expr = qofr_parser::parse_predicate(predicate)?;
        let empty = IndexSet::new();
        let scope = Scope {
            dictionary,
            rule_name: Some(&name),
            earlier_rules: &empty,
            all_rules: &empty,
        };
        check_predicate(&expr, &scope)?;

        Ok(Self {
            name,
            action: RuleAction::Next,
            expr,
        })
    }

    /// Evaluate the rule for one patient, coercing null to false
    pub fn evaluate(&self, patient: &Patient, outputs: &RuleOutputs) -> EvalResult<bool> {
        match eval_expression(&self.expr, patient, outputs)? {
            FactValue::Boolean(b) => Ok(b),
            FactValue::Null => Ok(false),
            _ => Err(EvalError::non_boolean(&self.name)),
        }
    }
}

/// Evaluate an expression to a fact value
///
/// Rule references shadow facts of the same name; compilation guarantees
/// they never collide.
fn eval_expression(
    expr: &Expression,
    patient: &Patient,
    outputs: &RuleOutputs,
) -> EvalResult<FactValue> {
    match expr {
        Expression::Literal(lit) => Ok(literal_value(lit)),

        Expression::Reference(id) => {
            if let Some(b) = outputs.get(&id.name) {
                return Ok(FactValue::Boolean(*b));
            }
            Ok(patient.fact(&id.name).clone())
        }

        Expression::BinaryOp(e) if e.op == BinaryOp::And => {
            let left = eval_expression(&e.left, patient, outputs)?;
            let right = eval_expression(&e.right, patient, outputs)?;
            eval_and(left, right)
        }

        Expression::BinaryOp(e) if e.op == BinaryOp::Or => {
            let left = eval_expression(&e.left, patient, outputs)?;
            let right = eval_expression(&e.right, patient, outputs)?;
            eval_or(left, right)
        }

        Expression::BinaryOp(e) => {
            let left = eval_expression(&e.left, patient, outputs)?;
            let right = eval_expression(&e.right, patient, outputs)?;
            eval_comparison(left, e.op, right)
        }

        Expression::UnaryOp(e) => {
            debug_assert_eq!(e.op, UnaryOp::Not);
            let operand = eval_expression(&e.operand, patient, outputs)?;
            eval_not(operand)
        }
    }
}

/// And with three-valued logic: false dominates, null is contagious
/// otherwise
fn eval_and(left: FactValue, right: FactValue) -> EvalResult<FactValue> {
    match (&left, &right) {
        (FactValue::Boolean(false), _) | (_, FactValue::Boolean(false)) => {
            Ok(FactValue::Boolean(false))
        }
        (FactValue::Boolean(true), FactValue::Boolean(true)) => Ok(FactValue::Boolean(true)),
        (FactValue::Null, _) | (_, FactValue::Null) => Ok(FactValue::Null),
        _ => Err(EvalError::invalid_comparison(
            kind_name(&left),
            kind_name(&right),
        )),
    }
}

/// Or with three-valued logic: true dominates, null is contagious
/// otherwise
fn eval_or(left: FactValue, right: FactValue) -> EvalResult<FactValue> {
    match (&left, &right) {
        (FactValue::Boolean(true), _) | (_, FactValue::Boolean(true)) => {
            Ok(FactValue::Boolean(true))
        }
        (FactValue::Boolean(false), FactValue::Boolean(false)) => Ok(FactValue::Boolean(false)),
        (FactValue::Null, _) | (_, FactValue::Null) => Ok(FactValue::Null),
        _ => Err(EvalError::invalid_comparison(
            kind_name(&left),
            kind_name(&right),
        )),
    }
}

/// Not: null stays null
fn eval_not(operand: FactValue) -> EvalResult<FactValue> {
    match operand {
        FactValue::Boolean(b) => Ok(FactValue::Boolean(!b)),
        FactValue::Null => Ok(FactValue::Null),
        other => Err(EvalError::invalid_comparison("boolean", kind_name(&other))),
    }
}

/// Compare two values; a null operand yields null
fn eval_comparison(left: FactValue, op: BinaryOp, right: FactValue) -> EvalResult<FactValue> {
    use std::cmp::Ordering;

    if left.is_null() || right.is_null() {
        return Ok(FactValue::Null);
    }

    let ordering = match (&left, &right) {
        (FactValue::Number(a), FactValue::Number(b)) => a.cmp(b),
        (FactValue::Date(a), FactValue::Date(b)) => a.cmp(b),
        (FactValue::Category(a), FactValue::Category(b)) => {
            return equality_only(op, a == b, &left, &right);
        }
        (FactValue::Boolean(a), FactValue::Boolean(b)) => {
            return equality_only(op, a == b, &left, &right);
        }
        _ => {
            return Err(EvalError::invalid_comparison(
                kind_name(&left),
                kind_name(&right),
            ));
        }
    };

    let result = match op {
        BinaryOp::Equal => ordering == Ordering::Equal,
        BinaryOp::NotEqual => ordering != Ordering::Equal,
        BinaryOp::Less => ordering == Ordering::Less,
        BinaryOp::LessOrEqual => ordering != Ordering::Greater,
        BinaryOp::Greater => ordering == Ordering::Greater,
        BinaryOp::GreaterOrEqual => ordering != Ordering::Less,
        BinaryOp::And | BinaryOp::Or => {
            return Err(EvalError::internal("logical operator in comparison"));
        }
    };

    Ok(FactValue::Boolean(result))
}

fn equality_only(
    op: BinaryOp,
    equal: bool,
    left: &FactValue,
    right: &FactValue,
) -> EvalResult<FactValue> {
    match op {
        BinaryOp::Equal => Ok(FactValue::Boolean(equal)),
        BinaryOp::NotEqual => Ok(FactValue::Boolean(!equal)),
        _ => Err(EvalError::invalid_comparison(
            kind_name(left),
            kind_name(right),
        )),
    }
}

fn literal_value(lit: &Literal) -> FactValue {
    match lit {
        Literal::Boolean(b) => FactValue::Boolean(*b),
        Literal::Integer(i) => FactValue::Number(Decimal::from(*i)),
        Literal::Decimal(d) => FactValue::Number(*d),
        Literal::Date(d) => FactValue::Date(*d),
        Literal::String(s) => FactValue::Category(s.clone()),
    }
}

fn kind_name(value: &FactValue) -> String {
    match value.kind() {
        Some(kind) => kind.to_string(),
        None => "null".to_string(),
    }
}
