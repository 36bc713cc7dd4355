//! Expression AST nodes for the predicate dialect
//!
//! Predicates are small boolean expression trees: atoms are fact/rule
//! references, literals and comparisons; combinators are AND, OR and NOT.
//! Trees are built once at chain construction and evaluated per patient.

use crate::{BinaryOp, Identifier, Literal, UnaryOp};
use serde::{Deserialize, Serialize};

/// A predicate expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// A literal value
    Literal(Literal),
    /// A reference to a fact or an earlier rule
    Reference(Identifier),
    /// A binary operation (logical or comparison)
    BinaryOp(BinaryOpExpr),
    /// A unary operation (NOT)
    UnaryOp(UnaryOpExpr),
}

/// A binary operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryOpExpr {
    /// Left operand
    pub left: Box<Expression>,
    /// The operator
    pub op: BinaryOp,
    /// Right operand
    pub right: Box<Expression>,
}

/// A unary operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryOpExpr {
    /// The operator
    pub op: UnaryOp,
    /// The operand
    pub operand: Box<Expression>,
}

impl Expression {
    /// Build a reference expression
    pub fn reference(name: impl Into<Identifier>) -> Self {
        Self::Reference(name.into())
    }

    /// Build a literal expression
    pub fn literal(value: impl Into<Literal>) -> Self {
        Self::Literal(value.into())
    }

    /// Build a binary operation
    pub fn binary(left: Expression, op: BinaryOp, right: Expression) -> Self {
        Self::BinaryOp(BinaryOpExpr {
            left: Box::new(left),
            op,
            right: Box::new(right),
        })
    }

    /// Build a negation
    pub fn not(operand: Expression) -> Self {
        Self::UnaryOp(UnaryOpExpr {
            op: UnaryOp::Not,
            operand: Box::new(operand),
        })
    }

    /// Visit every reference in the expression tree
    pub fn references<'a>(&'a self, visit: &mut impl FnMut(&'a Identifier)) {
        match self {
            Self::Literal(_) => {}
            Self::Reference(id) => visit(id),
            Self::BinaryOp(e) => {
                e.left.references(visit);
                e.right.references(visit);
            }
            Self::UnaryOp(e) => e.operand.references(visit),
        }
    }
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal(lit) => write!(f, "{}", lit),
            Self::Reference(id) => write!(f, "{}", id),
            Self::BinaryOp(e) => write!(f, "({} {} {})", e.left, e.op, e.right),
            Self::UnaryOp(e) => write!(f, "({} {})", e.op, e.operand),
        }
    }
}
