//! Evaluation errors for the rule engine

use thiserror::Error;

/// Result type for evaluation operations
pub type EvalResult<T> = Result<T, EvalError>;

/// Errors that can occur during rule evaluation
///
/// Well-formed definitions cannot produce these at runtime: compilation
/// rejects non-boolean predicates and incompatible comparisons up front,
/// and missing facts coerce to null rather than erroring.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// A rule predicate evaluated to a non-boolean value
    #[error("Rule '{rule}' evaluated to a non-boolean value")]
    NonBooleanResult { rule: String },

    /// Operands of a comparison had incomparable kinds
    #[error("Cannot compare {left} with {right}")]
    InvalidComparison { left: String, right: String },

    /// Internal error (should not happen)
    #[error("Internal evaluation error: {message}")]
    Internal { message: String },
}

impl EvalError {
    /// Create a non-boolean result error
    pub fn non_boolean(rule: impl Into<String>) -> Self {
        Self::NonBooleanResult { rule: rule.into() }
    }

    /// Create an invalid comparison error
    pub fn invalid_comparison(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self::InvalidComparison {
            left: left.into(),
            right: right.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
