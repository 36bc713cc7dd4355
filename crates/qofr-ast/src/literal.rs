//! Literal AST nodes for the predicate dialect

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A literal value in a predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    /// Boolean literal (true/false)
    Boolean(bool),
    /// Integer literal (64-bit signed)
    Integer(i64),
    /// Decimal literal (arbitrary precision)
    Decimal(Decimal),
    /// Date literal (@YYYY-MM-DD)
    Date(NaiveDate),
    /// String literal (single-quoted category value, e.g. 'F')
    String(String),
}

impl Literal {
    /// Check whether the literal is a boolean
    pub const fn is_boolean(&self) -> bool {
        matches!(self, Self::Boolean(_))
    }

    /// Check whether the literal is numeric (integer or decimal)
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::Decimal(_))
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Decimal(d) => write!(f, "{}", d),
            Self::Date(d) => write!(f, "@{}", d.format("%Y-%m-%d")),
            Self::String(s) => write!(f, "'{}'", s),
        }
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<i64> for Literal {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}
