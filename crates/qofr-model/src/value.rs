//! Fact value types - runtime representation of per-patient facts
//!
//! A fact is a single typed cell in the population table. `Null`
//! represents an absent fact; the rule engine coerces it to false at rule
//! boundaries rather than treating it as an error.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::FactKind;

/// The runtime value of a single fact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum FactValue {
    /// Missing/unknown value
    Null,
    /// Binary flag
    Boolean(bool),
    /// Event or recording date
    Date(NaiveDate),
    /// Numeric measurement (e.g. a blood pressure reading)
    Number(Decimal),
    /// Categorical value (e.g. sex, region, age band)
    Category(String),
}

impl FactValue {
    /// Check if this value is null
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Check if this value is exactly Boolean(true)
    pub const fn is_true(&self) -> bool {
        matches!(self, Self::Boolean(true))
    }

    /// Check if this value is exactly Boolean(false)
    pub const fn is_false(&self) -> bool {
        matches!(self, Self::Boolean(false))
    }

    /// Try to get as a boolean
    pub const fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as a date
    pub const fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Try to get as a number
    pub const fn as_number(&self) -> Option<Decimal> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get as a category
    pub fn as_category(&self) -> Option<&str> {
        match self {
            Self::Category(c) => Some(c),
            _ => None,
        }
    }

    /// Get the declared kind this value belongs to (None for Null, which
    /// is compatible with every kind)
    pub const fn kind(&self) -> Option<FactKind> {
        match self {
            Self::Null => None,
            Self::Boolean(_) => Some(FactKind::Boolean),
            Self::Date(_) => Some(FactKind::Date),
            Self::Number(_) => Some(FactKind::Number),
            Self::Category(_) => Some(FactKind::Category),
        }
    }
}

impl fmt::Display for FactValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::Number(n) => write!(f, "{}", n),
            Self::Category(c) => write!(f, "{}", c),
        }
    }
}

impl From<bool> for FactValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<NaiveDate> for FactValue {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<Decimal> for FactValue {
    fn from(n: Decimal) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for FactValue {
    fn from(n: i64) -> Self {
        Self::Number(Decimal::from(n))
    }
}

impl From<&str> for FactValue {
    fn from(c: &str) -> Self {
        Self::Category(c.to_string())
    }
}

impl<T: Into<FactValue>> From<Option<T>> for FactValue {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}
