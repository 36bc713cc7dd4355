//! The fact dictionary: declared fact names and kinds
//!
//! Rule chains are compiled against a dictionary, so an undefined or
//! wrongly-typed reference fails at construction time instead of surfacing
//! per patient mid-run.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The declared kind of a fact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FactKind {
    /// Binary flag
    Boolean,
    /// Event or recording date
    Date,
    /// Numeric measurement
    Number,
    /// Categorical value
    Category,
}

impl fmt::Display for FactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => write!(f, "boolean"),
            Self::Date => write!(f, "date"),
            Self::Number => write!(f, "number"),
            Self::Category => write!(f, "category"),
        }
    }
}

/// Declared facts, by name
///
/// Insertion order is preserved so result tables keep a stable column
/// order across runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FactDictionary {
    facts: IndexMap<String, FactKind>,
}

impl FactDictionary {
    /// Create an empty dictionary
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a fact, replacing any previous declaration of the same name
    pub fn declare(&mut self, name: impl Into<String>, kind: FactKind) {
        self.facts.insert(name.into(), kind);
    }

    /// Builder-style declaration
    pub fn with(mut self, name: impl Into<String>, kind: FactKind) -> Self {
        self.declare(name, kind);
        self
    }

    /// Declare a boolean flag together with its `<name>_date` companion
    pub fn with_dated_flag(self, name: &str) -> Self {
        self.with(name, FactKind::Boolean)
            .with(format!("{name}_date"), FactKind::Date)
    }

    /// Look up the kind of a fact
    pub fn kind_of(&self, name: &str) -> Option<FactKind> {
        self.facts.get(name).copied()
    }

    /// Check whether a fact is declared
    pub fn contains(&self, name: &str) -> bool {
        self.facts.contains_key(name)
    }

    /// Number of declared facts
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Check if the dictionary is empty
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Iterate over declared facts in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, FactKind)> {
        self.facts.iter().map(|(name, kind)| (name.as_str(), *kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_and_lookup() {
        let dict = FactDictionary::new()
            .with("sex", FactKind::Category)
            .with("age", FactKind::Number)
            .with_dated_flag("hypertension");

        assert_eq!(dict.kind_of("sex"), Some(FactKind::Category));
        assert_eq!(dict.kind_of("hypertension"), Some(FactKind::Boolean));
        assert_eq!(dict.kind_of("hypertension_date"), Some(FactKind::Date));
        assert_eq!(dict.kind_of("imd"), None);
        assert_eq!(dict.len(), 4);
    }

    #[test]
    fn test_declaration_order_preserved() {
        let dict = FactDictionary::new()
            .with("b", FactKind::Boolean)
            .with("a", FactKind::Boolean);

        let names: Vec<&str> = dict.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
