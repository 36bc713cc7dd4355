//! Clinical codelists
//!
//! A codelist is a named set of clinical codes, optionally with a category
//! per code (used for ethnicity-style groupings). The engine only ever
//! asks two questions of a codelist: does it contain a code, and which
//! category does a code map to. Coding-system semantics stay external.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A named set of clinical codes with optional per-code categories
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Codelist {
    /// Reference-set identifier (e.g. "hyp_cod")
    pub name: String,
    /// Code -> optional category
    codes: IndexMap<String, Option<String>>,
}

impl Codelist {
    /// Create an empty codelist
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            codes: IndexMap::new(),
        }
    }

    /// Build from plain codes
    pub fn from_codes<I, S>(name: impl Into<String>, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Self::new(name);
        for code in codes {
            list.insert(code);
        }
        list
    }

    /// Add a code without a category
    pub fn insert(&mut self, code: impl Into<String>) {
        self.codes.insert(code.into(), None);
    }

    /// Add a code with a category
    pub fn insert_with_category(&mut self, code: impl Into<String>, category: impl Into<String>) {
        self.codes.insert(code.into(), Some(category.into()));
    }

    /// Set-membership test
    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains_key(code)
    }

    /// Category of a code, if the code is present and categorized
    pub fn categorize(&self, code: &str) -> Option<&str> {
        self.codes.get(code).and_then(|c| c.as_deref())
    }

    /// Number of codes
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Check if the codelist is empty
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership() {
        let list = Codelist::from_codes("hyp_cod", ["38341003", "59621000"]);
        assert!(list.contains("38341003"));
        assert!(!list.contains("271649006"));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_categorized_codes() {
        let mut list = Codelist::new("ethnicity6");
        list.insert_with_category("494131000000105", "White");
        list.insert_with_category("92461000000105", "Mixed");
        list.insert("186019001");

        assert_eq!(list.categorize("494131000000105"), Some("White"));
        assert_eq!(list.categorize("186019001"), None);
        assert_eq!(list.categorize("unknown"), None);
    }
}
