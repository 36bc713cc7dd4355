//! Rule and chain definition types
//!
//! A rule chain is the configured form of a denominator protocol: an
//! ordered list of named rules, each carrying an action and a predicate in
//! the source dialect. Definitions are plain data; compilation (parsing the
//! predicates and resolving references) happens in the evaluation crate.

use serde::{Deserialize, Serialize};

/// What a decisive (true) predicate does to the patient at this stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleAction {
    /// Predicate true: the patient enters the denominator, chain stops
    Select,
    /// Predicate true: the patient is excluded, chain stops
    Reject,
    /// The predicate is evaluated for reporting only; the chain always
    /// moves on to the next rule
    Next,
}

impl RuleAction {
    /// Get the flowchart suffix used in measure ids for this action
    pub const fn flow_suffix(&self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Reject => "reject",
            Self::Next => "next",
        }
    }
}

impl std::fmt::Display for RuleAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Select => write!(f, "select"),
            Self::Reject => write!(f, "reject"),
            Self::Next => write!(f, "next"),
        }
    }
}

/// A named rule: an action plus a predicate in source form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDef {
    /// Rule name, unique within its chain (e.g. "denominator_r3").
    /// Later rules may reference earlier rules by this name.
    pub name: String,
    /// What happens when the predicate is true
    pub action: RuleAction,
    /// Predicate source text in the dialect; may contain `#` comments
    pub predicate: String,
}

impl RuleDef {
    /// Create a selecting rule
    pub fn select(name: impl Into<String>, predicate: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            action: RuleAction::Select,
            predicate: predicate.into(),
        }
    }

    /// Create a rejecting rule
    pub fn reject(name: impl Into<String>, predicate: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            action: RuleAction::Reject,
            predicate: predicate.into(),
        }
    }

    /// Create a reporting-only rule
    pub fn next(name: impl Into<String>, predicate: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            action: RuleAction::Next,
            predicate: predicate.into(),
        }
    }
}

/// An ordered rule chain
///
/// Order is significant: the first rule whose predicate is true and whose
/// action is decisive determines the patient's disposition. A chain
/// exhausted without a decisive rule selects the patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainDef {
    /// Chain name, used as the prefix for per-rule result columns
    pub name: String,
    /// The rules, in protocol order
    pub rules: Vec<RuleDef>,
}

impl ChainDef {
    /// Create an empty chain
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
        }
    }

    /// Append a rule to the chain
    pub fn with_rule(mut self, rule: RuleDef) -> Self {
        self.rules.push(rule);
        self
    }

    /// Look up a rule by name
    pub fn rule(&self, name: &str) -> Option<&RuleDef> {
        self.rules.iter().find(|r| r.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_builder() {
        let chain = ChainDef::new("denominator")
            .with_rule(RuleDef::reject("denominator_r1", "age > 79"))
            .with_rule(RuleDef::select("denominator_r2", "bp_target"));

        assert_eq!(chain.rules.len(), 2);
        assert_eq!(chain.rule("denominator_r1").unwrap().action, RuleAction::Reject);
        assert!(chain.rule("denominator_r9").is_none());
    }

    #[test]
    fn test_flow_suffix() {
        assert_eq!(RuleAction::Select.flow_suffix(), "select");
        assert_eq!(RuleAction::Reject.flow_suffix(), "reject");
    }
}
