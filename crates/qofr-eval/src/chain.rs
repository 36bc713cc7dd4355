//! The select/reject rule chain
//!
//! A chain folds an ordered list of rules over one patient. Every rule is
//! evaluated (exclusion-count and flowchart measures need each raw
//! boolean), then the disposition is decided by the lowest-indexed rule
//! that is decisive: a true Select includes the patient, a true Reject
//! excludes them, anything else defers to the next rule. A chain exhausted
//! without a decisive rule selects the patient.

use indexmap::IndexSet;
use log::debug;
use qofr_ast::{ChainDef, RuleAction};
use qofr_diagnostics::{QofError, Result, QOF0103};
use qofr_model::{FactDictionary, Patient};
use serde::{Deserialize, Serialize};

use crate::error::EvalResult;
use crate::rule::{CompiledRule, RuleOutputs};

/// Terminal disposition of one patient after the chain fold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Disposition {
    /// Included in the denominator. `decisive` is the index of the
    /// selecting rule, or `None` when the patient survived the whole chain
    Selected { decisive: Option<usize> },
    /// Excluded, attributable to exactly the rule at this index
    Rejected { rule: usize },
}

impl Disposition {
    /// Check whether the patient was selected
    pub const fn is_selected(&self) -> bool {
        matches!(self, Self::Selected { .. })
    }

    /// Index of the rejecting rule, if any
    pub const fn rejected_at(&self) -> Option<usize> {
        match self {
            Self::Rejected { rule } => Some(*rule),
            Self::Selected { .. } => None,
        }
    }
}

/// Everything the chain produced for one patient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainOutcome {
    /// Raw boolean of every rule, in chain order
    pub rule_results: Vec<bool>,
    /// The terminal disposition
    pub disposition: Disposition,
}

impl ChainOutcome {
    /// Check whether the patient ended up selected
    pub const fn selected(&self) -> bool {
        self.disposition.is_selected()
    }

    /// Raw boolean of a rule by index
    pub fn rule_result(&self, index: usize) -> bool {
        self.rule_results.get(index).copied().unwrap_or(false)
    }
}

/// A compiled rule chain
#[derive(Debug, Clone)]
pub struct CompiledChain {
    /// Chain name, used as the prefix of derived column names
    pub name: String,
    rules: Vec<CompiledRule>,
}

impl CompiledChain {
    /// Compile a chain definition against a fact dictionary
    ///
    /// Fails fast on duplicate rule names, rule names shadowing declared
    /// facts, and any predicate error; nothing is evaluated per patient
    /// until the whole chain is known to be well-defined.
    pub fn compile(def: &ChainDef, dictionary: &FactDictionary) -> Result<Self> {
        let mut all_rules = IndexSet::new();
        for rule in &def.rules {
            if !all_rules.insert(rule.name.clone()) {
                return Err(QofError::definition_for(
                    QOF0103,
                    format!("Duplicate rule name '{}' in chain '{}'", rule.name, def.name),
                    rule.name.clone(),
                ));
            }
            if dictionary.contains(&rule.name) {
                return Err(QofError::definition_for(
                    QOF0103,
                    format!(
                        "Rule name '{}' shadows a declared fact of the same name",
                        rule.name
                    ),
                    rule.name.clone(),
                ));
            }
        }

        let mut earlier_rules = IndexSet::new();
        let mut rules = Vec::with_capacity(def.rules.len());
        for rule_def in &def.rules {
            let rule = CompiledRule::compile(rule_def, dictionary, &earlier_rules, &all_rules)?;
            earlier_rules.insert(rule.name.clone());
            rules.push(rule);
        }

        debug!("compiled chain '{}' with {} rules", def.name, rules.len());

        Ok(Self {
            name: def.name.clone(),
            rules,
        })
    }

    /// Fold the chain over one patient
    pub fn evaluate(&self, patient: &Patient) -> EvalResult<ChainOutcome> {
        let mut outputs = RuleOutputs::new();
        let mut rule_results = Vec::with_capacity(self.rules.len());

        for rule in &self.rules {
            let result = rule.evaluate(patient, &outputs)?;
            outputs.insert(rule.name.clone(), result);
            rule_results.push(result);
        }

        let mut disposition = Disposition::Selected { decisive: None };
        for (index, rule) in self.rules.iter().enumerate() {
            if !rule_results[index] {
                continue;
            }
            match rule.action {
                RuleAction::Select => {
                    disposition = Disposition::Selected {
                        decisive: Some(index),
                    };
                    break;
                }
                RuleAction::Reject => {
                    disposition = Disposition::Rejected { rule: index };
                    break;
                }
                RuleAction::Next => {}
            }
        }

        Ok(ChainOutcome {
            rule_results,
            disposition,
        })
    }

    /// The rules in chain order
    pub fn rules(&self) -> impl Iterator<Item = &CompiledRule> {
        self.rules.iter()
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check whether the chain has no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
