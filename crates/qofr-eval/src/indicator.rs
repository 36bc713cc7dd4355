//! Indicator evaluation: register, denominator, numerator
//!
//! An indicator combines a register predicate, an optional exclusion
//! chain, and an optional achievement predicate:
//!
//! - `denominator = register AND chain selected`
//! - `numerator   = denominator AND achievement`
//!
//! so `numerator => denominator => register` holds for every patient.
//! Patients outside the register never enter the chain.

use log::debug;
use qofr_ast::{ChainDef, RuleAction};
use qofr_diagnostics::{QofError, Result, QOF0101, QOF0103};
use qofr_model::{FactDictionary, Patient, Population};
use serde::{Deserialize, Serialize};

use crate::chain::{ChainOutcome, CompiledChain, Disposition};
use crate::error::EvalResult;
use crate::rule::{CompiledRule, RuleOutputs};

/// How an indicator's numerator is derived from its denominator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AchievementDef {
    /// The raw boolean of a named chain rule (the usual case: the chain's
    /// Select rule doubles as the achievement test)
    RuleRef(String),
    /// A standalone predicate in the source dialect
    Predicate(String),
}

/// Declarative indicator definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorDef {
    /// Indicator id (e.g. "hyp003"), used as the prefix of derived columns
    pub id: String,
    /// Column name for register membership (e.g. "hyp_reg")
    pub register_fact: String,
    /// Register predicate source
    pub register: String,
    /// Exclusion chain; absent for register-only indicators
    pub chain: Option<ChainDef>,
    /// Achievement test; absent for register-only indicators
    pub achievement: Option<AchievementDef>,
}

impl IndicatorDef {
    /// Create a register-only indicator
    pub fn register_only(
        id: impl Into<String>,
        register_fact: impl Into<String>,
        register: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            register_fact: register_fact.into(),
            register: register.into(),
            chain: None,
            achievement: None,
        }
    }

    /// Attach an exclusion chain
    pub fn with_chain(mut self, chain: ChainDef) -> Self {
        self.chain = Some(chain);
        self
    }

    /// Attach an achievement test
    pub fn with_achievement(mut self, achievement: AchievementDef) -> Self {
        self.achievement = Some(achievement);
        self
    }
}

#[derive(Debug, Clone)]
enum Achievement {
    Rule(usize),
    Predicate(CompiledRule),
}

/// A compiled indicator
#[derive(Debug, Clone)]
pub struct Indicator {
    /// Indicator id
    pub id: String,
    register: CompiledRule,
    chain: Option<CompiledChain>,
    achievement: Option<Achievement>,
}

/// Per-patient indicator result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorOutcome {
    /// Register membership
    pub register: bool,
    /// Denominator membership (register AND chain selected)
    pub denominator: bool,
    /// Numerator membership (denominator AND achievement)
    pub numerator: bool,
    /// Chain outcome; present only for register members of a chained
    /// indicator
    pub chain: Option<ChainOutcome>,
}

impl Indicator {
    /// Compile an indicator definition, failing fast on any predicate or
    /// naming problem
    pub fn compile(def: &IndicatorDef, dictionary: &FactDictionary) -> Result<Self> {
        if dictionary.contains(&def.register_fact) {
            return Err(QofError::definition_for(
                QOF0103,
                format!(
                    "Register column '{}' shadows a declared fact of the same name",
                    def.register_fact
                ),
                def.register_fact.clone(),
            ));
        }

        let register = CompiledRule::standalone(&def.register_fact, &def.register, dictionary)?;

        let chain = def
            .chain
            .as_ref()
            .map(|chain_def| CompiledChain::compile(chain_def, dictionary))
            .transpose()?;

        let achievement = match &def.achievement {
            None => None,
            Some(AchievementDef::RuleRef(name)) => {
                let chain = chain.as_ref().ok_or_else(|| {
                    QofError::definition_for(
                        QOF0101,
                        format!(
                            "Achievement of '{}' references rule '{}' but the indicator has no chain",
                            def.id, name
                        ),
                        name.clone(),
                    )
                })?;
                let index = chain
                    .rules()
                    .position(|r| r.name == *name)
                    .ok_or_else(|| {
                        QofError::definition_for(
                            QOF0101,
                            format!("Achievement of '{}' references undefined rule '{}'", def.id, name),
                            name.clone(),
                        )
                    })?;
                Some(Achievement::Rule(index))
            }
            Some(AchievementDef::Predicate(source)) => {
                let rule = CompiledRule::standalone(
                    format!("{}_achievement", def.id),
                    source,
                    dictionary,
                )?;
                Some(Achievement::Predicate(rule))
            }
        };

        debug!(
            "compiled indicator '{}' ({} chain rules)",
            def.id,
            chain.as_ref().map_or(0, CompiledChain::len)
        );

        Ok(Self {
            id: def.id.clone(),
            register,
            chain,
            achievement,
        })
    }

    /// Evaluate the indicator for one patient
    pub fn evaluate_patient(&self, patient: &Patient) -> EvalResult<IndicatorOutcome> {
        let register = self.register.evaluate(patient, &RuleOutputs::new())?;

        if !register {
            return Ok(IndicatorOutcome {
                register: false,
                denominator: false,
                numerator: false,
                chain: None,
            });
        }

        let chain_outcome = match &self.chain {
            Some(chain) => Some(chain.evaluate(patient)?),
            None => None,
        };
        let denominator = chain_outcome.as_ref().map_or(register, ChainOutcome::selected);

        let achieved = match &self.achievement {
            None => false,
            Some(Achievement::Rule(index)) => chain_outcome
                .as_ref()
                .is_some_and(|outcome| outcome.rule_result(*index)),
            Some(Achievement::Predicate(rule)) => rule.evaluate(patient, &RuleOutputs::new())?,
        };
        let numerator = denominator && achieved;

        Ok(IndicatorOutcome {
            register,
            denominator,
            numerator,
            chain: chain_outcome,
        })
    }

    /// Evaluate the indicator and append the derived columns to a copy of
    /// the patient row
    ///
    /// Columns: the register flag, each chain rule's raw boolean, one
    /// flowchart flag per decisive rule (`<rule>_select` / `<rule>_reject`),
    /// `<chain>` for the denominator and `<id>_numerator` for the
    /// numerator.
    pub fn augment(&self, patient: &Patient) -> EvalResult<Patient> {
        let outcome = self.evaluate_patient(patient)?;
        let mut row = patient.clone();

        row.set_fact(self.register.name.clone(), outcome.register);

        if let Some(chain) = &self.chain {
            for (index, rule) in chain.rules().enumerate() {
                let raw = outcome
                    .chain
                    .as_ref()
                    .map_or(false, |c| c.rule_result(index));
                row.set_fact(rule.name.clone(), raw);

                let decisive_here = outcome.chain.as_ref().is_some_and(|c| match rule.action {
                    RuleAction::Select => {
                        c.disposition
                            == Disposition::Selected {
                                decisive: Some(index),
                            }
                    }
                    RuleAction::Reject => c.disposition.rejected_at() == Some(index),
                    RuleAction::Next => false,
                });
                if rule.action != RuleAction::Next {
                    let flow_column = format!("{}_{}", rule.name, rule.action.flow_suffix());
                    row.set_fact(flow_column, decisive_here);
                }
            }
            row.set_fact(chain.name.clone(), outcome.denominator);
        }

        if self.achievement.is_some() {
            row.set_fact(format!("{}_numerator", self.id), outcome.numerator);
        }

        Ok(row)
    }

    /// Augment every patient in a population
    ///
    /// Rows are independent (rule evaluation is pure over immutable
    /// facts); results are collected before any aggregation happens.
    pub fn augment_population(&self, population: &Population) -> EvalResult<Population> {
        population.iter().map(|p| self.augment(p)).collect()
    }

    /// The compiled chain, if the indicator has one
    pub fn chain(&self) -> Option<&CompiledChain> {
        self.chain.as_ref()
    }

    /// Name of the register membership column
    pub fn register_column(&self) -> &str {
        &self.register.name
    }
}
