//! The blood-pressure control indicator template
//!
//! HYP003 and HYP007 run the same nine-rule denominator protocol and
//! differ only in the age band and the blood-pressure target, so both are
//! instantiated from one template. The protocol actions follow the
//! business-rule document: R2 is the single Select, every other rule is a
//! Reject with a positively-phrased predicate, and survivors of R9 are
//! selected.

use qofr_ast::{ChainDef, RuleAction, RuleDef};
use qofr_eval::{AchievementDef, IndicatorDef};
use qofr_measures::{Measure, POPULATION};

use super::{IndicatorSpec, PopulationBasis, REGISTER_COLUMN, REGISTER_PREDICATE};
use crate::dictionary::DATA_CHECKS;
use crate::RunConfig;

/// The age band an indicator covers; the denominator's first rule rejects
/// patients outside it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeBand {
    /// Ages up to and including the bound (rejects `age > bound`)
    UpTo(u32),
    /// Ages from the bound upwards (rejects `age < bound`)
    From(u32),
}

impl AgeBand {
    fn reject_predicate(&self) -> String {
        match self {
            Self::UpTo(bound) => format!("age > {bound}"),
            Self::From(bound) => format!("age < {bound}"),
        }
    }
}

/// Template parameters: the only things that vary between the indicators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BpControlParams {
    /// Indicator id (e.g. "hyp003")
    pub id: String,
    /// Systolic target (mmHg), inclusive
    pub systolic_threshold: u32,
    /// Diastolic target (mmHg), inclusive
    pub diastolic_threshold: u32,
    /// Covered age band
    pub age_band: AgeBand,
}

/// HYP003: ages up to 79, latest blood pressure at or below 140/90
pub fn hyp003(config: &RunConfig) -> IndicatorSpec {
    bp_control(
        &BpControlParams {
            id: "hyp003".to_string(),
            systolic_threshold: 140,
            diastolic_threshold: 90,
            age_band: AgeBand::UpTo(79),
        },
        config,
    )
}

/// HYP007: ages 80 and over, latest blood pressure at or below 150/90
pub fn hyp007(config: &RunConfig) -> IndicatorSpec {
    bp_control(
        &BpControlParams {
            id: "hyp007".to_string(),
            systolic_threshold: 150,
            diastolic_threshold: 90,
            age_band: AgeBand::From(80),
        },
        config,
    )
}

/// Instantiate the blood-pressure control template
pub fn bp_control(params: &BpControlParams, config: &RunConfig) -> IndicatorSpec {
    let id = &params.id;
    let chain_name = format!("{id}_denominator");
    let rule_name = |k: u32| format!("{id}_denominator_r{k}");

    let chain = ChainDef::new(&chain_name)
        .with_rule(RuleDef::reject(
            rule_name(1),
            params.age_band.reject_predicate(),
        ))
        .with_rule(RuleDef::select(
            rule_name(2),
            format!(
                "# Latest blood pressure in the lookback window is within target
                 bp_sys_value <= {} AND
                 bp_dia_value <= {} AND
                 bp_recorded_12m",
                params.systolic_threshold, params.diastolic_threshold
            ),
        ))
        .with_rule(RuleDef::reject(rule_name(3), "ht_max_therapy_12m"))
        .with_rule(RuleDef::reject(rule_name(4), "ht_care_unsuitable_12m"))
        .with_rule(RuleDef::reject(rule_name(5), "bp_declined_12m"))
        .with_rule(RuleDef::reject(rule_name(6), "ht_care_declined_12m"))
        .with_rule(RuleDef::reject(
            rule_name(7),
            "# Invited twice and still no blood pressure recorded
             hyp_invite_2_12m AND NOT bp_recorded_12m",
        ))
        .with_rule(RuleDef::reject(rule_name(8), "hyp_diagnosed_9m"))
        .with_rule(RuleDef::reject(rule_name(9), "registered_9m"));

    let measures = build_measures(id, &chain, config);

    let definition = IndicatorDef::register_only(id.clone(), REGISTER_COLUMN, REGISTER_PREDICATE)
        .with_chain(chain)
        .with_achievement(AchievementDef::RuleRef(rule_name(2)));

    IndicatorSpec {
        definition,
        basis: PopulationBasis::Register,
        measures,
    }
}

fn build_measures(id: &str, chain: &ChainDef, config: &RunConfig) -> Vec<Measure> {
    let numerator = format!("{id}_numerator");
    let denominator = &chain.name;

    let mut measures = vec![
        Measure::new(
            format!("{id}_achievem_population_rate"),
            numerator.clone(),
            denominator.clone(),
            POPULATION,
        ),
        Measure::new(
            format!("{id}_achievem_practice_breakdown_rate"),
            numerator.clone(),
            denominator.clone(),
            "practice",
        ),
    ];

    for breakdown in &config.demographic_breakdowns {
        measures.push(Measure::new(
            format!("{id}_achievem_{breakdown}_breakdown_rate"),
            numerator.clone(),
            denominator.clone(),
            breakdown.clone(),
        ));
    }

    // Exclusion counts: the raw boolean of every rejecting rule
    for rule in chain.rules.iter().filter(|r| r.action == RuleAction::Reject) {
        let suffix = rule.name.trim_start_matches(&format!("{id}_"));
        measures.push(Measure::new(
            format!("{id}_excl_{suffix}_population_rate"),
            rule.name.clone(),
            POPULATION,
            POPULATION,
        ));
    }

    // Flowchart counts: the decisive disposition at every decisive rule
    for rule in chain.rules.iter().filter(|r| r.action != RuleAction::Next) {
        let flow_column = format!("{}_{}", rule.name, rule.action.flow_suffix());
        let suffix = flow_column.trim_start_matches(&format!("{id}_"));
        measures.push(Measure::new(
            format!("{id}_flow_{suffix}_population_rate"),
            flow_column.clone(),
            POPULATION,
            POPULATION,
        ));
    }

    // Data-quality checks over the reporting population
    for check in DATA_CHECKS {
        measures.push(Measure::new(
            format!("{id}_check_{check}_population_rate"),
            check,
            POPULATION,
            POPULATION,
        ));
    }

    measures
}
