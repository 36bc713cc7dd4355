//! Integration tests for the select/reject chain over a realistic
//! nine-rule protocol
//!
//! The chain mirrors a blood-pressure control denominator: one age reject,
//! one achievement select, six condition rejects, one recency reject, with
//! survivors selected.

use pretty_assertions::assert_eq;
use qofr_ast::{ChainDef, RuleDef};
use qofr_eval::{CompiledChain, Disposition};
use qofr_model::{FactDictionary, FactKind, Patient};
use rstest::rstest;

fn dictionary() -> FactDictionary {
    FactDictionary::new()
        .with("age", FactKind::Number)
        .with("bp_sys_value", FactKind::Number)
        .with("bp_dia_value", FactKind::Number)
        .with("bp_recorded_12m", FactKind::Boolean)
        .with("ht_max_therapy_12m", FactKind::Boolean)
        .with("ht_care_unsuitable_12m", FactKind::Boolean)
        .with("bp_declined_12m", FactKind::Boolean)
        .with("ht_care_declined_12m", FactKind::Boolean)
        .with("hyp_invite_2_12m", FactKind::Boolean)
        .with("hyp_diagnosed_9m", FactKind::Boolean)
        .with("registered_9m", FactKind::Boolean)
}

fn chain() -> CompiledChain {
    let def = ChainDef::new("denominator")
        .with_rule(RuleDef::reject("denominator_r1", "age > 79"))
        .with_rule(RuleDef::select(
            "denominator_r2",
            "bp_sys_value <= 140 AND bp_dia_value <= 90 AND bp_recorded_12m",
        ))
        .with_rule(RuleDef::reject("denominator_r3", "ht_max_therapy_12m"))
        .with_rule(RuleDef::reject("denominator_r4", "ht_care_unsuitable_12m"))
        .with_rule(RuleDef::reject("denominator_r5", "bp_declined_12m"))
        .with_rule(RuleDef::reject("denominator_r6", "ht_care_declined_12m"))
        .with_rule(RuleDef::reject(
            "denominator_r7",
            "hyp_invite_2_12m AND NOT bp_recorded_12m",
        ))
        .with_rule(RuleDef::reject("denominator_r8", "hyp_diagnosed_9m"))
        .with_rule(RuleDef::reject("denominator_r9", "registered_9m"));
    CompiledChain::compile(&def, &dictionary()).unwrap()
}

fn controlled_patient() -> Patient {
    Patient::new("p1")
        .with_fact("age", 64i64)
        .with_fact("bp_sys_value", 132i64)
        .with_fact("bp_dia_value", 84i64)
        .with_fact("bp_recorded_12m", true)
}

#[test]
fn test_controlled_patient_selected_at_r2() {
    let outcome = chain().evaluate(&controlled_patient()).unwrap();
    assert_eq!(outcome.disposition, Disposition::Selected { decisive: Some(1) });
}

#[test]
fn test_age_reject_beats_later_rules() {
    // Old AND on maximal therapy: attribution goes to R1, but R3's raw
    // boolean still reports true for the exclusion-count measures
    let patient = controlled_patient()
        .with_fact("age", 83i64)
        .with_fact("bp_sys_value", 170i64)
        .with_fact("ht_max_therapy_12m", true);
    let outcome = chain().evaluate(&patient).unwrap();

    assert_eq!(outcome.disposition, Disposition::Rejected { rule: 0 });
    assert!(outcome.rule_result(2));
}

#[test]
fn test_invited_twice_no_reading_rejected_at_r7() {
    // Two invitations, no blood pressure recorded: R7 rejects. R8 would
    // also fire but never gets attribution.
    let patient = Patient::new("p2")
        .with_fact("age", 70i64)
        .with_fact("hyp_invite_2_12m", true)
        .with_fact("bp_recorded_12m", false)
        .with_fact("hyp_diagnosed_9m", true);
    let outcome = chain().evaluate(&patient).unwrap();

    assert_eq!(outcome.disposition, Disposition::Rejected { rule: 6 });
    assert!(outcome.rule_result(7));
}

#[test]
fn test_uncontrolled_survivor_selected() {
    // BP recorded but above target, nothing else applies: survives to the
    // end of the chain and is selected
    let patient = Patient::new("p3")
        .with_fact("age", 70i64)
        .with_fact("bp_sys_value", 155i64)
        .with_fact("bp_dia_value", 88i64)
        .with_fact("bp_recorded_12m", true);
    let outcome = chain().evaluate(&patient).unwrap();

    assert_eq!(outcome.disposition, Disposition::Selected { decisive: None });
}

#[rstest]
#[case("ht_max_therapy_12m", 2)]
#[case("ht_care_unsuitable_12m", 3)]
#[case("bp_declined_12m", 4)]
#[case("ht_care_declined_12m", 5)]
#[case("hyp_diagnosed_9m", 7)]
#[case("registered_9m", 8)]
fn test_single_condition_attribution(#[case] fact: &str, #[case] expected_rule: usize) {
    let patient = Patient::new("p4")
        .with_fact("age", 70i64)
        .with_fact(fact, true);
    let outcome = chain().evaluate(&patient).unwrap();

    assert_eq!(
        outcome.disposition,
        Disposition::Rejected {
            rule: expected_rule
        }
    );
}

#[test]
fn test_every_patient_gets_exactly_one_disposition() {
    // Partition property at small scale: rejected-per-rule counts plus
    // selected count equals the population count
    let chain = chain();
    let patients = vec![
        controlled_patient(),
        Patient::new("a").with_fact("age", 90i64),
        Patient::new("b")
            .with_fact("age", 70i64)
            .with_fact("bp_declined_12m", true),
        Patient::new("c").with_fact("age", 44i64),
        Patient::new("d")
            .with_fact("age", 70i64)
            .with_fact("registered_9m", true),
    ];

    let mut selected = 0usize;
    let mut rejected_per_rule = vec![0usize; chain.len()];
    for patient in &patients {
        match chain.evaluate(patient).unwrap().disposition {
            Disposition::Selected { .. } => selected += 1,
            Disposition::Rejected { rule } => rejected_per_rule[rule] += 1,
        }
    }

    let total: usize = selected + rejected_per_rule.iter().sum::<usize>();
    assert_eq!(total, patients.len());
    assert_eq!(selected, 2);
    assert_eq!(rejected_per_rule[0], 1);
    assert_eq!(rejected_per_rule[4], 1);
    assert_eq!(rejected_per_rule[8], 1);
}

#[test]
fn test_rerun_is_idempotent() {
    let chain = chain();
    let patient = controlled_patient();
    let first = chain.evaluate(&patient).unwrap();
    let second = chain.evaluate(&patient).unwrap();
    assert_eq!(first, second);
}
