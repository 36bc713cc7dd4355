//! End-to-end scenario tests for the built-in indicators
//!
//! Each test runs the full pipeline (provider -> eligibility -> rule
//! chains -> measures) over a hand-built population.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use qofr::indicators::{hyp003, hyp007};
use qofr::measures::{compute_measure, Measure, POPULATION};
use qofr::{
    fact_dictionary, Codelist, FactValue, Indicator, Patient, Population, RunConfig, Runner,
    StaticPopulationProvider, SuppressionPolicy,
};
use rstest::rstest;
use rust_decimal::Decimal;

fn config() -> RunConfig {
    // Raw counts in assertions: suppression is exercised separately
    RunConfig::new(
        NaiveDate::from_ymd_opt(2019, 3, 1).unwrap(),
        NaiveDate::from_ymd_opt(2022, 4, 1).unwrap(),
    )
    .with_suppression(SuppressionPolicy {
        threshold: 0,
        secondary: false,
    })
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// An eligible patient with every indicator fact present and inactive
fn base_patient(id: &str) -> Patient {
    let mut patient = Patient::new(id)
        .with_fact("gms_reg_status", true)
        .with_fact("died", false)
        .with_fact("age", 62i64)
        .with_fact("age_band", "60-69")
        .with_fact("sex", "F")
        .with_fact("imd_q5", "3")
        .with_fact("region", "London")
        .with_fact("ethnicity", "White")
        .with_fact("learning_disability", "no_record")
        .with_fact("care_home", "no_record")
        .with_fact("practice", "42");
    for flag in [
        "hypertension",
        "hypertension_resolved",
        "bp_recorded_12m",
        "ht_max_therapy_12m",
        "ht_care_unsuitable_12m",
        "bp_declined_12m",
        "ht_care_declined_12m",
        "hyp_invite_1_12m",
        "hyp_invite_2_12m",
        "hyp_diagnosed_9m",
        "registered_9m",
        "bp_sys_dia_min_cutoff",
        "bp_sys_dia_max_cutoff",
        "bp_sys_dia_date_missing",
        "bp_sys_dia_date_available",
        "bp_sys_dia_date_equal",
    ] {
        patient.set_fact(flag, false);
    }
    patient
}

fn register_member(id: &str) -> Patient {
    base_patient(id)
        .with_fact("hypertension", true)
        .with_fact("hypertension_date", date(2018, 6, 1))
}

async fn run(patients: Vec<Patient>) -> qofr::RunOutput {
    let population: Population = patients.into_iter().collect();
    let provider = StaticPopulationProvider::new(population);
    Runner::new(config()).unwrap().run(&provider).await.unwrap()
}

fn fact(population: &Population, id: &str, name: &str) -> FactValue {
    population
        .iter()
        .find(|p| p.id.as_str() == id)
        .unwrap_or_else(|| panic!("patient '{}' not in population", id))
        .fact(name)
        .clone()
}

// Scenario A: diagnosis, no resolution code -> on the register
#[tokio::test]
async fn test_diagnosis_without_resolution_is_on_register() {
    let output = run(vec![register_member("p1")]).await;

    let hyp001 = &output.populations["hyp001"];
    assert_eq!(fact(hyp001, "p1", "hyp_reg"), FactValue::Boolean(true));

    let row = output
        .measures
        .cell("hyp001_population_rate", "population")
        .unwrap();
    assert_eq!(row.numerator, Some(1));
    assert_eq!(row.denominator, Some(1));
    assert_eq!(row.rate, Some(Decimal::ONE));
}

// Scenario B: diagnosis resolved later -> off the register
#[tokio::test]
async fn test_resolved_diagnosis_is_off_register() {
    let patient = register_member("p1")
        .with_fact("hypertension_resolved", true)
        .with_fact("hypertension_resolved_date", date(2019, 2, 1));
    let output = run(vec![patient]).await;

    let hyp001 = &output.populations["hyp001"];
    assert_eq!(fact(hyp001, "p1", "hyp_reg"), FactValue::Boolean(false));

    // Register-based indicators never see this patient
    assert!(output.populations["hyp003"].is_empty());
    assert!(output.populations["bp002"].is_empty());
}

// A diagnosis recorded again after resolution puts the patient back on
#[tokio::test]
async fn test_rediagnosis_after_resolution_is_on_register() {
    let patient = register_member("p1")
        .with_fact("hypertension_date", date(2021, 8, 1))
        .with_fact("hypertension_resolved", true)
        .with_fact("hypertension_resolved_date", date(2019, 2, 1));
    let output = run(vec![patient]).await;

    let hyp001 = &output.populations["hyp001"];
    assert_eq!(fact(hyp001, "p1", "hyp_reg"), FactValue::Boolean(true));
}

// Scenario C: 85-year-old at 145/85 with a recent reading achieves the
// 150/90 indicator and is age-rejected from the 140/90 one
#[tokio::test]
async fn test_age_threshold_direction_is_indicator_specific() {
    let patient = register_member("p1")
        .with_fact("age", 85i64)
        .with_fact("age_band", "80+")
        .with_fact("bp_sys_value", 145i64)
        .with_fact("bp_dia_value", 85i64)
        .with_fact("bp_recorded_12m", true);
    let output = run(vec![patient]).await;

    let hyp007 = &output.populations["hyp007"];
    assert_eq!(fact(hyp007, "p1", "hyp007_denominator"), FactValue::Boolean(true));
    assert_eq!(fact(hyp007, "p1", "hyp007_numerator"), FactValue::Boolean(true));
    assert_eq!(
        fact(hyp007, "p1", "hyp007_denominator_r2_select"),
        FactValue::Boolean(true)
    );

    let hyp003 = &output.populations["hyp003"];
    assert_eq!(fact(hyp003, "p1", "hyp003_denominator"), FactValue::Boolean(false));
    assert_eq!(
        fact(hyp003, "p1", "hyp003_denominator_r1_reject"),
        FactValue::Boolean(true)
    );
}

// Scenario D: invited twice, no reading -> attributed to the invitation
// rule even though a later rule also fires
#[tokio::test]
async fn test_exclusion_attributed_to_first_decisive_rule() {
    let patient = register_member("p1")
        .with_fact("hyp_invite_1_12m", true)
        .with_fact("hyp_invite_2_12m", true)
        .with_fact("hyp_diagnosed_9m", true);
    let output = run(vec![patient]).await;

    let hyp003 = &output.populations["hyp003"];
    assert_eq!(
        fact(hyp003, "p1", "hyp003_denominator_r7_reject"),
        FactValue::Boolean(true)
    );
    assert_eq!(
        fact(hyp003, "p1", "hyp003_denominator_r8_reject"),
        FactValue::Boolean(false)
    );
    // The raw boolean of R8 still feeds its exclusion-count measure
    assert_eq!(
        fact(hyp003, "p1", "hyp003_denominator_r8"),
        FactValue::Boolean(true)
    );

    let excl = output
        .measures
        .cell("hyp003_excl_denominator_r8_population_rate", "population")
        .unwrap();
    assert_eq!(excl.numerator, Some(1));
    let flow = output
        .measures
        .cell("hyp003_flow_denominator_r8_reject_population_rate", "population")
        .unwrap();
    assert_eq!(flow.numerator, Some(0));
}

// Scenario E: numerator 3 of 50 with threshold 5; the suppression policy
// decides the fate of the companion cell
#[test]
fn test_small_numerator_suppression_policies() {
    let mut population = Population::new();
    for i in 0..50 {
        population.push(
            Patient::new(format!("p{i}"))
                .with_fact("numerator", i < 3)
                .with_fact("denominator", true),
        );
    }
    let measure = Measure::new("rate", "numerator", "denominator", POPULATION);

    // Secondary suppression: both cells redacted
    let secondary = SuppressionPolicy {
        threshold: 5,
        secondary: true,
    };
    let rows = compute_measure(&population, &measure, &secondary).unwrap();
    assert_eq!(rows[0].numerator, None);
    assert_eq!(rows[0].denominator, None);
    assert_eq!(rows[0].rate, None);
    assert!(rows[0].suppressed);

    // Primary only: the large denominator is published
    let primary = SuppressionPolicy {
        threshold: 5,
        secondary: false,
    };
    let rows = compute_measure(&population, &measure, &primary).unwrap();
    assert_eq!(rows[0].numerator, None);
    assert_eq!(rows[0].denominator, Some(50));
    assert_eq!(rows[0].rate, None);
    assert!(rows[0].suppressed);
}

// Partition property: every register member lands in exactly one
// disposition, so per-rule rejections plus the denominator add back up
#[tokio::test]
async fn test_rejections_and_denominator_partition_the_register() {
    let patients = vec![
        // Selected at R2
        register_member("a")
            .with_fact("bp_sys_value", 130i64)
            .with_fact("bp_dia_value", 80i64)
            .with_fact("bp_recorded_12m", true),
        // Rejected at R1
        register_member("b").with_fact("age", 83i64).with_fact("age_band", "80+"),
        // Rejected at R5
        register_member("c").with_fact("bp_declined_12m", true),
        // Rejected at R9
        register_member("d").with_fact("registered_9m", true),
        // Survivor: uncontrolled but not excluded
        register_member("e")
            .with_fact("bp_sys_value", 160i64)
            .with_fact("bp_dia_value", 95i64)
            .with_fact("bp_recorded_12m", true),
        // Off register: never enters the chain
        base_patient("f"),
    ];
    let output = run(patients).await;

    let hyp003 = &output.populations["hyp003"];
    assert_eq!(hyp003.len(), 5);

    let count = |column: &str| {
        hyp003
            .iter()
            .filter(|p| p.fact(column).is_true())
            .count()
    };

    // a selected at R2, e selected by survival; b, c, d rejected
    let denominator = count("hyp003_denominator");
    let rejected: usize = (1..=9)
        .map(|k| count(&format!("hyp003_denominator_r{k}_reject")))
        .sum();
    assert_eq!(denominator, 2);
    assert_eq!(rejected, 3);
    assert_eq!(denominator + rejected, hyp003.len());

    // Achievement: only the controlled patient reaches the numerator
    assert_eq!(count("hyp003_numerator"), 1);

    let row = output
        .measures
        .cell("hyp003_achievem_population_rate", "population")
        .unwrap();
    assert_eq!(row.numerator, Some(1));
    assert_eq!(row.denominator, Some(2));
    assert_eq!(row.rate, Some(Decimal::ONE / Decimal::from(2)));
}

// Re-running the pipeline over the same snapshot yields identical output
#[tokio::test]
async fn test_rerun_is_idempotent() {
    let patients = vec![
        register_member("a")
            .with_fact("bp_sys_value", 130i64)
            .with_fact("bp_dia_value", 80i64)
            .with_fact("bp_recorded_12m", true),
        register_member("b").with_fact("bp_declined_12m", true),
        base_patient("c"),
    ];
    let population: Population = patients.into_iter().collect();
    let provider = StaticPopulationProvider::new(population);
    let runner = Runner::new(config()).unwrap();

    let first = runner.run(&provider).await.unwrap();
    let second = runner.run(&provider).await.unwrap();
    assert_eq!(first.measures, second.measures);
    assert_eq!(first.populations, second.populations);
}

// The two blood-pressure indicators split the register by age band at 80
#[rstest]
#[case(45, true, false)]
#[case(79, true, false)]
#[case(80, false, true)]
#[case(101, false, true)]
fn test_age_band_boundaries(#[case] age: i64, #[case] in_hyp003: bool, #[case] in_hyp007: bool) {
    let dictionary = fact_dictionary();
    let hyp003 = Indicator::compile(&hyp003(&config()).definition, dictionary).unwrap();
    let hyp007 = Indicator::compile(&hyp007(&config()).definition, dictionary).unwrap();

    // On target for both variants so only the age rule differs
    let patient = register_member("p1")
        .with_fact("age", age)
        .with_fact("bp_sys_value", 135i64)
        .with_fact("bp_dia_value", 80i64)
        .with_fact("bp_recorded_12m", true);

    let outcome = hyp003.evaluate_patient(&patient).unwrap();
    assert_eq!(outcome.denominator, in_hyp003, "hyp003 at age {age}");
    let outcome = hyp007.evaluate_patient(&patient).unwrap();
    assert_eq!(outcome.denominator, in_hyp007, "hyp007 at age {age}");
}

// The measures table serializes for downstream reporting
#[tokio::test]
async fn test_measures_table_serializes() {
    let output = run(vec![register_member("p1")]).await;
    let json = serde_json::to_value(output.measures.rows()).unwrap();

    let rows = json.as_array().unwrap();
    assert!(!rows.is_empty());
    let first = &rows[0];
    assert!(first.get("measure_id").is_some());
    assert!(first.get("category").is_some());
    assert!(first.get("suppressed").is_some());
}

// Patients whose coded ethnicity has no recognized category are reported
// in an explicit unknown stratum, keeping denominator totals consistent
#[tokio::test]
async fn test_unknown_ethnicity_reported_not_dropped() {
    // The provider derives the ethnicity category from a codelist; a code
    // outside the reference set maps to no category at all
    let mut ethnicity6 = Codelist::new("ethnicity6");
    ethnicity6.insert_with_category("494131000000105", "White");

    let mut p1 = register_member("p1");
    p1.set_fact("ethnicity", FactValue::from(ethnicity6.categorize("186019001")));
    let mut p2 = register_member("p2");
    p2.set_fact(
        "ethnicity",
        FactValue::from(ethnicity6.categorize("494131000000105")),
    );
    let output = run(vec![p1, p2]).await;

    let rows: Vec<_> = output
        .measures
        .measure("hyp001_ethnicity_rate")
        .collect();
    let total: u64 = rows.iter().map(|r| r.denominator.unwrap()).sum();
    assert_eq!(total, 2);
    assert!(rows.iter().any(|r| r.category == "unknown"));
    assert!(rows.iter().any(|r| r.category == "White"));
}
