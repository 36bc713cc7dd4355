//! Stratified aggregation of an augmented population into measure rows

use indexmap::IndexMap;
use log::warn;
use qofr_diagnostics::{QofError, Result, QOF0300, QOF0301, QOF0302};
use qofr_model::{FactValue, Patient, Population};
use rust_decimal::Decimal;

use crate::{Measure, MeasureRow, MeasureTable, SuppressionPolicy, POPULATION};

/// Stratum label for rows whose dimension value is missing or
/// unrecognized. Such patients are counted here rather than dropped, so
/// denominator totals stay consistent.
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// Compute one measure over the population
///
/// Returns one row per stratum, in first-seen order. Suppression is
/// applied after all counts for the measure are final.
pub fn compute_measure(
    population: &Population,
    measure: &Measure,
    policy: &SuppressionPolicy,
) -> Result<Vec<MeasureRow>> {
    validate_columns(population, measure)?;

    #[derive(Default)]
    struct Counts {
        numerator: u64,
        denominator: u64,
    }

    let mut strata: IndexMap<String, Counts> = IndexMap::new();
    let mut unknown_seen = 0u64;

    for patient in population.iter() {
        let category = stratum_of(patient, &measure.group_by);
        if category == UNKNOWN_CATEGORY {
            unknown_seen += 1;
        }
        let counts = strata.entry(category).or_default();

        let in_denominator =
            measure.denominator == POPULATION || patient.fact(&measure.denominator).is_true();
        if in_denominator {
            counts.denominator += 1;
        }
        if patient.fact(&measure.numerator).is_true() {
            counts.numerator += 1;
        }
    }

    if unknown_seen > 0 {
        warn!(
            "measure '{}': {} patients counted in the '{}' stratum of '{}'",
            measure.id, unknown_seen, UNKNOWN_CATEGORY, measure.group_by
        );
    }

    let mut rows = Vec::with_capacity(strata.len());
    for (category, counts) in strata {
        let rate = (counts.denominator > 0).then(|| {
            Decimal::from(counts.numerator) / Decimal::from(counts.denominator)
        });
        let mut row = MeasureRow {
            measure_id: measure.id.clone(),
            category,
            numerator: Some(counts.numerator),
            denominator: Some(counts.denominator),
            rate,
            suppressed: false,
        };
        if measure.small_number_suppression {
            policy.apply(&mut row);
        }
        rows.push(row);
    }

    Ok(rows)
}

/// Compute every configured measure into one flat table
pub fn compute_measures(
    population: &Population,
    measures: &[Measure],
    policy: &SuppressionPolicy,
) -> Result<MeasureTable> {
    let mut seen = indexmap::IndexSet::new();
    for measure in measures {
        if !seen.insert(measure.id.as_str()) {
            return Err(QofError::aggregation_for(
                QOF0302,
                format!("Duplicate measure id '{}'", measure.id),
                measure.id.clone(),
            ));
        }
    }

    let mut table = MeasureTable::new();
    for measure in measures {
        table.extend(compute_measure(population, measure, policy)?);
    }
    Ok(table)
}

/// The stratum a patient belongs to for a group-by dimension
fn stratum_of(patient: &Patient, group_by: &str) -> String {
    if group_by == POPULATION {
        return POPULATION.to_string();
    }
    match patient.fact(group_by) {
        FactValue::Null => UNKNOWN_CATEGORY.to_string(),
        FactValue::Category(c) => c.clone(),
        FactValue::Boolean(b) => b.to_string(),
        FactValue::Number(n) => n.to_string(),
        FactValue::Date(d) => d.format("%Y-%m-%d").to_string(),
    }
}

/// A measure referencing a column no row carries is a configuration
/// error, not an empty result
fn validate_columns(population: &Population, measure: &Measure) -> Result<()> {
    if population.is_empty() {
        return Ok(());
    }

    let column_exists =
        |column: &str| population.iter().any(|patient| patient.has_fact(column));

    for column in [&measure.numerator, &measure.denominator] {
        if column.as_str() != POPULATION && !column_exists(column) {
            return Err(QofError::aggregation_for(
                QOF0300,
                format!(
                    "Measure '{}' references column '{}' which no patient carries",
                    measure.id, column
                ),
                measure.id.clone(),
            ));
        }
    }

    if measure.group_by != POPULATION && !column_exists(&measure.group_by) {
        return Err(QofError::aggregation_for(
            QOF0301,
            format!(
                "Measure '{}' groups by dimension '{}' which no patient carries",
                measure.id, measure.group_by
            ),
            measure.id.clone(),
        ));
    }

    Ok(())
}
