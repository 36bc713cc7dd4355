//! BP002 (1-year lookback variant): blood pressure recorded for register
//! members
//!
//! No exclusion chain: every register member is in the denominator, and
//! achievement is simply a blood pressure recording inside the lookback
//! window. Measures are reported against the register population.

use qofr_eval::{AchievementDef, IndicatorDef};
use qofr_measures::{Measure, POPULATION};

use super::{IndicatorSpec, PopulationBasis, REGISTER_COLUMN, REGISTER_PREDICATE};
use crate::RunConfig;

/// Build the BP002 indicator over the hypertension register
pub fn bp002(config: &RunConfig) -> IndicatorSpec {
    let definition = IndicatorDef::register_only("bp002", REGISTER_COLUMN, REGISTER_PREDICATE)
        .with_achievement(AchievementDef::Predicate("bp_recorded_12m".to_string()));

    let mut measures = vec![
        Measure::new(
            "bp002_1y_achievem_hypreg_population_rate",
            "bp002_numerator",
            POPULATION,
            POPULATION,
        ),
        Measure::new(
            "bp002_1y_achievem_hypreg_practice_breakdown_rate",
            "bp002_numerator",
            POPULATION,
            "practice",
        ),
    ];
    for breakdown in &config.demographic_breakdowns {
        measures.push(Measure::new(
            format!("bp002_1y_achievem_hypreg_{breakdown}_breakdown_rate"),
            "bp002_numerator",
            POPULATION,
            breakdown.clone(),
        ));
    }

    IndicatorSpec {
        definition,
        basis: PopulationBasis::Register,
        measures,
    }
}
