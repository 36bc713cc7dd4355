//! HYP001: the hypertension register rate
//!
//! Reported over the whole eligible population; the register flag is both
//! the indicator output and the numerator of every measure.

use qofr_eval::IndicatorDef;
use qofr_measures::{Measure, POPULATION};

use super::{IndicatorSpec, PopulationBasis, REGISTER_COLUMN, REGISTER_PREDICATE};
use crate::RunConfig;

/// Build the HYP001 register indicator
pub fn hyp001(config: &RunConfig) -> IndicatorSpec {
    let definition = IndicatorDef::register_only("hyp001", REGISTER_COLUMN, REGISTER_PREDICATE);

    let mut measures = vec![
        Measure::new(
            "hyp001_population_rate",
            REGISTER_COLUMN,
            POPULATION,
            POPULATION,
        ),
        Measure::new(
            "hyp001_practice_rate",
            REGISTER_COLUMN,
            POPULATION,
            "practice",
        ),
    ];
    for breakdown in &config.demographic_breakdowns {
        measures.push(Measure::new(
            format!("hyp001_{breakdown}_rate"),
            REGISTER_COLUMN,
            POPULATION,
            breakdown.clone(),
        ));
    }

    IndicatorSpec {
        definition,
        basis: PopulationBasis::Eligible,
        measures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn config() -> RunConfig {
        RunConfig::new(
            NaiveDate::from_ymd_opt(2019, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2022, 4, 1).unwrap(),
        )
    }

    #[test]
    fn test_hyp001_shape() {
        let spec = hyp001(&config());
        assert_eq!(spec.basis, PopulationBasis::Eligible);
        assert!(spec.definition.chain.is_none());
        assert!(spec.definition.achievement.is_none());
        // population + practice + 7 demographic breakdowns
        assert_eq!(spec.measures.len(), 9);
        assert!(spec.measures.iter().all(|m| m.numerator == "hyp_reg"));
        assert!(spec.measures.iter().all(|m| m.small_number_suppression));
    }
}
