//! The built-in fact dictionary
//!
//! Declares every fact the built-in indicators reference. The cohort
//! extractor materializes these per patient, anchored at the configured
//! achievement date: `*_12m` flags cover the 12 months up to and including
//! it, `*_9m` flags the 9 months before it.

use once_cell::sync::Lazy;
use qofr_model::{FactDictionary, FactKind};

static DICTIONARY: Lazy<FactDictionary> = Lazy::new(|| {
    FactDictionary::new()
        // Population / eligibility
        .with("gms_reg_status", FactKind::Boolean)
        .with("died", FactKind::Boolean)
        // Demographics
        .with("age", FactKind::Number)
        .with("age_band", FactKind::Category)
        .with("sex", FactKind::Category)
        .with("imd_q5", FactKind::Category)
        .with("region", FactKind::Category)
        .with("ethnicity", FactKind::Category)
        .with("learning_disability", FactKind::Category)
        .with("care_home", FactKind::Category)
        .with("practice", FactKind::Category)
        // Register events: latest coded event and its date
        .with_dated_flag("hypertension")
        .with_dated_flag("hypertension_resolved")
        // Blood pressure readings (latest in the lookback window)
        .with("bp_sys_value", FactKind::Number)
        .with("bp_dia_value", FactKind::Number)
        .with("bp_recorded_12m", FactKind::Boolean)
        // Exclusion-window flags
        .with("ht_max_therapy_12m", FactKind::Boolean)
        .with("ht_care_unsuitable_12m", FactKind::Boolean)
        .with("bp_declined_12m", FactKind::Boolean)
        .with("ht_care_declined_12m", FactKind::Boolean)
        .with("hyp_invite_1_12m", FactKind::Boolean)
        .with("hyp_invite_2_12m", FactKind::Boolean)
        .with("hyp_diagnosed_9m", FactKind::Boolean)
        .with("registered_9m", FactKind::Boolean)
        // Blood pressure data-quality checks
        .with("bp_sys_dia_min_cutoff", FactKind::Boolean)
        .with("bp_sys_dia_max_cutoff", FactKind::Boolean)
        .with("bp_sys_dia_date_missing", FactKind::Boolean)
        .with("bp_sys_dia_date_available", FactKind::Boolean)
        .with("bp_sys_dia_date_equal", FactKind::Boolean)
});

/// The dictionary the built-in indicators are compiled against
pub fn fact_dictionary() -> &'static FactDictionary {
    &DICTIONARY
}

/// The data-quality check facts reported by `<indicator>_check_*` measures
pub const DATA_CHECKS: [&str; 5] = [
    "bp_sys_dia_min_cutoff",
    "bp_sys_dia_max_cutoff",
    "bp_sys_dia_date_missing",
    "bp_sys_dia_date_available",
    "bp_sys_dia_date_equal",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dictionary_declares_core_facts() {
        let dict = fact_dictionary();
        assert_eq!(dict.kind_of("sex"), Some(FactKind::Category));
        assert_eq!(dict.kind_of("age"), Some(FactKind::Number));
        assert_eq!(dict.kind_of("hypertension"), Some(FactKind::Boolean));
        assert_eq!(dict.kind_of("hypertension_date"), Some(FactKind::Date));
        assert_eq!(dict.kind_of("bp_sys_value"), Some(FactKind::Number));
        for check in DATA_CHECKS {
            assert_eq!(dict.kind_of(check), Some(FactKind::Boolean), "{check}");
        }
    }
}
