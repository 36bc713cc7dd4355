//! Built-in indicator definitions
//!
//! The hypertension register (HYP001), the two blood-pressure control
//! indicators (HYP003 and HYP007, instantiated from one parameterized
//! template), and the BP002 recording indicator over the register.

mod bp002;
mod bp_control;
mod hyp001;

pub use bp002::bp002;
pub use bp_control::{bp_control, hyp003, hyp007, AgeBand, BpControlParams};
pub use hyp001::hyp001;

use qofr_eval::IndicatorDef;
use qofr_measures::Measure;
use serde::{Deserialize, Serialize};

/// Which patients form an indicator's reporting table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PopulationBasis {
    /// All eligible patients
    Eligible,
    /// Eligible patients on the hypertension register
    Register,
}

/// A complete indicator: definition, table basis and reported measures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSpec {
    /// The rule definitions
    pub definition: IndicatorDef,
    /// Which patients appear in the indicator's table
    pub basis: PopulationBasis,
    /// Measures reported for this indicator
    pub measures: Vec<Measure>,
}

/// Column name for hypertension register membership
pub const REGISTER_COLUMN: &str = "hyp_reg";

/// The hypertension register predicate: an unresolved diagnosis of
/// hypertension, or one re-recorded after its last resolution
pub const REGISTER_PREDICATE: &str = "
    # Select patients with a diagnosis of hypertension which has not
    # been subsequently resolved.
    hypertension AND (NOT hypertension_resolved) OR
    (hypertension_resolved_date <= hypertension_date)
";
