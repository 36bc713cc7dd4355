//! The shared eligibility predicate
//!
//! Every indicator's population starts from the same general-population
//! filter, so it is evaluated once upstream of the indicator-specific
//! chains instead of being repeated inside each of them.

use qofr_diagnostics::Result;
use qofr_eval::CompiledRule;
use qofr_model::FactDictionary;

/// General-population filter applied before any indicator logic
pub const ELIGIBILITY_PREDICATE: &str = "
    # Registered for GMS at the achievement date
    gms_reg_status AND
    (NOT died) AND
    (sex = 'F' OR sex = 'M') AND
    # Patients with unknown age are excluded from reporting
    (age_band != 'missing')
";

/// Name the eligibility rule is compiled under, for diagnostics.
/// Eligibility filters the table; it never becomes a column.
pub const ELIGIBILITY_RULE: &str = "eligible";

/// Compile the eligibility predicate
pub fn compile_eligibility(dictionary: &FactDictionary) -> Result<CompiledRule> {
    CompiledRule::standalone(ELIGIBILITY_RULE, ELIGIBILITY_PREDICATE, dictionary)
}
