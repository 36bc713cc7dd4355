//! QOFR rule-chain evaluation engine
//!
//! This crate turns declarative rule definitions into compiled, per-patient
//! evaluators:
//!
//! - **Compilation** parses every predicate once, resolves fact and rule
//!   references against the declared dictionary, and kind-checks
//!   comparisons. All definition problems surface here, before any patient
//!   is evaluated.
//! - **Rule evaluation** uses three-valued logic: a missing fact reads as
//!   null, `AND` is false-dominant, `OR` is true-dominant, and null coerces
//!   to false at rule boundaries. Rules are pure functions of the patient's
//!   facts and earlier rule outputs, so re-runs are idempotent.
//! - **The chain fold** evaluates every rule (their raw booleans feed
//!   exclusion-count and flowchart measures), then attributes the outcome
//!   to the lowest-indexed decisive rule. Exactly one terminal disposition
//!   is produced per patient; a chain exhausted without a decisive rule
//!   selects.
//! - **Indicator evaluation** combines register membership, the chain
//!   result and an achievement test so that
//!   `numerator => denominator => register` holds for every patient, and
//!   appends the derived boolean columns to the population table for
//!   aggregation.

mod chain;
mod compile;
mod error;
mod indicator;
mod rule;

pub use chain::{ChainOutcome, CompiledChain, Disposition};
pub use error::{EvalError, EvalResult};
pub use indicator::{AchievementDef, Indicator, IndicatorDef, IndicatorOutcome};
pub use rule::{CompiledRule, RuleOutputs};
