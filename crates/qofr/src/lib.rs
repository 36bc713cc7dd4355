//! Quality-outcomes-framework business-rule engine
//!
//! This crate computes clinical quality indicators over a patient
//! population: a hypertension register (HYP001), two blood-pressure
//! control indicators instantiated from one parameterized template
//! (HYP003, HYP007), and a blood-pressure recording indicator (BP002).
//!
//! The pipeline:
//!
//! 1. A [`PopulationProvider`] materializes the population table once,
//!    against the declared [`fact_dictionary`].
//! 2. The shared eligibility predicate filters the general population.
//! 3. Each indicator evaluates its register predicate, folds its
//!    select/reject exclusion chain per patient, derives
//!    denominator/numerator flags and appends them as columns.
//! 4. The measure engine partitions rows by the configured breakdown
//!    dimensions, computes rates and applies small-number suppression.
//!
//! # Example
//!
//! ```ignore
//! use qofr::{RunConfig, Runner};
//! use qofr_model::StaticPopulationProvider;
//!
//! let config = RunConfig::new(start_date, end_date);
//! let runner = Runner::new(config)?;
//! let output = runner.run(&provider).await?;
//! for row in output.measures.rows() {
//!     println!("{} {} {:?}", row.measure_id, row.category, row.rate);
//! }
//! ```
//!
//! All rule definitions are compiled, resolved and kind-checked when the
//! [`Runner`] is constructed; a definition error aborts the run before
//! any patient is evaluated. Per-patient data gaps never abort a run:
//! missing facts read as null and coerce to false at rule boundaries.

// Re-export all public APIs from internal crates
pub use qofr_ast as ast;
pub use qofr_diagnostics as diagnostics;
pub use qofr_eval as eval;
pub use qofr_measures as measures;
pub use qofr_model as model;
pub use qofr_parser as parser;

// Convenience re-exports
pub use qofr_diagnostics::{QofError, Result};
pub use qofr_eval::{Disposition, Indicator, IndicatorDef, IndicatorOutcome};
pub use qofr_measures::{Measure, MeasureRow, MeasureTable, SuppressionPolicy};
pub use qofr_model::{
    Codelist, FactDictionary, FactKind, FactValue, Patient, PatientId, Population,
    PopulationProvider, StaticPopulationProvider,
};
pub use qofr_parser::parse_predicate;

mod config;
mod dictionary;
mod eligibility;
pub mod indicators;
mod runner;

pub use config::{RunConfig, DEFAULT_BREAKDOWNS};
pub use dictionary::{fact_dictionary, DATA_CHECKS};
pub use eligibility::{compile_eligibility, ELIGIBILITY_PREDICATE};
pub use runner::{RunOutput, Runner};
