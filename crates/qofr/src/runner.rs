//! The run pipeline: materialize, filter, evaluate, aggregate
//!
//! One `Runner` owns the compiled form of every configured indicator.
//! Compilation happens entirely in the constructor, so a definition
//! problem aborts the run before any patient is touched. `run` then walks
//! the pipeline: provider -> eligibility filter -> per-indicator
//! evaluation -> measures table.

use indexmap::{IndexMap, IndexSet};
use log::info;
use qofr_diagnostics::{QofError, Result, QOF0200, QOF0302, QOF0401};
use qofr_eval::{CompiledRule, EvalError, Indicator, RuleOutputs};
use qofr_measures::{compute_measures, Measure, MeasureTable};
use qofr_model::{Population, PopulationProvider};

use crate::dictionary::fact_dictionary;
use crate::eligibility::compile_eligibility;
use crate::indicators::{bp002, hyp001, hyp003, hyp007, IndicatorSpec, PopulationBasis};
use crate::RunConfig;

#[derive(Debug)]
struct CompiledSpec {
    indicator: Indicator,
    basis: PopulationBasis,
    measures: Vec<Measure>,
}

/// A configured, fully-compiled reporting run
#[derive(Debug)]
pub struct Runner {
    config: RunConfig,
    eligibility: CompiledRule,
    indicators: Vec<CompiledSpec>,
}

/// Everything a run produces
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// The flat measures table, all indicators combined
    pub measures: MeasureTable,
    /// Each indicator's reporting population (augmented rows), by id
    pub populations: IndexMap<String, Population>,
}

impl Runner {
    /// Create a runner with the built-in indicator set: HYP001, HYP003,
    /// HYP007 and BP002
    pub fn new(config: RunConfig) -> Result<Self> {
        let specs = vec![
            hyp001(&config),
            hyp003(&config),
            hyp007(&config),
            bp002(&config),
        ];
        Self::with_indicators(config, specs)
    }

    /// Create a runner with an explicit indicator set
    pub fn with_indicators(config: RunConfig, specs: Vec<IndicatorSpec>) -> Result<Self> {
        let dictionary = fact_dictionary();
        let eligibility = compile_eligibility(dictionary)?;

        let mut measure_ids = IndexSet::new();
        for spec in &specs {
            for measure in &spec.measures {
                if !measure_ids.insert(measure.id.clone()) {
                    return Err(QofError::aggregation_for(
                        QOF0302,
                        format!("Duplicate measure id '{}' across indicators", measure.id),
                        measure.id.clone(),
                    ));
                }
            }
        }

        let indicators = specs
            .into_iter()
            .map(|spec| {
                Indicator::compile(&spec.definition, dictionary).map(|indicator| CompiledSpec {
                    indicator,
                    basis: spec.basis,
                    measures: spec.measures,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            config,
            eligibility,
            indicators,
        })
    }

    /// The run configuration
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Execute the pipeline against a population provider
    pub async fn run(&self, provider: &dyn PopulationProvider) -> Result<RunOutput> {
        let population = provider
            .materialize(fact_dictionary())
            .await
            .map_err(|e| QofError::system(QOF0401, e.to_string()))?;
        info!("materialized {} patients", population.len());

        // Shared general-population filter, evaluated once upstream of
        // every indicator
        let mut eligible = Population::new();
        for patient in population.iter() {
            if self
                .eligibility
                .evaluate(patient, &RuleOutputs::new())
                .map_err(eval_error)?
            {
                eligible.push(patient.clone());
            }
        }
        info!(
            "{} of {} patients eligible",
            eligible.len(),
            population.len()
        );

        let mut measures = MeasureTable::new();
        let mut populations = IndexMap::new();

        for spec in &self.indicators {
            let augmented = spec
                .indicator
                .augment_population(&eligible)
                .map_err(eval_error)?;

            let reporting: Population = match spec.basis {
                PopulationBasis::Eligible => augmented,
                PopulationBasis::Register => augmented
                    .into_iter()
                    .filter(|row| row.fact(spec.indicator.register_column()).is_true())
                    .collect(),
            };
            info!(
                "indicator '{}': {} patients in reporting population",
                spec.indicator.id,
                reporting.len()
            );

            let table = compute_measures(&reporting, &spec.measures, &self.config.suppression)?;
            measures.extend(table.into_rows());
            populations.insert(spec.indicator.id.clone(), reporting);
        }

        Ok(RunOutput {
            measures,
            populations,
        })
    }
}

fn eval_error(e: EvalError) -> QofError {
    QofError::evaluation(QOF0200, e.to_string())
}
