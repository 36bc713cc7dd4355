//! Population provider trait and implementations
//!
//! A `PopulationProvider` asynchronously materializes the population table
//! for a run. The fact dictionary is passed so implementations can inspect
//! the declared fact names and kinds to determine what to fetch. All facts
//! are materialized before the rule pass begins; the engine never performs
//! I/O mid-evaluation.

use async_trait::async_trait;
use thiserror::Error;

use crate::{FactDictionary, Population};

/// Errors that can occur while materializing a population
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// A provider-specific error occurred
    #[error("population provider error: {0}")]
    Provider(String),
}

/// Asynchronous provider of the pre-materialized population table
///
/// Implementations fetch facts from external systems (a cohort extractor,
/// a database export) based on the declared fact dictionary. The engine
/// treats the returned population as immutable.
#[async_trait]
pub trait PopulationProvider: Send + Sync {
    /// Materialize the population for a run
    async fn materialize(&self, dictionary: &FactDictionary) -> Result<Population, ProviderError>;
}

/// A provider that returns a fixed population
///
/// Wraps a `Population` and returns it unchanged on every call. Useful
/// for tests and dummy-data runs where all facts are known ahead of time.
pub struct StaticPopulationProvider {
    population: Population,
}

impl StaticPopulationProvider {
    /// Create a new provider with the given population
    pub fn new(population: Population) -> Self {
        Self { population }
    }

    /// Create a provider with an empty population
    pub fn empty() -> Self {
        Self {
            population: Population::new(),
        }
    }
}

#[async_trait]
impl PopulationProvider for StaticPopulationProvider {
    async fn materialize(&self, _dictionary: &FactDictionary) -> Result<Population, ProviderError> {
        Ok(self.population.clone())
    }
}
