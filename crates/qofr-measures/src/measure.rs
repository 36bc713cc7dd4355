//! Measure definitions

use serde::{Deserialize, Serialize};

/// Pseudo-column meaning "every row of the table"
///
/// Usable as a measure denominator (rate over the whole population) and as
/// a group-by dimension (a single all-patients stratum).
pub const POPULATION: &str = "population";

/// A configured measure: which columns to count and how to stratify
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measure {
    /// Measure id (e.g. "hyp003_achievem_sex_breakdown_rate")
    pub id: String,
    /// Boolean column counted in the numerator
    pub numerator: String,
    /// Boolean column counted in the denominator, or [`POPULATION`]
    pub denominator: String,
    /// Dimension column to stratify by, or [`POPULATION`]
    pub group_by: String,
    /// Whether small-number suppression applies to this measure
    pub small_number_suppression: bool,
}

impl Measure {
    /// Create a measure with suppression enabled
    pub fn new(
        id: impl Into<String>,
        numerator: impl Into<String>,
        denominator: impl Into<String>,
        group_by: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            numerator: numerator.into(),
            denominator: denominator.into(),
            group_by: group_by.into(),
            small_number_suppression: true,
        }
    }

    /// Disable suppression (dummy-data runs only)
    pub fn without_suppression(mut self) -> Self {
        self.small_number_suppression = false;
        self
    }
}
