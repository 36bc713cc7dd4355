//! Run configuration
//!
//! Read once at construction time. The date window anchors every "as of"
//! evaluation: the end date is the achievement date (payment period end
//! date) the provider derives its lookback facts from.

use chrono::NaiveDate;
use qofr_measures::SuppressionPolicy;
use serde::{Deserialize, Serialize};

/// The default demographic breakdown dimensions for reported measures
pub const DEFAULT_BREAKDOWNS: [&str; 7] = [
    "age_band",
    "sex",
    "region",
    "care_home",
    "learning_disability",
    "imd_q5",
    "ethnicity",
];

/// Configuration for one reporting run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Payment period start date
    pub start_date: NaiveDate,
    /// Payment period end date (the achievement date)
    pub end_date: NaiveDate,
    /// Demographic dimensions measures are broken down by
    pub demographic_breakdowns: Vec<String>,
    /// Small-number suppression policy
    pub suppression: SuppressionPolicy,
}

impl RunConfig {
    /// Create a configuration with the default breakdowns and suppression
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            demographic_breakdowns: DEFAULT_BREAKDOWNS.iter().map(ToString::to_string).collect(),
            suppression: SuppressionPolicy::default(),
        }
    }

    /// Replace the breakdown dimensions
    pub fn with_breakdowns<I, S>(mut self, breakdowns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.demographic_breakdowns = breakdowns.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the suppression policy
    pub fn with_suppression(mut self, suppression: SuppressionPolicy) -> Self {
        self.suppression = suppression;
        self
    }
}
