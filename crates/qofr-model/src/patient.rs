//! Patients and populations
//!
//! A patient is one immutable row of the population table: an opaque id
//! plus a mapping from fact name to value. Facts are materialized once by
//! the provider before the rule pass begins and never mutated during it.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::FactValue;

/// Opaque patient identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatientId(String);

impl PatientId {
    /// Create a new patient id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PatientId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PatientId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// One row of the population table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    /// Opaque identifier
    pub id: PatientId,
    /// Fact name -> value
    facts: IndexMap<String, FactValue>,
}

impl Patient {
    /// Create a patient with no facts
    pub fn new(id: impl Into<PatientId>) -> Self {
        Self {
            id: id.into(),
            facts: IndexMap::new(),
        }
    }

    /// Builder-style fact assignment
    pub fn with_fact(mut self, name: impl Into<String>, value: impl Into<FactValue>) -> Self {
        self.facts.insert(name.into(), value.into());
        self
    }

    /// Set a fact value
    pub fn set_fact(&mut self, name: impl Into<String>, value: impl Into<FactValue>) {
        self.facts.insert(name.into(), value.into());
    }

    /// Get a fact value; an absent fact reads as `Null`
    pub fn fact(&self, name: &str) -> &FactValue {
        self.facts.get(name).unwrap_or(&FactValue::Null)
    }

    /// Check whether a fact is present and non-null
    pub fn has_fact(&self, name: &str) -> bool {
        !self.fact(name).is_null()
    }

    /// Iterate over the patient's facts
    pub fn facts(&self) -> impl Iterator<Item = (&str, &FactValue)> {
        self.facts.iter().map(|(name, value)| (name.as_str(), value))
    }
}

/// An ordered collection of patients
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Population {
    patients: Vec<Patient>,
}

impl Population {
    /// Create an empty population
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a patient
    pub fn push(&mut self, patient: Patient) {
        self.patients.push(patient);
    }

    /// Number of patients
    pub fn len(&self) -> usize {
        self.patients.len()
    }

    /// Check if the population is empty
    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }

    /// Iterate over patients
    pub fn iter(&self) -> impl Iterator<Item = &Patient> {
        self.patients.iter()
    }
}

impl FromIterator<Patient> for Population {
    fn from_iter<I: IntoIterator<Item = Patient>>(iter: I) -> Self {
        Self {
            patients: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Population {
    type Item = Patient;
    type IntoIter = std::vec::IntoIter<Patient>;

    fn into_iter(self) -> Self::IntoIter {
        self.patients.into_iter()
    }
}
