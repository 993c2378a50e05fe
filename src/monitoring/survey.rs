//! Per-age-group survey counters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Quantities hosts report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Measure {
    /// Hosts with at least one infection
    InfectedHosts,
    /// Infections (liver and blood stage)
    Infections,
    /// Infections above the detection limit
    PatentInfections,
    /// Hosts whose total density is above the detection limit
    PatentHosts,
    /// Sum of ln(total density) over patent hosts
    LogDensity,
    /// Sum of pyrogenic thresholds
    PyrogenicThreshold,
    /// Sum of ln(pyrogenic threshold)
    LogPyrogenicThreshold,
}

/// One survey cell, as exported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyRecord {
    pub measure: Measure,
    pub age_group: usize,
    pub value: f64,
}

/// Survey counters keyed by measure and age group.
#[derive(Debug, Clone)]
pub struct Survey {
    /// Exclusive upper bounds of the age groups (years), ascending
    age_upper_bounds: Vec<f64>,
    values: BTreeMap<(Measure, usize), f64>,
}

impl Survey {
    /// Ages at or above the last bound are not reported.
    pub fn new(age_upper_bounds: Vec<f64>) -> Self {
        Self {
            age_upper_bounds,
            values: BTreeMap::new(),
        }
    }

    /// A single age group covering every age.
    pub fn all_ages() -> Self {
        Self::new(vec![f64::INFINITY])
    }

    pub fn age_group(&self, age_years: f64) -> Option<usize> {
        let group = self.age_upper_bounds.partition_point(|&ub| ub <= age_years);
        (group < self.age_upper_bounds.len()).then_some(group)
    }

    pub fn add_int(&mut self, measure: Measure, age_years: f64, count: i64) -> &mut Self {
        self.add_double(measure, age_years, count as f64)
    }

    pub fn add_double(&mut self, measure: Measure, age_years: f64, value: f64) -> &mut Self {
        if let Some(group) = self.age_group(age_years) {
            *self.values.entry((measure, group)).or_insert(0.0) += value;
        }
        self
    }

    pub fn get(&self, measure: Measure, age_group: usize) -> f64 {
        self.values.get(&(measure, age_group)).copied().unwrap_or(0.0)
    }

    /// Sum over age groups.
    pub fn total(&self, measure: Measure) -> f64 {
        self.values
            .iter()
            .filter(|((m, _), _)| *m == measure)
            .map(|(_, v)| v)
            .sum()
    }

    pub fn records(&self) -> Vec<SurveyRecord> {
        self.values
            .iter()
            .map(|(&(measure, age_group), &value)| SurveyRecord {
                measure,
                age_group,
                value,
            })
            .collect()
    }

    pub fn reset(&mut self) {
        self.values.clear();
    }
}
