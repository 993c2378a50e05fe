//! Age-dependent parameter tables.
//!
//! A table is a list of age groups, each with a lower bound (years) and a
//! value. The first lower bound must be zero and bounds must not decrease;
//! when a bound is repeated the later value wins.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgeGroup {
    pub lower_bound: f64,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgeGroupConfig {
    /// "none" (piecewise constant) or "linear"
    #[serde(default = "default_interpolation")]
    pub interpolation: String,
    pub groups: Vec<AgeGroup>,
}

fn default_interpolation() -> String {
    "linear".to_string()
}

impl AgeGroupConfig {
    pub fn from_pairs(interpolation: &str, bounds: &[f64], values: &[f64]) -> Self {
        Self {
            interpolation: interpolation.to_string(),
            groups: bounds
                .iter()
                .zip(values)
                .map(|(&lower_bound, &value)| AgeGroup { lower_bound, value })
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum AgeGroupInterpolation {
    /// Value of the group with the highest lower bound not above the age.
    PiecewiseConstant { bounds: Vec<f64>, values: Vec<f64> },
    /// Straight lines between anchor points; constant beyond the last one.
    Linear { ages: Vec<f64>, values: Vec<f64> },
}

impl AgeGroupInterpolation {
    pub fn from_config(config: &AgeGroupConfig, owner: &str) -> Result<Self, ConfigError> {
        let (bounds, values) = dedup_groups(&config.groups, owner)?;
        match config.interpolation.as_str() {
            "none" => Ok(AgeGroupInterpolation::PiecewiseConstant { bounds, values }),
            "linear" => {
                // First value anchored at age 0, each later group's value at
                // the midpoint of the preceding group, the last value at its
                // own lower bound.
                let n = bounds.len();
                let mut ages = Vec::with_capacity(n + 1);
                let mut points = Vec::with_capacity(n + 1);
                ages.push(0.0);
                points.push(values[0]);
                for i in 1..n {
                    ages.push(0.5 * (bounds[i - 1] + bounds[i]));
                    points.push(values[i]);
                }
                if n > 1 {
                    ages.push(bounds[n - 1]);
                    points.push(values[n - 1]);
                }
                Ok(AgeGroupInterpolation::Linear {
                    ages,
                    values: points,
                })
            }
            other => Err(ConfigError::UnknownInterpolation {
                name: other.to_string(),
                owner: owner.to_string(),
            }),
        }
    }

    /// Interpolated value at `age_years`.
    pub fn eval(&self, age_years: f64) -> f64 {
        match self {
            AgeGroupInterpolation::PiecewiseConstant { bounds, values } => {
                let idx = bounds.partition_point(|&b| b <= age_years);
                values[idx.saturating_sub(1)]
            }
            AgeGroupInterpolation::Linear { ages, values } => {
                let last = ages.len() - 1;
                if age_years >= ages[last] {
                    return values[last];
                }
                if age_years <= ages[0] {
                    return values[0];
                }
                // ages[i - 1] <= age < ages[i]
                let i = ages.partition_point(|&a| a <= age_years);
                let (a0, a1) = (ages[i - 1], ages[i]);
                let (v0, v1) = (values[i - 1], values[i]);
                v0 + (age_years - a0) / (a1 - a0) * (v1 - v0)
            }
        }
    }
}

fn dedup_groups(groups: &[AgeGroup], owner: &str) -> Result<(Vec<f64>, Vec<f64>), ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidAgeGroups {
        owner: owner.to_string(),
        reason: reason.to_string(),
    };

    let first = groups.first().ok_or_else(|| invalid("no age groups"))?;
    if first.lower_bound != 0.0 {
        return Err(invalid("first lower bound must be 0"));
    }

    let mut bounds: Vec<f64> = Vec::with_capacity(groups.len());
    let mut values: Vec<f64> = Vec::with_capacity(groups.len());
    for group in groups {
        match bounds.last() {
            Some(&last) if group.lower_bound < last => {
                return Err(invalid("lower bounds must not decrease"));
            }
            Some(&last) if group.lower_bound == last => {
                if let Some(v) = values.last_mut() {
                    *v = group.value;
                }
            }
            _ => {
                bounds.push(group.lower_bound);
                values.push(group.value);
            }
        }
    }
    Ok((bounds, values))
}
