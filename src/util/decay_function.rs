//! Decay curves for intervention efficacy.
//!
//! Each curve is `initial_value × f(x)` with `x = age / L`, `L` the
//! characteristic duration in years (the half-life for the exponential,
//! Weibull and Hill shapes, the support for the compact ones) and `k` a shape
//! parameter.
//!
//! | Shape | f(x) |
//! |-------|------|
//! | constant | 1 |
//! | step | 1 if x < 1, else 0 |
//! | linear | 1 − x if x < 1, else 0 |
//! | exponential | exp(−x ln 2) |
//! | weibull | exp(−x^k ln 2) |
//! | hill | 1 / (1 + x^k) |
//! | smooth-compact | exp(k − k / (1 − x²)) if x < 1, else 0 |
//!
//! Reference: Chitnis N et al. Malaria Journal 2010;9:53 (smooth-compact)

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::SimTime;

/// Decay curve description as written in configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecayFunctionConfig {
    /// Curve name, e.g. "exponential"
    pub function: String,
    /// Characteristic duration L (years)
    pub l_years: f64,
    /// Shape parameter k
    #[serde(default = "default_k")]
    pub k: f64,
    /// Value at age zero
    #[serde(default = "default_initial")]
    pub initial_value: f64,
}

fn default_k() -> f64 {
    1.0
}

fn default_initial() -> f64 {
    1.0
}

impl DecayFunctionConfig {
    pub fn new(function: &str, l_years: f64, initial_value: f64) -> Self {
        Self {
            function: function.to_string(),
            l_years,
            k: default_k(),
            initial_value,
        }
    }

    pub fn with_k(mut self, k: f64) -> Self {
        self.k = k;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DecayShape {
    Constant,
    Step,
    Linear,
    Exponential,
    Weibull,
    Hill,
    SmoothCompact,
}

impl DecayShape {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "constant" => Some(DecayShape::Constant),
            "step" => Some(DecayShape::Step),
            "linear" => Some(DecayShape::Linear),
            "exponential" => Some(DecayShape::Exponential),
            "weibull" => Some(DecayShape::Weibull),
            "hill" => Some(DecayShape::Hill),
            "smooth-compact" | "chitnis" => Some(DecayShape::SmoothCompact),
            _ => None,
        }
    }
}

/// A configured decay curve.
#[derive(Debug, Clone)]
pub struct DecayFunction {
    shape: DecayShape,
    inv_l: f64,
    k: f64,
    initial_value: f64,
}

impl DecayFunction {
    /// Build from configuration; `owner` names the element using the curve
    /// and appears in the error for an unknown shape.
    pub fn from_config(config: &DecayFunctionConfig, owner: &str) -> Result<Self, ConfigError> {
        let shape =
            DecayShape::from_name(&config.function).ok_or_else(|| ConfigError::UnknownDecayFunction {
                name: config.function.clone(),
                owner: owner.to_string(),
            })?;
        Ok(Self {
            shape,
            inv_l: 1.0 / config.l_years,
            k: config.k,
            initial_value: config.initial_value,
        })
    }

    pub fn shape(&self) -> DecayShape {
        self.shape
    }

    /// Value at the given age.
    pub fn eval(&self, age: SimTime) -> f64 {
        self.initial_value * self.eval_fraction(age.in_years())
    }

    fn eval_fraction(&self, age_years: f64) -> f64 {
        let x = age_years * self.inv_l;
        match self.shape {
            DecayShape::Constant => 1.0,
            DecayShape::Step => {
                if x < 1.0 {
                    1.0
                } else {
                    0.0
                }
            }
            DecayShape::Linear => {
                if x < 1.0 {
                    1.0 - x
                } else {
                    0.0
                }
            }
            DecayShape::Exponential => (-x * std::f64::consts::LN_2).exp(),
            DecayShape::Weibull => (-x.powf(self.k) * std::f64::consts::LN_2).exp(),
            DecayShape::Hill => 1.0 / (1.0 + x.powf(self.k)),
            DecayShape::SmoothCompact => {
                if x < 1.0 {
                    (self.k - self.k / (1.0 - x * x)).exp()
                } else {
                    0.0
                }
            }
        }
    }
}
