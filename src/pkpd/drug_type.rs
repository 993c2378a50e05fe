//! Process-wide drug type data and the pharmacodynamic curve.

use std::sync::Arc;

use rand::Rng;

use crate::config::{DrugTypeConfig, PdConfig};
use crate::error::ConfigError;
use crate::util::LognormalSampler;

/// Pharmacodynamic parameters for one drug against one parasite genotype.
///
/// Killing follows a Hill curve in concentration,
/// `kill(C) = Vmax · Cⁿ / (Cⁿ + IC50ⁿ)`, integrated analytically under
/// first-order elimination.
///
/// Reference: Hastings IM, Winter K. Malaria Journal 2011;10:270
#[derive(Debug, Clone)]
pub struct PdParameters {
    slope: f64,
    ic50_pow_slope: f64,
    max_killing_rate: f64,
}

impl PdParameters {
    pub fn new(config: &PdConfig) -> Self {
        Self {
            slope: config.slope,
            ic50_pow_slope: config.ic50.powf(config.slope),
            max_killing_rate: config.max_killing_rate,
        }
    }

    /// Parasite survival factor over `duration` days starting at
    /// concentration `conc` (mg/L), with `neg_elim_rate` = −k.
    ///
    /// `((IC50ⁿ + C(t)ⁿ) / (IC50ⁿ + C(0)ⁿ))^(Vmax / (k n))`
    pub fn calc_factor(&self, neg_elim_rate: f64, conc: f64, duration: f64) -> f64 {
        let conc_after_decay = conc * (neg_elim_rate * duration).exp();
        let numerator = self.ic50_pow_slope + conc_after_decay.powf(self.slope);
        let denominator = self.ic50_pow_slope + conc.powf(self.slope);
        (numerator / denominator).powf(self.max_killing_rate / (-neg_elim_rate * self.slope))
    }
}

/// Everything about a drug that is shared by all of its instances.
#[derive(Debug, Clone)]
pub struct DrugType {
    index: usize,
    name: String,
    negligible_concentration: f64,
    elimination_rate: LognormalSampler,
    vol_dist: LognormalSampler,
    pd: Vec<PdParameters>,
}

impl DrugType {
    pub fn from_config(index: usize, config: &DrugTypeConfig) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidDrug {
            drug: config.name.clone(),
            reason: reason.to_string(),
        };

        if !(config.half_life_days > 0.0) || !config.half_life_days.is_finite() {
            return Err(invalid("half-life must be positive and finite"));
        }
        if !(config.negligible_concentration >= 0.0) {
            return Err(invalid("negligible concentration must not be negative"));
        }
        if config.pd.is_empty() {
            return Err(invalid("no pharmacodynamic parameters"));
        }
        for pd in &config.pd {
            if !(pd.slope > 0.0) || !(pd.ic50 > 0.0) || !(pd.max_killing_rate >= 0.0) {
                return Err(invalid("PD slope and IC50 must be positive"));
            }
        }

        let k = std::f64::consts::LN_2 / config.half_life_days;
        let elimination_rate = LognormalSampler::new(k, config.elimination_rate_cv)
            .ok_or_else(|| invalid("invalid elimination rate CV"))?;
        let vol_dist = LognormalSampler::new(config.vol_dist_l_per_kg, config.vol_dist_cv)
            .ok_or_else(|| invalid("volume of distribution must be positive"))?;

        Ok(Self {
            index,
            name: config.name.clone(),
            negligible_concentration: config.negligible_concentration,
            elimination_rate,
            vol_dist,
            pd: config.pd.iter().map(PdParameters::new).collect(),
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn negligible_concentration(&self) -> f64 {
        self.negligible_concentration
    }

    pub fn genotype_count(&self) -> usize {
        self.pd.len()
    }

    /// PD parameters for a genotype. Panics on an unconfigured genotype.
    pub fn pd(&self, genotype: u32) -> &PdParameters {
        &self.pd[genotype as usize]
    }

    /// Draw an elimination rate k (per day).
    pub fn sample_k<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.elimination_rate.sample(rng)
    }

    /// Draw a volume of distribution (L/kg).
    pub fn sample_vd<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.vol_dist.sample(rng)
    }
}

/// All configured drug types, indexed by configuration order.
#[derive(Debug, Clone, Default)]
pub struct DrugRegistry {
    types: Vec<Arc<DrugType>>,
}

impl DrugRegistry {
    pub fn from_configs(configs: &[DrugTypeConfig]) -> Result<Self, ConfigError> {
        let types = configs
            .iter()
            .enumerate()
            .map(|(i, c)| DrugType::from_config(i, c).map(Arc::new))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { types })
    }

    pub fn get(&self, index: usize) -> Option<&Arc<DrugType>> {
        self.types.get(index)
    }

    pub fn find(&self, name: &str) -> Option<&Arc<DrugType>> {
        self.types.iter().find(|t| t.name == name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
