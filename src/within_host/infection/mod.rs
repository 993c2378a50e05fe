//! Individual P. falciparum infections.
//!
//! An infection spends the latent period in the liver, then produces a daily
//! blood-stage density. Two models are available:
//! - `dummy`: fixed daily growth to a cap, drugs only; for testing
//! - `descriptive`: a parametric density curve scaled by acquired, innate and
//!   maternal immunity and by drugs
//!
//! References:
//! - Maire N et al. Am J Trop Med Hyg. 2006;75(2 Suppl):19-31

mod descriptive;
mod dummy;

use serde::{Deserialize, Serialize};

use crate::config::{DescriptiveInfectionConfig, DummyInfectionConfig, ScenarioConfig};
use crate::error::ConfigError;
use crate::sim::SimTime;

pub use descriptive::DescriptiveInfection;
pub use dummy::DummyInfection;

/// Where an infection currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfectionStage {
    Liver,
    Blood,
}

/// Which infections a clearance applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearanceStage {
    Liver,
    Blood,
    Both,
}

impl ClearanceStage {
    pub fn includes(self, stage: InfectionStage) -> bool {
        match self {
            ClearanceStage::Liver => stage == InfectionStage::Liver,
            ClearanceStage::Blood => stage == InfectionStage::Blood,
            ClearanceStage::Both => true,
        }
    }
}

#[derive(Debug, Clone)]
pub enum InfectionKind {
    Dummy(DummyInfectionConfig),
    Descriptive(DescriptiveInfectionConfig),
}

/// Process-wide infection parameters.
#[derive(Debug, Clone)]
pub struct InfectionParams {
    pub latent_period: SimTime,
    pub inv_cumulative_h_star: f64,
    pub inv_cumulative_y_star: f64,
    pub alpha_m: f64,
    pub decay_m: f64,
    pub kind: InfectionKind,
}

impl InfectionParams {
    pub fn from_scenario(scenario: &ScenarioConfig) -> Result<Self, ConfigError> {
        let kind = match scenario.infection.model.as_str() {
            "dummy" => InfectionKind::Dummy(scenario.infection.dummy.clone()),
            "descriptive" => InfectionKind::Descriptive(scenario.infection.descriptive.clone()),
            other => {
                return Err(ConfigError::UnknownModel {
                    kind: "infection",
                    name: other.to_string(),
                })
            }
        };
        let p = &scenario.parameters;
        Ok(Self {
            latent_period: SimTime::from_days(scenario.latent_period_days),
            inv_cumulative_h_star: 1.0 / p.cumulative_h_star,
            inv_cumulative_y_star: 1.0 / p.cumulative_y_star,
            alpha_m: p.alpha_m(),
            decay_m: p.decay_m,
            kind,
        })
    }

    /// Survival factor from acquired and maternal immunity, capped at 1.
    ///
    /// `exposure_j` is this infection's own contribution to `cumulative_y`,
    /// which does not count towards immunity against itself.
    pub fn immunity_survival_factor(
        &self,
        age_years: f64,
        cumulative_h: f64,
        cumulative_y: f64,
        exposure_j: f64,
    ) -> f64 {
        let (d_h, d_y) = if cumulative_h <= 1.0 {
            (1.0, 1.0)
        } else {
            (
                1.0 / (1.0 + (cumulative_h - 1.0) * self.inv_cumulative_h_star),
                1.0 / (1.0 + (cumulative_y - exposure_j) * self.inv_cumulative_y_star),
            )
        };
        let d_a = 1.0 - self.alpha_m * (-self.decay_m * age_years).exp();
        (d_y * d_h * d_a).min(1.0)
    }
}

/// Host state an infection's density depends on.
#[derive(Debug, Clone, Copy)]
pub struct ImmunityContext {
    pub age_years: f64,
    pub cumulative_h: f64,
    pub cumulative_y: f64,
    pub innate_factor: f64,
}

/// Fields shared by every infection model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InfectionCore {
    pub start: SimTime,
    pub genotype: u32,
    /// Current density (parasites/µL)
    pub density: f64,
    /// Cumulative density of this infection (parasite-days/µL)
    pub cumulative_exposure_j: f64,
}

impl InfectionCore {
    pub fn new(start: SimTime, genotype: u32) -> Self {
        Self {
            start,
            genotype,
            density: 0.0,
            cumulative_exposure_j: 0.0,
        }
    }

    /// Days since emerging from the liver; negative while in the liver.
    pub fn blood_stage_age(&self, params: &InfectionParams, day: SimTime) -> i32 {
        (day - self.start - params.latent_period).in_days()
    }
}

/// Behaviour common to the infection models.
pub trait InfectionModel {
    fn core(&self) -> &InfectionCore;

    /// Compute the density for `day` given today's drug survival factor.
    /// Returns true when the infection has ended and should be removed.
    fn update_density(
        &mut self,
        params: &InfectionParams,
        day: SimTime,
        immunity: &ImmunityContext,
        drug_factor: f64,
    ) -> bool;

    fn density(&self) -> f64 {
        self.core().density
    }

    fn genotype(&self) -> u32 {
        self.core().genotype
    }

    fn cumulative_exposure_j(&self) -> f64 {
        self.core().cumulative_exposure_j
    }

    fn stage(&self, params: &InfectionParams, now: SimTime) -> InfectionStage {
        if self.core().blood_stage_age(params, now) < 0 {
            InfectionStage::Liver
        } else {
            InfectionStage::Blood
        }
    }
}

/// An infection of whichever model the scenario selected.
///
/// Checkpointed as the variant index followed by the model's fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Infection {
    Dummy(DummyInfection),
    Descriptive(DescriptiveInfection),
}

impl Infection {
    pub fn new(params: &InfectionParams, start: SimTime, genotype: u32) -> Self {
        match params.kind {
            InfectionKind::Dummy(_) => Infection::Dummy(DummyInfection::new(start, genotype)),
            InfectionKind::Descriptive(_) => {
                Infection::Descriptive(DescriptiveInfection::new(start, genotype))
            }
        }
    }

    fn model(&self) -> &dyn InfectionModel {
        match self {
            Infection::Dummy(inf) => inf,
            Infection::Descriptive(inf) => inf,
        }
    }
}

impl Default for Infection {
    fn default() -> Self {
        Infection::Dummy(DummyInfection::default())
    }
}

impl InfectionModel for Infection {
    fn core(&self) -> &InfectionCore {
        self.model().core()
    }

    fn update_density(
        &mut self,
        params: &InfectionParams,
        day: SimTime,
        immunity: &ImmunityContext,
        drug_factor: f64,
    ) -> bool {
        match self {
            Infection::Dummy(inf) => inf.update_density(params, day, immunity, drug_factor),
            Infection::Descriptive(inf) => inf.update_density(params, day, immunity, drug_factor),
        }
    }
}
