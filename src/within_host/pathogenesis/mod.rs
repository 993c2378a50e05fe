//! Clinical presentation: whether a host's parasite load causes an episode
//! this step, and how severe it is.
//!
//! The presentation models differ only in the probability of an episode:
//! - `pyrogenic`: density relative to a pyrogenic threshold that rises with
//!   exposure and decays back (Smith et al. 2006)
//! - `mueller`: a power law in total density (Mueller et al.)
//!
//! Severity, coinfection and indirect mortality are decided the same way for
//! both.
//!
//! References:
//! - Smith T et al. Am J Trop Med Hyg. 2006;75(2 Suppl):56-62
//! - Ross A et al. Am J Trop Med Hyg. 2006;75(2 Suppl):63-73

mod mueller;
mod pyrogenic;

use std::io::{Read, Write};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::checkpoint::{read_field, write_field, Checkpoint};
use crate::config::ScenarioConfig;
use crate::error::{CheckpointError, ConfigError};
use crate::monitoring::Survey;

pub use mueller::MuellerPresentation;
pub use pyrogenic::PyrogenicPresentation;

/// Outcome of one morbidity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EpisodeState {
    #[default]
    None,
    Malaria,
    /// Malaria with a non-malarial coinfection
    Coinfection,
    Severe,
}

/// Episode state plus the indirect-mortality flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatePair {
    pub state: EpisodeState,
    pub indirect_mortality: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationKind {
    Pyrogenic,
    Mueller,
}

/// Process-wide pathogenesis parameters.
#[derive(Debug, Clone)]
pub struct PathogenesisParams {
    pub kind: PresentationKind,
    pub step_days: f64,
    pub severe_malaria_threshold: f64,
    pub comorbidity_intercept: f64,
    pub critical_age_comorbidity: f64,
    pub indirect_risk_cofactor: f64,
    pub init_pyrogen_threshold: f64,
    pub y_star_1: f64,
    pub y_star_2: f64,
    pub alpha: f64,
    /// Decay rate of the pyrogenic threshold (per day)
    pub smu_y: f64,
    pub mueller_rate_multiplier: f64,
    pub mueller_density_exponent: f64,
}

impl PathogenesisParams {
    pub fn from_scenario(scenario: &ScenarioConfig) -> Result<Self, ConfigError> {
        let kind = match scenario.pathogenesis_model.as_str() {
            "pyrogenic" => PresentationKind::Pyrogenic,
            "mueller" => PresentationKind::Mueller,
            other => {
                return Err(ConfigError::UnknownModel {
                    kind: "pathogenesis",
                    name: other.to_string(),
                })
            }
        };
        let p = &scenario.parameters;
        Ok(Self {
            kind,
            step_days: f64::from(scenario.step_days),
            severe_malaria_threshold: p.severe_malaria_threshold,
            comorbidity_intercept: p.comorbidity_intercept,
            critical_age_comorbidity: p.critical_age_comorbidity,
            indirect_risk_cofactor: p.indirect_risk_cofactor,
            init_pyrogen_threshold: p.init_pyrogen_threshold,
            y_star_1: p.y_star_1,
            y_star_2: p.y_star_2,
            alpha: p.alpha,
            smu_y: -(0.5f64.ln()) / (crate::sim::DAYS_IN_YEAR * p.y_star_half_life_years),
            mueller_rate_multiplier: p.mueller_rate_multiplier,
            mueller_density_exponent: p.mueller_density_exponent,
        })
    }
}

/// Variant-specific part of pathogenesis.
pub trait PresentationModel {
    /// Probability of a clinical episode this step. May update internal
    /// state, so call it exactly once per step.
    fn episode_probability(&mut self, params: &PathogenesisParams, max_density: f64, total_density: f64) -> f64;

    /// Report variant-specific measures.
    fn summarize(&self, _survey: &mut Survey, _age_years: f64) {}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Presentation {
    Pyrogenic(PyrogenicPresentation),
    Mueller(MuellerPresentation),
}

impl Presentation {
    fn model(&self) -> &dyn PresentationModel {
        match self {
            Presentation::Pyrogenic(m) => m,
            Presentation::Mueller(m) => m,
        }
    }

    fn model_mut(&mut self) -> &mut dyn PresentationModel {
        match self {
            Presentation::Pyrogenic(m) => m,
            Presentation::Mueller(m) => m,
        }
    }
}

/// Per-host pathogenesis state.
#[derive(Debug, Clone, PartialEq)]
pub struct Pathogenesis {
    comorbidity_factor: f64,
    presentation: Presentation,
}

impl Pathogenesis {
    pub fn new(params: &PathogenesisParams, comorbidity_factor: f64) -> Self {
        let presentation = match params.kind {
            PresentationKind::Pyrogenic => {
                Presentation::Pyrogenic(PyrogenicPresentation::new(params.init_pyrogen_threshold))
            }
            PresentationKind::Mueller => Presentation::Mueller(MuellerPresentation),
        };
        Self {
            comorbidity_factor,
            presentation,
        }
    }

    pub fn comorbidity_factor(&self) -> f64 {
        self.comorbidity_factor
    }

    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    /// Decide this step's episode state.
    pub fn determine_state<R: Rng + ?Sized>(
        &mut self,
        params: &PathogenesisParams,
        age_years: f64,
        max_density: f64,
        total_density: f64,
        rng: &mut R,
    ) -> StatePair {
        let p_episode = self
            .presentation
            .model_mut()
            .episode_probability(params, max_density, total_density);
        let mut result = StatePair::default();

        if rng.gen::<f64>() < p_episode {
            let p_severe = 1.0 - 1.0 / (1.0 + max_density / params.severe_malaria_threshold);
            let age_effect = 1.0 + age_years / params.critical_age_comorbidity;

            result.state = if rng.gen::<f64>() < p_severe {
                EpisodeState::Severe
            } else {
                let p_coinfection = params.comorbidity_intercept / age_effect * self.comorbidity_factor;
                if rng.gen::<f64>() < p_coinfection {
                    EpisodeState::Coinfection
                } else {
                    EpisodeState::Malaria
                }
            };

            let indirect_risk = params.indirect_risk_cofactor / age_effect * self.comorbidity_factor;
            result.indirect_mortality = rng.gen::<f64>() < indirect_risk;
        }
        result
    }

    pub fn summarize(&self, survey: &mut Survey, age_years: f64) {
        self.presentation.model().summarize(survey, age_years);
    }
}

impl Checkpoint for Pathogenesis {
    /// Comorbidity factor, then the presentation variant and its state.
    fn save<W: Write>(&self, w: &mut W) -> Result<(), CheckpointError> {
        write_field(w, &self.comorbidity_factor)?;
        write_field(w, &self.presentation)
    }

    fn restore<R: Read>(&mut self, r: &mut R) -> Result<(), CheckpointError> {
        self.comorbidity_factor = read_field(r)?;
        self.presentation = read_field(r)?;
        Ok(())
    }
}
