use serde::{Deserialize, Serialize};

use super::{ImmunityContext, InfectionCore, InfectionKind, InfectionModel, InfectionParams};
use crate::config::DescriptiveInfectionConfig;
use crate::sim::SimTime;

/// Parametric infection whose naive log density rises linearly to a peak
/// and then falls linearly to zero at the end of the infection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveInfection {
    core: InfectionCore,
    /// Product of all drug survival factors so far
    drug_survival: f64,
}

impl Default for DescriptiveInfection {
    fn default() -> Self {
        Self {
            core: InfectionCore::default(),
            drug_survival: 1.0,
        }
    }
}

impl DescriptiveInfection {
    pub fn new(start: SimTime, genotype: u32) -> Self {
        Self {
            core: InfectionCore::new(start, genotype),
            drug_survival: 1.0,
        }
    }

    pub fn drug_survival(&self) -> f64 {
        self.drug_survival
    }
}

/// Naive-host log density `age` days into the blood stage.
fn naive_log_density(cfg: &DescriptiveInfectionConfig, age: i32) -> f64 {
    if age <= cfg.days_to_peak {
        cfg.peak_log_density * f64::from(age + 1) / f64::from(cfg.days_to_peak + 1)
    } else {
        let decline = (cfg.duration_days - cfg.days_to_peak).max(1);
        cfg.peak_log_density * f64::from(cfg.duration_days - age) / f64::from(decline)
    }
}

impl InfectionModel for DescriptiveInfection {
    fn core(&self) -> &InfectionCore {
        &self.core
    }

    fn update_density(
        &mut self,
        params: &InfectionParams,
        day: SimTime,
        immunity: &ImmunityContext,
        drug_factor: f64,
    ) -> bool {
        let InfectionKind::Descriptive(cfg) = &params.kind else {
            unreachable!("descriptive infection under another infection model")
        };
        let age = self.core.blood_stage_age(params, day);
        if age < 0 {
            return false;
        }
        if age >= cfg.duration_days {
            self.core.density = 0.0;
            return true;
        }

        self.drug_survival *= drug_factor;
        let immune = params.immunity_survival_factor(
            immunity.age_years,
            immunity.cumulative_h,
            immunity.cumulative_y,
            self.core.cumulative_exposure_j,
        );
        self.core.density = naive_log_density(cfg, age).exp()
            * immune
            * immunity.innate_factor
            * self.drug_survival;
        self.core.cumulative_exposure_j += self.core.density;

        // Before the peak a small density only ends the infection once drugs act
        let can_die = age > cfg.days_to_peak || self.drug_survival < 1.0;
        can_die && self.core.density < cfg.extinction_density
    }
}
