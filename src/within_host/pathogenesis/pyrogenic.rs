use serde::{Deserialize, Serialize};

use super::{PathogenesisParams, PresentationModel};
use crate::monitoring::{Measure, Survey};

/// Sub-steps of the threshold integration per time step
const THRESHOLD_SUBSTEPS: u32 = 11;

/// Episode probability relative to a per-host pyrogenic threshold.
///
/// The threshold grows while parasites are present and decays back with a
/// fixed half-life.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PyrogenicPresentation {
    /// Y* (parasites/µL)
    threshold: f64,
}

impl PyrogenicPresentation {
    pub fn new(initial_threshold: f64) -> Self {
        Self {
            threshold: initial_threshold,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Euler integration of the threshold over one step.
    fn update_threshold(&mut self, params: &PathogenesisParams, total_density: f64) {
        let delt = 1.0 / f64::from(THRESHOLD_SUBSTEPS);
        for _ in 0..THRESHOLD_SUBSTEPS {
            self.threshold += total_density * params.alpha * params.step_days * delt
                / ((params.y_star_1 + total_density) * (params.y_star_2 + self.threshold))
                - params.smu_y * self.threshold * params.step_days * delt;
        }
    }
}

impl PresentationModel for PyrogenicPresentation {
    fn episode_probability(&mut self, params: &PathogenesisParams, max_density: f64, total_density: f64) -> f64 {
        self.update_threshold(params, total_density);
        1.0 - 1.0 / (1.0 + max_density / self.threshold)
    }

    fn summarize(&self, survey: &mut Survey, age_years: f64) {
        survey
            .add_double(Measure::PyrogenicThreshold, age_years, self.threshold)
            .add_double(Measure::LogPyrogenicThreshold, age_years, self.threshold.ln());
    }
}
