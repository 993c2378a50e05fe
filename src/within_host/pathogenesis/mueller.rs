use serde::{Deserialize, Serialize};

use super::{PathogenesisParams, PresentationModel};
use crate::sim::DAYS_IN_YEAR;

/// Episode incidence as a power law of total density; stateless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MuellerPresentation;

impl PresentationModel for MuellerPresentation {
    fn episode_probability(&mut self, params: &PathogenesisParams, _max_density: f64, total_density: f64) -> f64 {
        let incidence = params.mueller_rate_multiplier
            * total_density.powf(params.mueller_density_exponent)
            * (params.step_days / DAYS_IN_YEAR);
        1.0 - (-incidence).exp()
    }
}
