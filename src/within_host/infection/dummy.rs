use serde::{Deserialize, Serialize};

use super::{ImmunityContext, InfectionCore, InfectionKind, InfectionModel, InfectionParams};
use crate::sim::SimTime;

/// Grows by a fixed factor each day up to a cap; only drugs act on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DummyInfection {
    core: InfectionCore,
}

impl DummyInfection {
    pub fn new(start: SimTime, genotype: u32) -> Self {
        Self {
            core: InfectionCore::new(start, genotype),
        }
    }
}

impl InfectionModel for DummyInfection {
    fn core(&self) -> &InfectionCore {
        &self.core
    }

    fn update_density(
        &mut self,
        params: &InfectionParams,
        day: SimTime,
        _immunity: &ImmunityContext,
        drug_factor: f64,
    ) -> bool {
        let InfectionKind::Dummy(cfg) = &params.kind else {
            unreachable!("dummy infection under another infection model")
        };
        let age = self.core.blood_stage_age(params, day);
        if age < 0 {
            return false;
        }

        let grown = if age == 0 {
            cfg.initial_density
        } else {
            self.core.density * cfg.growth_per_day
        };
        self.core.density = grown.min(cfg.max_density) * drug_factor;
        self.core.cumulative_exposure_j += self.core.density;
        self.core.density < 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScenarioConfig;

    fn params() -> InfectionParams {
        let mut scenario = ScenarioConfig::default();
        scenario.infection.model = "dummy".to_string();
        InfectionParams::from_scenario(&scenario).unwrap()
    }

    fn immunity() -> ImmunityContext {
        ImmunityContext {
            age_years: 20.0,
            cumulative_h: 0.0,
            cumulative_y: 0.0,
            innate_factor: 1.0,
        }
    }

    #[test]
    fn test_growth_to_cap() {
        let p = params();
        let mut inf = DummyInfection::new(SimTime::zero(), 0);
        assert!(!inf.update_density(&p, SimTime::from_days(14), &immunity(), 1.0));
        assert_eq!(inf.density(), 0.0);

        inf.update_density(&p, SimTime::from_days(15), &immunity(), 1.0);
        assert_eq!(inf.density(), 16.0);
        inf.update_density(&p, SimTime::from_days(16), &immunity(), 1.0);
        assert!((inf.density() - 16.0 * 8.0f64.sqrt()).abs() < 1e-9);

        for d in 17..60 {
            inf.update_density(&p, SimTime::from_days(d), &immunity(), 1.0);
        }
        assert_eq!(inf.density(), 20000.0);
    }

    #[test]
    fn test_drugs_clear() {
        let p = params();
        let mut inf = DummyInfection::new(SimTime::zero(), 0);
        inf.update_density(&p, SimTime::from_days(15), &immunity(), 1.0);
        assert!(inf.update_density(&p, SimTime::from_days(16), &immunity(), 0.01));
    }
}
