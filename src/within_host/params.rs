//! Process-wide within-host parameters, derived once from the scenario.

use std::sync::Arc;

use super::infection::InfectionParams;
use super::pathogenesis::PathogenesisParams;
use super::{Diagnostic, TreatmentRegistry};
use crate::config::ScenarioConfig;
use crate::error::ConfigError;
use crate::pkpd::DrugRegistry;
use crate::sim::SimClock;

/// Days of total-density history kept for transmission
const LAG_HISTORY_DAYS: i32 = 20;

/// Read-only after construction; hosts share it through an `Arc`.
#[derive(Debug, Clone)]
pub struct WithinHostParams {
    /// Standard deviation of the log innate survival factor
    pub sigma_i: f64,
    /// Only the retired immunity-penalisation model used this
    pub imm_penalty_22: f64,
    /// Fraction of immune effectors retained per step
    pub imm_effector_remain: f64,
    /// Fraction of asexual immunity retained per step
    pub asex_imm_remain: f64,
    pub inv_cumulative_h_star: f64,
    pub inv_cumulative_y_star: f64,
    /// Length of the density lag buffer (steps)
    pub y_lag_len: usize,
    pub diagnostic: Diagnostic,
    pub infection: InfectionParams,
    pub pathogenesis: PathogenesisParams,
    pub drugs: Arc<DrugRegistry>,
    pub treatments: TreatmentRegistry,
}

impl WithinHostParams {
    pub fn init(scenario: &ScenarioConfig) -> Result<Self, ConfigError> {
        let clock = SimClock::new(scenario.step_days)?;
        let y_lag_len = clock.days_to_steps(LAG_HISTORY_DAYS);
        if y_lag_len < 1 {
            return Err(ConfigError::InvalidStepLength(scenario.step_days));
        }

        let p = &scenario.parameters;
        let bias = if scenario.garki_density_bias {
            p.density_bias_garki
        } else {
            if let Some(no) = scenario.analysis_no.filter(|no| (22..=30).contains(no)) {
                log::warn!(
                    "analysis number {} no longer selects the Garki density bias; set garki_density_bias instead",
                    no
                );
            }
            p.density_bias_non_garki
        };
        let diagnostic = Diagnostic::deterministic(scenario.detection_limit * bias);

        let params = Self {
            sigma_i: p.sigma_i_sq.sqrt(),
            imm_penalty_22: 1.0 - p.immunity_penalty.exp(),
            imm_effector_remain: (-p.immune_effector_decay).exp(),
            asex_imm_remain: (-p.asexual_immunity_decay).exp(),
            inv_cumulative_h_star: 1.0 / p.cumulative_h_star,
            inv_cumulative_y_star: 1.0 / p.cumulative_y_star,
            y_lag_len: y_lag_len as usize,
            diagnostic,
            infection: InfectionParams::from_scenario(scenario)?,
            pathogenesis: PathogenesisParams::from_scenario(scenario)?,
            drugs: Arc::new(DrugRegistry::from_configs(&scenario.drugs)?),
            treatments: TreatmentRegistry::from_configs(&scenario.treatments),
        };

        log::debug!(
            "Within-host parameters: sigma_i={:.4}, detection limit={:.3}, lag={} steps, {} drugs, {} treatments",
            params.sigma_i,
            params.diagnostic.limit(),
            params.y_lag_len,
            params.drugs.len(),
            params.treatments.len()
        );
        Ok(params)
    }
}
