//! Fitted model parameters.
//!
//! All values are dimensionless or per-year unless the field name says
//! otherwise.
//!
//! References:
//! - Smith T et al. Am J Trop Med Hyg. 2006;75(2 Suppl):1-10 (fitting)
//! - Maire N et al. Am J Trop Med Hyg. 2006;75(2 Suppl):19-31 (immunity)
//! - Smith T et al. Am J Trop Med Hyg. 2006;75(2 Suppl):56-62 (pathogenesis)
//! - Ross A et al. Am J Trop Med Hyg. 2006;75(2 Suppl):63-73 (morbidity)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParameters {
    /// Variance of the log innate immune survival factor (σ_i²)
    pub sigma_i_sq: f64,
    /// Immunity penalty exponent; only the retired penalisation model used it
    pub immunity_penalty: f64,
    /// Decay rate of immune effectors (per year)
    pub immune_effector_decay: f64,
    /// Decay rate of asexual immunity (per year)
    pub asexual_immunity_decay: f64,
    /// Density bias for microscopy at Garki-style sites
    pub density_bias_garki: f64,
    /// Density bias for microscopy elsewhere
    pub density_bias_non_garki: f64,
    /// Critical number of prior infections (H*)
    pub cumulative_h_star: f64,
    /// Critical cumulative parasite exposure (Y*, parasite-days/µL)
    pub cumulative_y_star: f64,
    /// −ln(1 − α_m), maternal protection at birth
    pub neg_log_one_minus_alpha_m: f64,
    /// Decay of maternal protection (per year)
    pub decay_m: f64,

    // Pathogenesis
    /// Initial pyrogenic threshold Y*_0 (parasites/µL)
    pub init_pyrogen_threshold: f64,
    /// Y*_1, half-saturation density for threshold growth
    pub y_star_1: f64,
    /// Y*_2, threshold level at which growth halves
    pub y_star_2: f64,
    /// α, pyrogenic threshold growth rate
    pub alpha: f64,
    /// Half-life of the pyrogenic threshold (years)
    pub y_star_half_life_years: f64,
    /// Severe malaria threshold density (parasites/µL)
    pub severe_malaria_threshold: f64,
    /// Intercept of coinfection probability
    pub comorbidity_intercept: f64,
    /// Critical age for comorbidity (years)
    pub critical_age_comorbidity: f64,
    /// Indirect mortality risk cofactor
    pub indirect_risk_cofactor: f64,
    /// Mueller presentation model rate multiplier
    pub mueller_rate_multiplier: f64,
    /// Mueller presentation model density exponent
    pub mueller_density_exponent: f64,
}

impl ModelParameters {
    /// Maternal protection at birth α_m.
    pub fn alpha_m(&self) -> f64 {
        1.0 - (-self.neg_log_one_minus_alpha_m).exp()
    }
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            // Smith et al. 2006, fitted parameter set
            sigma_i_sq: 10.173598,
            immunity_penalty: 1.0,
            immune_effector_decay: 0.0,
            asexual_immunity_decay: 0.0,
            density_bias_garki: 4.79610,
            density_bias_non_garki: 0.177378,
            cumulative_h_star: 97.334652,
            cumulative_y_star: 35158523.31,
            neg_log_one_minus_alpha_m: 2.33031,
            decay_m: 2.53106,

            init_pyrogen_threshold: 296.302,
            y_star_1: 0.596539,
            y_star_2: 6502.26,
            alpha: 142601.913,
            y_star_half_life_years: 0.275437,
            severe_malaria_threshold: 784455.599,
            comorbidity_intercept: 0.0968,
            critical_age_comorbidity: 0.117383,
            indirect_risk_cofactor: 0.018777,

            // Mueller presentation model
            mueller_rate_multiplier: 0.0232,
            mueller_density_exponent: 0.428,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_m_from_log_form() {
        let params = ModelParameters::default();
        assert!((params.alpha_m() - 0.9027).abs() < 1e-3);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let parsed: ModelParameters =
            serde_json::from_str(r#"{ "immune_effector_decay": 0.5 }"#).unwrap();
        assert_eq!(parsed.immune_effector_decay, 0.5);
        assert_eq!(parsed.sigma_i_sq, ModelParameters::default().sigma_i_sq);
    }
}
