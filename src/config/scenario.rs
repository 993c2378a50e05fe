//! Scenario-level configuration: time step, model choices, drugs and
//! treatments.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ModelParameters;
use crate::error::ConfigError;

/// Top-level configuration container
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Simulation step length (days)
    pub step_days: i32,
    /// Legacy analysis number; 22-30 once implied the Garki density bias
    pub analysis_no: Option<i32>,
    /// Use the Garki density bias for the detection limit
    pub garki_density_bias: bool,
    /// Raw microscopy detection limit (parasites/µL) before bias
    pub detection_limit: f64,
    /// Liver-stage latent period (days)
    pub latent_period_days: i32,
    /// Pathogenesis model name: "pyrogenic" or "mueller"
    pub pathogenesis_model: String,
    /// Infection model selection and parameters
    pub infection: InfectionConfig,
    /// Drug types available to the PK/PD engine, indexed by position
    pub drugs: Vec<DrugTypeConfig>,
    /// Treatments, indexed by position
    pub treatments: Vec<TreatmentConfig>,
    /// Fitted model parameters
    pub parameters: ModelParameters,
}

impl ScenarioConfig {
    /// Load from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config = serde_json::from_str(&contents)?;
        log::info!("Loaded scenario configuration from {:?}", path.as_ref());
        Ok(config)
    }

    /// Load from a JSON file or return defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded scenario configuration from {:?}", path.as_ref());
                    config
                }
                Err(e) => {
                    log::warn!("Failed to parse scenario configuration: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Scenario configuration file not found, using defaults");
                Self::default()
            }
        }
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            step_days: 1,
            analysis_no: None,
            garki_density_bias: false,
            // Standard thick-film microscopy limit
            detection_limit: 40.0,
            // Three five-day steps in the fitted model
            latent_period_days: 15,
            pathogenesis_model: "pyrogenic".to_string(),
            infection: InfectionConfig::default(),
            drugs: vec![DrugTypeConfig::default()],
            treatments: vec![
                TreatmentConfig {
                    name: "clear_blood".to_string(),
                    liver_effect_days: 0,
                    blood_effect_days: -1,
                    deploy_components: Vec::new(),
                },
                TreatmentConfig {
                    name: "blood_prophylaxis_30d".to_string(),
                    liver_effect_days: 0,
                    blood_effect_days: 30,
                    deploy_components: Vec::new(),
                },
            ],
            parameters: ModelParameters::default(),
        }
    }
}

/// Which infection sub-model produces parasite densities.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InfectionConfig {
    /// "dummy" or "descriptive"
    pub model: String,
    pub dummy: DummyInfectionConfig,
    pub descriptive: DescriptiveInfectionConfig,
}

impl Default for InfectionConfig {
    fn default() -> Self {
        Self {
            model: "descriptive".to_string(),
            dummy: DummyInfectionConfig::default(),
            descriptive: DescriptiveInfectionConfig::default(),
        }
    }
}

/// Fixed-growth test infection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DummyInfectionConfig {
    /// Density on entering the blood stage (parasites/µL)
    pub initial_density: f64,
    /// Multiplicative growth per day
    pub growth_per_day: f64,
    /// Density cap (parasites/µL)
    pub max_density: f64,
}

impl Default for DummyInfectionConfig {
    fn default() -> Self {
        Self {
            initial_density: 16.0,
            // Eightfold per 48h asexual cycle
            growth_per_day: 8.0f64.sqrt(),
            max_density: 20000.0,
        }
    }
}

/// Parametric infection: log density rises linearly to a peak then falls
/// linearly to zero at the end of the infection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DescriptiveInfectionConfig {
    /// Peak natural-log density in a naive host
    pub peak_log_density: f64,
    /// Days of blood stage until the peak
    pub days_to_peak: i32,
    /// Blood-stage duration (days)
    pub duration_days: i32,
    /// Density below which the infection is lost (parasites/µL)
    pub extinction_density: f64,
}

impl Default for DescriptiveInfectionConfig {
    fn default() -> Self {
        Self {
            // ~60,000 parasites/µL at peak in malaria therapy patients
            peak_log_density: 11.0,
            days_to_peak: 10,
            duration_days: 200,
            extinction_density: 1.0,
        }
    }
}

/// Pharmacodynamic parameters for one parasite genotype.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdConfig {
    /// Hill slope n
    pub slope: f64,
    /// Concentration giving half the maximal killing rate (mg/L)
    pub ic50: f64,
    /// Maximal killing rate (per day)
    pub max_killing_rate: f64,
}

/// One-compartment drug description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrugTypeConfig {
    pub name: String,
    /// Concentration below which the drug is treated as gone (mg/L)
    pub negligible_concentration: f64,
    /// Elimination half-life (days)
    pub half_life_days: f64,
    /// Between-host coefficient of variation of the elimination rate
    #[serde(default)]
    pub elimination_rate_cv: f64,
    /// Volume of distribution (L/kg)
    pub vol_dist_l_per_kg: f64,
    /// Between-host coefficient of variation of the volume of distribution
    #[serde(default)]
    pub vol_dist_cv: f64,
    /// One entry per parasite genotype
    pub pd: Vec<PdConfig>,
}

impl Default for DrugTypeConfig {
    fn default() -> Self {
        // Mefloquine
        // Reference: Simpson JA et al. Br J Clin Pharmacol. 1999;47:393-404
        Self {
            name: "MF".to_string(),
            negligible_concentration: 0.005,
            half_life_days: 13.078,
            elimination_rate_cv: 0.0,
            vol_dist_l_per_kg: 20.8,
            vol_dist_cv: 0.0,
            pd: vec![PdConfig {
                slope: 5.0,
                ic50: 0.027,
                max_killing_rate: 3.45,
            }],
        }
    }
}

/// Treatment description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreatmentConfig {
    pub name: String,
    /// Liver-stage effect: negative clears now, positive protects for this
    /// many days, zero does nothing
    pub liver_effect_days: i32,
    /// Blood-stage effect, same convention
    pub blood_effect_days: i32,
    /// Intervention components deployed when the treatment is given
    #[serde(default)]
    pub deploy_components: Vec<u32>,
}
