//! Treatment descriptions and the deployment hook.
//!
//! A treatment has a liver-stage and a blood-stage effect duration. A
//! negative duration clears that stage immediately, a positive one protects
//! the host for that many days, and zero does nothing. Treatments may also
//! deploy other intervention components to the treated host; the host only
//! forwards those requests to a [`Deployer`].

use super::FalciparumHost;
use crate::config::TreatmentConfig;
use crate::sim::SimTime;

/// Why a deployment was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentTrigger {
    /// Deployment attached to a treatment
    Treat,
}

/// Dose-count constraints on vaccine components deployed alongside a
/// treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VaccineLimits {
    /// Only deploy if at least this many doses were already given
    pub min_prev_doses: u32,
    /// Never exceed this many doses in total
    pub max_cum_doses: u32,
}

impl Default for VaccineLimits {
    /// No constraints.
    fn default() -> Self {
        Self {
            min_prev_doses: 0,
            max_cum_doses: u32::MAX,
        }
    }
}

/// Receives intervention deployments requested by treatments.
pub trait Deployer {
    /// `host` is the treated host, after the treatment's own effects.
    fn deploy(
        &mut self,
        host: &FalciparumHost,
        component: u32,
        trigger: DeploymentTrigger,
        limits: VaccineLimits,
    );
}

/// A deployment request as seen by a [`RecordingDeployer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeploymentRequest {
    pub component: u32,
    pub trigger: DeploymentTrigger,
    pub limits: VaccineLimits,
}

/// Deployer that keeps every request, for callers that apply them later.
#[derive(Debug, Clone, Default)]
pub struct RecordingDeployer {
    pub requests: Vec<DeploymentRequest>,
}

impl Deployer for RecordingDeployer {
    fn deploy(
        &mut self,
        _host: &FalciparumHost,
        component: u32,
        trigger: DeploymentTrigger,
        limits: VaccineLimits,
    ) {
        self.requests.push(DeploymentRequest {
            component,
            trigger,
            limits,
        });
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Treatment {
    name: String,
    liver_effect: SimTime,
    blood_effect: SimTime,
    deploy_components: Vec<u32>,
}

impl Treatment {
    pub fn from_config(config: &TreatmentConfig) -> Self {
        Self {
            name: config.name.clone(),
            liver_effect: SimTime::from_days(config.liver_effect_days),
            blood_effect: SimTime::from_days(config.blood_effect_days),
            deploy_components: config.deploy_components.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn liver_effect(&self) -> SimTime {
        self.liver_effect
    }

    pub fn blood_effect(&self) -> SimTime {
        self.blood_effect
    }

    /// Forward this treatment's component deployments for `host`.
    pub fn deploy(
        &self,
        host: &FalciparumHost,
        deployer: &mut dyn Deployer,
        trigger: DeploymentTrigger,
        limits: VaccineLimits,
    ) {
        for &component in &self.deploy_components {
            deployer.deploy(host, component, trigger, limits);
        }
    }
}

/// Process-wide treatment table, indexed by position in the configuration.
#[derive(Debug, Clone, Default)]
pub struct TreatmentRegistry {
    treatments: Vec<Treatment>,
}

impl TreatmentRegistry {
    pub fn from_configs(configs: &[TreatmentConfig]) -> Self {
        Self {
            treatments: configs.iter().map(Treatment::from_config).collect(),
        }
    }

    /// Panics on an unknown id; ids come from validated intervention data.
    pub fn select(&self, id: usize) -> &Treatment {
        self.treatments
            .get(id)
            .unwrap_or_else(|| panic!("treatment id {} is not configured", id))
    }

    pub fn find(&self, name: &str) -> Option<usize> {
        self.treatments.iter().position(|t| t.name == name)
    }

    pub fn len(&self) -> usize {
        self.treatments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.treatments.is_empty()
    }
}
