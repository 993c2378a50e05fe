//! Falciparum within-host disease engine.
//!
//! - `params`: process-wide constants derived from the scenario
//! - `falciparum`: per-host immunity, density history and treatment state
//! - `infection`: density-producing infection models
//! - `pathogenesis`: clinical presentation models
//! - `treatments`: treatment table and deployment hook
//!
//! References:
//! - Smith T et al. Am J Trop Med Hyg. 2006;75(2 Suppl):1-10
//! - Maire N et al. Am J Trop Med Hyg. 2006;75(2 Suppl):19-31
//! - Ross A et al. Am J Trop Med Hyg. 2006;75(2 Suppl):32-37

pub mod diagnostic;
pub mod falciparum;
pub mod infection;
pub mod lag_buffer;
pub mod params;
pub mod pathogenesis;
pub mod treatments;

pub use diagnostic::Diagnostic;
pub use falciparum::FalciparumHost;
pub use infection::{ClearanceStage, Infection, InfectionModel, InfectionStage};
pub use lag_buffer::LagBuffer;
pub use params::WithinHostParams;
pub use pathogenesis::{EpisodeState, Pathogenesis, StatePair};
pub use treatments::{
    Deployer, DeploymentRequest, DeploymentTrigger, RecordingDeployer, Treatment, TreatmentRegistry,
    VaccineLimits,
};
