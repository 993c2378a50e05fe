//! Malaria Host Sim - per-host antimalarial drug kinetics and falciparum
//! within-host dynamics.
//!
//! The library has two engines driven once per time step by an outer
//! population simulation:
//! - [`pkpd`]: one-compartment drug concentrations and the parasite survival
//!   factor they imply
//! - [`within_host`]: infections, immunity, morbidity, treatment and
//!   transmissibility to mosquitoes
//!
//! Both checkpoint to a fixed-order binary stream so long runs can resume
//! bit-identically.

pub mod checkpoint;
pub mod config;
pub mod error;
pub mod monitoring;
pub mod pkpd;
pub mod sim;
pub mod util;
pub mod within_host;

pub use checkpoint::Checkpoint;
pub use config::{ModelParameters, ScenarioConfig};
pub use error::{CheckpointError, ConfigError};
pub use monitoring::{Measure, Survey};
pub use pkpd::{DrugOneComp, DrugRegistry, DrugType, PkPdModel, Schedule};
pub use sim::{SimClock, SimTime};
pub use within_host::{FalciparumHost, WithinHostParams};
