//! Configuration for the within-host and drug engines.
//!
//! Model parameter defaults are the fitted values of the AJTMH 2006 malaria
//! model supplement; drug defaults describe mefloquine.

mod parameters;
mod scenario;

pub use parameters::ModelParameters;
pub use scenario::{
    DescriptiveInfectionConfig, DrugTypeConfig, DummyInfectionConfig, InfectionConfig,
    PdConfig, ScenarioConfig, TreatmentConfig,
};
