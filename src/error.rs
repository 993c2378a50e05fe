//! Error types for configuration and checkpointing.
//!
//! Configuration errors are fatal: they are raised while building the
//! process-wide parameters, before any host exists. Checkpoint errors abort a
//! resume. Logic bugs (unsorted dose queues and the like) are assertions, not
//! variants here.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("decay function type {name} of {owner} unrecognized")]
    UnknownDecayFunction { name: String, owner: String },

    #[error("age-group interpolation {name} of {owner} unrecognized")]
    UnknownInterpolation { name: String, owner: String },

    #[error("age groups of {owner}: {reason}")]
    InvalidAgeGroups { owner: String, reason: String },

    #[error("{kind} model {name} unrecognized")]
    UnknownModel { kind: &'static str, name: String },

    #[error("drug {drug}: {reason}")]
    InvalidDrug { drug: String, reason: String },

    #[error("step length must be a positive number of days, got {0}")]
    InvalidStepLength(i32),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum CheckpointError {
    #[error("checkpoint encoding error: {0}")]
    Encoding(#[from] bincode::Error),

    #[error("{what}: expected length {expected}, checkpoint has {found}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("checkpoint references drug index {0} which is not configured")]
    UnknownDrug(usize),
}
