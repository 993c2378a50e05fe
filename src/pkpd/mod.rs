//! Antimalarial drug pharmacokinetics and pharmacodynamics.
//!
//! - `drug_type`: process-wide drug data and the Hill-curve PD factor
//! - `drug`: one-compartment drug instance (dose queue, daily decay)
//! - `model`: the set of drug instances held by one host
//!
//! References:
//! - Hastings IM, Winter K. Malaria Journal 2011;10:270
//! - Simpson JA et al. Br J Clin Pharmacol. 1999;47:393-404 (mefloquine)

pub mod drug;
pub mod drug_type;
pub mod model;

pub use drug::{Dose, DrugOneComp};
pub use drug_type::{DrugRegistry, DrugType, PdParameters};
pub use model::{Medication, PkPdModel, Schedule};
