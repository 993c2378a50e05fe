//! Per-host collection of drug instances.

use std::io::{Read, Write};
use std::sync::Arc;

use rand::Rng;

use super::{DrugOneComp, DrugRegistry};
use crate::checkpoint::{read_field, write_field, Checkpoint};
use crate::error::CheckpointError;

/// One administration within a schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct Medication {
    /// Index into the drug registry
    pub drug: usize,
    /// Quantity (mg)
    pub qty_mg: f64,
    /// Days after the start of the prescription day
    pub offset_days: f64,
}

/// A treatment course, e.g. three daily doses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schedule {
    pub medications: Vec<Medication>,
}

impl Schedule {
    /// `count` equal doses of `qty_mg`, one every `interval_days` from day 0.
    pub fn repeated(drug: usize, qty_mg: f64, count: usize, interval_days: f64) -> Self {
        Self {
            medications: (0..count)
                .map(|i| Medication {
                    drug,
                    qty_mg,
                    offset_days: i as f64 * interval_days,
                })
                .collect(),
        }
    }
}

/// Drugs present in one host.
///
/// Instances are created on first use and are kept, even once inactive,
/// until [`prune_inactive`](Self::prune_inactive) is called.
#[derive(Debug, Clone)]
pub struct PkPdModel {
    registry: Arc<DrugRegistry>,
    drugs: Vec<DrugOneComp>,
}

impl PkPdModel {
    pub fn new(registry: Arc<DrugRegistry>) -> Self {
        Self {
            registry,
            drugs: Vec::new(),
        }
    }

    pub fn drugs(&self) -> &[DrugOneComp] {
        &self.drugs
    }

    pub fn len(&self) -> usize {
        self.drugs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drugs.is_empty()
    }

    /// Administer `qty_mg` of a drug; creates the host's instance if needed.
    ///
    /// Panics if `drug` is not a configured drug index.
    pub fn medicate<R: Rng + ?Sized>(
        &mut self,
        drug: usize,
        qty_mg: f64,
        offset_days: f64,
        body_mass: f64,
        rng: &mut R,
    ) {
        let instance = match self.drugs.iter().position(|d| d.index() == drug) {
            Some(i) => &mut self.drugs[i],
            None => {
                let drug_type = self
                    .registry
                    .get(drug)
                    .unwrap_or_else(|| panic!("drug index {} is not configured", drug))
                    .clone();
                self.drugs.push(DrugOneComp::new(drug_type, rng));
                let last = self.drugs.len() - 1;
                &mut self.drugs[last]
            }
        };
        instance.medicate(offset_days, qty_mg, body_mass);
    }

    /// Queue every medication of a schedule, shifted by `delay_days`.
    pub fn prescribe<R: Rng + ?Sized>(
        &mut self,
        schedule: &Schedule,
        delay_days: f64,
        body_mass: f64,
        rng: &mut R,
    ) {
        for m in &schedule.medications {
            self.medicate(m.drug, m.qty_mg, m.offset_days + delay_days, body_mass, rng);
        }
    }

    /// Combined survival factor of all drugs for one genotype today.
    pub fn drug_factor(&self, genotype: u32) -> f64 {
        self.drugs
            .iter()
            .map(|d| d.calculate_survival_factor(genotype))
            .product()
    }

    /// Advance every drug by one day.
    pub fn decay_drugs(&mut self) {
        for drug in &mut self.drugs {
            drug.advance_one_day();
        }
    }

    /// Concentration of a drug (mg/L); zero when the host never had it.
    pub fn concentration(&self, drug: usize) -> f64 {
        self.drugs
            .iter()
            .find(|d| d.index() == drug)
            .map_or(0.0, |d| d.concentration())
    }

    /// Drop instances with zero concentration and no pending doses.
    pub fn prune_inactive(&mut self) {
        self.drugs.retain(|d| !d.is_inactive());
    }
}

impl Checkpoint for PkPdModel {
    /// Instance count, then each instance as its registry index followed by
    /// its own fields.
    fn save<W: Write>(&self, w: &mut W) -> Result<(), CheckpointError> {
        write_field(w, &(self.drugs.len() as u64))?;
        for drug in &self.drugs {
            write_field(w, &(drug.index() as u64))?;
            drug.save(w)?;
        }
        Ok(())
    }

    fn restore<R: Read>(&mut self, r: &mut R) -> Result<(), CheckpointError> {
        let len: u64 = read_field(r)?;
        self.drugs.clear();
        for _ in 0..len {
            let index: u64 = read_field(r)?;
            let drug_type = self
                .registry
                .get(index as usize)
                .ok_or(CheckpointError::UnknownDrug(index as usize))?
                .clone();
            let mut drug = DrugOneComp::with_parameters(drug_type, 1.0, 1.0);
            drug.restore(r)?;
            self.drugs.push(drug);
        }
        Ok(())
    }
}
