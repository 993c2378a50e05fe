//! One-compartment drug instance.
//!
//! The body is a single well-mixed volume with first-order elimination, so
//! between doses `C(t) = C(0) · exp(−k t)` and a dose raises the concentration
//! instantly by `quantity / (Vd · body mass)`. Time is measured in days
//! relative to the start of the current day; a day is integrated as the
//! segments between that day's doses.

use std::io::{Read, Write};
use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::DrugType;
use crate::checkpoint::{read_field, stream_validate, write_field, Checkpoint};
use crate::error::CheckpointError;

/// A pending dose: an instantaneous concentration increase at an offset from
/// the start of the current day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dose {
    /// Days from the start of the current day (≥ 0; ≥ 1 means a later day)
    pub offset_days: f64,
    /// Concentration increase on absorption (mg/L)
    pub concentration: f64,
}

/// One drug attached to one host.
///
/// Elimination rate and volume of distribution are drawn once at creation.
/// Per day, any number of [`calculate_survival_factor`](Self::calculate_survival_factor)
/// queries may precede exactly one [`advance_one_day`](Self::advance_one_day).
#[derive(Debug, Clone)]
pub struct DrugOneComp {
    drug_type: Arc<DrugType>,
    /// Volume of distribution (L/kg)
    vol_dist: f64,
    /// Sorted by offset; equal offsets keep insertion order
    doses: Vec<Dose>,
    /// Current concentration (mg/L)
    concentration: f64,
    /// −k (per day)
    neg_elim_rate: f64,
}

impl DrugOneComp {
    pub fn new<R: Rng + ?Sized>(drug_type: Arc<DrugType>, rng: &mut R) -> Self {
        let vol_dist = drug_type.sample_vd(rng);
        let neg_elim_rate = -drug_type.sample_k(rng);
        Self {
            drug_type,
            vol_dist,
            doses: Vec::new(),
            concentration: 0.0,
            neg_elim_rate,
        }
    }

    /// Instance with fixed PK parameters instead of sampled ones.
    pub fn with_parameters(drug_type: Arc<DrugType>, vol_dist: f64, elimination_rate: f64) -> Self {
        Self {
            drug_type,
            vol_dist,
            doses: Vec::new(),
            concentration: 0.0,
            neg_elim_rate: -elimination_rate,
        }
    }

    pub fn drug_type(&self) -> &Arc<DrugType> {
        &self.drug_type
    }

    pub fn index(&self) -> usize {
        self.drug_type.index()
    }

    /// Concentration at the start of the current day (mg/L).
    pub fn concentration(&self) -> f64 {
        self.concentration
    }

    pub fn neg_elim_rate(&self) -> f64 {
        self.neg_elim_rate
    }

    pub fn vol_dist(&self) -> f64 {
        self.vol_dist
    }

    pub fn doses(&self) -> &[Dose] {
        &self.doses
    }

    /// True when there is nothing left to integrate.
    pub fn is_inactive(&self) -> bool {
        self.concentration == 0.0 && self.doses.is_empty()
    }

    /// Administer `quantity` mg at `offset_days` to a host of `body_mass` kg.
    pub fn medicate(&mut self, offset_days: f64, quantity: f64, body_mass: f64) {
        assert!(body_mass > 0.0, "body mass must be positive, got {}", body_mass);
        self.medicate_vd(offset_days, quantity, self.vol_dist * body_mass);
    }

    /// Administer `quantity` mg into an absolute distribution volume (L).
    pub fn medicate_vd(&mut self, offset_days: f64, quantity: f64, volume: f64) {
        assert!(
            offset_days >= 0.0 && offset_days.is_finite(),
            "dose offset must be a non-negative number of days, got {}",
            offset_days
        );
        let dose = Dose {
            offset_days,
            concentration: quantity / volume,
        };
        let pos = self.doses.partition_point(|d| d.offset_days <= offset_days);
        self.doses.insert(pos, dose);
    }

    /// Multiplicative parasite survival over today for `genotype`.
    ///
    /// Does not touch the stored state; it may be called for several
    /// genotypes, or not at all, before the day is advanced. Each segment
    /// starts from the day's opening concentration plus the doses absorbed so
    /// far; decay within earlier segments is not carried forward.
    pub fn calculate_survival_factor(&self, genotype: u32) -> f64 {
        if self.is_inactive() {
            return 1.0;
        }

        let pd = self.drug_type.pd(genotype);
        let mut total_factor = 1.0;
        let mut concentration_today = self.concentration;
        let mut time = 0.0;

        for dose in &self.doses {
            if dose.offset_days >= 1.0 {
                break;
            }
            if time < dose.offset_days {
                total_factor *=
                    pd.calc_factor(self.neg_elim_rate, concentration_today, dose.offset_days - time);
                time = dose.offset_days;
            } else {
                assert!(time == dose.offset_days, "dose queue out of order");
            }
            concentration_today += dose.concentration;
        }
        if time < 1.0 {
            total_factor *= pd.calc_factor(self.neg_elim_rate, concentration_today, 1.0 - time);
        }

        total_factor
    }

    /// Decay and absorb through today, then shift remaining doses into
    /// tomorrow's frame. Must be called at most once per day.
    pub fn advance_one_day(&mut self) {
        if self.is_inactive() {
            return;
        }

        let mut time = 0.0;
        let mut doses_taken = 0;
        for dose in self.doses.iter_mut() {
            if dose.offset_days < 1.0 {
                if time < dose.offset_days {
                    self.concentration *= (self.neg_elim_rate * (dose.offset_days - time)).exp();
                    time = dose.offset_days;
                } else {
                    assert!(time == dose.offset_days, "dose queue out of order");
                }
                self.concentration += dose.concentration;
                doses_taken += 1;
            } else {
                dose.offset_days -= 1.0;
            }
        }
        if time < 1.0 {
            self.concentration *= (self.neg_elim_rate * (1.0 - time)).exp();
        }
        self.doses.drain(..doses_taken);

        stream_validate(self.concentration);
        if self.concentration < self.drug_type.negligible_concentration() {
            self.concentration = 0.0;
        }
    }
}

impl Checkpoint for DrugOneComp {
    /// Base fields (volume of distribution, dose queue), then concentration,
    /// then elimination rate. The drug type is written by the owner.
    fn save<W: Write>(&self, w: &mut W) -> Result<(), CheckpointError> {
        write_field(w, &self.vol_dist)?;
        write_field(w, &self.doses)?;
        write_field(w, &self.concentration)?;
        write_field(w, &self.neg_elim_rate)
    }

    fn restore<R: Read>(&mut self, r: &mut R) -> Result<(), CheckpointError> {
        self.vol_dist = read_field(r)?;
        self.doses = read_field(r)?;
        self.concentration = read_field(r)?;
        self.neg_elim_rate = read_field(r)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DrugTypeConfig;

    fn mefloquine() -> Arc<DrugType> {
        Arc::new(DrugType::from_config(0, &DrugTypeConfig::default()).unwrap())
    }

    fn drug() -> DrugOneComp {
        let k = std::f64::consts::LN_2 / 13.078;
        DrugOneComp::with_parameters(mefloquine(), 20.8, k)
    }

    #[test]
    fn test_medicate_converts_to_concentration() {
        let mut d = drug();
        d.medicate(0.0, 1000.0, 50.0);
        let expected = 1000.0 / (20.8 * 50.0);
        assert!((d.doses()[0].concentration - expected).abs() < 1e-12);
        // Not absorbed until the day is advanced
        assert_eq!(d.concentration(), 0.0);
    }

    #[test]
    fn test_equal_offsets_keep_insertion_order() {
        let mut d = drug();
        d.medicate_vd(0.5, 1.0, 1.0);
        d.medicate_vd(0.5, 2.0, 1.0);
        d.medicate_vd(0.25, 3.0, 1.0);
        let conc: Vec<f64> = d.doses().iter().map(|x| x.concentration).collect();
        assert_eq!(conc, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_survival_factor_does_not_mutate() {
        let mut d = drug();
        d.medicate_vd(0.5, 1.0, 1.0);
        let before = d.clone();
        let f1 = d.calculate_survival_factor(0);
        let f2 = d.calculate_survival_factor(0);
        assert_eq!(f1, f2);
        assert_eq!(d.doses(), before.doses());
        assert_eq!(d.concentration(), before.concentration());
    }

    #[test]
    fn test_advance_absorbs_mid_day_dose() {
        let mut d = drug();
        d.medicate_vd(0.5, 1.0, 1.0);
        d.advance_one_day();
        let expected = (d.neg_elim_rate() * 0.5).exp();
        assert!((d.concentration() - expected).abs() < 1e-12);
        assert!(d.doses().is_empty());
    }

    #[test]
    #[should_panic(expected = "non-negative")]
    fn test_negative_offset_panics() {
        let mut d = drug();
        d.medicate_vd(-0.1, 1.0, 1.0);
    }

    #[test]
    fn test_checkpoint_round_trip() {
        let mut d = drug();
        d.medicate_vd(0.3, 0.7, 1.0);
        d.medicate_vd(2.5, 0.4, 1.0);
        d.advance_one_day();

        let mut buf = Vec::new();
        d.save(&mut buf).unwrap();
        let mut restored = DrugOneComp::with_parameters(mefloquine(), 1.0, 1.0);
        restored.restore(&mut buf.as_slice()).unwrap();

        assert_eq!(restored.concentration().to_bits(), d.concentration().to_bits());
        assert_eq!(restored.neg_elim_rate().to_bits(), d.neg_elim_rate().to_bits());
        assert_eq!(restored.doses(), d.doses());
        assert_eq!(restored.vol_dist(), d.vol_dist());
    }
}
