//! Falciparum within-host model: immunity accumulators, density history,
//! treatment expiry and the host's infections and drugs.

use std::io::{Read, Write};
use std::sync::Arc;

use rand::Rng;

use super::infection::{ClearanceStage, ImmunityContext, Infection, InfectionModel, InfectionStage};
use super::pathogenesis::{Pathogenesis, StatePair};
use super::treatments::{Deployer, DeploymentTrigger, VaccineLimits};
use super::{LagBuffer, WithinHostParams};
use crate::checkpoint::{read_field, stream_validate, write_field, Checkpoint};
use crate::error::CheckpointError;
use crate::monitoring::{Measure, Survey};
use crate::pkpd::{PkPdModel, Schedule};
use crate::sim::{SimClock, SimTime, DAYS_IN_YEAR};
use crate::util::{gauss, standard_normal_cdf};

// Gametocyte transmission model, fitted to Garki data
// Reference: Ross A et al. Am J Trop Med Hyg. 2006;75(2 Suppl):32-37
const BETA1: f64 = 1.0;
const BETA2: f64 = 0.46;
const BETA3: f64 = 0.17;
const TAU: f64 = 0.066;
const MU: f64 = -8.1;

/// Hosts and the simulation must both be older than this (days) to infect
/// mosquitoes; the density history is not yet meaningful before then.
const MIN_TRANSMISSION_AGE_DAYS: i32 = 20;

/// Within-host state for one human.
///
/// Call order per step: [`update`](Self::update), then any of the queries,
/// then [`update_immune_status`](Self::update_immune_status).
#[derive(Debug, Clone)]
pub struct FalciparumHost {
    params: Arc<WithinHostParams>,
    infections: Vec<Infection>,
    pkpd: PkPdModel,
    /// Innate immune survival factor, fixed at birth
    innate_factor: f64,
    /// Cumulative number of infections
    cumulative_h: f64,
    /// Cumulative parasite density (parasite-days/µL)
    cumulative_y: f64,
    /// `cumulative_y` as of the last immunity update
    cumulative_y_lag: f64,
    total_density: f64,
    time_step_max_density: f64,
    density_lag: LagBuffer,
    pathogenesis: Pathogenesis,
    treat_expiry_liver: SimTime,
    treat_expiry_blood: SimTime,
}

impl FalciparumHost {
    pub fn new<R: Rng + ?Sized>(params: Arc<WithinHostParams>, comorbidity_factor: f64, rng: &mut R) -> Self {
        let innate_factor = (-gauss(rng, params.sigma_i)).exp();
        let pathogenesis = Pathogenesis::new(&params.pathogenesis, comorbidity_factor);
        Self {
            infections: Vec::new(),
            pkpd: PkPdModel::new(params.drugs.clone()),
            innate_factor,
            cumulative_h: 0.0,
            cumulative_y: 0.0,
            cumulative_y_lag: 0.0,
            total_density: 0.0,
            time_step_max_density: 0.0,
            density_lag: LagBuffer::new(params.y_lag_len),
            pathogenesis,
            treat_expiry_liver: SimTime::zero(),
            treat_expiry_blood: SimTime::zero(),
            params,
        }
    }

    pub fn params(&self) -> &Arc<WithinHostParams> {
        &self.params
    }

    pub fn infections(&self) -> &[Infection] {
        &self.infections
    }

    pub fn pkpd(&self) -> &PkPdModel {
        &self.pkpd
    }

    pub fn innate_factor(&self) -> f64 {
        self.innate_factor
    }

    pub fn cumulative_h(&self) -> f64 {
        self.cumulative_h
    }

    pub fn cumulative_y(&self) -> f64 {
        self.cumulative_y
    }

    pub fn cumulative_y_lag(&self) -> f64 {
        self.cumulative_y_lag
    }

    /// Total blood-stage density at the end of the last update.
    pub fn total_density(&self) -> f64 {
        self.total_density
    }

    /// Highest daily total density during the last update.
    pub fn time_step_max_density(&self) -> f64 {
        self.time_step_max_density
    }

    pub fn density_lag(&self) -> &LagBuffer {
        &self.density_lag
    }

    pub fn pathogenesis(&self) -> &Pathogenesis {
        &self.pathogenesis
    }

    pub fn treat_expiry_liver(&self) -> SimTime {
        self.treat_expiry_liver
    }

    pub fn treat_expiry_blood(&self) -> SimTime {
        self.treat_expiry_blood
    }

    /// Advance infections and drugs through the step ending at `clock.now()`.
    ///
    /// `age_years` is the host's age at the start of the step.
    pub fn update(&mut self, clock: &SimClock, n_new_infections: u32, genotype: u32, age_years: f64) {
        let step_start = clock.now() - clock.one_step();

        for _ in 0..n_new_infections {
            self.infections
                .push(Infection::new(&self.params.infection, step_start, genotype));
        }
        self.cumulative_h += f64::from(n_new_infections);

        // Prophylaxis still active at the start of the step removes infections
        // of the protected stage, including those acquired this step
        if self.treat_expiry_liver > step_start {
            self.clear_infections(ClearanceStage::Liver, step_start);
        }
        if self.treat_expiry_blood > step_start {
            self.clear_infections(ClearanceStage::Blood, step_start);
        }

        self.total_density = 0.0;
        self.time_step_max_density = 0.0;

        for day in 0..clock.step_days() {
            let today = step_start + SimTime::from_days(day);
            let immunity = ImmunityContext {
                age_years: age_years + f64::from(day) / DAYS_IN_YEAR,
                cumulative_h: self.cumulative_h,
                cumulative_y: self.cumulative_y,
                innate_factor: self.innate_factor,
            };

            let mut day_total = 0.0;
            let (params, pkpd) = (&self.params, &self.pkpd);
            self.infections.retain_mut(|inf| {
                let drug_factor = match inf.stage(&params.infection, today) {
                    InfectionStage::Liver => 1.0,
                    InfectionStage::Blood => pkpd.drug_factor(inf.genotype()),
                };
                let ended = inf.update_density(&params.infection, today, &immunity, drug_factor);
                if !ended {
                    day_total += inf.density();
                }
                !ended
            });
            self.pkpd.decay_drugs();

            self.cumulative_y += day_total;
            self.total_density = day_total;
            self.time_step_max_density = self.time_step_max_density.max(day_total);
        }

        stream_validate(self.total_density);
        self.density_lag.record(clock.current_step(), self.total_density);
    }

    /// Probability that a mosquito biting now becomes infected.
    ///
    /// Uses the total densities recorded roughly 10, 15 and 20 days ago.
    pub fn prob_transmission_to_mosquito(&self, clock: &SimClock, age: SimTime, tbv_factor: f64) -> f64 {
        if age.in_days() <= MIN_TRANSMISSION_AGE_DAYS || clock.now().in_days() <= MIN_TRANSMISSION_AGE_DAYS {
            return 0.0;
        }

        let first = clock.current_step() - clock.days_to_steps(10) + 1;
        let x = BETA1 * self.density_lag.at(first)
            + BETA2 * self.density_lag.at(first - clock.days_to_steps(5))
            + BETA3 * self.density_lag.at(first - clock.days_to_steps(10));
        if x < 0.001 {
            return 0.0;
        }

        let zval = (x.ln() + MU) / (1.0 / TAU).sqrt();
        let pone = standard_normal_cdf(zval);
        let transmit = (pone * pone).clamp(0.0, 1.0) * tbv_factor;
        stream_validate(transmit);
        transmit
    }

    /// Clinical outcome of this step's densities.
    pub fn determine_morbidity<R: Rng + ?Sized>(&mut self, age_years: f64, rng: &mut R) -> StatePair {
        self.pathogenesis.determine_state(
            &self.params.pathogenesis,
            age_years,
            self.time_step_max_density,
            self.total_density,
            rng,
        )
    }

    /// Decay acquired immunity by one step.
    pub fn update_immune_status(&mut self) {
        let effector = self.params.imm_effector_remain;
        if effector < 1.0 {
            self.cumulative_h *= effector;
            self.cumulative_y *= effector;
        }

        let asex = self.params.asex_imm_remain;
        if asex < 1.0 {
            self.cumulative_h *=
                asex / (1.0 + self.cumulative_h * (1.0 - asex) * self.params.inv_cumulative_h_star);
            self.cumulative_y *=
                asex / (1.0 + self.cumulative_y * (1.0 - asex) * self.params.inv_cumulative_y_star);
        }
        self.cumulative_y_lag = self.cumulative_y;
    }

    /// Apply a configured treatment, then forward its deployments; deployers
    /// see the host with the treatment's effects already applied.
    pub fn treatment(&mut self, clock: &SimClock, treatment_id: usize, deployer: &mut dyn Deployer) {
        let params = Arc::clone(&self.params);
        let treatment = params.treatments.select(treatment_id);
        self.treat_simple(clock, treatment.liver_effect(), treatment.blood_effect());
        treatment.deploy(self, deployer, DeploymentTrigger::Treat, VaccineLimits::default());
    }

    /// Negative durations clear the stage now, positive ones extend its
    /// protection, zero does nothing.
    pub fn treat_simple(&mut self, clock: &SimClock, liver: SimTime, blood: SimTime) {
        let now = clock.now();
        for (stage, duration) in [(ClearanceStage::Liver, liver), (ClearanceStage::Blood, blood)] {
            if duration < SimTime::zero() {
                self.clear_infections(stage, now);
            } else if duration > SimTime::zero() {
                let expiry = match stage {
                    ClearanceStage::Liver => &mut self.treat_expiry_liver,
                    _ => &mut self.treat_expiry_blood,
                };
                *expiry = (*expiry).max(now + duration);
            }
        }
    }

    /// Remove every infection in the given stage at `now`.
    pub fn clear_infections(&mut self, stage: ClearanceStage, now: SimTime) {
        let params = &self.params.infection;
        let before = self.infections.len();
        self.infections
            .retain(|inf| !stage.includes(inf.stage(params, now)));
        log::trace!(
            "Cleared {} {:?} infections",
            before - self.infections.len(),
            stage
        );
    }

    /// Administer a drug; see [`PkPdModel::medicate`].
    pub fn medicate<R: Rng + ?Sized>(
        &mut self,
        drug: usize,
        qty_mg: f64,
        offset_days: f64,
        body_mass: f64,
        rng: &mut R,
    ) {
        self.pkpd.medicate(drug, qty_mg, offset_days, body_mass, rng);
    }

    pub fn prescribe<R: Rng + ?Sized>(&mut self, schedule: &Schedule, delay_days: f64, body_mass: f64, rng: &mut R) {
        self.pkpd.prescribe(schedule, delay_days, body_mass, rng);
    }

    /// Infection counts as (all, patent).
    pub fn count_infections(&self) -> (usize, usize) {
        let diagnostic = &self.params.diagnostic;
        let patent = self
            .infections
            .iter()
            .filter(|inf| diagnostic.is_positive(inf.density()))
            .count();
        (self.infections.len(), patent)
    }

    /// Report into a survey. Returns true when the host is patent.
    pub fn summarize(&self, survey: &mut Survey, age_years: f64) -> bool {
        self.pathogenesis.summarize(survey, age_years);

        let (count, patent) = self.count_infections();
        if count != 0 {
            survey
                .add_int(Measure::InfectedHosts, age_years, 1)
                .add_int(Measure::Infections, age_years, count as i64)
                .add_int(Measure::PatentInfections, age_years, patent as i64);
        }

        if self.params.diagnostic.is_positive(self.total_density) {
            survey
                .add_int(Measure::PatentHosts, age_years, 1)
                .add_double(Measure::LogDensity, age_years, self.total_density.ln());
            return true;
        }
        false
    }
}

impl Checkpoint for FalciparumHost {
    /// Infections and drugs, innate factor, the three accumulators,
    /// total/max density, lag buffer, pathogenesis, then liver and blood
    /// treatment expiry.
    fn save<W: Write>(&self, w: &mut W) -> Result<(), CheckpointError> {
        write_field(w, &self.infections)?;
        self.pkpd.save(w)?;
        write_field(w, &self.innate_factor)?;
        write_field(w, &self.cumulative_h)?;
        write_field(w, &self.cumulative_y)?;
        write_field(w, &self.cumulative_y_lag)?;
        write_field(w, &self.total_density)?;
        write_field(w, &self.time_step_max_density)?;
        self.density_lag.save(w)?;
        self.pathogenesis.save(w)?;
        write_field(w, &self.treat_expiry_liver)?;
        write_field(w, &self.treat_expiry_blood)
    }

    fn restore<R: Read>(&mut self, r: &mut R) -> Result<(), CheckpointError> {
        self.infections = read_field(r)?;
        self.pkpd.restore(r)?;
        self.innate_factor = read_field(r)?;
        self.cumulative_h = read_field(r)?;
        self.cumulative_y = read_field(r)?;
        self.cumulative_y_lag = read_field(r)?;
        self.total_density = read_field(r)?;
        self.time_step_max_density = read_field(r)?;
        self.density_lag.restore(r)?;
        self.pathogenesis.restore(r)?;
        self.treat_expiry_liver = read_field(r)?;
        self.treat_expiry_blood = read_field(r)?;
        Ok(())
    }
}
