//! Integration tests for the falciparum within-host engine.
//!
//! Most tests switch off innate immunity variation (σ_i = 0) so that a naive
//! adult's infection follows the configured density curve exactly.

use std::sync::Arc;

use malaria_host_sim::config::TreatmentConfig;
use malaria_host_sim::monitoring::{Measure, Survey};
use malaria_host_sim::util::standard_normal_cdf;
use malaria_host_sim::within_host::infection::InfectionParams;
use malaria_host_sim::within_host::{
    Deployer, DeploymentTrigger, EpisodeState, InfectionModel, RecordingDeployer, VaccineLimits,
};
use malaria_host_sim::{FalciparumHost, ScenarioConfig, SimClock, SimTime, WithinHostParams};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

const ADULT_AGE: f64 = 25.0;

fn scenario() -> ScenarioConfig {
    let mut scenario = ScenarioConfig::default();
    scenario.parameters.sigma_i_sq = 0.0;
    scenario
}

fn make_host(scenario: &ScenarioConfig) -> FalciparumHost {
    let _ = env_logger::builder().is_test(true).try_init();
    let params = Arc::new(WithinHostParams::init(scenario).unwrap());
    let mut rng = StdRng::seed_from_u64(2024);
    FalciparumHost::new(params, 1.0, &mut rng)
}

/// Advance `steps` steps; infect once on the first of them if `infect`.
fn run(host: &mut FalciparumHost, clock: &mut SimClock, steps: i32, infect: bool) {
    for i in 0..steps {
        clock.advance();
        let n = u32::from(infect && i == 0);
        host.update(clock, n, 0, ADULT_AGE);
        host.update_immune_status();
    }
}

// ============================================================================
// Infection course
// ============================================================================

#[test]
fn test_liver_stage_produces_no_density() {
    let mut host = make_host(&scenario());
    let mut clock = SimClock::daily();
    run(&mut host, &mut clock, 15, true);
    assert_eq!(host.infections().len(), 1);
    assert_eq!(host.total_density(), 0.0);
    assert_eq!(host.cumulative_h(), 1.0);
}

#[test]
fn test_naive_adult_reaches_peak() {
    let mut host = make_host(&scenario());
    let mut clock = SimClock::daily();
    // Infected on day 0; blood stage from day 15; peak on day 25
    run(&mut host, &mut clock, 26, true);
    let peak = 11.0f64.exp();
    assert!(
        (host.total_density() - peak).abs() / peak < 1e-9,
        "density {}",
        host.total_density()
    );
    assert!(host.cumulative_y() > peak);
    assert_eq!(host.cumulative_y_lag(), host.cumulative_y());
}

#[test]
fn test_five_day_steps_take_daily_maximum() {
    let mut s = scenario();
    s.step_days = 5;
    let mut host = make_host(&s);
    assert_eq!(host.density_lag().len(), 4);

    let mut clock = SimClock::new(5).unwrap();
    // Step 5 covers days 20-24: rising, so the last day is the maximum
    run(&mut host, &mut clock, 5, true);
    assert!(host.total_density() > 0.0);
    assert_eq!(host.time_step_max_density(), host.total_density());

    // Days 30-34 are past the peak: the first day is the maximum
    run(&mut host, &mut clock, 2, false);
    assert!(host.time_step_max_density() > host.total_density());
}

#[test]
fn test_maternal_immunity_protects_newborns() {
    let mut adult = make_host(&scenario());
    let mut infant = make_host(&scenario());
    let mut clock_a = SimClock::daily();
    let mut clock_i = SimClock::daily();
    run(&mut adult, &mut clock_a, 20, true);
    for i in 0..20 {
        clock_i.advance();
        infant.update(&clock_i, u32::from(i == 0), 0, 0.0);
    }
    assert!(infant.total_density() < 0.2 * adult.total_density());
}

// ============================================================================
// Transmission
// ============================================================================

#[test]
fn test_no_transmission_from_young_hosts_or_early_simulation() {
    let mut host = make_host(&scenario());
    let mut clock = SimClock::daily();
    run(&mut host, &mut clock, 20, true);
    assert_eq!(clock.now(), SimTime::from_days(20));
    assert_eq!(host.prob_transmission_to_mosquito(&clock, SimTime::from_years(ADULT_AGE), 1.0), 0.0);

    run(&mut host, &mut clock, 20, false);
    assert_eq!(host.prob_transmission_to_mosquito(&clock, SimTime::from_days(20), 1.0), 0.0);
    assert!(host.prob_transmission_to_mosquito(&clock, SimTime::from_days(21), 1.0) > 0.0);
}

#[test]
fn test_transmission_from_lagged_densities() {
    let mut host = make_host(&scenario());
    let mut clock = SimClock::daily();
    run(&mut host, &mut clock, 45, true);

    let step = clock.current_step();
    let lag = host.density_lag();
    let x = lag.at(step - 9) + 0.46 * lag.at(step - 14) + 0.17 * lag.at(step - 19);
    let z = (x.ln() - 8.1) / (1.0f64 / 0.066).sqrt();
    let expected = standard_normal_cdf(z).powi(2);

    let age = SimTime::from_years(ADULT_AGE);
    let p = host.prob_transmission_to_mosquito(&clock, age, 1.0);
    assert!((p - expected).abs() < 1e-12, "{} vs {}", p, expected);
    assert!(p > 0.1 && p < 1.0);

    let blocked = host.prob_transmission_to_mosquito(&clock, age, 0.25);
    assert!((blocked - 0.25 * p).abs() < 1e-15);
}

#[test]
fn test_uninfected_host_does_not_transmit() {
    let mut host = make_host(&scenario());
    let mut clock = SimClock::daily();
    run(&mut host, &mut clock, 60, false);
    assert_eq!(host.prob_transmission_to_mosquito(&clock, SimTime::from_years(ADULT_AGE), 1.0), 0.0);
}

// ============================================================================
// Treatment
// ============================================================================

#[test]
fn test_blood_clearance() {
    let s = scenario();
    let mut host = make_host(&s);
    let mut clock = SimClock::daily();
    run(&mut host, &mut clock, 30, true);
    assert!(host.total_density() > 0.0);

    let id = host.params().treatments.find("clear_blood").unwrap();
    let mut deployer = RecordingDeployer::default();
    host.treatment(&clock, id, &mut deployer);
    assert!(host.infections().is_empty());
    assert!(deployer.requests.is_empty());
    // Clearance does not start prophylaxis
    assert_eq!(host.treat_expiry_blood(), SimTime::zero());

    run(&mut host, &mut clock, 1, false);
    assert_eq!(host.total_density(), 0.0);
}

#[test]
fn test_blood_clearance_spares_liver_stage() {
    let mut host = make_host(&scenario());
    let mut clock = SimClock::daily();
    run(&mut host, &mut clock, 5, true);
    host.treat_simple(&clock, SimTime::zero(), SimTime::from_days(-1));
    assert_eq!(host.infections().len(), 1);
    host.treat_simple(&clock, SimTime::from_days(-1), SimTime::zero());
    assert!(host.infections().is_empty());
}

#[test]
fn test_blood_prophylaxis_prevents_patency() {
    let mut host = make_host(&scenario());
    let mut clock = SimClock::daily();
    let id = host.params().treatments.find("blood_prophylaxis_30d").unwrap();
    host.treatment(&clock, id, &mut RecordingDeployer::default());
    assert_eq!(host.treat_expiry_blood(), SimTime::from_days(30));

    for i in 0..25 {
        clock.advance();
        host.update(&clock, u32::from(i == 0), 0, ADULT_AGE);
        assert_eq!(host.total_density(), 0.0, "day {}", i);
    }
    assert!(host.infections().is_empty());
}

#[test]
fn test_liver_prophylaxis_clears_new_infections() {
    let mut host = make_host(&scenario());
    let mut clock = SimClock::daily();
    host.treat_simple(&clock, SimTime::from_days(10), SimTime::zero());
    run(&mut host, &mut clock, 1, true);
    assert!(host.infections().is_empty());
    // Exposure still counts towards immunity
    assert_eq!(host.cumulative_h(), 1.0);
}

#[test]
fn test_treatment_deploys_components() {
    let mut s = scenario();
    s.treatments.push(TreatmentConfig {
        name: "clear_and_vaccinate".to_string(),
        liver_effect_days: -1,
        blood_effect_days: -1,
        deploy_components: vec![2, 9],
    });
    let mut host = make_host(&s);
    let clock = SimClock::daily();
    let id = host.params().treatments.find("clear_and_vaccinate").unwrap();
    let mut deployer = RecordingDeployer::default();
    host.treatment(&clock, id, &mut deployer);
    let components: Vec<u32> = deployer.requests.iter().map(|r| r.component).collect();
    assert_eq!(components, vec![2, 9]);
}

/// Records what the treated host looked like when each component arrived.
#[derive(Default)]
struct SnapshotDeployer {
    seen: Vec<(u32, usize, SimTime)>,
}

impl Deployer for SnapshotDeployer {
    fn deploy(
        &mut self,
        host: &FalciparumHost,
        component: u32,
        _trigger: DeploymentTrigger,
        _limits: VaccineLimits,
    ) {
        self.seen
            .push((component, host.infections().len(), host.treat_expiry_liver()));
    }
}

#[test]
fn test_treatment_effects_precede_deployment() {
    let mut s = scenario();
    s.treatments.push(TreatmentConfig {
        name: "clear_protect_vaccinate".to_string(),
        liver_effect_days: 12,
        blood_effect_days: -1,
        deploy_components: vec![4],
    });
    let mut host = make_host(&s);
    let mut clock = SimClock::daily();
    run(&mut host, &mut clock, 30, true);
    assert_eq!(host.infections().len(), 1);

    let id = host.params().treatments.find("clear_protect_vaccinate").unwrap();
    let mut deployer = SnapshotDeployer::default();
    host.treatment(&clock, id, &mut deployer);
    // Blood infection already cleared and liver protection already extended
    assert_eq!(deployer.seen, vec![(4, 0, clock.now() + SimTime::from_days(12))]);
}

#[test]
fn test_drugs_reduce_density() {
    let s = scenario();
    let mut treated = make_host(&s);
    let mut untreated = make_host(&s);
    let mut clock_t = SimClock::daily();
    let mut clock_u = SimClock::daily();
    run(&mut treated, &mut clock_t, 22, true);
    run(&mut untreated, &mut clock_u, 22, true);

    let mut rng = StdRng::seed_from_u64(3);
    treated.medicate(0, 750.0, 0.0, 60.0, &mut rng);
    run(&mut treated, &mut clock_t, 3, false);
    run(&mut untreated, &mut clock_u, 3, false);

    assert!(treated.total_density() < 0.01 * untreated.total_density());
    assert!(treated.pkpd().concentration(0) > 0.0);
}

// ============================================================================
// Morbidity and reporting
// ============================================================================

#[test]
fn test_high_density_causes_episodes() {
    let mut host = make_host(&scenario());
    let mut clock = SimClock::daily();
    run(&mut host, &mut clock, 26, true);

    let mut rng = StdRng::seed_from_u64(99);
    let episodes = (0..50)
        .filter(|_| {
            let mut h = host.clone();
            h.determine_morbidity(ADULT_AGE, &mut rng).state != EpisodeState::None
        })
        .count();
    assert!(episodes >= 45, "{} episodes", episodes);
}

#[test]
fn test_uninfected_host_never_sick() {
    let mut s = scenario();
    s.pathogenesis_model = "mueller".to_string();
    let mut host = make_host(&s);
    let mut clock = SimClock::daily();
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..100 {
        run(&mut host, &mut clock, 1, false);
        let state = host.determine_morbidity(ADULT_AGE, &mut rng);
        assert_eq!(state.state, EpisodeState::None);
        assert!(!state.indirect_mortality);
    }
}

#[test]
fn test_summarize_patent_host() {
    let mut host = make_host(&scenario());
    let mut clock = SimClock::daily();
    run(&mut host, &mut clock, 26, true);
    let mut rng = StdRng::seed_from_u64(1);
    host.determine_morbidity(ADULT_AGE, &mut rng);

    let mut survey = Survey::new(vec![5.0, 15.0, 100.0]);
    assert!(host.summarize(&mut survey, ADULT_AGE));
    assert_eq!(survey.get(Measure::InfectedHosts, 2), 1.0);
    assert_eq!(survey.get(Measure::Infections, 2), 1.0);
    assert_eq!(survey.get(Measure::PatentInfections, 2), 1.0);
    assert_eq!(survey.get(Measure::PatentHosts, 2), 1.0);
    assert!((survey.get(Measure::LogDensity, 2) - 11.0).abs() < 1e-9);
    assert!(survey.get(Measure::PyrogenicThreshold, 2) > 296.302);
}

#[test]
fn test_summarize_liver_stage_only() {
    let mut host = make_host(&scenario());
    let mut clock = SimClock::daily();
    run(&mut host, &mut clock, 3, true);

    let mut survey = Survey::all_ages();
    assert!(!host.summarize(&mut survey, 3.0));
    assert_eq!(survey.total(Measure::Infections), 1.0);
    assert_eq!(survey.total(Measure::PatentInfections), 0.0);
    assert_eq!(survey.total(Measure::PatentHosts), 0.0);
}

#[test]
fn test_dummy_infection_model() {
    let mut s = scenario();
    s.infection.model = "dummy".to_string();
    let mut host = make_host(&s);
    let mut clock = SimClock::daily();
    run(&mut host, &mut clock, 16, true);
    assert_eq!(host.total_density(), 16.0);
    assert_eq!(host.infections()[0].density(), 16.0);
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_immunity_factor_never_increases_with_exposure(
        age in 0.0f64..80.0,
        h in 0.0f64..200.0,
        extra_h in 0.0f64..50.0,
        y in 0.0f64..1e9,
        extra_y in 0.0f64..1e9,
    ) {
        let p = InfectionParams::from_scenario(&ScenarioConfig::default()).unwrap();
        let base = p.immunity_survival_factor(age, h, y, 0.0);
        let more = p.immunity_survival_factor(age, h + extra_h, y + extra_y, 0.0);
        prop_assert!(base > 0.0 && base <= 1.0);
        prop_assert!(more <= base + 1e-15, "{} > {}", more, base);
    }

    #[test]
    fn prop_immune_decay_never_increases_accumulators(
        effector in 0.0f64..2.0,
        asexual in 0.0f64..2.0,
        infections in 1u32..20,
    ) {
        let mut s = scenario();
        s.parameters.immune_effector_decay = effector;
        s.parameters.asexual_immunity_decay = asexual;
        let mut host = make_host(&s);
        let mut clock = SimClock::daily();
        for _ in 0..30 {
            clock.advance();
            host.update(&clock, infections, 0, ADULT_AGE);
        }
        let (h, y) = (host.cumulative_h(), host.cumulative_y());
        host.update_immune_status();
        prop_assert!(host.cumulative_h() <= h);
        prop_assert!(host.cumulative_y() <= y);
        prop_assert!(host.cumulative_h() >= 0.0 && host.cumulative_y() >= 0.0);
    }
}
