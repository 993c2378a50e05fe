//! Integration tests for intervention decay curves.
//!
//! Reference values use L = 10 years, k = 1.6 and an initial value of 1.9,
//! evaluated at 0, 6 and 20 years (5-day steps 0, 438 and 1460).

use malaria_host_sim::util::{DecayFunction, DecayFunctionConfig};
use malaria_host_sim::{ConfigError, SimClock};

fn approx(actual: f64, expected: f64) {
    let tol = 1e-6 * expected.abs().max(1e-6);
    assert!(
        (actual - expected).abs() <= tol,
        "expected {}, got {}",
        expected,
        actual
    );
}

fn curve(shape: &str) -> DecayFunction {
    let cfg = DecayFunctionConfig::new(shape, 10.0, 1.9).with_k(1.6);
    DecayFunction::from_config(&cfg, "DecayFunctionTests").unwrap()
}

/// Evaluate at a number of 5-day steps.
fn at_step(df: &DecayFunction, step: i32) -> f64 {
    let clock = SimClock::new(5).unwrap();
    df.eval(clock.from_steps(step))
}

#[test]
fn test_unknown_shape() {
    let cfg = DecayFunctionConfig::new("unknown", 10.0, 1.9).with_k(1.6);
    let err = DecayFunction::from_config(&cfg, "DecayFunctionTests").unwrap_err();
    assert!(matches!(err, ConfigError::UnknownDecayFunction { .. }));
    assert_eq!(
        err.to_string(),
        "decay function type unknown of DecayFunctionTests unrecognized"
    );
}

#[test]
fn test_constant() {
    let df = curve("constant");
    approx(at_step(&df, 0), 1.9);
    approx(at_step(&df, 1460), 1.9);
}

#[test]
fn test_linear() {
    let df = curve("linear");
    approx(at_step(&df, 0), 1.9);
    approx(at_step(&df, 438), 0.76);
    assert_eq!(at_step(&df, 1460), 0.0);
}

#[test]
fn test_exponential() {
    let df = curve("exponential");
    approx(at_step(&df, 0), 1.9);
    approx(at_step(&df, 438), 1.2535325);
    approx(at_step(&df, 1460), 0.475);
}

#[test]
fn test_weibull() {
    let df = curve("weibull");
    approx(at_step(&df, 0), 1.9);
    approx(at_step(&df, 438), 1.3989906);
    approx(at_step(&df, 1460), 0.2323814);
}

#[test]
fn test_hill() {
    let df = curve("hill");
    approx(at_step(&df, 0), 1.9);
    approx(at_step(&df, 438), 1.3179680);
    approx(at_step(&df, 1460), 0.47129642);
}

#[test]
fn test_smooth_compact() {
    for name in ["chitnis", "smooth-compact"] {
        let df = curve(name);
        approx(at_step(&df, 0), 1.9);
        approx(at_step(&df, 438), 0.77248235);
        assert_eq!(at_step(&df, 1460), 0.0);
    }
}

#[test]
fn test_curves_never_increase() {
    for name in ["constant", "step", "linear", "exponential", "weibull", "hill", "smooth-compact"] {
        let df = curve(name);
        let mut prev = at_step(&df, 0);
        for step in 1..1500 {
            let v = at_step(&df, step);
            assert!(v <= prev + 1e-15, "{} increased at step {}", name, step);
            prev = v;
        }
    }
}
