//! Day-resolution simulation time.

use std::ops::{Add, AddAssign, Neg, Sub};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Days per year used for all age and decay conversions.
pub const DAYS_IN_YEAR: f64 = 365.0;

/// A signed duration or instant measured in whole days.
///
/// Instants are measured from the start of the simulation; durations may be
/// negative (treatment effects use the sign to request clearance).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SimTime(i32);

impl SimTime {
    pub const fn zero() -> Self {
        SimTime(0)
    }

    pub const fn from_days(days: i32) -> Self {
        SimTime(days)
    }

    pub fn from_years(years: f64) -> Self {
        SimTime((years * DAYS_IN_YEAR).round() as i32)
    }

    pub const fn in_days(self) -> i32 {
        self.0
    }

    pub fn in_years(self) -> f64 {
        self.0 as f64 / DAYS_IN_YEAR
    }
}

impl Add for SimTime {
    type Output = SimTime;
    fn add(self, rhs: SimTime) -> SimTime {
        SimTime(self.0 + rhs.0)
    }
}

impl AddAssign for SimTime {
    fn add_assign(&mut self, rhs: SimTime) {
        self.0 += rhs.0;
    }
}

impl Sub for SimTime {
    type Output = SimTime;
    fn sub(self, rhs: SimTime) -> SimTime {
        SimTime(self.0 - rhs.0)
    }
}

impl Neg for SimTime {
    type Output = SimTime;
    fn neg(self) -> SimTime {
        SimTime(-self.0)
    }
}

/// Step-based simulation clock.
///
/// `now` is the instant at the end of the step currently being computed;
/// `current_step` is `now / step_days`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimClock {
    step_days: i32,
    now: SimTime,
}

impl SimClock {
    /// Create a clock at time zero with the given step length.
    pub fn new(step_days: i32) -> Result<Self, ConfigError> {
        if step_days <= 0 {
            return Err(ConfigError::InvalidStepLength(step_days));
        }
        Ok(Self {
            step_days,
            now: SimTime::zero(),
        })
    }

    /// Daily-step clock.
    pub fn daily() -> Self {
        Self {
            step_days: 1,
            now: SimTime::zero(),
        }
    }

    pub fn step_days(&self) -> i32 {
        self.step_days
    }

    pub fn one_step(&self) -> SimTime {
        SimTime(self.step_days)
    }

    pub fn now(&self) -> SimTime {
        self.now
    }

    pub fn current_step(&self) -> i32 {
        self.now.0 / self.step_days
    }

    /// Whole steps covering `days` (truncating, like integer division).
    pub fn days_to_steps(&self, days: i32) -> i32 {
        days / self.step_days
    }

    pub fn from_steps(&self, steps: i32) -> SimTime {
        SimTime(steps * self.step_days)
    }

    /// Move forward one step. Only outer drivers call this.
    pub fn advance(&mut self) {
        self.now += self.one_step();
    }

    /// Jump directly to the given step.
    pub fn set_step(&mut self, step: i32) {
        self.now = self.from_steps(step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_conversions() {
        let mut clock = SimClock::new(5).unwrap();
        assert_eq!(clock.days_to_steps(20), 4);
        assert_eq!(clock.from_steps(438).in_days(), 2190);
        clock.advance();
        clock.advance();
        assert_eq!(clock.current_step(), 2);
        assert_eq!(clock.now().in_days(), 10);
    }

    #[test]
    fn test_invalid_step_length() {
        assert!(SimClock::new(0).is_err());
        assert!(SimClock::new(-5).is_err());
    }

    #[test]
    fn test_sim_time_years() {
        assert!((SimTime::from_days(730).in_years() - 2.0).abs() < 1e-12);
        assert_eq!(SimTime::from_years(10.0).in_days(), 3650);
        assert!(SimTime::from_days(-3) < SimTime::zero());
    }
}
