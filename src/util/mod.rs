//! Numeric helpers shared by the drug and within-host engines, plus the
//! decay-curve and age-group tables used to parameterise interventions.

pub mod age_group;
pub mod decay_function;
pub mod sampling;
mod stats;

pub use age_group::AgeGroupInterpolation;
pub use decay_function::{DecayFunction, DecayFunctionConfig, DecayShape};
pub use sampling::{gauss, LognormalSampler};
pub use stats::standard_normal_cdf;

/// Non-negative remainder of `a / b` for `b > 0`.
///
/// Ring-buffer reads look backwards in time, so the numerator is regularly
/// negative; a truncating `%` would produce a negative index.
pub fn mod_nn(a: i32, b: usize) -> usize {
    debug_assert!(b > 0);
    a.rem_euclid(b as i32) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mod_nn_negative() {
        assert_eq!(mod_nn(-1, 20), 19);
        assert_eq!(mod_nn(-20, 20), 0);
        assert_eq!(mod_nn(-21, 20), 19);
        assert_eq!(mod_nn(45, 20), 5);
    }
}
