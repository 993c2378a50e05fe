//! Reproducibility auditing of computed values.
//!
//! With the `stream-validator` feature, every value passed to
//! [`stream_validate`] is either recorded or compared, bit for bit, against a
//! reference recording from an earlier run. Mismatches are logged and counted;
//! they never stop the simulation. Without the feature the hook compiles to
//! nothing.
//!
//! The validator is installed per thread, so hosts updated on worker threads
//! need their own recording.

#[cfg(feature = "stream-validator")]
mod enabled {
    use std::cell::RefCell;

    /// What the validator does with each value.
    #[derive(Debug, Clone)]
    pub enum ValidatorMode {
        /// Append every value to the recording.
        Record,
        /// Compare every value against this reference, in order.
        Compare(Vec<u64>),
    }

    #[derive(Debug, Clone)]
    pub struct StreamValidator {
        mode: ValidatorMode,
        recorded: Vec<u64>,
        position: usize,
        mismatches: usize,
    }

    impl StreamValidator {
        pub fn recording() -> Self {
            Self::with_mode(ValidatorMode::Record)
        }

        pub fn comparing(reference: Vec<u64>) -> Self {
            Self::with_mode(ValidatorMode::Compare(reference))
        }

        fn with_mode(mode: ValidatorMode) -> Self {
            Self {
                mode,
                recorded: Vec::new(),
                position: 0,
                mismatches: 0,
            }
        }

        fn check(&mut self, value: f64) {
            let bits = value.to_bits();
            match &self.mode {
                ValidatorMode::Record => self.recorded.push(bits),
                ValidatorMode::Compare(reference) => {
                    match reference.get(self.position) {
                        Some(&expected) if expected == bits => {}
                        Some(&expected) => {
                            self.mismatches += 1;
                            log::warn!(
                                "stream validation mismatch at value {}: expected {}, got {}",
                                self.position,
                                f64::from_bits(expected),
                                value
                            );
                        }
                        None => {
                            self.mismatches += 1;
                            log::warn!(
                                "stream validation: value {} ({}) beyond end of reference",
                                self.position,
                                value
                            );
                        }
                    }
                }
            }
            self.position += 1;
        }

        /// Values recorded so far (empty in compare mode).
        pub fn recorded(&self) -> &[u64] {
            &self.recorded
        }

        pub fn checked(&self) -> usize {
            self.position
        }

        pub fn mismatches(&self) -> usize {
            self.mismatches
        }
    }

    thread_local! {
        static VALIDATOR: RefCell<Option<StreamValidator>> = const { RefCell::new(None) };
    }

    /// Install a validator on the current thread, replacing any previous one.
    pub fn install(validator: StreamValidator) {
        VALIDATOR.with(|v| *v.borrow_mut() = Some(validator));
    }

    /// Remove and return the current thread's validator.
    pub fn take() -> Option<StreamValidator> {
        VALIDATOR.with(|v| v.borrow_mut().take())
    }

    pub fn stream_validate(value: f64) {
        VALIDATOR.with(|v| {
            if let Some(validator) = v.borrow_mut().as_mut() {
                validator.check(value);
            }
        });
    }

}

#[cfg(feature = "stream-validator")]
pub use enabled::{install, stream_validate, take, StreamValidator, ValidatorMode};

/// No-op without the `stream-validator` feature.
#[cfg(not(feature = "stream-validator"))]
#[inline(always)]
pub fn stream_validate(_value: f64) {}
