//! Ring buffer of past total densities.

use std::io::{Read, Write};

use crate::checkpoint::{read_field, write_field, Checkpoint};
use crate::error::CheckpointError;
use crate::util::mod_nn;

/// Fixed-length history indexed by step number modulo the length.
///
/// Slot `s mod len` holds the value recorded during step `s`; older values
/// are overwritten. Reads may use negative step numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct LagBuffer {
    values: Vec<f64>,
}

impl LagBuffer {
    /// Zero-filled buffer. Panics if `len` is zero.
    pub fn new(len: usize) -> Self {
        assert!(len > 0, "lag buffer needs at least one slot");
        Self {
            values: vec![0.0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn record(&mut self, step: i32, value: f64) {
        let len = self.values.len();
        self.values[mod_nn(step, len)] = value;
    }

    pub fn at(&self, step: i32) -> f64 {
        self.values[mod_nn(step, self.values.len())]
    }
}

impl Checkpoint for LagBuffer {
    fn save<W: Write>(&self, w: &mut W) -> Result<(), CheckpointError> {
        write_field(w, &self.values)
    }

    /// The length is fixed by the step length; a stream with another length
    /// was written under a different configuration.
    fn restore<R: Read>(&mut self, r: &mut R) -> Result<(), CheckpointError> {
        let values: Vec<f64> = read_field(r)?;
        if values.len() != self.values.len() {
            return Err(CheckpointError::LengthMismatch {
                what: "density lag buffer",
                expected: self.values.len(),
                found: values.len(),
            });
        }
        self.values = values;
        Ok(())
    }
}
