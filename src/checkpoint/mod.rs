//! Binary checkpointing.
//!
//! Every checkpointable type writes its fields in one fixed order and reads
//! them back in the same order; that order is the resume compatibility
//! contract. Each field is encoded with bincode: fixed-width little-endian
//! integers, `f64` by bit pattern (restored values are bit-identical), `u64`
//! length prefixes on sequences and `u32` variant indices on enums.
//!
//! Restoring happens in place on an already-constructed value, so anything not
//! part of the stream (process-wide parameters, drug type data) comes from the
//! constructor.

pub mod stream_validator;

use std::io::{Read, Write};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CheckpointError;

pub use stream_validator::stream_validate;

/// Fixed-order binary save/restore.
pub trait Checkpoint {
    fn save<W: Write>(&self, w: &mut W) -> Result<(), CheckpointError>;
    fn restore<R: Read>(&mut self, r: &mut R) -> Result<(), CheckpointError>;
}

/// Append one field to a checkpoint stream.
pub fn write_field<W: Write, T: Serialize + ?Sized>(
    w: &mut W,
    value: &T,
) -> Result<(), CheckpointError> {
    bincode::serialize_into(w, value)?;
    Ok(())
}

/// Read the next field from a checkpoint stream.
pub fn read_field<R: Read, T: DeserializeOwned>(r: &mut R) -> Result<T, CheckpointError> {
    Ok(bincode::deserialize_from(r)?)
}
