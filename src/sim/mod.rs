//! Simulation time and the read-only clock handed to the core.
//!
//! The core never advances the clock; an outer driver owns it and passes it
//! by reference into every call that needs "now".

mod clock;

pub use clock::{SimClock, SimTime, DAYS_IN_YEAR};
