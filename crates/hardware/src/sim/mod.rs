//! Simulation harness.
//!
//! Couples a controller to a device, steps both once per internal cycle, and records
//! statistics and an optional pin trace.

/// Controller + device stepping.
pub mod simulator;

/// Per-cycle pin trace.
pub mod trace;

pub use simulator::{Simulator, Transaction};
pub use trace::{PinSample, Trace};
