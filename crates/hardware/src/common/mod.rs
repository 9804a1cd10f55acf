//! Common utilities and types used throughout the HyperRAM controller model.
//!
//! This module provides the building blocks shared by every component:
//! 1. **Constants:** CA word layout and fixed timeline durations.
//! 2. **Error Handling:** Construction-time configuration errors.
//! 3. **Signals:** Tristate pins and bus resolution between controller and device.

/// Protocol and timing constants.
pub mod constants;

/// Configuration error types.
pub mod error;

/// Tristate pin modelling.
pub mod signal;

pub use error::ConfigError;
pub use signal::{Tristate, resolve};
