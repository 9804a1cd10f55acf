//! HyperBus/HyperRAM controller model.
//!
//! This crate implements a cycle-accurate model of a HyperRAM memory controller with the following:
//! 1. **Controller:** Phase generator, command-address encoder, shift-register data path,
//!    timeline sequencer, and a Wishbone-style bus adapter.
//! 2. **Device:** A behavioural fixed-latency HyperRAM part driven from the pad outputs.
//! 3. **Simulation:** A harness stepping controller and device together, with statistics
//!    and a per-cycle pin trace.
//! 4. **Configuration:** JSON-loadable width, latency, and pad-set parameters.

/// Common types and constants (CA layout, timing, errors, tristate signals).
pub mod common;
/// Controller configuration (defaults, validation, pad set).
pub mod config;
/// The HyperBus controller and its components.
pub mod controller;
/// Devices attached to the controller pads.
pub mod device;
/// Controller + device simulation harness.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Configuration error type.
pub use crate::common::ConfigError;
/// Root configuration type; use `ControllerConfig::default()` or load from JSON.
pub use crate::config::ControllerConfig;
/// Main controller type; build with `HyperRamController::new`.
pub use crate::controller::HyperRamController;
/// Top-level simulator; construct with `Simulator::from_config`.
pub use crate::sim::Simulator;
