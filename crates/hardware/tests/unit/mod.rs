//! # Unit Components
//!
//! This module serves as the central hub for the controller's component tests. It
//! covers each building block on its own and then the assembled controller, the
//! behavioural device, and the simulation harness.

/// Unit tests for configuration defaults, JSON loading, and validation.
pub mod config;





/// Unit tests for timeline construction.
///
/// This module verifies stage offsets, the latency formula, and the byte-lane
/// order of the RWDS mask actions for both widths.
pub mod timeline;

/// Unit tests for the timeline executor.
pub mod sequencer;
