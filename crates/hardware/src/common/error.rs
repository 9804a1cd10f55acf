//! Configuration error definitions.
//!
//! The controller has no runtime error taxonomy: once constructed it assumes a compliant
//! device and always acknowledges on schedule. Every checked failure therefore happens
//! while turning a configuration into a controller, and is reported through `ConfigError`.

use thiserror::Error;

/// Errors raised while loading or validating a controller configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The data bus width is neither 8 nor 16 lines.
    #[error("unsupported data width: {0} (expected 8 or 16)")]
    UnsupportedDataWidth(u32),

    /// The latency is zero or larger than the timeline can represent.
    #[error("invalid latency: {0} (expected 1 to 16)")]
    InvalidLatency(u32),

    /// The pad set declares a chip-select count the controller cannot drive.
    #[error("unsupported chip-select count: {0} (expected 1 or 2)")]
    UnsupportedChipSelects(usize),

    /// The configuration text is not valid JSON for this schema.
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("cannot read configuration: {0}")]
    Io(#[from] std::io::Error),
}
