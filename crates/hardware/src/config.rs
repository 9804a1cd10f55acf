//! Configuration system for the HyperRAM controller model.
//!
//! This module defines the construction-time parameters of a controller instance. It provides:
//! 1. **Defaults:** Baseline device latency and pad set.
//! 2. **Structures:** The deserialisable `ControllerConfig` and its nested `PadConfig`.
//! 3. **Validation:** Conversion into `ControllerParams`, the checked form every component consumes.
//!
//! Configuration is read from JSON (`ControllerConfig::from_json` / `from_file`) or built with
//! `ControllerConfig::default()`. Width and latency are fixed for the lifetime of a controller.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::ConfigError;
use crate::common::constants::{BUS_DATA_BITS, MAX_LATENCY, MIN_LATENCY};

/// Default configuration constants.
mod defaults {
    /// Data bus width in lines.
    pub const DATA_WIDTH: u32 = 8;

    /// Device latency in half-clock units, as programmed in the HyperRAM
    /// configuration register at power-up.
    pub const LATENCY: u32 = 6;

    /// Number of active-low chip-select lines on the pad set.
    pub const CHIP_SELECTS: usize = 1;

    /// Reset pad present.
    pub const RESET_PIN: bool = true;
}

/// Supported data bus widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum DataWidth {
    /// Eight DQ lines, one RWDS line.
    X8,
    /// Sixteen DQ lines, two RWDS lines.
    X16,
}

impl DataWidth {
    /// Number of DQ lines.
    pub const fn bits(self) -> u32 {
        match self {
            Self::X8 => 8,
            Self::X16 => 16,
        }
    }

    /// Mask covering all DQ lines.
    pub const fn mask(self) -> u16 {
        match self {
            Self::X8 => 0x00FF,
            Self::X16 => 0xFFFF,
        }
    }

    /// Number of RWDS lines (one per device byte lane).
    pub const fn rwds_lines(self) -> u32 {
        self.bits() / 8
    }

    /// Number of data sub-steps needed to move one 32-bit bus word.
    pub const fn data_steps(self) -> u32 {
        BUS_DATA_BITS / self.bits()
    }
}

impl TryFrom<u32> for DataWidth {
    type Error = ConfigError;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        match bits {
            8 => Ok(Self::X8),
            16 => Ok(Self::X16),
            other => Err(ConfigError::UnsupportedDataWidth(other)),
        }
    }
}

impl From<DataWidth> for u32 {
    fn from(width: DataWidth) -> Self {
        width.bits()
    }
}

impl fmt::Display for DataWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.bits())
    }
}

/// How the device clock leaves the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockOutput {
    /// A single `ck` pad.
    #[default]
    SingleEnded,
    /// A `ck`/`ck_n` pair driven through a differential output buffer.
    Differential,
}

/// Physical pad set attached to the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PadConfig {
    /// Clock pad style.
    #[serde(default)]
    pub clock: ClockOutput,

    /// Number of chip-select lines (1 or 2). Only line 0 is ever asserted.
    #[serde(default = "PadConfig::default_chip_selects")]
    pub chip_selects: usize,

    /// Whether a `rst_n` pad exists. It is held high when present.
    #[serde(default = "PadConfig::default_reset_pin")]
    pub reset_pin: bool,
}

impl PadConfig {
    fn default_chip_selects() -> usize {
        defaults::CHIP_SELECTS
    }

    fn default_reset_pin() -> bool {
        defaults::RESET_PIN
    }
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            clock: ClockOutput::default(),
            chip_selects: defaults::CHIP_SELECTS,
            reset_pin: defaults::RESET_PIN,
        }
    }
}

/// Deserialisable controller configuration.
///
/// Values are kept in their raw form so that a bad width is reported as a
/// [`ConfigError::UnsupportedDataWidth`] by [`validate`](Self::validate) rather than as a
/// JSON schema error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// DQ bus width in lines (8 or 16).
    #[serde(default = "ControllerConfig::default_data_width")]
    pub data_width: u32,

    /// Device latency in half-clock units.
    #[serde(default = "ControllerConfig::default_latency")]
    pub latency: u32,

    /// Pad set description.
    #[serde(default)]
    pub pads: PadConfig,
}

impl ControllerConfig {
    fn default_data_width() -> u32 {
        defaults::DATA_WIDTH
    }

    fn default_latency() -> u32 {
        defaults::LATENCY
    }

    /// Parses a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text does not match the schema.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if its contents are malformed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Checks the configuration and produces the parameters a controller is built from.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::UnsupportedDataWidth`] for any width other than 8 or 16.
    /// * [`ConfigError::InvalidLatency`] for a latency outside `MIN_LATENCY..=MAX_LATENCY`.
    /// * [`ConfigError::UnsupportedChipSelects`] for a chip-select count other than 1 or 2.
    pub fn validate(&self) -> Result<ControllerParams, ConfigError> {
        let width = DataWidth::try_from(self.data_width)?;
        if !(MIN_LATENCY..=MAX_LATENCY).contains(&self.latency) {
            return Err(ConfigError::InvalidLatency(self.latency));
        }
        if !(1..=2).contains(&self.pads.chip_selects) {
            return Err(ConfigError::UnsupportedChipSelects(self.pads.chip_selects));
        }
        Ok(ControllerParams {
            width,
            latency: self.latency,
            pads: self.pads.clone(),
        })
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            data_width: defaults::DATA_WIDTH,
            latency: defaults::LATENCY,
            pads: PadConfig::default(),
        }
    }
}

/// Checked construction parameters; only obtainable through [`ControllerConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerParams {
    width: DataWidth,
    latency: u32,
    pads: PadConfig,
}

impl ControllerParams {
    /// DQ bus width.
    pub const fn width(&self) -> DataWidth {
        self.width
    }

    /// Device latency in half-clock units (always at least 1).
    pub const fn latency(&self) -> u32 {
        self.latency
    }

    /// Pad set description.
    pub const fn pads(&self) -> &PadConfig {
        &self.pads
    }
}
