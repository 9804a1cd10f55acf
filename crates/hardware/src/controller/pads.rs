//! Pad-level view of the controller outputs.
//!
//! Everything here is combinational from the controller registers: the chip-select pads
//! are inverted, a second select line (if the pad set has one) is tied inactive, the reset
//! pad is tied high, and a differential clock pair is the clock register and its
//! complement.

use crate::common::Tristate;
use crate::config::{ClockOutput, PadConfig};

/// Maximum number of chip-select lines a pad set may carry.
pub const MAX_CHIP_SELECTS: usize = 2;

/// Levels driven onto the device pins during one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PadOutputs {
    /// Device clock (`ck`, or `ck_p` of a differential pair).
    pub ck: bool,
    /// Complementary clock when the pad set is differential.
    pub ck_n: Option<bool>,
    cs_n: [bool; MAX_CHIP_SELECTS],
    cs_lines: usize,
    /// Reset pad, if present.
    pub rst_n: Option<bool>,
    /// DQ lines.
    pub dq: Tristate<u16>,
    /// RWDS lines.
    pub rwds: Tristate<u8>,
}

impl PadOutputs {
    /// Builds the pad levels from the internal signals.
    ///
    /// # Arguments
    ///
    /// * `pads` - Pad set description (validated: 1 or 2 chip-selects).
    /// * `clk` - Clock register.
    /// * `cs` - Internal chip-select (active high).
    /// * `dq` - DQ output value and enable.
    /// * `rwds` - RWDS output value and enable.
    pub fn new(
        pads: &PadConfig,
        clk: bool,
        cs: bool,
        dq: Tristate<u16>,
        rwds: Tristate<u8>,
    ) -> Self {
        let ck_n = match pads.clock {
            ClockOutput::SingleEnded => None,
            ClockOutput::Differential => Some(!clk),
        };
        Self {
            ck: clk,
            ck_n,
            // Single-device support: line 1 never selects.
            cs_n: [!cs, true],
            cs_lines: pads.chip_selects.min(MAX_CHIP_SELECTS),
            rst_n: pads.reset_pin.then_some(true),
            dq,
            rwds,
        }
    }

    /// Chip-select pads (active low), one per line on the pad set.
    pub fn cs_n(&self) -> &[bool] {
        &self.cs_n[..self.cs_lines]
    }

    /// True when the attached device (line 0) is selected.
    pub const fn selected(&self) -> bool {
        !self.cs_n[0]
    }
}
