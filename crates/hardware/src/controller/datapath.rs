//! Bidirectional data path.
//!
//! A 48-bit shift register sits between the pads and the bus:
//! 1. **Capture:** DQ is registered into a staging value every cycle, so the value shifted
//!    on an even phase is the one sampled on the preceding odd phase (both device clock
//!    edges, i.e. double data rate).
//! 2. **Shift:** On phases 0 and 2 the staging value enters at the bottom of the register,
//!    8 bits at a time during the command-address phase and `W` bits at a time otherwise.
//! 3. **Drive:** The top byte (CA mode) or top `W` bits (data mode) form the DQ output.
//!
//! The sequencer may overwrite the register on any edge; such loads take precedence over
//! the shift scheduled for the same edge.

use crate::common::constants::{CA_BITS, SHIFT_REGISTER_MASK};
use crate::config::DataWidth;

/// Shift register, staging value, and mode flag.
#[derive(Debug, Clone)]
pub struct DataPath {
    width: DataWidth,
    sr: u64,
    dqi: u16,
    ca_active: bool,
}

impl DataPath {
    /// Creates an empty data path for the given DQ width.
    pub const fn new(width: DataWidth) -> Self {
        Self {
            width,
            sr: 0,
            dqi: 0,
            ca_active: false,
        }
    }

    /// Full 48-bit register.
    #[inline]
    pub const fn register(&self) -> u64 {
        self.sr
    }

    /// Staging value captured on the previous cycle.
    #[inline]
    pub const fn staged(&self) -> u16 {
        self.dqi
    }

    /// Whether shifts currently move one byte (command-address phase).
    #[inline]
    pub const fn ca_active(&self) -> bool {
        self.ca_active
    }

    /// Read-result view: the low 32 bits of the register.
    #[inline]
    pub const fn read_data(&self) -> u32 {
        self.sr as u32
    }

    /// Value presented on the DQ outputs.
    pub const fn dq_out(&self) -> u16 {
        if self.ca_active {
            (self.sr >> (CA_BITS - 8)) as u16 & 0x00FF
        } else {
            (self.sr >> (CA_BITS - self.width.bits())) as u16 & self.width.mask()
        }
    }

    /// Advances one cycle.
    ///
    /// # Arguments
    ///
    /// * `shift` - True on phases 0 and 2.
    /// * `dq_in` - Level on the DQ lines this cycle.
    pub fn tick(&mut self, shift: bool, dq_in: u16) {
        if shift {
            let (bits, lane) = if self.ca_active {
                (8, self.dqi & 0x00FF)
            } else {
                (self.width.bits(), self.dqi & self.width.mask())
            };
            self.sr = ((self.sr << bits) | lane as u64) & SHIFT_REGISTER_MASK;
        }
        self.dqi = dq_in & self.width.mask();
    }

    /// Loads the register, overriding any shift on this edge.
    pub fn load(&mut self, value: u64) {
        self.sr = value & SHIFT_REGISTER_MASK;
    }

    /// Sets the shift mode flag.
    pub fn set_ca_active(&mut self, active: bool) {
        self.ca_active = active;
    }
}
