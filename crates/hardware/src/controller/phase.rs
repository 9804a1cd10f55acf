//! Phase generator and device clock.
//!
//! A free-running 2-bit counter divides the internal clock by four. The device clock
//! register follows chip-select on the edge leaving phase 1 and clears on the edge leaving
//! phase 3, so the pad toggles between internal edges and the data path (which shifts on
//! phases 0 and 2) always changes DQ half a device half-period away from a clock edge.

use crate::common::constants::{CYCLES_PER_DEVICE_CLOCK, FALL_PHASE, START_PHASE};

/// 2-bit phase counter plus the registered device clock.
#[derive(Debug, Clone, Default)]
pub struct PhaseGenerator {
    phase: u8,
    clk: bool,
}

impl PhaseGenerator {
    /// Creates a generator in its reset state (phase 0, clock low).
    pub const fn new() -> Self {
        Self {
            phase: 0,
            clk: false,
        }
    }

    /// Current phase (0..=3).
    #[inline]
    pub const fn phase(&self) -> u8 {
        self.phase
    }

    /// Current level of the device clock register.
    #[inline]
    pub const fn clk(&self) -> bool {
        self.clk
    }

    /// True on the only cycle a new transaction may start.
    #[inline]
    pub const fn is_start(&self) -> bool {
        self.phase == START_PHASE
    }

    /// True on the cycles the data path shifts (0 and 2).
    #[inline]
    pub const fn is_shift(&self) -> bool {
        self.phase & 1 == 0
    }

    /// Advances one internal cycle.
    ///
    /// # Arguments
    ///
    /// * `cs` - Chip-select as registered this cycle; gates the rising edge.
    pub fn tick(&mut self, cs: bool) {
        match self.phase {
            START_PHASE => self.clk = cs,
            FALL_PHASE => self.clk = false,
            _ => {}
        }
        self.phase = (self.phase + 1) % CYCLES_PER_DEVICE_CLOCK as u8;
    }
}
