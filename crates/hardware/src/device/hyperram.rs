//! Behavioural HyperRAM device.
//!
//! Models a fixed-latency HyperRAM part at the pin level:
//! 1. **Command:** Six CA bytes are captured on DQ[7:0], one per clock edge.
//! 2. **Latency:** Fixed 2x latency; the first data edge falls `2 * latency` device clocks
//!    after the third CA rising edge.
//! 3. **Data:** Linear burst from the CA address. Reads drive DQ with RWDS toggling in step
//!    with the clock; writes store each beat unless RWDS masks it.
//!
//! Storage is sparse and counted in *beats* (one DQ-wide transfer per clock edge). A
//! half-word address from the CA word covers two beats on an x8 part and one on an x16
//! part. Deasserting chip-select ends any burst.

use std::collections::HashMap;

use tracing::{trace, warn};

use crate::common::constants::CA_BYTES;
use crate::config::DataWidth;
use crate::controller::{CommandAddress, PadOutputs};
use crate::device::{DeviceDrive, HyperBusDevice};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Command { ca: u64, received: u32 },
    Latency { command: CommandAddress, remaining: u32 },
    Data { command: CommandAddress, beat: u64 },
}

/// A single HyperRAM part.
#[derive(Debug, Clone)]
pub struct HyperRamDevice {
    width: DataWidth,
    latency: u32,
    memory: HashMap<u64, u16>,
    state: State,
    ck: bool,
    drive: DeviceDrive,
    bursts: u64,
}

impl HyperRamDevice {
    /// Creates a zero-filled device.
    ///
    /// # Arguments
    ///
    /// * `width` - DQ width of the part (must match the controller).
    /// * `latency` - Latency the part was configured with at power-up.
    pub fn new(width: DataWidth, latency: u32) -> Self {
        Self {
            width,
            latency,
            memory: HashMap::new(),
            state: State::Idle,
            ck: false,
            drive: DeviceDrive::RELEASED,
            bursts: 0,
        }
    }

    /// DQ width of the part.
    pub const fn width(&self) -> DataWidth {
        self.width
    }

    /// Number of chip-select windows that reached the data stage.
    pub const fn bursts(&self) -> u64 {
        self.bursts
    }

    /// Beats per CA half-word address.
    const fn beats_per_word(&self) -> u64 {
        match self.width {
            DataWidth::X8 => 2,
            DataWidth::X16 => 1,
        }
    }

    fn beat_base(&self, command: CommandAddress) -> u64 {
        command.word_address() * self.beats_per_word()
    }

    /// Raw beat at `index`.
    pub fn beat(&self, index: u64) -> u16 {
        self.memory.get(&index).copied().unwrap_or(0)
    }

    /// Overwrites the beat at `index`.
    pub fn set_beat(&mut self, index: u64, value: u16) {
        let _ = self.memory.insert(index, value & self.width.mask());
    }

    /// The 32-bit bus word a controller read of `adr` would return.
    pub fn word(&self, adr: u32) -> u32 {
        let base = self.beat_base(CommandAddress::encode(adr, false, self.width));
        let bits = self.width.bits();
        (0..u64::from(self.width.data_steps())).fold(0, |acc, i| {
            (acc << bits) | u32::from(self.beat(base + i))
        })
    }

    /// Stores `value` where a controller write of `adr` would put it.
    pub fn load_word(&mut self, adr: u32, value: u32) {
        let base = self.beat_base(CommandAddress::encode(adr, true, self.width));
        let bits = self.width.bits();
        let steps = self.width.data_steps();
        for i in 0..steps {
            let shift = bits * (steps - 1 - i);
            self.set_beat(base + u64::from(i), (value >> shift) as u16);
        }
    }

    fn on_edge(&mut self, dq: u16, rwds: u8, ck: bool) {
        match &mut self.state {
            State::Idle => {}
            State::Command { ca, received } => {
                *ca = (*ca << 8) | u64::from(dq & 0x00FF);
                *received += 1;
                if *received == CA_BYTES {
                    let command = CommandAddress::from_raw(*ca);
                    trace!(ca = command.raw(), "device captured command");
                    if command.fields().register_space {
                        warn!(ca = command.raw(), "register space access ignored");
                    }
                    // One of the 4 * latency edges already passed with the last CA byte,
                    // and the data edge itself is not skipped.
                    self.state = State::Latency {
                        command,
                        remaining: (4 * self.latency).saturating_sub(2),
                    };
                }
            }
            State::Latency { command, remaining } => {
                if *remaining == 0 {
                    let command = *command;
                    self.bursts += 1;
                    self.state = State::Data { command, beat: 0 };
                    self.transfer(dq, rwds, ck);
                } else {
                    *remaining -= 1;
                }
            }
            State::Data { .. } => self.transfer(dq, rwds, ck),
        }
    }

    fn transfer(&mut self, dq: u16, rwds: u8, ck: bool) {
        let State::Data { command, beat } = self.state else {
            return;
        };
        let fields = command.fields();
        let index = self.beat_base(command) + beat;
        if fields.register_space {
            self.drive = DeviceDrive::RELEASED;
        } else if fields.read {
            self.drive = DeviceDrive {
                dq: Some(self.beat(index)),
                rwds: Some(u8::from(ck)),
            };
        } else {
            let mut value = self.beat(index);
            for lane in 0..self.width.rwds_lines() {
                if (rwds >> lane) & 1 == 0 {
                    let mask = 0x00FF_u16 << (8 * lane);
                    value = (value & !mask) | (dq & mask);
                }
            }
            self.set_beat(index, value);
        }
        self.state = State::Data {
            command,
            beat: beat + 1,
        };
    }
}

impl HyperBusDevice for HyperRamDevice {
    fn drive(&self) -> DeviceDrive {
        self.drive
    }

    fn clock(&mut self, pads: &PadOutputs, dq: u16, rwds: u8) {
        let edge = pads.ck != self.ck;
        self.ck = pads.ck;

        if !pads.selected() || pads.rst_n == Some(false) {
            self.state = State::Idle;
            self.drive = DeviceDrive::RELEASED;
            return;
        }
        if self.state == State::Idle {
            self.state = State::Command { ca: 0, received: 0 };
        }
        if edge {
            self.on_edge(dq, rwds, pads.ck);
        }
    }
}
