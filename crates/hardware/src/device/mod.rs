//! Devices attached to the controller's pads.
//!
//! A device sees the pad levels once per internal cycle and answers with the levels it
//! drives on the shared DQ/RWDS lines. Device outputs are registered: what a device decides
//! while observing cycle `n` appears on the wire in cycle `n + 1`.

/// Behavioural HyperRAM part.
pub mod hyperram;

pub use hyperram::HyperRamDevice;

use crate::controller::PadOutputs;

/// Levels a device drives onto the shared lines; `None` is high impedance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceDrive {
    /// DQ lines.
    pub dq: Option<u16>,
    /// RWDS lines.
    pub rwds: Option<u8>,
}

impl DeviceDrive {
    /// Both groups released.
    pub const RELEASED: Self = Self {
        dq: None,
        rwds: None,
    };
}

/// Trait for anything that can sit on the far side of the HyperBus pads.
pub trait HyperBusDevice {
    /// Levels driven during the current cycle.
    fn drive(&self) -> DeviceDrive;

    /// Observes one cycle of pad activity.
    ///
    /// # Arguments
    ///
    /// * `pads` - Controller outputs during the cycle.
    /// * `dq` - Resolved DQ level.
    /// * `rwds` - Resolved RWDS level.
    fn clock(&mut self, pads: &PadOutputs, dq: u16, rwds: u8);
}
