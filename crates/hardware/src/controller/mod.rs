//! HyperBus memory controller.
//!
//! This module assembles the controller from its parts:
//! 1. **Phase Generator:** Quarter-rate device clock and the single legal start phase.
//! 2. **Command-Address Encoder:** The 48-bit CA word, recomputed every cycle.
//! 3. **Data Path:** 48-bit shift register between DQ and the bus.
//! 4. **Sequencer:** Precomputed timeline replayed once per request.
//! 5. **Bus Adapter:** Request lifecycle and read-data latch.
//! 6. **Pads:** Pin levels derived from the registers.
//!
//! `HyperRamController::tick` models one rising edge of the internal clock. All registers
//! are updated from the values they held before the edge; the pad outputs and read data
//! observed after a call are the levels present during the following cycle.

/// Upstream bus adapter.
pub mod bus;
/// Command-address word encoding.
pub mod command;
/// Shift register data path.
pub mod datapath;
/// Pad-level outputs.
pub mod pads;
/// Phase counter and device clock.
pub mod phase;
/// Timeline executor.
pub mod sequencer;
/// Step table construction.
pub mod timeline;

use tracing::debug;

use crate::common::{ConfigError, Tristate};
use crate::config::{ControllerConfig, ControllerParams, DataWidth};

pub use bus::{BusAdapter, BusRequest, Completion};
pub use command::CommandAddress;
pub use datapath::DataPath;
pub use pads::PadOutputs;
pub use phase::PhaseGenerator;
pub use sequencer::Sequencer;
pub use timeline::{Action, Stage, Timeline};

/// What happened on one internal clock edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// A timeline was triggered on this edge.
    pub started: bool,
    /// A pending request met the start phase while a timeline was already running.
    pub refused: bool,
    /// The acknowledge rose on this edge.
    pub completion: Option<Completion>,
}

/// Cycle-accurate HyperRAM controller for a single attached device.
#[derive(Debug, Clone)]
pub struct HyperRamController {
    params: ControllerParams,
    phase: PhaseGenerator,
    datapath: DataPath,
    sequencer: Sequencer,
    bus: BusAdapter,
    cycle: u64,
}

impl HyperRamController {
    /// Validates `config` and builds a controller in its reset state.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] produced by [`ControllerConfig::validate`]; an
    /// unsupported data width is rejected here, before any transaction can run.
    pub fn new(config: &ControllerConfig) -> Result<Self, ConfigError> {
        Ok(Self::from_params(config.validate()?))
    }

    /// Builds a controller from already validated parameters.
    pub fn from_params(params: ControllerParams) -> Self {
        let width = params.width();
        let latency = params.latency();
        debug!(%width, latency, "building HyperRAM controller");
        Self {
            phase: PhaseGenerator::new(),
            datapath: DataPath::new(width),
            sequencer: Sequencer::new(width, latency),
            bus: BusAdapter::new(),
            cycle: 0,
            params,
        }
    }

    /// Construction parameters.
    pub const fn params(&self) -> &ControllerParams {
        &self.params
    }

    /// Configured DQ width.
    pub const fn width(&self) -> DataWidth {
        self.params.width()
    }

    /// Upstream port.
    pub const fn bus(&self) -> &BusAdapter {
        &self.bus
    }

    /// Mutable upstream port, for the bus master.
    pub fn bus_mut(&mut self) -> &mut BusAdapter {
        &mut self.bus
    }

    /// The step table this instance replays.
    pub const fn timeline(&self) -> &Timeline {
        self.sequencer.timeline()
    }

    /// Internal cycles elapsed since reset.
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Current phase (0..=3).
    pub const fn phase(&self) -> u8 {
        self.phase.phase()
    }

    /// Current sequencer stage.
    pub const fn stage(&self) -> Stage {
        self.sequencer.stage()
    }

    /// True while a transaction is in flight.
    pub const fn busy(&self) -> bool {
        self.sequencer.busy()
    }

    /// Acknowledge output.
    pub const fn ack(&self) -> bool {
        self.sequencer.registers().ack
    }

    /// Continuous read-data view of the shift register (meaningful on the acknowledge).
    pub const fn read_data(&self) -> u32 {
        self.datapath.read_data()
    }

    /// The data path, for inspection.
    pub const fn datapath(&self) -> &DataPath {
        &self.datapath
    }

    /// Command-address word for the live request.
    pub fn command_address(&self) -> CommandAddress {
        let request = self.bus.request();
        CommandAddress::encode(request.adr, request.we, self.width())
    }

    /// Pad levels for the current cycle.
    pub fn pads(&self) -> PadOutputs {
        let regs = self.sequencer.registers();
        let rwds_mask = (1u8 << self.width().rwds_lines()) - 1;
        PadOutputs::new(
            self.params.pads(),
            self.phase.clk(),
            regs.cs,
            Tristate {
                o: self.datapath.dq_out(),
                oe: regs.dq_oe,
            },
            Tristate {
                o: regs.rwds_o & rwds_mask,
                oe: regs.rwds_oe,
            },
        )
    }

    /// Advances one internal clock edge.
    ///
    /// # Arguments
    ///
    /// * `dq_in` - Level on the DQ lines during the cycle ending at this edge.
    pub fn tick(&mut self, dq_in: u16) -> TickOutcome {
        let regs = self.sequencer.registers();
        let request = *self.bus.request();
        let command = self.command_address();
        let shift = self.phase.is_shift();
        let trigger = self.bus.pending() && self.phase.is_start();
        let busy = self.sequencer.busy();

        let mut outcome = TickOutcome {
            started: trigger && !busy,
            refused: trigger && busy,
            completion: None,
        };
        if outcome.started {
            debug!(
                cycle = self.cycle,
                adr = request.adr,
                we = request.we,
                "transaction start"
            );
        }

        self.phase.tick(regs.cs);
        self.datapath.tick(shift, dq_in);
        if let Some(step) = self.sequencer.tick(trigger, &request) {
            for action in &step.actions {
                match *action {
                    Action::LoadCommandAddress => self.datapath.load(command.raw()),
                    Action::CaActive(active) => self.datapath.set_ca_active(active),
                    Action::LoadWriteData => self.datapath.load(u64::from(request.dat_w) << 16),
                    _ => {}
                }
            }
        }

        if self.sequencer.registers().ack && !regs.ack {
            let completion = self.bus.acknowledge(self.datapath.read_data());
            debug!(
                cycle = self.cycle,
                adr = completion.request.adr,
                read_data = ?completion.read_data,
                "transaction acknowledged"
            );
            outcome.completion = Some(completion);
        }

        self.cycle += 1;
        outcome
    }
}
