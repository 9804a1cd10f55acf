//! Simulator: owns the controller and the device side-by-side.
//!
//! Each `step` is one internal clock cycle:
//! 1. The controller's pad outputs and the device's registered drive are resolved into the
//!    levels on the shared lines.
//! 2. The device observes the cycle.
//! 3. The controller takes its clock edge with the resolved DQ level.

use tracing::warn;

use crate::common::{ConfigError, resolve};
use crate::config::ControllerConfig;
use crate::controller::{BusRequest, HyperRamController, TickOutcome};
use crate::device::{HyperBusDevice, HyperRamDevice};
use crate::sim::trace::{PinSample, Trace};
use crate::stats::ControllerStats;

/// A completed bus transaction as seen from the master.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transaction {
    /// The acknowledged request.
    pub request: BusRequest,
    /// Latched read data (`None` for writes).
    pub read_data: Option<u32>,
    /// Cycle in which the request was first asserted.
    pub issue_cycle: u64,
    /// Cycle whose closing edge triggered the timeline (phase 1).
    pub trigger_cycle: u64,
    /// Cycle during which the acknowledge was high.
    pub ack_cycle: u64,
}

impl Transaction {
    /// Cycles from the trigger cycle to the acknowledge cycle.
    pub const fn ack_latency(&self) -> u64 {
        self.ack_cycle - self.trigger_cycle
    }

    /// Cycles spent waiting for the start phase.
    pub const fn alignment_wait(&self) -> u64 {
        self.trigger_cycle - self.issue_cycle
    }
}

/// Top-level simulator: controller, device, statistics, and optional trace.
#[derive(Debug)]
pub struct Simulator<D = HyperRamDevice> {
    controller: HyperRamController,
    device: D,
    stats: ControllerStats,
    trace: Option<Trace>,
}

impl Simulator<HyperRamDevice> {
    /// Builds a controller from `config` with a matching, zero-filled device.
    ///
    /// # Errors
    ///
    /// Propagates configuration validation errors.
    pub fn from_config(config: &ControllerConfig) -> Result<Self, ConfigError> {
        let controller = HyperRamController::new(config)?;
        let device = HyperRamDevice::new(controller.width(), controller.params().latency());
        Ok(Self::new(controller, device))
    }
}

impl<D: HyperBusDevice> Simulator<D> {
    /// Wires a controller to a device.
    pub fn new(controller: HyperRamController, device: D) -> Self {
        Self {
            controller,
            device,
            stats: ControllerStats::default(),
            trace: None,
        }
    }

    /// The controller.
    pub const fn controller(&self) -> &HyperRamController {
        &self.controller
    }

    /// The controller, mutably (e.g. to drive the bus by hand).
    pub fn controller_mut(&mut self) -> &mut HyperRamController {
        &mut self.controller
    }

    /// The device.
    pub const fn device(&self) -> &D {
        &self.device
    }

    /// The device, mutably.
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Statistics so far.
    pub const fn stats(&self) -> &ControllerStats {
        &self.stats
    }

    /// Starts recording a pin trace, discarding any previous one.
    pub fn enable_trace(&mut self) {
        self.trace = Some(Trace::new());
    }

    /// The recorded trace, if tracing is enabled.
    pub const fn trace(&self) -> Option<&Trace> {
        self.trace.as_ref()
    }

    /// Simulates one internal clock cycle.
    pub fn step(&mut self) -> TickOutcome {
        let pads = self.controller.pads();
        let drive = self.device.drive();
        let dq = resolve(pads.dq, drive.dq);
        let rwds = resolve(pads.rwds, drive.rwds);
        let cycle = self.controller.cycle();

        if dq.contention || rwds.contention {
            warn!(cycle, "controller and device both driving the bus");
            self.stats.contention_cycles += 1;
        }
        if let Some(trace) = &mut self.trace {
            trace.push(PinSample::capture(
                cycle,
                self.controller.phase(),
                self.controller.stage(),
                &pads,
                dq.value,
                rwds.value,
                self.controller.ack(),
            ));
        }

        self.device.clock(&pads, dq.value, rwds.value);
        let outcome = self.controller.tick(dq.value);

        self.stats.cycles += 1;
        if self.controller.busy() {
            self.stats.busy_cycles += 1;
        }
        if outcome.refused {
            self.stats.refused_triggers += 1;
        }
        if let Some(completion) = outcome.completion {
            if completion.request.we {
                self.stats.writes += 1;
            } else {
                self.stats.reads += 1;
            }
        }
        outcome
    }

    /// Simulates `cycles` cycles without touching the bus.
    pub fn idle(&mut self, cycles: u64) {
        for _ in 0..cycles {
            let _ = self.step();
        }
    }

    /// Issues one request and runs until it is acknowledged.
    ///
    /// The controller always acknowledges on schedule, so this terminates after at most
    /// one timeline already in flight plus one full period.
    pub fn execute(&mut self, request: BusRequest) -> Transaction {
        self.controller.bus_mut().assert_request(request);
        let issue_cycle = self.controller.cycle();
        let mut trigger_cycle = issue_cycle;
        loop {
            let cycle = self.controller.cycle();
            let outcome = self.step();
            if outcome.started {
                trigger_cycle = cycle;
            }
            if let Some(completion) = outcome.completion {
                return Transaction {
                    request: completion.request,
                    read_data: completion.read_data,
                    issue_cycle,
                    trigger_cycle,
                    ack_cycle: cycle + 1,
                };
            }
        }
    }

    /// Reads the bus word at `adr`.
    pub fn read(&mut self, adr: u32) -> u32 {
        self.execute(BusRequest::read(adr)).read_data.unwrap_or_default()
    }

    /// Writes a full bus word.
    pub fn write(&mut self, adr: u32, data: u32) {
        let _ = self.execute(BusRequest::write(adr, data));
    }

    /// Writes the byte lanes of `data` selected by `sel`.
    pub fn write_masked(&mut self, adr: u32, data: u32, sel: u8) {
        let _ = self.execute(BusRequest::write_masked(adr, data, sel));
    }
}
