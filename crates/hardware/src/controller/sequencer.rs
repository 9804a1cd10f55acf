//! Protocol sequencer.
//!
//! Replays the [`Timeline`] once per accepted request. The sequencer owns the control
//! registers the timeline assigns directly (chip-select, output-enables, RWDS mask,
//! acknowledge) and hands data-path actions back to the caller, which applies them after
//! the data path's own shift so that loads win.
//!
//! Counting follows a plain elapsed-cycle counter: the trigger edge moves it from 0 to 1,
//! every later edge increments it, and the edge at which it equals the timeline period
//! returns it to 0. A trigger while the counter is non-zero is not honoured.

use tracing::trace;

use crate::config::DataWidth;
use crate::controller::bus::BusRequest;
use crate::controller::timeline::{Action, Stage, Step, Timeline};

/// Control registers driven by the sequencer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlRegisters {
    /// Chip-select (active high; the pad is `!cs`).
    pub cs: bool,
    /// DQ output-enable.
    pub dq_oe: bool,
    /// RWDS output-enable.
    pub rwds_oe: bool,
    /// RWDS output bits, one per device byte lane.
    pub rwds_o: u8,
    /// Acknowledge.
    pub ack: bool,
}

/// Timeline executor.
#[derive(Debug, Clone)]
pub struct Sequencer {
    timeline: Timeline,
    elapsed: u32,
    stage: Stage,
    regs: ControlRegisters,
}

impl Sequencer {
    /// Creates an idle sequencer with a freshly built timeline.
    pub fn new(width: DataWidth, latency: u32) -> Self {
        Self {
            timeline: Timeline::new(width, latency),
            elapsed: 0,
            stage: Stage::Idle,
            regs: ControlRegisters::default(),
        }
    }

    /// The step table being replayed.
    pub const fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Current stage.
    #[inline]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// Cycles since the trigger edge; zero when idle.
    #[inline]
    pub const fn elapsed(&self) -> u32 {
        self.elapsed
    }

    /// True while a timeline is in flight.
    #[inline]
    pub const fn busy(&self) -> bool {
        self.elapsed != 0
    }

    /// Current control register values.
    #[inline]
    pub const fn registers(&self) -> ControlRegisters {
        self.regs
    }

    /// Advances one cycle.
    ///
    /// # Arguments
    ///
    /// * `trigger` - A request is pending and the phase generator is at its start phase.
    /// * `request` - The live request; symbolic actions are resolved against it.
    ///
    /// # Returns
    ///
    /// The step applied on this edge, if any. Its data-path actions are left to the caller.
    pub fn tick(&mut self, trigger: bool, request: &BusRequest) -> Option<&Step> {
        let offset = if self.busy() {
            Some(self.elapsed)
        } else if trigger {
            Some(0)
        } else {
            None
        };

        let period = self.timeline.period();
        if self.elapsed == period {
            self.elapsed = 0;
        } else if self.elapsed != 0 || trigger {
            self.elapsed += 1;
        }

        let step = self.timeline.step_at(offset?)?;
        trace!(offset = step.offset, stage = %step.stage, "sequencer step");
        self.stage = step.stage;
        for action in &step.actions {
            match *action {
                Action::ChipSelect(cs) => self.regs.cs = cs,
                Action::DqOutputEnable(oe) => self.regs.dq_oe = oe.resolve(request.we),
                Action::RwdsOutputEnable(oe) => self.regs.rwds_oe = oe.resolve(request.we),
                Action::Mask { line, lane } => {
                    let masked = (request.sel >> lane) & 1 == 0;
                    let bit = 1 << line;
                    if masked {
                        self.regs.rwds_o |= bit;
                    } else {
                        self.regs.rwds_o &= !bit;
                    }
                }
                Action::Ack(ack) => self.regs.ack = ack,
                Action::LoadCommandAddress | Action::CaActive(_) | Action::LoadWriteData => {}
            }
        }
        Some(step)
    }
}
