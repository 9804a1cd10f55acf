//! Access timeline.
//!
//! A transaction is a fixed table of timed pin actions. The table is written as a list of
//! `(delay, stage, actions)` entries, where each delay is the time spent *after* applying
//! that entry's actions, and is folded once into absolute offsets. Replaying it never
//! recomputes a delay and never branches on anything the device does.
//!
//! Actions that depend on the request (`we`, `dat_w`, `sel`) are stored symbolically and
//! resolved against the live request at the edge they fire on.

use std::fmt;

use crate::common::constants::{
    ACK_CYCLES, ACK_RELEASE_CYCLES, BUS_BYTE_LANES, CA_CYCLES, CYCLES_PER_LATENCY_UNIT,
    DATA_STEP_CYCLES, LATENCY_CORRECTION_CYCLES, SETTLE_CYCLES, TEARDOWN_CYCLES,
};
use crate::config::DataWidth;

/// Coarse protocol stage, entered when the step carrying it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// No timeline running.
    #[default]
    Idle,
    /// Triggered; waiting out the settle gap before any pin moves.
    Settle,
    /// Command-address bytes on DQ.
    CommandAddress,
    /// Device access latency; DQ released.
    Latency,
    /// Payload transfer.
    Data,
    /// Chip-select and output-enables dropping.
    Teardown,
    /// Acknowledge pulse and release.
    Ack,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Settle => "settle",
            Self::CommandAddress => "ca",
            Self::Latency => "latency",
            Self::Data => "data",
            Self::Teardown => "teardown",
            Self::Ack => "ack",
        };
        f.write_str(name)
    }
}

/// Output-enable source for a tristate group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputEnable {
    /// Released.
    Off,
    /// Driven.
    On,
    /// Driven only when the request is a write.
    OnWrite,
}

impl OutputEnable {
    /// Resolves against the request's write enable.
    pub const fn resolve(self, we: bool) -> bool {
        match self {
            Self::Off => false,
            Self::On => true,
            Self::OnWrite => we,
        }
    }
}

/// One register assignment performed by the sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Chip-select register (active high internally; the pad is inverted).
    ChipSelect(bool),
    /// DQ output-enable.
    DqOutputEnable(OutputEnable),
    /// RWDS output-enable.
    RwdsOutputEnable(OutputEnable),
    /// Load the shift register with the current command-address word.
    LoadCommandAddress,
    /// Set or clear the byte-wide command-address shift mode.
    CaActive(bool),
    /// Load the shift register with `dat_w << 16`.
    LoadWriteData,
    /// Drive RWDS line `line` with the complement of `sel[lane]`.
    Mask {
        /// RWDS output bit.
        line: u8,
        /// Bus byte lane whose select bit is inverted.
        lane: u8,
    },
    /// Acknowledge register.
    Ack(bool),
}

/// A timeline entry at an absolute offset from the trigger edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Cycles after the trigger edge at which the actions are applied.
    pub offset: u32,
    /// Stage entered by this step.
    pub stage: Stage,
    /// Register assignments applied on that edge.
    pub actions: Vec<Action>,
}

/// The complete, precomputed step table for one `(latency, width)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    width: DataWidth,
    latency: u32,
    steps: Vec<Step>,
}

/// Internal cycles spent in the latency stage: `latency * 8 - 4`.
///
/// The formula is the protocol contract for fixed-latency devices clocked at a quarter of
/// the internal rate, with the latency count starting mid-way through the CA phase.
///
/// # Panics
///
/// Panics in debug builds if `latency` is zero or overflows the multiply; validated
/// configurations stay within `MIN_LATENCY..=MAX_LATENCY`.
pub const fn latency_cycles(latency: u32) -> u32 {
    latency * CYCLES_PER_LATENCY_UNIT - LATENCY_CORRECTION_CYCLES
}

impl Timeline {
    /// Builds the table for the given width and latency.
    pub fn new(width: DataWidth, latency: u32) -> Self {
        let mut sequence: Vec<(u32, Stage, Vec<Action>)> = vec![
            (SETTLE_CYCLES, Stage::Settle, Vec::new()),
            (
                CA_CYCLES,
                Stage::CommandAddress,
                vec![
                    Action::ChipSelect(true),
                    Action::DqOutputEnable(OutputEnable::On),
                    Action::LoadCommandAddress,
                    Action::CaActive(true),
                ],
            ),
            (
                latency_cycles(latency),
                Stage::Latency,
                vec![
                    Action::DqOutputEnable(OutputEnable::Off),
                    Action::CaActive(false),
                ],
            ),
        ];

        let lines = width.rwds_lines();
        for step in 0..width.data_steps() {
            let mut actions = Vec::new();
            if step == 0 {
                actions.extend([
                    Action::DqOutputEnable(OutputEnable::OnWrite),
                    Action::LoadWriteData,
                    Action::RwdsOutputEnable(OutputEnable::OnWrite),
                ]);
            }
            // Most significant byte lane goes out first, upper RWDS line first.
            for line in (0..lines).rev() {
                let lane = BUS_BYTE_LANES - 1 - (step * lines + (lines - 1 - line));
                actions.push(Action::Mask {
                    line: line as u8,
                    lane: lane as u8,
                });
            }
            sequence.push((DATA_STEP_CYCLES, Stage::Data, actions));
        }

        sequence.extend([
            (
                TEARDOWN_CYCLES,
                Stage::Teardown,
                vec![
                    Action::ChipSelect(false),
                    Action::RwdsOutputEnable(OutputEnable::Off),
                    Action::DqOutputEnable(OutputEnable::Off),
                ],
            ),
            (ACK_CYCLES, Stage::Ack, vec![Action::Ack(true)]),
            (ACK_RELEASE_CYCLES, Stage::Ack, vec![Action::Ack(false)]),
            (0, Stage::Idle, Vec::new()),
        ]);

        let mut offset = 0;
        let steps = sequence
            .into_iter()
            .map(|(delay, stage, actions)| {
                let step = Step {
                    offset,
                    stage,
                    actions,
                };
                offset += delay;
                step
            })
            .collect();

        Self {
            width,
            latency,
            steps,
        }
    }

    /// The steps in firing order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Data width the table was built for.
    pub const fn width(&self) -> DataWidth {
        self.width
    }

    /// Latency the table was built for.
    pub const fn latency(&self) -> u32 {
        self.latency
    }

    /// Offset of the final step, at which the sequencer returns to idle.
    ///
    /// This is also the minimum spacing between two trigger edges.
    pub fn period(&self) -> u32 {
        self.steps.last().map_or(0, |s| s.offset)
    }

    /// Offset of the first step that enters `stage`.
    pub fn offset_of(&self, stage: Stage) -> Option<u32> {
        self.steps.iter().find(|s| s.stage == stage).map(|s| s.offset)
    }

    /// Offset of the step that raises the acknowledge register.
    pub fn ack_offset(&self) -> Option<u32> {
        self.steps
            .iter()
            .find(|s| s.actions.contains(&Action::Ack(true)))
            .map(|s| s.offset)
    }

    /// Length of the data stage in cycles.
    pub const fn data_cycles(&self) -> u32 {
        self.width.data_steps() * DATA_STEP_CYCLES
    }

    /// The step scheduled for `offset`, if any.
    pub fn step_at(&self, offset: u32) -> Option<&Step> {
        self.steps
            .binary_search_by_key(&offset, |s| s.offset)
            .ok()
            .map(|i| &self.steps[i])
    }
}

impl fmt::Display for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "timeline width={} latency={} period={}",
            self.width,
            self.latency,
            self.period()
        )?;
        for step in &self.steps {
            write!(f, "  {:>4}  {:<8}", step.offset, step.stage.to_string())?;
            for action in &step.actions {
                write!(f, " {action:?}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
