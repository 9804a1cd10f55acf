//! Per-cycle pin trace.

use serde::Serialize;

use crate::controller::{PadOutputs, Stage};

/// Pin levels and controller state during one internal cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PinSample {
    /// Internal cycle number.
    pub cycle: u64,
    /// Phase counter.
    pub phase: u8,
    /// Sequencer stage.
    pub stage: Stage,
    /// Device clock pad.
    pub ck: bool,
    /// Chip-select pads, bit `n` = line `n` (active low).
    pub cs_n: u8,
    /// Resolved DQ level.
    pub dq: u16,
    /// Controller DQ output-enable.
    pub dq_oe: bool,
    /// Resolved RWDS level.
    pub rwds: u8,
    /// Controller RWDS output-enable.
    pub rwds_oe: bool,
    /// Acknowledge.
    pub ack: bool,
}

impl PinSample {
    /// Captures a sample from the pad outputs and resolved line levels.
    pub fn capture(
        cycle: u64,
        phase: u8,
        stage: Stage,
        pads: &PadOutputs,
        dq: u16,
        rwds: u8,
        ack: bool,
    ) -> Self {
        let cs_n = pads
            .cs_n()
            .iter()
            .enumerate()
            .fold(0, |acc, (i, &level)| acc | (u8::from(level) << i));
        Self {
            cycle,
            phase,
            stage,
            ck: pads.ck,
            cs_n,
            dq,
            dq_oe: pads.dq.oe,
            rwds,
            rwds_oe: pads.rwds.oe,
            ack,
        }
    }
}

/// Recorded samples, oldest first.
#[derive(Debug, Clone, Default)]
pub struct Trace {
    samples: Vec<PinSample>,
}

impl Trace {
    /// An empty trace.
    pub const fn new() -> Self {
        Self {
            samples: Vec::new(),
        }
    }

    /// Appends one sample.
    pub fn push(&mut self, sample: PinSample) {
        self.samples.push(sample);
    }

    /// All samples.
    pub fn samples(&self) -> &[PinSample] {
        &self.samples
    }

    /// Serialises the trace as one JSON object per line.
    ///
    /// # Errors
    ///
    /// Propagates serialisation failures from `serde_json`.
    pub fn to_json_lines(&self) -> Result<String, serde_json::Error> {
        let mut out = String::new();
        for sample in &self.samples {
            out.push_str(&serde_json::to_string(sample)?);
            out.push('\n');
        }
        Ok(out)
    }
}
