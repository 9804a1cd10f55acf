//! Protocol Constants.
//!
//! This module defines the fixed numbers of the HyperBus protocol and of this controller's
//! timing model. It includes:
//! 1. **Command-Address Layout:** Bit positions and field masks of the 48-bit CA word.
//! 2. **Register Widths:** Shift register, phase counter, and bus lane sizes.
//! 3. **Timeline Constants:** Fixed step durations that do not depend on latency or width.

/// Width of the command-address word and of the data shift register, in bits.
pub const CA_BITS: u32 = 48;

/// Mask covering all 48 bits of the shift register.
pub const SHIFT_REGISTER_MASK: u64 = (1 << CA_BITS) - 1;

/// Number of bytes in the command-address word (one byte per device clock edge).
pub const CA_BYTES: u32 = CA_BITS / 8;

/// Bit position of the R/W# flag (1 = read, 0 = write).
pub const CA_RW_BIT: u32 = 47;

/// Bit position of the address space flag (0 = memory, 1 = register).
pub const CA_ADDRESS_SPACE_BIT: u32 = 46;

/// Bit position of the burst type flag (1 = linear, 0 = wrapped).
pub const CA_BURST_TYPE_BIT: u32 = 45;

/// Lowest bit of the row / upper column address field (bits 44:16).
pub const CA_ROW_SHIFT: u32 = 16;

/// Mask of the 29-bit row / upper column address field, after shifting down.
pub const CA_ROW_MASK: u64 = (1 << 29) - 1;

/// Mask of the 3-bit lower column address field (bits 2:0).
pub const CA_LOWER_MASK: u64 = 0b111;

/// Reserved bits 15:3; always zero on the wire.
pub const CA_RESERVED_MASK: u64 = 0xFFF8;

/// Width of the upstream bus data word in bits.
pub const BUS_DATA_BITS: u32 = 32;

/// Number of byte lanes on the upstream bus (one `sel` bit each).
pub const BUS_BYTE_LANES: u32 = BUS_DATA_BITS / 8;

/// Number of internal cycles per device clock period (quarter-rate clock).
pub const CYCLES_PER_DEVICE_CLOCK: u32 = 4;

/// Phase at which the device clock rises and new timelines may start.
pub const START_PHASE: u8 = 1;

/// Phase at which the device clock falls.
pub const FALL_PHASE: u8 = 3;

/// Settle gap before any pin moves.
pub const SETTLE_CYCLES: u32 = 3;

/// Command-address phase: 6 bytes, one per device clock edge, two cycles per edge.
pub const CA_CYCLES: u32 = 12;

/// Duration of one data sub-step (one device clock edge).
pub const DATA_STEP_CYCLES: u32 = 2;

/// Chip-select / output-enable teardown.
pub const TEARDOWN_CYCLES: u32 = 2;

/// Acknowledge pulse width.
pub const ACK_CYCLES: u32 = 1;

/// Gap after the acknowledge pulse before the timeline ends.
pub const ACK_RELEASE_CYCLES: u32 = 1;

/// Pipeline correction subtracted from the latency step.
///
/// The latency count starts in the middle of the CA phase.
pub const LATENCY_CORRECTION_CYCLES: u32 = 4;

/// Internal cycles per unit of configured latency.
pub const CYCLES_PER_LATENCY_UNIT: u32 = 8;

/// Lowest accepted latency setting.
pub const MIN_LATENCY: u32 = 1;

/// Highest accepted latency setting; keeps every timeline offset well inside `u32`.
pub const MAX_LATENCY: u32 = 16;
