//! Command-address encoder.
//!
//! Maps the live bus request onto the 48-bit HyperBus command-address word. The word is
//! a pure function of `(adr, we)` and the configured width; the controller recomputes it
//! every cycle and never stores it.
//!
//! ```text
//! [47]    R/W#           1 = read, 0 = write
//! [46]    address space  0 = memory (always)
//! [45]    burst type     1 = linear (always)
//! [44:16] row / upper column address
//! [15:3]  reserved, zero
//! [2:0]   lower column address
//! ```

use crate::common::constants::{
    CA_ADDRESS_SPACE_BIT, CA_BURST_TYPE_BIT, CA_LOWER_MASK, CA_RESERVED_MASK, CA_ROW_MASK,
    CA_ROW_SHIFT, CA_RW_BIT, SHIFT_REGISTER_MASK,
};
use crate::config::DataWidth;

/// A 48-bit command-address word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct CommandAddress(u64);

/// Field view of a command-address word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommandFields {
    /// R/W# bit.
    pub read: bool,
    /// Address space bit (register space when set).
    pub register_space: bool,
    /// Burst type bit (linear when set).
    pub linear_burst: bool,
    /// Bits 44:16.
    pub row_upper: u32,
    /// Bits 15:3; zero on a well-formed word.
    pub reserved: u16,
    /// Bits 2:0.
    pub lower: u8,
}

impl CommandAddress {
    /// Encodes a request for a device of the given width.
    ///
    /// # Arguments
    ///
    /// * `adr` - Bus word address.
    /// * `we` - Write enable; clears R/W#.
    /// * `width` - Configured DQ width, which selects the address bit mapping.
    pub const fn encode(adr: u32, we: bool, width: DataWidth) -> Self {
        let adr = adr as u64;
        let mut ca = 1 << CA_BURST_TYPE_BIT;
        if !we {
            ca |= 1 << CA_RW_BIT;
        }
        match width {
            DataWidth::X8 => {
                ca |= ((adr >> 2) & CA_ROW_MASK) << CA_ROW_SHIFT;
                ca |= (adr & 0b11) << 1;
            }
            DataWidth::X16 => {
                ca |= ((adr >> 3) & CA_ROW_MASK) << CA_ROW_SHIFT;
                ca |= adr & CA_LOWER_MASK;
            }
        }
        Self(ca)
    }

    /// Wraps a raw 48-bit value, e.g. one captured from the pins.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw & SHIFT_REGISTER_MASK)
    }

    /// The raw word.
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Byte `i` in transmission order (0 = bits 47:40, 5 = bits 7:0).
    pub const fn byte(self, i: u32) -> u8 {
        (self.0 >> (40 - 8 * i)) as u8
    }

    /// Splits the word into its fields.
    pub const fn fields(self) -> CommandFields {
        CommandFields {
            read: (self.0 >> CA_RW_BIT) & 1 == 1,
            register_space: (self.0 >> CA_ADDRESS_SPACE_BIT) & 1 == 1,
            linear_burst: (self.0 >> CA_BURST_TYPE_BIT) & 1 == 1,
            row_upper: ((self.0 >> CA_ROW_SHIFT) & CA_ROW_MASK) as u32,
            reserved: ((self.0 & CA_RESERVED_MASK) >> 3) as u16,
            lower: (self.0 & CA_LOWER_MASK) as u8,
        }
    }

    /// Device half-word address named by the word: `row_upper:lower`.
    pub const fn word_address(self) -> u64 {
        (((self.0 >> CA_ROW_SHIFT) & CA_ROW_MASK) << 3) | (self.0 & CA_LOWER_MASK)
    }
}
