//! Upstream bus adapter.
//!
//! A Wishbone-style classic-cycle slave port: the master raises `cyc`/`stb` with address,
//! write enable, write data, and byte selects, and holds them until the single-cycle
//! acknowledge. There is no pipelining and no error response.
//!
//! The adapter latches `dat_r` when the acknowledge rises, so a read result stays stable
//! after the pulse even though the shift register keeps running. On the same edge the
//! request is retired on the master's behalf; a master that wants back-to-back accesses
//! simply asserts the next request.

/// One bus request as presented by the master.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BusRequest {
    /// Word address.
    pub adr: u32,
    /// Write enable.
    pub we: bool,
    /// Write data.
    pub dat_w: u32,
    /// Byte selects; bit `n` enables bus byte lane `n` (bits `8n+7:8n`).
    pub sel: u8,
}

impl BusRequest {
    /// A read of the word at `adr`.
    pub const fn read(adr: u32) -> Self {
        Self {
            adr,
            we: false,
            dat_w: 0,
            sel: 0b1111,
        }
    }

    /// A full-word write.
    pub const fn write(adr: u32, dat_w: u32) -> Self {
        Self::write_masked(adr, dat_w, 0b1111)
    }

    /// A write of only the byte lanes selected in `sel`.
    pub const fn write_masked(adr: u32, dat_w: u32, sel: u8) -> Self {
        Self {
            adr,
            we: true,
            dat_w,
            sel: sel & 0b1111,
        }
    }
}

/// An acknowledged request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    /// The request that was acknowledged.
    pub request: BusRequest,
    /// Latched read data (`None` for writes).
    pub read_data: Option<u32>,
}

/// Request lifecycle and read-data latch.
#[derive(Debug, Clone, Default)]
pub struct BusAdapter {
    request: BusRequest,
    pending: bool,
    dat_r: u32,
    accepted: u64,
}

impl BusAdapter {
    /// Creates an adapter with no request pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises `cyc`/`stb` with the given request fields.
    pub fn assert_request(&mut self, request: BusRequest) {
        self.request = request;
        self.pending = true;
    }

    /// Drops `cyc`/`stb` without waiting for an acknowledge.
    pub fn release(&mut self) {
        self.pending = false;
    }

    /// `cyc & stb`.
    #[inline]
    pub const fn pending(&self) -> bool {
        self.pending
    }

    /// Live request fields, valid whether or not `cyc`/`stb` is raised.
    #[inline]
    pub const fn request(&self) -> &BusRequest {
        &self.request
    }

    /// Read data latched by the most recent read acknowledge.
    #[inline]
    pub const fn read_data(&self) -> u32 {
        self.dat_r
    }

    /// Requests acknowledged so far.
    #[inline]
    pub const fn accepted(&self) -> u64 {
        self.accepted
    }

    /// Retires the pending request on an acknowledge edge.
    ///
    /// # Arguments
    ///
    /// * `dat_r` - Data path read view at the acknowledge.
    pub fn acknowledge(&mut self, dat_r: u32) -> Completion {
        let request = self.request;
        let read_data = if request.we {
            None
        } else {
            self.dat_r = dat_r;
            Some(dat_r)
        };
        self.pending = false;
        self.accepted += 1;
        Completion { request, read_data }
    }
}
