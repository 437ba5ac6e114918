//! Telemetry frame encoding and decoding.
//!
//! # Wire format
//!
//! ```text
//! ┌──────┬───────┬─────────────┬────────────┬────────────┬─────────────┐
//! │ 0xFE │ flags │ stack_usage │ peak_usage │ heap_usage │ free_memory │
//! │  1B  │  1B   │   u16 BE    │   u16 BE   │   u16 BE   │   u16 BE    │
//! └──────┴───────┴─────────────┴────────────┴────────────┴─────────────┘
//! ```
//!
//! No checksum, acknowledgement or retry. Every field is an absolute
//! snapshot, so a corrupted frame is simply superseded by the next one.

use platform::ByteSink;

use crate::flags::Flags;

/// First byte of every frame.
pub const FRAME_HEADER: u8 = 0xFE;

/// Encoded frame length in bytes.
pub const FRAME_LEN: usize = 10;

/// Error decoding a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror_no_std::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Fewer than [`FRAME_LEN`] bytes.
    #[error("frame too short: {0} of 10 bytes")]
    TooShort(usize),
    /// First byte is not [`FRAME_HEADER`].
    #[error("bad frame header {0:#04x}")]
    BadHeader(u8),
    /// Flags byte has bits outside the known set.
    #[error("unknown flag bits {0:#04x}")]
    UnknownFlags(u8),
}

/// One telemetry snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TelemetryFrame {
    /// Conditions raised by this sample.
    pub flags: Flags,
    /// High-water stack usage in bytes.
    pub stack_usage: u16,
    /// Peak stack usage since start or last reset.
    pub peak_usage: u16,
    /// Heap usage in bytes.
    pub heap_usage: u16,
    /// Bytes between heap break and stack top.
    pub free_memory: u16,
}

impl TelemetryFrame {
    /// Encode to the fixed wire layout.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; FRAME_LEN] {
        let [s0, s1] = self.stack_usage.to_be_bytes();
        let [p0, p1] = self.peak_usage.to_be_bytes();
        let [h0, h1] = self.heap_usage.to_be_bytes();
        let [f0, f1] = self.free_memory.to_be_bytes();
        [FRAME_HEADER, self.flags.bits(), s0, s1, p0, p1, h0, h1, f0, f1]
    }

    /// Transmit byte by byte.
    pub fn write_to<S: ByteSink + ?Sized>(&self, sink: &mut S) {
        for byte in self.to_bytes() {
            sink.write_byte(byte);
        }
    }

    /// Decode the first [`FRAME_LEN`] bytes of `bytes`.
    ///
    /// # Errors
    ///
    /// See [`FrameError`].
    pub fn parse(bytes: &[u8]) -> Result<Self, FrameError> {
        let [header, flags, s0, s1, p0, p1, h0, h1, f0, f1] =
            match bytes.get(..FRAME_LEN).map(<[u8; FRAME_LEN]>::try_from) {
                Some(Ok(raw)) => raw,
                _ => return Err(FrameError::TooShort(bytes.len())),
            };
        if header != FRAME_HEADER {
            return Err(FrameError::BadHeader(header));
        }
        let flags = Flags::from_bits(flags).ok_or(FrameError::UnknownFlags(flags))?;
        Ok(Self {
            flags,
            stack_usage: u16::from_be_bytes([s0, s1]),
            peak_usage: u16::from_be_bytes([p0, p1]),
            heap_usage: u16::from_be_bytes([h0, h1]),
            free_memory: u16::from_be_bytes([f0, f1]),
        })
    }
}

/// Incremental decoder for a raw telemetry byte stream.
///
/// Bytes before a header are discarded. If a complete candidate frame fails
/// to parse, the decoder drops its first byte and resynchronises on the next
/// header inside the buffered bytes.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buf: heapless::Vec<u8, FRAME_LEN>,
    discarded: usize,
}

impl FrameDecoder {
    /// Empty decoder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buf: heapless::Vec::new(),
            discarded: 0,
        }
    }

    /// Push one byte; returns a frame when one completes.
    pub fn push(&mut self, byte: u8) -> Option<TelemetryFrame> {
        if self.buf.is_empty() && byte != FRAME_HEADER {
            self.discarded = self.discarded.saturating_add(1);
            return None;
        }
        if self.buf.push(byte).is_err() {
            // unreachable in practice: a full buffer is always drained below
            self.resync();
            return None;
        }
        if !self.buf.is_full() {
            return None;
        }
        match TelemetryFrame::parse(&self.buf) {
            Ok(frame) => {
                self.buf.clear();
                Some(frame)
            }
            Err(_) => {
                self.resync();
                None
            }
        }
    }

    /// Push a slice, calling `on_frame` for every completed frame.
    pub fn extend<F: FnMut(TelemetryFrame)>(&mut self, bytes: &[u8], mut on_frame: F) {
        for &b in bytes {
            if let Some(frame) = self.push(b) {
                on_frame(frame);
            }
        }
    }

    /// Bytes skipped while hunting for a header.
    #[must_use]
    pub const fn discarded(&self) -> usize {
        self.discarded
    }

    fn resync(&mut self) {
        let restart = self
            .buf
            .iter()
            .skip(1)
            .position(|&b| b == FRAME_HEADER)
            .map(|p| p.saturating_add(1));
        let dropped = restart.unwrap_or(self.buf.len());
        self.discarded = self.discarded.saturating_add(dropped);
        let tail: heapless::Vec<u8, FRAME_LEN> = self.buf.iter().skip(dropped).copied().collect();
        self.buf = tail;
    }
}
