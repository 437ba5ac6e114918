//! Outbound byte transport for telemetry.
//!
//! The monitor writes frames one byte at a time through [`ByteSink`]. A sink
//! blocks until the hardware can accept the byte (e.g. UART data register
//! empty) and never reports failure: telemetry is best-effort, and every
//! frame is an absolute snapshot, so a lost byte heals on the next frame.

/// Blocking, best-effort byte output.
pub trait ByteSink {
    /// Write one byte, waiting for the transport to become ready.
    fn write_byte(&mut self, byte: u8);

    /// Write every byte of `bytes` in order.
    fn write_all(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.write_byte(b);
        }
    }
}

impl<T: ByteSink + ?Sized> ByteSink for &mut T {
    fn write_byte(&mut self, byte: u8) {
        (**self).write_byte(byte);
    }
}

/// Adapts any blocking [`embedded_io::Write`] (UART TX, USB CDC, RTT
/// channel) into a [`ByteSink`].
///
/// Write errors drop the byte and are counted; see [`IoSink::dropped`].
pub struct IoSink<W> {
    writer: W,
    dropped: u16,
}

impl<W: embedded_io::Write> IoSink<W> {
    /// Wrap a blocking writer.
    pub const fn new(writer: W) -> Self {
        Self { writer, dropped: 0 }
    }

    /// Number of bytes lost to transport errors (saturating).
    pub fn dropped(&self) -> u16 {
        self.dropped
    }

    /// Release the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: embedded_io::Write> ByteSink for IoSink<W> {
    fn write_byte(&mut self, byte: u8) {
        if self.writer.write_all(&[byte]).is_err() {
            self.dropped = self.dropped.saturating_add(1);
            #[cfg(feature = "defmt")]
            defmt::warn!("telemetry byte dropped ({=u16} total)", self.dropped);
        }
    }
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects, clippy::indexing_slicing)] // test counters
mod tests {
    use super::*;

    struct FlakyWriter {
        out: heapless::Vec<u8, 16>,
        fail_every: usize,
        calls: usize,
    }

    #[derive(Debug)]
    struct Broken;

    impl embedded_io::Error for Broken {
        fn kind(&self) -> embedded_io::ErrorKind {
            embedded_io::ErrorKind::Other
        }
    }

    impl embedded_io::ErrorType for FlakyWriter {
        type Error = Broken;
    }

    impl embedded_io::Write for FlakyWriter {
        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            self.calls += 1;
            if self.calls % self.fail_every == 0 {
                return Err(Broken);
            }
            for &b in buf {
                self.out.push(b).map_err(|_| Broken)?;
            }
            Ok(buf.len())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    #[test]
    fn io_sink_forwards_bytes_in_order() {
        let mut sink = IoSink::new(FlakyWriter {
            out: heapless::Vec::new(),
            fail_every: usize::MAX,
            calls: 0,
        });
        sink.write_all(&[0xFE, 0x01, 0x02]);
        assert_eq!(sink.dropped(), 0);
        assert_eq!(&sink.into_inner().out[..], &[0xFE, 0x01, 0x02]);
    }

    #[test]
    fn io_sink_counts_dropped_bytes() {
        let mut sink = IoSink::new(FlakyWriter {
            out: heapless::Vec::new(),
            fail_every: 2,
            calls: 0,
        });
        sink.write_all(&[1, 2, 3, 4]);
        assert_eq!(sink.dropped(), 2);
        assert_eq!(&sink.into_inner().out[..], &[1, 3]);
    }
}
