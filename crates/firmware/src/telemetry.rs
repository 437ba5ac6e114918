//! Telemetry plumbing shared by the main loop and the USART3 receiver.
//!
//! The monitor owns the TX half and writes frames from the main loop. The RX
//! half runs in its own task and only ever touches [`LATCH`].

use core::sync::atomic::AtomicU32;

use ramscope::HandshakeLatch;

/// Handshake latch fed by the receive task and read by the monitor.
pub static LATCH: HandshakeLatch = HandshakeLatch::new();

/// Heap break published by an allocator, `0` until the first allocation.
///
/// This image has no global allocator, so the value stays `0` and the
/// monitor reports the linker heap start as the break.
pub static HEAP_BREAK: AtomicU32 = AtomicU32::new(0);

#[cfg(feature = "hardware")]
pub use uart::{handshake_rx, TelemetryRx, TelemetrySink, TelemetryTx};

#[cfg(feature = "hardware")]
mod uart {
    use embassy_stm32::peripherals::{DMA1_CH0, DMA1_CH1, USART3};
    use embassy_stm32::usart::{UartRx, UartTx};
    use platform::IoSink;

    use super::LATCH;

    /// Transmit half of USART3.
    pub type TelemetryTx = UartTx<'static, USART3, DMA1_CH0>;

    /// Receive half of USART3.
    pub type TelemetryRx = UartRx<'static, USART3, DMA1_CH1>;

    /// Blocking byte sink the monitor writes frames into.
    pub type TelemetrySink = IoSink<TelemetryTx>;

    /// Watch inbound bytes for the handshake.
    #[embassy_executor::task]
    pub async fn handshake_rx(mut rx: TelemetryRx) {
        let mut buf = [0_u8; 1];
        loop {
            match rx.read(&mut buf).await {
                Ok(()) => {
                    let [byte] = buf;
                    if LATCH.feed(byte) {
                        defmt::info!("handshake received");
                    }
                }
                Err(_) => defmt::warn!("telemetry rx error"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::Ordering;

    #[test]
    fn statics_start_idle() {
        assert!(!LATCH.is_enabled());
        assert_eq!(HEAP_BREAK.load(Ordering::Relaxed), 0);
    }
}
