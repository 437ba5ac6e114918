//! Handshake: the one-way switch that arms telemetry.
//!
//! Telemetry stays off until the host sends [`HANDSHAKE_BYTE`]. The receive
//! path usually runs in an interrupt, so the latch is a pair of single-byte
//! atomic flags that can live in a `static` and be shared by reference:
//!
//! ```
//! use ramscope::handshake::HandshakeLatch;
//!
//! static LATCH: HandshakeLatch = HandshakeLatch::new();
//!
//! // UART RX interrupt:
//! fn on_rx(byte: u8) {
//!     LATCH.feed(byte);
//! }
//!
//! on_rx(0x00);
//! assert!(!LATCH.is_enabled());
//! on_rx(0xA5);
//! assert_eq!(LATCH.is_enabled(), ramscope::is_handshake_byte(0xA5));
//! ```
//!
//! Interrupt context only ever stores `true`. The main loop owns every
//! multi-byte field and performs the repaint itself the next time it runs
//! `check()`, so no torn write can be observed.
//!
//! Without the `monitor` feature no byte is recognised, so `feed` never
//! arms the latch and receive paths stay silent.

use core::sync::atomic::{AtomicBool, Ordering};

/// Inbound byte that enables telemetry.
pub const HANDSHAKE_BYTE: u8 = 0xA5;

/// `true` if `byte` is the handshake signal. Always `false` when the
/// monitor is compiled out.
#[must_use]
pub const fn is_handshake_byte(byte: u8) -> bool {
    cfg!(feature = "monitor") && byte == HANDSHAKE_BYTE
}

/// Enable flag plus a pending-repaint request.
///
/// Only plain loads and stores are used, so the latch works on cores
/// without atomic read-modify-write (AVR, Cortex-M0).
#[derive(Debug, Default)]
pub struct HandshakeLatch {
    enabled: AtomicBool,
    repaint: AtomicBool,
}

impl HandshakeLatch {
    /// Disabled, no repaint pending.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            enabled: AtomicBool::new(false),
            repaint: AtomicBool::new(false),
        }
    }

    /// Enable telemetry and request a repaint. Safe to call from an
    /// interrupt handler and idempotent.
    pub fn trigger(&self) {
        self.repaint.store(true, Ordering::Release);
        self.enabled.store(true, Ordering::Release);
    }

    /// Trigger if `byte` is the handshake byte. Returns whether it was.
    pub fn feed(&self, byte: u8) -> bool {
        let hit = is_handshake_byte(byte);
        if hit {
            self.trigger();
        }
        hit
    }

    /// `true` once any handshake has been received.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Consume a pending repaint request. Main-loop context only.
    ///
    /// A trigger that lands between the load and the clearing store is
    /// merged into the repaint the caller is about to perform.
    pub fn take_repaint(&self) -> bool {
        if self.repaint.load(Ordering::Acquire) {
            self.repaint.store(false, Ordering::Release);
            true
        } else {
            false
        }
    }
}
