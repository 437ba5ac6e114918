//! ramscope - runtime stack/heap monitor for small bare-metal targets
//!
//! Tracks how close a running program is to exhausting RAM on a single-core
//! microcontroller without an OS or MPU. The heap grows up from a fixed
//! start, the stack grows down from the top of RAM, and the monitor reports
//! how much room is left between them.
//!
//! # How it works
//!
//! ```text
//! check() ──► handshake latch ──disabled──► return (no side effects)
//!                 │enabled
//!                 ▼
//!          rate limiter ──not this call──► return
//!                 │every Nth call
//!                 ▼
//!   scan paint → peak tracker → policy flags → 10-byte frame → ByteSink
//! ```
//!
//! - [`watermark`] paints the free gap with a sentinel and later finds the
//!   deepest byte the stack overwrote.
//! - [`peak`] keeps the lifetime maximum.
//! - [`policy`] raises `Alert`, `Collision`, `PeakNew`, `HeapActive`.
//! - [`handshake`] arms telemetry on the inbound byte `0xA5`.
//! - [`rate`] passes one call in every `rate_limit`.
//! - [`frame`] encodes (and, for host tooling, decodes) the wire format.
//!
//! All hardware contact goes through the [`platform`] traits, so everything
//! here runs unchanged against `platform::mocks::SimulatedRam` in tests.
//!
//! # Features
//!
//! - `monitor` (default): the live [`Monitor`]. Without it, [`Monitor`] is a
//!   zero-cost stand-in whose methods do nothing.
//! - `defmt`: log paint outcomes and derive `defmt::Format`.

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]

pub mod config;
pub mod flags;
pub mod frame;
pub mod handshake;
pub mod peak;
pub mod policy;
pub mod rate;
pub mod watermark;

#[cfg(feature = "monitor")]
mod monitor;
#[cfg(not(feature = "monitor"))]
mod noop;

pub use config::{ConfigError, MonitorConfig, RateLimit};
pub use flags::{Flag, Flags};
pub use frame::{FrameDecoder, FrameError, TelemetryFrame, FRAME_HEADER, FRAME_LEN};
pub use handshake::{is_handshake_byte, HandshakeLatch, HANDSHAKE_BYTE};
#[cfg(feature = "monitor")]
pub use monitor::Monitor;
#[cfg(not(feature = "monitor"))]
pub use noop::Monitor;
pub use policy::Sample;

pub use platform;

/// Narrow a byte count to the 16-bit wire width, saturating.
pub(crate) fn saturate_u16(value: u32) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}
