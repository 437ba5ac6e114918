//! Compiled-out monitor.
//!
//! Built when the `monitor` feature is disabled. Same call-site API as the
//! live monitor, but every method is an empty inline function, so firmware
//! can keep its `check()` calls unconditionally.

use core::marker::PhantomData;

use platform::{Address, RamGeometry};

use crate::config::MonitorConfig;
use crate::frame::TelemetryFrame;
use crate::handshake::HandshakeLatch;

/// No-op stand-in for the live monitor.
pub struct Monitor<'a, M, S> {
    _parts: PhantomData<(M, S, &'a HandshakeLatch)>,
}

impl<'a, M, S> Monitor<'a, M, S> {
    /// Discards its arguments; nothing is painted.
    #[inline(always)]
    pub fn new(
        _mem: M,
        _sink: S,
        _geometry: RamGeometry,
        _config: MonitorConfig,
        _latch: &'a HandshakeLatch,
    ) -> Self {
        Self {
            _parts: PhantomData,
        }
    }

    /// Always `None`.
    #[inline(always)]
    pub fn check(&mut self) -> Option<TelemetryFrame> {
        None
    }

    /// Does nothing.
    #[inline(always)]
    pub fn trigger_handshake(&mut self) {}

    /// Always `false`.
    #[inline(always)]
    pub fn is_enabled(&self) -> bool {
        false
    }

    /// Always `0`.
    #[inline(always)]
    pub fn peak(&self) -> u16 {
        0
    }

    /// Does nothing.
    #[inline(always)]
    pub fn reset_peak(&mut self) {}

    /// Always `0`.
    #[inline(always)]
    pub fn sample_counter(&self) -> u16 {
        0
    }

    /// Always `None`.
    #[inline(always)]
    pub fn painted_boundary(&self) -> Option<Address> {
        None
    }
}
