//! Sampling rate limiter.

use crate::config::RateLimit;

/// Passes one call in every `rate` calls.
///
/// The counter is 16 bits and wraps; because `rate` divides 65536 the
/// sampling cadence is unaffected by the wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimiter {
    counter: u16,
    mask: u16,
}

impl RateLimiter {
    /// Counter at zero; the first sample happens on call number `rate`.
    #[must_use]
    pub const fn new(rate: RateLimit) -> Self {
        Self {
            counter: 0,
            mask: rate.mask(),
        }
    }

    /// Count one call. Returns `true` if this call should sample.
    pub fn tick(&mut self) -> bool {
        self.counter = self.counter.wrapping_add(1);
        self.counter & self.mask == 0
    }

    /// Calls counted so far, modulo 65536.
    #[must_use]
    pub const fn counter(&self) -> u16 {
        self.counter
    }
}
