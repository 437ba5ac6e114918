//! Lifetime peak of observed stack usage.

/// Monotonic maximum of stack usage, until [`PeakTracker::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PeakTracker {
    peak: u16,
}

impl PeakTracker {
    /// Start at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { peak: 0 }
    }

    /// Fold in a new observation. Returns `true` if it raised the peak.
    pub fn update(&mut self, usage: u16) -> bool {
        if usage > self.peak {
            self.peak = usage;
            true
        } else {
            false
        }
    }

    /// Highest usage seen since creation or the last reset.
    #[must_use]
    pub const fn get(&self) -> u16 {
        self.peak
    }

    /// Forget the peak.
    pub fn reset(&mut self) {
        self.peak = 0;
    }
}
