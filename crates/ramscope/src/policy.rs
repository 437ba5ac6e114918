//! Threshold policy: turns one measurement into a [`Flags`] set.

use platform::Address;

use crate::config::MonitorConfig;
use crate::flags::{Flag, Flags};
use crate::saturate_u16;

/// One measurement of both regions, taken on a sampling call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    /// Live stack pointer.
    pub stack_top: Address,
    /// Live heap break.
    pub heap_break: Address,
    /// High-water stack usage in bytes.
    pub stack_usage: u16,
    /// Bytes between heap start and heap break.
    pub heap_usage: u16,
}

impl Sample {
    /// Bytes between heap break and stack top, zero if they overlap.
    ///
    /// The paint safety margin is not subtracted.
    #[must_use]
    pub fn free_memory(&self) -> u16 {
        saturate_u16(self.stack_top.saturating_sub(self.heap_break))
    }

    /// `stack_top <= heap_break + collision_margin`.
    #[must_use]
    pub fn is_colliding(&self, collision_margin: u16) -> bool {
        self.stack_top <= self.heap_break.saturating_add(u32::from(collision_margin))
    }
}

/// Compute the flags for `sample`. `peak_new` comes from the peak tracker.
#[must_use]
pub fn evaluate(sample: &Sample, config: &MonitorConfig, peak_new: bool) -> Flags {
    let mut flags = Flags::EMPTY;
    flags.set(Flag::Alert, sample.free_memory() < config.alert_threshold());
    flags.set(Flag::Collision, sample.is_colliding(config.collision_margin()));
    flags.set(Flag::PeakNew, peak_new);
    flags.set(Flag::HeapActive, sample.heap_usage > 0);
    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(stack_top: Address, heap_break: Address, heap_usage: u16) -> Sample {
        Sample {
            stack_top,
            heap_break,
            stack_usage: 0,
            heap_usage,
        }
    }

    #[test]
    fn roomy_layout_raises_nothing() {
        let f = evaluate(&sample(0x0800, 0x0300, 0), &MonitorConfig::DEFAULT, false);
        assert!(f.is_empty());
    }

    #[test]
    fn alert_is_strictly_below_threshold() {
        let c = MonitorConfig::DEFAULT;
        assert!(!evaluate(&sample(0x0300 + 50, 0x0300, 0), &c, false).contains(Flag::Alert));
        assert!(evaluate(&sample(0x0300 + 49, 0x0300, 0), &c, false).contains(Flag::Alert));
    }

    #[test]
    fn collision_includes_the_margin_boundary() {
        let c = MonitorConfig::DEFAULT;
        assert!(evaluate(&sample(0x0310, 0x0300, 0), &c, false).contains(Flag::Collision));
        assert!(!evaluate(&sample(0x0311, 0x0300, 0), &c, false).contains(Flag::Collision));
    }

    #[test]
    fn overlap_reports_zero_free_memory() {
        let s = sample(0x0200, 0x0300, 0);
        assert_eq!(s.free_memory(), 0);
        let f = evaluate(&s, &MonitorConfig::DEFAULT, false);
        assert!(f.contains(Flag::Alert));
        assert!(f.contains(Flag::Collision));
    }

    #[test]
    fn all_four_can_be_set_together() {
        let f = evaluate(&sample(0x0305, 0x0300, 0x100), &MonitorConfig::DEFAULT, true);
        assert_eq!(f.bits(), 0x0F);
    }

    #[test]
    fn heap_active_follows_heap_usage() {
        let c = MonitorConfig::DEFAULT;
        assert!(!evaluate(&sample(0x0800, 0x0300, 0), &c, false).contains(Flag::HeapActive));
        assert!(evaluate(&sample(0x0800, 0x0300, 1), &c, false).contains(Flag::HeapActive));
    }

    #[test]
    fn free_memory_saturates_on_large_rams() {
        let s = sample(0x2002_0000, 0x2000_0000, 0);
        assert_eq!(s.free_memory(), u16::MAX);
    }
}
