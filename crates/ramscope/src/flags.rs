//! Per-sample condition flags.
//!
//! Bit positions are part of the wire format and must not change:
//!
//! | Bit | Flag         |
//! |-----|--------------|
//! | 0   | `Alert`      |
//! | 1   | `Collision`  |
//! | 2   | `PeakNew`    |
//! | 3   | `HeapActive` |

/// A single condition reported in a telemetry frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Flag {
    /// Free memory fell below the alert threshold.
    Alert = 0,
    /// Stack top is within the collision margin of the heap break.
    Collision = 1,
    /// This sample raised the tracked peak.
    PeakNew = 2,
    /// The heap holds at least one byte.
    HeapActive = 3,
}

impl Flag {
    /// Every flag, in bit order.
    pub const ALL: [Flag; 4] = [Flag::Alert, Flag::Collision, Flag::PeakNew, Flag::HeapActive];

    /// Single-bit mask for this flag.
    #[must_use]
    pub const fn bit(self) -> u8 {
        1_u8.wrapping_shl(self as u32)
    }

    /// Short label for display.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Flag::Alert => "ALERT",
            Flag::Collision => "COLLISION",
            Flag::PeakNew => "PEAK",
            Flag::HeapActive => "HEAP",
        }
    }
}

/// Set of [`Flag`]s, stored as the wire byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct Flags(u8);

impl Flags {
    /// No flags set.
    pub const EMPTY: Self = Self(0);

    /// Bits that correspond to a known flag.
    pub const KNOWN_BITS: u8 = 0b1111;

    /// Rebuild a set from its wire byte, or `None` if unknown bits are set.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        if bits & !Self::KNOWN_BITS == 0 {
            Some(Self(bits))
        } else {
            None
        }
    }

    /// The wire byte.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// `true` if `flag` is in the set.
    #[must_use]
    pub const fn contains(self, flag: Flag) -> bool {
        self.0 & flag.bit() != 0
    }

    /// `true` if no flag is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Add `flag`.
    pub fn insert(&mut self, flag: Flag) {
        self.0 |= flag.bit();
    }

    /// Add `flag` if `condition` holds, remove it otherwise.
    pub fn set(&mut self, flag: Flag, condition: bool) {
        if condition {
            self.insert(flag);
        } else {
            self.0 &= !flag.bit();
        }
    }

    /// The set with `flag` added.
    #[must_use]
    pub const fn with(self, flag: Flag) -> Self {
        Self(self.0 | flag.bit())
    }

    /// Iterate over the flags present, in bit order.
    pub fn iter(self) -> impl Iterator<Item = Flag> {
        Flag::ALL.into_iter().filter(move |&f| self.contains(f))
    }
}

impl FromIterator<Flag> for Flags {
    fn from_iter<I: IntoIterator<Item = Flag>>(iter: I) -> Self {
        let mut flags = Flags::EMPTY;
        for f in iter {
            flags.insert(f);
        }
        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_positions_match_wire_layout() {
        assert_eq!(Flag::Alert.bit(), 0x01);
        assert_eq!(Flag::Collision.bit(), 0x02);
        assert_eq!(Flag::PeakNew.bit(), 0x04);
        assert_eq!(Flag::HeapActive.bit(), 0x08);
    }

    #[test]
    fn flags_are_independent() {
        let all: Flags = Flag::ALL.into_iter().collect();
        assert_eq!(all.bits(), 0x0F);
        for f in Flag::ALL {
            assert!(all.contains(f));
        }
    }

    #[test]
    fn set_clears_when_condition_false() {
        let mut f = Flags::EMPTY.with(Flag::Alert).with(Flag::HeapActive);
        f.set(Flag::Alert, false);
        assert_eq!(f.bits(), 0x08);
        f.set(Flag::Collision, true);
        assert_eq!(f.bits(), 0x0A);
    }

    #[test]
    fn from_bits_rejects_unknown_bits() {
        assert_eq!(Flags::from_bits(0x05).map(Flags::bits), Some(0x05));
        assert_eq!(Flags::from_bits(0x10), None);
    }

    #[test]
    fn iter_yields_in_bit_order() {
        let f = Flags::EMPTY.with(Flag::HeapActive).with(Flag::Alert);
        let mut it = f.iter();
        assert_eq!(it.next(), Some(Flag::Alert));
        assert_eq!(it.next(), Some(Flag::HeapActive));
        assert_eq!(it.next(), None);
    }
}
