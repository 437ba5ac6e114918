//! Property-based tests for RAM geometry.
//! Verifies invariants hold for ALL valid layouts, not just the ATmega328P.
#![allow(clippy::arithmetic_side_effects, clippy::expect_used)]

use platform::{GeometryError, RamGeometry};
use proptest::prelude::*;

proptest! {
    /// Every accepted geometry has ram_end as its last contained byte.
    #[test]
    fn ram_end_is_last_contained_byte(
        start in 0u32..0x1000_0000,
        size in 1u32..0x0010_0000,
        heap_off in 0u32..0x0010_0000,
    ) {
        let heap = start + (heap_off % size);
        let g = RamGeometry::new(start, size, heap).expect("valid layout");
        prop_assert_eq!(g.ram_end(), start + size - 1);
        prop_assert!(g.contains(g.ram_end()));
        prop_assert!(!g.contains(g.ram_end() + 1));
        prop_assert!(g.contains(g.heap_start()));
        prop_assert_eq!(g.offset_of(g.ram_end()), usize::try_from(size - 1).ok());
    }

    /// A window that runs past the top of the address space is rejected,
    /// never wrapped.
    #[test]
    fn overflowing_window_is_rejected(
        start in (u32::MAX - 0xFF)..=u32::MAX,
        size in 0x100u32..=u32::MAX,
    ) {
        prop_assert_eq!(
            RamGeometry::new(start, size, start),
            Err(GeometryError::AddressOverflow)
        );
    }

    /// Heap starts outside the window are rejected with the offending address.
    #[test]
    fn heap_outside_window_is_rejected(start in 0x100u32..0x1000, size in 1u32..0x1000) {
        let below = start - 1;
        let above = start + size;
        prop_assert_eq!(
            RamGeometry::new(start, size, below),
            Err(GeometryError::HeapOutsideRam(below))
        );
        prop_assert_eq!(
            RamGeometry::new(start, size, above),
            Err(GeometryError::HeapOutsideRam(above))
        );
    }
}
