//! Cortex-M exception handlers for the ramscope demo image.
//!
//! The memory monitor only samples every few hundred loop iterations, so a
//! stack that runs into the heap between two samples ends in a HardFault
//! rather than a `Collision` frame. The handler below classifies the fault
//! by where the exception frame was stacked, which is the last stack pointer
//! the core saw.
//!
//! # Hardware-only handler
//!
//! The `#[cortex_m_rt::exception]` attribute requires ARM target intrinsics and
//! is therefore gated behind `#[cfg(feature = "hardware")]`. The module itself
//! (and [`fault_kind`]) compiles unconditionally so host tests can exercise
//! the classification without an ARM toolchain.

#![allow(clippy::doc_markdown)] // HardFault, MSP used as plain text

use platform::{Address, RamGeometry};

/// Marker constant, confirmed by arch tests to verify this module exists.
pub const HARDFAULT_DEFINED: bool = true;

/// Likely cause of a fault, judged from the stacked frame address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaultKind {
    /// The frame was stacked at or below the heap break plus the collision
    /// margin: the stack grew into the heap.
    StackHeapCollision,
    /// The frame was stacked outside RAM: the stack ran off the bottom.
    StackOutsideRam,
    /// Stack pointer looked healthy; the fault has another cause.
    Other,
}

/// Classify a fault whose exception frame was stacked at `frame`.
pub fn fault_kind(
    frame: Address,
    heap_break: Address,
    geometry: &RamGeometry,
    collision_margin: u16,
) -> FaultKind {
    if !geometry.contains(frame) {
        FaultKind::StackOutsideRam
    } else if frame <= heap_break.saturating_add(u32::from(collision_margin)) {
        FaultKind::StackHeapCollision
    } else {
        FaultKind::Other
    }
}

/// HardFault exception handler (hardware target only).
///
/// Logs the stacked frame address and the classification from
/// [`fault_kind`], then halts. Returning from a HardFault handler is
/// undefined behavior on Cortex-M; the `-> !` return type enforces this.
#[cfg(feature = "hardware")]
#[cortex_m_rt::exception]
#[allow(unsafe_code)]
unsafe fn HardFault(ef: &cortex_m_rt::ExceptionFrame) -> ! {
    use core::sync::atomic::Ordering;

    let frame = ef as *const _ as Address;
    let heap_start = platform::cortex_m::linker_heap_start();
    let heap_break = match crate::telemetry::HEAP_BREAK.load(Ordering::Relaxed) {
        0 => heap_start,
        brk => brk,
    };
    let kind = match crate::board::geometry(heap_start) {
        Ok(geometry) => fault_kind(
            frame,
            heap_break,
            &geometry,
            crate::board::MONITOR_CONFIG.collision_margin(),
        ),
        Err(_) => FaultKind::Other,
    };
    defmt::panic!(
        "HardFault ({}): exception frame at {=u32:#010x}, heap break {=u32:#010x}",
        kind,
        frame,
        heap_break
    );
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    fn geometry() -> RamGeometry {
        RamGeometry::new(0x2400_0000, 0x0008_0000, 0x2400_4000).expect("valid geometry")
    }

    #[test]
    fn frame_inside_heap_is_collision() {
        assert_eq!(
            fault_kind(0x2400_3000, 0x2400_4000, &geometry(), 16),
            FaultKind::StackHeapCollision
        );
    }

    #[test]
    fn frame_within_margin_of_break_is_collision() {
        assert_eq!(
            fault_kind(0x2400_4010, 0x2400_4000, &geometry(), 16),
            FaultKind::StackHeapCollision
        );
        assert_eq!(
            fault_kind(0x2400_4011, 0x2400_4000, &geometry(), 16),
            FaultKind::Other
        );
    }

    #[test]
    fn frame_below_ram_is_reported_separately() {
        assert_eq!(
            fault_kind(0x23FF_FFE0, 0x2400_4000, &geometry(), 16),
            FaultKind::StackOutsideRam
        );
    }

    #[test]
    fn healthy_stack_is_other() {
        assert_eq!(
            fault_kind(0x2407_FF00, 0x2400_4000, &geometry(), 16),
            FaultKind::Other
        );
    }
}
