//! Cortex-M implementation of the memory access traits.
//!
//! Stack top comes from the MSP register. There is no `sbrk` on bare-metal
//! Rust, so the heap break is published by the application's allocator into
//! an [`AtomicU32`]; a value of `0` means nothing has been allocated yet.
//!
//! `cortex-m-rt` places the stack at the top of the `RAM` region in
//! `memory.x` and `.bss`/`.data` at the bottom, which matches the
//! heap-below-stack layout the monitor assumes. Do not combine with
//! `flip-link`, which inverts that layout.

use core::ops::Range;
use core::sync::atomic::{AtomicU32, Ordering};

use crate::memory::{Address, MemoryAccess, RamAccess, RamGeometry};

/// Live memory access on a Cortex-M core.
pub struct CortexMMemory {
    geometry: RamGeometry,
    heap_break: &'static AtomicU32,
}

impl CortexMMemory {
    /// Create an accessor over `geometry`.
    ///
    /// `heap_break` is written by the allocator (main-loop context only) with
    /// the address just past its highest allocation.
    pub const fn new(geometry: RamGeometry, heap_break: &'static AtomicU32) -> Self {
        Self {
            geometry,
            heap_break,
        }
    }

    /// Geometry this accessor is bounded by.
    pub const fn geometry(&self) -> RamGeometry {
        self.geometry
    }
}

impl MemoryAccess for CortexMMemory {
    fn stack_top(&self) -> Address {
        cortex_m::register::msp::read()
    }

    fn heap_break(&self) -> Address {
        match self.heap_break.load(Ordering::Relaxed) {
            0 => self.geometry.heap_start(),
            brk => brk,
        }
    }
}

impl RamAccess for CortexMMemory {
    fn read_byte(&self, addr: Address) -> Option<u8> {
        if !self.geometry.contains(addr) {
            return None;
        }
        // SAFETY: `addr` lies inside the RAM window described by the linker
        // map, so it is mapped, readable, and byte-aligned by definition.
        Some(unsafe { core::ptr::read_volatile(addr as *const u8) })
    }

    unsafe fn fill(&mut self, range: Range<Address>, pattern: u8) {
        for addr in range {
            if self.geometry.contains(addr) {
                // SAFETY: inside RAM, and the caller guarantees no live
                // heap or stack data occupies `range`.
                unsafe { core::ptr::write_volatile(addr as *mut u8, pattern) };
            }
        }
    }
}

/// Heap start as placed by `cortex-m-rt` (`__sheap`, end of `.bss`/`.uninit`).
pub fn linker_heap_start() -> Address {
    extern "C" {
        static mut __sheap: u32;
    }
    // SAFETY: only the address of the linker symbol is taken, never its value.
    unsafe { core::ptr::addr_of!(__sheap) as Address }
}
