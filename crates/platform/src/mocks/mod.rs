//! Mock implementations for testing
//!
//! [`SimulatedRam`] stands in for the target's RAM and registers;
//! [`MockSink`] captures everything the monitor transmits.

#![cfg(any(test, feature = "std"))]
#![allow(clippy::arithmetic_side_effects)] // test harness code, bounds checked by geometry

use core::ops::Range;

use crate::memory::{Address, MemoryAccess, RamAccess, RamGeometry};
use crate::transport::ByteSink;

/// Byte the simulated stack writes into memory it grows over.
pub const STACK_FILL: u8 = 0x5C;

/// Byte the simulated heap writes into memory it allocates.
pub const HEAP_FILL: u8 = 0x00;

/// In-memory RAM image of `N` bytes with scripted stack and heap boundaries.
///
/// Moving the stack top down overwrites the newly covered bytes with
/// [`STACK_FILL`], the way pushed frames would on hardware. Moving the heap
/// break up overwrites newly allocated bytes with [`HEAP_FILL`]. Moving
/// either boundary back leaves memory untouched, as a real pop or free does.
pub struct SimulatedRam<const N: usize> {
    geometry: RamGeometry,
    bytes: [u8; N],
    stack_top: Address,
    heap_break: Address,
    fills: usize,
}

impl<const N: usize> SimulatedRam<N> {
    /// RAM at `ram_start` with the stack empty (top at `ram_end`) and the
    /// heap empty (break at `heap_start`).
    ///
    /// Returns `None` if `N` is zero, does not fit in the address space, or
    /// does not contain `heap_start`.
    pub fn new(ram_start: Address, heap_start: Address) -> Option<Self> {
        let size = u32::try_from(N).ok()?;
        let geometry = RamGeometry::new(ram_start, size, heap_start).ok()?;
        Some(Self {
            geometry,
            bytes: [0; N],
            stack_top: geometry.ram_end(),
            heap_break: heap_start,
            fills: 0,
        })
    }

    /// Layout this RAM was built with.
    pub fn geometry(&self) -> RamGeometry {
        self.geometry
    }

    /// Move the stack pointer to `addr`, writing frame bytes over
    /// `[addr, old_top)` if the stack grew.
    pub fn set_stack_top(&mut self, addr: Address) {
        if addr < self.stack_top {
            self.write_range(addr..self.stack_top, STACK_FILL);
        }
        self.stack_top = addr;
    }

    /// Move the heap break to `addr`, writing allocation bytes over
    /// `[old_break, addr)` if the heap grew.
    pub fn set_heap_break(&mut self, addr: Address) {
        if addr > self.heap_break {
            self.write_range(self.heap_break..addr, HEAP_FILL);
        }
        self.heap_break = addr;
    }

    /// Write a single byte, e.g. to model a stray store into free memory.
    pub fn poke(&mut self, addr: Address, value: u8) {
        if let Some(slot) = self.slot(addr) {
            *slot = value;
        }
    }

    /// Number of [`RamAccess::fill`] calls observed.
    pub fn fill_count(&self) -> usize {
        self.fills
    }

    /// Count bytes in `range` equal to `value`.
    pub fn count(&self, range: Range<Address>, value: u8) -> usize {
        range
            .filter(|&a| self.read_byte(a) == Some(value))
            .count()
    }

    fn write_range(&mut self, range: Range<Address>, value: u8) {
        for addr in range {
            self.poke(addr, value);
        }
    }

    fn slot(&mut self, addr: Address) -> Option<&mut u8> {
        let offset = self.geometry.offset_of(addr)?;
        self.bytes.get_mut(offset)
    }
}

impl<const N: usize> MemoryAccess for SimulatedRam<N> {
    fn stack_top(&self) -> Address {
        self.stack_top
    }

    fn heap_break(&self) -> Address {
        self.heap_break
    }
}

impl<const N: usize> RamAccess for SimulatedRam<N> {
    fn read_byte(&self, addr: Address) -> Option<u8> {
        let offset = self.geometry.offset_of(addr)?;
        self.bytes.get(offset).copied()
    }

    unsafe fn fill(&mut self, range: Range<Address>, pattern: u8) {
        self.fills = self.fills.saturating_add(1);
        self.write_range(range, pattern);
    }
}

/// Captures transmitted bytes for assertions.
pub struct MockSink {
    bytes: heapless::Vec<u8, 4096>,
    overflowed: bool,
}

impl MockSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self {
            bytes: heapless::Vec::new(),
            overflowed: false,
        }
    }

    /// All bytes written so far.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// `true` if more bytes arrived than the capture buffer holds.
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    /// Discard captured bytes.
    pub fn clear(&mut self) {
        self.bytes.clear();
        self.overflowed = false;
    }
}

impl Default for MockSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteSink for MockSink {
    fn write_byte(&mut self, byte: u8) {
        if self.bytes.push(byte).is_err() {
            self.overflowed = true;
        }
    }
}
