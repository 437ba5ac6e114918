//! RAM geometry and raw memory access capabilities.
//!
//! The monitor sees RAM as one contiguous window shared by two regions:
//!
//! ```text
//! ram_start   heap_start        heap_break            stack_top        ram_end
//!     │  .data/.bss │ heap ──────► │    unused (paint)   │ ◄────── stack │
//!     └─────────────┴──────────────┴─────────────────────┴───────────────┘
//! ```
//!
//! Two traits split the hardware contact surface:
//!
//! - [`MemoryAccess`] reads the two live boundaries (stack top, heap break).
//! - [`RamAccess`] reads and fills individual bytes inside the window.
//!
//! Every other component depends only on these traits, so tests can drive
//! the monitor with `mocks::SimulatedRam` (feature `std`) instead of real
//! registers.

use core::ops::Range;

/// A byte address in the target's data address space.
pub type Address = u32;

/// Error returned when a [`RamGeometry`] does not describe a usable window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror_no_std::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GeometryError {
    /// `ram_size` was zero.
    #[error("RAM size must be non-zero")]
    EmptyRam,
    /// `ram_start + ram_size` does not fit in the address space.
    #[error("RAM window overflows the address space")]
    AddressOverflow,
    /// `heap_start` lies outside `[ram_start, ram_end]`.
    #[error("heap start {0:#x} lies outside RAM")]
    HeapOutsideRam(Address),
}

/// Fixed RAM layout of one hardware target.
///
/// Must match the target's linker map. `heap_start` is the address the heap
/// break reports before the first allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RamGeometry {
    ram_start: Address,
    ram_size: u32,
    heap_start: Address,
}

impl RamGeometry {
    /// ATmega328P: 2 KB SRAM at `0x0100`, heap directly above `.bss`.
    ///
    /// `heap_start` here assumes 256 bytes of static data; real builds take
    /// it from the `__heap_start` linker symbol.
    pub const ATMEGA328P: Self = Self {
        ram_start: 0x0100,
        ram_size: 2048,
        heap_start: 0x0200,
    };

    /// Build a geometry, validating that the window is non-empty, fits in
    /// the address space, and contains `heap_start`.
    ///
    /// # Errors
    ///
    /// See [`GeometryError`].
    pub const fn new(
        ram_start: Address,
        ram_size: u32,
        heap_start: Address,
    ) -> Result<Self, GeometryError> {
        if ram_size == 0 {
            return Err(GeometryError::EmptyRam);
        }
        let Some(end_exclusive) = ram_start.checked_add(ram_size) else {
            return Err(GeometryError::AddressOverflow);
        };
        if heap_start < ram_start || heap_start >= end_exclusive {
            return Err(GeometryError::HeapOutsideRam(heap_start));
        }
        Ok(Self {
            ram_start,
            ram_size,
            heap_start,
        })
    }

    /// First RAM address.
    pub const fn ram_start(&self) -> Address {
        self.ram_start
    }

    /// RAM size in bytes.
    pub const fn ram_size(&self) -> u32 {
        self.ram_size
    }

    /// Address of the last RAM byte; the stack ceiling.
    #[allow(clippy::arithmetic_side_effects)] // validated in new(): size > 0, no overflow
    pub const fn ram_end(&self) -> Address {
        self.ram_start + (self.ram_size - 1)
    }

    /// Address reported as heap break while the heap is empty.
    pub const fn heap_start(&self) -> Address {
        self.heap_start
    }

    /// `true` if `addr` lies inside `[ram_start, ram_end]`.
    pub const fn contains(&self, addr: Address) -> bool {
        addr >= self.ram_start && addr <= self.ram_end()
    }

    /// Offset of `addr` from `ram_start`, if it lies inside RAM.
    pub fn offset_of(&self, addr: Address) -> Option<usize> {
        if self.contains(addr) {
            usize::try_from(addr.wrapping_sub(self.ram_start)).ok()
        } else {
            None
        }
    }
}

/// Live boundary reads. The only operations that touch architecture state.
///
/// Both are side-effect free and cannot fail.
pub trait MemoryAccess {
    /// Current stack pointer.
    fn stack_top(&self) -> Address;

    /// Address one past the last heap allocation, or the geometry's
    /// `heap_start` if nothing has ever been allocated.
    fn heap_break(&self) -> Address;
}

/// Byte-level access to the RAM window, used for sentinel painting.
pub trait RamAccess {
    /// Read the byte at `addr`, or `None` if `addr` is outside RAM.
    fn read_byte(&self, addr: Address) -> Option<u8>;

    /// Write `pattern` to every address in `range`.
    ///
    /// Addresses outside RAM are skipped.
    ///
    /// # Safety
    ///
    /// No live data may reside in `range`: it must lie above the heap break
    /// and below the live stack frames for the whole duration of the call.
    unsafe fn fill(&mut self, range: Range<Address>, pattern: u8);
}
