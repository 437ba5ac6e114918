//! Platform access layer for the ramscope memory monitor
//!
//! This crate isolates every piece of architecture-specific state the monitor
//! needs behind small traits, so the monitor core can be exercised on a host
//! against simulated RAM.
//!
//! # Architecture Layers
//!
//! ```text
//! Application (firmware crate: main loop, UART RX interrupt)
//!         ↓
//! Monitor core (ramscope crate)
//!         ↓
//! Platform access (this crate - traits)
//!         ↓
//! Hardware (MSP register, RAM window, UART)
//! ```
//!
//! # Capabilities
//!
//! - [`MemoryAccess`] - live stack top and heap break
//! - [`RamAccess`] - byte reads and sentinel fills inside the RAM window
//! - [`ByteSink`] - blocking telemetry output
//!
//! # Features
//!
//! - `hardware`: Cortex-M implementation ([`cortex_m::CortexMMemory`])
//! - `defmt`: Enable defmt logging and `defmt::Format` derives
//! - `std`: Host mocks (`mocks::SimulatedRam`, `mocks::MockSink`) for tests
//!
//! # Example
//!
//! ```
//! use platform::{MemoryAccess, RamGeometry};
//!
//! fn free_bytes<M: MemoryAccess>(mem: &M) -> u32 {
//!     mem.stack_top().saturating_sub(mem.heap_break())
//! }
//!
//! assert_eq!(RamGeometry::ATMEGA328P.ram_end(), 0x08FF);
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // prefer defmt over println! in lib code
// Pedantic lints suppressed for this hardware access crate:
#![allow(clippy::doc_markdown)] // hex addresses and register names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors: callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

#[cfg(feature = "hardware")]
pub mod cortex_m;
pub mod memory;
pub mod mocks;
pub mod transport;

pub use memory::{Address, GeometryError, MemoryAccess, RamAccess, RamGeometry};
pub use transport::{ByteSink, IoSink};
