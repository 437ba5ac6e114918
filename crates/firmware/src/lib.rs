//! ramscope demo firmware
//!
//! Runs the memory monitor on an STM32H743ZI and streams telemetry frames
//! over USART3 (the ST-LINK virtual COM port on NUCLEO-H743ZI).
//!
//! # Architecture
//!
//! ```text
//! main.rs (embassy main loop: monitor.check() every tick)
//!         ↓                         ↑ LATCH
//! ramscope::Monitor          telemetry::handshake_rx (USART3 RX task)
//!         ↓
//! platform::cortex_m::CortexMMemory + platform::IoSink<UartTx>
//! ```
//!
//! # Features
//!
//! - `hardware` - Build for STM32H7 target (embassy, defmt, probe-rs)
//! - `monitor` (default) - Live monitor; disable to compile it out
//! - `std` - Enable standard library (host tests)
//!
//! ## Hardware Target
//!
//! ```bash
//! cargo build --release --target thumbv7em-none-eabihf --features hardware
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::print_stdout)] // prefer defmt over println! in lib code
#![warn(clippy::dbg_macro)]
// Intentional allows for this codebase:
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]

pub mod board;
pub mod exception_handlers;
pub mod telemetry;

pub use board::{geometry, MONITOR_CONFIG};
pub use exception_handlers::{fault_kind, FaultKind};
pub use telemetry::{HEAP_BREAK, LATCH};
