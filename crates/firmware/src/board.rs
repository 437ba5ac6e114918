//! Board constants for the STM32H743ZI (NUCLEO-H743ZI) demo image.
//!
//! These mirror `memory.x`: the whole 512 KB AXI SRAM is one `RAM` region,
//! `.data`/`.bss` at the bottom, heap from `__sheap`, stack at the top.

use platform::{Address, GeometryError, RamGeometry};
use ramscope::{MonitorConfig, RateLimit};

/// AXI SRAM base (`RAM` origin in `memory.x`).
pub const RAM_START: Address = 0x2400_0000;

/// AXI SRAM size (`RAM` length in `memory.x`).
pub const RAM_SIZE: u32 = 0x0008_0000;

/// Telemetry UART baud rate (USART3, routed to the ST-LINK VCP on Nucleo).
pub const TELEMETRY_BAUD: u32 = 115_200;

/// IWDG timeout in microseconds.
pub const WATCHDOG_TIMEOUT_US: u32 = 8_000_000;

/// Main-loop period in milliseconds.
pub const LOOP_PERIOD_MS: u64 = 1;

/// One frame every 1024 loop iterations, about once a second.
///
/// Each sampled call scans the painted gap upward until it meets the
/// deepest stack write. While the stack stays shallow that is close to the
/// whole gap: up to `RAM_SIZE` volatile byte reads (about 500K here, a few
/// milliseconds at 480 MHz). Calls between samples cost one counter
/// increment, so lowering this period raises the scan share linearly.
pub const SAMPLE_PERIOD: u16 = 1024;

/// Alert once less than 4 KB separates stack and heap.
pub const ALERT_THRESHOLD: u16 = 4096;

/// Leave 256 bytes between the paint window and the live stack; the
/// embassy executor's poll frames are deeper than on an 8-bit target.
pub const SAFETY_MARGIN: u16 = 256;

/// Monitor configuration baked into the image.
pub const MONITOR_CONFIG: MonitorConfig = {
    let base = match RateLimit::new(SAMPLE_PERIOD) {
        Ok(rate) => MonitorConfig::DEFAULT.with_rate_limit(rate),
        Err(_) => MonitorConfig::DEFAULT,
    }
    .with_alert_threshold(ALERT_THRESHOLD);
    match base.with_safety_margin(SAFETY_MARGIN) {
        Ok(config) => config,
        Err(_) => base,
    }
};

/// RAM geometry for a heap starting at `heap_start` (the `__sheap` symbol).
pub const fn geometry(heap_start: Address) -> Result<RamGeometry, GeometryError> {
    RamGeometry::new(RAM_START, RAM_SIZE, heap_start)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    #[test]
    fn board_config_uses_board_values() {
        let config = MONITOR_CONFIG;
        assert_eq!(config.rate_limit().get(), SAMPLE_PERIOD);
        assert_eq!(config.alert_threshold(), ALERT_THRESHOLD);
        assert_eq!(config.safety_margin(), SAFETY_MARGIN);
    }

    #[test]
    fn geometry_spans_axi_sram() {
        let g = geometry(RAM_START + 0x4000).expect("heap inside RAM");
        assert_eq!(g.ram_end(), 0x2407_FFFF);
        assert_eq!(g.heap_start(), 0x2400_4000);
    }

    #[test]
    fn geometry_rejects_heap_outside_axi_sram() {
        assert_eq!(
            geometry(0x2000_0000),
            Err(GeometryError::HeapOutsideRam(0x2000_0000))
        );
    }

    #[test]
    fn full_gap_scan_runs_at_most_four_times_a_second() {
        assert!(u64::from(SAMPLE_PERIOD) * LOOP_PERIOD_MS >= 250);
    }

    #[test]
    fn memory_x_matches_board_constants() {
        let memory_x = include_str!("../../../memory.x");
        assert!(memory_x.contains("ORIGIN = 0x24000000"));
        assert!(memory_x.contains("LENGTH = 512K"));
    }
}
