//! ramscope demo firmware - Main Entry Point
//!
//! Hardware-only entry point for STM32H743ZI.

#![no_std]
#![no_main]

use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_stm32::{bind_interrupts, peripherals, usart};
use embassy_time::{Duration, Timer};
use platform::cortex_m::{linker_heap_start, CortexMMemory};
use ramscope::{Flag, Monitor};

use firmware::board::{LOOP_PERIOD_MS, TELEMETRY_BAUD, WATCHDOG_TIMEOUT_US};
use firmware::telemetry::{handshake_rx, TelemetrySink};
use firmware::{HEAP_BREAK, LATCH, MONITOR_CONFIG};

// Panic handler
use panic_probe as _;

bind_interrupts!(struct Irqs {
    USART3 => usart::InterruptHandler<peripherals::USART3>;
});

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    defmt::info!("ramscope demo v{=str}", env!("CARGO_PKG_VERSION"));
    let p = embassy_stm32::init(embassy_stm32::Config::default());

    let mut watchdog = embassy_stm32::wdg::IndependentWatchdog::new(p.IWDG1, WATCHDOG_TIMEOUT_US);
    watchdog.unleash();

    let geometry = match firmware::geometry(linker_heap_start()) {
        Ok(geometry) => geometry,
        Err(e) => {
            defmt::error!("RAM geometry rejected: {}", e);
            halt().await
        }
    };
    defmt::info!(
        "RAM {=u32:#010x}..={=u32:#010x}, heap from {=u32:#010x}",
        geometry.ram_start(),
        geometry.ram_end(),
        geometry.heap_start()
    );

    // USART3: PD9 RX, PD8 TX (ST-LINK VCP)
    let mut uart_config = usart::Config::default();
    uart_config.baudrate = TELEMETRY_BAUD;
    let uart = match usart::Uart::new(
        p.USART3,
        p.PD9,
        p.PD8,
        Irqs,
        p.DMA1_CH0,
        p.DMA1_CH1,
        uart_config,
    ) {
        Ok(uart) => uart,
        Err(_) => {
            defmt::error!("USART3 configuration rejected");
            halt().await
        }
    };
    let (tx, rx) = uart.split();

    if spawner.spawn(handshake_rx(rx)).is_err() {
        defmt::error!("failed to spawn handshake receiver");
    }

    let mem = CortexMMemory::new(geometry, &HEAP_BREAK);
    let mut monitor = Monitor::new(mem, TelemetrySink::new(tx), geometry, MONITOR_CONFIG, &LATCH);
    defmt::info!(
        "stack painted down to {}; waiting for handshake 0xA5",
        monitor.painted_boundary()
    );

    loop {
        Timer::after(Duration::from_millis(LOOP_PERIOD_MS)).await;
        if let Some(frame) = monitor.check() {
            if frame.flags.contains(Flag::Collision) {
                defmt::error!("stack within collision margin of heap: free={=u16}", frame.free_memory);
            } else if frame.flags.contains(Flag::Alert) {
                defmt::warn!("low memory: free={=u16}", frame.free_memory);
            }
            defmt::debug!(
                "stack={=u16} peak={=u16} heap={=u16} free={=u16}",
                frame.stack_usage,
                frame.peak_usage,
                frame.heap_usage,
                frame.free_memory
            );
        }
        watchdog.pet();
    }
}

/// Park the executor; the watchdog resets the MCU once it expires.
async fn halt() -> ! {
    loop {
        Timer::after(Duration::from_secs(1)).await;
    }
}
