//! Board configuration exercised against simulated RAM.
//!
//! Run with: cargo test -p firmware --test monitor_on_board_layout
#![cfg(feature = "monitor")]
#![allow(
    clippy::expect_used,
    clippy::arithmetic_side_effects,
    clippy::cast_possible_truncation
)]

use platform::mocks::{MockSink, SimulatedRam};
use proptest::prelude::*;
use ramscope::{Flag, HandshakeLatch, Monitor};

use firmware::board::{ALERT_THRESHOLD, SAFETY_MARGIN, SAMPLE_PERIOD};
use firmware::MONITOR_CONFIG;

/// Scaled-down AXI SRAM: same config, 16 KB window so the simulation stays small.
const RAM_START: u32 = 0x2400_0000;
const HEAP_START: u32 = RAM_START + 0x0400;
const RAM_LEN: usize = 16 * 1024;

fn board_monitor(latch: &HandshakeLatch) -> Monitor<'_, SimulatedRam<RAM_LEN>, MockSink> {
    let ram = SimulatedRam::new(RAM_START, HEAP_START).expect("valid geometry");
    let geometry = ram.geometry();
    Monitor::new(ram, MockSink::new(), geometry, MONITOR_CONFIG, latch)
}

#[test]
fn first_frame_arrives_after_one_sample_period() {
    let latch = HandshakeLatch::new();
    let mut m = board_monitor(&latch);
    latch.feed(0xA5);

    let mut frames = 0_u32;
    for _ in 0..SAMPLE_PERIOD {
        if m.check().is_some() {
            frames += 1;
        }
    }
    assert_eq!(frames, 1);
    assert_eq!(m.sink().len(), 10);
}

#[test]
fn board_paint_leaves_safety_margin() {
    let latch = HandshakeLatch::new();
    let m = board_monitor(&latch);
    let top = m.geometry().ram_end();
    assert_eq!(m.painted_boundary(), Some(top - u32::from(SAFETY_MARGIN)));
}

#[test]
fn alert_uses_board_threshold() {
    let latch = HandshakeLatch::new();
    let mut m = board_monitor(&latch);
    latch.feed(0xA5);
    let brk = HEAP_START + 0x1000;
    m.memory_mut().set_heap_break(brk);
    m.memory_mut().set_stack_top(brk + u32::from(ALERT_THRESHOLD) - 1);

    let frame = (0..SAMPLE_PERIOD)
        .find_map(|_| m.check())
        .expect("one frame per sample period");
    assert!(frame.flags.contains(Flag::Alert));
    assert!(!frame.flags.contains(Flag::Collision));
}

proptest! {
    /// With the board config, free memory always matches the simulated gap.
    #[test]
    fn free_memory_matches_gap(heap in 0_u32..0x1000, stack_back in 0_u32..0x2000) {
        let latch = HandshakeLatch::new();
        let mut m = board_monitor(&latch);
        let ram_end = m.geometry().ram_end();
        let brk = HEAP_START + heap;
        let top = ram_end - stack_back;
        m.memory_mut().set_heap_break(brk);
        m.memory_mut().set_stack_top(top);

        let sample = m.sample();
        prop_assert_eq!(u32::from(sample.free_memory()), top - brk);
    }
}
