//! The monitor context object.

use platform::{Address, ByteSink, MemoryAccess, RamAccess, RamGeometry};

use crate::config::MonitorConfig;
use crate::frame::TelemetryFrame;
use crate::handshake::HandshakeLatch;
use crate::peak::PeakTracker;
use crate::policy::{self, Sample};
use crate::rate::RateLimiter;
use crate::saturate_u16;
use crate::watermark::{PaintOutcome, Watermark};

/// Memory monitor for one target.
///
/// Owns the platform accessor `M` and the telemetry sink `S`, and shares a
/// [`HandshakeLatch`] with whichever context receives transport bytes.
/// Create it once at startup and call [`Monitor::check`] from the main loop.
///
/// ```
/// use platform::mocks::{MockSink, SimulatedRam};
/// use ramscope::{HandshakeLatch, Monitor, MonitorConfig};
///
/// static LATCH: HandshakeLatch = HandshakeLatch::new();
///
/// let ram = SimulatedRam::<2048>::new(0x0100, 0x0200).unwrap();
/// let geometry = ram.geometry();
/// let mut monitor = Monitor::new(ram, MockSink::new(), geometry, MonitorConfig::DEFAULT, &LATCH);
///
/// for _ in 0..1024 {
///     monitor.check();
/// }
/// assert!(monitor.sink().is_empty()); // no handshake yet
///
/// LATCH.feed(0xA5);
/// for _ in 0..256 {
///     monitor.check();
/// }
/// assert_eq!(monitor.sink().len(), 10);
/// ```
pub struct Monitor<'a, M, S> {
    mem: M,
    sink: S,
    geometry: RamGeometry,
    config: MonitorConfig,
    latch: &'a HandshakeLatch,
    watermark: Watermark,
    peak: PeakTracker,
    rate: RateLimiter,
}

impl<'a, M, S> Monitor<'a, M, S>
where
    M: MemoryAccess + RamAccess,
    S: ByteSink,
{
    /// Create a disabled monitor and paint the free gap once.
    pub fn new(
        mem: M,
        sink: S,
        geometry: RamGeometry,
        config: MonitorConfig,
        latch: &'a HandshakeLatch,
    ) -> Self {
        let mut monitor = Self {
            mem,
            sink,
            geometry,
            config,
            latch,
            watermark: Watermark::new(),
            peak: PeakTracker::new(),
            rate: RateLimiter::new(config.rate_limit()),
        };
        monitor.repaint();
        monitor
    }

    /// Periodic entry point; call once per main-loop iteration.
    ///
    /// Does nothing until a handshake arrives. Afterwards, services any
    /// pending repaint, then measures and transmits one frame every
    /// `rate_limit` calls. Returns the transmitted frame.
    pub fn check(&mut self) -> Option<TelemetryFrame> {
        if !self.latch.is_enabled() {
            return None;
        }
        self.service_repaint();
        if !self.rate.tick() {
            return None;
        }
        let frame = self.measure();
        frame.write_to(&mut self.sink);
        Some(frame)
    }

    /// Enable telemetry and repaint immediately, from main-loop context.
    ///
    /// Interrupt handlers use [`HandshakeLatch::trigger`] instead; the
    /// repaint then happens on the next [`Monitor::check`]. Re-triggering
    /// repaints but keeps the peak.
    pub fn trigger_handshake(&mut self) {
        self.latch.trigger();
        self.service_repaint();
    }

    /// `true` once a handshake has been received.
    pub fn is_enabled(&self) -> bool {
        self.latch.is_enabled()
    }

    /// Peak stack usage since start or the last [`Monitor::reset_peak`].
    pub fn peak(&self) -> u16 {
        self.peak.get()
    }

    /// Forget the peak. Allowed whether or not telemetry is enabled.
    pub fn reset_peak(&mut self) {
        self.peak.reset();
    }

    /// `check()` calls counted while enabled, modulo 65536.
    pub fn sample_counter(&self) -> u16 {
        self.rate.counter()
    }

    /// Low-water address of the last successful paint.
    pub fn painted_boundary(&self) -> Option<Address> {
        self.watermark.boundary()
    }

    /// Measure both regions without touching the peak or the transport.
    pub fn sample(&self) -> Sample {
        let stack_usage =
            self.watermark
                .scan(&self.mem, &self.geometry, self.config.paint_pattern());
        let heap_break = self.mem.heap_break();
        Sample {
            stack_top: self.mem.stack_top(),
            heap_break,
            stack_usage,
            heap_usage: saturate_u16(heap_break.saturating_sub(self.geometry.heap_start())),
        }
    }

    /// RAM layout in use.
    pub fn geometry(&self) -> &RamGeometry {
        &self.geometry
    }

    /// Configuration in use.
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Platform accessor.
    pub fn memory(&self) -> &M {
        &self.mem
    }

    /// Platform accessor, mutably (tests drive simulated RAM through this).
    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.mem
    }

    /// Telemetry sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Telemetry sink, mutably.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Release the accessor and sink.
    pub fn into_parts(self) -> (M, S) {
        (self.mem, self.sink)
    }

    fn measure(&mut self) -> TelemetryFrame {
        let sample = self.sample();
        let peak_new = self.peak.update(sample.stack_usage);
        let flags = policy::evaluate(&sample, &self.config, peak_new);
        TelemetryFrame {
            flags,
            stack_usage: sample.stack_usage,
            peak_usage: self.peak.get(),
            heap_usage: sample.heap_usage,
            free_memory: sample.free_memory(),
        }
    }

    fn service_repaint(&mut self) {
        if self.latch.take_repaint() {
            #[cfg(feature = "defmt")]
            defmt::info!("memory telemetry enabled");
            self.repaint();
        }
    }

    fn repaint(&mut self) -> PaintOutcome {
        let outcome = self.watermark.paint(&mut self.mem, &self.config);
        #[cfg(feature = "defmt")]
        log_paint(&outcome);
        outcome
    }
}

#[cfg(feature = "defmt")]
fn log_paint(outcome: &PaintOutcome) {
    match *outcome {
        PaintOutcome::Painted(w) => {
            defmt::debug!("stack paint {=u32:#x}..{=u32:#x}", w.start, w.end);
        }
        PaintOutcome::Skipped {
            heap_break,
            stack_top,
        } => {
            defmt::warn!(
                "stack paint skipped: heap break {=u32:#x}, stack top {=u32:#x}",
                heap_break,
                stack_top
            );
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::RateLimit;
    use crate::flags::Flag;
    use platform::mocks::{MockSink, SimulatedRam};

    type TestMonitor<'a> = Monitor<'a, SimulatedRam<2048>, MockSink>;

    fn monitor(latch: &HandshakeLatch, rate: u16) -> TestMonitor<'_> {
        let ram = SimulatedRam::new(0x0100, 0x0200).expect("valid geometry");
        let geometry = ram.geometry();
        let config = MonitorConfig::DEFAULT.with_rate_limit(RateLimit::new(rate).expect("pow2"));
        Monitor::new(ram, MockSink::new(), geometry, config, latch)
    }

    #[test]
    fn new_paints_once_while_disabled() {
        let latch = HandshakeLatch::new();
        let m = monitor(&latch, 1);
        assert!(!m.is_enabled());
        assert_eq!(m.memory().fill_count(), 1);
        assert_eq!(m.painted_boundary(), Some(0x08FF - 32));
    }

    #[test]
    fn disabled_check_is_inert() {
        let latch = HandshakeLatch::new();
        let mut m = monitor(&latch, 1);
        for _ in 0..1000 {
            assert_eq!(m.check(), None);
        }
        assert!(m.sink().is_empty());
        assert_eq!(m.sample_counter(), 0);
        assert_eq!(m.peak(), 0);
        assert_eq!(m.memory().fill_count(), 1);
    }

    #[test]
    fn trigger_handshake_enables_and_repaints() {
        let latch = HandshakeLatch::new();
        let mut m = monitor(&latch, 1);
        m.trigger_handshake();
        assert!(m.is_enabled());
        assert_eq!(m.memory().fill_count(), 2);
        // the pending request was consumed by the synchronous repaint
        m.check();
        assert_eq!(m.memory().fill_count(), 2);
    }

    #[test]
    fn interrupt_trigger_repaints_on_next_check() {
        let latch = HandshakeLatch::new();
        let mut m = monitor(&latch, 4);
        latch.feed(0xA5);
        assert_eq!(m.memory().fill_count(), 1);
        m.check();
        assert_eq!(m.memory().fill_count(), 2);
        m.check();
        assert_eq!(m.memory().fill_count(), 2);
    }

    #[test]
    fn retrigger_keeps_peak() {
        let latch = HandshakeLatch::new();
        let mut m = monitor(&latch, 1);
        m.trigger_handshake();
        m.memory_mut().set_stack_top(0x0700);
        m.memory_mut().set_stack_top(0x0800);
        let first = m.check().expect("rate 1 samples every call");
        assert!(first.flags.contains(Flag::PeakNew));

        m.trigger_handshake();
        let second = m.check().expect("sample");
        assert_eq!(second.peak_usage, first.peak_usage);
        assert!(!second.flags.contains(Flag::PeakNew));
    }

    #[test]
    fn freed_heap_does_not_raise_peak() {
        let latch = HandshakeLatch::new();
        let mut m = monitor(&latch, 1);
        m.memory_mut().set_heap_break(0x0300);
        m.memory_mut().set_stack_top(0x0800);
        m.trigger_handshake();
        let first = m.check().expect("sample");

        m.memory_mut().set_heap_break(0x0400);
        m.memory_mut().set_heap_break(0x0300);
        let second = m.check().expect("sample");

        assert_eq!(second.stack_usage, first.stack_usage);
        assert_eq!(second.peak_usage, first.peak_usage);
        assert!(!second.flags.contains(Flag::PeakNew));
    }

    #[test]
    fn frame_on_the_wire_matches_returned_frame() {
        let latch = HandshakeLatch::new();
        let mut m = monitor(&latch, 1);
        m.memory_mut().set_heap_break(0x0300);
        m.trigger_handshake();
        let frame = m.check().expect("sample");
        assert_eq!(m.sink().bytes(), &frame.to_bytes());
        assert_eq!(frame.heap_usage, 0x0100);
        assert_eq!(frame.free_memory, 0x08FF - 0x0300);
        assert!(frame.flags.contains(Flag::HeapActive));
    }

    #[test]
    fn reset_peak_works_while_disabled() {
        let latch = HandshakeLatch::new();
        let mut m = monitor(&latch, 1);
        m.trigger_handshake();
        m.check();
        assert!(m.peak() > 0);
        m.reset_peak();
        assert_eq!(m.peak(), 0);
    }

    #[test]
    fn sample_does_not_touch_peak_or_sink() {
        let latch = HandshakeLatch::new();
        let mut m = monitor(&latch, 1);
        m.memory_mut().set_stack_top(0x0600);
        let s = m.sample();
        assert_eq!(s.stack_usage, 0x08FF - 0x0600);
        assert_eq!(m.peak(), 0);
        assert!(m.sink().is_empty());
    }
}
