//! Stack painting and high-water-mark scanning.
//!
//! Re-reading the stack pointer only shows the current depth. To recover the
//! deepest excursion between two samples, the unused gap between heap and
//! stack is filled with a sentinel byte; any byte the stack later writes no
//! longer matches, and the lowest such byte marks the high-water mark.
//!
//! ```text
//!  heap_break      window.start                  window.end   stack_top
//!      │   heap grew   │ AA AA AA AA AA 5C AA 5C 5C │ ≥ margin │ live frames
//!                                       ▲
//!                                deepest touched byte
//! ```

use platform::{Address, MemoryAccess, RamAccess, RamGeometry};

use crate::config::MonitorConfig;
use crate::saturate_u16;

/// Address range covered by the most recent successful paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PaintWindow {
    /// Heap break at paint time; first painted byte.
    pub start: Address,
    /// `stack_top - safety_margin` at paint time; one past the last painted byte.
    pub end: Address,
}

/// Result of a paint attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PaintOutcome {
    /// The window was filled with the sentinel.
    Painted(PaintWindow),
    /// Stack and heap are closer than the safety margin; nothing was written.
    Skipped {
        /// Heap break observed.
        heap_break: Address,
        /// Stack top observed.
        stack_top: Address,
    },
}

/// Painter and scanner state: the window of the last successful paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Watermark {
    window: Option<PaintWindow>,
}

impl Watermark {
    /// No paint yet; scans fall back to the live stack pointer.
    #[must_use]
    pub const fn new() -> Self {
        Self { window: None }
    }

    /// Window of the last successful paint.
    #[must_use]
    pub const fn window(&self) -> Option<PaintWindow> {
        self.window
    }

    /// Low-water address of the last paint (the painted boundary).
    #[must_use]
    pub fn boundary(&self) -> Option<Address> {
        self.window.map(|w| w.end)
    }

    /// Fill `[heap_break, stack_top - safety_margin)` with the sentinel.
    ///
    /// When the gap is empty the paint is skipped and the previous window is
    /// forgotten, so [`Watermark::scan`] reports the live stack depth.
    pub fn paint<M>(&mut self, mem: &mut M, config: &MonitorConfig) -> PaintOutcome
    where
        M: MemoryAccess + RamAccess,
    {
        let heap_break = mem.heap_break();
        let stack_top = mem.stack_top();
        let end = stack_top.checked_sub(u32::from(config.safety_margin()));

        match end {
            Some(end) if end > heap_break => {
                // SAFETY: everything below `heap_break` belongs to the heap and
                // everything above `end` is at least `safety_margin` bytes into
                // the live stack, so `[heap_break, end)` holds no live data.
                unsafe { mem.fill(heap_break..end, config.paint_pattern()) };
                let window = PaintWindow {
                    start: heap_break,
                    end,
                };
                self.window = Some(window);
                PaintOutcome::Painted(window)
            }
            _ => {
                self.window = None;
                PaintOutcome::Skipped {
                    heap_break,
                    stack_top,
                }
            }
        }
    }

    /// Deepest stack usage since the last paint, in bytes below `ram_end`.
    ///
    /// Walks the painted window upward from whichever is higher, the paint
    /// start or the current heap break. Bytes at the floor that no longer
    /// hold `pattern` are heap residue (allocated, then freed) and are
    /// skipped; the first disturbed byte after the first intact sentinel is
    /// the deepest stack write. With nothing disturbed the window end is the
    /// deepest point, and with no sentinel left at all the stack reached the
    /// floor. Never reports less than the live stack depth.
    ///
    /// Cost is one volatile read per byte between the floor and the deepest
    /// write, so a freshly painted large window is read in full.
    pub fn scan<M>(&self, mem: &M, geometry: &RamGeometry, pattern: u8) -> u16
    where
        M: MemoryAccess + RamAccess,
    {
        let stack_top = mem.stack_top();
        let ram_end = geometry.ram_end();
        let live = ram_end.saturating_sub(stack_top);

        let Some(window) = self.window else {
            return saturate_u16(live);
        };

        let floor = window.start.max(mem.heap_break());
        let mut walk = (floor..window.end)
            .map(|addr| (addr, mem.read_byte(addr) == Some(pattern)));
        let deepest = if walk.by_ref().any(|(_, painted)| painted) {
            walk.find(|&(_, painted)| !painted)
                .map_or(window.end, |(addr, _)| addr)
        } else {
            floor.min(window.end)
        };

        saturate_u16(ram_end.saturating_sub(deepest).max(live))
    }
}
