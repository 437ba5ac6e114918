//! xtask decode - turn a raw telemetry capture into readable frames.
//!
//! The firmware writes 10-byte frames with no framing beyond the `0xFE`
//! header, so a capture may start mid-frame. [`ramscope::FrameDecoder`]
//! skips to the first header and resynchronises after corrupt frames.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use ramscope::{Flag, FrameDecoder, TelemetryFrame};

/// Entry point called from main.rs
pub fn run(input: &Path, summary_only: bool) -> Result<()> {
    let bytes =
        std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let report = decode(&bytes);

    if !summary_only {
        println!(
            "{}",
            format!(
                "{:>6}  {:>6}  {:>6}  {:>6}  {:>6}  flags",
                "#", "stack", "peak", "heap", "free"
            )
            .bold()
        );
        for (i, frame) in report.frames.iter().enumerate() {
            println!("{}", format_frame(i, frame));
        }
        println!();
    }

    println!("{}", report.summary());
    if report.frames.is_empty() {
        anyhow::bail!("No telemetry frames found in {}", input.display());
    }
    Ok(())
}

/// Everything decoded from one capture.
#[derive(Debug, Default)]
pub(crate) struct Report {
    pub frames: Vec<TelemetryFrame>,
    pub discarded: usize,
}

impl Report {
    pub(crate) fn max_peak(&self) -> Option<u16> {
        self.frames.iter().map(|f| f.peak_usage).max()
    }

    pub(crate) fn min_free(&self) -> Option<u16> {
        self.frames.iter().map(|f| f.free_memory).min()
    }

    pub(crate) fn count(&self, flag: Flag) -> usize {
        self.frames.iter().filter(|f| f.flags.contains(flag)).count()
    }

    pub(crate) fn summary(&self) -> String {
        let mut out = format!(
            "{} frames, {} bytes skipped",
            self.frames.len(),
            self.discarded
        );
        if let (Some(peak), Some(free)) = (self.max_peak(), self.min_free()) {
            let _ = write!(out, ", peak stack {peak} B, lowest free {free} B");
        }
        let alerts = self.count(Flag::Alert);
        let collisions = self.count(Flag::Collision);
        if collisions > 0 {
            let _ = write!(out, ", {}", format!("{collisions} COLLISION").red().bold());
        }
        if alerts > 0 {
            let _ = write!(out, ", {}", format!("{alerts} ALERT").yellow());
        }
        out
    }
}

/// Decode every complete frame in `bytes`.
pub(crate) fn decode(bytes: &[u8]) -> Report {
    let mut decoder = FrameDecoder::new();
    let mut frames = Vec::new();
    decoder.extend(bytes, |frame| frames.push(frame));
    Report {
        frames,
        discarded: decoder.discarded(),
    }
}

fn format_frame(index: usize, frame: &TelemetryFrame) -> String {
    let flags: Vec<&str> = frame.flags.iter().map(Flag::name).collect();
    let line = format!(
        "{:>6}  {:>6}  {:>6}  {:>6}  {:>6}  {}",
        index,
        frame.stack_usage,
        frame.peak_usage,
        frame.heap_usage,
        frame.free_memory,
        flags.join(" ")
    );
    if frame.flags.contains(Flag::Collision) {
        line.red().to_string()
    } else if frame.flags.contains(Flag::Alert) {
        line.yellow().to_string()
    } else {
        line
    }
}
