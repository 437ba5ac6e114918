use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;
use std::time::Instant;

const TARGET: &str = "thumbv7em-none-eabihf";
const CHIP: &str = "STM32H743ZITx";

pub fn run(release: bool, no_monitor: bool) -> Result<()> {
    let profile = if release { "release" } else { "debug" };
    let monitor = if no_monitor { "monitor off" } else { "monitor on" };

    println!();
    println!(
        "{}",
        format!("🔨 Building firmware ({profile}, {monitor})...")
            .cyan()
            .bold()
    );
    println!();

    let build_start = Instant::now();
    let build_output = Command::new("cargo")
        .args(build_args(release, no_monitor))
        .output()
        .context("Failed to run cargo build")?;

    if !build_output.status.success() {
        eprintln!("{}", "✗ Build failed".red().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&build_output.stderr));
        anyhow::bail!("Build failed");
    }
    println!(
        "{}",
        format!(
            "✓ Build successful in {:.2}s",
            build_start.elapsed().as_secs_f64()
        )
        .green()
    );
    println!();

    let elf = format!("target/{TARGET}/{profile}/firmware");
    show_binary_size(&elf);
    println!();

    println!("{}", "📡 Flashing to STM32H7...".cyan().bold());
    println!("   {}", "Connecting to probe...".dimmed());

    let flash_start = Instant::now();
    let flash_output = Command::new("probe-rs")
        .args(["download", &elf, "--chip", CHIP, "--probe-index", "0"])
        .output()
        .context("Failed to run probe-rs. Is probe-rs installed? (cargo install probe-rs-tools)")?;

    if !flash_output.status.success() {
        eprintln!("{}", "✗ Flash failed".red().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&flash_output.stderr));
        anyhow::bail!("Flash failed - check that the probe is connected and the device is powered");
    }

    println!(
        "{}",
        format!(
            "✓ Flash successful in {:.2}s",
            flash_start.elapsed().as_secs_f64()
        )
        .green()
    );
    println!();
    println!("{}", "📈 ramscope demo is running on hardware!".bold());
    println!(
        "   {}",
        "Send 0xA5 on the ST-LINK VCP (115200 8N1) to start telemetry".dimmed()
    );
    println!(
        "   {}",
        "Capture with 'cat /dev/ttyACM0 > capture.bin', then 'cargo xtask decode capture.bin'"
            .dimmed()
    );
    println!(
        "   {}",
        format!("Use 'probe-rs attach --chip {CHIP} {elf}' to view RTT logs").dimmed()
    );
    println!();

    Ok(())
}

fn build_args(release: bool, no_monitor: bool) -> Vec<&'static str> {
    let mut args = vec![
        "build",
        "-p",
        "firmware",
        "--target",
        TARGET,
        "--features",
        "hardware",
    ];
    if release {
        args.push("--release");
    }
    if no_monitor {
        args.push("--no-default-features");
    }
    args
}

/// Print section sizes; the monitor's cost shows up as the `.text` delta
/// between a normal and a `--no-monitor` build.
fn show_binary_size(elf: &str) {
    match Command::new("rust-size").args([elf, "-A"]).output() {
        Ok(out) if out.status.success() => {
            println!("{}", "📊 Binary size:".cyan());
            for line in String::from_utf8_lossy(&out.stdout).lines() {
                println!("   {}", line.dimmed());
            }
        }
        _ => println!(
            "   {}",
            "rust-size not found (cargo install cargo-binutils)".dimmed()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_args_always_target_hardware() {
        let args = build_args(false, false);
        assert!(args.windows(2).any(|w| w == ["--features", "hardware"]));
        assert!(args.windows(2).any(|w| w == ["--target", TARGET]));
        assert!(!args.contains(&"--release"));
    }

    #[test]
    fn no_monitor_drops_default_features() {
        let args = build_args(true, true);
        assert!(args.contains(&"--release"));
        assert!(args.contains(&"--no-default-features"));
    }
}
