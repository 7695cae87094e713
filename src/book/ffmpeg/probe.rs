use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

/// Tools a render needs on PATH
pub const FFMPEG: &str = "ffmpeg";
pub const FFPROBE: &str = "ffprobe";

/// Reads media durations; stubbed out in tests.
pub trait DurationProbe {
    fn duration_seconds(&self, path: &Path) -> Result<f64>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FfprobeDurationProbe;

impl DurationProbe for FfprobeDurationProbe {
    fn duration_seconds(&self, path: &Path) -> Result<f64> {
        probe_duration_seconds(path)
    }
}

pub fn probe_duration_seconds(path: &Path) -> Result<f64> {
    let output = Command::new(FFPROBE)
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "csv=p=0",
            "-i",
        ])
        .arg(path)
        .output()
        .with_context(|| format!("Failed to run ffprobe for {}", path.display()))?;

    if !output.status.success() {
        anyhow::bail!(
            "ffprobe failed for {}: {}",
            path.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    parse_probe_duration(&String::from_utf8_lossy(&output.stdout))
        .with_context(|| format!("Failed to parse ffprobe duration for {}", path.display()))
}

fn parse_probe_duration(stdout: &str) -> Result<f64> {
    let value = stdout.trim();
    let duration: f64 = value
        .parse()
        .with_context(|| format!("'{value}' is not a number"))?;
    if !duration.is_finite() || duration <= 0.0 {
        anyhow::bail!("duration {duration} is not positive");
    }
    Ok(duration)
}

/// Fail early when a required tool is not installed.
pub fn ensure_tools(tools: &[&str]) -> Result<()> {
    let missing: Vec<&str> = tools
        .iter()
        .copied()
        .filter(|tool| which::which(tool).is_err())
        .collect();

    if !missing.is_empty() {
        anyhow::bail!(
            "{} not found. Make sure it is installed and in your PATH.",
            missing.join(", ")
        );
    }
    Ok(())
}
