use std::io::Read;
use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};

use super::probe::FFMPEG;
use crate::ui::prelude::{Level, emit};

pub trait FfmpegRunner {
    fn run(&self, args: &[String]) -> Result<()>;
}

/// Runs the installed ffmpeg, keeping stderr for the error message.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemFfmpegRunner {
    pub verbose: bool,
}

impl SystemFfmpegRunner {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl FfmpegRunner for SystemFfmpegRunner {
    fn run(&self, args: &[String]) -> Result<()> {
        emit(
            Level::Debug,
            "book.ffmpeg.command",
            &format!("{FFMPEG} {}", shell_words::join(args)),
            None,
        );

        let mut child = Command::new(FFMPEG)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| "Failed to spawn ffmpeg")?;

        let stderr = child
            .stderr
            .take()
            .context("Failed to capture ffmpeg stderr")?;

        let mut last_line = String::new();
        let mut error_lines: Vec<String> = Vec::new();
        let result = read_ffmpeg_stderr(stderr, self.verbose, &mut last_line, &mut error_lines);

        let status = child.wait().context("Failed to wait for ffmpeg")?;
        result?;

        if !status.success() {
            let error_msg = if !error_lines.is_empty() {
                error_lines.join("\n")
            } else {
                last_line
            };
            bail!(
                "ffmpeg exited with status {:?}: {}",
                status.code(),
                error_msg.trim()
            );
        }

        Ok(())
    }
}

/// Prints commands instead of running them.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunRunner;

impl FfmpegRunner for DryRunRunner {
    fn run(&self, args: &[String]) -> Result<()> {
        emit(
            Level::Info,
            "book.ffmpeg.dry_run",
            &format!("{FFMPEG} {}", shell_words::join(args)),
            Some(serde_json::json!({ "args": args })),
        );
        Ok(())
    }
}

fn read_ffmpeg_stderr<R: Read>(
    mut stderr: R,
    verbose: bool,
    last_line: &mut String,
    error_lines: &mut Vec<String>,
) -> Result<()> {
    let mut buffer = [0u8; 4096];
    let mut accumulated = String::new();

    loop {
        let bytes_read = stderr
            .read(&mut buffer)
            .context("Failed to read ffmpeg stderr")?;
        if bytes_read == 0 {
            break;
        }

        accumulated.push_str(&String::from_utf8_lossy(&buffer[..bytes_read]));

        while let Some(pos) = accumulated.find(['\r', '\n']) {
            let line = accumulated[..pos].to_string();
            accumulated.drain(..=pos);
            record_line(line, verbose, last_line, error_lines);
        }
    }

    if !accumulated.is_empty() {
        record_line(accumulated, verbose, last_line, error_lines);
    }

    Ok(())
}

fn record_line(line: String, verbose: bool, last_line: &mut String, error_lines: &mut Vec<String>) {
    if line.trim().is_empty() {
        return;
    }

    if verbose {
        eprintln!("{}", line);
    }

    if line.contains("error") || line.contains("Error") || line.contains("ERROR") {
        error_lines.push(line.clone());
    }

    *last_line = line;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stderr_lines_split_on_carriage_returns() {
        let stderr = "frame=  10 fps=0.0\rframe=  20 fps=0.0\nError opening input file x.jpg\nlast words";
        let mut last_line = String::new();
        let mut error_lines = Vec::new();

        read_ffmpeg_stderr(stderr.as_bytes(), false, &mut last_line, &mut error_lines).unwrap();

        assert_eq!(error_lines, vec!["Error opening input file x.jpg"]);
        assert_eq!(last_line, "last words");
    }

    #[test]
    fn dry_run_never_fails() {
        let args = vec!["-y".to_string(), "out file.mp4".to_string()];
        assert!(DryRunRunner.run(&args).is_ok());
    }
}
