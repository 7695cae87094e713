use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrtCue {
    /// 1-based position in the track
    pub index: usize,
    pub start: Duration,
    pub end: Duration,
    pub text: String,
}

/// Subtitle track built segment by segment: every cue starts where the
/// previous one ended.
#[derive(Debug, Clone, Default)]
pub struct SubtitleTrack {
    cues: Vec<SrtCue>,
}

impl SubtitleTrack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, duration: Duration, text: &str) -> &SrtCue {
        let start = self.end();
        self.cues.push(SrtCue {
            index: self.cues.len() + 1,
            start,
            end: start + duration,
            text: text.trim().to_string(),
        });
        &self.cues[self.cues.len() - 1]
    }

    /// Like [`push`](Self::push) for a duration in seconds, rounded to milliseconds.
    #[cfg(test)]
    pub fn push_seconds(&mut self, seconds: f64, text: &str) -> Result<&SrtCue> {
        Ok(self.push(duration_from_seconds(seconds)?, text))
    }

    /// End of the last cue, zero for an empty track
    pub fn end(&self) -> Duration {
        self.cues.last().map(|cue| cue.end).unwrap_or(Duration::ZERO)
    }

    #[cfg(test)]
    pub fn cues(&self) -> &[SrtCue] {
        &self.cues
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    pub fn to_srt(&self) -> String {
        let mut out = String::new();
        for cue in &self.cues {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!(
                "{}\n{} --> {}\n{}\n",
                cue.index,
                format_timestamp(cue.start),
                format_timestamp(cue.end),
                cue.text
            ));
        }
        out
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_srt())
            .with_context(|| format!("Failed to write subtitles to {}", path.display()))
    }
}

pub fn duration_from_seconds(seconds: f64) -> Result<Duration> {
    if !seconds.is_finite() || seconds < 0.0 {
        bail!("invalid duration {seconds}");
    }
    Ok(Duration::from_millis((seconds * 1000.0).round() as u64))
}

/// `HH:MM:SS,mmm`
pub fn format_timestamp(value: Duration) -> String {
    let total_millis = value.as_millis();
    let hours = total_millis / 3_600_000;
    let minutes = (total_millis % 3_600_000) / 60_000;
    let seconds = (total_millis % 60_000) / 1000;
    let millis = total_millis % 1000;
    format!("{hours:02}:{minutes:02}:{seconds:02},{millis:03}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cues_start_at_previous_end() {
        let durations = [2.5, 4.0, 1.25, 3.75];
        let mut track = SubtitleTrack::new();
        for (i, seconds) in durations.iter().enumerate() {
            track.push_seconds(*seconds, &format!("caption {i}")).unwrap();
        }

        for (k, cue) in track.cues().iter().enumerate() {
            let expected_start: f64 = durations[..k].iter().sum();
            assert_eq!(cue.start, duration_from_seconds(expected_start).unwrap());
            assert_eq!(cue.end - cue.start, duration_from_seconds(durations[k]).unwrap());
            assert_eq!(cue.index, k + 1);
        }
        assert_eq!(track.end(), Duration::from_millis(11_500));
    }

    #[test]
    fn first_cue_starts_at_zero() {
        let mut track = SubtitleTrack::new();
        let cue = track.push(Duration::from_secs(3), "  Hello there \n");
        assert_eq!(cue.start, Duration::ZERO);
        assert_eq!(cue.text, "Hello there");
    }

    #[test]
    fn renders_subrip() {
        let mut track = SubtitleTrack::new();
        track.push_seconds(1.5, "First").unwrap();
        track.push_seconds(3661.0, "Second\nline").unwrap();

        assert_eq!(
            track.to_srt(),
            "1\n00:00:00,000 --> 00:00:01,500\nFirst\n\n2\n00:00:01,500 --> 01:01:02,500\nSecond\nline\n"
        );
    }

    #[test]
    fn sub_second_precision_is_kept() {
        let mut track = SubtitleTrack::new();
        track.push_seconds(0.4, "a").unwrap();
        track.push_seconds(0.4, "b").unwrap();
        track.push_seconds(0.4, "c").unwrap();
        assert_eq!(track.end(), Duration::from_millis(1200));
    }

    #[test]
    fn rejects_invalid_seconds() {
        let mut track = SubtitleTrack::new();
        assert!(track.push_seconds(-1.0, "x").is_err());
        assert!(track.push_seconds(f64::INFINITY, "x").is_err());
        assert!(track.is_empty());
    }

    #[test]
    fn formats_timestamps() {
        assert_eq!(format_timestamp(Duration::ZERO), "00:00:00,000");
        assert_eq!(format_timestamp(Duration::from_millis(83_456)), "00:01:23,456");
    }
}
