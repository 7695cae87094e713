use anyhow::{Result, bail};

/// Per-frame zoom change that reaches `zoom_factor` after
/// `duration_seconds * frame_rate` frames, starting from 1.0.
pub fn zoom_increment(duration_seconds: f64, zoom_factor: f64, frame_rate: u32) -> f64 {
    (zoom_factor - 1.0) / (duration_seconds * f64::from(frame_rate))
}

/// Zoompan parameters for one segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomRamp {
    pub increment: f64,
    /// Number of output frames generated from the still image
    pub frames: u64,
}

impl ZoomRamp {
    pub fn for_duration(duration_seconds: f64, zoom_factor: f64, frame_rate: u32) -> Result<Self> {
        if !duration_seconds.is_finite() || duration_seconds <= 0.0 {
            bail!("segment duration must be positive, got {duration_seconds}");
        }
        if frame_rate == 0 {
            bail!("frame rate must be positive");
        }

        let exact_frames = duration_seconds * f64::from(frame_rate);
        Ok(Self {
            increment: zoom_increment(duration_seconds, zoom_factor, frame_rate),
            frames: (exact_frames.round() as u64).max(1),
        })
    }

    /// Zoom level on the last frame
    pub fn final_zoom(&self) -> f64 {
        1.0 + self.increment * self.frames as f64
    }
}
