use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::book::config::RenderConfig;
use crate::book::ffmpeg::{DurationProbe, FfmpegCompiler, FfmpegRunner, SegmentJob};
use crate::book::layout::{BookLayout, NarrationTrack};
use crate::book::srt::duration_from_seconds;
use crate::book::workspace::SegmentWorkspace;
use crate::book::zoom::ZoomRamp;
use crate::ui::prelude::{Level, emit};

/// Why a single segment was left out of a language's video.
#[derive(Debug, Error)]
pub enum SegmentSkip {
    #[error("image {} is missing", .0.display())]
    MissingImage(PathBuf),
    #[error("could not read narration duration: {0:#}")]
    Probe(anyhow::Error),
    #[error("unusable narration duration: {0:#}")]
    Duration(anyhow::Error),
    #[error("could not prepare caption: {0:#}")]
    Caption(anyhow::Error),
    #[error("ffmpeg failed: {0:#}")]
    Ffmpeg(anyhow::Error),
}

/// Image and duration of a segment, before anything is rendered.
#[derive(Debug, Clone)]
pub struct PreparedSegment {
    pub number: u32,
    pub image: PathBuf,
    pub audio: PathBuf,
    pub duration_seconds: f64,
    pub duration: Duration,
}

pub fn prepare_segment(
    layout: &BookLayout,
    config: &RenderConfig,
    probe: &dyn DurationProbe,
    track: &NarrationTrack,
) -> Result<PreparedSegment, SegmentSkip> {
    let image = layout
        .find_image(track.number, &config.image_extension)
        .ok_or_else(|| {
            SegmentSkip::MissingImage(layout.image_path(track.number, &config.image_extension))
        })?;

    let duration_seconds = probe
        .duration_seconds(&track.path)
        .map_err(SegmentSkip::Probe)?;
    let duration = duration_from_seconds(duration_seconds).map_err(SegmentSkip::Duration)?;

    Ok(PreparedSegment {
        number: track.number,
        image,
        audio: track.path.clone(),
        duration_seconds,
        duration,
    })
}

/// Render one zooming clip into the workspace and return its path.
/// Workspace files are named by `position`, the segment's place in the video.
pub fn render_segment(
    config: &RenderConfig,
    runner: &dyn FfmpegRunner,
    workspace: &SegmentWorkspace,
    position: usize,
    segment: &PreparedSegment,
    caption: &str,
) -> Result<PathBuf, SegmentSkip> {
    let ramp = ZoomRamp::for_duration(segment.duration_seconds, config.zoom_factor, config.frame_rate)
        .map_err(SegmentSkip::Duration)?;
    emit(
        Level::Debug,
        "book.render.segment",
        &format!(
            "Segment {}: {:.3}s, {} frames, zoom 1.0 -> {:.4}",
            segment.number,
            segment.duration_seconds,
            ramp.frames,
            ramp.final_zoom()
        ),
        None,
    );

    let caption_file = if config.caption_mode.burns_in() {
        Some(
            workspace
                .write_caption(position, caption)
                .map_err(SegmentSkip::Caption)?,
        )
    } else {
        None
    };

    let output = workspace.segment_path(position);
    let job = SegmentJob {
        image: &segment.image,
        audio: &segment.audio,
        output: &output,
        ramp,
        caption_file: caption_file.as_deref(),
    };
    let args = FfmpegCompiler::new(config).segment_args(&job);
    runner.run(&args).map_err(SegmentSkip::Ffmpeg)?;

    Ok(output)
}
