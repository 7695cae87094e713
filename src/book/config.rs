use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::common::config::DocumentedConfig;
use crate::common::paths;
use crate::documented_config;
use crate::ui::prelude::{Level, emit};

/// How caption files are split into per-segment captions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptionFormat {
    /// Detect numbered blocks, otherwise fall back to plain blocks
    #[default]
    Auto,
    /// Blank-line separated blocks, one caption per block
    Blocks,
    /// SRT-like blocks: a number line followed by the caption line
    Numbered,
}

/// Where captions end up in the rendered video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptionMode {
    /// Muxed as a selectable subtitle track
    #[default]
    Soft,
    /// Drawn onto the frames of every segment
    Burned,
    /// Both of the above
    Both,
}

impl CaptionMode {
    pub fn burns_in(self) -> bool {
        matches!(self, CaptionMode::Burned | CaptionMode::Both)
    }

    pub fn muxes_track(self) -> bool {
        matches!(self, CaptionMode::Soft | CaptionMode::Both)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub frame_rate: u32,
    pub zoom_factor: f64,
    pub width: u32,
    pub height: u32,
    pub zoom_canvas_width: u32,
    pub audio_extension: String,
    pub image_extension: String,
    pub caption_format: CaptionFormat,
    pub caption_mode: CaptionMode,
    pub font_size: u32,
    pub font_color: String,
    pub box_color: String,
    pub caption_margin: u32,
    pub video_codec: String,
    pub subtitle_codec: String,
    pub font_file: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            frame_rate: Self::DEFAULT_FRAME_RATE,
            zoom_factor: Self::DEFAULT_ZOOM_FACTOR,
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            zoom_canvas_width: Self::DEFAULT_ZOOM_CANVAS_WIDTH,
            audio_extension: "m4a".to_string(),
            image_extension: "jpg".to_string(),
            caption_format: CaptionFormat::default(),
            caption_mode: CaptionMode::default(),
            font_size: 24,
            font_color: "white".to_string(),
            box_color: "black@0.5".to_string(),
            caption_margin: 50,
            video_codec: "libx264".to_string(),
            subtitle_codec: "mov_text".to_string(),
            font_file: None,
        }
    }
}

impl RenderConfig {
    pub const DEFAULT_FRAME_RATE: u32 = 25;
    pub const DEFAULT_ZOOM_FACTOR: f64 = 1.09;
    pub const DEFAULT_WIDTH: u32 = 1280;
    pub const DEFAULT_HEIGHT: u32 = 720;
    pub const DEFAULT_ZOOM_CANVAS_WIDTH: u32 = 8000;

    /// Load the config from `path_override` or the default location.
    pub fn load(path_override: Option<&Path>) -> Result<Self> {
        let path = Self::resolve_path(path_override)?;
        let config = <Self as DocumentedConfig>::load_from_path_documented(&path)?;
        Ok(config.sanitized())
    }

    pub fn resolve_path(path_override: Option<&Path>) -> Result<PathBuf> {
        match path_override {
            Some(path) => Ok(path.to_path_buf()),
            None => <Self as DocumentedConfig>::config_path(),
        }
    }

    /// Replace values ffmpeg cannot work with by their defaults.
    pub fn sanitized(mut self) -> Self {
        if self.frame_rate == 0 {
            warn_reset("frame_rate", Self::DEFAULT_FRAME_RATE);
            self.frame_rate = Self::DEFAULT_FRAME_RATE;
        }
        if !self.zoom_factor.is_finite() || self.zoom_factor < 1.0 {
            warn_reset("zoom_factor", Self::DEFAULT_ZOOM_FACTOR);
            self.zoom_factor = Self::DEFAULT_ZOOM_FACTOR;
        }
        if self.width == 0 || self.height == 0 {
            warn_reset(
                "width/height",
                format!("{}x{}", Self::DEFAULT_WIDTH, Self::DEFAULT_HEIGHT),
            );
            self.width = Self::DEFAULT_WIDTH;
            self.height = Self::DEFAULT_HEIGHT;
        }
        if self.zoom_canvas_width < self.width {
            warn_reset("zoom_canvas_width", Self::DEFAULT_ZOOM_CANVAS_WIDTH);
            self.zoom_canvas_width = Self::DEFAULT_ZOOM_CANVAS_WIDTH.max(self.width);
        }
        self.audio_extension = normalize_extension(&self.audio_extension, "m4a");
        self.image_extension = normalize_extension(&self.image_extension, "jpg");
        self
    }
}

fn warn_reset(field: &str, default: impl std::fmt::Display) {
    emit(
        Level::Warn,
        "book.config.invalid",
        &format!("Invalid `{field}` in render config, using {default}"),
        None,
    );
}

fn normalize_extension(value: &str, default: &str) -> String {
    let trimmed = value.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

documented_config!(RenderConfig {
    fields: [
        frame_rate, "Output frame rate of every segment",
        zoom_factor, "Zoom level reached on the last frame of a segment (1.0 = no zoom)",
        width, "Output video width in pixels",
        height, "Output video height in pixels",
        zoom_canvas_width, "Width images are upscaled to before zooming (reduces jitter)",
        audio_extension, "File extension of narration tracks in audio/<lang>/",
        image_extension, "File extension of segment images in images/",
        caption_format, "Caption file format: auto, blocks or numbered",
        caption_mode, "Caption placement: soft (subtitle track), burned or both",
        font_size, "Font size of burned-in captions",
        font_color, "Font color of burned-in captions",
        box_color, "Background box color of burned-in captions",
        caption_margin, "Distance of burned-in captions from the bottom edge in pixels",
        video_codec, "ffmpeg video encoder for segments",
        subtitle_codec, "ffmpeg codec for the muxed subtitle track",
    ],
    optional: [
        font_file, "Font file used for burned-in captions",
    ],
    config_path: paths::config_file("render.toml"),
});
