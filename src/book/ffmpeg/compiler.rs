use std::path::Path;

use super::util::{escape_ffmpeg_path, format_decimal};
use crate::book::config::RenderConfig;
use crate::book::zoom::ZoomRamp;

/// One still image plus one narration track.
#[derive(Debug, Clone, Copy)]
pub struct SegmentJob<'a> {
    pub image: &'a Path,
    pub audio: &'a Path,
    pub output: &'a Path,
    pub ramp: ZoomRamp,
    /// Text file holding the caption to burn in, if any
    pub caption_file: Option<&'a Path>,
}

/// Subtitle file muxed into the final video.
#[derive(Debug, Clone, Copy)]
pub struct SubtitleInput<'a> {
    pub path: &'a Path,
    pub language_tag: &'a str,
}

#[derive(Debug, Clone, Default)]
pub struct FilterChain {
    filters: Vec<String>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, filter: String) {
        self.filters.push(filter);
    }

    pub fn join(&self) -> String {
        self.filters.join(";")
    }
}

/// Builds ffmpeg argument lists from the render config.
pub struct FfmpegCompiler<'a> {
    config: &'a RenderConfig,
}

impl<'a> FfmpegCompiler<'a> {
    pub fn new(config: &'a RenderConfig) -> Self {
        Self { config }
    }

    pub fn segment_args(&self, job: &SegmentJob<'_>) -> Vec<String> {
        let mut args: Vec<String> = ["-hide_banner", "-y", "-i"]
            .into_iter()
            .map(String::from)
            .collect();
        args.push(job.image.to_string_lossy().into_owned());
        args.push("-i".to_string());
        args.push(job.audio.to_string_lossy().into_owned());

        args.push("-filter_complex".to_string());
        args.push(self.segment_filter_graph(&job.ramp, job.caption_file));

        for arg in [
            "-map",
            "[outv]",
            "-map",
            "1:a",
            "-c:v",
            self.config.video_codec.as_str(),
            "-pix_fmt",
            "yuv420p",
        ] {
            args.push(arg.to_string());
        }
        args.push(job.output.to_string_lossy().into_owned());
        args
    }

    pub fn segment_filter_graph(&self, ramp: &ZoomRamp, caption_file: Option<&Path>) -> String {
        let config = self.config;
        let (width, height) = (config.width, config.height);
        let fps = config.frame_rate;

        let mut filters = FilterChain::new();
        filters.push(format!(
            "[0:v]scale=w={width}:h={height}:force_original_aspect_ratio=decrease,\
             pad={width}:{height}:(ow-iw)/2:(oh-ih)/2,\
             format=pix_fmts=yuva420p,\
             scale={canvas}:-1,\
             zoompan=z='zoom+{increment}':x=0:y=0:fps={fps}:d={frames}:s={width}x{height},\
             format=pix_fmts=yuva420p[v0]",
            canvas = config.zoom_canvas_width,
            increment = format_decimal(ramp.increment),
            frames = ramp.frames,
        ));
        filters.push(format!("[v0]fps={fps}[vout]"));
        filters.push(format!("[vout]{}[outv]", self.caption_filter(caption_file)));
        filters.join()
    }

    fn caption_filter(&self, caption_file: Option<&Path>) -> String {
        let Some(caption_file) = caption_file else {
            return "null".to_string();
        };

        let config = self.config;
        let mut filter = format!(
            "drawtext=textfile={path}:expansion=none",
            path = escape_ffmpeg_path(caption_file)
        );
        if let Some(font_file) = config.font_file.as_deref().filter(|f| !f.is_empty()) {
            filter.push_str(&format!(
                ":fontfile={}",
                escape_ffmpeg_path(Path::new(font_file))
            ));
        }
        filter.push_str(&format!(
            ":fontcolor={color}:fontsize={size}:box=1:boxcolor={box_color}:x=(w-text_w)/2:y=h-{margin}",
            color = config.font_color,
            size = config.font_size,
            box_color = config.box_color,
            margin = config.caption_margin,
        ));
        filter
    }

    /// Join the segments listed in `manifest` without re-encoding.
    pub fn concat_args(
        &self,
        manifest: &Path,
        subtitles: Option<&SubtitleInput<'_>>,
        output: &Path,
    ) -> Vec<String> {
        let mut args: Vec<String> = ["-hide_banner", "-y", "-f", "concat", "-safe", "0", "-i"]
            .into_iter()
            .map(String::from)
            .collect();
        args.push(manifest.to_string_lossy().into_owned());

        if let Some(subtitles) = subtitles {
            args.push("-i".to_string());
            args.push(subtitles.path.to_string_lossy().into_owned());
        }

        for arg in ["-map", "0:v", "-map", "0:a"] {
            args.push(arg.to_string());
        }
        if subtitles.is_some() {
            args.push("-map".to_string());
            args.push("1:s".to_string());
        }

        args.push("-c".to_string());
        args.push("copy".to_string());

        if let Some(subtitles) = subtitles {
            args.push("-c:s".to_string());
            args.push(self.config.subtitle_codec.clone());
            args.push("-metadata:s:s:0".to_string());
            args.push(format!("language={}", subtitles.language_tag));
        }

        args.push(output.to_string_lossy().into_owned());
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn ramp() -> ZoomRamp {
        ZoomRamp::for_duration(4.0, 1.09, 25).unwrap()
    }

    fn arg_after<'v>(args: &'v [String], flag: &str) -> &'v str {
        let idx = args.iter().position(|arg| arg == flag).unwrap();
        &args[idx + 1]
    }

    #[test]
    fn segment_args_map_zoomed_video_and_narration() {
        let config = RenderConfig::default();
        let compiler = FfmpegCompiler::new(&config);
        let job = SegmentJob {
            image: Path::new("/book/images/3.jpg"),
            audio: Path::new("/book/audio/en/3.m4a"),
            output: Path::new("/work/segment3.mp4"),
            ramp: ramp(),
            caption_file: None,
        };

        let args = compiler.segment_args(&job);
        assert_eq!(&args[..3], &["-hide_banner", "-y", "-i"]);
        assert_eq!(args[3], "/book/images/3.jpg");
        assert_eq!(args[5], "/book/audio/en/3.m4a");
        assert_eq!(arg_after(&args, "-c:v"), "libx264");
        assert_eq!(args.last().unwrap(), "/work/segment3.mp4");

        let maps: Vec<&str> = args
            .iter()
            .enumerate()
            .filter(|(_, arg)| *arg == "-map")
            .map(|(i, _)| args[i + 1].as_str())
            .collect();
        assert_eq!(maps, vec!["[outv]", "1:a"]);
    }

    #[test]
    fn filter_graph_contains_zoom_ramp() {
        let config = RenderConfig::default();
        let compiler = FfmpegCompiler::new(&config);
        let graph = compiler.segment_filter_graph(&ramp(), None);

        assert!(graph.starts_with("[0:v]scale=w=1280:h=720:"));
        assert!(graph.contains("pad=1280:720:(ow-iw)/2:(oh-ih)/2"));
        assert!(graph.contains("scale=8000:-1"));
        assert!(graph.contains(&format!(
            "zoompan=z='zoom+{}':x=0:y=0:fps=25:d=100:s=1280x720",
            ramp().increment
        )));
        assert!(graph.contains("[v0];[v0]fps=25[vout];[vout]null[outv]"));
        assert!(!graph.contains("drawtext"));
    }

    #[test]
    fn burned_captions_use_drawtext_textfile() {
        let config = RenderConfig {
            font_file: Some("/fonts/Serif Bold.ttf".to_string()),
            ..RenderConfig::default()
        };
        let compiler = FfmpegCompiler::new(&config);
        let caption = PathBuf::from("/work/caption3.txt");
        let graph = compiler.segment_filter_graph(&ramp(), Some(&caption));

        assert!(graph.contains(
            "[vout]drawtext=textfile=/work/caption3.txt:expansion=none:fontfile=/fonts/Serif Bold.ttf:"
        ));
        assert!(graph.contains(
            ":fontcolor=white:fontsize=24:box=1:boxcolor=black@0.5:x=(w-text_w)/2:y=h-50[outv]"
        ));
    }

    #[test]
    fn concat_with_subtitles_muxes_tagged_track() {
        let config = RenderConfig::default();
        let compiler = FfmpegCompiler::new(&config);
        let subtitles = SubtitleInput {
            path: Path::new("/book/en.srt"),
            language_tag: "eng",
        };

        let args = compiler.concat_args(
            Path::new("/work/list.txt"),
            Some(&subtitles),
            Path::new("/book/videos/en.mp4"),
        );

        assert_eq!(arg_after(&args, "-f"), "concat");
        assert_eq!(arg_after(&args, "-safe"), "0");
        assert_eq!(arg_after(&args, "-c"), "copy");
        assert_eq!(arg_after(&args, "-c:s"), "mov_text");
        assert_eq!(arg_after(&args, "-metadata:s:s:0"), "language=eng");
        assert!(args.contains(&"1:s".to_string()));
        assert!(args.contains(&"/book/en.srt".to_string()));
        assert_eq!(args.last().unwrap(), "/book/videos/en.mp4");
    }

    #[test]
    fn concat_without_subtitles_has_single_input() {
        let config = RenderConfig::default();
        let compiler = FfmpegCompiler::new(&config);
        let args = compiler.concat_args(
            Path::new("/work/list.txt"),
            None,
            Path::new("/book/videos/en.mp4"),
        );

        assert_eq!(args.iter().filter(|arg| *arg == "-i").count(), 1);
        assert!(!args.iter().any(|arg| arg.starts_with("-c:s")));
        assert!(!args.contains(&"1:s".to_string()));
    }
}
