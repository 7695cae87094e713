pub mod check;
pub(crate) mod report;
mod segment;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use indicatif::ProgressBar;

use super::captions::load_captions;
use super::config::RenderConfig;
use super::ffmpeg::{DurationProbe, FfmpegCompiler, FfmpegRunner, SubtitleInput};
use super::language::subtitle_language_tag;
use super::layout::{BookLayout, NarrationTrack, TrackListing};
use super::manifest::ConcatManifest;
use super::srt::SubtitleTrack;
use super::workspace::SegmentWorkspace;
use crate::common::progress::segment_progress;
use crate::ui::prelude::{Level, emit};

use segment::{prepare_segment, render_segment};

#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Re-render languages whose video already exists
    pub force: bool,
    /// Print ffmpeg commands instead of running them
    pub dry_run: bool,
    pub keep_temp: bool,
    pub verbose: bool,
    /// Only render these languages; empty means all
    pub languages: Vec<String>,
}

impl RenderOptions {
    fn wants_language(&self, language: &str) -> bool {
        self.languages.is_empty() || self.languages.iter().any(|l| l == language)
    }
}

/// Captions and narration tracks of one language.
#[derive(Debug, Clone)]
pub struct LanguageInputs {
    pub caption_path: PathBuf,
    pub captions: Vec<String>,
    pub listing: TrackListing,
}

impl LanguageInputs {
    pub fn load(layout: &BookLayout, language: &str, config: &RenderConfig) -> Result<Self> {
        let caption_path = layout.caption_path(language).with_context(|| {
            format!(
                "No caption file for language {language} (expected {})",
                layout.root().join(language).display()
            )
        })?;
        let captions = load_captions(&caption_path, config.caption_format)?;
        let listing = layout.narration_tracks(language, &config.audio_extension)?;

        Ok(Self {
            caption_path,
            captions,
            listing,
        })
    }

    /// Tracks paired with captions by position; the shorter list wins.
    pub fn pairs(&self) -> impl Iterator<Item = (&NarrationTrack, &str)> {
        self.listing
            .tracks
            .iter()
            .zip(self.captions.iter().map(String::as_str))
    }

    pub fn segment_count(&self) -> usize {
        self.listing.tracks.len().min(self.captions.len())
    }

    pub fn counts_match(&self) -> bool {
        self.listing.tracks.len() == self.captions.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LanguageOutcome {
    Rendered {
        output: PathBuf,
        segments: usize,
        skipped: usize,
        duration: Duration,
    },
    /// Output existed and `force` was not set
    Existing { output: PathBuf },
}

#[derive(Debug, Clone, Default)]
pub struct BookSummary {
    pub title: String,
    pub rendered: Vec<String>,
    pub existing: Vec<String>,
    pub failed: Vec<(String, String)>,
    pub segments_rendered: usize,
    pub segments_skipped: usize,
    pub duration: Duration,
}

impl BookSummary {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

pub struct BookRenderer<'a> {
    config: &'a RenderConfig,
    options: &'a RenderOptions,
    runner: &'a dyn FfmpegRunner,
    probe: &'a dyn DurationProbe,
}

impl<'a> BookRenderer<'a> {
    pub fn new(
        config: &'a RenderConfig,
        options: &'a RenderOptions,
        runner: &'a dyn FfmpegRunner,
        probe: &'a dyn DurationProbe,
    ) -> Self {
        Self {
            config,
            options,
            runner,
            probe,
        }
    }

    /// Render every language of `layout`. Failures of one language are
    /// recorded in the summary and do not stop the others.
    pub fn render_book(&self, layout: &BookLayout) -> Result<BookSummary> {
        let mut summary = BookSummary {
            title: layout.title(),
            ..BookSummary::default()
        };

        let languages: Vec<String> = layout
            .languages()?
            .into_iter()
            .filter(|language| self.options.wants_language(language))
            .collect();

        if languages.is_empty() {
            emit(
                Level::Warn,
                "book.render.no_languages",
                &format!(
                    "No languages to render in {} (looked in {})",
                    summary.title,
                    layout.audio_dir().display()
                ),
                None,
            );
            return Ok(summary);
        }

        if !self.options.dry_run {
            let videos_dir = layout.videos_dir();
            fs::create_dir_all(&videos_dir).with_context(|| {
                format!("Failed to create videos directory {}", videos_dir.display())
            })?;
        }

        for language in languages {
            match self.render_language(layout, &language) {
                Ok(LanguageOutcome::Rendered {
                    output,
                    segments,
                    skipped,
                    duration,
                }) => {
                    emit(
                        Level::Success,
                        "book.render.language_done",
                        &format!(
                            "Video for language {language} successfully created: {}",
                            output.display()
                        ),
                        Some(serde_json::json!({
                            "book": summary.title,
                            "language": language,
                            "output": output,
                            "segments": segments,
                            "skipped": skipped,
                            "seconds": duration.as_secs_f64(),
                        })),
                    );
                    summary.segments_rendered += segments;
                    summary.segments_skipped += skipped;
                    summary.duration += duration;
                    summary.rendered.push(language);
                }
                Ok(LanguageOutcome::Existing { output }) => {
                    emit(
                        Level::Info,
                        "book.render.language_exists",
                        &format!(
                            "Video for language {language} already exists ({}). Skipping...",
                            output.display()
                        ),
                        None,
                    );
                    summary.existing.push(language);
                }
                Err(err) => {
                    emit(
                        Level::Error,
                        "book.render.language_failed",
                        &format!("Failed to render language {language}: {err:#}"),
                        None,
                    );
                    summary.failed.push((language, format!("{err:#}")));
                }
            }
        }

        Ok(summary)
    }

    pub fn render_language(&self, layout: &BookLayout, language: &str) -> Result<LanguageOutcome> {
        let output = layout.output_path(language);
        if output.exists() && !self.options.force {
            return Ok(LanguageOutcome::Existing { output });
        }

        emit(
            Level::Info,
            "book.render.language_start",
            &format!("Processing language: {language}"),
            None,
        );

        let inputs = LanguageInputs::load(layout, language, self.config)?;
        warn_about_inputs(language, &inputs);

        if inputs.segment_count() == 0 {
            bail!(
                "No segments to render ({} narration track(s), {} caption(s))",
                inputs.listing.tracks.len(),
                inputs.captions.len()
            );
        }

        let workspace_parent = if self.options.dry_run {
            std::env::temp_dir()
        } else {
            layout.videos_dir()
        };
        let workspace = SegmentWorkspace::create_in(&workspace_parent, language)?;

        let progress = segment_progress(
            inputs.segment_count() as u64,
            language,
            self.options.verbose,
        );
        let (subtitles, manifest, skipped) =
            self.render_segments(layout, language, &inputs, &workspace, &progress);
        progress.finish_and_clear();

        if manifest.is_empty() {
            bail!("None of the {} segment(s) could be rendered", inputs.segment_count());
        }

        self.concat(layout, language, &workspace, &manifest, &subtitles, &output)?;

        if self.options.keep_temp {
            let kept = workspace.keep();
            emit(
                Level::Info,
                "book.render.workspace_kept",
                &format!("Kept segment workspace at {}", kept.display()),
                None,
            );
        }

        Ok(LanguageOutcome::Rendered {
            output,
            segments: manifest.len(),
            skipped,
            duration: subtitles.end(),
        })
    }

    fn render_segments(
        &self,
        layout: &BookLayout,
        language: &str,
        inputs: &LanguageInputs,
        workspace: &SegmentWorkspace,
        progress: &ProgressBar,
    ) -> (SubtitleTrack, ConcatManifest, usize) {
        let mut subtitles = SubtitleTrack::new();
        let mut manifest = ConcatManifest::new();
        let mut skipped = 0usize;

        for (position, (track, caption)) in inputs.pairs().enumerate() {
            let rendered = prepare_segment(layout, self.config, self.probe, track).and_then(
                |segment| {
                    render_segment(self.config, self.runner, workspace, position, &segment, caption)
                        .map(|path| (segment, path))
                },
            );

            match rendered {
                Ok((segment, path)) => {
                    subtitles.push(segment.duration, caption);
                    manifest.push(path);
                }
                Err(skip) => {
                    skipped += 1;
                    progress.suspend(|| {
                        emit(
                            Level::Warn,
                            "book.render.segment_skipped",
                            &format!(
                                "Skipping segment {} in language {language}: {skip}",
                                track.number
                            ),
                            None,
                        )
                    });
                }
            }
            progress.inc(1);
        }

        (subtitles, manifest, skipped)
    }

    fn concat(
        &self,
        layout: &BookLayout,
        language: &str,
        workspace: &SegmentWorkspace,
        manifest: &ConcatManifest,
        subtitles: &SubtitleTrack,
        output: &Path,
    ) -> Result<()> {
        let manifest_path = workspace.manifest_path();
        manifest.write_to(&manifest_path)?;

        let subtitle_path = layout.subtitle_path(language);
        let language_tag = subtitle_language_tag(language);
        let subtitle_input = if self.config.caption_mode.muxes_track() {
            if self.options.dry_run {
                emit(
                    Level::Info,
                    "book.render.subtitles_dry_run",
                    &format!(
                        "Would write {} subtitle(s) to {}",
                        subtitles.len(),
                        subtitle_path.display()
                    ),
                    None,
                );
            } else {
                subtitles.write_to(&subtitle_path)?;
            }
            Some(SubtitleInput {
                path: &subtitle_path,
                language_tag: &language_tag,
            })
        } else {
            None
        };

        let args =
            FfmpegCompiler::new(self.config).concat_args(&manifest_path, subtitle_input.as_ref(), output);

        if let Err(err) = self.runner.run(&args) {
            if !self.options.dry_run && output.exists() {
                let _ = fs::remove_file(output);
            }
            return Err(err).with_context(|| format!("Failed to join segments into {}", output.display()));
        }

        Ok(())
    }
}

fn warn_about_inputs(language: &str, inputs: &LanguageInputs) {
    for path in &inputs.listing.ignored {
        emit(
            Level::Warn,
            "book.render.unnumbered_audio",
            &format!(
                "Ignoring {} in language {language}: file name is not a segment number",
                path.display()
            ),
            None,
        );
    }

    for path in &inputs.listing.duplicates {
        emit(
            Level::Warn,
            "book.render.duplicate_audio",
            &format!(
                "Ignoring {} in language {language}: another narration track has the same number",
                path.display()
            ),
            None,
        );
    }

    if !inputs.counts_match() {
        emit(
            Level::Warn,
            "book.render.count_mismatch",
            &format!(
                "Language {language} has {} narration track(s) but {} caption(s) in {}; rendering {}",
                inputs.listing.tracks.len(),
                inputs.captions.len(),
                inputs.caption_path.display(),
                inputs.segment_count()
            ),
            None,
        );
    }
}

/// Subtitle track a render of `language` would produce, without rendering.
pub fn build_subtitle_track(
    layout: &BookLayout,
    language: &str,
    config: &RenderConfig,
    probe: &dyn DurationProbe,
) -> Result<SubtitleTrack> {
    let inputs = LanguageInputs::load(layout, language, config)?;
    warn_about_inputs(language, &inputs);

    let mut track = SubtitleTrack::new();
    for (narration, caption) in inputs.pairs() {
        match prepare_segment(layout, config, probe, narration) {
            Ok(segment) => {
                track.push(segment.duration, caption);
            }
            Err(skip) => emit(
                Level::Warn,
                "book.subtitles.segment_skipped",
                &format!("Skipping segment {}: {skip}", narration.number),
                None,
            ),
        }
    }

    if track.is_empty() {
        bail!("No subtitles could be built for language {language}");
    }
    Ok(track)
}
