use std::path::PathBuf;

use anyhow::Result;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use serde::Serialize;

use super::LanguageInputs;
use super::report::{ReportLine, format_duration};
use crate::book::config::RenderConfig;
use crate::book::ffmpeg::DurationProbe;
use crate::book::layout::BookLayout;
use crate::ui::prelude::Level;

/// Readiness of one language for rendering.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LanguageCheck {
    pub language: String,
    pub caption_file: Option<PathBuf>,
    pub captions: usize,
    pub tracks: usize,
    pub ignored_files: Vec<PathBuf>,
    /// Narration files sharing a number with another track
    pub duplicate_files: Vec<PathBuf>,
    pub missing_images: Vec<u32>,
    pub output_exists: bool,
    /// Total narration length; only filled when probing
    pub narration_seconds: Option<f64>,
    /// Issues that make the language fail to render
    pub problems: Vec<String>,
    /// Issues that cost segments but still produce a video
    pub warnings: Vec<String>,
}

impl LanguageCheck {
    pub fn is_ready(&self) -> bool {
        self.problems.is_empty()
    }

    fn status(&self) -> &'static str {
        if !self.is_ready() {
            "blocked"
        } else if !self.warnings.is_empty() {
            "warnings"
        } else if self.output_exists {
            "rendered"
        } else {
            "ready"
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BookCheck {
    pub title: String,
    pub root: PathBuf,
    pub languages: Vec<LanguageCheck>,
    pub problems: Vec<String>,
}

impl BookCheck {
    /// Inspect `layout` without rendering. With a `probe`, narration
    /// durations are read as well.
    pub fn run(
        layout: &BookLayout,
        config: &RenderConfig,
        probe: Option<&dyn DurationProbe>,
    ) -> Result<Self> {
        let mut check = BookCheck {
            title: layout.title(),
            root: layout.root().to_path_buf(),
            ..BookCheck::default()
        };

        let languages = layout.languages()?;
        if languages.is_empty() {
            check.problems.push(format!(
                "no language directories in {}",
                layout.audio_dir().display()
            ));
        }

        for language in languages {
            check
                .languages
                .push(check_language(layout, &language, config, probe));
        }

        Ok(check)
    }

    pub fn is_ready(&self) -> bool {
        self.problems.is_empty() && self.languages.iter().all(LanguageCheck::is_ready)
    }

    pub(crate) fn report_lines(&self) -> Vec<ReportLine> {
        let mut lines = Vec::new();

        for problem in &self.problems {
            lines.push(ReportLine::new(
                Level::Error,
                "book.check.problem",
                format!("{}: {problem}", self.title),
            ));
        }

        for language in &self.languages {
            for problem in &language.problems {
                lines.push(ReportLine::new(
                    Level::Error,
                    "book.check.problem",
                    format!("{} [{}]: {problem}", self.title, language.language),
                ));
            }
            for warning in &language.warnings {
                lines.push(ReportLine::new(
                    Level::Warn,
                    "book.check.warning",
                    format!("{} [{}]: {warning}", self.title, language.language),
                ));
            }
        }

        let (level, verdict) = if self.is_ready() {
            (Level::Success, "ready to render")
        } else {
            (Level::Error, "not ready")
        };
        let data = serde_json::to_value(self).ok();
        let mut summary = ReportLine::new(level, "book.check.summary", format!("{}: {verdict}", self.title));
        if let Some(data) = data {
            summary = summary.with_data(data);
        }
        lines.push(summary);

        lines
    }

    pub fn table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                "Language", "Captions", "Tracks", "Missing images", "Narration", "Status",
            ]);

        for language in &self.languages {
            let status_color = match language.status() {
                "blocked" => Color::Red,
                "warnings" => Color::Yellow,
                _ => Color::Green,
            };
            table.add_row(vec![
                Cell::new(&language.language),
                Cell::new(language.captions),
                Cell::new(language.tracks),
                Cell::new(language.missing_images.len()),
                Cell::new(
                    language
                        .narration_seconds
                        .map(format_duration)
                        .unwrap_or_else(|| "-".to_string()),
                ),
                Cell::new(language.status()).fg(status_color),
            ]);
        }

        table
    }
}

fn check_language(
    layout: &BookLayout,
    language: &str,
    config: &RenderConfig,
    probe: Option<&dyn DurationProbe>,
) -> LanguageCheck {
    let mut check = LanguageCheck {
        language: language.to_string(),
        output_exists: layout.output_path(language).exists(),
        ..LanguageCheck::default()
    };

    let inputs = match LanguageInputs::load(layout, language, config) {
        Ok(inputs) => inputs,
        Err(err) => {
            check.problems.push(format!("{err:#}"));
            return check;
        }
    };

    check.caption_file = Some(inputs.caption_path.clone());
    check.captions = inputs.captions.len();
    check.tracks = inputs.listing.tracks.len();
    check.ignored_files = inputs.listing.ignored.clone();
    check.duplicate_files = inputs.listing.duplicates.clone();

    if inputs.segment_count() == 0 {
        check.problems.push(format!(
            "nothing to render ({} caption(s), {} narration track(s))",
            check.captions, check.tracks
        ));
    } else if !inputs.counts_match() {
        check.warnings.push(format!(
            "{} caption(s) but {} narration track(s); only {} segment(s) will be rendered",
            check.captions,
            check.tracks,
            inputs.segment_count()
        ));
    }

    for path in &check.ignored_files {
        check
            .warnings
            .push(format!("{} is not named by a segment number", path.display()));
    }
    for path in &check.duplicate_files {
        check.warnings.push(format!(
            "{} repeats the number of another narration track and will be ignored",
            path.display()
        ));
    }

    let mut narration_seconds = 0.0;
    for (track, _) in inputs.pairs() {
        if layout
            .find_image(track.number, &config.image_extension)
            .is_none()
        {
            check.missing_images.push(track.number);
        }

        if let Some(probe) = probe {
            match probe.duration_seconds(&track.path) {
                Ok(seconds) => narration_seconds += seconds,
                Err(err) => check
                    .warnings
                    .push(format!("segment {} will be skipped: {err:#}", track.number)),
            }
        }
    }

    if !check.missing_images.is_empty() {
        let numbers: Vec<String> = check.missing_images.iter().map(u32::to_string).collect();
        check.warnings.push(format!(
            "missing image(s) for segment(s) {}; those segments will be skipped",
            numbers.join(", ")
        ));
    }

    if probe.is_some() {
        check.narration_seconds = Some(narration_seconds);
    }

    check
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use std::fs;
    use std::path::Path;

    struct ConstantProbe(f64);

    impl DurationProbe for ConstantProbe {
        fn duration_seconds(&self, path: &Path) -> Result<f64> {
            if path.to_string_lossy().contains("broken") {
                bail!("unreadable");
            }
            Ok(self.0)
        }
    }

    fn book(root: &Path, languages: &[(&str, &[u32], Option<&str>)], images: &[u32]) -> BookLayout {
        fs::create_dir_all(root.join("images")).unwrap();
        for n in images {
            fs::write(root.join(format!("images/{n}.jpg")), b"jpg").unwrap();
        }
        for (language, tracks, captions) in languages {
            let dir = root.join("audio").join(language);
            fs::create_dir_all(&dir).unwrap();
            for n in *tracks {
                fs::write(dir.join(format!("{n}.m4a")), b"m4a").unwrap();
            }
            if let Some(captions) = captions {
                fs::write(root.join(language), captions).unwrap();
            }
        }
        BookLayout::open(root).unwrap()
    }

    #[test]
    fn complete_book_is_ready() {
        let dir = tempfile::tempdir().unwrap();
        let layout = book(dir.path(), &[("en", &[0, 1], Some("a\n\nb\n"))], &[0, 1]);

        let check = BookCheck::run(&layout, &RenderConfig::default(), None).unwrap();
        assert!(check.is_ready());
        assert_eq!(check.languages[0].status(), "ready");
        assert_eq!(check.languages[0].narration_seconds, None);
    }

    #[test]
    fn missing_caption_file_blocks_language() {
        let dir = tempfile::tempdir().unwrap();
        let layout = book(
            dir.path(),
            &[("de", &[0], None), ("en", &[0], Some("a\n"))],
            &[0],
        );

        let check = BookCheck::run(&layout, &RenderConfig::default(), None).unwrap();
        assert!(!check.is_ready());
        assert!(!check.languages[0].is_ready());
        assert!(check.languages[1].is_ready());
    }

    #[test]
    fn mismatches_and_missing_images_are_warnings() {
        let dir = tempfile::tempdir().unwrap();
        let layout = book(dir.path(), &[("en", &[0, 1, 2], Some("a\n\nb\n"))], &[0]);

        let check = BookCheck::run(&layout, &RenderConfig::default(), None).unwrap();
        let en = &check.languages[0];
        assert!(en.is_ready());
        assert_eq!(en.missing_images, vec![1]);
        assert_eq!(en.warnings.len(), 2);
        assert_eq!(en.status(), "warnings");
    }

    #[test]
    fn uppercase_images_and_duplicate_tracks() {
        let dir = tempfile::tempdir().unwrap();
        let layout = book(dir.path(), &[("en", &[1, 2], Some("a\n\nb\n"))], &[]);
        fs::write(dir.path().join("images/1.JPG"), b"jpg").unwrap();
        fs::write(dir.path().join("images/2.jpg"), b"jpg").unwrap();
        fs::write(dir.path().join("audio/en/02.m4a"), b"m4a").unwrap();

        let check = BookCheck::run(&layout, &RenderConfig::default(), None).unwrap();
        let en = &check.languages[0];
        assert!(en.missing_images.is_empty());
        assert_eq!(en.tracks, 2);
        assert_eq!(en.duplicate_files.len(), 1);
        assert!(en.warnings[0].contains("02.m4a"));
    }

    #[test]
    fn probing_sums_narration() {
        let dir = tempfile::tempdir().unwrap();
        let layout = book(dir.path(), &[("en", &[0, 1], Some("a\n\nb\n"))], &[0, 1]);

        let probe = ConstantProbe(2.5);
        let check = BookCheck::run(&layout, &RenderConfig::default(), Some(&probe)).unwrap();
        assert_eq!(check.languages[0].narration_seconds, Some(5.0));
    }

    #[test]
    fn book_without_languages_is_not_ready() {
        let dir = tempfile::tempdir().unwrap();
        let layout = book(dir.path(), &[], &[]);

        let check = BookCheck::run(&layout, &RenderConfig::default(), None).unwrap();
        assert!(!check.is_ready());
        let lines = check.report_lines();
        assert_eq!(lines.last().unwrap().code, "book.check.summary");
        assert_eq!(lines.last().unwrap().level, Level::Error);
    }
}
