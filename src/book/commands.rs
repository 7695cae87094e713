use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use super::cli::{BookArgs, BookCommands, CheckArgs, ConfigArgs, RenderArgs, RenderFlags, SubtitlesArgs};
use super::config::RenderConfig;
use super::ffmpeg::{
    DryRunRunner, DurationProbe, FFMPEG, FFPROBE, FfmpegRunner, FfprobeDurationProbe, SystemFfmpegRunner,
    ensure_tools,
};
use super::layout::{BookLayout, discover_books};
use super::pipeline::check::BookCheck;
use super::pipeline::report::{emit_report, format_duration};
use super::pipeline::{BookRenderer, BookSummary, RenderOptions, build_subtitle_track};
use crate::common::config::DocumentedConfig;
use crate::ui::prelude::*;

pub fn handle_book_command(command: BookCommands, config_path: Option<&Path>) -> Result<()> {
    match command {
        BookCommands::Render(args) => handle_render(args, config_path),
        BookCommands::Book(args) => handle_book(args, config_path),
        BookCommands::Check(args) => handle_check(args, config_path),
        BookCommands::Subtitles(args) => handle_subtitles(args, config_path),
        BookCommands::Config(args) => handle_config(args, config_path),
    }
}

impl From<RenderFlags> for RenderOptions {
    fn from(flags: RenderFlags) -> Self {
        Self {
            force: flags.force,
            dry_run: flags.dry_run,
            keep_temp: flags.keep_temp,
            verbose: flags.verbose,
            languages: flags.languages,
        }
    }
}

fn root_or_cwd(root: Option<PathBuf>) -> Result<PathBuf> {
    match root {
        Some(root) => Ok(root),
        None => std::env::current_dir().context("Failed to determine current directory"),
    }
}

fn find_books(root: &Path) -> Result<Vec<BookLayout>> {
    let books = discover_books(root)?;
    if books.is_empty() {
        bail!(
            "No books found in {} (a book is a directory containing images/)",
            root.display()
        );
    }
    Ok(books)
}

fn handle_render(args: RenderArgs, config_path: Option<&Path>) -> Result<()> {
    let root = root_or_cwd(args.root)?;
    let books = find_books(&root)?;
    render_books(&books, args.flags.into(), config_path)
}

fn handle_book(args: BookArgs, config_path: Option<&Path>) -> Result<()> {
    let layout = BookLayout::open(&args.dir)?;
    render_books(&[layout], args.flags.into(), config_path)
}

fn render_books(books: &[BookLayout], options: RenderOptions, config_path: Option<&Path>) -> Result<()> {
    if options.dry_run {
        ensure_tools(&[FFPROBE])?;
    } else {
        ensure_tools(&[FFMPEG, FFPROBE])?;
    }

    let config = RenderConfig::load(config_path)?;
    let system_runner = SystemFfmpegRunner::new(options.verbose);
    let runner: &dyn FfmpegRunner = if options.dry_run {
        &DryRunRunner
    } else {
        &system_runner
    };
    let renderer = BookRenderer::new(&config, &options, runner, &FfprobeDurationProbe);

    let mut failed_languages = 0usize;
    let mut failed_books = 0usize;

    for layout in books {
        separator();
        emit(
            Level::Info,
            "book.render.book_start",
            &format!("Processing book: {}", layout.title()),
            Some(serde_json::json!({ "book": layout.root() })),
        );

        match renderer.render_book(layout) {
            Ok(summary) => {
                failed_languages += summary.failed.len();
                emit_book_summary(&summary);
            }
            Err(err) => {
                failed_books += 1;
                emit(
                    Level::Error,
                    "book.render.book_failed",
                    &format!("Failed to render {}: {err:#}", layout.title()),
                    None,
                );
            }
        }
    }

    if failed_books > 0 || failed_languages > 0 {
        bail!(
            "{failed_languages} language(s) and {failed_books} book(s) failed to render"
        );
    }
    Ok(())
}

fn emit_book_summary(summary: &BookSummary) {
    let level = if summary.has_failures() {
        Level::Warn
    } else {
        Level::Success
    };
    emit(
        level,
        "book.render.book_done",
        &format!(
            "{}: {} rendered, {} already present, {} failed ({} segment(s), {} skipped, {})",
            summary.title,
            summary.rendered.len(),
            summary.existing.len(),
            summary.failed.len(),
            summary.segments_rendered,
            summary.segments_skipped,
            format_duration(summary.duration.as_secs_f64())
        ),
        Some(serde_json::json!({
            "book": summary.title,
            "rendered": summary.rendered,
            "existing": summary.existing,
            "failed": summary.failed.iter().map(|(language, _)| language).collect::<Vec<_>>(),
            "segments": summary.segments_rendered,
            "skipped": summary.segments_skipped,
            "seconds": summary.duration.as_secs_f64(),
        })),
    );
}

fn handle_check(args: CheckArgs, config_path: Option<&Path>) -> Result<()> {
    let root = root_or_cwd(args.root)?;
    let books = find_books(&root)?;
    if args.probe {
        ensure_tools(&[FFPROBE])?;
    }

    let config = RenderConfig::load(config_path)?;
    let probe: Option<&dyn DurationProbe> = if args.probe {
        Some(&FfprobeDurationProbe)
    } else {
        None
    };
    let mut not_ready = 0usize;

    for layout in &books {
        let check = BookCheck::run(layout, &config, probe)?;

        if get_output_format() == OutputFormat::Text && !check.languages.is_empty() {
            separator();
            println!("{}", check.table());
        }
        emit_report(&check.report_lines());

        if !check.is_ready() {
            not_ready += 1;
        }
    }

    if not_ready > 0 {
        bail!("{not_ready} of {} book(s) cannot be rendered as they are", books.len());
    }
    Ok(())
}

fn handle_subtitles(args: SubtitlesArgs, config_path: Option<&Path>) -> Result<()> {
    let layout = BookLayout::open(&args.dir)?;
    ensure_tools(&[FFPROBE])?;
    let config = RenderConfig::load(config_path)?;

    let track = build_subtitle_track(&layout, &args.language, &config, &FfprobeDurationProbe)?;
    let out_file = args
        .out_file
        .unwrap_or_else(|| layout.subtitle_path(&args.language));
    track.write_to(&out_file)?;

    emit(
        Level::Success,
        "book.subtitles.written",
        &format!(
            "Wrote {} subtitle(s) ({}) to {}",
            track.len(),
            format_duration(track.end().as_secs_f64()),
            out_file.display()
        ),
        Some(serde_json::json!({
            "language": args.language,
            "output": out_file,
            "cues": track.len(),
        })),
    );
    Ok(())
}

fn handle_config(args: ConfigArgs, config_path: Option<&Path>) -> Result<()> {
    let path = RenderConfig::resolve_path(config_path)?;

    if args.path {
        emit(
            Level::Info,
            "book.config.path",
            &path.display().to_string(),
            Some(serde_json::json!({ "path": path })),
        );
        return Ok(());
    }

    let config = RenderConfig::load(Some(&path))?;
    match get_output_format() {
        OutputFormat::Json => emit(
            Level::Info,
            "book.config.show",
            &format!("Render configuration from {}", path.display()),
            serde_json::to_value(&config).ok(),
        ),
        OutputFormat::Text => {
            println!("# {}", path.display());
            println!("{}", config.to_documented_toml());
        }
    }
    Ok(())
}
