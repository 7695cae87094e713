use clap::{Args, Subcommand, ValueHint};
use std::path::PathBuf;

#[derive(Subcommand, Debug, Clone)]
pub enum BookCommands {
    /// Render every language of every book under a directory
    Render(RenderArgs),
    /// Render a single book directory
    Book(BookArgs),
    /// Validate book layouts without rendering anything
    Check(CheckArgs),
    /// Write only the subtitle track of one language
    Subtitles(SubtitlesArgs),
    /// Show the effective render configuration
    Config(ConfigArgs),
}

/// Options shared by `render` and `book`.
#[derive(Args, Debug, Clone, Default)]
pub struct RenderFlags {
    /// Re-render languages whose video already exists
    #[arg(long)]
    pub force: bool,

    /// Print the ffmpeg commands instead of running them
    #[arg(long)]
    pub dry_run: bool,

    /// Only render this language (repeatable)
    #[arg(short = 'l', long = "language", value_name = "LANG")]
    pub languages: Vec<String>,

    /// Keep the segment workspace instead of deleting it
    #[arg(long)]
    pub keep_temp: bool,

    /// Echo ffmpeg's own output
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Directory holding the books; defaults to the current directory
    #[arg(value_hint = ValueHint::DirPath)]
    pub root: Option<PathBuf>,

    #[command(flatten)]
    pub flags: RenderFlags,
}

#[derive(Args, Debug, Clone)]
pub struct BookArgs {
    /// Book directory (contains images/ and audio/)
    #[arg(value_hint = ValueHint::DirPath)]
    pub dir: PathBuf,

    #[command(flatten)]
    pub flags: RenderFlags,
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Directory holding the books; defaults to the current directory
    #[arg(value_hint = ValueHint::DirPath)]
    pub root: Option<PathBuf>,

    /// Also read narration durations with ffprobe
    #[arg(long)]
    pub probe: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SubtitlesArgs {
    /// Book directory
    #[arg(value_hint = ValueHint::DirPath)]
    pub dir: PathBuf,

    /// Language directory name under audio/
    #[arg(short = 'l', long)]
    pub language: String,

    /// Output file; defaults to <book>/<language>.srt
    #[arg(short = 'o', long = "out-file", value_hint = ValueHint::FilePath)]
    pub out_file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Only print the configuration file path
    #[arg(long)]
    pub path: bool,
}
