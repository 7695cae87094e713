use indicatif::{ProgressBar, ProgressStyle};

use crate::ui::prelude::{OutputFormat, get_output_format};

/// Progress bar over the segments of one language.
///
/// Hidden in JSON mode and when ffmpeg output is echoed, since both would
/// interleave with the bar.
pub fn segment_progress(total: u64, language: &str, verbose: bool) -> ProgressBar {
    if verbose || get_output_format() == OutputFormat::Json {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} {msg:>6} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} segments")
    {
        pb.set_style(style.progress_chars("█▉▊▋▌▍▎▏ "));
    }
    pb.set_message(language.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
