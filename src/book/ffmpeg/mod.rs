pub mod compiler;
pub mod probe;
pub mod services;
pub mod util;

pub use compiler::{FfmpegCompiler, SegmentJob, SubtitleInput};
pub use probe::{DurationProbe, FFMPEG, FFPROBE, FfprobeDurationProbe, ensure_tools};
pub use services::{DryRunRunner, FfmpegRunner, SystemFfmpegRunner};
