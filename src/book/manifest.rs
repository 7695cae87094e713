use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::ffmpeg::util::quote_concat_path;

/// Input list for ffmpeg's concat demuxer, one `file '<path>'` line per segment.
#[derive(Debug, Clone, Default)]
pub struct ConcatManifest {
    entries: Vec<PathBuf>,
}

impl ConcatManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, segment: PathBuf) {
        self.entries.push(segment);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|entry| format!("file {}\n", quote_concat_path(entry)))
            .collect()
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        fs::write(path, self.render())
            .with_context(|| format!("Failed to write concat manifest {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_segments_in_push_order() {
        let mut manifest = ConcatManifest::new();
        manifest.push(PathBuf::from("/work/segment0.mp4"));
        manifest.push(PathBuf::from("/work/segment2.mp4"));

        assert_eq!(
            manifest.render(),
            "file '/work/segment0.mp4'\nfile '/work/segment2.mp4'\n"
        );
        assert_eq!(manifest.len(), 2);
    }

    #[test]
    fn writes_manifest_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.txt");
        let mut manifest = ConcatManifest::new();
        manifest.push(dir.path().join("segment0.mp4"));
        manifest.write_to(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("file '"));
        assert!(written.trim_end().ends_with("segment0.mp4'"));
    }
}
