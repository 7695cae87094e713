use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

/// Scratch directory for one language: segment clips, caption text files and
/// the concat manifest. Removed on drop unless [`keep`](Self::keep) is called.
pub struct SegmentWorkspace {
    dir: TempDir,
}

impl SegmentWorkspace {
    /// Create the workspace inside `parent` so segments sit on the same disk
    /// as the final video.
    pub fn create_in(parent: &Path, language: &str) -> Result<Self> {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        let dir = tempfile::Builder::new()
            .prefix(&format!(".bookreel-{language}-"))
            .tempdir_in(parent)
            .with_context(|| format!("Failed to create segment workspace in {}", parent.display()))?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn segment_path(&self, position: usize) -> PathBuf {
        self.path().join(format!("segment{position}.mp4"))
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.path().join("list.txt")
    }

    pub fn write_caption(&self, position: usize, text: &str) -> Result<PathBuf> {
        let path = self.path().join(format!("caption{position}.txt"));
        fs::write(&path, text.trim())
            .with_context(|| format!("Failed to write caption file {}", path.display()))?;
        Ok(path)
    }

    /// Keep the directory on disk and return its path.
    pub fn keep(self) -> PathBuf {
        self.dir.keep()
    }
}
