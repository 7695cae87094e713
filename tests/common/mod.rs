use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Scratch directory holding books, a config file and a private HOME.
pub struct TestEnvironment {
    temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        fs::create_dir_all(temp_dir.path().join("home"))?;
        fs::create_dir_all(temp_dir.path().join("library"))?;
        Ok(Self { temp_dir })
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn home(&self) -> PathBuf {
        self.path().join("home")
    }

    /// Directory books are created in
    pub fn library(&self) -> PathBuf {
        self.path().join("library")
    }

    pub fn config_path(&self) -> PathBuf {
        self.path().join("render.toml")
    }

    pub fn book(&self, name: &str) -> BookBuilder {
        BookBuilder {
            root: self.library().join(name),
        }
    }
}

/// Writes the files of a book layout.
pub struct BookBuilder {
    root: PathBuf,
}

impl BookBuilder {
    pub fn images(self, numbers: &[u32]) -> Result<Self> {
        let dir = self.root.join("images");
        fs::create_dir_all(&dir)?;
        for n in numbers {
            fs::write(dir.join(format!("{n}.jpg")), b"not really a jpeg")?;
        }
        Ok(self)
    }

    pub fn narration(self, language: &str, numbers: &[u32]) -> Result<Self> {
        let dir = self.root.join("audio").join(language);
        fs::create_dir_all(&dir)?;
        for n in numbers {
            fs::write(dir.join(format!("{n}.m4a")), b"not really audio")?;
        }
        Ok(self)
    }

    pub fn captions(self, language: &str, contents: &str) -> Result<Self> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.root.join(language), contents)?;
        Ok(self)
    }

    pub fn build(self) -> PathBuf {
        self.root
    }
}
