use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use walkdir::WalkDir;

pub const IMAGES_DIR: &str = "images";
pub const AUDIO_DIR: &str = "audio";
pub const VIDEOS_DIR: &str = "videos";

/// A book directory:
///
/// ```text
/// <book>/images/<n>.jpg
/// <book>/audio/<lang>/<n>.m4a
/// <book>/<lang>              caption file
/// <book>/<lang>.srt          generated subtitle track
/// <book>/videos/<lang>.mp4   generated video
/// ```
#[derive(Debug, Clone)]
pub struct BookLayout {
    root: PathBuf,
}

/// One narration file, numbered by its file stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrationTrack {
    pub number: u32,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct TrackListing {
    /// Tracks ordered by number
    pub tracks: Vec<NarrationTrack>,
    /// Files with the audio extension whose stem is not a number
    pub ignored: Vec<PathBuf>,
    /// Files whose number is already taken by another track (`01` next to `1`)
    pub duplicates: Vec<PathBuf>,
}

impl BookLayout {
    pub fn open(root: &Path) -> Result<Self> {
        if !root.join(IMAGES_DIR).is_dir() {
            bail!(
                "{} is not a book directory (missing {}/)",
                root.display(),
                IMAGES_DIR
            );
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn is_book_dir(path: &Path) -> bool {
        path.is_dir() && path.join(IMAGES_DIR).is_dir()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn title(&self) -> String {
        self.root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.root.display().to_string())
    }

    pub fn images_dir(&self) -> PathBuf {
        self.root.join(IMAGES_DIR)
    }

    pub fn audio_dir(&self) -> PathBuf {
        self.root.join(AUDIO_DIR)
    }

    pub fn videos_dir(&self) -> PathBuf {
        self.root.join(VIDEOS_DIR)
    }

    /// Language names, i.e. the subdirectories of `audio/`, sorted by name.
    pub fn languages(&self) -> Result<Vec<String>> {
        let audio_dir = self.audio_dir();
        if !audio_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut languages = Vec::new();
        for entry in WalkDir::new(&audio_dir).min_depth(1).max_depth(1) {
            let entry = entry
                .with_context(|| format!("Failed to list languages in {}", audio_dir.display()))?;
            if entry.file_type().is_dir() {
                languages.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        languages.sort();
        Ok(languages)
    }

    pub fn language_dir(&self, language: &str) -> PathBuf {
        self.audio_dir().join(language)
    }

    /// The caption file for `language`: `<book>/<lang>`, or `<book>/<lang>.txt`.
    pub fn caption_path(&self, language: &str) -> Option<PathBuf> {
        [
            self.root.join(language),
            self.root.join(format!("{language}.txt")),
        ]
        .into_iter()
        .find(|candidate| candidate.is_file())
    }

    pub fn subtitle_path(&self, language: &str) -> PathBuf {
        self.root.join(format!("{language}.srt"))
    }

    pub fn output_path(&self, language: &str) -> PathBuf {
        self.videos_dir().join(format!("{language}.mp4"))
    }

    pub fn image_path(&self, number: u32, extension: &str) -> PathBuf {
        self.images_dir().join(format!("{number}.{extension}"))
    }

    /// The image of segment `number`, accepting the extension as configured,
    /// lowercase or uppercase (`0.JPG` for `jpg`).
    pub fn find_image(&self, number: u32, extension: &str) -> Option<PathBuf> {
        let mut candidates = vec![
            extension.to_string(),
            extension.to_ascii_lowercase(),
            extension.to_ascii_uppercase(),
        ];
        candidates.dedup();

        candidates
            .iter()
            .map(|ext| self.image_path(number, ext))
            .find(|path| path.is_file())
    }

    /// Narration tracks of `language` in numeric order (`2` before `10`).
    pub fn narration_tracks(&self, language: &str, extension: &str) -> Result<TrackListing> {
        let dir = self.language_dir(language);
        let mut listing = TrackListing::default();

        for entry in WalkDir::new(&dir).min_depth(1).max_depth(1) {
            let entry = entry
                .with_context(|| format!("Failed to list narration in {}", dir.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.into_path();
            let matches_extension = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
            if !matches_extension {
                continue;
            }

            match path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| stem.parse::<u32>().ok())
            {
                Some(number) => listing.tracks.push(NarrationTrack { number, path }),
                None => listing.ignored.push(path),
            }
        }

        // The plainly spelled stem wins over zero-padded ones for the same number
        listing.tracks.sort_by(|a, b| {
            (a.number, !is_plain_stem(a), &a.path).cmp(&(b.number, !is_plain_stem(b), &b.path))
        });
        let mut tracks: Vec<NarrationTrack> = Vec::with_capacity(listing.tracks.len());
        for track in listing.tracks.drain(..) {
            match tracks.last() {
                Some(previous) if previous.number == track.number => {
                    listing.duplicates.push(track.path)
                }
                _ => tracks.push(track),
            }
        }
        listing.tracks = tracks;
        listing.ignored.sort();
        Ok(listing)
    }
}

fn is_plain_stem(track: &NarrationTrack) -> bool {
    track
        .path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .is_some_and(|stem| stem == track.number.to_string())
}

/// Books under `root`: its immediate subdirectories that contain `images/`,
/// sorted by name. A `root` that is itself a book is returned alone.
pub fn discover_books(root: &Path) -> Result<Vec<BookLayout>> {
    if !root.is_dir() {
        bail!("{} is not a directory", root.display());
    }

    if BookLayout::is_book_dir(root) {
        return Ok(vec![BookLayout::open(root)?]);
    }

    let mut books = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to list books in {}", root.display()))?;
        if entry.file_type().is_dir() && BookLayout::is_book_dir(entry.path()) {
            books.push(BookLayout::open(entry.path())?);
        }
    }
    Ok(books)
}
