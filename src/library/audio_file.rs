use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::{LibraryError, TagError};
use crate::tags::{self, TagAccess, TagValues};
use crate::text::Sanitizer;

static TRACK_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+) *(.*)").expect("valid regex"));
static DISC_FOLDER: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"^cd\D*(\d+)").expect("valid regex"),
        Regex::new(r"^disc\D*(\d+)").expect("valid regex"),
    ]
});
static DISC_SUBFOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"cd.*\d|disc.*\d").expect("valid regex"));

fn lowercase_name(path: Option<&Path>) -> Option<String> {
    path.and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().to_lowercase())
}

/// Disc number implied by a `CD 2` / `Disc2` style parent folder.
pub fn disc_from_folder(path: &Path) -> Option<u32> {
    let parent = lowercase_name(path.parent())?;
    DISC_FOLDER
        .iter()
        .find_map(|re| re.captures(&parent))
        .and_then(|caps| caps[1].parse().ok())
}

/// Directory of the album owning `path`; disc sub-folders are skipped.
pub fn album_path_of(path: &Path) -> PathBuf {
    let parent = path.parent().unwrap_or_else(|| Path::new(""));
    match lowercase_name(Some(parent)) {
        Some(name) if DISC_SUBFOLDER.is_match(&name) => {
            parent.parent().unwrap_or(parent).to_path_buf()
        }
        _ => parent.to_path_buf(),
    }
}

/// One tagged audio file and the values derived from its tags, name and
/// folder.
pub struct AudioFile {
    pub path: PathBuf,
    tags: Box<dyn TagAccess>,
    /// 0 when unknown.
    pub track: u32,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub album_artist: Option<String>,
    pub disc: Option<u32>,
    pub has_album_art: bool,
}

impl AudioFile {
    /// Open `path` and derive every field.
    pub fn load(path: &Path, sanitizer: &Sanitizer) -> Result<Self, TagError> {
        let tags = tags::open(path)?;
        let mut file = Self {
            path: path.to_path_buf(),
            tags,
            track: 0,
            title: None,
            artist: None,
            album: None,
            album_artist: None,
            disc: None,
            has_album_art: false,
        };
        file.derive(sanitizer);
        Ok(file)
    }

    /// Re-open the file at its current path, discarding in-memory edits.
    pub fn reload(&mut self, sanitizer: &Sanitizer) -> Result<(), TagError> {
        self.tags = tags::open(&self.path)?;
        self.derive(sanitizer);
        Ok(())
    }

    fn derive(&mut self, sanitizer: &Sanitizer) {
        let name = self
            .path
            .file_name()
            .map(|n| sanitizer.display(&n.to_string_lossy(), false))
            .unwrap_or_default();
        let stem = self
            .path
            .file_stem()
            .map(|n| sanitizer.display(&n.to_string_lossy(), false))
            .unwrap_or_default();

        self.track = self
            .tags
            .track()
            .filter(|&n| n != 0)
            .or_else(|| {
                TRACK_PREFIX
                    .captures(&name)
                    .and_then(|caps| caps[1].parse().ok())
            })
            .unwrap_or(0);

        self.title = self.tags.title(sanitizer).or_else(|| {
            TRACK_PREFIX
                .captures(&stem)
                .map(|caps| caps[2].trim().to_string())
                .filter(|t| !t.is_empty())
        });

        self.disc = disc_from_folder(&self.path).or_else(|| self.tags.disc());
        self.artist = self.tags.artist(sanitizer);
        self.album = self.tags.album(sanitizer);
        self.album_artist = self.tags.album_artist(sanitizer);
        self.has_album_art = self.tags.has_album_art();
    }

    pub fn album_path(&self) -> PathBuf {
        album_path_of(&self.path)
    }

    /// File name including the extension.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// File name without the extension.
    pub fn file_stem(&self) -> String {
        self.path
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Lowercase extension with the leading dot, e.g. `.flac`.
    pub fn format(&self) -> String {
        format_of(&self.path)
    }

    pub fn has_all_tags(&self, check_disc: bool) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        self.track != 0
            && present(&self.title)
            && present(&self.artist)
            && present(&self.album)
            && present(&self.album_artist)
            && (!check_disc || self.disc.is_some_and(|d| d != 0))
    }

    /// Write the in-memory fields back to the file.
    pub fn save(&mut self) -> Result<(), TagError> {
        let values = TagValues {
            track: Some(self.track).filter(|&n| n != 0),
            title: self.title.clone(),
            artist: self.artist.clone(),
            album: self.album.clone(),
            album_artist: self.album_artist.clone(),
            disc: self.disc,
        };
        debug!("saving tags of {}", self.path.display());
        self.tags.save(&values)
    }

    /// Rename to `NN Title.ext` and re-load from the new path. Returns false
    /// when the name is already right.
    pub fn rename(&mut self, sanitizer: &Sanitizer) -> Result<bool, LibraryError> {
        let suffix = self
            .path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let title = self.title.as_deref().unwrap_or_default();
        let name = sanitizer.filesystem(&format!("{:02} {}{}", self.track, title, suffix), false);

        let parent = self.path.parent().unwrap_or_else(|| Path::new(""));
        let dst = parent.join(name);
        if dst == self.path {
            return Ok(false);
        }
        if dst.exists() {
            return Err(LibraryError::Exists(dst));
        }

        debug!("renaming {} to {}", self.path.display(), dst.display());
        fs::rename(&self.path, &dst)?;
        self.path = dst;
        self.reload(sanitizer)?;
        Ok(true)
    }

    /// Re-title every text field.
    pub fn capitalize(&mut self, sanitizer: &Sanitizer) {
        for field in [
            &mut self.title,
            &mut self.artist,
            &mut self.album,
            &mut self.album_artist,
        ] {
            if let Some(value) = field.as_mut() {
                *value = sanitizer.display(value, true);
            }
        }
    }

    /// Raw key/value pairs stored in the container.
    pub fn dump(&self) -> Vec<(String, String)> {
        self.tags.entries()
    }
}

/// Lowercase extension of `path` with the leading dot, or an empty string.
pub fn format_of(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}
