use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::Context;
use super::audio_file::{AudioFile, format_of};
use super::destination::{CopyTarget, album_destination};
use crate::error::LibraryError;

static ARTIST_DASH_ALBUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?) - (.*)").expect("valid regex"));

fn contains_format(formats: &[String], format: &str) -> bool {
    formats.iter().any(|f| f.eq_ignore_ascii_case(format))
}

/// Which readiness checks an album passes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Readiness {
    pub has_all_tags: bool,
    pub has_album_art: bool,
    pub no_unwanted_files: bool,
    pub not_in_library: bool,
    pub one_format: bool,
    pub all_readable: bool,
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        self.has_all_tags
            && self.has_album_art
            && self.no_unwanted_files
            && self.not_in_library
            && self.one_format
            && self.all_readable
    }

    /// Human readable list of failed checks.
    pub fn warnings(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if !self.all_readable {
            out.push("Unreadable files found");
        }
        if !self.one_format {
            out.push("Multiple formats found");
        }
        if !self.no_unwanted_files {
            out.push("Unwanted files are found");
        }
        if !self.not_in_library {
            out.push("Found in library");
        }
        if !self.has_all_tags {
            out.push("Missing required tags");
        }
        if !self.has_album_art {
            out.push("Missing album art");
        }
        out
    }
}

/// The audio files found under one album directory.
pub struct Album {
    path: PathBuf,
    ctx: Arc<Context>,
    copy_target: CopyTarget,
    contents: Vec<AudioFile>,
    discs: BTreeMap<u32, Vec<usize>>,
    tracks: HashMap<(u32, u32), usize>,
    unreadable: Vec<PathBuf>,
}

impl Album {
    pub fn new(path: PathBuf, ctx: Arc<Context>, copy_target: CopyTarget) -> Self {
        Self {
            path,
            ctx,
            copy_target,
            contents: Vec::new(),
            discs: BTreeMap::new(),
            tracks: HashMap::new(),
            unreadable: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn folder_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn copy_target(&self) -> CopyTarget {
        self.copy_target
    }

    pub fn context(&self) -> &Arc<Context> {
        &self.ctx
    }

    pub fn files(&self) -> &[AudioFile] {
        &self.contents
    }

    /// Mutable access to the files. Call [`Album::reindex`] after changing
    /// track or disc numbers.
    pub fn files_mut(&mut self) -> &mut [AudioFile] {
        &mut self.contents
    }

    pub fn add_track(&mut self, file: AudioFile) {
        if file.format() == ".dsf" {
            self.copy_target = CopyTarget::Dsd;
        }
        let index = self.contents.len();
        self.index_file(index, &file);
        self.contents.push(file);
    }

    fn index_file(&mut self, index: usize, file: &AudioFile) {
        let disc = file.disc.unwrap_or(1);
        self.discs.entry(disc).or_default().push(index);
        self.tracks.insert((disc, file.track), index);
    }

    /// Rebuild the disc buckets and the `(disc, track)` map from the files.
    pub fn reindex(&mut self) {
        self.discs.clear();
        self.tracks.clear();
        let files = std::mem::take(&mut self.contents);
        for (index, file) in files.iter().enumerate() {
            self.index_file(index, file);
        }
        self.contents = files;
    }

    pub fn get_track_mut(&mut self, disc: u32, track: u32) -> Option<&mut AudioFile> {
        let index = *self.tracks.get(&(disc, track))?;
        self.contents.get_mut(index)
    }

    pub fn disc_count(&self) -> usize {
        self.discs.len()
    }

    /// Files of every disc bucket, sorted by track number.
    pub fn discs(&self) -> Vec<(u32, Vec<&AudioFile>)> {
        self.discs
            .iter()
            .map(|(&disc, indices)| {
                let mut files: Vec<&AudioFile> = indices.iter().map(|&i| &self.contents[i]).collect();
                files.sort_by_key(|f| f.track);
                (disc, files)
            })
            .collect()
    }

    pub fn album_artist_from_path(&self) -> Option<String> {
        ARTIST_DASH_ALBUM
            .captures(&self.folder_name())
            .map(|caps| caps[1].to_string())
    }

    pub fn album_name_from_path(&self) -> Option<String> {
        ARTIST_DASH_ALBUM
            .captures(&self.folder_name())
            .map(|caps| caps[2].to_string())
    }

    /// Consensus album name: the single distinct value, else the folder's
    /// album part, else the common prefix of the distinct values.
    pub fn album_name(&self) -> Option<String> {
        let names: BTreeSet<&str> = self.contents.iter().filter_map(|f| f.album.as_deref()).collect();
        match names.len() {
            0 => None,
            1 => names.into_iter().next().map(str::to_string),
            _ => self
                .album_name_from_path()
                .or_else(|| common_prefix(names.into_iter())),
        }
    }

    /// Consensus album artist: the value every file agrees on, else the
    /// folder's artist part.
    pub fn album_artist(&self) -> Option<String> {
        let artists: BTreeSet<Option<&str>> = self.contents.iter().map(|f| f.album_artist.as_deref()).collect();
        match artists.into_iter().collect::<Vec<_>>().as_slice() {
            [Some(artist)] if !artist.is_empty() => Some(artist.to_string()),
            _ => self.album_artist_from_path(),
        }
    }

    pub fn has_all_tags(&self) -> bool {
        let check_disc = self.disc_count() > 1;
        self.contents.iter().all(|f| f.has_all_tags(check_disc))
    }

    pub fn has_album_art(&self) -> bool {
        self.contents.iter().all(|f| f.has_album_art)
    }

    /// Files whose extension is neither allowed nor supported, recursively.
    pub fn unwanted_files(&self) -> Vec<PathBuf> {
        let cleanup = &self.ctx.settings.cleanup;
        WalkDir::new(&self.path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| {
                let format = format_of(p);
                !contains_format(&cleanup.allowed_formats, &format)
                    && !contains_format(&cleanup.supported_formats, &format)
            })
            .collect()
    }

    pub fn no_unwanted_files(&self) -> bool {
        self.unwanted_files().is_empty()
    }

    /// Delete `files`, then every folder left empty under the album.
    pub fn remove_files(&self, files: &[PathBuf]) -> Result<(), LibraryError> {
        for file in files {
            debug!("removing {}", file.display());
            fs::remove_file(file)?;
        }

        let mut folders: Vec<PathBuf> = WalkDir::new(&self.path)
            .min_depth(1)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_dir())
            .map(|e| e.into_path())
            .collect();
        // Deepest first so parents empty out before they are checked.
        folders.sort_by_key(|p| std::cmp::Reverse(p.components().count()));
        for folder in folders {
            if fs::read_dir(&folder)?.next().is_none() {
                fs::remove_dir(&folder)?;
            }
        }
        Ok(())
    }

    pub fn contain_one_format(&self) -> bool {
        let supported = &self.ctx.settings.cleanup.supported_formats;
        let formats: BTreeSet<String> = self
            .contents
            .iter()
            .map(AudioFile::format)
            .filter(|f| contains_format(supported, f))
            .collect();
        formats.len() == 1
    }

    /// Where the album lands in the library, once artist and name are known.
    pub fn destination(&self) -> Option<PathBuf> {
        let sanitizer = &self.ctx.sanitizer;
        let artist = sanitizer.filesystem(&self.album_artist()?, false);
        let name = sanitizer.filesystem(&self.album_name()?, false);
        let folder = format!("{artist} - {name}");
        Some(album_destination(
            &self.ctx.settings.library.location,
            self.copy_target,
            &artist,
            &folder,
        ))
    }

    pub fn not_in_library(&self) -> bool {
        self.destination().is_none_or(|dst| !dst.exists())
    }

    pub fn readiness(&self) -> Readiness {
        Readiness {
            has_all_tags: self.has_all_tags(),
            has_album_art: self.has_album_art(),
            no_unwanted_files: self.no_unwanted_files(),
            not_in_library: self.not_in_library(),
            one_format: self.contain_one_format(),
            all_readable: self.unreadable.is_empty(),
        }
    }

    pub fn ready_to_copy(&self) -> bool {
        self.readiness().is_ready()
    }

    /// Push the consensus name and artist (and the bucket disc numbers when
    /// any file carries one) into every file and write the tags.
    pub fn save(&mut self) -> Result<(), LibraryError> {
        let name = self.album_name();
        let artist = self.album_artist();
        let explicit_disc = self.contents.iter().any(|f| f.disc.is_some());

        for (&disc, indices) in &self.discs {
            for &i in indices {
                let file = &mut self.contents[i];
                file.album = name.clone();
                file.album_artist = artist.clone();
                if explicit_disc {
                    file.disc = Some(disc);
                }
                file.save()?;
            }
        }
        Ok(())
    }

    /// Re-load every supported file under the album directory. A file that
    /// can no longer be read keeps the album from being ready and is
    /// returned as an error once the readable files are loaded.
    pub fn refresh(&mut self) -> Result<(), LibraryError> {
        let supported = &self.ctx.settings.cleanup.supported_formats;
        let mut contents = Vec::new();
        let mut unreadable = Vec::new();
        let mut first_error = None;
        for entry in WalkDir::new(&self.path).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() || !contains_format(supported, &format_of(entry.path())) {
                continue;
            }
            match AudioFile::load(entry.path(), &self.ctx.sanitizer) {
                Ok(file) => contents.push(file),
                Err(e) => {
                    warn!("unreadable {}: {e}", entry.path().display());
                    unreadable.push(entry.path().to_path_buf());
                    first_error.get_or_insert(e);
                }
            }
        }

        self.contents.clear();
        self.reindex();
        for file in contents {
            self.add_track(file);
        }
        self.unreadable = unreadable;
        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    /// Rename every file to `NN Title.ext`, then the folder to
    /// `Artist - Album`, then reload.
    pub fn rename(&mut self) -> Result<(), LibraryError> {
        for file in &mut self.contents {
            if let Err(e) = file.rename(&self.ctx.sanitizer) {
                warn!("{e}");
            }
        }

        let sanitizer = &self.ctx.sanitizer;
        let artist = self.album_artist().ok_or(LibraryError::MissingField("Album artist"))?;
        let name = self.album_name().ok_or(LibraryError::MissingField("Album name"))?;
        let folder = format!(
            "{} - {}",
            sanitizer.filesystem(&artist, false),
            sanitizer.filesystem(&name, false)
        );
        let parent = self.path.parent().unwrap_or_else(|| Path::new(""));
        let dst = parent.join(folder);

        if dst != self.path {
            if dst.exists() {
                return Err(LibraryError::Exists(dst));
            }
            debug!("renaming {} to {}", self.path.display(), dst.display());
            fs::rename(&self.path, &dst)?;
            self.path = dst;
        }
        self.refresh()
    }

    /// Number tracks 1..N per disc bucket (or over the whole album when it
    /// has a single disc) in their current track order.
    pub fn renumber_tracks(&mut self) {
        let groups: Vec<Vec<usize>> = if self.disc_count() > 1 {
            self.discs.values().cloned().collect()
        } else {
            vec![(0..self.contents.len()).collect()]
        };

        for mut group in groups {
            group.sort_by_key(|&i| self.contents[i].track);
            for (n, i) in group.into_iter().enumerate() {
                self.contents[i].track = n as u32 + 1;
            }
        }
        self.reindex();
    }

    /// Remove the album directory and everything in it.
    pub fn delete(&self) -> Result<(), LibraryError> {
        fs::remove_dir_all(&self.path)?;
        Ok(())
    }

    /// Move the album directory into `dir`, creating it when needed.
    pub fn move_into(&mut self, dir: &Path) -> Result<(), LibraryError> {
        fs::create_dir_all(dir)?;
        let dst = dir.join(self.folder_name());
        if dst.exists() {
            return Err(LibraryError::Exists(dst));
        }
        fs::rename(&self.path, &dst)?;
        self.path = dst;
        self.refresh()
    }
}

/// Longest common character prefix, trimmed; `None` when empty.
pub(crate) fn common_prefix<'a>(mut values: impl Iterator<Item = &'a str>) -> Option<String> {
    let first = values.next()?;
    let mut len = first.chars().count();
    for value in values {
        len = first
            .chars()
            .zip(value.chars())
            .take(len)
            .take_while(|(a, b)| a == b)
            .count();
    }
    let prefix: String = first.chars().take(len).collect();
    let prefix = prefix.trim();
    (!prefix.is_empty()).then(|| prefix.to_string())
}
