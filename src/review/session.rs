use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::{Arc, LazyLock};

use regex::{Captures, Regex};
use tracing::{debug, info};

use super::command::{self, Command};
use super::range::Selection;
use crate::error::LibraryError;
use crate::library::{Album, Albums, AudioFile, render_album, render_table};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%\{(.*?)\}").expect("valid regex"));
static TRACK_ARGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([\d/*-]*) (.*)$").expect("valid regex"));
static EDIT_ARGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^([\d/*-]*) "(.*)" *"(.*)""#).expect("valid regex"));

/// What a `%{name}` placeholder other than `%{track}` matches.
const WORDS: &str = r"([\w\. ?'&]+)";

#[derive(Debug, Copy, Clone, Default)]
pub struct ReviewOptions {
    /// Show every album without prompting.
    pub dry_run: bool,
    /// Leave out albums that are already ready to copy.
    pub skip_complete: bool,
}

enum Flow {
    Stay,
    Advance,
    /// The album left the working tree (deleted or archived).
    Gone,
    Quit,
}

#[derive(Copy, Clone)]
enum TextField {
    Artist,
    Title,
}

impl TextField {
    fn slot(self, file: &mut AudioFile) -> &mut Option<String> {
        match self {
            Self::Artist => &mut file.artist,
            Self::Title => &mut file.title,
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Anchor a user pattern at the start of the text.
fn anchored(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{pattern})"))
}

/// Interactive album review over any line reader and writer.
pub struct Session<R, W> {
    input: R,
    out: W,
    options: ReviewOptions,
    finished: PathBuf,
}

impl<R: BufRead, W: Write> Session<R, W> {
    /// `finished` is where albums go once `next` finds them ready.
    pub fn new(input: R, out: W, options: ReviewOptions, finished: PathBuf) -> Self {
        Self {
            input,
            out,
            options,
            finished,
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Review every album in folder-name order. Albums that are deleted or
    /// archived are removed from `albums`; renamed ones are re-keyed.
    pub fn run(&mut self, albums: &mut Albums) -> Result<(), LibraryError> {
        let mut order: Vec<PathBuf> = albums.keys().cloned().collect();
        order.sort_by_key(|p| p.file_name().map(|n| n.to_os_string()));

        for key in order {
            let Some(mut album) = albums.remove(&key) else {
                continue;
            };
            if self.options.skip_complete && album.ready_to_copy() {
                albums.insert(key, album);
                continue;
            }
            self.show(&album)?;
            if self.options.dry_run {
                albums.insert(key, album);
                continue;
            }

            let flow = self.review(&mut album);
            match flow {
                Ok(Flow::Gone) => {}
                Ok(Flow::Quit) => {
                    albums.insert(album.path().to_path_buf(), album);
                    return Ok(());
                }
                Ok(_) => {
                    albums.insert(album.path().to_path_buf(), album);
                }
                Err(e) => {
                    albums.insert(album.path().to_path_buf(), album);
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    fn review(&mut self, album: &mut Album) -> Result<Flow, LibraryError> {
        loop {
            let Some(line) = self.prompt()? else {
                return Ok(Flow::Quit);
            };
            match self.execute(album, Command::parse(&line))? {
                Flow::Stay => {}
                flow => return Ok(flow),
            }
        }
    }

    fn prompt(&mut self) -> io::Result<Option<String>> {
        writeln!(self.out)?;
        write!(self.out, "Enter command[{}]: ", command::prompt_keys())?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn confirm(&mut self) -> io::Result<bool> {
        write!(self.out, "Are you sure? [Y/n] ")?;
        self.out.flush()?;
        let mut line = String::new();
        let read = self.input.read_line(&mut line)?;
        writeln!(self.out)?;
        Ok(read > 0 && matches!(line.trim(), "" | "y" | "Y"))
    }

    fn show(&mut self, album: &Album) -> io::Result<()> {
        write!(self.out, "{}", render_album(album))
    }

    fn report(&mut self, error: impl std::fmt::Display) -> io::Result<()> {
        writeln!(self.out, "{error}")
    }

    fn execute(&mut self, album: &mut Album, command: Command) -> Result<Flow, LibraryError> {
        match command {
            Command::Quit => return Ok(Flow::Quit),
            Command::Continue => return Ok(Flow::Advance),
            Command::Next => return self.next(album),
            Command::Delete => return self.delete(album),
            Command::Save => {
                self.save(album)?;
            }
            Command::Refresh => {
                if let Err(e) = album.refresh() {
                    self.report(e)?;
                }
                self.show(album)?;
            }
            Command::Show => self.show(album)?,
            Command::Print => {
                let path = std::path::absolute(album.path()).unwrap_or_else(|_| album.path().to_path_buf());
                writeln!(self.out, "Location: {}", path.display())?;
            }
            Command::Help => {
                let table = render_table::<String>(&[], &command::help_rows());
                write!(self.out, "{table}")?;
            }
            Command::Capitalize => {
                let ctx = Arc::clone(album.context());
                for file in album.files_mut() {
                    file.capitalize(&ctx.sanitizer);
                }
                self.show(album)?;
            }
            Command::CopyAlbumArtist => {
                let artist = album.album_artist();
                for file in album.files_mut() {
                    file.artist = artist.clone();
                }
                self.show(album)?;
            }
            Command::FolderToAlbum => {
                let artist = album.album_artist_from_path();
                let name = album.album_name_from_path();
                for file in album.files_mut() {
                    file.album_artist = artist.clone();
                    file.album = name.clone();
                }
                self.show(album)?;
            }
            Command::FileToTitle => {
                for file in album.files_mut() {
                    file.title = non_empty(&file.file_stem());
                }
                self.show(album)?;
            }
            Command::Renumber => {
                album.renumber_tracks();
                self.show(album)?;
            }
            Command::SetAlbum(name) => {
                let name = non_empty(&name);
                for file in album.files_mut() {
                    file.album = name.clone();
                }
                self.show(album)?;
            }
            Command::SetAlbumArtist(artist) => {
                let artist = non_empty(&artist);
                for file in album.files_mut() {
                    file.album_artist = artist.clone();
                }
                self.show(album)?;
            }
            Command::TrackArtist(args) => self.set_tracks(album, &args, TextField::Artist)?,
            Command::TrackTitle(args) => self.set_tracks(album, &args, TextField::Title)?,
            Command::RetainArtist(pattern) => self.retain(album, &pattern, TextField::Artist)?,
            Command::RetainTitle(pattern) => self.retain(album, &pattern, TextField::Title)?,
            Command::FilePattern(pattern) => self.file_pattern(album, &pattern)?,
            Command::TitleEdit(args) => self.title_edit(album, &args)?,
            Command::Unknown(line) => {
                writeln!(self.out, "Unknown command '{line}', enter h for help")?;
            }
        }
        Ok(Flow::Stay)
    }

    /// Save tags, drop unwanted files, rename. Returns false when the album
    /// lacks a name or artist, or when a step failed.
    fn save(&mut self, album: &mut Album) -> Result<bool, LibraryError> {
        if album.album_artist().is_none() {
            writeln!(self.out, "Album artist is missing.")?;
            return Ok(false);
        }
        if album.album_name().is_none() {
            writeln!(self.out, "Album name is missing.")?;
            return Ok(false);
        }
        match self.persist(album) {
            Ok(()) => {
                self.show(album)?;
                Ok(true)
            }
            Err(e) => {
                self.report(e)?;
                Ok(false)
            }
        }
    }

    fn persist(&mut self, album: &mut Album) -> Result<(), LibraryError> {
        album.save()?;
        let unwanted = album.unwanted_files();
        if !unwanted.is_empty() {
            for path in &unwanted {
                writeln!(self.out, "Removing {}", path.display())?;
            }
            if self.confirm()? {
                album.remove_files(&unwanted)?;
            }
        }
        album.rename()
    }

    fn next(&mut self, album: &mut Album) -> Result<Flow, LibraryError> {
        self.save(album)?;
        if !album.ready_to_copy() {
            return Ok(Flow::Advance);
        }
        match album.move_into(&self.finished) {
            Ok(()) => {
                info!("archived {}", album.path().display());
                Ok(Flow::Gone)
            }
            Err(e) => {
                self.report(e)?;
                Ok(Flow::Stay)
            }
        }
    }

    fn delete(&mut self, album: &mut Album) -> Result<Flow, LibraryError> {
        let path = std::path::absolute(album.path()).unwrap_or_else(|_| album.path().to_path_buf());
        writeln!(self.out, "Deleting {}", path.display())?;
        if !self.confirm()? {
            return Ok(Flow::Advance);
        }
        match album.delete() {
            Ok(()) => Ok(Flow::Gone),
            Err(e) => {
                self.report(e)?;
                Ok(Flow::Advance)
            }
        }
    }

    /// Apply `edit` to every file in `selection`, reporting tracks that are
    /// not in the album.
    fn edit_selected(
        &mut self,
        album: &mut Album,
        selection: Selection,
        mut edit: impl FnMut(&mut AudioFile),
    ) -> io::Result<()> {
        match selection {
            Selection::All => album.files_mut().iter_mut().for_each(edit),
            Selection::Range(range) => {
                for track in range.tracks() {
                    match album.get_track_mut(range.disc, track) {
                        Some(file) => edit(file),
                        None => writeln!(self.out, "disc: {}, track: {track} is missing", range.disc)?,
                    }
                }
            }
        }
        Ok(())
    }

    fn set_tracks(&mut self, album: &mut Album, args: &str, field: TextField) -> io::Result<()> {
        let parsed = TRACK_ARGS
            .captures(args)
            .and_then(|caps| Some((Selection::parse(&caps[1])?, caps[2].to_string())));
        let Some((selection, value)) = parsed else {
            return writeln!(self.out, "Invalid track selection: {args}");
        };
        let value = non_empty(&value);
        self.edit_selected(album, selection, |file| *field.slot(file) = value.clone())?;
        self.show(album)
    }

    fn retain(&mut self, album: &mut Album, pattern: &str, field: TextField) -> io::Result<()> {
        let re = match anchored(pattern) {
            Ok(re) => re,
            Err(e) => return self.report(e),
        };
        if re.captures_len() < 2 {
            return writeln!(self.out, "No capture group in {pattern}");
        }

        let mut dirty = false;
        for file in album.files_mut() {
            let slot = field.slot(file);
            let kept = slot
                .as_deref()
                .and_then(|value| re.captures(value))
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string());
            if let Some(kept) = kept {
                *slot = non_empty(&kept);
                dirty = true;
            }
        }
        if dirty {
            self.show(album)?;
        }
        Ok(())
    }

    fn file_pattern(&mut self, album: &mut Album, pattern: &str) -> io::Result<()> {
        let mut fields = Vec::new();
        let source = PLACEHOLDER.replace_all(pattern, |caps: &Captures| {
            fields.push(caps[1].to_string());
            if &caps[1] == "track" { r"(\d+)" } else { WORDS }
        });
        if let Some(field) = fields.iter().find(|f| !matches!(f.as_str(), "track" | "artist" | "title")) {
            return writeln!(self.out, "Unknown field %{{{field}}}");
        }
        let re = match anchored(&source) {
            Ok(re) => re,
            Err(e) => return self.report(e),
        };

        for file in album.files_mut() {
            let stem = file.file_stem();
            debug!("matching {} against {stem}", re.as_str());
            let Some(caps) = re.captures(&stem) else {
                continue;
            };
            for (i, field) in fields.iter().enumerate() {
                let Some(value) = caps.get(i + 1).map(|m| m.as_str()) else {
                    continue;
                };
                match field.as_str() {
                    "track" => file.track = value.parse().unwrap_or(file.track),
                    "artist" => file.artist = non_empty(value),
                    _ => file.title = non_empty(value),
                }
            }
        }
        album.reindex();
        self.show(album)
    }

    fn title_edit(&mut self, album: &mut Album, args: &str) -> io::Result<()> {
        let parsed = EDIT_ARGS.captures(args).and_then(|caps| {
            Some((
                Selection::parse(&caps[1])?,
                caps[2].to_string(),
                caps[3].to_string(),
            ))
        });
        let Some((selection, src, dst)) = parsed else {
            return writeln!(self.out, "Invalid title edit: {args}");
        };

        let mut fields = Vec::new();
        let source = PLACEHOLDER.replace_all(&src, |caps: &Captures| {
            fields.push(caps[1].to_string());
            WORDS
        });
        let re = match anchored(&source) {
            Ok(re) => re,
            Err(e) => return self.report(e),
        };

        self.edit_selected(album, selection, |file| {
            let Some(caps) = file.title.as_deref().and_then(|t| re.captures(t)) else {
                return;
            };
            let mut title = dst.clone();
            for (i, field) in fields.iter().enumerate() {
                if let Some(m) = caps.get(i + 1) {
                    title = title.replace(&format!("%{{{field}}}"), m.as_str());
                }
            }
            file.title = non_empty(&title);
        })?;
        self.show(album)
    }
}
