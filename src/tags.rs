//! Per-file tag access.
//!
//! Two container families are handled: FLAC files carry Vorbis comments
//! (`VorbisTags`), DSF and MP3 files carry an ID3v2 tag (`Id3Tags`). Both
//! implement [`TagAccess`]; [`open`] picks one from the file extension.

mod dsf;
mod flac;
mod id3v2;

use std::path::Path;

use crate::error::TagError;
use crate::text::{Sanitizer, sanitize_number};

pub use self::flac::VorbisTags;
pub use self::id3v2::{Id3Container, Id3Tags};

/// The tag fields the tagger reads and writes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Field {
    Track,
    Title,
    Artist,
    Album,
    AlbumArtist,
    Disc,
}

/// Values written back by [`TagAccess::save`]. `None` clears the field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagValues {
    pub track: Option<u32>,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub album_artist: Option<String>,
    pub disc: Option<u32>,
}

impl TagValues {
    /// Every field paired with its text value; empty strings count as unset.
    pub fn entries(&self) -> [(Field, Option<String>); 6] {
        let text = |v: &Option<String>| v.clone().filter(|s| !s.is_empty());
        [
            (Field::Track, self.track.map(|n| n.to_string())),
            (Field::Title, text(&self.title)),
            (Field::Artist, text(&self.artist)),
            (Field::Album, text(&self.album)),
            (Field::AlbumArtist, text(&self.album_artist)),
            (Field::Disc, self.disc.map(|n| n.to_string())),
        ]
    }
}

/// Capability set of a tag container.
pub trait TagAccess: Send {
    /// Raw first value stored for `field`.
    fn field(&self, field: Field) -> Option<String>;

    /// Whether the file embeds front-cover art.
    fn has_album_art(&self) -> bool;

    /// Persist `values` to the file on disk.
    fn save(&mut self, values: &TagValues) -> Result<(), TagError>;

    /// Every stored key/value pair, for dumping.
    fn entries(&self) -> Vec<(String, String)>;

    fn number(&self, field: Field) -> Option<u32> {
        self.field(field)
            .filter(|v| !v.is_empty())
            .and_then(|v| sanitize_number(&v))
    }

    fn text(&self, field: Field, sanitizer: &Sanitizer) -> Option<String> {
        self.field(field)
            .filter(|v| !v.is_empty())
            .map(|v| sanitizer.display(&v, false))
            .filter(|v| !v.is_empty())
    }

    fn track(&self) -> Option<u32> {
        self.number(Field::Track)
    }

    fn title(&self, sanitizer: &Sanitizer) -> Option<String> {
        self.text(Field::Title, sanitizer)
    }

    fn artist(&self, sanitizer: &Sanitizer) -> Option<String> {
        self.text(Field::Artist, sanitizer)
    }

    fn album(&self, sanitizer: &Sanitizer) -> Option<String> {
        self.text(Field::Album, sanitizer)
    }

    fn album_artist(&self, sanitizer: &Sanitizer) -> Option<String> {
        self.text(Field::AlbumArtist, sanitizer)
    }

    fn disc(&self) -> Option<u32> {
        self.number(Field::Disc)
    }
}

/// Lowercase extension of `path` without the dot.
pub fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
}

/// Open the tag container of `path`, choosing the variant by extension.
pub fn open(path: &Path) -> Result<Box<dyn TagAccess>, TagError> {
    match extension(path).as_deref() {
        Some("flac") => Ok(Box::new(VorbisTags::open(path)?)),
        Some("dsf") => Ok(Box::new(Id3Tags::open(path, Id3Container::Dsf)?)),
        Some("mp3") => Ok(Box::new(Id3Tags::open(path, Id3Container::Mpeg)?)),
        _ => Err(TagError::UnsupportedFormat(path.to_path_buf())),
    }
}

#[cfg(test)]
pub(crate) mod fixtures;
