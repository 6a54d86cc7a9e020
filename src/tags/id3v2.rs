use std::path::{Path, PathBuf};

use id3::frame::Content;
use id3::{ErrorKind, Tag, TagLike, Version};

use super::{Field, TagAccess, TagValues, dsf};
use crate::error::TagError;

fn frame_id(field: Field) -> &'static str {
    match field {
        Field::Track => "TRCK",
        Field::Title => "TIT2",
        Field::Artist => "TPE1",
        Field::Album => "TALB",
        Field::AlbumArtist => "TPE2",
        Field::Disc => "TPOS",
    }
}

/// Where the ID3 tag is stored.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Id3Container {
    /// Trailing metadata chunk of a DSF file.
    Dsf,
    /// Tag at the head of an MPEG audio file.
    Mpeg,
}

/// ID3v2 frames of a DSF or MP3 file.
pub struct Id3Tags {
    path: PathBuf,
    container: Id3Container,
    tag: Tag,
}

impl Id3Tags {
    pub fn open(path: &Path, container: Id3Container) -> Result<Self, TagError> {
        let tag = match container {
            Id3Container::Dsf => dsf::read_tag(path)?,
            Id3Container::Mpeg => match Tag::read_from_path(path) {
                Ok(tag) => tag,
                Err(e) if matches!(e.kind, ErrorKind::NoTag) => Tag::new(),
                Err(e) => return Err(TagError::read(path, e)),
            },
        };
        Ok(Self {
            path: path.to_path_buf(),
            container,
            tag,
        })
    }

    /// Frame keys the way a frame dictionary names them: picture frames get
    /// their description appended (`APIC:Cover`), other frames use the id.
    fn frame_keys(&self) -> impl Iterator<Item = String> + '_ {
        self.tag.frames().map(|frame| match frame.content() {
            Content::Picture(pic) => format!("{}:{}", frame.id(), pic.description),
            _ => frame.id().to_string(),
        })
    }
}

impl TagAccess for Id3Tags {
    fn field(&self, field: Field) -> Option<String> {
        self.tag
            .get(frame_id(field))
            .and_then(|frame| frame.content().text())
            .and_then(|text| text.split('\0').next())
            .map(str::to_string)
    }

    fn has_album_art(&self) -> bool {
        // Some taggers key the picture frame with an embedded file name, so
        // match on the substring rather than an exact key.
        self.frame_keys().any(|key| key.contains("APIC"))
    }

    fn save(&mut self, values: &TagValues) -> Result<(), TagError> {
        for (field, value) in values.entries() {
            match value {
                Some(text) => self.tag.set_text(frame_id(field), text),
                None => {
                    self.tag.remove(frame_id(field));
                }
            }
        }

        match self.container {
            Id3Container::Dsf => dsf::write_tag(&self.path, &self.tag),
            Id3Container::Mpeg => self
                .tag
                .write_to_path(&self.path, Version::Id3v24)
                .map_err(|e| TagError::write(&self.path, e)),
        }
    }

    fn entries(&self) -> Vec<(String, String)> {
        self.tag
            .frames()
            .zip(self.frame_keys())
            .map(|(frame, key)| {
                let value = match frame.content().text() {
                    Some(text) => text.to_string(),
                    None => format!("{:?}", frame.content()),
                };
                (key, value)
            })
            .collect()
    }
}
