use std::fs::File;
use std::path::{Path, PathBuf};

use lofty::config::{ParseOptions, WriteOptions};
use lofty::flac::FlacFile;
use lofty::ogg::OggPictureStorage;
use lofty::ogg::tag::VorbisComments;
use lofty::picture::PictureType;
use lofty::prelude::AudioFile;

use super::{Field, TagAccess, TagValues};
use crate::error::TagError;

fn key(field: Field) -> &'static str {
    match field {
        Field::Track => "tracknumber",
        Field::Title => "title",
        Field::Artist => "artist",
        Field::Album => "album",
        Field::AlbumArtist => "albumartist",
        Field::Disc => "discnumber",
    }
}

/// Vorbis comments of a FLAC file.
pub struct VorbisTags {
    path: PathBuf,
    file: FlacFile,
}

impl VorbisTags {
    pub fn open(path: &Path) -> Result<Self, TagError> {
        let mut reader = File::open(path)?;
        let file = FlacFile::read_from(&mut reader, ParseOptions::new().read_properties(false))
            .map_err(|e| TagError::read(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }
}

impl TagAccess for VorbisTags {
    fn field(&self, field: Field) -> Option<String> {
        let wanted = key(field);
        self.file.vorbis_comments().and_then(|vc| {
            vc.items()
                .find(|(k, _)| k.eq_ignore_ascii_case(wanted))
                .map(|(_, v)| v.to_string())
        })
    }

    fn has_album_art(&self) -> bool {
        self.file
            .pictures()
            .iter()
            .any(|(pic, _)| pic.pic_type() == PictureType::CoverFront)
    }

    fn save(&mut self, values: &TagValues) -> Result<(), TagError> {
        // The comment block is rebuilt from scratch; pictures live in their
        // own metadata blocks and are kept.
        let mut comments = VorbisComments::default();
        if let Some(old) = self.file.vorbis_comments() {
            comments.set_vendor(old.vendor().to_string());
        }
        for (field, value) in values.entries() {
            if let Some(value) = value {
                comments.push(key(field).to_string(), value);
            }
        }
        self.file.set_vorbis_comments(comments);
        self.file
            .save_to_path(&self.path, WriteOptions::default())
            .map_err(|e| TagError::write(&self.path, e))
    }

    fn entries(&self) -> Vec<(String, String)> {
        self.file
            .vorbis_comments()
            .map(|vc| {
                vc.items()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect()
            })
            .unwrap_or_default()
    }
}
