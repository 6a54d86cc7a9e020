//! Synthesized audio containers for tests. The files carry valid headers and
//! no audio frames, which is all the tag code looks at.

use std::fs::File;
use std::path::Path;

use id3::frame::{Picture as Id3Picture, PictureType as Id3PictureType};
use id3::{Tag, TagLike};
use lofty::config::{ParseOptions, WriteOptions};
use lofty::flac::FlacFile;
use lofty::ogg::OggPictureStorage;
use lofty::ogg::tag::VorbisComments;
use lofty::picture::{Picture, PictureInformation, PictureType};
use lofty::prelude::AudioFile;

use super::dsf;

pub const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01\0\0\0\x01\x08\x02\0\0\0";

/// `fLaC` marker followed by a single (last) STREAMINFO block.
pub fn write_flac(path: &Path) {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"fLaC");
    bytes.extend_from_slice(&[0x80, 0x00, 0x00, 34]);
    bytes.extend_from_slice(&4096u16.to_be_bytes());
    bytes.extend_from_slice(&4096u16.to_be_bytes());
    bytes.extend_from_slice(&[0, 0, 0, 0, 0, 0]);
    // sample rate (20 bits) | channels - 1 (3) | bits per sample - 1 (5) | total samples (36)
    let packed: u64 = (44_100u64 << 44) | (1u64 << 41) | (15u64 << 36);
    bytes.extend_from_slice(&packed.to_be_bytes());
    bytes.extend_from_slice(&[0u8; 16]);
    std::fs::write(path, bytes).unwrap();
}

/// A FLAC file carrying `comments` and, optionally, a front cover.
pub fn write_flac_tagged(path: &Path, comments: &[(&str, &str)], cover: bool) {
    write_flac(path);
    let mut reader = File::open(path).unwrap();
    let mut flac = FlacFile::read_from(&mut reader, ParseOptions::new().read_properties(false))
        .unwrap();
    drop(reader);

    let mut vc = VorbisComments::default();
    for (k, v) in comments {
        vc.push(k.to_string(), v.to_string());
    }
    flac.set_vorbis_comments(vc);

    if cover {
        let mut pic = Picture::from_reader(&mut &PNG[..]).unwrap();
        pic.set_pic_type(PictureType::CoverFront);
        flac.insert_picture(pic, Some(PictureInformation::default()))
            .unwrap();
    }

    flac.save_to_path(path, WriteOptions::default()).unwrap();
}

/// A DSF file with `DSD `, `fmt ` and a tiny `data` chunk, no metadata.
pub fn write_dsf(path: &Path) {
    let data_len: u64 = 12 + 16;
    let fmt_len: u64 = 52;
    let total: u64 = 28 + fmt_len + data_len;

    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"DSD ");
    bytes.extend_from_slice(&28u64.to_le_bytes());
    bytes.extend_from_slice(&total.to_le_bytes());
    bytes.extend_from_slice(&0u64.to_le_bytes());

    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&fmt_len.to_le_bytes());
    for v in [1u32, 0, 2, 2, 2_822_400, 1] {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    bytes.extend_from_slice(&0u64.to_le_bytes());
    bytes.extend_from_slice(&4096u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());

    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_len.to_le_bytes());
    bytes.extend_from_slice(&[0x69u8; 16]);

    std::fs::write(path, bytes).unwrap();
}

fn id3_tag(frames: &[(&str, &str)], cover: Option<&str>) -> Tag {
    let mut tag = Tag::new();
    for (id, text) in frames {
        tag.set_text(*id, *text);
    }
    if let Some(description) = cover {
        tag.add_frame(Id3Picture {
            mime_type: "image/png".to_string(),
            picture_type: Id3PictureType::CoverFront,
            description: description.to_string(),
            data: PNG.to_vec(),
        });
    }
    tag
}

/// A DSF file whose ID3 chunk holds `frames` and optionally a picture frame
/// with the given description.
pub fn write_dsf_tagged(path: &Path, frames: &[(&str, &str)], cover: Option<&str>) {
    write_dsf(path);
    dsf::write_tag(path, &id3_tag(frames, cover)).unwrap();
}
