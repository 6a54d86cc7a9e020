//! ID3 chunk handling for DSF (DSD stream file) containers.
//!
//! A DSF file opens with a 28 byte `DSD ` chunk: magic, chunk size (28),
//! total file size, and the offset of the trailing ID3v2 metadata chunk (0 if
//! absent). All integers are little endian.

use std::fs::{File, OpenOptions};
use std::io::{Cursor, Read, Seek, SeekFrom, Write};
use std::path::Path;

use id3::{ErrorKind, Tag, Version};

use crate::error::TagError;

const MAGIC: &[u8; 4] = b"DSD ";
const HEADER_LEN: u64 = 28;
const FILE_SIZE_AT: u64 = 12;
const METADATA_AT: u64 = 20;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Header {
    file_size: u64,
    metadata_offset: u64,
}

fn read_header(path: &Path, file: &mut File) -> Result<Header, TagError> {
    let mut buf = [0u8; HEADER_LEN as usize];
    file.read_exact(&mut buf)
        .map_err(|e| TagError::read(path, format!("truncated DSD header: {e}")))?;
    if &buf[0..4] != MAGIC {
        return Err(TagError::read(path, "missing DSD chunk"));
    }
    let le = |at: usize| {
        let mut b = [0u8; 8];
        b.copy_from_slice(&buf[at..at + 8]);
        u64::from_le_bytes(b)
    };
    if le(4) != HEADER_LEN {
        return Err(TagError::read(path, "bad DSD chunk size"));
    }
    Ok(Header {
        file_size: le(FILE_SIZE_AT as usize),
        metadata_offset: le(METADATA_AT as usize),
    })
}

/// Read the ID3 tag of a DSF file; a file without a metadata chunk yields an
/// empty tag.
pub fn read_tag(path: &Path) -> Result<Tag, TagError> {
    let mut file = File::open(path)?;
    let header = read_header(path, &mut file)?;
    if header.metadata_offset == 0 {
        return Ok(Tag::new());
    }

    let len = file.metadata()?.len();
    if header.metadata_offset < HEADER_LEN || header.metadata_offset >= len {
        return Err(TagError::read(path, "metadata pointer outside the file"));
    }

    file.seek(SeekFrom::Start(header.metadata_offset))?;
    let mut chunk = Vec::new();
    file.read_to_end(&mut chunk)?;

    match Tag::read_from2(Cursor::new(chunk)) {
        Ok(tag) => Ok(tag),
        Err(e) if matches!(e.kind, ErrorKind::NoTag) => Ok(Tag::new()),
        Err(e) => Err(TagError::read(path, e)),
    }
}

/// Replace the trailing ID3 chunk of a DSF file with `tag` and patch the
/// header sizes.
pub fn write_tag(path: &Path, tag: &Tag) -> Result<(), TagError> {
    let mut file = OpenOptions::new().read(true).write(true).open(path)?;
    let header = read_header(path, &mut file)?;
    let len = file.metadata()?.len();

    let audio_end = match header.metadata_offset {
        0 => len,
        offset if offset >= HEADER_LEN && offset <= len => offset,
        _ => return Err(TagError::write(path, "metadata pointer outside the file")),
    };

    let mut chunk = Vec::new();
    tag.write_to(&mut chunk, Version::Id3v24)
        .map_err(|e| TagError::write(path, e))?;

    file.set_len(audio_end)?;
    file.seek(SeekFrom::Start(audio_end))?;
    file.write_all(&chunk)?;

    let file_size = audio_end + chunk.len() as u64;
    file.seek(SeekFrom::Start(FILE_SIZE_AT))?;
    file.write_all(&file_size.to_le_bytes())?;
    file.seek(SeekFrom::Start(METADATA_AT))?;
    file.write_all(&audio_end.to_le_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::fixtures;
    use id3::TagLike;

    #[test]
    fn untagged_file_reads_as_empty_tag() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("01 a.dsf");
        fixtures::write_dsf(&path);

        let tag = read_tag(&path).unwrap();
        assert_eq!(tag.frames().count(), 0);
    }

    #[test]
    fn write_appends_chunk_and_patches_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("01 a.dsf");
        fixtures::write_dsf(&path);
        let audio_len = std::fs::metadata(&path).unwrap().len();

        let mut tag = Tag::new();
        tag.set_title("First");
        write_tag(&path, &tag).unwrap();

        let mut file = File::open(&path).unwrap();
        let header = read_header(&path, &mut file).unwrap();
        assert_eq!(header.metadata_offset, audio_len);
        assert_eq!(header.file_size, std::fs::metadata(&path).unwrap().len());

        // Rewriting replaces the chunk instead of stacking a second one.
        tag.set_title("Second");
        write_tag(&path, &tag).unwrap();
        let mut file = File::open(&path).unwrap();
        let header2 = read_header(&path, &mut file).unwrap();
        assert_eq!(header2.metadata_offset, audio_len);
        assert_eq!(read_tag(&path).unwrap().title(), Some("Second"));
    }

    #[test]
    fn garbage_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.dsf");
        std::fs::write(&path, b"not a dsd stream file at all").unwrap();

        let err = read_tag(&path).unwrap_err();
        assert!(matches!(err, TagError::Read { .. }));
    }
}
