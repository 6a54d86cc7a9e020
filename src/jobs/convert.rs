use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use id3::{ErrorKind, Tag};
use lofty::config::{ParseOptions, WriteOptions};
use lofty::flac::FlacFile;
use lofty::ogg::OggPictureStorage;
use lofty::picture::{Picture, PictureInformation, PictureType};
use lofty::prelude::AudioFile;
use tracing::{debug, info};

use super::{Job, JobOptions, find_files};
use crate::config::ConvertSettings;
use crate::error::{JobError, TagError};
use crate::library::format_of;

/// Transcode one file to FLAC next to it and carry the cover art across.
#[derive(Debug, Clone)]
pub struct ConvertJob {
    pub source: PathBuf,
    pub program: String,
    pub dry_run: bool,
}

impl ConvertJob {
    pub fn target(&self) -> PathBuf {
        self.source.with_extension("flac")
    }
}

impl fmt::Display for ConvertJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Converting {}", self.source.display())
    }
}

impl Job for ConvertJob {
    fn run(&self, verbose: bool) -> Result<(), JobError> {
        if !self.source.exists() {
            return Err(JobError::Missing(self.source.clone()));
        }
        let target = self.target();
        if verbose {
            info!("Converting {} to {}", self.source.display(), target.display());
        }
        if self.dry_run {
            return Ok(());
        }

        // -n: never overwrite an existing target.
        let status = Command::new(&self.program)
            .args(["-hide_banner", "-loglevel", "error", "-n", "-i"])
            .arg(&self.source)
            .arg(&target)
            .stdin(Stdio::null())
            .status()
            .map_err(|source| JobError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        if !status.success() {
            return Err(JobError::Program {
                program: self.program.clone(),
                path: self.source.clone(),
                status,
            });
        }

        if let Some(cover) = read_cover(&self.source)? {
            embed_cover(&target, cover)?;
        }
        Ok(())
    }
}

/// Cover image stored in the ID3 chunk of a WAV or AIFF file. Only pictures
/// keyed `APIC:` or `APIC:Picture` are taken.
pub fn read_cover(path: &Path) -> Result<Option<Vec<u8>>, TagError> {
    if !matches!(format_of(path).as_str(), ".wav" | ".aif" | ".aiff") {
        return Ok(None);
    }
    let tag = match Tag::read_from_path(path) {
        Ok(tag) => tag,
        Err(e) if matches!(e.kind, ErrorKind::NoTag) => return Ok(None),
        Err(e) => return Err(TagError::read(path, e)),
    };
    Ok(tag
        .pictures()
        .find(|p| p.description.is_empty() || p.description == "Picture")
        .map(|p| p.data.clone()))
}

/// Store `data` as the front cover of the FLAC file at `path`.
pub fn embed_cover(path: &Path, data: Vec<u8>) -> Result<(), TagError> {
    let mut picture = Picture::from_reader(&mut data.as_slice()).map_err(|e| TagError::write(path, e))?;
    picture.set_pic_type(PictureType::CoverFront);
    let info = PictureInformation::from_picture(&picture).unwrap_or_default();

    let mut reader = File::open(path)?;
    let mut flac = FlacFile::read_from(&mut reader, ParseOptions::new().read_properties(false))
        .map_err(|e| TagError::read(path, e))?;
    drop(reader);

    flac.insert_picture(picture, Some(info))
        .map_err(|e| TagError::write(path, e))?;
    flac.save_to_path(path, WriteOptions::default())
        .map_err(|e| TagError::write(path, e))?;
    debug!("embedded cover into {}", path.display());
    Ok(())
}

pub fn convert_jobs(root: &Path, settings: &ConvertSettings, options: JobOptions) -> Vec<ConvertJob> {
    find_files(root, &settings.supported_formats, None)
        .into_iter()
        .map(|source| ConvertJob {
            source,
            program: settings.program.clone(),
            dry_run: options.dry_run,
        })
        .collect()
}
