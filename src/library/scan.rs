use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};
use walkdir::WalkDir;

use super::Context;
use super::album::Album;
use super::audio_file::{AudioFile, album_path_of};
use super::destination::CopyTarget;
use crate::error::LibraryError;

/// Albums keyed by their directory.
pub type Albums = BTreeMap<PathBuf, Album>;

fn is_audio_file(path: &Path, formats: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            formats
                .iter()
                .map(|f| f.trim().trim_start_matches('.').to_ascii_lowercase())
                .any(|f| f == ext)
        })
        .unwrap_or(false)
}

fn is_excluded(path: &Path, root: &Path, exclude: Option<&Path>) -> bool {
    match exclude {
        Some(dir) if dir.as_os_str().is_empty() => false,
        Some(dir) if dir.is_absolute() => path.starts_with(dir),
        Some(dir) => path.starts_with(root.join(dir)),
        None => false,
    }
}

/// Walk `root` for files in `formats` and group them into albums. Files under
/// `exclude` are left out. An album with any unreadable file is dropped with
/// a warning; a file whose extension has no tag reader is an error.
pub fn load_albums(
    root: &Path,
    ctx: &Arc<Context>,
    formats: &[String],
    exclude: Option<&Path>,
    copy_target: CopyTarget,
) -> Result<Albums, LibraryError> {
    let mut albums = Albums::new();
    let mut corrupted = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_excluded(e.path(), root, exclude))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("{e}");
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_file() || !is_audio_file(path, formats) {
            continue;
        }

        match AudioFile::load(path, &ctx.sanitizer) {
            Ok(file) => {
                debug!("loaded {}: {:?}", path.display(), file.dump());
                let album_path = file.album_path();
                albums
                    .entry(album_path.clone())
                    .or_insert_with(|| Album::new(album_path, Arc::clone(ctx), copy_target))
                    .add_track(file);
            }
            Err(e) if e.is_unreadable() => {
                warn!("{e}");
                corrupted.push(album_path_of(path));
            }
            Err(e) => return Err(e.into()),
        }
    }

    for path in corrupted {
        if albums.remove(&path).is_some() {
            warn!("Skipping corrupted album {}", path.display());
        }
    }
    Ok(albums)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_audio_file_matches_configured_extensions_case_insensitive() {
        let formats = vec![".flac".to_string(), "dsf".to_string()];
        assert!(is_audio_file(Path::new("/tmp/a.flac"), &formats));
        assert!(is_audio_file(Path::new("/tmp/a.FLAC"), &formats));
        assert!(is_audio_file(Path::new("/tmp/a.dsf"), &formats));
        assert!(!is_audio_file(Path::new("/tmp/a.mp3"), &formats));
        assert!(!is_audio_file(Path::new("/tmp/a"), &formats));
    }

    #[test]
    fn exclusion_is_relative_to_the_root_unless_absolute() {
        let root = Path::new("/music");
        assert!(is_excluded(Path::new("/music/Finished/a/1.flac"), root, Some(Path::new("Finished"))));
        assert!(!is_excluded(Path::new("/music/Unfinished/1.flac"), root, Some(Path::new("Finished"))));
        assert!(is_excluded(Path::new("/done/a/1.flac"), root, Some(Path::new("/done"))));
        assert!(!is_excluded(Path::new("/music/a/1.flac"), root, None));
        assert!(!is_excluded(Path::new("/music/a/1.flac"), root, Some(Path::new(""))));
    }
}
