//! Archive extraction and audio conversion, run as independent jobs on a
//! worker pool.

mod convert;
mod extract;
mod pool;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

pub use convert::convert_jobs;
pub use extract::extract_jobs;
pub use pool::run_jobs;
use pool::Job;

use crate::library::format_of;

#[derive(Debug, Copy, Clone, Default)]
pub struct JobOptions {
    pub dry_run: bool,
    pub verbose: bool,
}

/// `path` when absolute, otherwise relative to `root`.
pub(crate) fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Files under `root` whose extension is in `formats`, sorted by path.
pub(crate) fn find_files(root: &Path, formats: &[String], exclude: Option<&Path>) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| exclude.is_none_or(|dir| !e.path().starts_with(dir)))
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            let format = format_of(p);
            formats.iter().any(|f| f.eq_ignore_ascii_case(&format))
        })
        .collect()
}

/// Rename, or copy and delete when the rename crosses file systems.
pub(crate) fn move_file(src: &Path, dst: &Path) -> io::Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    if fs::rename(src, dst).is_ok() {
        return Ok(());
    }
    fs::copy(src, dst)?;
    fs::remove_file(src)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_resolve_against_root() {
        assert_eq!(resolve(Path::new("/m"), Path::new("Archive")), Path::new("/m/Archive"));
        assert_eq!(resolve(Path::new("/m"), Path::new("/a")), Path::new("/a"));
    }

    #[test]
    fn move_file_creates_the_destination_folder() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("a.zip");
        fs::write(&src, b"PK").unwrap();
        let dst = dir.path().join("Archive").join("a.zip");

        move_file(&src, &dst).unwrap();
        assert!(!src.exists());
        assert_eq!(fs::read(&dst).unwrap(), b"PK");
    }
}
