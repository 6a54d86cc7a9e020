use std::fmt;
use std::path::{Path, PathBuf};

use clap::ValueEnum;

pub const VARIOUS_ARTISTS: &str = "Various Artists";

/// Top-level folder of the library an album is copied into.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, ValueEnum)]
pub enum CopyTarget {
    Cd,
    Dsd,
    #[default]
    Flac,
    Mqa,
    #[value(alias = "Thai")]
    Thai,
}

impl CopyTarget {
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Cd => "cd",
            Self::Dsd => "dsd",
            Self::Flac => "flac",
            Self::Mqa => "mqa",
            Self::Thai => "Thai",
        }
    }
}

impl fmt::Display for CopyTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

fn initial(artist: &str) -> String {
    match artist.chars().next() {
        Some(c) if c.is_ascii_digit() => "0".to_string(),
        Some(c) => c.to_string(),
        None => String::new(),
    }
}

/// Library path of an album folder:
///
/// - `<library>/<target>/Various Artists/<folder>` for compilations,
/// - `<library>/Thai/<artist>/<folder>` for the Thai target,
/// - `<library>/<target>/<initial>/<artist>/<folder>` otherwise, with
///   artists starting with a digit filed under `0`.
pub fn album_destination(library: &Path, target: CopyTarget, artist: &str, folder: &str) -> PathBuf {
    let base = library.join(target.dir_name());
    if artist == VARIOUS_ARTISTS {
        return base.join(VARIOUS_ARTISTS).join(folder);
    }
    match target {
        CopyTarget::Thai => base.join(artist).join(folder),
        _ => base.join(initial(artist)).join(artist).join(folder),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regular_artists_are_filed_by_initial() {
        let dst = album_destination(Path::new("/lib"), CopyTarget::Flac, "Nina Simone", "Nina Simone - Pastel Blues");
        assert_eq!(dst, Path::new("/lib/flac/N/Nina Simone/Nina Simone - Pastel Blues"));
    }

    #[test]
    fn digit_initials_collapse_to_zero() {
        let dst = album_destination(Path::new("/lib"), CopyTarget::Cd, "10cc", "10cc - Sheet Music");
        assert_eq!(dst, Path::new("/lib/cd/0/10cc/10cc - Sheet Music"));
    }

    #[test]
    fn compilations_and_thai_skip_the_initial() {
        let va = album_destination(Path::new("/lib"), CopyTarget::Dsd, VARIOUS_ARTISTS, "Various Artists - Hits");
        assert_eq!(va, Path::new("/lib/dsd/Various Artists/Various Artists - Hits"));

        let thai = album_destination(Path::new("/lib"), CopyTarget::Thai, "Carabao", "Carabao - Made In Thailand");
        assert_eq!(thai, Path::new("/lib/Thai/Carabao/Carabao - Made In Thailand"));
    }

    #[test]
    fn target_names_match_library_folders() {
        assert_eq!(CopyTarget::default().to_string(), "flac");
        assert_eq!(CopyTarget::Thai.to_string(), "Thai");
    }
}
