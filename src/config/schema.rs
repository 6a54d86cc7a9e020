use std::path::PathBuf;

use serde::Deserialize;

/// Top-level settings loaded from `config.json`.
///
/// File format: JSON (TOML is accepted too, picked by file extension)
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/audiotag/config.json` or `~/.config/audiotag/config.json`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `AUDIOTAG__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub cleanup: CleanupSettings,
    pub extract: ExtractSettings,
    pub convert: ConvertSettings,
    pub copy: CopySettings,
    pub library: LibrarySettings,
}

/// One row of a character replacement table: every string in `src` is
/// replaced by `dst`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Replacement {
    pub src: Vec<String>,
    pub dst: String,
}

impl Replacement {
    pub fn new(src: &[&str], dst: &str) -> Self {
        Self {
            src: src.iter().map(|s| s.to_string()).collect(),
            dst: dst.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CleanupSettings {
    /// Replacements applied to tag values shown on screen and written to tags.
    pub display_chars: Vec<Replacement>,
    /// Replacements applied to file and folder names.
    pub filesystem_chars: Vec<Replacement>,
    /// Extra files an album folder may carry (cover scans, booklets, ...).
    pub allowed_formats: Vec<String>,
    /// Audio formats loaded and tagged, with the leading dot.
    pub supported_formats: Vec<String>,
    /// Folder that reviewed, ready albums are moved into. Files below it are
    /// not scanned again.
    pub finished_albums: PathBuf,
}

impl Default for CleanupSettings {
    fn default() -> Self {
        Self {
            display_chars: vec![
                Replacement::new(&["\u{2018}", "\u{2019}", "`"], "'"),
                Replacement::new(&["\u{201c}", "\u{201d}"], "\""),
                Replacement::new(&["\u{2013}", "\u{2014}"], "-"),
                Replacement::new(&["_"], " "),
                Replacement::new(&["  "], " "),
            ],
            filesystem_chars: vec![
                Replacement::new(&["/", "\\", ":"], "-"),
                Replacement::new(&["?", "*", "\"", "<", ">", "|"], ""),
            ],
            allowed_formats: vec![
                ".jpg".into(),
                ".jpeg".into(),
                ".png".into(),
                ".pdf".into(),
            ],
            supported_formats: vec![".flac".into(), ".dsf".into()],
            finished_albums: PathBuf::from("Finished"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractSettings {
    /// Where processed archives are moved after extraction.
    pub archive: PathBuf,
    /// Where archive contents are unpacked.
    pub extract: PathBuf,
    /// Archive extensions to look for, with the leading dot.
    pub supported_formats: Vec<String>,
    /// Extractor executable; invoked as `<program> x -o<dir> -y <archive>`.
    pub program: String,
}

impl Default for ExtractSettings {
    fn default() -> Self {
        Self {
            archive: PathBuf::from("Archive"),
            extract: PathBuf::from("."),
            supported_formats: vec![".zip".into(), ".rar".into(), ".7z".into()],
            program: "7z".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConvertSettings {
    /// Source formats transcoded to FLAC, with the leading dot.
    pub supported_formats: Vec<String>,
    /// Encoder executable; invoked as `<program> -n -i <src> <dst>.flac`.
    pub program: String,
}

impl Default for ConvertSettings {
    fn default() -> Self {
        Self {
            supported_formats: vec![
                ".ape".into(),
                ".wav".into(),
                ".aif".into(),
                ".aiff".into(),
            ],
            program: "ffmpeg".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CopySettings {
    /// Audio formats considered when collecting albums to copy.
    pub supported_formats: Vec<String>,
}

impl Default for CopySettings {
    fn default() -> Self {
        Self {
            supported_formats: vec![".flac".into(), ".dsf".into()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Root of the curated library albums are copied into.
    pub location: PathBuf,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            location: PathBuf::from("Library"),
        }
    }
}
